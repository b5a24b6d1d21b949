use std::path::Path;

use anyhow::{Context, Result};

use crate::app_settings::AppSettings;
use crate::chapters::ChapterRegistry;
use crate::content_store::{ContentResolver, DirContentStore, VerseContentStore};
use crate::cross_refs::{CrossReferenceEngine, CrossReferenceTables, TableDrift};
use crate::logger::{info, warn};
use crate::types::{
    AdjacentVerses, ChapterInfo, PopularVerseRef, RelatedVerse, TableError, VerseContent, VerseKey,
    VersePage, VideoSourceMap,
};
use crate::verse_index::VerseIndex;
use crate::video_sources::{VideoRegistry, VideoSourceResolver};

/// The static tables and the external stores, built once and then only read.
///
/// Share it by reference (or behind an `Arc`), every method takes `&self`.
pub struct AppData {
    pub settings: AppSettings,
    registry: ChapterRegistry,
    index: VerseIndex,
    cross_ref_tables: CrossReferenceTables,
    content: ContentResolver,
    videos: VideoSourceResolver,
}

impl AppData {
    /// Load settings, the content dir and the video registry from `gita_dir`.
    pub fn new(gita_dir: &Path) -> Result<Self> {
        let settings = AppSettings::load_from_dir(gita_dir)?;

        let content_dir = settings.content_dir_in(gita_dir);
        let store = DirContentStore::new(&content_dir);

        let video_path = settings.video_registry_path_in(gita_dir);
        let video_registry = VideoRegistry::load(&video_path)?;

        info(&format!(
            "AppData::new() content: {}, videos: {} ({} verses)",
            content_dir.display(),
            video_path.display(),
            video_registry.verse_count(),
        ));

        let app_data = AppData::from_parts(settings, Box::new(store), video_registry)
            .context("Failed to load static tables")?;
        Ok(app_data)
    }

    /// Build from already opened stores. Fails only if the embedded tables are malformed.
    pub fn from_parts(
        settings: AppSettings,
        store: Box<dyn VerseContentStore>,
        video_registry: VideoRegistry,
    ) -> Result<Self, TableError> {
        let registry = ChapterRegistry::load()?;
        let index = VerseIndex::new(&registry);
        let cross_ref_tables = CrossReferenceTables::load()?;

        for drift in cross_ref_tables.drift_report(&index) {
            warn(&format!(
                "{} entry (chapter {:?}) points to a verse that doesn't exist: {}",
                drift.table, drift.source_chapter, drift.target
            ));
        }

        let content = ContentResolver::new(index.clone(), store);
        let videos = VideoSourceResolver::new(video_registry, index.clone(), &settings.primary_video_language);

        Ok(AppData {
            settings,
            registry,
            index,
            cross_ref_tables,
            content,
            videos,
        })
    }

    pub fn chapters(&self) -> &ChapterRegistry {
        &self.registry
    }

    pub fn verse_index(&self) -> &VerseIndex {
        &self.index
    }

    pub fn cross_refs(&self) -> CrossReferenceEngine<'_> {
        CrossReferenceEngine::new(&self.cross_ref_tables, &self.registry, &self.index)
    }

    pub fn get_all_chapters(&self) -> &[ChapterInfo] {
        self.registry.get_all_chapters()
    }

    pub fn get_chapter_info(&self, chapter_number: u32) -> Option<&ChapterInfo> {
        self.registry.get_chapter_info(chapter_number)
    }

    pub fn get_all_verse_keys(&self) -> Vec<VerseKey> {
        self.index.get_all_verse_keys()
    }

    pub fn verse_exists(&self, chapter: u32, verse: u32) -> bool {
        self.index.verse_exists(chapter, verse)
    }

    pub fn get_adjacent_verses(&self, chapter: u32, verse: u32) -> AdjacentVerses {
        self.index.get_adjacent_verses(chapter, verse)
    }

    pub fn get_verse_content(&self, chapter: u32, verse: u32) -> Option<VerseContent> {
        self.content.get_verse_content(chapter, verse)
    }

    pub fn get_verse_video_sources(&self, chapter: u32, verse: u32) -> VideoSourceMap {
        self.videos.get_verse_video_sources(chapter, verse)
    }

    pub fn resolve_default_video_language(&self, sources: &VideoSourceMap) -> Option<String> {
        self.videos.resolve_default_video_language(sources)
    }

    pub fn get_related_verses(&self, chapter: u32, verse: u32) -> Vec<RelatedVerse> {
        self.cross_refs().get_related_verses(chapter, verse)
    }

    pub fn get_popular_verses_in_chapter(&self, chapter: u32, current_verse: u32) -> Vec<PopularVerseRef> {
        self.cross_refs().get_popular_verses_in_chapter(chapter, current_verse)
    }

    /// Everything a verse page shows. None when the key is invalid or the
    /// verse has no content record.
    pub fn verse_page(&self, chapter: u32, verse: u32) -> Option<VersePage> {
        if !self.verse_exists(chapter, verse) {
            return None;
        }
        let chapter_info = self.get_chapter_info(chapter)?.clone();
        let content = self.get_verse_content(chapter, verse)?;

        let videos = self.get_verse_video_sources(chapter, verse);
        let default_video_language = self.resolve_default_video_language(&videos);

        Some(VersePage {
            key: VerseKey::new(chapter, verse),
            chapter: chapter_info,
            content,
            adjacent: self.get_adjacent_verses(chapter, verse),
            videos,
            default_video_language,
            related_verses: self.get_related_verses(chapter, verse),
            popular_verses: self.get_popular_verses_in_chapter(chapter, verse),
        })
    }

    pub fn missing_verse_keys(&self) -> Result<Vec<VerseKey>> {
        self.content.missing_verse_keys()
    }

    /// Curated table entries and video registry entries naming verses outside the index.
    pub fn drift_report(&self) -> Vec<TableDrift> {
        let mut report = self.cross_ref_tables.drift_report(&self.index);
        report.extend(
            self.videos
                .registry()
                .stray_keys(&self.index)
                .into_iter()
                .map(|target| TableDrift { table: "verse_videos", source_chapter: None, target }),
        );
        report
    }
}
