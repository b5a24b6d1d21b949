//! Video Source Resolver
//!
//! Per-verse, per-language video references and the default language policy.
//! A verse without videos is a normal "coming soon" state, not an error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::logger::warn;
use crate::types::{VerseKey, VideoSource, VideoSourceMap};
use crate::verse_index::VerseIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VideoLanguage {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

/// Supported video languages, in the order used to pick a default.
pub const SUPPORTED_LANGUAGES: &[VideoLanguage] = &[
    VideoLanguage { code: "en", name: "English", flag: "🇺🇸" },
    VideoLanguage { code: "hi", name: "Hindi", flag: "🇮🇳" },
    VideoLanguage { code: "bn", name: "Bengali", flag: "🇧🇩" },
    VideoLanguage { code: "te", name: "Telugu", flag: "🇮🇳" },
    VideoLanguage { code: "ta", name: "Tamil", flag: "🇮🇳" },
    VideoLanguage { code: "kn", name: "Kannada", flag: "🇮🇳" },
    VideoLanguage { code: "ml", name: "Malayalam", flag: "🇮🇳" },
    VideoLanguage { code: "gu", name: "Gujarati", flag: "🇮🇳" },
    VideoLanguage { code: "pa", name: "Punjabi", flag: "🇮🇳" },
    VideoLanguage { code: "or", name: "Odia", flag: "🇮🇳" },
];

pub fn get_language_meta(code: &str) -> Option<&'static VideoLanguage> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}

fn supported_rank(code: &str) -> Option<usize> {
    SUPPORTED_LANGUAGES.iter().position(|l| l.code == code)
}

/// "🇮🇳 Hindi" for known codes, the upper-cased code otherwise.
pub fn video_language_label(code: &str) -> String {
    match get_language_meta(code) {
        Some(meta) => format!("{} {}", meta.flag, meta.name),
        None => code.to_uppercase(),
    }
}

/// Language codes present in `sources`, supported languages first in
/// registry order, then unknown codes alphabetically.
pub fn available_video_languages(sources: &VideoSourceMap) -> Vec<String> {
    let mut codes: Vec<&String> = sources.keys().collect();
    // BTreeMap keys are already alphabetical, the sort is stable.
    codes.sort_by_key(|code| supported_rank(code).unwrap_or(usize::MAX));
    codes.into_iter().cloned().collect()
}

/// The per-verse video registry, as stored in `verse-videos.json`:
///
/// ```json
/// { "2.47": { "en": { "videoId": "abc123", "title": "Bhagavad Gita 2.47" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoRegistry {
    entries: BTreeMap<VerseKey, VideoSourceMap>,
}

impl VideoRegistry {
    pub fn new() -> Self {
        VideoRegistry::default()
    }

    /// Entries whose key doesn't parse as a verse reference are dropped with a warning.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, VideoSourceMap> = serde_json::from_str(json)
            .context("Failed to parse video registry")?;

        let mut entries = BTreeMap::new();
        for (key, sources) in raw {
            match key.parse::<VerseKey>() {
                Ok(k) => {
                    entries.entry(k).or_insert_with(VideoSourceMap::new).extend(sources);
                }
                Err(e) => warn(&format!("Skipping video registry entry: {}", e)),
            }
        }

        Ok(VideoRegistry { entries })
    }

    /// A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(VideoRegistry::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read video registry: {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("In video registry: {}", path.display()))
    }

    pub fn insert(&mut self, key: VerseKey, language: &str, source: VideoSource) {
        self.entries
            .entry(key)
            .or_default()
            .insert(language.to_string(), source);
    }

    pub fn verse_count(&self) -> usize {
        self.entries.len()
    }

    /// Keys that parsed as references but name no verse in `index`.
    pub fn stray_keys(&self, index: &VerseIndex) -> Vec<VerseKey> {
        self.entries
            .keys()
            .copied()
            .filter(|k| !index.contains(*k))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct VideoSourceResolver {
    registry: VideoRegistry,
    index: VerseIndex,
    primary_language: String,
}

impl VideoSourceResolver {
    pub fn new(registry: VideoRegistry, index: VerseIndex, primary_language: &str) -> Self {
        for key in registry.stray_keys(&index) {
            warn(&format!("Video registry entry points to a verse that doesn't exist: {}", key));
        }
        VideoSourceResolver {
            registry,
            index,
            primary_language: primary_language.to_string(),
        }
    }

    pub fn registry(&self) -> &VideoRegistry {
        &self.registry
    }

    pub fn primary_language(&self) -> &str {
        &self.primary_language
    }

    /// Possibly empty, never an error. Empty for keys outside the index.
    pub fn get_verse_video_sources(&self, chapter: u32, verse: u32) -> VideoSourceMap {
        let key = VerseKey::new(chapter, verse);
        if !self.index.contains(key) {
            return VideoSourceMap::new();
        }
        self.registry
            .entries
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// The configured primary language if present, else the first supported
    /// language present, else the alphabetically first code.
    pub fn resolve_default_video_language(&self, sources: &VideoSourceMap) -> Option<String> {
        if sources.contains_key(&self.primary_language) {
            return Some(self.primary_language.clone());
        }
        available_video_languages(sources).into_iter().next()
    }
}
