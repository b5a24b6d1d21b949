//! Cross-Reference Engine
//!
//! Derives "related verses" and "key verses in this chapter" from three
//! curated tables: a theme map (chapter => linked verses), a chapter-independent
//! list of famous verses, and per-chapter key verses.
//!
//! The tables are hand-curated and may drift from the verse index, so every
//! target is validated at read time and invalid ones are dropped silently.

use std::collections::{BTreeMap, HashSet};

use serde::{Serialize, Deserialize};

use crate::app_settings::CROSS_REFERENCES_JSON;
use crate::chapters::ChapterRegistry;
use crate::types::{PopularVerseRef, RelatedVerse, TableError, VerseKey};
use crate::verse_index::VerseIndex;

pub const MAX_RELATED_VERSES: usize = 5;
pub const MAX_POPULAR_VERSES: usize = 3;

/// A curated link to a verse, with the reason it is worth reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseEdge {
    pub chapter: u32,
    pub verse: u32,
    pub reason: String,
}

impl VerseEdge {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferenceTables {
    #[serde(default)]
    pub famous_verses: Vec<VerseEdge>,
    #[serde(default)]
    pub theme_map: BTreeMap<u32, Vec<VerseEdge>>,
    #[serde(default)]
    pub key_verses: BTreeMap<u32, Vec<u32>>,
}

/// A curated entry that names a verse outside the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDrift {
    pub table: &'static str,
    pub source_chapter: Option<u32>,
    pub target: VerseKey,
}

impl CrossReferenceTables {
    /// Parse the tables embedded in the crate.
    pub fn load() -> Result<Self, TableError> {
        Self::from_json(CROSS_REFERENCES_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        serde_json::from_str(json)
            .map_err(|source| TableError::Parse { name: "cross_references.json", source })
    }

    pub fn theme_edges(&self, chapter: u32) -> &[VerseEdge] {
        self.theme_map.get(&chapter).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn key_verses(&self, chapter: u32) -> &[u32] {
        self.key_verses.get(&chapter).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn drift_report(&self, index: &VerseIndex) -> Vec<TableDrift> {
        let mut report = Vec::new();

        for (chapter, edges) in &self.theme_map {
            for edge in edges {
                if !index.contains(edge.key()) {
                    report.push(TableDrift { table: "theme_map", source_chapter: Some(*chapter), target: edge.key() });
                }
            }
        }

        for edge in &self.famous_verses {
            if !index.contains(edge.key()) {
                report.push(TableDrift { table: "famous_verses", source_chapter: None, target: edge.key() });
            }
        }

        for (chapter, verses) in &self.key_verses {
            for verse in verses {
                let key = VerseKey::new(*chapter, *verse);
                if !index.contains(key) {
                    report.push(TableDrift { table: "key_verses", source_chapter: Some(*chapter), target: key });
                }
            }
        }

        report
    }
}

/// Borrows the tables, it holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct CrossReferenceEngine<'a> {
    tables: &'a CrossReferenceTables,
    registry: &'a ChapterRegistry,
    index: &'a VerseIndex,
}

impl<'a> CrossReferenceEngine<'a> {
    pub fn new(tables: &'a CrossReferenceTables, registry: &'a ChapterRegistry, index: &'a VerseIndex) -> Self {
        CrossReferenceEngine { tables, registry, index }
    }

    fn to_related(&self, edge: &VerseEdge) -> Option<RelatedVerse> {
        let chapter_info = self.registry.get_chapter_info(edge.chapter)?;
        if !self.index.verse_exists(edge.chapter, edge.verse) {
            return None;
        }
        Some(RelatedVerse {
            chapter: edge.chapter,
            verse: edge.verse,
            title: format!("{} - {}.{}", chapter_info.title, edge.chapter, edge.verse),
            reason: edge.reason.clone(),
        })
    }

    /// Theme edges of the current chapter first, then famous verses, in
    /// table order. Never includes the query verse or a duplicate, at most
    /// five entries.
    pub fn get_related_verses(&self, chapter: u32, verse: u32) -> Vec<RelatedVerse> {
        let current = VerseKey::new(chapter, verse);
        let mut seen: HashSet<VerseKey> = HashSet::new();
        let mut related: Vec<RelatedVerse> = Vec::new();

        let candidates = self.tables
            .theme_edges(chapter)
            .iter()
            .chain(self.tables.famous_verses.iter());

        for edge in candidates {
            if related.len() >= MAX_RELATED_VERSES {
                break;
            }
            let key = edge.key();
            if key == current || seen.contains(&key) {
                continue;
            }
            if let Some(rel) = self.to_related(edge) {
                seen.insert(key);
                related.push(rel);
            }
        }

        related
    }

    /// The chapter's key verses in table order, without the current verse,
    /// at most three.
    pub fn get_popular_verses_in_chapter(&self, chapter: u32, current_verse: u32) -> Vec<PopularVerseRef> {
        if self.registry.get_chapter_info(chapter).is_none() {
            return Vec::new();
        }

        let mut seen: HashSet<u32> = HashSet::new();

        self.tables
            .key_verses(chapter)
            .iter()
            .copied()
            .filter(|v| *v != current_verse && self.index.verse_exists(chapter, *v))
            .filter(|v| seen.insert(*v))
            .take(MAX_POPULAR_VERSES)
            .map(|v| PopularVerseRef {
                verse: v,
                title: format!("Verse {}", v),
            })
            .collect()
    }
}
