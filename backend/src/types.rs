use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Deserialize};
use thiserror::Error;

lazy_static! {
    // 2.47; 2:47; 2 47; BG 2.47; Gita 18.66
    static ref RE_VERSE_REF: Regex = Regex::new(
        r"(?i)^\s*(?:(?:bg|gita)[ \.]*)?(\d{1,3})\s*[\.: ]\s*(\d{1,3})\s*$"
    ).unwrap();
}

/// The `(chapter, verse)` pair identifying one verse.
///
/// A key is only a syntactic identity, use `VerseIndex::verse_exists()` to
/// check it against the chapter registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseKey {
    pub chapter: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(chapter: u32, verse: u32) -> Self {
        VerseKey { chapter, verse }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid verse reference: {0}")]
pub struct ParseVerseKeyError(String);

impl FromStr for VerseKey {
    type Err = ParseVerseKeyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let caps = RE_VERSE_REF.captures(s)
            .ok_or_else(|| ParseVerseKeyError(s.to_string()))?;

        let chapter = caps[1].parse::<u32>().map_err(|_| ParseVerseKeyError(s.to_string()))?;
        let verse = caps[2].parse::<u32>().map_err(|_| ParseVerseKeyError(s.to_string()))?;

        Ok(VerseKey { chapter, verse })
    }
}

/// Errors raised while loading the static tables. These abort startup.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to parse {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected {expected} chapters, found {found}")]
    ChapterCount { expected: usize, found: usize },
    #[error("Chapter at position {position} has number {number}, chapters must be numbered 1..=18 in order")]
    ChapterNumbering { position: usize, number: u32 },
    #[error("Chapter {0} declares zero verses")]
    EmptyChapter(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub number: u32,
    pub title: String,
    pub title_hindi: String,
    pub description: String,
    pub summary: String,
    pub verse_count: u32,
}

/// Previous and next verse, crossing chapter boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentVerses {
    pub previous_verse: Option<VerseKey>,
    pub next_verse: Option<VerseKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseContent {
    pub sanskrit: String,
    pub romanized: String,
    pub english: String,
    #[serde(rename = "wordByWord")]
    pub word_by_word: String,
}

impl VerseContent {
    /// The English translation cut to `max_chars` characters, with "..."
    /// appended when it was longer.
    pub fn english_preview(&self, max_chars: usize) -> String {
        if self.english.chars().count() <= max_chars {
            return self.english.clone();
        }
        let cut: String = self.english.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
}

/// Language code to video, e.g. "en" => { video_id, title }.
pub type VideoSourceMap = BTreeMap<String, VideoSource>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedVerse {
    pub chapter: u32,
    pub verse: u32,
    pub title: String,
    pub reason: String,
}

impl RelatedVerse {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.chapter, self.verse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularVerseRef {
    pub verse: u32,
    pub title: String,
}

/// Everything a verse page needs, resolved from one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersePage {
    pub key: VerseKey,
    pub chapter: ChapterInfo,
    pub content: VerseContent,
    pub adjacent: AdjacentVerses,
    pub videos: VideoSourceMap,
    pub default_video_language: Option<String>,
    pub related_verses: Vec<RelatedVerse>,
    pub popular_verses: Vec<PopularVerseRef>,
}
