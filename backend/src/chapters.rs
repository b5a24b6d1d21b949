//! Chapter Registry
//!
//! The static table of the 18 chapters, their verse counts and descriptive
//! metadata. Every other component validates identities against it.

use crate::app_settings::CHAPTERS_JSON;
use crate::types::{ChapterInfo, TableError};

pub const CHAPTER_COUNT: usize = 18;

#[derive(Debug, Clone)]
pub struct ChapterRegistry {
    chapters: Vec<ChapterInfo>,
}

impl ChapterRegistry {
    /// Parse the chapter table embedded in the crate.
    pub fn load() -> Result<Self, TableError> {
        Self::from_json(CHAPTERS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let chapters: Vec<ChapterInfo> = serde_json::from_str(json)
            .map_err(|source| TableError::Parse { name: "chapters.json", source })?;
        Self::from_chapters(chapters)
    }

    /// Checks that the chapters are numbered 1..=18 in order and that none is empty.
    pub fn from_chapters(chapters: Vec<ChapterInfo>) -> Result<Self, TableError> {
        if chapters.len() != CHAPTER_COUNT {
            return Err(TableError::ChapterCount { expected: CHAPTER_COUNT, found: chapters.len() });
        }

        for (idx, ch) in chapters.iter().enumerate() {
            if ch.number as usize != idx + 1 {
                return Err(TableError::ChapterNumbering { position: idx, number: ch.number });
            }
            if ch.verse_count == 0 {
                return Err(TableError::EmptyChapter(ch.number));
            }
        }

        Ok(ChapterRegistry { chapters })
    }

    /// Returns None for any chapter number outside 1..=18.
    pub fn get_chapter_info(&self, chapter_number: u32) -> Option<&ChapterInfo> {
        if chapter_number == 0 {
            return None;
        }
        self.chapters.get(chapter_number as usize - 1)
    }

    /// All chapters, ordered by number.
    pub fn get_all_chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    pub fn verse_count(&self, chapter_number: u32) -> Option<u32> {
        self.get_chapter_info(chapter_number).map(|ch| ch.verse_count)
    }

    pub fn total_verse_count(&self) -> u32 {
        self.chapters.iter().map(|ch| ch.verse_count).sum()
    }

    /// "Chapter 2: Sankhya Yoga", or just "Chapter 2" if unknown.
    pub fn get_chapter_link_text(&self, chapter_number: u32) -> String {
        match self.get_chapter_info(chapter_number) {
            Some(ch) => format!("Chapter {}: {}", chapter_number, ch.title),
            None => format!("Chapter {}", chapter_number),
        }
    }

    pub fn get_chapter_title_hindi(&self, chapter_number: u32) -> String {
        match self.get_chapter_info(chapter_number) {
            Some(ch) => ch.title_hindi.clone(),
            None => format!("अध्याय {}", chapter_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ChapterRegistry {
        ChapterRegistry::load().expect("embedded chapter table")
    }

    #[test]
    fn test_all_chapters_present_and_ordered() {
        let reg = registry();
        let chapters = reg.get_all_chapters();
        assert_eq!(chapters.len(), 18);
        for (idx, ch) in chapters.iter().enumerate() {
            assert_eq!(ch.number as usize, idx + 1);
        }
        for n in 1..=18 {
            assert!(reg.get_chapter_info(n).is_some());
        }
    }

    #[test]
    fn test_out_of_range_is_none() {
        let reg = registry();
        assert!(reg.get_chapter_info(0).is_none());
        assert!(reg.get_chapter_info(19).is_none());
        assert!(reg.get_chapter_info(u32::MAX).is_none());
    }

    #[test]
    fn test_verse_counts() {
        let reg = registry();
        let expected = [47, 72, 43, 42, 29, 47, 30, 28, 34, 42, 55, 20, 35, 27, 20, 24, 28, 78];
        for (idx, count) in expected.iter().enumerate() {
            assert_eq!(reg.verse_count(idx as u32 + 1), Some(*count));
        }
        assert_eq!(reg.total_verse_count(), 701);
    }

    #[test]
    fn test_link_text_and_hindi_title() {
        let reg = registry();
        assert_eq!(reg.get_chapter_link_text(2), "Chapter 2: Sankhya Yoga");
        assert_eq!(reg.get_chapter_link_text(42), "Chapter 42");
        assert_eq!(reg.get_chapter_title_hindi(12), "भक्ति योग");
        assert_eq!(reg.get_chapter_title_hindi(0), "अध्याय 0");
    }

    #[test]
    fn test_rejects_bad_tables() {
        let mut chapters = registry().get_all_chapters().to_vec();

        chapters.swap(0, 1);
        assert!(matches!(
            ChapterRegistry::from_chapters(chapters.clone()),
            Err(TableError::ChapterNumbering { position: 0, number: 2 })
        ));

        chapters.swap(0, 1);
        chapters[4].verse_count = 0;
        assert!(matches!(
            ChapterRegistry::from_chapters(chapters.clone()),
            Err(TableError::EmptyChapter(5))
        ));

        chapters.pop();
        assert!(matches!(
            ChapterRegistry::from_chapters(chapters),
            Err(TableError::ChapterCount { expected: 18, found: 17 })
        ));

        assert!(matches!(
            ChapterRegistry::from_json("not json"),
            Err(TableError::Parse { .. })
        ));
    }
}
