//! Verse Identity Index
//!
//! Enumerates every valid `(chapter, verse)` key and computes adjacency
//! across chapter boundaries. Keys are laid out chapter-major, so each key
//! has a 0-based position and adjacency is position ± 1.

use crate::chapters::ChapterRegistry;
use crate::types::{AdjacentVerses, VerseKey};

#[derive(Debug, Clone)]
pub struct VerseIndex {
    // verse_counts[c - 1] is the verse count of chapter c
    verse_counts: Vec<u32>,
    // offsets[c - 1] is the number of verses before chapter c
    offsets: Vec<usize>,
    total: usize,
}

impl VerseIndex {
    pub fn new(registry: &ChapterRegistry) -> Self {
        let verse_counts: Vec<u32> = registry
            .get_all_chapters()
            .iter()
            .map(|ch| ch.verse_count)
            .collect();

        let mut offsets = Vec::with_capacity(verse_counts.len());
        let mut total = 0usize;
        for count in &verse_counts {
            offsets.push(total);
            total += *count as usize;
        }

        VerseIndex { verse_counts, offsets, total }
    }

    pub fn verse_exists(&self, chapter: u32, verse: u32) -> bool {
        if chapter == 0 || verse == 0 {
            return false;
        }
        match self.verse_counts.get(chapter as usize - 1) {
            Some(count) => verse <= *count,
            None => false,
        }
    }

    pub fn contains(&self, key: VerseKey) -> bool {
        self.verse_exists(key.chapter, key.verse)
    }

    pub fn total_verses(&self) -> usize {
        self.total
    }

    /// 0-based position of the key in chapter-major order.
    pub fn position(&self, key: VerseKey) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        Some(self.offsets[key.chapter as usize - 1] + key.verse as usize - 1)
    }

    pub fn key_at(&self, position: usize) -> Option<VerseKey> {
        if position >= self.total {
            return None;
        }
        // First chapter whose offset is past the position, minus one.
        let idx = self.offsets.partition_point(|&o| o <= position) - 1;
        Some(VerseKey {
            chapter: idx as u32 + 1,
            verse: (position - self.offsets[idx]) as u32 + 1,
        })
    }

    pub fn iter_verse_keys(&self) -> impl Iterator<Item = VerseKey> + '_ {
        self.verse_counts
            .iter()
            .enumerate()
            .flat_map(|(idx, count)| {
                (1..=*count).map(move |verse| VerseKey::new(idx as u32 + 1, verse))
            })
    }

    pub fn get_all_verse_keys(&self) -> Vec<VerseKey> {
        self.iter_verse_keys().collect()
    }

    /// Both sides are None when the key itself is out of range.
    pub fn get_adjacent_verses(&self, chapter: u32, verse: u32) -> AdjacentVerses {
        let position = match self.position(VerseKey::new(chapter, verse)) {
            Some(p) => p,
            None => {
                return AdjacentVerses { previous_verse: None, next_verse: None };
            }
        };

        AdjacentVerses {
            previous_verse: position.checked_sub(1).and_then(|p| self.key_at(p)),
            next_verse: self.key_at(position + 1),
        }
    }

    /// (verse, verse count of its chapter), e.g. "verse 5 of 47".
    pub fn verse_progress(&self, key: VerseKey) -> Option<(u32, u32)> {
        if !self.contains(key) {
            return None;
        }
        Some((key.verse, self.verse_counts[key.chapter as usize - 1]))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn index() -> VerseIndex {
        VerseIndex::new(&ChapterRegistry::load().unwrap())
    }

    #[test]
    fn test_verse_exists_ranges() {
        let idx = index();
        assert!(idx.verse_exists(1, 1));
        assert!(idx.verse_exists(1, 47));
        assert!(!idx.verse_exists(1, 48));
        assert!(!idx.verse_exists(1, 0));
        assert!(!idx.verse_exists(0, 1));
        assert!(!idx.verse_exists(19, 1));
        assert!(idx.verse_exists(18, 78));
        assert!(!idx.verse_exists(18, 79));
    }

    #[test]
    fn test_all_keys_exhaustive_and_unique() {
        let idx = index();
        let keys = idx.get_all_verse_keys();
        assert_eq!(keys.len(), 701);
        assert_eq!(keys.len(), idx.total_verses());

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());

        assert_eq!(keys[0], VerseKey::new(1, 1));
        assert_eq!(keys[46], VerseKey::new(1, 47));
        assert_eq!(keys[47], VerseKey::new(2, 1));
        assert_eq!(keys[700], VerseKey::new(18, 78));

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(sorted, keys);
    }

    #[test]
    fn test_position_and_key_at_agree() {
        let idx = index();
        for (pos, key) in idx.iter_verse_keys().enumerate() {
            assert_eq!(idx.position(key), Some(pos));
            assert_eq!(idx.key_at(pos), Some(key));
        }
        assert_eq!(idx.key_at(700), Some(VerseKey::new(18, 78)));
        assert_eq!(idx.key_at(idx.total_verses()), None);
        assert_eq!(idx.position(VerseKey::new(2, 73)), None);
    }

    #[test]
    fn test_adjacency_boundaries() {
        let idx = index();

        let first = idx.get_adjacent_verses(1, 1);
        assert_eq!(first.previous_verse, None);
        assert_eq!(first.next_verse, Some(VerseKey::new(1, 2)));

        let last = idx.get_adjacent_verses(18, 78);
        assert_eq!(last.previous_verse, Some(VerseKey::new(18, 77)));
        assert_eq!(last.next_verse, None);

        let end_of_one = idx.get_adjacent_verses(1, 47);
        assert_eq!(end_of_one.next_verse, Some(VerseKey::new(2, 1)));

        let start_of_two = idx.get_adjacent_verses(2, 1);
        assert_eq!(start_of_two.previous_verse, Some(VerseKey::new(1, 47)));
    }

    #[test]
    fn test_adjacency_invalid_key() {
        let idx = index();
        for (c, v) in [(0, 1), (1, 0), (1, 48), (19, 1), (18, 79)] {
            let adj = idx.get_adjacent_verses(c, v);
            assert_eq!(adj.previous_verse, None);
            assert_eq!(adj.next_verse, None);
        }
    }

    #[test]
    fn test_adjacency_round_trip() {
        let idx = index();
        for key in idx.iter_verse_keys() {
            let adj = idx.get_adjacent_verses(key.chapter, key.verse);
            if let Some(next) = adj.next_verse {
                let back = idx.get_adjacent_verses(next.chapter, next.verse);
                assert_eq!(back.previous_verse, Some(key));
            }
            if let Some(prev) = adj.previous_verse {
                let fwd = idx.get_adjacent_verses(prev.chapter, prev.verse);
                assert_eq!(fwd.next_verse, Some(key));
            }
        }
    }

    #[test]
    fn test_verse_progress() {
        let idx = index();
        assert_eq!(idx.verse_progress(VerseKey::new(6, 5)), Some((5, 47)));
        assert_eq!(idx.verse_progress(VerseKey::new(6, 48)), None);
    }
}
