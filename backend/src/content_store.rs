//! Content Resolver
//!
//! Maps a verse key to its pre-authored text. The text itself lives in an
//! external store, the resolver only checks identity and presence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::logger::{debug, error};
use crate::types::{VerseContent, VerseKey};
use crate::verse_index::VerseIndex;

lazy_static! {
    // No leading zeros, fetch() only reads "<chapter>/<verse>.json".
    static ref RE_CONTENT_FILE_NAME: Regex = Regex::new(r"^([1-9]\d*)\.json$").unwrap();
    static ref RE_CHAPTER_DIR_NAME: Regex = Regex::new(r"^[1-9]\d*$").unwrap();
}

/// A per-verse content source keyed by `(chapter, verse)`.
///
/// `Ok(None)` means the store has no record for the key, `Err` is reserved
/// for the store failing to answer.
pub trait VerseContentStore: Send + Sync {
    fn fetch(&self, key: VerseKey) -> Result<Option<VerseContent>>;

    /// Keys the store holds a record for, in chapter-major order.
    fn available_keys(&self) -> Result<Vec<VerseKey>>;
}

/// File-backed store, one JSON file per verse at `<root>/<chapter>/<verse>.json`.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    root: PathBuf,
}

impl DirContentStore {
    pub fn new(root: &Path) -> Self {
        DirContentStore { root: root.to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn verse_path(&self, key: VerseKey) -> PathBuf {
        self.root
            .join(key.chapter.to_string())
            .join(format!("{}.json", key.verse))
    }
}

impl VerseContentStore for DirContentStore {
    fn fetch(&self, key: VerseKey) -> Result<Option<VerseContent>> {
        let path = self.verse_path(key);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read verse content: {}", path.display()))?;
        let content: VerseContent = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse verse content: {}", path.display()))?;
        Ok(Some(content))
    }

    fn available_keys(&self) -> Result<Vec<VerseKey>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys: Vec<VerseKey> = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(2).max_depth(2) {
            let entry = entry
                .with_context(|| format!("Failed to list content dir: {}", self.root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let verse = match RE_CONTENT_FILE_NAME.captures(&file_name) {
                Some(caps) => caps[1].parse::<u32>().ok(),
                None => None,
            };

            let chapter = entry.path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .filter(|n| RE_CHAPTER_DIR_NAME.is_match(n))
                .and_then(|n| n.parse::<u32>().ok());

            if let (Some(chapter), Some(verse)) = (chapter, verse) {
                keys.push(VerseKey::new(chapter, verse));
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// In-memory store, for tests and for content assembled at build time.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    records: BTreeMap<VerseKey, VerseContent>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        MemoryContentStore::default()
    }

    pub fn insert(&mut self, key: VerseKey, content: VerseContent) {
        self.records.insert(key, content);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(VerseKey, VerseContent)> for MemoryContentStore {
    fn from_iter<I: IntoIterator<Item = (VerseKey, VerseContent)>>(iter: I) -> Self {
        MemoryContentStore { records: iter.into_iter().collect() }
    }
}

impl VerseContentStore for MemoryContentStore {
    fn fetch(&self, key: VerseKey) -> Result<Option<VerseContent>> {
        Ok(self.records.get(&key).cloned())
    }

    fn available_keys(&self) -> Result<Vec<VerseKey>> {
        Ok(self.records.keys().copied().collect())
    }
}

pub struct ContentResolver {
    index: VerseIndex,
    store: Box<dyn VerseContentStore>,
}

impl ContentResolver {
    pub fn new(index: VerseIndex, store: Box<dyn VerseContentStore>) -> Self {
        ContentResolver { index, store }
    }

    /// None for keys outside the index and for keys the store has no
    /// record of. Store failures are logged and also reported as None.
    pub fn get_verse_content(&self, chapter: u32, verse: u32) -> Option<VerseContent> {
        let key = VerseKey::new(chapter, verse);
        if !self.index.contains(key) {
            return None;
        }

        match self.store.fetch(key) {
            Ok(Some(content)) => Some(content),
            Ok(None) => {
                debug(&format!("No content record for verse {}", key));
                None
            }
            Err(e) => {
                error(&format!("Content store failed for verse {}: {:#}", key, e));
                None
            }
        }
    }

    /// Valid keys without a content record, in chapter-major order.
    pub fn missing_verse_keys(&self) -> Result<Vec<VerseKey>> {
        let available = self.store.available_keys()?;
        let mut missing = Vec::new();
        let mut available_iter = available.iter().peekable();

        // Both sequences are sorted, walk them together.
        for key in self.index.iter_verse_keys() {
            while let Some(k) = available_iter.peek() {
                if **k < key {
                    available_iter.next();
                } else {
                    break;
                }
            }
            if available_iter.peek() != Some(&&key) {
                missing.push(key);
            }
        }

        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::ChapterRegistry;

    fn sample_content(english: &str) -> VerseContent {
        VerseContent {
            sanskrit: "कर्मण्येवाधिकारस्ते मा फलेषु कदाचन".to_string(),
            romanized: "karmaṇy evādhikāras te mā phaleṣu kadācana".to_string(),
            english: english.to_string(),
            word_by_word: "karmaṇi — in prescribed duties; eva — certainly".to_string(),
        }
    }

    fn index() -> VerseIndex {
        VerseIndex::new(&ChapterRegistry::load().unwrap())
    }

    fn write_verse(root: &Path, key: VerseKey, json: &str) {
        let dir = root.join(key.chapter.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.json", key.verse)), json).unwrap();
    }

    #[test]
    fn test_dir_store_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let key = VerseKey::new(2, 47);
        let json = serde_json::to_string(&sample_content("You have a right to action")).unwrap();
        write_verse(dir.path(), key, &json);

        let store = DirContentStore::new(dir.path());
        let content = store.fetch(key).unwrap().unwrap();
        assert_eq!(content.english, "You have a right to action");

        assert!(store.fetch(VerseKey::new(2, 48)).unwrap().is_none());
    }

    #[test]
    fn test_dir_store_malformed_record_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let key = VerseKey::new(3, 1);
        write_verse(dir.path(), key, "{\"sanskrit\": ");

        let store = DirContentStore::new(dir.path());
        assert!(store.fetch(key).is_err());

        let resolver = ContentResolver::new(index(), Box::new(store));
        assert!(resolver.get_verse_content(3, 1).is_none());
    }

    #[test]
    fn test_dir_store_available_keys() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&sample_content("x")).unwrap();
        write_verse(dir.path(), VerseKey::new(2, 47), &json);
        write_verse(dir.path(), VerseKey::new(1, 1), &json);
        write_verse(dir.path(), VerseKey::new(10, 2), &json);
        fs::write(dir.path().join("1").join("notes.txt"), "ignored").unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("drafts").join("5.json"), &json).unwrap();

        let store = DirContentStore::new(dir.path());
        let keys = store.available_keys().unwrap();
        assert_eq!(keys, vec![VerseKey::new(1, 1), VerseKey::new(2, 47), VerseKey::new(10, 2)]);
    }

    #[test]
    fn test_dir_store_ignores_zero_padded_names() {
        let dir = tempfile::tempdir().unwrap();
        let json = serde_json::to_string(&sample_content("x")).unwrap();
        fs::create_dir_all(dir.path().join("01")).unwrap();
        fs::write(dir.path().join("01").join("01.json"), &json).unwrap();
        fs::create_dir_all(dir.path().join("2")).unwrap();
        fs::write(dir.path().join("2").join("047.json"), &json).unwrap();

        let store = DirContentStore::new(dir.path());
        assert!(store.available_keys().unwrap().is_empty());

        let resolver = ContentResolver::new(index(), Box::new(store));
        assert!(resolver.get_verse_content(1, 1).is_none());
        let missing = resolver.missing_verse_keys().unwrap();
        assert!(missing.contains(&VerseKey::new(1, 1)));
        assert!(missing.contains(&VerseKey::new(2, 47)));
    }

    #[test]
    fn test_dir_store_missing_root() {
        let store = DirContentStore::new(Path::new("/nonexistent/gita/content"));
        assert!(store.available_keys().unwrap().is_empty());
        assert!(store.fetch(VerseKey::new(1, 1)).unwrap().is_none());
    }

    #[test]
    fn test_resolver_checks_identity_first() {
        let mut store = MemoryContentStore::new();
        // A record outside the identity space must never surface.
        store.insert(VerseKey::new(1, 48), sample_content("stray"));
        store.insert(VerseKey::new(1, 47), sample_content("last of chapter one"));

        let resolver = ContentResolver::new(index(), Box::new(store));
        assert!(resolver.get_verse_content(1, 48).is_none());
        assert!(resolver.get_verse_content(0, 0).is_none());
        assert_eq!(
            resolver.get_verse_content(1, 47).map(|c| c.english),
            Some("last of chapter one".to_string())
        );
        assert!(resolver.get_verse_content(1, 46).is_none());
    }

    #[test]
    fn test_missing_verse_keys() {
        let idx = index();
        let store: MemoryContentStore = idx
            .iter_verse_keys()
            .filter(|k| !(k.chapter == 2 && k.verse == 47) && k.chapter != 18)
            .map(|k| (k, sample_content("x")))
            .collect();

        let resolver = ContentResolver::new(idx, Box::new(store));
        let missing = resolver.missing_verse_keys().unwrap();
        assert_eq!(missing.len(), 1 + 78);
        assert_eq!(missing[0], VerseKey::new(2, 47));
        assert_eq!(missing[1], VerseKey::new(18, 1));
    }
}
