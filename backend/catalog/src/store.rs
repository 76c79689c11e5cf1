//! In-memory catalog with a JSON cache on disk.
//!
//! Every load or reload replaces the record set wholesale; nothing is patched
//! in place except through `remove`, which also rewrites the source file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use horadric_core::{BLOCK_DELIMITER, Category};
use horadric_understanding::Categorizer;

use crate::error::CatalogError;
use crate::parser::parse_document;
use crate::query::Query;
use crate::record::CatalogRecord;

pub const CACHE_VERSION: u32 = 1;

/// On-disk cache layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    /// Paths passed to the load that produced these records.
    pub sources: Vec<PathBuf>,
    pub records: Vec<CatalogRecord>,
}

pub struct CatalogStore {
    cache_path: PathBuf,
    categorizer: Categorizer,
    sources: Vec<PathBuf>,
    records: Vec<CatalogRecord>,
}

impl CatalogStore {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            categorizer: Categorizer::new(),
            sources: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse aggregate files, or every `*.txt` in given directories, replacing
    /// the current catalog. Returns the record count.
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, CatalogError> {
        let mut records = Vec::new();
        for file in expand_paths(paths)? {
            let text = fs::read_to_string(&file).map_err(|e| CatalogError::io(&file, e))?;
            let parsed = parse_document(&text, &file, &self.categorizer);
            debug!(file = %file.display(), records = parsed.len(), "Parsed aggregate file");
            records.extend(parsed);
        }

        self.sources = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        self.records = records;
        info!(records = self.records.len(), "Catalog loaded");
        Ok(self.records.len())
    }

    /// Records matching every query term, optionally limited to one category,
    /// in insertion order. An empty query matches everything.
    pub fn search(&self, query: &str, category: Option<Category>) -> Vec<&CatalogRecord> {
        self.search_indices(query, category)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Like `search`, but yields positions usable with `remove`.
    pub fn search_indices(&self, query: &str, category: Option<Category>) -> Vec<usize> {
        let query = Query::parse(query);
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| category.is_none_or(|c| r.category == c))
            .filter(|(_, r)| query.matches(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-category counts, in category order, omitting empty categories.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|c| (*c, self.records.iter().filter(|r| r.category == *c).count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    pub fn save(&self) -> Result<(), CatalogError> {
        let cache = CacheFile {
            version: CACHE_VERSION,
            saved_at: Utc::now(),
            sources: self.sources.clone(),
            records: self.records.clone(),
        };
        let json = serde_json::to_string_pretty(&cache).map_err(|source| CatalogError::Cache {
            path: self.cache_path.clone(),
            source,
        })?;
        write_atomic(&self.cache_path, &json)?;
        info!(path = %self.cache_path.display(), records = self.records.len(), "Catalog cache saved");
        Ok(())
    }

    /// Replace the catalog with the cached one. A missing cache leaves it empty.
    pub fn reload(&mut self) -> Result<usize, CatalogError> {
        if !self.cache_path.exists() {
            debug!(path = %self.cache_path.display(), "No catalog cache");
            self.sources.clear();
            self.records.clear();
            return Ok(0);
        }

        let text = fs::read_to_string(&self.cache_path).map_err(|e| CatalogError::io(&self.cache_path, e))?;
        let cache: CacheFile = serde_json::from_str(&text).map_err(|source| CatalogError::Cache {
            path: self.cache_path.clone(),
            source,
        })?;
        if cache.version != CACHE_VERSION {
            return Err(CatalogError::CacheVersion {
                found: cache.version,
                expected: CACHE_VERSION,
            });
        }

        let mut records = cache.records;
        records.iter_mut().for_each(CatalogRecord::rebuild_index);
        self.sources = cache.sources;
        self.records = records;
        Ok(self.records.len())
    }

    /// Delete the cache file. Returns whether there was one.
    pub fn clear_cache(&self) -> Result<bool, CatalogError> {
        match fs::remove_file(&self.cache_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CatalogError::io(&self.cache_path, e)),
        }
    }

    /// Remove record `index` from memory and from its source file.
    ///
    /// The file is rewritten atomically from the remaining records, or deleted
    /// when none remain. Returns false for an out-of-range index, or when the
    /// block is no longer in its source file; the catalog is left as is then.
    pub fn remove(&mut self, index: usize) -> Result<bool, CatalogError> {
        let Some(record) = self.records.get(index) else {
            return Ok(false);
        };
        let source = record.source.clone();

        match fs::read_to_string(&source) {
            Ok(text) => {
                let mut siblings = parse_document(&text, &source, &self.categorizer);
                let Some(pos) = siblings.iter().position(|r| r.raw == record.raw) else {
                    warn!(file = %source.display(), name = %record.name, "Item not found in source file");
                    return Ok(false);
                };
                siblings.remove(pos);
                if siblings.is_empty() {
                    fs::remove_file(&source).map_err(|e| CatalogError::io(&source, e))?;
                    info!(file = %source.display(), "Removed last item; deleted file");
                } else {
                    let blocks: Vec<String> = siblings.iter().map(CatalogRecord::to_block).collect();
                    let separator = format!("\n{BLOCK_DELIMITER}\n");
                    write_atomic(&source, &format!("{}\n", blocks.join(&separator)))?;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %source.display(), "Source file is gone; removing from catalog only");
            }
            Err(e) => return Err(CatalogError::io(&source, e)),
        }

        self.records.remove(index);
        Ok(true)
    }
}

/// Files as given; directories expand to their `*.txt` files, sorted.
fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    for path in paths.iter().map(AsRef::as_ref) {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)
                .map_err(|e| CatalogError::io(path, e))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), CatalogError> {
    horadric_core::write_atomic(path, contents).map_err(|e| CatalogError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::split_blocks;

    const STASH: &str = "Harlequin Crest\nShako\n+2 to All Skills\n[CATEGORY: ARMOR]\n---\n\
                         Ber Rune\n[CATEGORY: RUNE]\n---\n\
                         Stone of Jordan\nRing\n+1 to All Skills\n[CATEGORY: RING]\n";

    fn setup() -> (tempfile::TempDir, CatalogStore, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Sorceress.txt");
        fs::write(&file, STASH).unwrap();
        let store = CatalogStore::new(dir.path().join("cache").join("catalog.json"));
        (dir, store, file)
    }

    #[test]
    fn search_finds_exactly_one_block() {
        let (_dir, mut store, file) = setup();
        assert_eq!(store.load(&[&file]).unwrap(), 3);

        let hits = store.search("jordan", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Stone of Jordan");
    }

    #[test]
    fn category_filter_without_matches_is_empty() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        assert!(store.search("", Some(Category::Weapon)).is_empty());
        assert_eq!(store.search("skills", Some(Category::Ring)).len(), 1);
        assert_eq!(store.search_indices("skills", None), vec![0, 2]);
    }

    #[test]
    fn empty_query_returns_all_in_order() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        let names: Vec<_> = store.search("  ", None).iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["Harlequin Crest", "Ber Rune", "Stone of Jordan"]);
        assert_eq!(store.search("sorceress", None).len(), 3);
    }

    #[test]
    fn save_then_reload_is_identical() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        let before = store.records().to_vec();
        store.save().unwrap();

        let mut fresh = CatalogStore::new(store.cache_path().to_path_buf());
        assert_eq!(fresh.reload().unwrap(), 3);
        assert_eq!(fresh.records(), before.as_slice());
        assert_eq!(fresh.sources(), [file]);
    }

    #[test]
    fn load_replaces_wholesale_and_expands_dirs() {
        let (dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();

        let other = dir.path().join("Barbarian.txt");
        fs::write(&other, "Ist Rune").unwrap();
        fs::write(dir.path().join("notes.md"), "Not an item").unwrap();

        assert_eq!(store.load(&[dir.path()]).unwrap(), 4);
        assert_eq!(store.records()[0].owner, "Barbarian");
        assert_eq!(store.records()[0].category, Category::Rune);

        assert_eq!(store.load(&[&other]).unwrap(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn counts_by_category() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        assert_eq!(
            store.category_counts(),
            vec![(Category::Armor, 1), (Category::Ring, 1), (Category::Rune, 1)]
        );
    }

    #[test]
    fn remove_rewrites_source_file() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();

        assert!(store.remove(1).unwrap());
        assert_eq!(store.len(), 2);
        let text = fs::read_to_string(&file).unwrap();
        assert!(!text.contains("Ber Rune"));
        assert_eq!(split_blocks(&text).len(), 2);

        assert!(!store.remove(10).unwrap());
    }

    #[test]
    fn remaining_blocks_keep_their_category_tags() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        assert!(store.remove(0).unwrap());

        let text = fs::read_to_string(&file).unwrap();
        assert_eq!(
            text,
            "Ber Rune\n[CATEGORY: RUNE]\n---\nStone of Jordan\nRing\n+1 to All Skills\n[CATEGORY: RING]\n"
        );
        assert_eq!(store.load(&[&file]).unwrap(), 2);
    }

    #[test]
    fn block_missing_from_source_is_not_removed() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        fs::write(&file, "Ber Rune\n[CATEGORY: RUNE]\n").unwrap();

        assert!(!store.remove(0).unwrap());
        assert_eq!(store.len(), 3);
        assert_eq!(fs::read_to_string(&file).unwrap(), "Ber Rune\n[CATEGORY: RUNE]\n");
    }

    #[test]
    fn removing_last_item_deletes_file() {
        let (dir, mut store, _file) = setup();
        let single = dir.path().join("Mule.txt");
        fs::write(&single, "Ber Rune\n[CATEGORY: RUNE]\n").unwrap();
        store.load(&[&single]).unwrap();

        assert!(store.remove(0).unwrap());
        assert!(!single.exists());
        assert!(store.is_empty());
    }

    #[test]
    fn reload_without_cache_is_empty_and_clear_reports_presence() {
        let (_dir, mut store, file) = setup();
        store.load(&[&file]).unwrap();
        assert_eq!(store.reload().unwrap(), 0);
        assert!(store.is_empty());

        store.save().unwrap();
        assert!(store.clear_cache().unwrap());
        assert!(!store.clear_cache().unwrap());
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let (_dir, mut store, _file) = setup();
        fs::create_dir_all(store.cache_path().parent().unwrap()).unwrap();
        fs::write(store.cache_path(), "{not json").unwrap();
        assert!(matches!(store.reload(), Err(CatalogError::Cache { .. })));
    }
}
