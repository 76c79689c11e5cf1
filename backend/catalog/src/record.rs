use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use horadric_core::Category;
use horadric_understanding::{detect_quality, ItemQuality};

static SOCKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsocketed\s*\((\d+)\)").unwrap());

/// One tooltip block loaded from an aggregate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Block text without tag lines.
    pub raw: String,
    /// First non-blank line.
    pub name: String,
    pub category: Category,
    /// Lowercased `raw`; rebuilt after deserializing.
    #[serde(skip)]
    pub search_text: String,
    /// Aggregate file the block came from.
    pub source: PathBuf,
    /// File stem of `source`: the character or stash the file belongs to.
    pub owner: String,
    pub ethereal: bool,
    pub sockets: Option<u8>,
    pub quality: ItemQuality,
}

impl CatalogRecord {
    pub fn new(raw: impl Into<String>, category: Category, source: &Path) -> Self {
        let raw = raw.into();
        let name = raw
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string();
        let owner = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let sockets = SOCKETS
            .captures(&raw)
            .and_then(|c| c[1].parse().ok());

        let mut record = Self {
            ethereal: raw.to_uppercase().contains("ETHEREAL"),
            quality: detect_quality(&raw, category),
            name,
            category,
            search_text: String::new(),
            source: source.to_path_buf(),
            owner,
            sockets,
            raw,
        };
        record.rebuild_index();
        record
    }

    pub fn rebuild_index(&mut self) {
        self.search_text = self.raw.to_lowercase();
    }

    /// Block as it appears in an aggregate file, tag line included.
    pub fn to_block(&self) -> String {
        format!("{}\n[CATEGORY: {}]", self.raw, self.category)
    }
}
