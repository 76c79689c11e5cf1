//! The aggregate document and how it reaches disk.

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use horadric_core::{CleanedItem, BLOCK_DELIMITER};

/// Default file name when the caller names only a folder.
pub const DEFAULT_OUTPUT_NAME: &str = "output.txt";

/// Ordered tooltip blocks of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateDocument {
    items: Vec<CleanedItem>,
}

impl AggregateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: CleanedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[CleanedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Blocks separated by a `---` line, newline-terminated.
    pub fn render(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        let separator = format!("\n{BLOCK_DELIMITER}\n");
        let mut text = self
            .items
            .iter()
            .map(CleanedItem::render_block)
            .collect::<Vec<_>>()
            .join(&separator);
        text.push('\n');
        text
    }
}

impl FromIterator<CleanedItem> for AggregateDocument {
    fn from_iter<T: IntoIterator<Item = CleanedItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Atomic write off the async runtime's worker threads.
pub async fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let target = path.to_path_buf();
    let body = contents.to_string();
    tokio::task::spawn_blocking(move || horadric_core::write_atomic(&target, &body))
        .await
        .map_err(io::Error::other)??;
    info!(path = %path.display(), bytes = contents.len(), "Wrote output");
    Ok(())
}

/// Resolve where the aggregate goes.
///
/// No path or an existing directory means `<dir>/output.txt`; a path without
/// an extension gets `.txt`. Parent directories are created.
pub fn ensure_txt_path(path: Option<&Path>, default_dir: &Path) -> io::Result<PathBuf> {
    let resolved = match path {
        None => default_dir.join(DEFAULT_OUTPUT_NAME),
        Some(p) if p.as_os_str().is_empty() => default_dir.join(DEFAULT_OUTPUT_NAME),
        Some(p) if p.is_dir() => p.join(DEFAULT_OUTPUT_NAME),
        Some(p) if p.extension().is_none() => p.with_extension("txt"),
        Some(p) => p.to_path_buf(),
    };

    if let Some(parent) = resolved.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(resolved)
}
