use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ImageFailure, UnknownCategory};

/// Line separating tooltip blocks in an aggregate document.
pub const BLOCK_DELIMITER: &str = "---";

/// One screenshot queued for recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub index: usize,
    pub path: PathBuf,
}

impl ImageTask {
    pub fn new(index: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            index,
            path: path.into(),
        }
    }

    /// File name for logs and progress messages.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Closed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Weapon,
    Armor,
    Ring,
    Amulet,
    Jewel,
    Charm,
    Gem,
    Rune,
    Runeword,
    Misc,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Weapon,
        Category::Armor,
        Category::Ring,
        Category::Amulet,
        Category::Jewel,
        Category::Charm,
        Category::Gem,
        Category::Rune,
        Category::Runeword,
        Category::Misc,
        Category::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "WEAPON",
            Self::Armor => "ARMOR",
            Self::Ring => "RING",
            Self::Amulet => "AMULET",
            Self::Jewel => "JEWEL",
            Self::Charm => "CHARM",
            Self::Gem => "GEM",
            Self::Rune => "RUNE",
            Self::Runeword => "RUNEWORD",
            Self::Misc => "MISC",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(wanted.to_string()))
    }
}

/// Token accounting returned by the provider, when it reports any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// Tooltip text after noise removal, with its category.
///
/// Never empty: construction fails when there are no lines left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedItem {
    lines: Vec<String>,
    category: Category,
}

impl CleanedItem {
    pub fn new(lines: Vec<String>, category: Category) -> Option<Self> {
        if lines.iter().all(|l| l.trim().is_empty()) {
            return None;
        }
        Some(Self { lines, category })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// First non-blank line, which is the item's display name.
    pub fn name(&self) -> &str {
        self.lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .unwrap_or_default()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Block as written to the aggregate document, with its trailing tag line.
    pub fn render_block(&self) -> String {
        format!("{}\n[CATEGORY: {}]", self.text(), self.category)
    }
}

/// Result of pushing one `ImageTask` through the requester.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub index: usize,
    pub result: Result<String, ImageFailure>,
    pub attempts: u32,
    pub elapsed: Duration,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("armor".parse::<Category>(), Ok(Category::Armor));
        assert_eq!(" RuneWord ".parse::<Category>(), Ok(Category::Runeword));
        assert!("potion".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_uppercase() {
        let json = serde_json::to_string(&Category::Amulet).unwrap();
        assert_eq!(json, "\"AMULET\"");
    }

    #[test]
    fn cleaned_item_rejects_empty() {
        assert!(CleanedItem::new(vec![], Category::Misc).is_none());
        assert!(CleanedItem::new(vec!["  ".into()], Category::Misc).is_none());
    }

    #[test]
    fn cleaned_item_renders_tag_line() {
        let item = CleanedItem::new(
            vec!["Shako".into(), "Harlequin Crest".into()],
            Category::Armor,
        )
        .unwrap();
        assert_eq!(item.name(), "Shako");
        assert_eq!(item.render_block(), "Shako\nHarlequin Crest\n[CATEGORY: ARMOR]");
    }

    #[test]
    fn task_file_name() {
        let task = ImageTask::new(0, "/shots/stash_01.png");
        assert_eq!(task.file_name(), "stash_01.png");
    }
}
