use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use horadric_core::{Category, BLOCK_DELIMITER};
use horadric_understanding::Categorizer;

use crate::record::CatalogRecord;

static CATEGORY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[\s*category\s*:\s*(\w+)\s*\]$").unwrap());

/// Older outputs also carried a display color tag.
static COLOR_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[\s*color\s*:\s*#[0-9a-f]{6}\s*\]$").unwrap());

/// Split an aggregate document on lines that are exactly the delimiter.
///
/// Blocks are returned trimmed; empty ones are skipped.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let mut flush = |current: &mut Vec<&str>| {
        let block = current.join("\n").trim().to_string();
        if !block.is_empty() {
            blocks.push(block);
        }
        current.clear();
    };

    for line in text.lines() {
        if line.trim() == BLOCK_DELIMITER {
            flush(&mut current);
        } else {
            current.push(line);
        }
    }
    flush(&mut current);
    blocks
}

/// Separate tag lines from tooltip text, returning the text and the tagged category.
fn strip_tags(block: &str) -> (String, Option<Category>) {
    let mut tagged = None;
    let mut lines = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim();
        if let Some(caps) = CATEGORY_TAG.captures(trimmed) {
            tagged = caps[1].parse::<Category>().ok();
        } else if !COLOR_TAG.is_match(trimmed) {
            lines.push(trimmed);
        }
    }
    (lines.join("\n").trim().to_string(), tagged)
}

/// Parse one aggregate file into records.
///
/// An embedded `[CATEGORY: X]` tag wins; a missing, unknown or `UNKNOWN` tag
/// falls back to the categorizer.
pub fn parse_document(text: &str, source: &Path, categorizer: &Categorizer) -> Vec<CatalogRecord> {
    split_blocks(text)
        .iter()
        .filter_map(|block| {
            let (raw, tagged) = strip_tags(block);
            if raw.is_empty() {
                return None;
            }
            let category = match tagged {
                Some(category) if category != Category::Unknown => category,
                _ => {
                    let lines: Vec<&str> = raw.lines().collect();
                    let derived = categorizer.classify(&lines);
                    debug!(source = %source.display(), category = %derived, "Re-derived category");
                    derived
                }
            };
            Some(CatalogRecord::new(raw, category, source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_only_on_whole_delimiter_lines() {
        let text = "A\n---\nB --- still B\n  ---  \n\n---\nC\n";
        assert_eq!(split_blocks(text), vec!["A", "B --- still B", "C"]);
    }

    #[test]
    fn tag_wins_and_missing_tag_is_derived() {
        let text = "Stone of Jordan\nRing\n[CATEGORY: MISC]\n---\nScarab Husk\nSocketed (3)\n---\nOdd\n[CATEGORY: NOPE]";
        let records = parse_document(text, Path::new("hero.txt"), &Categorizer::new());
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].category, Category::Misc);
        assert_eq!(records[0].raw, "Stone of Jordan\nRing");
        assert_eq!(records[1].category, Category::Armor);
        assert_eq!(records[2].category, Category::Unknown);
    }

    #[test]
    fn color_tags_are_dropped() {
        let text = "Ber Rune\n[COLOR: #FFA500]\n[CATEGORY: RUNE]";
        let records = parse_document(text, Path::new("s.txt"), &Categorizer::new());
        assert_eq!(records[0].raw, "Ber Rune");
    }

    #[test]
    fn tag_only_block_is_skipped() {
        let records = parse_document("[CATEGORY: RUNE]\n---\n", Path::new("s.txt"), &Categorizer::new());
        assert!(records.is_empty());
    }
}
