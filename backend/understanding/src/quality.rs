use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use horadric_core::Category;

/// Item rarity as far as it can be told from tooltip text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemQuality {
    Unique,
    Set,
    Rare,
    Magic,
    Crafted,
    Rune,
    Gem,
    Normal,
}

impl ItemQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Set => "set",
            Self::Rare => "rare",
            Self::Magic => "magic",
            Self::Crafted => "crafted",
            Self::Rune => "rune",
            Self::Gem => "gem",
            Self::Normal => "normal",
        }
    }
}

impl fmt::Display for ItemQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static UNIQUE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(unique|legendary)\b").unwrap());
static SET_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)\(\s*\d+\s+items?\s*\)|\bset (item|bonus)|\b(full|complete|partial) set\b|^set\s*:")
        .unwrap()
});
static CRAFTED_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcraft(ed)?\b").unwrap());
static RARE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\brare\b").unwrap());
static MAGIC_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmagic(al)?\b").unwrap());

/// Lines beyond which a weapon or armor piece is assumed to be rare.
const RARE_LINE_THRESHOLD: usize = 7;

/// Detect quality from a block's text and its category.
pub fn detect_quality(text: &str, category: Category) -> ItemQuality {
    match category {
        Category::Rune => return ItemQuality::Rune,
        Category::Gem => return ItemQuality::Gem,
        _ => {}
    }

    let line_count = text.lines().filter(|l| !l.trim().is_empty()).count();
    let is_gear = matches!(category, Category::Weapon | Category::Armor);

    if UNIQUE_WORD.is_match(text) {
        ItemQuality::Unique
    } else if SET_WORD.is_match(text) {
        ItemQuality::Set
    } else if CRAFTED_WORD.is_match(text) {
        ItemQuality::Crafted
    } else if RARE_WORD.is_match(text) || (is_gear && line_count > RARE_LINE_THRESHOLD) {
        ItemQuality::Rare
    } else if MAGIC_WORD.is_match(text) || text.matches('+').count() > 2 {
        ItemQuality::Magic
    } else {
        ItemQuality::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runes_and_gems_follow_category() {
        assert_eq!(detect_quality("Ber Rune", Category::Rune), ItemQuality::Rune);
        assert_eq!(detect_quality("Perfect Skull", Category::Gem), ItemQuality::Gem);
    }

    #[test]
    fn set_needs_a_real_marker() {
        let set = "Sigon's Gage\nGauntlets\n+10 to Strength (2 Items)";
        assert_eq!(detect_quality(set, Category::Armor), ItemQuality::Set);
        // "Socketed" is not a set marker.
        assert_eq!(detect_quality("Crystal Sword\nSocketed (4)", Category::Weapon), ItemQuality::Normal);
    }

    #[test]
    fn many_lines_of_gear_is_rare() {
        let text = "Doom Visage\nGrim Helm\nDefense: 200\n+2 to Barbarian Skills\n\
                    +20% Faster Hit Recovery\n+30 to Life\n+10 to Strength\nRepairs 1 Durability";
        assert_eq!(detect_quality(text, Category::Armor), ItemQuality::Rare);
    }

    #[test]
    fn pluses_mean_magic() {
        let text = "Jeweler's Ring of the Whale\n+1 to Light Radius\n+60 to Life\n+5 to Mana";
        assert_eq!(detect_quality(text, Category::Ring), ItemQuality::Magic);
        assert_eq!(detect_quality("Short Sword", Category::Weapon), ItemQuality::Normal);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ItemQuality::Crafted).unwrap(), "\"crafted\"");
    }
}
