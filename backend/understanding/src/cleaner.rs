use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use horadric_core::Category;

/// Control-hint lines the game draws under a tooltip.
pub const FOOTER_PHRASES: &[&str] = &[
    "Shift + Left Click to Unequip",
    "Shift + Left Click to Equip",
    "Ctrl + Left Click to Move",
    "Hold Shift to Compare",
    "Left Click to Cast",
    "Keep in Inventory to Gain Bonus",
    "Can be Inserted into Socketed Items",
    "Right Click to Use",
    "Right Click to Open",
    "Right Click to Read",
];

/// Stat lines that carry no digits or punctuation but are still stats.
const BARE_STAT_LINES: &[&str] = &[
    "Indestructible",
    "Cannot Be Frozen",
    "Knockback",
    "Prevent Monster Heal",
    "Ignore Target's Defense",
    "Half Freeze Duration",
    "Hit Blinds Target",
    "Slain Monsters Rest in Peace",
    "Unidentified",
    "Ethereal",
];

static CATEGORY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[\s*category\s*:\s*([a-z]+)\s*\]$").unwrap());

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*$").unwrap());

static SET_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*\d+\s+items?\s*\)|\bset bonus|\b(full|complete) set\b").unwrap()
});

/// Canonical form for whole-line phrase comparison: uppercase words, `+` as
/// its own token, punctuation and hyphens treated as spaces.
pub fn normalize_phrase(line: &str) -> String {
    let mut spaced = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '+' {
            spaced.push_str(" + ");
        } else if c.is_alphanumeric() {
            spaced.extend(c.to_uppercase());
        } else {
            spaced.push(' ');
        }
    }
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cutoff rule for the "other set items" list some set tooltips end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerPolicy {
    pub enabled: bool,
    /// Shortest run of trailing bare-name lines that is cut.
    pub min_run: usize,
    /// Only cut when the block shows a set marker such as "(2 Items)".
    pub require_set_marker: bool,
}

impl Default for TrailerPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            min_run: 2,
            require_set_marker: true,
        }
    }
}

/// Lines that survived cleaning plus what was taken out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutput {
    pub lines: Vec<String>,
    /// Category the model appended as `[CATEGORY: X]`, if it named a known one.
    pub model_category: Option<Category>,
    pub footers_removed: usize,
    pub trailer_removed: usize,
}

pub struct ResponseCleaner {
    footers: HashSet<String>,
    bare_stats: HashSet<String>,
    policy: TrailerPolicy,
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCleaner {
    pub fn new() -> Self {
        Self::with_policy(TrailerPolicy::default())
    }

    pub fn with_policy(policy: TrailerPolicy) -> Self {
        Self {
            footers: FOOTER_PHRASES.iter().map(|p| normalize_phrase(p)).collect(),
            bare_stats: BARE_STAT_LINES.iter().map(|p| normalize_phrase(p)).collect(),
            policy,
        }
    }

    /// Add a footer phrase on top of the built-in table.
    pub fn with_footer(mut self, phrase: &str) -> Self {
        self.footers.insert(normalize_phrase(phrase));
        self
    }

    pub fn policy(&self) -> TrailerPolicy {
        self.policy
    }

    /// Whole-line match against the footer table.
    pub fn is_footer(&self, line: &str) -> bool {
        self.footers.contains(&normalize_phrase(line))
    }

    pub fn clean(&self, raw: &str) -> CleanOutput {
        let mut out = CleanOutput::default();

        for line in raw.lines().map(str::trim) {
            if line.is_empty() || CODE_FENCE.is_match(line) {
                continue;
            }
            if let Some(caps) = CATEGORY_TAG.captures(line) {
                out.model_category = caps[1].parse().ok();
                continue;
            }
            if self.is_footer(line) {
                out.footers_removed += 1;
                continue;
            }
            out.lines.push(line.to_string());
        }

        if let Some(start) = self.trailer_start(&out.lines) {
            out.trailer_removed = out.lines.len() - start;
            debug!(
                removed = out.trailer_removed,
                first = %out.lines[start],
                "Truncated set-item trailer"
            );
            out.lines.truncate(start);
        }

        out
    }

    fn is_bare_name(&self, line: &str) -> bool {
        let has_stat_marks = line
            .chars()
            .any(|c| c.is_ascii_digit() || matches!(c, '+' | ':' | '%' | '(' | ')'));
        !has_stat_marks && !self.bare_stats.contains(&normalize_phrase(line))
    }

    /// Index where the trailing run of bare names starts, if it should be cut.
    fn trailer_start(&self, lines: &[String]) -> Option<usize> {
        if !self.policy.enabled {
            return None;
        }
        if self.policy.require_set_marker && !lines.iter().any(|l| SET_MARKER.is_match(l)) {
            return None;
        }
        // A block made only of bare names has no stat block to anchor on.
        let last_stat = lines.iter().rposition(|l| !self.is_bare_name(l))?;
        let start = last_stat + 1;
        let run = lines.len() - start;
        (run > 0 && run >= self.policy.min_run).then_some(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        ResponseCleaner::new().clean(text).lines
    }

    #[test]
    fn removes_footer_and_keeps_order() {
        let raw = "Harlequin Crest\nShako\nCtrl + Left Click to Move\nDefense: 141\n+2 to All Skills";
        assert_eq!(
            lines(raw),
            vec!["Harlequin Crest", "Shako", "Defense: 141", "+2 to All Skills"]
        );
    }

    #[test]
    fn footer_match_tolerates_spacing_and_punctuation() {
        let cleaner = ResponseCleaner::new();
        assert!(cleaner.is_footer("shift+left click to unequip."));
        assert!(cleaner.is_footer("  CTRL +  Left-Click to Move "));
        assert!(cleaner.is_footer("Right-click to Read"));
        assert!(!cleaner.is_footer("+1 to Left Click to Cast Skills"));
        assert!(!cleaner.is_footer("Hold Shift"));
    }

    #[test]
    fn stat_line_sharing_vocabulary_is_kept() {
        let raw = "Tal Rasha's Adjudication\nAmulet\n+33% Chance to Move Faster when Ctrl + Left Click to Move";
        assert_eq!(lines(raw).len(), 3);
    }

    #[test]
    fn drops_blank_lines_and_fences() {
        let raw = "```\n\nBer Rune\n\n```";
        assert_eq!(lines(raw), vec!["Ber Rune"]);
    }

    #[test]
    fn strips_category_tag_as_hint() {
        let out = ResponseCleaner::new().clean("Ber Rune\n[CATEGORY: rune]");
        assert_eq!(out.lines, vec!["Ber Rune"]);
        assert_eq!(out.model_category, Some(Category::Rune));

        let unknown = ResponseCleaner::new().clean("Ber Rune\n[CATEGORY: POTATO]");
        assert_eq!(unknown.model_category, None);
        assert_eq!(unknown.lines.len(), 1);
    }

    #[test]
    fn truncates_set_item_trailer() {
        let raw = "Tal Rasha's Guardianship\nLacquered Plate\nDefense: 941\n\
                   +40% Magic Find (3 Items)\n\
                   Tal Rasha's Wrappings\nTal Rasha's Fine-Spun Cloth\nTal Rasha's Adjudication";
        let out = ResponseCleaner::new().clean(raw);
        assert_eq!(out.trailer_removed, 3);
        assert_eq!(out.lines.last().map(String::as_str), Some("+40% Magic Find (3 Items)"));
    }

    #[test]
    fn bare_stat_lines_are_not_a_trailer() {
        let raw = "The Grandfather\nColossus Blade\nTwo-Hand Damage: 200 To 400\n(2 Items)\n\
                   Indestructible\nCannot Be Frozen";
        assert_eq!(lines(raw).len(), 6);
    }

    #[test]
    fn trailer_needs_set_marker_by_default() {
        let raw = "Gheed's Fortune\nGrand Charm\n+10% Gold\nKeep Safe\nLucky Coin";
        assert_eq!(lines(raw).len(), 5);

        let lenient = ResponseCleaner::with_policy(TrailerPolicy {
            require_set_marker: false,
            ..TrailerPolicy::default()
        });
        assert_eq!(lenient.clean(raw).lines.len(), 3);
    }

    #[test]
    fn disabled_policy_keeps_everything() {
        let raw = "Sigon's Gage\nGauntlets\n(2 Items)\nSigon's Shelter\nSigon's Visor";
        let cleaner = ResponseCleaner::with_policy(TrailerPolicy {
            enabled: false,
            ..TrailerPolicy::default()
        });
        assert_eq!(cleaner.clean(raw).lines.len(), 5);
    }

    #[test]
    fn single_bare_line_is_below_min_run() {
        let raw = "Sigon's Gage\nGauntlets\nDefense: 30\n(2 Items)\nSigon's Visor";
        assert_eq!(lines(raw).len(), 5);
    }
}
