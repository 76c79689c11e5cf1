//! Ordered, data-driven category rules. The first rule that matches any line wins.

use std::collections::HashSet;

use regex::Regex;

use horadric_core::Category;

use crate::lexicon::{
    ARMOR_BASES, CHARM_TYPES, GEM_GRADES, GEM_TYPES, MISC_PHRASES, RUNES, RUNEWORDS, WEAPON_BASES,
};

/// How a rule tests a single lowercase, trimmed line.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The whole line equals one of these phrases.
    LineEquals(HashSet<String>),
    /// The line matches this pattern.
    LineMatches(Regex),
}

impl Matcher {
    fn equals(phrases: &[&str]) -> Self {
        Self::LineEquals(phrases.iter().map(|p| p.to_lowercase()).collect())
    }

    fn pattern(pattern: &str) -> Self {
        Self::LineMatches(Regex::new(pattern).unwrap())
    }

    /// Any of `phrases` occurring as whole words anywhere in the line.
    fn phrases(phrases: &[&str]) -> Self {
        let mut sorted: Vec<String> = phrases.iter().map(|p| regex::escape(&p.to_lowercase())).collect();
        sorted.sort_by_key(|p| std::cmp::Reverse(p.len()));
        Self::pattern(&format!(r"(^|[^\w']){}($|[^\w'])", alternation(&sorted)))
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::LineEquals(set) => set.contains(line),
            Self::LineMatches(re) => re.is_match(line),
        }
    }
}

fn alternation(parts: &[String]) -> String {
    format!("(?:{})", parts.join("|"))
}

fn lowercase_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| regex::escape(&s.to_lowercase())).collect()
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub category: Category,
}

impl Rule {
    fn new(name: &'static str, matcher: Matcher, category: Category) -> Self {
        Self { name, matcher, category }
    }
}

/// The built-in rule table, highest priority first.
pub fn default_rules() -> Vec<Rule> {
    let runes = alternation(&lowercase_list(&RUNES));
    let grades = alternation(&lowercase_list(GEM_GRADES));
    let gems = alternation(&lowercase_list(GEM_TYPES));
    let charms = alternation(&lowercase_list(CHARM_TYPES));

    vec![
        Rule::new("runeword-name", Matcher::equals(RUNEWORDS), Category::Runeword),
        Rule::new(
            "runeword-recipe",
            Matcher::pattern(&format!(r"^'{runes}+'$")),
            Category::Runeword,
        ),
        Rule::new(
            "rune-name",
            Matcher::pattern(&format!(r"^{runes}( rune)?$")),
            Category::Rune,
        ),
        Rule::new(
            "gem-name",
            Matcher::pattern(&format!(r"^({grades} )?{gems}$")),
            Category::Gem,
        ),
        Rule::new(
            "charm-type",
            Matcher::pattern(&format!(r"(^|\s){charms}($|\s)")),
            Category::Charm,
        ),
        Rule::new("jewel-type", Matcher::pattern(r"^(.*\s)?jewel(\s+of\s.*)?$"), Category::Jewel),
        Rule::new("ring-type", Matcher::pattern(r"^(.*\s)?ring(\s+of\s.*)?$"), Category::Ring),
        Rule::new(
            "amulet-type",
            Matcher::pattern(r"^(.*\s)?amulet(\s+of\s.*)?$"),
            Category::Amulet,
        ),
        Rule::new(
            "armor-stat",
            Matcher::pattern(r"^(defense|chance to block)\s*:"),
            Category::Armor,
        ),
        Rule::new(
            "weapon-stat",
            Matcher::pattern(r"^(one-hand damage|two-hand damage|throw damage|damage)\s*:"),
            Category::Weapon,
        ),
        Rule::new("armor-base", Matcher::phrases(ARMOR_BASES), Category::Armor),
        Rule::new("weapon-base", Matcher::phrases(WEAPON_BASES), Category::Weapon),
        Rule::new("misc-item", Matcher::phrases(MISC_PHRASES), Category::Misc),
    ]
}

pub struct Categorizer {
    rules: Vec<Rule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer {
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The first rule matching any line, in table order.
    pub fn matching_rule<S: AsRef<str>>(&self, lines: &[S]) -> Option<&Rule> {
        let normalized: Vec<String> = lines
            .iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        self.rules
            .iter()
            .find(|rule| normalized.iter().any(|line| rule.matcher.is_match(line)))
    }

    pub fn classify<S: AsRef<str>>(&self, lines: &[S]) -> Category {
        self.matching_rule(lines)
            .map(|rule| rule.category)
            .unwrap_or(Category::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Category {
        let lines: Vec<&str> = text.lines().collect();
        Categorizer::new().classify(&lines)
    }

    #[test]
    fn socketed_scarab_husk_is_armor() {
        assert_eq!(classify("Socketed (3)\nScarab Husk"), Category::Armor);
    }

    #[test]
    fn lone_rune_name_is_rune() {
        assert_eq!(classify("Ber"), Category::Rune);
        assert_eq!(classify("Jah Rune"), Category::Rune);
        assert_eq!(classify("zod rune"), Category::Rune);
    }

    #[test]
    fn runeword_beats_base_type() {
        let text = "Enigma\nMage Plate\n'JahIthBer'\nDefense: 1044\n+2 to All Skills";
        assert_eq!(classify(text), Category::Runeword);
        assert_eq!(classify("Some Name\n'TalEthTir'"), Category::Runeword);
    }

    #[test]
    fn gems_and_charms() {
        assert_eq!(classify("Perfect Amethyst"), Category::Gem);
        assert_eq!(classify("Skull"), Category::Gem);
        assert_eq!(classify("Annihilus\nSmall Charm\n+1 to All Skills"), Category::Charm);
        assert_eq!(classify("Shimmering Grand Charm of Vita"), Category::Charm);
    }

    #[test]
    fn jewelry_by_type_line() {
        assert_eq!(classify("Stone of Jordan\nRing\n+1 to All Skills"), Category::Ring);
        assert_eq!(classify("Jeweler's Ring of the Whale"), Category::Ring);
        assert_eq!(classify("Mara's Kaleidoscope\nAmulet"), Category::Amulet);
        assert_eq!(classify("Rainbow Facet\nJewel"), Category::Jewel);
    }

    #[test]
    fn ring_mail_is_not_a_ring() {
        assert_eq!(classify("Ring Mail\nDefense: 45"), Category::Armor);
        assert_eq!(classify("Ring Mail"), Category::Armor);
    }

    #[test]
    fn stat_lines_decide_before_bases() {
        assert_eq!(classify("Oculus\nSwirling Crystal\nDefense: 10"), Category::Armor);
        assert_eq!(classify("Lightsabre\nPhase Blade\nOne-Hand Damage: 31 To 35"), Category::Weapon);
    }

    #[test]
    fn weapon_base_inside_magic_name() {
        assert_eq!(classify("Cruel Colossus Blade of Quickness"), Category::Weapon);
        assert_eq!(classify("Hunter's Bow"), Category::Weapon);
    }

    #[test]
    fn misc_items() {
        assert_eq!(classify("Key of Terror"), Category::Misc);
        assert_eq!(classify("Token of Absolution"), Category::Misc);
        assert_eq!(classify("Full Rejuvenation Potion"), Category::Misc);
    }

    #[test]
    fn unmatched_is_unknown() {
        assert_eq!(classify("Something odd\n+5 to nothing"), Category::Unknown);
        assert_eq!(classify(""), Category::Unknown);
    }

    #[test]
    fn rule_table_is_enumerable_and_ordered() {
        let categorizer = Categorizer::new();
        let names: Vec<_> = categorizer.rules().iter().map(|r| r.name).collect();
        assert_eq!(names.first(), Some(&"runeword-name"));
        assert_eq!(names.last(), Some(&"misc-item"));

        let rune_pos = names.iter().position(|n| *n == "rune-name").unwrap();
        let misc_pos = names.iter().position(|n| *n == "misc-item").unwrap();
        assert!(rune_pos < misc_pos);

        // Every rule can fire on its own.
        for (rule, sample) in categorizer.rules().iter().zip([
            "enigma", "'sollum'", "ist", "flawless ruby", "grand charm", "jewel", "ring",
            "amulet", "defense: 5", "damage: 1 to 2", "scarab husk", "war hammer", "key of hate",
        ]) {
            assert!(rule.matcher.is_match(sample), "{} did not match {sample}", rule.name);
        }
    }

    #[test]
    fn custom_table() {
        let categorizer = Categorizer::with_rules(vec![Rule::new(
            "everything",
            Matcher::pattern(".*"),
            Category::Misc,
        )]);
        assert_eq!(categorizer.classify(&["Ber"]), Category::Misc);
        assert!(categorizer.matching_rule(&[""; 0]).is_none());
    }
}
