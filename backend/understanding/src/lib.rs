pub mod categorizer;
pub mod cleaner;
pub mod lexicon;
pub mod quality;

pub use categorizer::{default_rules, Categorizer, Matcher, Rule};
pub use cleaner::{normalize_phrase, CleanOutput, ResponseCleaner, TrailerPolicy, FOOTER_PHRASES};
pub use quality::{detect_quality, ItemQuality};

use horadric_core::{CleanedItem, Category};

/// Clean a raw model response and assign its category.
///
/// Returns `None` when nothing survives cleaning.
pub fn understand_response(
    cleaner: &ResponseCleaner,
    categorizer: &Categorizer,
    raw: &str,
) -> Option<CleanedItem> {
    let cleaned = cleaner.clean(raw);
    let category = categorizer.classify(&cleaned.lines);
    if let Some(hint) = cleaned.model_category {
        if hint != category && category != Category::Unknown {
            tracing::debug!(model = %hint, rules = %category, "Model category overridden by rules");
        }
    }
    CleanedItem::new(cleaned.lines, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_override_model_tag() {
        let cleaner = ResponseCleaner::new();
        let categorizer = Categorizer::new();
        let item = understand_response(
            &cleaner,
            &categorizer,
            "Ber Rune\nCan be Inserted into Socketed Items\n[CATEGORY: MISC]",
        )
        .unwrap();
        assert_eq!(item.lines(), ["Ber Rune"]);
        assert_eq!(item.category(), Category::Rune);
    }

    #[test]
    fn footer_only_response_is_dropped() {
        let item = understand_response(
            &ResponseCleaner::new(),
            &Categorizer::new(),
            "Shift + Left Click to Unequip\n\n[CATEGORY: ARMOR]",
        );
        assert!(item.is_none());
    }
}
