use crate::record::CatalogRecord;

/// A parsed search string: every term must match.
///
/// `"quoted phrases"` stay whole; everything else splits on whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    pub fn parse(input: &str) -> Self {
        let mut terms = Vec::new();
        for (i, part) in input.split('"').enumerate() {
            if i % 2 == 1 {
                let phrase = part.trim().to_lowercase();
                if !phrase.is_empty() {
                    terms.push(phrase);
                }
            } else {
                terms.extend(part.split_whitespace().map(str::to_lowercase));
            }
        }
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Substring match of each term against the block text or its owner.
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        let owner = record.owner.to_lowercase();
        self.terms
            .iter()
            .all(|term| record.search_text.contains(term.as_str()) || owner.contains(term.as_str()))
    }
}
