//! Category classification for purchased items.
//!
//! Maps a free-text item description to a coarse product category by
//! case-insensitive keyword lookup. Total function: descriptions that match
//! nothing classify as [`OTHER_CATEGORY`].

use crate::locale::LocaleKeywords;

/// Category returned when no keyword set matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Keyword-based item categorizer.
///
/// Categories are tested in the fixed order given by the locale table, so a
/// description matching keywords from two categories always resolves to the
/// earlier one.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    /// (category name, lowercased keywords), in priority order.
    categories: Vec<(String, Vec<String>)>,
}

impl CategoryClassifier {
    pub fn new(keywords: &LocaleKeywords) -> Self {
        let categories = keywords
            .categories
            .iter()
            .map(|category| {
                (
                    category.name.clone(),
                    category
                        .keywords
                        .iter()
                        .map(|keyword| keyword.to_lowercase())
                        .collect(),
                )
            })
            .collect();
        Self { categories }
    }

    /// Classify an item description, falling back to [`OTHER_CATEGORY`].
    pub fn classify(&self, description: &str) -> String {
        let folded = description.to_lowercase();
        for (name, keywords) in &self.categories {
            if keywords.iter().any(|keyword| folded.contains(keyword)) {
                return name.clone();
            }
        }
        OTHER_CATEGORY.to_string()
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new(&LocaleKeywords::default())
    }
}
