//! # Locale Keyword Tables
//!
//! Keyword tables the parser is tuned with: total-line keywords, business
//! entity suffixes used for merchant detection, and the ordered category
//! keyword lists used by the category classifier.
//!
//! The built-in table targets Polish retail receipts (with English synonyms
//! for mixed-language printouts). A deployment can replace it with a JSON
//! file referenced by `RECEIPT_KEYWORDS_CONFIG_PATH` or placed at one of the
//! default paths; a file that fails to load falls back to the built-in table
//! so parsing stays total.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// One category with its keyword set.
///
/// Matching is case-insensitive substring containment. The position of a
/// category inside [`LocaleKeywords::categories`] is its priority: categories
/// are tested top to bottom and the first keyword hit wins, which keeps
/// classification deterministic when a description matches several sets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Locale-specific keyword configuration for receipt parsing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocaleKeywords {
    /// Words marking a total/subtotal line ("SUMA PLN 45,67").
    pub total_keywords: Vec<String>,
    /// Business entity suffixes used to spot the merchant line in a header.
    pub business_suffixes: Vec<String>,
    /// Ordered category keyword lists; earlier entries win ties.
    pub categories: Vec<CategoryKeywords>,
}

impl Default for LocaleKeywords {
    fn default() -> Self {
        let cat = |name: &str, keywords: &[&str]| CategoryKeywords {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            total_keywords: vec![
                "total".to_string(),
                "subtotal".to_string(),
                "suma".to_string(),
                "razem".to_string(),
                "do zapłaty".to_string(),
            ],
            business_suffixes: vec![
                "sp. z o.o.".to_string(),
                "sp.j.".to_string(),
                "sp.k.".to_string(),
                "s.a.".to_string(),
                "s.c.".to_string(),
            ],
            categories: vec![
                cat(
                    "Bakery",
                    &["chleb", "bułka", "bulka", "bagietka", "rogal", "bread", "roll"],
                ),
                cat(
                    "Dairy",
                    &[
                        "mleko", "masło", "maslo", "jogurt", "śmietana", "smietana", "kefir",
                        "ser", "milk", "butter", "cheese", "yogurt",
                    ],
                ),
                cat(
                    "Produce",
                    &[
                        "jabłko", "jablko", "banan", "pomidor", "ogórek", "ogorek", "cebula",
                        "ziemniak", "marchew", "apple", "tomato", "onion",
                    ],
                ),
                cat(
                    "Meat",
                    &[
                        "kiełbasa", "kielbasa", "szynka", "kurczak", "wołowina", "wolowina",
                        "mięso", "mieso", "chicken", "ham", "sausage",
                    ],
                ),
                cat(
                    "Beverages",
                    &[
                        "woda", "sok", "cola", "piwo", "wino", "kawa", "herbata", "juice",
                        "water", "beer", "coffee", "tea",
                    ],
                ),
                cat(
                    "Sweets",
                    &["czekolada", "cukierki", "baton", "ciastka", "chocolate", "candy", "cookie"],
                ),
                cat(
                    "Household",
                    &["papier", "mydło", "mydlo", "proszek", "płyn", "plyn", "soap", "detergent"],
                ),
            ],
        }
    }
}

impl LocaleKeywords {
    /// Validate the keyword tables.
    pub fn validate(&self) -> crate::errors::AppResult<()> {
        if self.total_keywords.is_empty() {
            return Err(crate::errors::AppError::Config(
                "total_keywords cannot be empty".to_string(),
            ));
        }
        if self.business_suffixes.is_empty() {
            return Err(crate::errors::AppError::Config(
                "business_suffixes cannot be empty".to_string(),
            ));
        }
        if self.categories.is_empty() {
            return Err(crate::errors::AppError::Config(
                "categories cannot be empty".to_string(),
            ));
        }

        let validate_words = |words: &[String], context: &str| -> crate::errors::AppResult<()> {
            for (i, word) in words.iter().enumerate() {
                if word.trim().is_empty() {
                    return Err(crate::errors::AppError::Config(format!(
                        "{}[{}] cannot be empty",
                        context, i
                    )));
                }
                if word.chars().any(|c| c.is_control()) {
                    return Err(crate::errors::AppError::Config(format!(
                        "{}[{}] '{}' contains control characters",
                        context, i, word
                    )));
                }
            }
            Ok(())
        };

        validate_words(&self.total_keywords, "total_keywords")?;
        validate_words(&self.business_suffixes, "business_suffixes")?;
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(crate::errors::AppError::Config(
                    "category name cannot be empty".to_string(),
                ));
            }
            validate_words(&category.keywords, &format!("categories.{}", category.name))?;
        }

        Ok(())
    }
}

/// Load the locale keyword tables.
///
/// Resolution order: `RECEIPT_KEYWORDS_CONFIG_PATH`, then the default file
/// locations, then the built-in table. Unlike a strict config load, a missing
/// or malformed file is only a warning here: the parser must always have a
/// usable table.
pub fn load_locale_keywords() -> LocaleKeywords {
    if let Ok(config_path) = std::env::var("RECEIPT_KEYWORDS_CONFIG_PATH") {
        info!(
            "Loading receipt keyword config from environment variable: {}",
            config_path
        );
        match read_keywords_file(&config_path) {
            Ok(keywords) => return keywords,
            Err(e) => {
                warn!(
                    "Failed to load receipt keyword config from '{}': {}. Falling back to default paths.",
                    config_path, e
                );
            }
        }
    }

    let possible_paths = [
        "/app/config/receipt_keywords.json", // Docker path
        "config/receipt_keywords.json",      // Local development path
    ];

    for config_path in &possible_paths {
        match read_keywords_file(config_path) {
            Ok(keywords) => {
                info!(
                    "Successfully loaded receipt keyword config from fallback path: {}",
                    config_path
                );
                return keywords;
            }
            Err(_) => continue, // Try next path
        }
    }

    info!("No receipt keyword config file found, using built-in locale table");
    LocaleKeywords::default()
}

fn read_keywords_file(path: &str) -> anyhow::Result<LocaleKeywords> {
    let content = fs::read_to_string(path)?;
    let keywords: LocaleKeywords = serde_json::from_str(&content)?;
    keywords
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid keyword config: {}", e))?;
    Ok(keywords)
}
