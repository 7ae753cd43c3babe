//! Structured receipt record assembled from recognized text.
//!
//! A `Receipt` is built fresh per request, fully assembled synchronously, and
//! dropped once the response is serialized; nothing here is shared across
//! requests.

use serde::{Deserialize, Serialize};

/// Ordered OCR output, one string per recognized text block or line, in
/// top-to-bottom reading order. Ordering is load-bearing: the item name
/// heuristics assume the line above a price line belongs to the same item.
/// If the upstream recognizer emits blocks in a different order (for example
/// by block position instead of reading order), extraction silently degrades.
pub type RecognizedText = Vec<String>;

/// One purchased item recovered from the receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    /// Line total for the item, never negative.
    pub price: f64,
    /// Purchased count; 1 when the quantity could not be recovered.
    pub quantity: u32,
    pub category: String,
}

/// Provenance record for one pre-classified entity (entity-assisted mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptEntityField {
    /// Field kind emitted by the external extractor.
    pub name: String,
    /// Extractor confidence in [0, 1].
    pub confidence: f32,
    pub value: String,
}

/// Structured record for one receipt.
///
/// Absent fields keep their zero value: an empty merchant, empty date, or
/// 0.0 total means "not found", not an error. A nonzero total is never
/// overwritten once set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub merchant_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    #[serde(default)]
    pub raw_text: RecognizedText,
    /// Entity provenance, populated only in entity-assisted mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ReceiptEntityField>,
}

impl Receipt {
    pub fn new(raw_text: RecognizedText) -> Self {
        Self {
            raw_text,
            ..Default::default()
        }
    }

    /// Set the total amount unless a nonzero total is already present.
    /// Returns whether the value was taken.
    pub fn set_total_if_unset(&mut self, amount: f64) -> bool {
        if self.total_amount == 0.0 && amount > 0.0 {
            self.total_amount = amount;
            return true;
        }
        false
    }
}
