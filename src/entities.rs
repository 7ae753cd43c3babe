//! # Entity Reduction
//!
//! Alternative pipeline for deployments where recognition runs through a
//! structured-entity extractor: the service receives pre-classified entities
//! instead of raw lines and only has to map them onto the receipt record.
//! Every entity is kept in the receipt's provenance field list, recognized
//! or not.
//!
//! When the extractor returns no line items for something the caller has
//! flagged as a retail receipt, reduction borrows the heuristic pipeline's
//! line-item reconstruction (and the standalone-amount total fallback) over
//! the raw recognized text.

use serde::{Deserialize, Serialize};

use crate::fields;
use crate::parser::{ParseOutcome, ReceiptParser};
use crate::receipt::{Receipt, ReceiptEntityField, ReceiptItem};
use crate::trace::ParseTrace;

/// Entity type identifiers emitted by the structured extractor.
pub const ENTITY_MERCHANT_NAME: &str = "receipt_merchant_name";
pub const ENTITY_DATE: &str = "receipt_date";
pub const ENTITY_TOTAL_AMOUNT: &str = "receipt_total_amount";
pub const ENTITY_LINE_ITEM: &str = "line_item";

/// Sub-property identifiers of a `line_item` entity.
pub const PROPERTY_DESCRIPTION: &str = "line_item/description";
pub const PROPERTY_QUANTITY: &str = "line_item/quantity";
pub const PROPERTY_PRICE: &str = "line_item/price";
pub const PROPERTY_TOTAL_PRICE: &str = "line_item/total_price";

/// Instruction phrase that marks the source as a retail receipt and unlocks
/// the heuristic item fallback.
const SHOP_RECEIPT_PHRASE: &str = "shop receipt";

/// One pre-classified entity from the external extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub mention_text: String,
    /// Sub-properties of compound entities such as `line_item`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<EntityProperty>,
}

/// Named sub-property of a compound entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityProperty {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub mention_text: String,
}

/// Whether the caller signalled a retail receipt via the instruction text.
fn is_shop_receipt(instructions: Option<&str>) -> bool {
    instructions
        .map(|text| text.to_lowercase().contains(SHOP_RECEIPT_PHRASE))
        .unwrap_or(false)
}

fn item_from_entity(entity: &RecognizedEntity, parser: &ReceiptParser) -> Option<ReceiptItem> {
    let mut description = "";
    let mut quantity_text = "";
    let mut price_text = "";
    let mut total_price_text = "";

    for property in &entity.properties {
        match property.property_type.as_str() {
            PROPERTY_DESCRIPTION => description = &property.mention_text,
            PROPERTY_QUANTITY => quantity_text = &property.mention_text,
            PROPERTY_PRICE => price_text = &property.mention_text,
            PROPERTY_TOTAL_PRICE => total_price_text = &property.mention_text,
            _ => {}
        }
    }

    let name = description.trim();
    if name.is_empty() {
        return None;
    }

    // Prefer the line total so entity items carry the same price semantics
    // as heuristically reconstructed ones.
    let price = fields::parse_decimal(total_price_text)
        .or_else(|| fields::parse_decimal(price_text))
        .filter(|price| *price >= 0.0)
        .unwrap_or(0.0);

    let quantity = match fields::parse_decimal(quantity_text) {
        Some(value) if value >= 1.0 => value.trunc() as u32,
        _ => 1,
    };

    Some(ReceiptItem {
        name: name.to_string(),
        price,
        quantity,
        category: parser.detector.classify(name),
    })
}

/// Map pre-classified entities onto a receipt record.
///
/// Known scalar entity types fill their receipt field directly (a nonzero
/// total is never overwritten); `line_item` entities become receipt items;
/// unrecognized types survive only in the provenance list.
pub fn reduce_entities(
    parser: &ReceiptParser,
    entities: &[RecognizedEntity],
    text: &[String],
    instructions: Option<&str>,
) -> ParseOutcome {
    let mut trace = ParseTrace::new();
    let mut receipt = Receipt::new(text.to_vec());
    trace.note(format!("reducing {} entities", entities.len()));

    for entity in entities {
        receipt.fields.push(ReceiptEntityField {
            name: entity.entity_type.clone(),
            confidence: entity.confidence,
            value: entity.mention_text.clone(),
        });

        match entity.entity_type.as_str() {
            ENTITY_MERCHANT_NAME => {
                receipt.merchant_name = entity.mention_text.clone();
            }
            ENTITY_DATE => {
                receipt.date = entity.mention_text.clone();
            }
            ENTITY_TOTAL_AMOUNT => {
                if let Some(amount) = fields::parse_decimal(&entity.mention_text) {
                    if receipt.set_total_if_unset(amount) {
                        trace.note(format!("total {:.2} from total entity", amount));
                    }
                }
            }
            ENTITY_LINE_ITEM => {
                if let Some(item) = item_from_entity(entity, parser) {
                    trace.note(format!("item '{}' from line_item entity", item.name));
                    receipt.items.push(item);
                }
            }
            _ => {
                trace.note(format!(
                    "entity type '{}' kept as provenance only",
                    entity.entity_type
                ));
            }
        }
    }

    // The extractor sometimes returns scalar fields but no line items for a
    // perfectly ordinary shop receipt; in that case fall back to the
    // heuristic reconstruction over the raw text.
    if receipt.items.is_empty() && is_shop_receipt(instructions) && !text.is_empty() {
        trace.note("no line_item entities, falling back to heuristic item extraction");
        let lines: Vec<&str> = text.iter().flat_map(|block| block.lines()).collect();
        receipt.items = parser.detector.extract_items(&lines, &mut trace);

        if receipt.total_amount == 0.0 {
            let standalone = fields::extract_standalone_total(
                &lines,
                parser.config.standalone_total_min,
                &mut trace,
            );
            receipt.set_total_if_unset(standalone);
        }
    }

    trace.note(format!("{} items after reduction", receipt.items.len()));
    ParseOutcome { receipt, trace }
}
