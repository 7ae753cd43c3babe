//! # Line-Item Reconstruction
//!
//! Recovers purchased items (name, price, quantity) from unstructured
//! receipt lines. Receipts in the supported format print a quantity/price
//! group per item, either on the same line as the item name or on the line
//! directly below it:
//!
//! ```text
//! Mleko 3,2%
//! 1 x3,99 3,99C
//! Chleb wiejski 2 ×2,49 4,98C
//! ```
//!
//! Three patterns are tried per line in fixed precedence order; the first
//! one that matches wins for that line. Patterns differ in the quantity
//! shape (decimal vs. integer) and the multiplication glyph (ASCII `x` vs.
//! Unicode `×`), because the recognizer emits either glyph depending on the
//! receipt font. The trailing letter on the price group is the fiscal tax
//! class marker and is consumed with the price tokens.
//!
//! Item names are positional: whatever remains of the line after the price
//! group is the name; when nothing remains, the name comes from the
//! immediately preceding line. Lines whose resolved name carries a total
//! keyword are dropped so a total line never becomes a purchased item.

use lazy_static::lazy_static;
use regex::Regex;

use crate::categories::CategoryClassifier;
use crate::fields::parse_decimal;
use crate::locale::LocaleKeywords;
use crate::receipt::ReceiptItem;
use crate::trace::ParseTrace;

lazy_static! {
    /// `0,345 x2,50 0,86A`: decimal quantity, ASCII separator.
    static ref QTY_DECIMAL_RE: Regex = Regex::new(
        r"(?P<qty>\d+[.,]\d+)\s*x\s*(?P<unit>\d+[.,]\d{2})\s+(?P<total>\d+[.,]\d{2})(?P<marker>[A-Za-z])?"
    )
    .expect("decimal quantity pattern should be valid");
    /// `1 x3,99 3,99C`: integer quantity, ASCII separator.
    static ref QTY_INTEGER_RE: Regex = Regex::new(
        r"(?P<qty>\d+)\s*x\s*(?P<unit>\d+[.,]\d{2})\s+(?P<total>\d+[.,]\d{2})(?P<marker>[A-Za-z])?"
    )
    .expect("integer quantity pattern should be valid");
    /// `2 ×2,49 4,98C`: integer quantity, multiplication sign separator.
    static ref QTY_MULTIPLY_SIGN_RE: Regex = Regex::new(
        r"(?P<qty>\d+)\s*×\s*(?P<unit>\d+[.,]\d{2})\s+(?P<total>\d+[.,]\d{2})(?P<marker>[A-Za-z])?"
    )
    .expect("multiplication sign pattern should be valid");
}

/// One price-group match on a line, before name resolution.
struct QuantityMatch {
    start: usize,
    end: usize,
    quantity: u32,
    price: f64,
    pattern: &'static str,
}

/// Match the quantity patterns against one line in precedence order.
///
/// A pattern whose price token fails numeric parsing counts as no match and
/// the next pattern is tried.
fn match_quantity_patterns(line: &str) -> Option<QuantityMatch> {
    let attempts: [(&'static str, &Regex, bool); 3] = [
        ("decimal-quantity", &QTY_DECIMAL_RE, true),
        ("integer-quantity", &QTY_INTEGER_RE, false),
        ("multiplication-sign", &QTY_MULTIPLY_SIGN_RE, false),
    ];

    for (pattern, regex, decimal_quantity) in attempts {
        let Some(captures) = regex.captures(line) else {
            continue;
        };
        let full = captures.get(0).expect("regex match has a full capture");
        let total_token = captures.name("total").map(|m| m.as_str()).unwrap_or("");
        let Some(price) = parse_decimal(total_token) else {
            continue;
        };
        let qty_token = captures.name("qty").map(|m| m.as_str()).unwrap_or("");
        let quantity = parse_quantity(qty_token, decimal_quantity);

        return Some(QuantityMatch {
            start: full.start(),
            end: full.end(),
            quantity,
            price,
            pattern,
        });
    }
    None
}

/// Parse a quantity token into a whole purchase count.
///
/// Decimal quantities (weighed goods) are truncated; anything unparseable or
/// below one defaults to a count of one.
fn parse_quantity(token: &str, decimal: bool) -> u32 {
    if decimal {
        match parse_decimal(token) {
            Some(value) if value >= 1.0 => value.trunc() as u32,
            _ => 1,
        }
    } else {
        token.parse::<u32>().unwrap_or(1).max(1)
    }
}

/// Resolve the item name for a matched line.
///
/// The price group span is removed from the line; if nothing printable
/// remains the name is taken from the preceding line. Returns `None` when no
/// non-empty name can be resolved.
fn resolve_item_name(
    line: &str,
    span_start: usize,
    span_end: usize,
    previous_line: Option<&str>,
) -> Option<String> {
    let stripped = format!("{} {}", &line[..span_start], &line[span_end..]);
    let name = stripped.split_whitespace().collect::<Vec<&str>>().join(" ");
    if !name.is_empty() {
        return Some(name);
    }
    previous_line
        .map(str::trim)
        .filter(|previous| !previous.is_empty())
        .map(str::to_string)
}

/// Scans recognized lines for purchased items.
pub struct LineItemDetector {
    classifier: CategoryClassifier,
    /// Lowercased total keywords; a resolved name containing one is not an item.
    total_keywords: Vec<String>,
    /// Upper sanity bound for a single line total.
    max_item_price: f64,
}

impl LineItemDetector {
    pub fn new(keywords: &LocaleKeywords, max_item_price: f64) -> Self {
        Self {
            classifier: CategoryClassifier::new(keywords),
            total_keywords: keywords
                .total_keywords
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
            max_item_price,
        }
    }

    /// Classify an item description with this detector's category table.
    pub fn classify(&self, description: &str) -> String {
        self.classifier.classify(description)
    }

    /// Extract every purchased item from the line corpus, in discovery order.
    ///
    /// Each line is evaluated independently; there is no cap on the number of
    /// items. Lines that fail every pattern are skipped silently, everything
    /// else leaves a trace event.
    pub fn extract_items(&self, lines: &[&str], trace: &mut ParseTrace) -> Vec<ReceiptItem> {
        let mut items = Vec::new();

        for (line_number, line) in lines.iter().enumerate() {
            let Some(found) = match_quantity_patterns(line) else {
                continue;
            };

            let previous_line = line_number.checked_sub(1).map(|i| lines[i]);
            let Some(name) = resolve_item_name(line, found.start, found.end, previous_line)
            else {
                trace.note(format!(
                    "line {}: {} match had no resolvable name, skipped",
                    line_number, found.pattern
                ));
                continue;
            };

            let folded = name.to_lowercase();
            if self
                .total_keywords
                .iter()
                .any(|keyword| folded.contains(keyword))
            {
                trace.note(format!(
                    "line {}: '{}' is a total line, not an item",
                    line_number, name
                ));
                continue;
            }

            if found.price <= 0.0 || found.price >= self.max_item_price {
                trace.note(format!(
                    "line {}: price {:.2} outside accepted range, skipped",
                    line_number, found.price
                ));
                continue;
            }

            let category = self.classifier.classify(&name);
            trace.note(format!(
                "line {}: item '{}' qty {} price {:.2} via {} pattern",
                line_number, name, found.quantity, found.price, found.pattern
            ));
            items.push(ReceiptItem {
                name,
                price: found.price,
                quantity: found.quantity,
                category,
            });
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> LineItemDetector {
        LineItemDetector::new(&LocaleKeywords::default(), 10000.0)
    }

    fn extract(lines: &[&str]) -> Vec<ReceiptItem> {
        let mut trace = ParseTrace::new();
        detector().extract_items(lines, &mut trace)
    }

    #[test]
    fn test_name_from_previous_line() {
        let items = extract(&["Milk", "1 x3,99 3,99C"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Milk");
        assert_eq!(items[0].price, 3.99);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_multiplication_sign_matches_like_ascii_x() {
        let items = extract(&["Bread", "2 ×2,49 4,98C"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bread");
        assert_eq!(items[0].price, 4.98);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_name_on_same_line() {
        let items = extract(&["Mleko 3,2% 2 x1,50 3,00A"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Mleko 3,2%");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].price, 3.00);
        assert_eq!(items[0].category, "Dairy");
    }

    #[test]
    fn test_decimal_quantity_truncates() {
        // Weighed produce: 1,345 kg at 4,99/kg.
        let items = extract(&["Banany", "1,345 x4,99 6,71C"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Banany");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].price, 6.71);
    }

    #[test]
    fn test_decimal_quantity_below_one_defaults_to_one() {
        let items = extract(&["Winogrona", "0,345 x12,00 4,14C"]);
        assert_eq!(items[0].quantity, 1);
    }

    #[test]
    fn test_total_line_never_becomes_item() {
        let items = extract(&["Total 42,99"]);
        assert!(items.is_empty());

        // Even when the quantity shape matches, the previous-line name is a
        // total keyword and disqualifies the match.
        let items = extract(&["SUMA", "1 x42,99 42,99"]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_match_without_any_name_is_skipped() {
        let items = extract(&["1 x3,99 3,99C"]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_unmatched_item_category_is_other() {
        let items = extract(&["XYZ123", "1 x2,00 2,00"]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Other");
    }

    #[test]
    fn test_every_line_evaluated_independently() {
        let items = extract(&[
            "Mleko",
            "1 x3,99 3,99C",
            "Chleb wiejski 2 x2,49 4,98C",
            "Dziękujemy",
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Mleko");
        assert_eq!(items[1].name, "Chleb wiejski");
    }

    #[test]
    fn test_price_out_of_range_is_dropped() {
        let mut trace = ParseTrace::new();
        let detector = LineItemDetector::new(&LocaleKeywords::default(), 100.0);
        let items = detector.extract_items(&["Telewizor", "1 x999,99 999,99"], &mut trace);
        assert!(items.is_empty());
        assert!(!trace.is_empty());
    }
}
