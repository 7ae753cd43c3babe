//! # Receipt Assembly
//!
//! Drives the field extractors and the line-item reconstructor over one
//! recognized text corpus and assembles the structured receipt. Assembly is
//! total: whatever subset of fields can be recovered is returned, and a
//! receipt with every field empty is still a successful result.

use crate::config::ParserConfig;
use crate::fields;
use crate::line_items::LineItemDetector;
use crate::locale::LocaleKeywords;
use crate::receipt::Receipt;
use crate::trace::ParseTrace;

/// A parsed receipt together with its diagnostic trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub receipt: Receipt,
    pub trace: ParseTrace,
}

/// Heuristic receipt parser for one locale keyword table.
///
/// The parser is immutable after construction and performs no I/O; it can be
/// shared freely across concurrent request handlers.
pub struct ReceiptParser {
    pub(crate) keywords: LocaleKeywords,
    pub(crate) detector: LineItemDetector,
    pub(crate) config: ParserConfig,
}

impl ReceiptParser {
    /// Build a parser from a config and the built-in locale table.
    pub fn new(config: ParserConfig) -> Self {
        Self::with_keywords(config, LocaleKeywords::default())
    }

    /// Build a parser with an explicit locale keyword table.
    pub fn with_keywords(config: ParserConfig, keywords: LocaleKeywords) -> Self {
        let detector = LineItemDetector::new(&keywords, config.max_item_price);
        Self {
            keywords,
            detector,
            config,
        }
    }

    /// Reconstruct a receipt from recognized text blocks.
    ///
    /// The first block (the printed header) feeds the merchant heuristic
    /// un-flattened; all other extraction runs over the corpus flattened to
    /// individual lines in reading order. Field extraction order is
    /// irrelevant except inside total detection, where the keyword tier is
    /// deliberately tried before the standalone-amount tier.
    pub fn parse(&self, text: &[String]) -> ParseOutcome {
        let mut trace = ParseTrace::new();
        let mut receipt = Receipt::new(text.to_vec());

        let lines: Vec<&str> = text.iter().flat_map(|block| block.lines()).collect();
        trace.note(format!(
            "parsing {} blocks ({} lines)",
            text.len(),
            lines.len()
        ));

        receipt.merchant_name = fields::extract_merchant(text, &self.keywords);
        if receipt.merchant_name.is_empty() {
            trace.note("merchant not found");
        } else {
            trace.note(format!("merchant '{}'", receipt.merchant_name));
        }

        receipt.date = fields::extract_date(&lines);
        if receipt.date.is_empty() {
            trace.note("date not found");
        }

        let total = fields::extract_total(
            &lines,
            &self.keywords,
            self.config.standalone_total_min,
            &mut trace,
        );
        if !receipt.set_total_if_unset(total) {
            trace.note("total not found");
        }

        receipt.items = self.detector.extract_items(&lines, &mut trace);
        trace.note(format!("{} items extracted", receipt.items.len()));

        ParseOutcome { receipt, trace }
    }
}
