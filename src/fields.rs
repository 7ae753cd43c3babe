//! # Field Extractors
//!
//! Independent single-purpose recognizers for the scalar receipt fields:
//! transaction date, total amount, and merchant name. Each extractor is a
//! pure function over the recognized line corpus; a field that cannot be
//! recovered comes back as its empty/zero value, never as an error.

use lazy_static::lazy_static;
use regex::Regex;

use crate::locale::LocaleKeywords;
use crate::trace::ParseTrace;

lazy_static! {
    /// ISO-shaped date: 4-digit year, 2-digit month, 2-digit day. Calendar
    /// validity is not checked; "2024-13-40" is returned verbatim.
    static ref DATE_RE: Regex =
        Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern should be valid");
    /// Decimal-shaped money token with comma or dot fraction separator.
    static ref AMOUNT_RE: Regex =
        Regex::new(r"\d+[.,]\d{2}").expect("amount pattern should be valid");
    /// A line that is exactly one money token and nothing else.
    static ref STANDALONE_AMOUNT_RE: Regex =
        Regex::new(r"^\d+[.,]\d{2}$").expect("standalone amount pattern should be valid");
}

/// Parse a decimal token, normalizing a comma separator to a dot.
/// Returns `None` for anything that does not parse cleanly; callers treat
/// that as "no match" and keep scanning.
pub(crate) fn parse_decimal(token: &str) -> Option<f64> {
    token.trim().replace(',', ".").parse::<f64>().ok()
}

/// First date-shaped token across the corpus, or empty string.
pub fn extract_date(lines: &[&str]) -> String {
    for line in lines {
        if let Some(found) = DATE_RE.find(line) {
            return found.as_str().to_string();
        }
    }
    String::new()
}

/// Total amount, tier 1: the first line carrying a total keyword followed by
/// a money token. Returns 0.0 when no line qualifies.
pub fn extract_keyword_total(
    lines: &[&str],
    keywords: &LocaleKeywords,
    trace: &mut ParseTrace,
) -> f64 {
    for (line_number, line) in lines.iter().enumerate() {
        let lowered = line.to_lowercase();
        for keyword in &keywords.total_keywords {
            let keyword = keyword.to_lowercase();
            if let Some(position) = lowered.find(&keyword) {
                let after = &lowered[position + keyword.len()..];
                if let Some(token) = AMOUNT_RE.find(after) {
                    if let Some(amount) = parse_decimal(token.as_str()) {
                        trace.note(format!(
                            "total {:.2} from keyword '{}' on line {}",
                            amount, keyword, line_number
                        ));
                        return amount;
                    }
                }
            }
        }
    }
    0.0
}

/// Total amount, tier 2 fallback: the first line that consists of exactly one
/// money token whose value exceeds `min_value`. The threshold keeps ordinary
/// per-item prices from being promoted to a total.
pub fn extract_standalone_total(lines: &[&str], min_value: f64, trace: &mut ParseTrace) -> f64 {
    for (line_number, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !STANDALONE_AMOUNT_RE.is_match(trimmed) {
            continue;
        }
        if let Some(amount) = parse_decimal(trimmed) {
            if amount > min_value {
                trace.note(format!(
                    "total {:.2} from standalone amount on line {}",
                    amount, line_number
                ));
                return amount;
            }
        }
    }
    0.0
}

/// Two-tier total extraction: keyword lines first, standalone amounts only
/// when no keyword line matched.
pub fn extract_total(
    lines: &[&str],
    keywords: &LocaleKeywords,
    standalone_min: f64,
    trace: &mut ParseTrace,
) -> f64 {
    let keyword_total = extract_keyword_total(lines, keywords, trace);
    if keyword_total > 0.0 {
        return keyword_total;
    }
    extract_standalone_total(lines, standalone_min, trace)
}

/// Best-effort merchant name from the first recognized block.
///
/// The first block of a receipt photo is usually the printed header. A short
/// header (five lines or fewer) starts with the store name; a longer one
/// tends to lead with logo fragments and address lines, so the extractor
/// looks for a business entity suffix within the first six lines and falls
/// back to line six verbatim. This is a low-confidence guess, not a
/// validated extraction.
pub fn extract_merchant(blocks: &[String], keywords: &LocaleKeywords) -> String {
    let Some(block) = blocks.first() else {
        return String::new();
    };
    let header_lines: Vec<&str> = block.lines().collect();

    if header_lines.len() > 5 {
        for line in header_lines.iter().take(6) {
            let lowered = line.to_lowercase();
            if keywords
                .business_suffixes
                .iter()
                .any(|suffix| lowered.contains(&suffix.to_lowercase()))
            {
                return line.to_string();
            }
        }
        return header_lines[5].to_string();
    }

    header_lines.first().copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> LocaleKeywords {
        LocaleKeywords::default()
    }

    #[test]
    fn test_parse_decimal_normalizes_comma() {
        assert_eq!(parse_decimal("45,67"), Some(45.67));
        assert_eq!(parse_decimal("45.67"), Some(45.67));
        assert_eq!(parse_decimal(" 3,99 "), Some(3.99));
        assert_eq!(parse_decimal("4O,00"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn test_extract_date_first_match_wins() {
        let lines = ["Paragon fiskalny", "2024-03-15 14:22", "2024-03-16"];
        assert_eq!(extract_date(&lines), "2024-03-15");
    }

    #[test]
    fn test_extract_date_does_not_validate_calendar() {
        let lines = ["9999-13-40"];
        assert_eq!(extract_date(&lines), "9999-13-40");
    }

    #[test]
    fn test_extract_date_missing_is_empty() {
        let lines = ["15.03.2024", "no date here"];
        assert_eq!(extract_date(&lines), "");
    }

    #[test]
    fn test_keyword_total_beats_standalone_amount() {
        let mut trace = ParseTrace::new();
        let lines = ["Chleb 3,49", "SUMA PLN 45,67", "99,99"];
        let total = extract_total(&lines, &keywords(), 10.0, &mut trace);
        assert_eq!(total, 45.67);
    }

    #[test]
    fn test_standalone_total_used_when_no_keyword_line() {
        let mut trace = ParseTrace::new();
        let lines = ["Chleb 3,49", "99,99"];
        let total = extract_total(&lines, &keywords(), 10.0, &mut trace);
        assert_eq!(total, 99.99);
        assert!(!trace.is_empty());
    }

    #[test]
    fn test_standalone_total_respects_minimum() {
        let mut trace = ParseTrace::new();
        // A lone small amount is a price, not a total.
        let lines = ["4,99"];
        assert_eq!(extract_total(&lines, &keywords(), 10.0, &mut trace), 0.0);
    }

    #[test]
    fn test_standalone_total_requires_amount_only_line() {
        let mut trace = ParseTrace::new();
        let lines = ["Kawa 99,99"];
        assert_eq!(extract_standalone_total(&lines, 10.0, &mut trace), 0.0);
    }

    #[test]
    fn test_no_total_found_is_zero() {
        let mut trace = ParseTrace::new();
        let lines = ["Paragon fiskalny", "Dziękujemy"];
        assert_eq!(extract_total(&lines, &keywords(), 10.0, &mut trace), 0.0);
        assert!(trace.is_empty());
    }

    #[test]
    fn test_merchant_from_short_header() {
        let blocks = vec!["Żabka\nul. Polna 3\n00-001 Warszawa".to_string()];
        assert_eq!(extract_merchant(&blocks, &keywords()), "Żabka");
    }

    #[test]
    fn test_merchant_suffix_line_in_long_header() {
        let blocks = vec![
            "PARAGON\nFISKALNY\nBiedronka Sp. z o.o.\nul. Polna 3\n00-001 Warszawa\nNIP 123-456-78-90\nKasa 2".to_string(),
        ];
        assert_eq!(
            extract_merchant(&blocks, &keywords()),
            "Biedronka Sp. z o.o."
        );
    }

    #[test]
    fn test_merchant_sixth_line_fallback_in_long_header() {
        let blocks = vec![
            "a\nb\nc\nd\ne\nline six\ng\nh".to_string(),
        ];
        assert_eq!(extract_merchant(&blocks, &keywords()), "line six");
    }

    #[test]
    fn test_merchant_empty_corpus() {
        assert_eq!(extract_merchant(&[], &keywords()), "");
        assert_eq!(extract_merchant(&["".to_string()], &keywords()), "");
    }
}
