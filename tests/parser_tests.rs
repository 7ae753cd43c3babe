#[cfg(test)]
mod tests {
    use receipt_ocr::config::ParserConfig;
    use receipt_ocr::ReceiptParser;

    fn create_parser() -> ReceiptParser {
        ReceiptParser::new(ParserConfig::default())
    }

    fn corpus(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_parser_always_returns_a_receipt() {
        let parser = create_parser();

        // Total function: every input shape comes back as a receipt
        let inputs: Vec<Vec<String>> = vec![
            vec![],
            corpus(&[""]),
            corpus(&["\n\n\n"]),
            corpus(&["only one line"]),
            corpus(&["1 x3,99"]),
            corpus(&["x x x", ",,,", "9999"]),
        ];
        for input in inputs {
            let outcome = parser.parse(&input);
            assert_eq!(outcome.receipt.raw_text, input);
        }
    }

    #[test]
    fn test_parsing_twice_yields_identical_output() {
        let parser = create_parser();
        let text = corpus(&[
            "Biedronka Sp. z o.o.\nul. Polna 3",
            "2024-03-15",
            "Mleko",
            "1 x3,99 3,99C",
            "SUMA PLN 3,99",
        ]);

        let first = serde_json::to_string(&parser.parse(&text).receipt).unwrap();
        let second = serde_json::to_string(&parser.parse(&text).receipt).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_keyword_total_takes_precedence_over_standalone() {
        let parser = create_parser();
        let text = corpus(&["Razem 45,67", "99,99"]);
        assert_eq!(parser.parse(&text).receipt.total_amount, 45.67);
    }

    #[test]
    fn test_standalone_total_when_no_keyword_line_exists() {
        let parser = create_parser();
        let text = corpus(&["Mleko", "1 x3,99 3,99C", "99,99"]);
        assert_eq!(parser.parse(&text).receipt.total_amount, 99.99);
    }

    #[test]
    fn test_missing_fields_stay_empty_without_error() {
        let parser = create_parser();
        let outcome = parser.parse(&corpus(&["Dziękujemy i zapraszamy"]));
        let receipt = outcome.receipt;

        assert_eq!(receipt.date, "");
        assert_eq!(receipt.total_amount, 0.0);
        assert!(receipt.items.is_empty());
        assert!(receipt.fields.is_empty());
    }

    #[test]
    fn test_merchant_first_line_of_short_header() {
        let parser = create_parser();
        let text = corpus(&["Żabka\nul. Polna 3\n00-001 Warszawa"]);
        assert_eq!(parser.parse(&text).receipt.merchant_name, "Żabka");
    }

    #[test]
    fn test_merchant_sixth_line_of_long_header_without_suffix() {
        let parser = create_parser();
        let text = corpus(&["one\ntwo\nthree\nfour\nfive\nsix\nseven\neight"]);
        assert_eq!(parser.parse(&text).receipt.merchant_name, "six");
    }

    #[test]
    fn test_merchant_suffix_marker_wins_in_long_header() {
        let parser = create_parser();
        let text =
            corpus(&["PARAGON\nFISKALNY\nFrosta S.A.\nul. Polna 3\nWarszawa\nNIP 123\nKasa 1"]);
        assert_eq!(parser.parse(&text).receipt.merchant_name, "Frosta S.A.");
    }

    #[test]
    fn test_date_not_calendar_validated() {
        let parser = create_parser();
        let text = corpus(&["2024-13-01"]);
        assert_eq!(parser.parse(&text).receipt.date, "2024-13-01");
    }

    #[test]
    fn test_trace_documents_extraction_steps() {
        let parser = create_parser();
        let outcome = parser.parse(&corpus(&["Sklep", "SUMA 12,00"]));

        assert!(outcome
            .trace
            .events()
            .iter()
            .any(|event| event.contains("total 12.00")));
    }

    #[test]
    fn test_items_keep_discovery_order() {
        let parser = create_parser();
        let text = corpus(&[
            "Sklep",
            "Woda 1 x2,00 2,00A",
            "Chleb 1 x3,50 3,50A",
            "Mleko 2 x2,49 4,98A",
        ]);
        let items = parser.parse(&text).receipt.items;
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Woda", "Chleb", "Mleko"]);
    }
}
