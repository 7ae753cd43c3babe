//! Diagnostic trace collected alongside a parsed receipt.
//!
//! The parsing core is pure and never logs; instead every extraction step
//! records what it did (or skipped) into a `ParseTrace` that travels with the
//! result. The service layer decides whether to expose it to the caller.

use serde::Serialize;

/// Ordered record of parsing decisions for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseTrace {
    events: Vec<String>,
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one parsing decision.
    pub fn note(&mut self, event: impl Into<String>) {
        self.events.push(event.into());
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Consume the trace, yielding the raw event list for serialization.
    pub fn into_events(self) -> Vec<String> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_events_in_order() {
        let mut trace = ParseTrace::new();
        assert!(trace.is_empty());

        trace.note("first");
        trace.note(format!("second {}", 2));

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.events(), &["first".to_string(), "second 2".to_string()]);
        assert_eq!(trace.into_events(), vec!["first", "second 2"]);
    }
}
