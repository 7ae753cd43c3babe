//! # Receipt OCR Service
//!
//! Converts raw OCR text recognized from photographed retail receipts into
//! structured receipt records: merchant, date, total amount, and itemized
//! purchases with inferred categories.

pub mod categories;
pub mod config;
pub mod entities;
pub mod errors;
pub mod fields;
pub mod line_items;
pub mod locale;
pub mod observability;
pub mod parser;
pub mod receipt;
pub mod service;
pub mod trace;

// Re-export types for easier access
pub use parser::{ParseOutcome, ReceiptParser};
pub use receipt::{Receipt, ReceiptEntityField, ReceiptItem};
