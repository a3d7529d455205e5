//! Rule-based field extractors for supplier invoices.

pub mod amounts;
pub mod dates;
pub mod items;
pub mod patterns;

pub use amounts::{extract_amounts, last_amount, parse_amount, InvoiceAmounts};
pub use dates::{extract_invoice_date, parse_date};
pub use items::extract_line_items;

/// Extraction context with confidence scores.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            source: source.into(),
        }
    }
}
