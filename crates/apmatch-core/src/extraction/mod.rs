//! Invoice extraction strategies.
//!
//! Extraction turns a source document into an [`Invoice`]. Failures never
//! abort a pipeline run: [`InvoiceExtractor::extract`] recovers them into a
//! degenerate, empty invoice with zero confidence.

mod document;
mod fixture;
mod parser;
pub mod rules;

pub use document::DocumentExtractor;
pub use fixture::FixtureExtractor;
pub use parser::{InvoiceParser, TextInvoiceParser};

use std::path::Path;

use tracing::warn;

use crate::error::ExtractionError;
use crate::models::invoice::Invoice;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Output of an extraction strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Extracted invoice data.
    pub invoice: Invoice,
    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,
    /// Short note on how the invoice was obtained.
    pub reasoning: Option<String>,
    /// Validation warnings raised during extraction.
    pub warnings: Vec<String>,
}

impl Extraction {
    /// An extraction that found nothing.
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self {
            invoice: Invoice::empty(),
            confidence: 0.0,
            reasoning: Some(reason.into()),
            warnings: Vec::new(),
        }
    }
}

/// Trait for invoice extraction strategies.
pub trait InvoiceExtractor {
    /// Extract an invoice from a document, reporting failures.
    fn try_extract(&self, document: &Path) -> Result<Extraction>;

    /// Extract an invoice from a document.
    ///
    /// Any failure yields [`Extraction::degenerate`] instead of an error.
    fn extract(&self, document: &Path) -> Extraction {
        match self.try_extract(document) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!("Extraction failed for {}: {}", document.display(), e);
                Extraction::degenerate(e.to_string())
            }
        }
    }
}
