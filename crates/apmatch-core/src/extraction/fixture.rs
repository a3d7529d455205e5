//! Fixture-table extraction for tests and demos.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::{Extraction, InvoiceExtractor, Result};
use crate::error::ExtractionError;
use crate::models::invoice::Invoice;

const FIXTURE_CONFIDENCE: f32 = 0.95;

/// Returns pre-recorded invoices keyed by document file name.
#[derive(Debug, Clone, Default)]
pub struct FixtureExtractor {
    invoices: HashMap<String, Invoice>,
}

impl FixtureExtractor {
    /// Create an empty fixture table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an invoice for a document name.
    pub fn with_invoice(mut self, document: impl Into<String>, invoice: Invoice) -> Self {
        self.invoices.insert(document.into(), invoice);
        self
    }

    /// Parse a fixture table: a JSON object of document name → invoice.
    pub fn from_json(json: &str) -> Result<Self> {
        let invoices: HashMap<String, Invoice> = serde_json::from_str(json)?;
        Ok(Self { invoices })
    }

    /// Load a fixture table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Number of documents in the table.
    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }
}

impl InvoiceExtractor for FixtureExtractor {
    fn try_extract(&self, document: &Path) -> Result<Extraction> {
        let name = document
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let invoice = self
            .invoices
            .get(name)
            .cloned()
            .ok_or_else(|| ExtractionError::UnknownDocument(name.to_string()))?;

        debug!("Fixture invoice for {}", name);

        Ok(Extraction {
            warnings: invoice.validate(),
            invoice,
            confidence: FIXTURE_CONFIDENCE,
            reasoning: Some("Fixture extraction from recorded invoice data".to_string()),
        })
    }
}
