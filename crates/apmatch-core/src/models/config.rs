//! Configuration structures for the matching pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the apmatch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApMatchConfig {
    /// PO matching configuration.
    pub matching: MatchingConfig,

    /// Discrepancy detection configuration.
    pub discrepancy: DiscrepancyConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Purchase-order data source configuration.
    pub purchase_orders: PurchaseOrderConfig,
}

/// Matcher thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Absolute tolerance for an exact total match (currency units).
    pub total_tolerance: Decimal,

    /// Confidence assigned to an exact total match.
    pub exact_confidence: f32,

    /// Fraction of invoice line items that must appear on a PO for a
    /// fallback match.
    pub overlap_ratio: f64,

    /// Confidence assigned to a line-item overlap match.
    pub overlap_confidence: f32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            total_tolerance: Decimal::new(1, 2),
            exact_confidence: 1.0,
            overlap_ratio: 0.5,
            overlap_confidence: 0.6,
        }
    }
}

/// Discrepancy thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscrepancyConfig {
    /// Largest absolute variance (percent) that is not a price mismatch.
    pub variance_threshold: Decimal,
}

impl Default for DiscrepancyConfig {
    fn default() -> Self {
        Self {
            variance_threshold: Decimal::from(5),
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Fixture table to use instead of reading documents.
    pub fixtures: Option<PathBuf>,

    /// Default currency if not detected.
    pub default_currency: String,

    /// Confidence assigned to each parsed line item.
    pub line_item_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fixtures: None,
            default_currency: "GBP".to_string(),
            line_item_confidence: 0.85,
        }
    }
}

/// Purchase-order storage location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseOrderConfig {
    /// JSON file holding the purchase orders.
    pub path: PathBuf,
}

impl Default for PurchaseOrderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/purchase_orders.json"),
        }
    }
}

impl ApMatchConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
