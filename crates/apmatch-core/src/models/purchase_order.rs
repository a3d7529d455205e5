//! Purchase order records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A purchase order as stored by the procurement side.
///
/// Only `total` is required. Everything else is optional so loosely shaped
/// records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Purchase order number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    /// Supplier name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    /// Currency code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Agreed total.
    pub total: Decimal,

    /// Ordered items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<PoLineItem>,
}

/// A single ordered item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoLineItem {
    /// Product/service description.
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_total: Option<Decimal>,
}

impl PurchaseOrder {
    /// Create a purchase order with only a total.
    pub fn with_total(total: Decimal) -> Self {
        Self {
            po_number: None,
            supplier: None,
            currency: None,
            total,
            line_items: Vec::new(),
        }
    }

    /// Set the purchase order number.
    pub fn with_number(mut self, po_number: impl Into<String>) -> Self {
        self.po_number = Some(po_number.into());
        self
    }

    /// Add an ordered item by description.
    pub fn with_item(mut self, description: impl Into<String>) -> Self {
        self.line_items.push(PoLineItem::new(description));
        self
    }

    /// Convert a loosely typed record, returning `None` when the record
    /// lacks the required shape.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        self.po_number.as_deref().unwrap_or("<unnumbered>")
    }
}

impl PoLineItem {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            quantity: None,
            unit: None,
            unit_price: None,
            line_total: None,
        }
    }
}
