//! Extracted invoice data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An invoice as produced by an extraction strategy.
///
/// Produced once per pipeline run and read-only downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number/identifier.
    pub invoice_number: String,

    /// Date the invoice was issued.
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,

    /// Supplier (seller) name.
    pub supplier: String,

    /// Purchase order number quoted on the invoice.
    #[serde(default)]
    pub po_reference: Option<String>,

    /// Currency code (default: GBP).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Line items in document order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Total before VAT.
    pub subtotal: Decimal,

    /// VAT amount.
    pub vat: Decimal,

    /// Amount payable.
    pub total: Decimal,
}

pub(crate) fn default_currency() -> String {
    "GBP".to_string()
}

/// Sum line totals without overflowing.
pub fn sum_line_totals(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total))
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product/service description.
    pub description: String,

    /// Quantity.
    pub quantity: Decimal,

    /// Unit of measure.
    #[serde(default)]
    pub unit: String,

    /// Price per unit.
    pub unit_price: Decimal,

    /// Total for this line.
    pub line_total: Decimal,

    /// Extraction confidence (0.0 - 1.0).
    #[serde(default)]
    pub extraction_confidence: f32,
}

impl LineItem {
    /// Check whether the line total agrees with quantity × unit price.
    /// Amounts too large to multiply are inconsistent.
    pub fn is_consistent(&self) -> bool {
        self.quantity
            .checked_mul(self.unit_price)
            .and_then(|product| product.checked_sub(self.line_total))
            .is_some_and(|diff| diff.abs() <= Decimal::new(1, 2))
    }
}

impl Invoice {
    /// The degenerate invoice used when nothing could be extracted.
    pub fn empty() -> Self {
        Self {
            invoice_number: "UNKNOWN".to_string(),
            invoice_date: None,
            supplier: "UNKNOWN".to_string(),
            po_reference: None,
            currency: default_currency(),
            line_items: Vec::new(),
            subtotal: Decimal::ZERO,
            vat: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// True when extraction produced neither line items nor a total.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty() && self.total.is_zero()
    }

    /// Sum of the line totals, `None` on overflow.
    pub fn line_items_total(&self) -> Option<Decimal> {
        sum_line_totals(&self.line_items)
    }

    /// Validate the invoice data and return any issues found.
    ///
    /// None of these are enforced; they are reported as extraction warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let tolerance = Decimal::new(1, 2);

        if self.invoice_number.is_empty() || self.invoice_number == "UNKNOWN" {
            issues.push("Missing invoice number".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.total.is_zero() {
            issues.push("Total is zero".to_string());
        }

        let summary_diff = self
            .subtotal
            .checked_add(self.vat)
            .and_then(|sum| sum.checked_sub(self.total));
        match summary_diff {
            Some(diff) if diff.abs() <= tolerance => {}
            Some(_) => issues.push(format!(
                "Subtotal ({}) plus VAT ({}) differs from total ({})",
                self.subtotal, self.vat, self.total
            )),
            None => issues.push("Subtotal plus VAT is out of range".to_string()),
        }

        if !self.line_items.is_empty() {
            match self.line_items_total() {
                Some(calculated) => {
                    let agrees = calculated
                        .checked_sub(self.subtotal)
                        .is_some_and(|diff| diff.abs() <= tolerance);
                    if !agrees {
                        issues.push(format!(
                            "Line item total ({}) differs from subtotal ({})",
                            calculated, self.subtotal
                        ));
                    }
                }
                None => issues.push("Line item total is out of range".to_string()),
            }
        }

        for item in self.line_items.iter().filter(|i| !i.is_consistent()) {
            issues.push(format!(
                "Line '{}': {} x {} does not equal {}",
                item.description, item.quantity, item.unit_price, item.line_total
            ));
        }

        issues
    }
}

impl Default for Invoice {
    fn default() -> Self {
        Self::empty()
    }
}
