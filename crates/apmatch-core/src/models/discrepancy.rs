//! Discrepancy findings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A finding raised when an invoice does not agree with its purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Kind of finding.
    #[serde(rename = "type")]
    pub kind: DiscrepancyKind,

    /// How serious the finding is.
    pub severity: Severity,

    /// Human-readable explanation.
    pub details: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_total: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub po_total: Option<Decimal>,

    /// Signed deviation of the invoice total from the PO total, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance_percentage: Option<Decimal>,
}

/// Kind of discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// No purchase order matched the invoice.
    NoMatchingPo,
    /// The invoice total deviates from the PO total beyond the threshold.
    PriceMismatch,
    /// The matched PO has a zero total, so no variance can be computed.
    ZeroPoTotal,
}

impl DiscrepancyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyKind::NoMatchingPo => "no_matching_po",
            DiscrepancyKind::PriceMismatch => "price_mismatch",
            DiscrepancyKind::ZeroPoTotal => "zero_po_total",
        }
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Discrepancy {
    /// No purchase order could be matched.
    pub fn no_matching_po(invoice_total: Decimal) -> Self {
        Self {
            kind: DiscrepancyKind::NoMatchingPo,
            severity: Severity::High,
            details: "No purchase order could be confidently matched".to_string(),
            invoice_total: Some(invoice_total),
            po_total: None,
            variance_percentage: None,
        }
    }

    /// The invoice total deviates from the matched PO total.
    ///
    /// `variance` is `None` when the deviation is too large to express.
    pub fn price_mismatch(
        invoice_total: Decimal,
        po_total: Decimal,
        variance: Option<Decimal>,
    ) -> Self {
        Self {
            kind: DiscrepancyKind::PriceMismatch,
            severity: Severity::High,
            details: "Invoice total deviates significantly from PO".to_string(),
            invoice_total: Some(invoice_total),
            po_total: Some(po_total),
            variance_percentage: variance,
        }
    }

    /// The matched PO total is zero.
    pub fn zero_po_total(invoice_total: Decimal, po_total: Decimal) -> Self {
        Self {
            kind: DiscrepancyKind::ZeroPoTotal,
            severity: Severity::High,
            details: "Matched purchase order has a zero total; variance is undefined".to_string(),
            invoice_total: Some(invoice_total),
            po_total: Some(po_total),
            variance_percentage: None,
        }
    }
}
