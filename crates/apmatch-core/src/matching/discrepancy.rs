//! Discrepancy detection between an invoice and its matched purchase order.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::config::DiscrepancyConfig;
use crate::models::discrepancy::Discrepancy;
use crate::models::invoice::Invoice;
use crate::models::purchase_order::PurchaseOrder;

/// Compares an invoice with its matched purchase order.
///
/// Emits at most one finding per call.
#[derive(Debug, Clone)]
pub struct DiscrepancyDetector {
    variance_threshold: Decimal,
}

impl DiscrepancyDetector {
    /// Create a detector with the default 5% threshold.
    pub fn new() -> Self {
        Self::with_config(DiscrepancyConfig::default())
    }

    pub fn with_config(config: DiscrepancyConfig) -> Self {
        Self {
            variance_threshold: config.variance_threshold,
        }
    }

    /// Detect discrepancies for an invoice and its matched PO, if any.
    pub fn detect(&self, invoice: &Invoice, matched_po: Option<&PurchaseOrder>) -> Vec<Discrepancy> {
        let Some(po) = matched_po else {
            debug!("No matched PO for invoice {}", invoice.invoice_number);
            return vec![Discrepancy::no_matching_po(invoice.total)];
        };

        if po.total.is_zero() {
            warn!("{} has a zero total, variance is undefined", po.label());
            return vec![Discrepancy::zero_po_total(invoice.total, po.total)];
        }

        let Some(variance) = variance_percentage(invoice.total, po.total) else {
            warn!("Variance against {} is out of range", po.label());
            return vec![Discrepancy::price_mismatch(invoice.total, po.total, None)];
        };

        debug!("Variance against {}: {}%", po.label(), variance);

        if variance.abs() > self.variance_threshold {
            vec![Discrepancy::price_mismatch(
                invoice.total,
                po.total,
                Some(variance.round_dp(2)),
            )]
        } else {
            Vec::new()
        }
    }
}

impl Default for DiscrepancyDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Signed deviation of the invoice total from the PO total, in percent.
/// Positive when the invoice exceeds the PO. `None` for a zero PO total or
/// when the result is out of range.
pub fn variance_percentage(invoice_total: Decimal, po_total: Decimal) -> Option<Decimal> {
    invoice_total
        .checked_sub(po_total)?
        .checked_div(po_total)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
