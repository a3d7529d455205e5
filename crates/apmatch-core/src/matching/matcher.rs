//! Invoice to purchase-order matcher.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::MatchingConfig;
use crate::models::invoice::Invoice;
use crate::models::purchase_order::PurchaseOrder;
use crate::models::state::MatchMethod;

/// Outcome of matching one invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Selected purchase order.
    pub purchase_order: Option<PurchaseOrder>,
    /// Confidence of the selection (0.0 when nothing matched).
    pub confidence: f32,
    /// Rule that made the selection.
    pub method: Option<MatchMethod>,
}

impl MatchResult {
    /// No purchase order selected.
    pub fn none() -> Self {
        Self {
            purchase_order: None,
            confidence: 0.0,
            method: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.purchase_order.is_some()
    }
}

/// Selects at most one purchase order for an invoice.
///
/// Exact total matches win over line-item overlap anywhere in the list.
/// Within each rule the first PO in input order wins.
#[derive(Debug, Clone)]
pub struct PoMatcher {
    config: MatchingConfig,
}

impl PoMatcher {
    /// Create a matcher with default thresholds.
    pub fn new() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    /// Create a matcher with custom thresholds.
    pub fn with_config(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Match an invoice against purchase orders.
    pub fn find_match(&self, invoice: &Invoice, purchase_orders: &[PurchaseOrder]) -> MatchResult {
        if purchase_orders.is_empty() {
            debug!("No purchase orders to match against");
            return MatchResult::none();
        }

        if let Some(po) = purchase_orders
            .iter()
            .find(|po| self.totals_agree(invoice.total, po.total))
        {
            info!("Matched {} by total {}", po.label(), po.total);
            return MatchResult {
                purchase_order: Some(po.clone()),
                confidence: self.config.exact_confidence,
                method: Some(MatchMethod::ExactTotal),
            };
        }

        let required = self.required_overlap(invoice.line_items.len());
        for po in purchase_orders.iter().filter(|po| !po.line_items.is_empty()) {
            let matches = count_overlap(invoice, po);
            debug!(
                "{}: {} of {} line items overlap (need {})",
                po.label(),
                matches,
                invoice.line_items.len(),
                required
            );

            if matches as f64 >= required {
                info!("Matched {} by line-item overlap", po.label());
                return MatchResult {
                    purchase_order: Some(po.clone()),
                    confidence: self.config.overlap_confidence,
                    method: Some(MatchMethod::LineItemOverlap),
                };
            }
        }

        debug!("No purchase order matched invoice {}", invoice.invoice_number);
        MatchResult::none()
    }

    fn totals_agree(&self, invoice_total: Decimal, po_total: Decimal) -> bool {
        po_total
            .checked_sub(invoice_total)
            .is_some_and(|diff| diff.abs() < self.config.total_tolerance)
    }

    /// Minimum number of overlapping items, never less than one.
    fn required_overlap(&self, item_count: usize) -> f64 {
        (item_count as f64 * self.config.overlap_ratio).max(1.0)
    }
}

impl Default for PoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Count invoice line items whose description appears, case-insensitively,
/// inside some PO line item description. Each invoice item counts once.
pub fn count_overlap(invoice: &Invoice, po: &PurchaseOrder) -> usize {
    let po_descriptions: Vec<String> = po
        .line_items
        .iter()
        .map(|item| item.description.to_lowercase())
        .collect();

    invoice
        .line_items
        .iter()
        .map(|item| item.description.trim().to_lowercase())
        .filter(|needle| !needle.is_empty())
        .filter(|needle| po_descriptions.iter().any(|hay| hay.contains(needle.as_str())))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::LineItem;
    use pretty_assertions::assert_eq;

    fn invoice(total: i64, descriptions: &[&str]) -> Invoice {
        Invoice {
            invoice_number: "INV-TEST".to_string(),
            line_items: descriptions
                .iter()
                .map(|d| LineItem {
                    description: d.to_string(),
                    quantity: Decimal::ONE,
                    unit: "kg".to_string(),
                    unit_price: Decimal::ONE,
                    line_total: Decimal::ONE,
                    extraction_confidence: 0.85,
                })
                .collect(),
            total: Decimal::from(total),
            ..Invoice::empty()
        }
    }

    fn po(number: &str, total: i64, items: &[&str]) -> PurchaseOrder {
        items.iter().fold(
            PurchaseOrder::with_total(Decimal::from(total)).with_number(number),
            |po, item| po.with_item(*item),
        )
    }

    #[test]
    fn test_exact_total_match() {
        let inv = invoice(9573, &["Paracetamol BP 500mg"]);
        let result = PoMatcher::new().find_match(&inv, &[po("PO-1", 9573, &[])]);

        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.method, Some(MatchMethod::ExactTotal));
        assert_eq!(result.purchase_order.unwrap().label(), "PO-1");
    }

    #[test]
    fn test_exact_match_tolerance_is_strict() {
        let mut inv = invoice(0, &[]);
        inv.total = Decimal::new(1_000_009, 3);
        let close = PurchaseOrder::with_total(Decimal::from(1000));
        assert!(PoMatcher::new().find_match(&inv, &[close.clone()]).is_match());

        inv.total = Decimal::new(100_001, 2);
        assert!(!PoMatcher::new().find_match(&inv, &[close]).is_match());
    }

    #[test]
    fn test_opposite_extreme_totals_do_not_match() {
        let mut inv = invoice(0, &[]);
        inv.total = Decimal::MIN;
        let order = PurchaseOrder::with_total(Decimal::MAX);

        assert!(!PoMatcher::new().find_match(&inv, &[order]).is_match());
    }

    #[test]
    fn test_exact_match_beats_earlier_overlap() {
        let inv = invoice(500, &["Talc Pharma Grade"]);
        let pos = [
            po("PO-OVERLAP", 100, &["talc pharma grade 25kg bag"]),
            po("PO-EXACT", 500, &["something else"]),
        ];

        let result = PoMatcher::new().find_match(&inv, &pos);
        assert_eq!(result.purchase_order.unwrap().label(), "PO-EXACT");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_first_exact_match_wins() {
        let inv = invoice(500, &[]);
        let pos = [po("PO-A", 500, &[]), po("PO-B", 500, &[])];
        let result = PoMatcher::new().find_match(&inv, &pos);
        assert_eq!(result.purchase_order.unwrap().label(), "PO-A");
    }

    #[test]
    fn test_overlap_match() {
        let inv = invoice(
            13476,
            &["Ibuprofen BP 200mg", "Povidone K30 USP", "Sodium Starch Glycolate"],
        );
        let pos = [
            po("PO-OTHER", 4000, &["Mannitol Granular USP"]),
            po("PO-4", 11230, &["IBUPROFEN BP 200MG", "Povidone K30 USP (25kg)"]),
        ];

        let result = PoMatcher::new().find_match(&inv, &pos);
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.method, Some(MatchMethod::LineItemOverlap));
        assert_eq!(result.purchase_order.unwrap().label(), "PO-4");
    }

    #[test]
    fn test_overlap_below_threshold() {
        let inv = invoice(
            13476,
            &["Ibuprofen BP 200mg", "Povidone K30 USP", "Sodium Starch Glycolate"],
        );
        // One of three items is below max(1, 1.5).
        let result = PoMatcher::new().find_match(&inv, &[po("PO-4", 11230, &["Ibuprofen BP 200mg"])]);
        assert_eq!(result, MatchResult::none());
    }

    #[test]
    fn test_overlap_counts_each_invoice_item_once() {
        let inv = invoice(999, &["Starch", "Gelatin", "Lactose", "Talc"]);
        let pos = [po(
            "PO-DUP",
            1,
            &["Pregelatinized Starch", "Corn Starch", "Potato Starch", "Wheat Starch"],
        )];

        assert_eq!(count_overlap(&inv, &pos[0]), 1);
        assert!(!PoMatcher::new().find_match(&inv, &pos).is_match());
    }

    #[test]
    fn test_single_item_invoice_needs_one_match() {
        let inv = invoice(10, &["Talc"]);
        let result = PoMatcher::new().find_match(&inv, &[po("PO-T", 99, &["Talc Pharma Grade"])]);
        assert!(result.is_match());
    }

    #[test]
    fn test_empty_invoice_never_overlaps() {
        let inv = invoice(0, &[]);
        let result = PoMatcher::new().find_match(&inv, &[po("PO-T", 99, &["Talc"])]);
        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_blank_descriptions_do_not_count() {
        let inv = invoice(10, &["  "]);
        assert_eq!(count_overlap(&inv, &po("PO-T", 99, &["Talc"])), 0);
    }

    #[test]
    fn test_no_purchase_orders() {
        let inv = invoice(9573, &["Paracetamol BP 500mg"]);
        assert_eq!(PoMatcher::new().find_match(&inv, &[]), MatchResult::none());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let inv = invoice(13476, &["Ibuprofen BP 200mg", "Povidone K30 USP"]);
        let pos = vec![po("PO-4", 11230, &["Ibuprofen BP 200mg"])];
        let before = (inv.clone(), pos.clone());

        let matcher = PoMatcher::new();
        let first = matcher.find_match(&inv, &pos);
        let second = matcher.find_match(&inv, &pos);

        assert_eq!(first, second);
        assert_eq!((inv, pos), before);
    }
}
