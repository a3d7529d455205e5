//! Recommendation of an action once matching and discrepancy checks ran.

use tracing::debug;

use crate::models::discrepancy::DiscrepancyKind;
use crate::models::state::{PipelineState, RecommendedAction};

/// Outcome of the resolution step.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub action: RecommendedAction,
    pub reasoning: String,
}

impl Resolution {
    fn new(action: RecommendedAction, reasoning: impl Into<String>) -> Self {
        Self {
            action,
            reasoning: reasoning.into(),
        }
    }
}

/// Trait for resolution strategies.
pub trait Resolver {
    /// Recommend an action for the accumulated state.
    fn resolve(&self, state: &PipelineState) -> Resolution;
}

/// Fixed rule table; the first rule that applies wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResolver;

impl RuleBasedResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for RuleBasedResolver {
    fn resolve(&self, state: &PipelineState) -> Resolution {
        let resolution = match &state.extracted_invoice {
            None => manual_entry(state),
            Some(invoice) if invoice.is_empty() => manual_entry(state),
            Some(invoice) if state.has_discrepancy(DiscrepancyKind::NoMatchingPo) => {
                Resolution::new(
                    RecommendedAction::RequestPurchaseOrder,
                    format!(
                        "No purchase order matches invoice {} ({} {}); request the PO from procurement",
                        invoice.invoice_number, invoice.total, invoice.currency
                    ),
                )
            }
            Some(_) if state.has_discrepancy(DiscrepancyKind::ZeroPoTotal) => Resolution::new(
                RecommendedAction::HoldForReview,
                "Matched purchase order has a zero total; review the PO before payment",
            ),
            Some(_) if state.has_discrepancy(DiscrepancyKind::PriceMismatch) => {
                let deviation = state
                    .discrepancies
                    .iter()
                    .find(|d| d.kind == DiscrepancyKind::PriceMismatch)
                    .and_then(|d| d.variance_percentage)
                    .map(|v| format!("deviates {}%", v))
                    .unwrap_or_else(|| "is far outside the total".to_string());
                Resolution::new(
                    RecommendedAction::HoldForReview,
                    format!(
                        "Invoice total {} from the matched PO; hold payment until the difference is explained",
                        deviation
                    ),
                )
            }
            Some(_) => match &state.matched_po {
                Some(po) if state.po_match_confidence < 1.0 => Resolution::new(
                    RecommendedAction::ConfirmMatch,
                    format!(
                        "Matched to {} by line items (confidence {:.2}); a buyer should confirm",
                        po.label(),
                        state.po_match_confidence
                    ),
                ),
                Some(po) => Resolution::new(
                    RecommendedAction::Approve,
                    format!("Invoice total agrees with {}; approve for payment", po.label()),
                ),
                None => Resolution::new(
                    RecommendedAction::RequestPurchaseOrder,
                    "No purchase order was matched",
                ),
            },
        };

        debug!("Recommended action: {}", resolution.action.as_str());
        resolution
    }
}

/// Manual entry, naming the extraction failure when one was recorded.
fn manual_entry(state: &PipelineState) -> Resolution {
    let reasoning = match &state.extraction_reasoning {
        Some(cause) => format!(
            "No invoice data was extracted ({}); enter the invoice manually",
            cause
        ),
        None => "No invoice data was extracted; enter the invoice manually".to_string(),
    };
    Resolution::new(RecommendedAction::ManualEntry, reasoning)
}
