//! State carried through one pipeline run.

use serde::{Deserialize, Serialize};

use super::discrepancy::{Discrepancy, DiscrepancyKind};
use super::invoice::Invoice;
use super::purchase_order::PurchaseOrder;

/// Aggregate passed through every pipeline stage.
///
/// Each stage writes only its own fields: extraction owns the invoice and
/// extraction confidence, matching owns the matched PO and match fields,
/// discrepancy detection appends to `discrepancies`, resolution owns the
/// recommendation and reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    /// Source document reference.
    pub source: String,

    pub extracted_invoice: Option<Invoice>,

    pub matched_po: Option<PurchaseOrder>,

    /// Findings, append only.
    pub discrepancies: Vec<Discrepancy>,

    pub extraction_confidence: f32,

    /// How the invoice was obtained, or why nothing could be.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_reasoning: Option<String>,

    /// Validation warnings raised during extraction.
    #[serde(default)]
    pub extraction_warnings: Vec<String>,

    pub po_match_confidence: f32,

    /// How the PO was matched, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_method: Option<MatchMethod>,

    pub recommended_action: Option<RecommendedAction>,

    pub agent_reasoning: Option<String>,
}

/// Rule that selected the matched PO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// PO total equals the invoice total within tolerance.
    ExactTotal,
    /// Enough invoice line items appear on the PO.
    LineItemOverlap,
}

/// Action recommended once discrepancies are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Pay the invoice.
    Approve,
    /// A buyer should confirm a heuristic PO match before payment.
    ConfirmMatch,
    /// Hold payment until the deviation is reviewed.
    HoldForReview,
    /// Ask the supplier or procurement for the purchase order.
    RequestPurchaseOrder,
    /// Nothing could be extracted; key the invoice in by hand.
    ManualEntry,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::Approve => "approve",
            RecommendedAction::ConfirmMatch => "confirm_match",
            RecommendedAction::HoldForReview => "hold_for_review",
            RecommendedAction::RequestPurchaseOrder => "request_purchase_order",
            RecommendedAction::ManualEntry => "manual_entry",
        }
    }
}

impl PipelineState {
    /// Fresh state for one document. Every run gets its own discrepancy list.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            extracted_invoice: None,
            matched_po: None,
            discrepancies: Vec::new(),
            extraction_confidence: 0.0,
            extraction_reasoning: None,
            extraction_warnings: Vec::new(),
            po_match_confidence: 0.0,
            match_method: None,
            recommended_action: None,
            agent_reasoning: None,
        }
    }

    /// Check whether a finding of the given kind was raised.
    pub fn has_discrepancy(&self, kind: DiscrepancyKind) -> bool {
        self.discrepancies.iter().any(|d| d.kind == kind)
    }

    /// Serialize the state as pretty-printed JSON for reporting.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_new_state_is_empty() {
        let state = PipelineState::new("Invoice_1_Baseline.pdf");
        assert_eq!(state.source, "Invoice_1_Baseline.pdf");
        assert!(state.extracted_invoice.is_none());
        assert!(state.discrepancies.is_empty());
        assert_eq!(state.po_match_confidence, 0.0);
    }

    #[test]
    fn test_states_do_not_share_discrepancies() {
        let mut first = PipelineState::new("a.pdf");
        first.discrepancies.push(Discrepancy::no_matching_po(Decimal::ONE));

        let second = PipelineState::new("b.pdf");
        assert!(second.discrepancies.is_empty());
        assert!(first.has_discrepancy(DiscrepancyKind::NoMatchingPo));
    }

    #[test]
    fn test_snapshot_expands_nested_records() {
        let mut state = PipelineState::new("a.pdf");
        state.extracted_invoice = Some(Invoice::empty());
        state.recommended_action = Some(RecommendedAction::ManualEntry);

        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["extracted_invoice"]["invoice_number"], "UNKNOWN");
        assert_eq!(value["recommended_action"], "manual_entry");
        assert_eq!(value["matched_po"], serde_json::Value::Null);
        assert!(value["discrepancies"].as_array().unwrap().is_empty());
    }
}
