//! Core library for matching supplier invoices to purchase orders.
//!
//! This crate provides:
//! - Invoice extraction from PDF and text documents, or from fixture tables
//! - Purchase-order loading from JSON storage
//! - PO matching (exact total, then line-item overlap)
//! - Discrepancy detection (missing PO, price mismatch)
//! - A linear pipeline that ends in a recommended action

pub mod error;
pub mod extraction;
pub mod matching;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod purchase_orders;
pub mod resolution;

pub use error::{ApMatchError, ExtractionError, Result, StorageError};
pub use extraction::{DocumentExtractor, Extraction, FixtureExtractor, InvoiceExtractor};
pub use matching::{DiscrepancyDetector, MatchResult, PoMatcher};
pub use models::config::ApMatchConfig;
pub use models::discrepancy::{Discrepancy, DiscrepancyKind, Severity};
pub use models::invoice::{Invoice, LineItem};
pub use models::purchase_order::{PoLineItem, PurchaseOrder};
pub use models::state::{MatchMethod, PipelineState, RecommendedAction};
pub use pipeline::{Pipeline, Stage};
pub use purchase_orders::{InMemoryPurchaseOrders, JsonPurchaseOrderStore, PurchaseOrderSource};
pub use resolution::{Resolution, Resolver, RuleBasedResolver};
