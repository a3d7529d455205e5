//! Pipeline driver: extraction, matching, discrepancy detection, resolution.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::extraction::{DocumentExtractor, FixtureExtractor, InvoiceExtractor};
use crate::matching::{DiscrepancyDetector, PoMatcher};
use crate::models::config::ApMatchConfig;
use crate::models::state::PipelineState;
use crate::purchase_orders::{JsonPurchaseOrderStore, PurchaseOrderSource};
use crate::resolution::{Resolver, RuleBasedResolver};

/// Pipeline stages, in the only order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    Matching,
    DetectingDiscrepancies,
    Resolving,
    Done,
}

impl Stage {
    /// The stage that follows this one.
    pub fn next(self) -> Self {
        match self {
            Stage::Extracting => Stage::Matching,
            Stage::Matching => Stage::DetectingDiscrepancies,
            Stage::DetectingDiscrepancies => Stage::Resolving,
            Stage::Resolving | Stage::Done => Stage::Done,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extracting => "extracting",
            Stage::Matching => "matching",
            Stage::DetectingDiscrepancies => "detecting discrepancies",
            Stage::Resolving => "resolving",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Runs documents through every stage.
pub struct Pipeline {
    extractor: Box<dyn InvoiceExtractor>,
    purchase_orders: Box<dyn PurchaseOrderSource>,
    resolver: Box<dyn Resolver>,
    matcher: PoMatcher,
    detector: DiscrepancyDetector,
}

impl Pipeline {
    /// Create a pipeline with default matcher, detector and resolver.
    pub fn new(
        extractor: impl InvoiceExtractor + 'static,
        purchase_orders: impl PurchaseOrderSource + 'static,
    ) -> Self {
        Self {
            extractor: Box::new(extractor),
            purchase_orders: Box::new(purchase_orders),
            resolver: Box::new(RuleBasedResolver),
            matcher: PoMatcher::new(),
            detector: DiscrepancyDetector::new(),
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// A configured fixture table replaces document extraction.
    pub fn from_config(config: &ApMatchConfig) -> Result<Self> {
        let store = JsonPurchaseOrderStore::new(&config.purchase_orders.path);

        let pipeline = match &config.extraction.fixtures {
            Some(path) => Self::new(FixtureExtractor::from_file(path)?, store),
            None => Self::new(DocumentExtractor::with_config(&config.extraction), store),
        };

        Ok(pipeline
            .with_matcher(PoMatcher::with_config(config.matching.clone()))
            .with_detector(DiscrepancyDetector::with_config(config.discrepancy.clone())))
    }

    pub fn with_matcher(mut self, matcher: PoMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_detector(mut self, detector: DiscrepancyDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Process one document.
    ///
    /// Extraction failures are absorbed into an empty invoice. Purchase-order
    /// storage failures end the run with an error.
    pub fn run(&self, document: &Path) -> Result<PipelineState> {
        let mut state = PipelineState::new(document.display().to_string());
        let mut stage = Stage::Extracting;

        while stage != Stage::Done {
            debug!("{}: {}", state.source, stage);
            match stage {
                Stage::Extracting => self.extract(document, &mut state),
                Stage::Matching => self.match_purchase_order(&mut state)?,
                Stage::DetectingDiscrepancies => self.detect_discrepancies(&mut state),
                Stage::Resolving => self.resolve(&mut state),
                Stage::Done => {}
            }
            stage = stage.next();
        }

        info!(
            "{}: {} discrepancies, recommended {}",
            state.source,
            state.discrepancies.len(),
            state
                .recommended_action
                .map(|a| a.as_str())
                .unwrap_or("nothing")
        );

        Ok(state)
    }

    /// Process documents independently, one result per document.
    pub fn run_batch<P: AsRef<Path>>(
        &self,
        documents: impl IntoIterator<Item = P>,
    ) -> Vec<Result<PipelineState>> {
        documents
            .into_iter()
            .map(|document| self.run(document.as_ref()))
            .collect()
    }

    fn extract(&self, document: &Path, state: &mut PipelineState) {
        let extraction = self.extractor.extract(document);
        state.extraction_confidence = extraction.confidence;
        state.extraction_reasoning = extraction.reasoning;
        state.extraction_warnings = extraction.warnings;
        state.extracted_invoice = Some(extraction.invoice);
    }

    fn match_purchase_order(&self, state: &mut PipelineState) -> Result<()> {
        let Some(invoice) = &state.extracted_invoice else {
            debug!("{}: no invoice, skipping matching", state.source);
            return Ok(());
        };

        let purchase_orders = self.purchase_orders.load()?;
        let result = self.matcher.find_match(invoice, &purchase_orders);

        if result.is_match() {
            state.po_match_confidence = result.confidence;
            state.match_method = result.method;
            state.matched_po = result.purchase_order;
        }

        Ok(())
    }

    fn detect_discrepancies(&self, state: &mut PipelineState) {
        let Some(invoice) = &state.extracted_invoice else {
            return;
        };

        let findings = self.detector.detect(invoice, state.matched_po.as_ref());
        state.discrepancies.extend(findings);
    }

    fn resolve(&self, state: &mut PipelineState) {
        let resolution = self.resolver.resolve(state);
        state.recommended_action = Some(resolution.action);
        state.agent_reasoning = Some(resolution.reasoning);
    }
}
