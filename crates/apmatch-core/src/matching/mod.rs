//! Purchase-order matching and discrepancy detection.

mod discrepancy;
mod matcher;

pub use discrepancy::{variance_percentage, DiscrepancyDetector};
pub use matcher::{count_overlap, MatchResult, PoMatcher};
