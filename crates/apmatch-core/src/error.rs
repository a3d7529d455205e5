//! Error types for the apmatch-core library.

use thiserror::Error;

/// Main error type for the apmatch library.
#[derive(Error, Debug)]
pub enum ApMatchError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Purchase-order storage error.
    #[error("purchase order storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a source document into an invoice.
///
/// These never abort a pipeline run: the extraction contract recovers them
/// into a degenerate, empty invoice.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF could not be parsed.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The document has no extractable text (e.g. a scanned image).
    #[error("no text could be extracted from {0}")]
    NoText(String),

    /// The document type is not supported.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Amounts on the document exceed the supported range.
    #[error("amount out of range: {0}")]
    AmountOverflow(String),

    /// The fixture table has no entry for the document.
    #[error("no fixture for document: {0}")]
    UnknownDocument(String),

    /// The fixture table itself is malformed.
    #[error("invalid fixture data: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Errors raised by a purchase-order data source.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage could not be read.
    #[error("failed to read purchase orders: {0}")]
    Io(#[from] std::io::Error),

    /// The storage is not valid JSON.
    #[error("invalid purchase order JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The storage is valid JSON but neither a list nor a map of records.
    #[error("purchase order storage must be a list or a map of records, found {0}")]
    Format(&'static str),
}

/// Result type for the apmatch library.
pub type Result<T> = std::result::Result<T, ApMatchError>;
