//! Extraction from real documents: PDF text layers and plain text files.

use std::path::Path;

use tracing::{debug, info};

use super::parser::{InvoiceParser, TextInvoiceParser};
use super::{Extraction, InvoiceExtractor, Result};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::pdf::PdfTextReader;

/// Reads a document from disk and parses its text.
///
/// Supported inputs are `.pdf` files with a text layer and `.txt` files.
/// Scanned PDFs without text fail with [`ExtractionError::NoText`].
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    parser: TextInvoiceParser,
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from configuration.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            parser: TextInvoiceParser::with_config(config),
        }
    }

    /// Replace the text parser.
    pub fn with_parser(mut self, parser: TextInvoiceParser) -> Self {
        self.parser = parser;
        self
    }

    /// Read the text of a document without parsing it.
    pub fn read_text(&self, document: &Path) -> Result<String> {
        let extension = document
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => {
                let data = std::fs::read(document)?;
                let mut reader = PdfTextReader::new();
                reader.load(&data)?;
                debug!("{} has {} pages", document.display(), reader.page_count());
                reader.extract_text()
            }
            "txt" => Ok(std::fs::read_to_string(document)?),
            _ => Err(ExtractionError::UnsupportedFormat(
                document.display().to_string(),
            )),
        }
    }
}

impl InvoiceExtractor for DocumentExtractor {
    fn try_extract(&self, document: &Path) -> Result<Extraction> {
        info!("Extracting invoice from {}", document.display());

        let text = self.read_text(document)?;
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText(document.display().to_string()));
        }

        self.parser.parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_extract_text_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "invoice.txt",
            "Acme Excipients plc\nInvoice No: A-17\nTalc Pharma Grade 60 kg 8.80 528.00\nTotal: £528.00\n",
        );

        let extraction = DocumentExtractor::new().try_extract(&path).unwrap();
        assert_eq!(extraction.invoice.invoice_number, "A-17");
        assert_eq!(extraction.invoice.total, Decimal::from(528));
        assert_eq!(extraction.invoice.line_items.len(), 1);
    }

    #[test]
    fn test_blank_text_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "blank.txt", "  \n\n");

        assert!(matches!(
            DocumentExtractor::new().try_extract(&path),
            Err(ExtractionError::NoText(_))
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "invoice.docx", "binary");

        assert!(matches!(
            DocumentExtractor::new().try_extract(&path),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_broken_pdf_degrades() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "Invoice_2_Scanned.pdf", "%PDF-garbage");

        let extractor = DocumentExtractor::new();
        assert!(matches!(
            extractor.try_extract(&path),
            Err(ExtractionError::Pdf(_))
        ));

        let extraction = extractor.extract(&path);
        assert!(extraction.invoice.is_empty());
        assert_eq!(extraction.confidence, 0.0);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DocumentExtractor::new().try_extract(Path::new("/nonexistent/invoice.txt")),
            Err(ExtractionError::Io(_))
        ));
    }
}
