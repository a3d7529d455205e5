//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use crate::error::ExtractionError;

/// Reads the text layer of a PDF.
pub struct PdfTextReader {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfTextReader {
    /// Create a new reader with no document loaded.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<(), ExtractionError> {
        let mut doc = Document::load_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        // PDFs encrypted with an empty user password are still readable
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(ExtractionError::Pdf("PDF is encrypted".to_string()));
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| ExtractionError::Pdf(format!("failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(ExtractionError::Pdf("PDF has no pages".to_string()));
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Number of pages in the loaded document.
    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Extract the text layer of the whole document.
    pub fn extract_text(&self) -> Result<String, ExtractionError> {
        if self.document.is_none() {
            return Err(ExtractionError::Pdf("no document loaded".to_string()));
        }

        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))
    }
}

impl Default for PdfTextReader {
    fn default() -> Self {
        Self::new()
    }
}
