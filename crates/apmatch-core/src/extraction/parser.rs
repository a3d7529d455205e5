//! Rule-based invoice parser for extracted document text.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{sum_line_totals, Invoice};

use super::rules::patterns::{CURRENCY, INVOICE_NUMBER, PO_REFERENCE, SUPPLIER};
use super::rules::{extract_amounts, extract_invoice_date, extract_line_items};
use super::{Extraction, Result};
use crate::error::ExtractionError;

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse invoice from text.
    fn parse(&self, text: &str) -> Result<Extraction>;
}

/// Regex-rule parser for English-language supplier invoices.
#[derive(Debug, Clone)]
pub struct TextInvoiceParser {
    /// Currency used when none is printed.
    default_currency: String,
    /// Confidence attached to each parsed line item.
    line_item_confidence: f32,
}

impl TextInvoiceParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            default_currency: config.default_currency.clone(),
            line_item_confidence: config.line_item_confidence,
        }
    }

    /// Set the fallback currency.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    fn extract_invoice_number(&self, text: &str) -> Option<String> {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_po_reference(&self, text: &str) -> Option<String> {
        PO_REFERENCE
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    fn extract_supplier(&self, text: &str) -> Option<String> {
        if let Some(caps) = SUPPLIER.captures(text) {
            return Some(caps[1].to_string());
        }

        // Letterhead: the first line that is not an "INVOICE" title.
        text.lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .find(|l| !l.to_lowercase().starts_with("invoice") && !l.to_lowercase().starts_with("tax invoice"))
            .filter(|l| l.chars().any(|c| c.is_alphabetic()) && !l.contains(':'))
            .map(|l| l.to_string())
    }

    fn extract_currency(&self, text: &str) -> String {
        CURRENCY
            .captures(text)
            .map(|caps| {
                if let Some(code) = caps.get(1) {
                    return code.as_str().to_uppercase();
                }
                match caps.get(2).map(|m| m.as_str()) {
                    Some("£") => "GBP".to_string(),
                    Some("€") => "EUR".to_string(),
                    Some("$") => "USD".to_string(),
                    _ => self.default_currency.clone(),
                }
            })
            .unwrap_or_else(|| self.default_currency.clone())
    }
}

impl Default for TextInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for TextInvoiceParser {
    fn parse(&self, text: &str) -> Result<Extraction> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::NoText("document text".to_string()));
        }

        info!("Parsing invoice from {} characters of text", text.len());

        let invoice_number = self.extract_invoice_number(text);
        let invoice_date = extract_invoice_date(text).map(|m| m.value);
        let supplier = self.extract_supplier(text);
        let line_items = extract_line_items(text, self.line_item_confidence);

        let amounts = extract_amounts(text);
        let subtotal = match amounts.subtotal {
            Some(m) => m.value,
            None => sum_line_totals(&line_items)
                .ok_or_else(|| ExtractionError::AmountOverflow("line item total".to_string()))?,
        };
        let vat = amounts.vat.map(|m| m.value).unwrap_or(Decimal::ZERO);
        let total = match amounts.total {
            Some(m) => m.value,
            None => subtotal
                .checked_add(vat)
                .ok_or_else(|| ExtractionError::AmountOverflow("subtotal plus VAT".to_string()))?,
        };

        let invoice = Invoice {
            invoice_number: invoice_number.unwrap_or_else(|| "UNKNOWN".to_string()),
            invoice_date,
            supplier: supplier.unwrap_or_else(|| "UNKNOWN".to_string()),
            po_reference: self.extract_po_reference(text),
            currency: self.extract_currency(text),
            line_items,
            subtotal,
            vat,
            total,
        };

        // Overall confidence
        let mut confidence = 1.0f32;
        if invoice.invoice_number == "UNKNOWN" {
            confidence -= 0.2;
        }
        if invoice.line_items.is_empty() {
            confidence -= 0.3;
        }
        if invoice.total.is_zero() {
            confidence -= 0.2;
        }
        if invoice.invoice_date.is_none() {
            confidence -= 0.05;
        }

        let warnings = invoice.validate();
        if !warnings.is_empty() {
            confidence -= 0.1;
        }

        debug!(
            "Extracted invoice {} with confidence {:.2} in {:?}",
            invoice.invoice_number,
            confidence,
            start.elapsed()
        );

        Ok(Extraction {
            invoice,
            confidence: confidence.max(0.0),
            reasoning: Some("Rule-based extraction from document text".to_string()),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const BASELINE: &str = r#"
        Northgate Pharma Supplies Ltd
        12 Mill Lane, Leeds LS1 4AB

        INVOICE
        Invoice Number: INV-2024-0117
        Invoice Date: 14/03/2024
        PO Reference: PO-2024-001

        Description                  Qty      Unit Price   Amount
        Paracetamol BP 500mg         50 kg    £125.00      £6,250.00
        Microcrystalline Cellulose   100 kg   £8.50        £850.00
        Magnesium Stearate Ph Eur    25 kg    £24.00       £600.00
        Titanium Dioxide E171        15 kg    £18.50       £277.50

        Subtotal: £7,977.50
        VAT (20%): £1,595.50
        Total Due: £9,573.00
    "#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_baseline_invoice() {
        let extraction = TextInvoiceParser::new().parse(BASELINE).unwrap();
        let invoice = extraction.invoice;

        assert_eq!(invoice.invoice_number, "INV-2024-0117");
        assert_eq!(invoice.invoice_date, NaiveDate::from_ymd_opt(2024, 3, 14));
        assert_eq!(invoice.supplier, "Northgate Pharma Supplies Ltd");
        assert_eq!(invoice.po_reference.as_deref(), Some("PO-2024-001"));
        assert_eq!(invoice.currency, "GBP");
        assert_eq!(invoice.line_items.len(), 4);
        assert_eq!(invoice.line_items[3].description, "Titanium Dioxide E171");
        assert_eq!(invoice.subtotal, dec("7977.50"));
        assert_eq!(invoice.vat, dec("1595.50"));
        assert_eq!(invoice.total, dec("9573.00"));

        assert!(extraction.warnings.is_empty(), "{:?}", extraction.warnings);
        assert_eq!(extraction.confidence, 1.0);
    }

    #[test]
    fn test_labeled_supplier_wins() {
        let text = "INVOICE\nSupplier: Acme Excipients plc\nInvoice No: 77\nTotal: 10.00";
        let invoice = TextInvoiceParser::new().parse(text).unwrap().invoice;

        assert_eq!(invoice.supplier, "Acme Excipients plc");
        assert_eq!(invoice.invoice_number, "77");
        assert_eq!(invoice.total, dec("10.00"));
    }

    #[test]
    fn test_totals_fall_back_to_line_items() {
        let text = "Invoice #A-1\nTalc Pharma Grade 60 kg 8.80 528.00";
        let invoice = TextInvoiceParser::new().parse(text).unwrap().invoice;

        assert_eq!(invoice.subtotal, dec("528.00"));
        assert_eq!(invoice.vat, Decimal::ZERO);
        assert_eq!(invoice.total, dec("528.00"));
    }

    #[test]
    fn test_default_currency() {
        let text = "Invoice No: 5\nTotal: 10.00";
        let parser = TextInvoiceParser::new().with_default_currency("EUR");
        assert_eq!(parser.parse(text).unwrap().invoice.currency, "EUR");
    }

    #[test]
    fn test_unreadable_text_lowers_confidence() {
        let extraction = TextInvoiceParser::new().parse("~~ scanned page ~~").unwrap();

        assert_eq!(extraction.invoice.invoice_number, "UNKNOWN");
        assert!(extraction.invoice.is_empty());
        assert!(extraction.confidence < 0.5);
    }

    #[test]
    fn test_oversized_quantities_become_a_warning() {
        let text = "Invoice No: X-1\nWidget 1000000000000000 kg 1000000000000000 1.00\nTotal: 1.00";
        let extraction = TextInvoiceParser::new().parse(text).unwrap();

        assert_eq!(extraction.invoice.line_items.len(), 1);
        assert_eq!(extraction.invoice.total, dec("1.00"));
        assert!(
            extraction.warnings.iter().any(|w| w.starts_with("Line 'Widget'")),
            "{:?}",
            extraction.warnings
        );
    }

    #[test]
    fn test_overflowing_line_totals_are_an_error() {
        let text = "Invoice No: X-2\n\
                    Widget 1 kg 1.00 60000000000000000000000000000\n\
                    Gadget 1 kg 1.00 60000000000000000000000000000";

        assert!(matches!(
            TextInvoiceParser::new().parse(text),
            Err(ExtractionError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert!(matches!(
            TextInvoiceParser::new().parse("   \n "),
            Err(ExtractionError::NoText(_))
        ));
    }
}
