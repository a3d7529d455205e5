//! Common regex patterns for supplier invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Money amounts: 1,234.56 or 1234.56 or 1234
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d{1,2}))?\b"
    ).unwrap();

    pub static ref PERCENTAGE: Regex = Regex::new(
        r"\d+(?:\.\d+)?\s*%"
    ).unwrap();

    pub static ref CURRENCY: Regex = Regex::new(
        r"(?:\b(GBP|EUR|USD|CHF|PLN)\b|(£|€|\$))"
    ).unwrap();

    // Labeled summary lines (anchored so "Subtotal" never reads as "Total")
    pub static ref SUBTOTAL_LINE: Regex = Regex::new(
        r"(?im)^\s*(?:sub\s*-?\s*total|net\s+(?:total|amount))\b(.*)$"
    ).unwrap();

    pub static ref VAT_LINE: Regex = Regex::new(
        r"(?im)^\s*(?:VAT|tax|sales\s+tax)(?:\s+amount)?\b\s*(?:@|at|\(|:|\d|[£€$])(.*)$"
    ).unwrap();

    pub static ref TOTAL_LINE: Regex = Regex::new(
        r"(?im)^\s*(?:grand\s+|invoice\s+)?total(?:\s+(?:due|payable|amount|gross))?\b(.*)$"
    ).unwrap();

    // Header fields
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\binvoice\s*(?:no\.?|number|num\.?|#)\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9/\-_]*)"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"(?im)^\s*(?:invoice\s+|tax\s+point\s+)?date(?:\s+of\s+issue)?\s*:?\s*(.+?)\s*$"
    ).unwrap();

    pub static ref PO_REFERENCE: Regex = Regex::new(
        r"\b(?:P\.?O\.?|(?i:purchase\s+order))\s*(?i:ref(?:erence)?\.?|no\.?|number|#)?\s*[:#]?\s*([A-Za-z0-9][A-Za-z0-9/\-_]*\d[A-Za-z0-9/\-_]*)"
    ).unwrap();

    pub static ref SUPPLIER: Regex = Regex::new(
        r"(?im)^\s*(?:supplier|seller|vendor|from)\s*:\s*(.+?)\s*$"
    ).unwrap();

    // Dates
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]{3,9})\s+(\d{4})\b"
    ).unwrap();

    // Line item table
    pub static ref ITEM_TABLE_HEADER: Regex = Regex::new(
        r"(?i)\b(?:description|item)\b.*\b(?:qty|quantity)\b"
    ).unwrap();

    /// description, quantity, unit, unit price, line total
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"^\s*(?:\d{1,3}[.)]?\s+)?(.+?)\s+(\d+(?:\.\d+)?)\s*([A-Za-z]{1,6})\s+(?:[£€$]\s*)?(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s+(?:[£€$]\s*)?(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)\s*$"
    ).unwrap();
}
