//! Amount extraction for supplier invoices.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{
    AMOUNT_PATTERN, DATE_DMY, DATE_YMD, PERCENTAGE, SUBTOTAL_LINE, TOTAL_LINE, VAT_LINE,
};
use super::ExtractionMatch;

/// Summary amounts found on an invoice.
#[derive(Debug, Clone, Default)]
pub struct InvoiceAmounts {
    pub subtotal: Option<ExtractionMatch<Decimal>>,
    pub vat: Option<ExtractionMatch<Decimal>>,
    pub total: Option<ExtractionMatch<Decimal>>,
}

/// Extract subtotal, VAT and total from labeled summary lines.
///
/// A missing value is derived from the other two where possible.
pub fn extract_amounts(text: &str) -> InvoiceAmounts {
    let labeled = |pattern: &regex::Regex| {
        pattern.captures_iter(text).find_map(|caps| {
            let rest = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            last_amount(rest).map(|amount| ExtractionMatch::new(amount, 0.95, &caps[0]))
        })
    };

    let mut result = InvoiceAmounts {
        subtotal: labeled(&SUBTOTAL_LINE),
        vat: labeled(&VAT_LINE),
        total: labeled(&TOTAL_LINE),
    };

    if result.vat.is_none() {
        if let (Some(total), Some(subtotal)) = (&result.total, &result.subtotal) {
            result.vat = total
                .value
                .checked_sub(subtotal.value)
                .map(|vat| ExtractionMatch::new(vat, 0.8, "calculated"));
        }
    }

    if result.subtotal.is_none() {
        if let (Some(total), Some(vat)) = (&result.total, &result.vat) {
            result.subtotal = total
                .value
                .checked_sub(vat.value)
                .map(|subtotal| ExtractionMatch::new(subtotal, 0.8, "calculated"));
        }
    }

    if result.total.is_none() {
        if let (Some(subtotal), Some(vat)) = (&result.subtotal, &result.vat) {
            result.total = subtotal
                .value
                .checked_add(vat.value)
                .map(|total| ExtractionMatch::new(total, 0.8, "calculated"));
        }
    }

    result
}

/// The last money amount in a fragment, ignoring percentages.
/// Fragments holding a date are not amounts.
pub fn last_amount(fragment: &str) -> Option<Decimal> {
    if DATE_DMY.is_match(fragment) || DATE_YMD.is_match(fragment) {
        return None;
    }

    let cleaned = PERCENTAGE.replace_all(fragment, " ");
    AMOUNT_PATTERN
        .find_iter(&cleaned)
        .last()
        .and_then(|m| parse_amount(m.as_str()))
}

/// Parse an amount with optional thousands separators (e.g. "1,234.56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
