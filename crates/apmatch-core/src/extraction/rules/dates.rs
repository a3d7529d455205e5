//! Date extraction for supplier invoices.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_LONG, DATE_YMD, INVOICE_DATE};
use super::ExtractionMatch;

/// Extract the invoice date from a labeled "Date:" line.
pub fn extract_invoice_date(text: &str) -> Option<ExtractionMatch<NaiveDate>> {
    INVOICE_DATE.captures_iter(text).find_map(|caps| {
        parse_date(&caps[1]).map(|date| ExtractionMatch::new(date, 0.9, &caps[0]))
    })
}

/// Parse the first date found in a fragment.
///
/// Numeric dates are read day first (DD/MM/YYYY), ISO dates year first.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_YMD.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_DMY.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_LONG.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_to_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Convert an English month name or abbreviation to its number.
fn month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}
