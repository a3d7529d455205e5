//! Line item table extraction.

use rust_decimal::Decimal;
use tracing::trace;

use super::amounts::parse_amount;
use super::patterns::{ITEM_TABLE_HEADER, LINE_ITEM, SUBTOTAL_LINE, TOTAL_LINE, VAT_LINE};
use crate::models::invoice::LineItem;

/// Extract line items from invoice text.
///
/// When an item table header ("Description ... Qty") is present, only rows
/// between the header and the first summary line are read. Otherwise every
/// line shaped like an item row is taken.
pub fn extract_line_items(text: &str, confidence: f32) -> Vec<LineItem> {
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.replace(['|', '\t'], " "))
        .collect();

    let header = lines.iter().position(|l| ITEM_TABLE_HEADER.is_match(l));
    let rows: &[String] = match header {
        Some(idx) => &lines[idx + 1..],
        None => &lines,
    };

    let mut items = Vec::new();
    for line in rows {
        if is_summary_line(line) {
            if header.is_some() {
                break;
            }
            continue;
        }

        if let Some(item) = parse_line_item(line, confidence) {
            trace!("Parsed line item: {}", item.description);
            items.push(item);
        }
    }

    items
}

fn is_summary_line(line: &str) -> bool {
    SUBTOTAL_LINE.is_match(line) || VAT_LINE.is_match(line) || TOTAL_LINE.is_match(line)
}

/// Parse one "description qty unit price total" row.
fn parse_line_item(line: &str, confidence: f32) -> Option<LineItem> {
    let caps = LINE_ITEM.captures(line)?;

    let description = caps[1].trim().to_string();
    let quantity = parse_amount(&caps[2])?;
    let unit = caps[3].to_string();
    let unit_price = parse_amount(&caps[4])?;
    let line_total = parse_amount(&caps[5])?;

    if quantity < Decimal::ZERO {
        return None;
    }

    Some(LineItem {
        description,
        quantity,
        unit,
        unit_price,
        line_total,
        extraction_confidence: confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_extract_table_rows() {
        let text = r#"
            Description                  Qty    Unit Price   Amount
            Paracetamol BP 500mg         50 kg  £125.00      £6,250.00
            Microcrystalline Cellulose   100 kg £8.50        £850.00
            Subtotal: £7,100.00
            Stray 1 kg 1.00 1.00
        "#;

        let items = extract_line_items(text, 0.85);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Paracetamol BP 500mg");
        assert_eq!(items[0].quantity, Decimal::from(50));
        assert_eq!(items[1].unit, "kg");
        assert_eq!(items[1].unit_price, Decimal::from_str("8.50").unwrap());
        assert_eq!(items[1].line_total, Decimal::from(850));
        assert_eq!(items[1].extraction_confidence, 0.85);
    }

    #[test]
    fn test_extract_pipe_separated_rows_without_header() {
        let text = "1 | Talc Pharma Grade | 60 kg | 8.80 | 528.00\nTotal: 528.00";
        let items = extract_line_items(text, 0.5);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Talc Pharma Grade");
        assert!(items[0].is_consistent());
    }

    #[test]
    fn test_no_items() {
        assert!(extract_line_items("Thank you for your business", 0.85).is_empty());
    }
}
