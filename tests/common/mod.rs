#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use receipt_points::domain::money::Amount;
use receipt_points::domain::receipt::{Item, ReceiptDraft};
use rust_decimal::Decimal;
use std::io::{Error, Write};
use tempfile::NamedTempFile;

pub fn item(description: &str, price: Decimal) -> Item {
    Item::new(description, Amount::new(price).unwrap())
}

pub fn draft(retailer: &str, date: &str, time: &str, total: Decimal, items: Vec<Item>) -> ReceiptDraft {
    ReceiptDraft {
        retailer: retailer.to_string(),
        purchase_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        purchase_time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        total: Amount::new(total).unwrap(),
        items,
    }
}

/// Writes a receipt payload with `count` items priced 1.00 to a temp file.
/// Descriptions are 7 characters long, so they never earn description points.
pub fn write_receipt(retailer: &str, total: &str, count: usize) -> Result<NamedTempFile, Error> {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "shortDescription": format!("Item #{}", i),
                "price": "1.00",
            })
        })
        .collect();
    let payload = serde_json::json!({
        "retailer": retailer,
        "purchaseDate": "2022-01-02",
        "purchaseTime": "10:00",
        "total": total,
        "items": items,
    });

    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", payload)?;
    Ok(file)
}
