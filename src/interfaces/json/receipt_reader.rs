use crate::domain::money::Amount;
use crate::domain::receipt::{Item, ReceiptDraft};
use crate::error::{ReceiptError, Result};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A decimal given either as a JSON string (`"35.35"`) or a JSON number (`35.35`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

impl DecimalInput {
    fn to_amount(&self, field: &str) -> Result<Amount> {
        let text = match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        };
        let value = Decimal::from_str(&text).map_err(|_| {
            ReceiptError::validation(format!("{} is not a decimal amount: {}", field, text))
        })?;
        Amount::new(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemPayload {
    short_description: Option<String>,
    price: Option<DecimalInput>,
}

/// The receipt as it arrives on the wire. Every field is optional here so that
/// a missing field is reported as a validation failure naming that field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayload {
    retailer: Option<String>,
    purchase_date: Option<String>,
    purchase_time: Option<String>,
    total: Option<DecimalInput>,
    items: Option<Vec<ItemPayload>>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| ReceiptError::validation(format!("{} is required", field)))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    // chrono accepts unpadded fields; the wire format does not
    if value.len() != 10 {
        return Err(ReceiptError::validation(format!(
            "purchaseDate must be YYYY-MM-DD: {}",
            value
        )));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ReceiptError::validation(format!("purchaseDate must be YYYY-MM-DD: {}", value))
    })
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    if value.len() != 5 {
        return Err(ReceiptError::validation(format!(
            "purchaseTime must be HH:MM: {}",
            value
        )));
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| {
        ReceiptError::validation(format!("purchaseTime must be HH:MM: {}", value))
    })
}

impl TryFrom<ReceiptPayload> for ReceiptDraft {
    type Error = ReceiptError;

    fn try_from(payload: ReceiptPayload) -> Result<Self> {
        let retailer = required(payload.retailer, "retailer")?;
        let purchase_date = parse_date(&required(payload.purchase_date, "purchaseDate")?)?;
        let purchase_time = parse_time(&required(payload.purchase_time, "purchaseTime")?)?;
        let total = required(payload.total, "total")?.to_amount("total")?;

        let items = required(payload.items, "items")?
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let short_description =
                    required(item.short_description, &format!("items[{}].shortDescription", i))?;
                let field = format!("items[{}].price", i);
                let price = required(item.price, &field)?.to_amount(&field)?;
                Ok(Item::new(short_description, price))
            })
            .collect::<Result<Vec<_>>>()?;

        let draft = ReceiptDraft {
            retailer,
            purchase_date,
            purchase_time,
            total,
            items,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// Reads a receipt payload from a JSON source.
///
/// Structurally invalid JSON, missing fields and badly formatted values are all
/// reported as `ValidationFailed`.
pub struct ReceiptReader<R: Read> {
    source: R,
}

impl<R: Read> ReceiptReader<R> {
    /// Creates a new `ReceiptReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read_draft(self) -> Result<ReceiptDraft> {
        let payload: ReceiptPayload = serde_json::from_reader(self.source)
            .map_err(|e| ReceiptError::validation(format!("The receipt is invalid: {}", e)))?;
        ReceiptDraft::try_from(payload)
    }
}

impl FromStr for ReceiptDraft {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self> {
        ReceiptReader::new(s.as_bytes()).read_draft()
    }
}
