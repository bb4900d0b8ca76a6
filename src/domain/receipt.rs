use super::money::Amount;
use crate::error::ReceiptError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier assigned to a receipt when it is stored.
///
/// Backed by a random (v4) UUID, so accidental collisions are negligible.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(Uuid);

impl ReceiptId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A string that is not a valid identifier cannot name a stored receipt,
/// so parsing failures surface as `NotFound`.
impl FromStr for ReceiptId {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ReceiptError::NotFound(s.to_string()))
    }
}

/// A single purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    pub price: Amount,
}

impl Item {
    pub fn new(short_description: impl Into<String>, price: Amount) -> Self {
        Self {
            short_description: short_description.into(),
            price,
        }
    }
}

/// A receipt candidate that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDraft {
    pub retailer: String,
    pub purchase_date: NaiveDate,
    pub purchase_time: NaiveTime,
    pub total: Amount,
    pub items: Vec<Item>,
}

impl ReceiptDraft {
    /// Checks the content rules that typed fields alone cannot express.
    pub fn validate(&self) -> Result<(), ReceiptError> {
        if self.retailer.trim().is_empty() {
            return Err(ReceiptError::validation("retailer must not be empty"));
        }
        if self.items.is_empty() {
            return Err(ReceiptError::validation(
                "receipt must contain at least one item",
            ));
        }
        if let Some(position) = self
            .items
            .iter()
            .position(|item| item.short_description.trim().is_empty())
        {
            return Err(ReceiptError::validation(format!(
                "item {} has an empty shortDescription",
                position
            )));
        }
        Ok(())
    }

    pub fn into_receipt(self, id: ReceiptId) -> Receipt {
        Receipt {
            id,
            retailer: self.retailer,
            purchase_date: self.purchase_date,
            purchase_time: self.purchase_time,
            total: self.total,
            items: self.items,
        }
    }
}

/// A stored receipt with its items in the order they were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub retailer: String,
    pub purchase_date: NaiveDate,
    pub purchase_time: NaiveTime,
    pub total: Amount,
    pub items: Vec<Item>,
}

impl Receipt {
    pub fn header(&self) -> ReceiptHeader {
        ReceiptHeader {
            id: self.id,
            retailer: self.retailer.clone(),
            purchase_date: self.purchase_date,
            purchase_time: self.purchase_time,
            total: self.total,
            item_count: self.items.len() as u32,
        }
    }

    pub fn from_parts(header: ReceiptHeader, items: Vec<Item>) -> Self {
        Self {
            id: header.id,
            retailer: header.retailer,
            purchase_date: header.purchase_date,
            purchase_time: header.purchase_time,
            total: header.total,
            items,
        }
    }
}

/// The receipt record without its items, as persisted in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptHeader {
    pub id: ReceiptId,
    pub retailer: String,
    pub purchase_date: NaiveDate,
    pub purchase_time: NaiveTime,
    pub total: Amount,
    pub item_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(items: Vec<Item>) -> ReceiptDraft {
        ReceiptDraft {
            retailer: "Target".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            purchase_time: NaiveTime::from_hms_opt(13, 1, 0).unwrap(),
            total: Amount::from_cents(3535),
            items,
        }
    }

    #[test]
    fn test_draft_requires_items() {
        let result = draft(vec![]).validate();
        assert!(matches!(result, Err(ReceiptError::ValidationFailed(_))));
    }

    #[test]
    fn test_draft_requires_retailer() {
        let mut d = draft(vec![Item::new("Pepsi", Amount::from_cents(125))]);
        d.retailer = "   ".to_string();
        assert!(matches!(d.validate(), Err(ReceiptError::ValidationFailed(_))));
    }

    #[test]
    fn test_draft_rejects_blank_description() {
        let d = draft(vec![
            Item::new("Pepsi", Amount::from_cents(125)),
            Item::new(" ", Amount::from_cents(100)),
        ]);
        assert!(matches!(d.validate(), Err(ReceiptError::ValidationFailed(_))));
    }

    #[test]
    fn test_header_round_trip() {
        let receipt = draft(vec![
            Item::new("Mountain Dew 12PK", Amount::from_cents(649)),
            Item::new("Emils Cheese Pizza", Amount::from_cents(1225)),
        ])
        .into_receipt(ReceiptId::generate());

        let header = receipt.header();
        assert_eq!(header.item_count, 2);
        let rebuilt = Receipt::from_parts(header, receipt.items.clone());
        assert_eq!(rebuilt, receipt);
    }

    #[test]
    fn test_receipt_id_parse() {
        let id = ReceiptId::generate();
        assert_eq!(id.to_string().parse::<ReceiptId>().unwrap(), id);
        assert!(matches!(
            "not-a-uuid".parse::<ReceiptId>(),
            Err(ReceiptError::NotFound(_))
        ));
    }
}
