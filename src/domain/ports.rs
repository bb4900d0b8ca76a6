use super::receipt::{Item, Receipt, ReceiptHeader, ReceiptId};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;

/// A unit of work that writes one receipt.
///
/// Records are staged with `put_header`/`put_item` and become visible only when
/// `commit` succeeds. Dropping a transaction without committing discards it.
#[async_trait]
pub trait ReceiptTransaction: Send {
    fn put_header(&mut self, header: ReceiptHeader) -> Result<()>;
    fn put_item(&mut self, position: u32, item: Item) -> Result<()>;
    async fn commit(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait ReceiptStore: Send + Sync {
    async fn begin(&self, id: ReceiptId) -> Result<ReceiptTransactionBox>;
    async fn get(&self, id: ReceiptId) -> Result<Option<Receipt>>;
    async fn exists(&self, id: ReceiptId) -> Result<bool>;

    /// Writes the receipt header and all of its items in one transaction.
    async fn insert(&self, receipt: &Receipt) -> Result<()> {
        let mut tx = self.begin(receipt.id).await?;
        tx.put_header(receipt.header())?;
        for (position, item) in receipt.items.iter().enumerate() {
            tx.put_item(position as u32, item.clone())?;
        }
        tx.commit().await
    }
}

pub type ReceiptStoreBox = Box<dyn ReceiptStore>;
pub type ReceiptTransactionBox = Box<dyn ReceiptTransaction>;
pub type ReceiptStoreFactory = Box<dyn Fn() -> ReceiptStoreBox + Send + Sync>;

/// Records staged by a transaction before commit.
///
/// Shared by the store adapters so every backend applies the same completeness
/// checks before anything is made visible.
#[derive(Debug)]
pub struct StagedReceipt {
    id: ReceiptId,
    header: Option<ReceiptHeader>,
    items: Vec<(u32, Item)>,
}

impl StagedReceipt {
    pub fn new(id: ReceiptId) -> Self {
        Self {
            id,
            header: None,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> ReceiptId {
        self.id
    }

    pub fn put_header(&mut self, header: ReceiptHeader) -> Result<()> {
        if header.id != self.id {
            return Err(ReceiptError::persistence(format!(
                "header id {} does not match transaction id {}",
                header.id, self.id
            )));
        }
        if self.header.is_some() {
            return Err(ReceiptError::persistence("header already staged"));
        }
        self.header = Some(header);
        Ok(())
    }

    pub fn put_item(&mut self, position: u32, item: Item) -> Result<()> {
        if self.items.iter().any(|(p, _)| *p == position) {
            return Err(ReceiptError::persistence(format!(
                "item {} already staged",
                position
            )));
        }
        self.items.push((position, item));
        Ok(())
    }

    /// Checks that a header and exactly `item_count` contiguous items were
    /// staged, and returns them in position order.
    pub fn finish(mut self) -> Result<(ReceiptHeader, Vec<Item>)> {
        let header = self
            .header
            .ok_or_else(|| ReceiptError::persistence("no header staged"))?;

        if self.items.len() != header.item_count as usize {
            return Err(ReceiptError::persistence(format!(
                "expected {} items, {} staged",
                header.item_count,
                self.items.len()
            )));
        }

        self.items.sort_by_key(|(position, _)| *position);
        if let Some((expected, (found, _))) = self
            .items
            .iter()
            .enumerate()
            .find(|(expected, (position, _))| *expected as u32 != *position)
        {
            return Err(ReceiptError::persistence(format!(
                "item positions are not contiguous: expected {}, found {}",
                expected, found
            )));
        }

        Ok((header, self.items.into_iter().map(|(_, item)| item).collect()))
    }
}
