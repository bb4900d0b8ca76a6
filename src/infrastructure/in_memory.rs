use crate::domain::ports::{ReceiptStore, ReceiptTransaction, ReceiptTransactionBox, StagedReceipt};
use crate::domain::receipt::{Item, Receipt, ReceiptHeader, ReceiptId};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

type ReceiptMap = Arc<RwLock<HashMap<ReceiptId, Receipt>>>;

/// A thread-safe in-memory store for receipts.
///
/// Uses `Arc<RwLock<HashMap<ReceiptId, Receipt>>>` to allow shared concurrent access.
/// A committed receipt is inserted as one complete value under the write lock,
/// so readers see either the whole receipt or nothing. Contents are lost on drop.
#[derive(Default, Clone)]
pub struct InMemoryReceiptStore {
    receipts: ReceiptMap,
}

impl InMemoryReceiptStore {
    /// Creates a new, empty in-memory receipt store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.receipts.read().await.is_empty()
    }
}

#[async_trait]
impl ReceiptStore for InMemoryReceiptStore {
    async fn begin(&self, id: ReceiptId) -> Result<ReceiptTransactionBox> {
        Ok(Box::new(InMemoryTransaction {
            receipts: Arc::clone(&self.receipts),
            staged: StagedReceipt::new(id),
        }))
    }

    async fn get(&self, id: ReceiptId) -> Result<Option<Receipt>> {
        let receipts = self.receipts.read().await;
        Ok(receipts.get(&id).cloned())
    }

    async fn exists(&self, id: ReceiptId) -> Result<bool> {
        let receipts = self.receipts.read().await;
        Ok(receipts.contains_key(&id))
    }
}

struct InMemoryTransaction {
    receipts: ReceiptMap,
    staged: StagedReceipt,
}

#[async_trait]
impl ReceiptTransaction for InMemoryTransaction {
    fn put_header(&mut self, header: ReceiptHeader) -> Result<()> {
        self.staged.put_header(header)
    }

    fn put_item(&mut self, position: u32, item: Item) -> Result<()> {
        self.staged.put_item(position, item)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction { receipts, staged } = *self;
        let id = staged.id();
        let (header, items) = staged.finish()?;
        let receipt = Receipt::from_parts(header, items);

        let mut receipts = receipts.write().await;
        match receipts.entry(id) {
            Entry::Occupied(_) => Err(ReceiptError::persistence(format!(
                "identifier collision on {}",
                id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(receipt);
                Ok(())
            }
        }
    }
}
