use crate::domain::ports::{ReceiptStore, ReceiptTransaction, ReceiptTransactionBox, StagedReceipt};
use crate::domain::receipt::{Item, Receipt, ReceiptHeader, ReceiptId};
use crate::error::{ReceiptError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing receipt headers.
pub const CF_RECEIPTS: &str = "receipts";
/// Column Family for storing receipt items.
pub const CF_ITEMS: &str = "items";

/// A persistent store implementation using RocksDB.
///
/// Receipt headers and items live in separate Column Families. Items are keyed
/// by the receipt id followed by the big-endian item position, so the items of
/// one receipt are stored contiguously and in order.
///
/// A commit writes the header and every item in a single `WriteBatch`, which
/// RocksDB applies atomically. Commits are serialised so the collision check and
/// the write cannot interleave with another commit.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    commit_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("receipts" and "items") exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_receipts = ColumnFamilyDescriptor::new(CF_RECEIPTS, Options::default());
        let cf_items = ColumnFamilyDescriptor::new(CF_ITEMS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_receipts, cf_items])?;

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            ReceiptError::persistence(format!("{} column family not found", name))
        })
    }

    fn contains(&self, id: ReceiptId) -> Result<bool> {
        let receipts = self.cf(CF_RECEIPTS)?;
        // Just check if the key exists without retrieving the value
        let result = self.db.get_pinned_cf(receipts, id.as_bytes())?;
        Ok(result.is_some())
    }
}

fn item_key(id: ReceiptId, position: u32) -> [u8; 20] {
    let mut key = [0u8; 20];
    key[..16].copy_from_slice(id.as_bytes());
    key[16..].copy_from_slice(&position.to_be_bytes());
    key
}

#[async_trait]
impl ReceiptStore for RocksDBStore {
    async fn begin(&self, id: ReceiptId) -> Result<ReceiptTransactionBox> {
        Ok(Box::new(RocksDBTransaction {
            store: self.clone(),
            staged: StagedReceipt::new(id),
        }))
    }

    async fn get(&self, id: ReceiptId) -> Result<Option<Receipt>> {
        let receipts = self.cf(CF_RECEIPTS)?;
        let items_cf = self.cf(CF_ITEMS)?;

        let Some(bytes) = self.db.get_cf(receipts, id.as_bytes())? else {
            return Ok(None);
        };
        let header: ReceiptHeader = serde_json::from_slice(&bytes)?;

        let mut items = Vec::with_capacity(header.item_count as usize);
        for position in 0..header.item_count {
            let bytes = self
                .db
                .get_cf(items_cf, item_key(id, position))?
                .ok_or_else(|| {
                    ReceiptError::persistence(format!(
                        "receipt {} is missing item {}",
                        id, position
                    ))
                })?;
            items.push(serde_json::from_slice::<Item>(&bytes)?);
        }

        Ok(Some(Receipt::from_parts(header, items)))
    }

    async fn exists(&self, id: ReceiptId) -> Result<bool> {
        self.contains(id)
    }
}

struct RocksDBTransaction {
    store: RocksDBStore,
    staged: StagedReceipt,
}

#[async_trait]
impl ReceiptTransaction for RocksDBTransaction {
    fn put_header(&mut self, header: ReceiptHeader) -> Result<()> {
        self.staged.put_header(header)
    }

    fn put_item(&mut self, position: u32, item: Item) -> Result<()> {
        self.staged.put_item(position, item)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let RocksDBTransaction { store, staged } = *self;
        let id = staged.id();
        let (header, items) = staged.finish()?;

        let _guard = store.commit_lock.lock().await;
        if store.contains(id)? {
            return Err(ReceiptError::persistence(format!(
                "identifier collision on {}",
                id
            )));
        }

        let receipts = store.cf(CF_RECEIPTS)?;
        let items_cf = store.cf(CF_ITEMS)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(receipts, id.as_bytes(), serde_json::to_vec(&header)?);
        for (position, item) in items.iter().enumerate() {
            batch.put_cf(
                items_cf,
                item_key(id, position as u32),
                serde_json::to_vec(item)?,
            );
        }
        store.db.write(batch)?;

        Ok(())
    }
}
