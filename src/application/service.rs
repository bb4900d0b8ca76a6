use crate::domain::points::{Points, PointsBreakdown, compute_points, explain_points};
use crate::domain::ports::ReceiptStoreBox;
use crate::domain::receipt::{Receipt, ReceiptDraft, ReceiptId};
use crate::error::{ReceiptError, Result};
use std::future::Future;
use std::time::Duration;

/// Default upper bound for a single store round-trip.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Store calls that take longer than this fail with `PersistenceFailed`.
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// The entry point callers use to ingest receipts and look up their points.
///
/// `ReceiptService` owns the injected storage backend, assigns identifiers on
/// creation and scores receipts on lookup. The points rules themselves live in
/// [`crate::domain::points`] and never touch the store.
pub struct ReceiptService {
    store: ReceiptStoreBox,
    config: ServiceConfig,
}

impl ReceiptService {
    /// Creates a new `ReceiptService` with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `store` - The backend that persists receipts.
    pub fn new(store: ReceiptStoreBox) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: ReceiptStoreBox, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    /// Validates and stores a receipt, returning its new identifier.
    ///
    /// The receipt and all of its items are committed together; on any failure
    /// nothing is stored.
    pub async fn create_receipt(&self, draft: ReceiptDraft) -> Result<ReceiptId> {
        if let Err(e) = draft.validate() {
            tracing::warn!(error = %e, "Rejected receipt");
            return Err(e);
        }

        let id = ReceiptId::generate();
        let items = draft.items.len();
        let receipt = draft.into_receipt(id);

        match self.bounded(self.store.insert(&receipt)).await {
            Ok(()) => {
                tracing::info!(receipt_id = %id, items, "Stored receipt");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(receipt_id = %id, error = %e, "Failed to store receipt");
                Err(e)
            }
        }
    }

    /// Returns the stored receipt, items in their original order.
    pub async fn get_receipt(&self, id: ReceiptId) -> Result<Receipt> {
        self.bounded(self.store.get(id))
            .await?
            .ok_or_else(|| ReceiptError::NotFound(id.to_string()))
    }

    /// Looks up a receipt and computes its points.
    pub async fn get_points(&self, id: ReceiptId) -> Result<Points> {
        let receipt = self.get_receipt(id).await?;
        compute_points(&receipt)
    }

    /// Like [`ReceiptService::get_points`], with the contribution of every rule.
    pub async fn explain_points(&self, id: ReceiptId) -> Result<PointsBreakdown> {
        let receipt = self.get_receipt(id).await?;
        explain_points(&receipt)
    }

    /// Stores a receipt and scores it in one call.
    pub async fn score_receipt(&self, draft: ReceiptDraft) -> Result<(ReceiptId, Points)> {
        let id = self.create_receipt(draft).await?;
        let points = self.get_points(id).await?;
        Ok((id, points))
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.config.store_timeout, fut)
            .await
            .map_err(|_| {
                ReceiptError::persistence(format!(
                    "store did not respond within {:?}",
                    self.config.store_timeout
                ))
            })?
    }
}
