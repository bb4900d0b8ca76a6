//! Application layer orchestrating the store and the points rules.
//!
//! This module defines the `ReceiptService`, which callers use to ingest
//! receipts and look up their points. The storage backend is injected, so the
//! same service runs against the in-memory or the RocksDB store.

pub mod service;
