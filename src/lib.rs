//! Receipt ingestion and loyalty points scoring.
//!
//! - [`domain`] - receipts, money, the points rules and the storage ports
//! - [`application`] - `ReceiptService`, the entry point for callers
//! - [`infrastructure`] - in-memory and RocksDB stores
//! - [`interfaces`] - JSON decoding of receipts and encoding of responses

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
