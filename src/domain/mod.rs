//! Domain model: receipts, money, the points rules and the storage ports.

pub mod money;
pub mod points;
pub mod ports;
pub mod receipt;
