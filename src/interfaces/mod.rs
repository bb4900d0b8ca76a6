//! Wire-format adapters used by callers of the core.

pub mod json;
