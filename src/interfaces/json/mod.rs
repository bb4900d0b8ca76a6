pub mod receipt_reader;
pub mod response;
