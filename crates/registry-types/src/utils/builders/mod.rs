//! Builder utilities for creating receipts and logs, mostly in tests.

pub mod log;
pub mod transaction_receipt;

pub use log::LogBuilder;
pub use transaction_receipt::TransactionReceiptBuilder;
