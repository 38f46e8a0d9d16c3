//! Utility functions for hex formatting and address handling.

pub mod builders;
pub mod conversion;
pub mod formatting;

pub use builders::{LogBuilder, TransactionReceiptBuilder};
pub use conversion::parse_address;
pub use formatting::{with_0x_prefix, without_0x_prefix};
