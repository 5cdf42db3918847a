//! Data model for the pocket-money ledger.

mod amount;
mod transaction;

pub use amount::{Amount, AmountError};
pub use transaction::{normalize_child, LedgerColumn, Transaction, TIMESTAMP_FORMAT};
