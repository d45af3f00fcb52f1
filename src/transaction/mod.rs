//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and deleting transactions
//! - Route handlers for the transaction JSON API

mod core;
mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod list_transactions_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionId, TransactionKind, create_transaction_table,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use list_transactions_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
pub(crate) use core::{create_transaction, get_transactions};
