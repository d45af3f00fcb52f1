//! Defines the core data model and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for mapping to database IDs.
pub type TransactionId = i64;

/// Whether a transaction added money to the account or took money out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money was earned or received.
    Credit,
    /// Money was spent.
    Debit,
}

impl TransactionKind {
    /// The lowercase string used for this kind on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(Error::InvalidTransactionKind),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// A single financial record, i.e. an event where money was either spent or
/// earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub text: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the transaction was a credit or a debit.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// When the transaction was recorded, in UTC.
    #[serde(with = "time::serde::iso8601")]
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(text: &str, amount: f64, kind: TransactionKind) -> TransactionBuilder {
        TransactionBuilder {
            text: text.to_owned(),
            amount,
            kind,
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The ID is assigned by the database on insert. If no date is set, the
/// insert uses the current UTC time.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction.
    pub text: String,
    /// The monetary amount of the transaction.
    pub amount: f64,
    /// Whether the transaction was a credit or a debit.
    pub kind: TransactionKind,
    /// When the transaction was recorded.
    ///
    /// `None` means the insert will use the current UTC time. Setting an
    /// explicit date is mainly useful for tests that need fixed timestamps.
    pub date: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set an explicit date for the transaction instead of the current UTC
    /// time.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// If the builder has no date, the current UTC time is used.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = builder.date.unwrap_or_else(OffsetDateTime::now_utc);

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (text, amount, kind, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, text, amount, kind, date",
        )?
        .query_row(
            (builder.text, builder.amount, builder.kind, date),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve all transactions from the database, most recent first.
///
/// Ties in `date` are broken by `id` so the newest-inserted transaction
/// sorts first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, text, amount, kind, date FROM \"transaction\"
             ORDER BY date DESC, id DESC",
        )?
        .query_map((), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// The number of rows changed by a statement.
pub type RowsAffected = usize;

/// Delete the transaction with `id` from the database.
///
/// Returns the number of rows deleted: 0 means no transaction with that ID
/// exists.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                amount REAL NOT NULL,
                kind TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1. AUTOINCREMENT also guarantees that IDs
    // of deleted transactions are never reused.
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let text = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let date = row.get(4)?;

    Ok(Transaction {
        id,
        text,
        amount,
        kind,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================
