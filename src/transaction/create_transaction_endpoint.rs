//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionBuilder, TransactionKind, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw, unvalidated request body for creating a transaction.
///
/// Every field is optional at this boundary so that a missing field can be
/// reported as a validation error rather than rejected by the JSON layer.
/// `amount` is kept as a raw JSON value because clients may send it as
/// either a number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct TransactionPayload {
    /// Text detailing the transaction.
    #[serde(default)]
    pub text: Option<String>,
    /// The value of the transaction in dollars, as a number or numeric string.
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
    /// Either "credit" or "debit".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl TransactionPayload {
    /// Validate the payload and convert it into a [TransactionBuilder].
    ///
    /// Checks run in a fixed order: missing fields first, then the
    /// transaction type, then the amount.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MissingTransactionFields] if any field is absent or null,
    /// - or [Error::InvalidTransactionKind] if `type` is not credit/debit,
    /// - or [Error::InvalidAmount] if `amount` cannot be parsed as a number.
    fn validate(self) -> Result<TransactionBuilder, Error> {
        let (Some(text), Some(amount), Some(kind)) = (self.text, self.amount, self.kind) else {
            return Err(Error::MissingTransactionFields);
        };

        let kind: TransactionKind = kind.parse()?;
        let amount = parse_amount(&amount)?;

        Ok(Transaction::build(&text, amount, kind))
    }
}

/// Parse an amount sent as either a JSON number or a numeric string.
fn parse_amount(value: &serde_json::Value) -> Result<f64, Error> {
    match value {
        serde_json::Value::Number(number) => number.as_f64().ok_or(Error::InvalidAmount),
        serde_json::Value::String(text) => text.trim().parse().map_err(|_| Error::InvalidAmount),
        _ => Err(Error::InvalidAmount),
    }
}

/// A route handler for creating a new transaction, responds with the
/// persisted transaction and status 201 on success.
///
/// The transaction's date is set to the current UTC time.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let builder = payload.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = create_transaction(builder, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        endpoints,
        transaction::{Transaction, TransactionKind, get_transactions, test_utils::new_test_server},
    };

    #[tokio::test]
    async fn create_returns_persisted_transaction() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": 4.5, "type": "debit"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let transaction = response.json::<Transaction>();
        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.text, "Coffee");
        assert_eq!(transaction.amount, 4.5);
        assert_eq!(transaction.kind, TransactionKind::Debit);
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let (server, _) = new_test_server();

        let first = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Salary", "amount": 1500, "type": "credit"}))
            .await
            .json::<Transaction>();
        let second = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": 4.5, "type": "debit"}))
            .await
            .json::<Transaction>();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn create_accepts_numeric_string_amount() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": "4.5", "type": "debit"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Transaction>().amount, 4.5);
    }

    #[tokio::test]
    async fn create_fails_on_missing_field() {
        let (server, state) = new_test_server();

        for body in [
            json!({"amount": 4.5, "type": "debit"}),
            json!({"text": "Coffee", "type": "debit"}),
            json!({"text": "Coffee", "amount": 4.5}),
            json!({"text": null, "amount": 4.5, "type": "debit"}),
            json!({}),
        ] {
            let response = server.post(endpoints::TRANSACTIONS_API).json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let error = response.json::<serde_json::Value>();
            assert_eq!(
                error["error"], "Missing required fields (text, amount, type)",
                "unexpected error for body {body}"
            );
        }

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transactions(&connection).unwrap(),
            vec![],
            "want no rows created by invalid requests"
        );
    }

    #[tokio::test]
    async fn create_fails_on_invalid_kind() {
        let (server, state) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": 4.5, "type": "gift"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<serde_json::Value>();
        assert_eq!(error["error"], "Type must be credit or debit");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transactions(&connection).unwrap(), vec![]);
    }

    #[tokio::test]
    async fn create_fails_on_unparseable_amount() {
        let (server, state) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": "abc", "type": "debit"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<serde_json::Value>();
        assert_eq!(error["error"], "Amount must be a number");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transactions(&connection).unwrap(), vec![]);
    }

    #[tokio::test]
    async fn missing_field_reported_before_invalid_kind() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"amount": "abc", "type": "gift"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<serde_json::Value>();
        assert_eq!(error["error"], "Missing required fields (text, amount, type)");
    }

    #[tokio::test]
    async fn invalid_kind_reported_before_invalid_amount() {
        let (server, _) = new_test_server();

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .json(&json!({"text": "Coffee", "amount": "abc", "type": "gift"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<serde_json::Value>();
        assert_eq!(error["error"], "Type must be credit or debit");
    }
}
