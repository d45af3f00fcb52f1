//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState, endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Cross-origin requests are permitted from any origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .route(endpoints::HEALTH, get(health_check))
        .layer(cors)
        .with_state(state)
}

/// Report that the server is up.
async fn health_check() -> StatusCode {
    StatusCode::OK
}
