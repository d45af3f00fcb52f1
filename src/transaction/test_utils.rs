//! Helpers for testing the transaction endpoints against a real router.

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, build_router};

/// Create a test server over the full router, backed by an in-memory
/// database.
///
/// Returns the app state as well so tests can seed or inspect the database
/// directly.
pub fn new_test_server() -> (TestServer, AppState) {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let state = AppState::new(connection).expect("Could not initialize database.");

    let server = TestServer::new(build_router(state.clone()));

    (server, state)
}
