//! HTTP adapter over the ledger.
//!
//! Translates requests into `Ledger` calls and ledger results into JSON responses. The ledger is
//! shared behind one `RwLock`, so mutations are serialized while reads may run together.

mod error;
mod handlers;
mod logging;

pub use error::ApiError;
pub use handlers::AmountRequest;

use crate::Ledger;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use tokio::sync::RwLock;

/// State shared across handlers
#[derive(Debug, Default)]
pub struct AppState {
    pub ledger: RwLock<Ledger>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        return Self {
            ledger: RwLock::new(ledger),
        };
    }
}

/// Builds the router serving the account routes under `/api`, with request logging
pub fn build_router(state: Arc<AppState>) -> Router {
    let accounts = Router::new()
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/accounts/:account_number",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route("/accounts/:account_number/deposit", post(handlers::deposit))
        .route("/accounts/:account_number/withdraw", post(handlers::withdraw));

    return Router::new()
        .nest("/api", accounts)
        .layer(logging::request_log())
        .with_state(state);
}
