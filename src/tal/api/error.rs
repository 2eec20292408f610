//! Maps ledger failures onto HTTP responses

use crate::{BalanceOperation, LedgerError};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use serde_json::json;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ApiError {
    /// Status code and client-facing message for this error
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        let ApiError::Ledger(e) = self;

        return match e {
            LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "Account not found"),
            LedgerError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
            LedgerError::InvalidAmount(BalanceOperation::Deposit) => {
                (StatusCode::BAD_REQUEST, "Invalid deposit amount")
            }
            LedgerError::InvalidAmount(BalanceOperation::Withdrawal) => {
                (StatusCode::BAD_REQUEST, "Invalid withdrawal amount")
            }
            LedgerError::InsufficientFunds { .. } => {
                (StatusCode::BAD_REQUEST, "Insufficient funds")
            }
            LedgerError::AlreadyExists(_) => (StatusCode::CONFLICT, "Account already exists"),
        };
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        log::warn!("Request rejected with {status}: {self}");

        (status, Json(json!({ "error": message }))).into_response()
    }
}
