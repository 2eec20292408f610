use super::{ApiError, AppState};

use crate::ids::AccountNumber;
use crate::models::{Account, AccountChanges, NewAccount};
use crate::{LedgerError, Money};

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use serde::Deserialize;
use serde_json::{json, Value};

/// Body of a deposit or withdrawal request
#[derive(Deserialize, Debug, Default)]
pub struct AmountRequest {
    pub amount: Option<Money>,
}

pub async fn list_accounts(State(state): State<Arc<AppState>>) -> Json<Vec<Account>> {
    let ledger = state.ledger.read().await;

    Json(ledger.list_accounts())
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
) -> Result<Json<Account>, ApiError> {
    let account_number = AccountNumber::from(account_number);
    let ledger = state.ledger.read().await;

    let account = ledger.get_account(&account_number)?;

    Ok(Json(account))
}

pub async fn create_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let Json(input) =
        payload.map_err(|rejection| LedgerError::InvalidInput(rejection.body_text()))?;

    log::debug!("Creating account from input: {input:?}");
    let account = state.ledger.write().await.create_account(input)?;

    log::info!("Created account {}", account.account_number);

    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update_account(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
    body: Bytes,
) -> Result<Json<Account>, ApiError> {
    let account_number = AccountNumber::from(account_number);
    let mut ledger = state.ledger.write().await;

    let changes = match read_changes(&body) {
        Ok(changes) => changes,
        Err(err) => {
            // an unknown account wins over an unreadable body
            ledger.get_account(&account_number)?;
            Err(err)?
        }
    };

    log::debug!("Updating account {account_number} with: {changes:?}");
    let account = ledger.update_account(&account_number, changes)?;

    Ok(Json(account))
}

pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let account_number = AccountNumber::from(account_number);

    state.ledger.write().await.delete_account(&account_number)?;

    log::info!("Deleted account {account_number}");

    Ok(Json(json!({ "message": "Account deleted" })))
}

pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let account_number = AccountNumber::from(account_number);
    let amount = requested_amount(payload);

    log::debug!("Depositing {amount:?} into account {account_number}");
    let account = state
        .ledger
        .write()
        .await
        .deposit(&account_number, amount)?;

    Ok(Json(account))
}

pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(account_number): Path<String>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<Account>, ApiError> {
    let account_number = AccountNumber::from(account_number);
    let amount = requested_amount(payload);

    log::debug!("Withdrawing {amount:?} from account {account_number}");
    let account = state
        .ledger
        .write()
        .await
        .withdraw(&account_number, amount)?;

    Ok(Json(account))
}

/// An empty body changes nothing; the content type is not checked
fn read_changes(body: &[u8]) -> Result<AccountChanges, LedgerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AccountChanges::default());
    }

    serde_json::from_slice(body).map_err(|err| LedgerError::InvalidInput(err.to_string()))
}

/// An unreadable body is treated as a missing amount, which the ledger rejects
fn requested_amount(payload: Result<Json<AmountRequest>, JsonRejection>) -> Option<Money> {
    match payload {
        Ok(Json(request)) => request.amount,
        Err(rejection) => {
            log::debug!("Ignoring unreadable amount body: {}", rejection.body_text());
            None
        }
    }
}
