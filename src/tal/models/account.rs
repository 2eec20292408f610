use crate::ids::AccountNumber;
use crate::Money;

use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

/// A ledger account. Instances handed out by the `Ledger` are copies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: AccountNumber,
    pub name: String,
    pub balance: Money,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}
