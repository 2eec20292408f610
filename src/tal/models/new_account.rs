use crate::ids::AccountNumber;
use crate::Money;

use serde::Deserialize;

/// Creation input. Every field is optional here so a missing one can be rejected by the ledger.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub account_number: Option<AccountNumber>,
    pub name: Option<String>,
    pub balance: Option<Money>,
    pub currency: Option<String>,
}

impl NewAccount {
    pub fn new(
        account_number: impl Into<AccountNumber>,
        name: impl Into<String>,
        balance: Money,
        currency: impl Into<String>,
    ) -> Self {
        return Self {
            account_number: Some(account_number.into()),
            name: Some(name.into()),
            balance: Some(balance),
            currency: Some(currency.into()),
        };
    }
}
