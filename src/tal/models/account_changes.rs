use crate::Money;

use serde::Deserialize;

/// Partial update of an account. `None` leaves the field as it is.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub balance: Option<Money>,
    pub currency: Option<String>,
}

impl AccountChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn balance(mut self, balance: Money) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}
