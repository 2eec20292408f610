use crate::ids::AccountNumber;
use crate::models::{Account, AccountChanges, NewAccount};
use crate::LedgerResult;
use crate::Money;

use std::fmt;

use chrono::Utc;

use thiserror::Error;

/// The two operations that move money in or out of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOperation {
    Deposit,
    Withdrawal,
}

impl fmt::Display for BalanceOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
        };
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    NotFound(AccountNumber),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid {0} amount")]
    InvalidAmount(BalanceOperation),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("Account already exists: {0}")]
    AlreadyExists(AccountNumber),
}

/// In-memory authority over all accounts, kept in insertion order
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }

    pub fn get_account(&self, account_number: &AccountNumber) -> LedgerResult<Account> {
        let index = self.position(account_number)?;

        Ok(self.accounts[index].clone())
    }

    pub fn contains(&self, account_number: &AccountNumber) -> bool {
        self.position(account_number).is_ok()
    }

    /// Validates the input and appends a new account stamped with the current time.
    ///
    /// Every field is required, strings must be non-blank, the opening balance must not be
    /// negative and the account number must not already be taken.
    pub fn create_account(&mut self, input: NewAccount) -> LedgerResult<Account> {
        let account_number = input
            .account_number
            .filter(|number| !number.is_empty())
            .ok_or_else(|| missing_field("accountNumber"))?;
        let name = non_blank(input.name).ok_or_else(|| missing_field("name"))?;
        let balance = input.balance.ok_or_else(|| missing_field("balance"))?;
        let currency = non_blank(input.currency).ok_or_else(|| missing_field("currency"))?;

        if balance.is_negative() {
            Err(LedgerError::InvalidInput(format!(
                "opening balance cannot be negative: {balance}"
            )))?
        }

        if self.contains(&account_number) {
            Err(LedgerError::AlreadyExists(account_number.clone()))?
        }

        let account = Account {
            account_number,
            name,
            balance,
            currency,
            created_at: Utc::now(),
        };

        log::debug!("Appending account to ledger: {account:?}");
        self.accounts.push(account.clone());

        Ok(account)
    }

    /// Applies only the supplied fields. Blank strings count as not supplied.
    pub fn update_account(
        &mut self,
        account_number: &AccountNumber,
        changes: AccountChanges,
    ) -> LedgerResult<Account> {
        let account = self.find_mut(account_number)?;

        if let Some(balance) = changes.balance {
            if balance.is_negative() {
                Err(LedgerError::InvalidInput(format!(
                    "balance cannot be negative: {balance}"
                )))?
            }
        }

        if let Some(name) = non_blank(changes.name) {
            account.name = name;
        }

        if let Some(balance) = changes.balance {
            account.balance = balance;
        }

        if let Some(currency) = non_blank(changes.currency) {
            account.currency = currency;
        }

        log::debug!("Updated account: {account:?}");

        Ok(account.clone())
    }

    pub fn delete_account(&mut self, account_number: &AccountNumber) -> LedgerResult {
        let index = self.position(account_number)?;

        let account = self.accounts.remove(index);
        log::debug!("Removed account: {account:?}");

        Ok(())
    }

    pub fn deposit(
        &mut self,
        account_number: &AccountNumber,
        amount: Option<Money>,
    ) -> LedgerResult<Account> {
        let account = self.find_mut(account_number)?;
        let amount = positive_amount(amount, BalanceOperation::Deposit)?;

        account.balance = account.balance.checked_add(&amount).map_err(|e| {
            log::warn!("{e}");
            LedgerError::InvalidAmount(BalanceOperation::Deposit)
        })?;

        Ok(account.clone())
    }

    pub fn withdraw(
        &mut self,
        account_number: &AccountNumber,
        amount: Option<Money>,
    ) -> LedgerResult<Account> {
        let account = self.find_mut(account_number)?;
        let amount = positive_amount(amount, BalanceOperation::Withdrawal)?;

        if account.balance < amount {
            Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: account.balance,
            })?
        }

        account.balance = account
            .balance
            .checked_sub(&amount)
            .map_err(|_| LedgerError::InvalidAmount(BalanceOperation::Withdrawal))?;

        Ok(account.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn position(&self, account_number: &AccountNumber) -> LedgerResult<usize> {
        self.accounts
            .iter()
            .position(|account| account.account_number == *account_number)
            .ok_or_else(|| LedgerError::NotFound(account_number.clone()))
    }

    fn find_mut(&mut self, account_number: &AccountNumber) -> LedgerResult<&mut Account> {
        let index = self.position(account_number)?;

        Ok(&mut self.accounts[index])
    }
}

fn missing_field(field: &str) -> LedgerError {
    LedgerError::InvalidInput(format!("missing required field: {field}"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn positive_amount(amount: Option<Money>, operation: BalanceOperation) -> LedgerResult<Money> {
    match amount {
        Some(amount) if amount.is_positive() => Ok(amount),
        _ => Err(LedgerError::InvalidAmount(operation)),
    }
}
