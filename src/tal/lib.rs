pub mod api;
pub mod ids;
pub mod ledger;
pub mod models;
mod money;
mod result;

pub use ledger::{BalanceOperation, Ledger, LedgerError};
pub use money::{Money, MoneyError};
pub use result::{LedgerResult, Result};
