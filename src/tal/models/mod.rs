mod account;
mod account_changes;
mod new_account;

pub use account::Account;
pub use account_changes::AccountChanges;
pub use new_account::NewAccount;
