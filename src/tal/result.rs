use crate::ledger::LedgerError;

/// Convenience type to make error mapping cleaner
pub type Result<T = ()> = anyhow::Result<T>;

/// Typed result of a ledger operation, so callers can tell failures apart
pub type LedgerResult<T = ()> = std::result::Result<T, LedgerError>;
