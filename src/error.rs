use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TellerError {
    #[error("account '{0}' already exists")]
    AccountExists(String),
    #[error("user not recognized: {0}")]
    UnknownUser(String),
    #[error("invalid password")]
    InvalidPassword,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("nothing to save")]
    NothingToSave,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("snapshot error: {0}")]
    Snapshot(String),
}
