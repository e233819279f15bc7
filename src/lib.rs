pub mod account;
pub mod config;
pub mod error;

pub use account::{Account, AccountStore, Transaction, TransactionKind};
pub use config::{OverdraftPolicy, TellerConfig};
pub use error::TellerError;
