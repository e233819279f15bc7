//! Account System Module
//!
//! This module implements the single-session ledger model with:
//! - Human-readable account names
//! - Password-digest authentication
//! - Deposit/withdraw against a running balance with append-only history
//! - Whole-collection snapshot persistence

pub mod auth;
pub mod persist;
pub mod store;
pub mod types;

pub use store::AccountStore;
pub use types::{Account, AccountId, Transaction, TransactionKind};
