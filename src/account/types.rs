//! Account and transaction record definitions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::auth;
use crate::config::OverdraftPolicy;
use crate::error::TellerError;

/// Account identifier - human-readable name
pub type AccountId = String;

/// Main account structure
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
    // Identity
    pub name: AccountId,

    // Authentication
    pub password_hash: String, // SHA-256 hex digest, never plaintext

    // State
    pub balance: Decimal,
    pub last_logon_ms: u64,
    pub history: Vec<Transaction>,
}

/// Balance-affecting operation kinds
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// One history entry. Immutable once appended, never reordered or pruned.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transaction {
    pub timestamp_ms: u64,
    pub kind: TransactionKind,
    /// Magnitude of the operation, non-negative as stored.
    pub amount: Decimal,
    pub accepted: bool,
    /// Balance after the operation; unchanged balance for a rejected entry.
    pub balance_after: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    /// Render one human-readable history line.
    pub fn describe(&self) -> String {
        let outcome = if self.accepted {
            format!("balance {}", self.balance_after)
        } else {
            format!(
                "rejected: {}",
                self.note.as_deref().unwrap_or("rejected")
            )
        };
        format!(
            "{} {} {} {}",
            format_timestamp_ms(self.timestamp_ms),
            self.kind.verb(),
            self.amount,
            outcome
        )
    }
}

impl Account {
    /// Create a fresh account: zero balance, empty history, password digested.
    pub fn new(name: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            password_hash: auth::digest(password),
            balance: Decimal::ZERO,
            last_logon_ms: current_timestamp_ms(),
            history: Vec::new(),
        }
    }

    /// Add to the balance and record the transaction.
    ///
    /// A negative amount is rejected without touching balance or history.
    pub fn deposit(&mut self, amount: Decimal) -> Result<String, TellerError> {
        if amount < Decimal::ZERO {
            return Err(TellerError::InvalidAmount(amount));
        }

        self.balance += amount;
        self.history.push(Transaction {
            timestamp_ms: current_timestamp_ms(),
            kind: TransactionKind::Deposit,
            amount,
            accepted: true,
            balance_after: self.balance,
            note: None,
        });

        Ok(format!("deposited {}, balance {}", amount, self.balance))
    }

    /// Subtract from the balance and record the transaction.
    ///
    /// A negative amount is rejected without touching balance or history.
    /// Under `OverdraftPolicy::Deny` a withdrawal exceeding the balance is
    /// rejected and a rejected entry is appended; under `AllowNegative` the
    /// balance may go below zero.
    pub fn withdraw(
        &mut self,
        amount: Decimal,
        policy: OverdraftPolicy,
    ) -> Result<String, TellerError> {
        if amount < Decimal::ZERO {
            return Err(TellerError::InvalidAmount(amount));
        }

        if policy == OverdraftPolicy::Deny && amount > self.balance {
            self.history.push(Transaction {
                timestamp_ms: current_timestamp_ms(),
                kind: TransactionKind::Withdrawal,
                amount,
                accepted: false,
                balance_after: self.balance,
                note: Some("insufficient funds".to_string()),
            });
            return Err(TellerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.history.push(Transaction {
            timestamp_ms: current_timestamp_ms(),
            kind: TransactionKind::Withdrawal,
            amount,
            accepted: true,
            balance_after: self.balance,
            note: None,
        });

        Ok(format!("withdrew {}, balance {}", amount, self.balance))
    }

    /// Check a password attempt against the stored digest.
    pub fn check_password(&self, password: &str) -> bool {
        auth::verify(password, &self.password_hash)
    }

    /// Stamp a successful log-on, returning the previous log-on time.
    pub fn touch_logon(&mut self) -> u64 {
        let previous = self.last_logon_ms;
        self.last_logon_ms = current_timestamp_ms();
        previous
    }

    /// Human-readable history, one line per entry in insertion order.
    pub fn history_lines(&self) -> Vec<String> {
        self.history.iter().map(Transaction::describe).collect()
    }
}

pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as u64
}

pub(crate) fn format_timestamp_ms(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("@{}ms", ms))
}
