//! Account storage and session management

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::persist;
use super::types::{format_timestamp_ms, Account, AccountId};
use crate::config::{OverdraftPolicy, TellerConfig};
use crate::error::TellerError;

/// Owns the full account collection plus the single active session.
///
/// The session is a key into `accounts`, never a process-wide global; its
/// lifetime is the store's. One logical actor at a time: an embedding host
/// must serialize access itself.
pub struct AccountStore {
    accounts: HashMap<AccountId, Account>,
    session: Option<AccountId>,
    overdraft: OverdraftPolicy,
}

impl AccountStore {
    /// Create a new empty store with the given withdrawal policy.
    pub fn new(overdraft: OverdraftPolicy) -> Self {
        Self {
            accounts: HashMap::new(),
            session: None,
            overdraft,
        }
    }

    pub fn from_config(config: &TellerConfig) -> Self {
        Self::new(config.overdraft)
    }

    /// Create an account and log its creator on.
    ///
    /// Fails if the name is already taken (exact match); the existing
    /// account is untouched.
    pub fn create_account(&mut self, name: &str, password: &str) -> Result<String, TellerError> {
        if self.accounts.contains_key(name) {
            return Err(TellerError::AccountExists(name.to_string()));
        }

        self.accounts.insert(name.to_string(), Account::new(name, password));
        self.session = Some(name.to_string());
        info!("Account created: {}", name);

        Ok(format!("account '{}' created and logged on", name))
    }

    /// Authenticate and open a session. The success message carries the
    /// previous log-on time, captured before the stamp is updated.
    pub fn log_on(&mut self, name: &str, password: &str) -> Result<String, TellerError> {
        let account = self
            .accounts
            .get_mut(name)
            .ok_or_else(|| TellerError::UnknownUser(name.to_string()))?;

        if !account.check_password(password) {
            warn!("Log-on rejected for {}: invalid password", name);
            return Err(TellerError::InvalidPassword);
        }

        let previous = account.touch_logon();
        self.session = Some(name.to_string());
        info!("Logged on: {}", name);

        Ok(format!(
            "welcome {}, last log-on {}",
            name,
            format_timestamp_ms(previous)
        ))
    }

    /// Clear the session. No-op when already logged out; accounts are kept.
    pub fn log_out(&mut self) {
        if let Some(name) = self.session.take() {
            info!("Logged out: {}", name);
        }
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<String, TellerError> {
        self.session_account_mut()?.deposit(amount)
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<String, TellerError> {
        let policy = self.overdraft;
        self.session_account_mut()?.withdraw(amount, policy)
    }

    pub fn is_logged_on(&self) -> bool {
        self.session.is_some()
    }

    /// Name of the session account, empty when logged out.
    pub fn current_user(&self) -> &str {
        self.session.as_deref().unwrap_or("")
    }

    /// Balance of the session account, zero when logged out.
    pub fn current_balance(&self) -> Decimal {
        self.session_account()
            .map(|a| a.balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// History of the session account, empty when logged out.
    pub fn current_history(&self) -> Vec<String> {
        self.session_account()
            .map(Account::history_lines)
            .unwrap_or_default()
    }

    /// Names of all stored accounts, sorted.
    pub fn account_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accounts.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Write the full collection to `path`, overwriting it. In-memory state
    /// is unchanged whether this succeeds or fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<String, TellerError> {
        let path = path.as_ref();
        if self.accounts.is_empty() {
            return Err(TellerError::NothingToSave);
        }

        persist::write_snapshot(path, &self.accounts)?;
        info!("Saved {} account(s) to {}", self.accounts.len(), path.display());

        Ok(format!(
            "saved {} account(s) to {}",
            self.accounts.len(),
            path.display()
        ))
    }

    /// Replace the collection with the snapshot at `path` and clear the
    /// session. On any failure the store is left exactly as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<String, TellerError> {
        let path = path.as_ref();
        let accounts = persist::read_snapshot(path)?;
        let count = accounts.len();

        self.accounts = accounts;
        self.session = None;
        info!("Loaded {} account(s) from {}", count, path.display());

        Ok(format!("loaded {} account(s) from {}", count, path.display()))
    }

    fn session_account(&self) -> Option<&Account> {
        self.session.as_ref().and_then(|name| self.accounts.get(name))
    }

    fn session_account_mut(&mut self) -> Result<&mut Account, TellerError> {
        let name = self.session.as_ref().ok_or(TellerError::NotLoggedIn)?;
        self.accounts.get_mut(name).ok_or(TellerError::NotLoggedIn)
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new(OverdraftPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_create_account_logs_on() {
        let mut store = AccountStore::default();

        store.create_account("alice", "pw1").unwrap();

        assert!(store.is_logged_on());
        assert_eq!(store.current_user(), "alice");
        assert_eq!(store.current_balance(), Decimal::ZERO);
    }

    #[test]
    fn test_duplicate_account_keeps_original() {
        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();
        store.deposit(dec(100)).unwrap();

        let err = store.create_account("alice", "other_pw").unwrap_err();
        assert!(matches!(err, TellerError::AccountExists(_)));

        assert_eq!(store.account_names(), vec!["alice"]);
        store.log_out();
        store.log_on("alice", "pw1").unwrap();
        assert_eq!(store.current_balance(), dec(100));
    }

    #[test]
    fn test_log_on_unknown_user() {
        let mut store = AccountStore::default();

        let err = store.log_on("bob", "pw").unwrap_err();
        assert!(matches!(err, TellerError::UnknownUser(_)));
        assert!(err.to_string().contains("not recognized"));
        assert!(!store.is_logged_on());
    }

    #[test]
    fn test_log_on_wrong_password() {
        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();
        store.log_out();

        assert!(matches!(
            store.log_on("alice", "nope"),
            Err(TellerError::InvalidPassword)
        ));
        assert!(!store.is_logged_on());
    }

    #[test]
    fn test_log_on_reports_previous_time() {
        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();
        store.log_out();

        let msg = store.log_on("alice", "pw1").unwrap();
        assert!(msg.contains("alice"));
        assert!(msg.contains("last log-on"));
    }

    #[test]
    fn test_operations_require_session() {
        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();
        store.log_out();

        assert!(matches!(store.deposit(dec(10)), Err(TellerError::NotLoggedIn)));
        assert!(matches!(store.withdraw(dec(10)), Err(TellerError::NotLoggedIn)));

        // Accessors degrade to empty values instead of failing
        assert!(!store.is_logged_on());
        assert_eq!(store.current_user(), "");
        assert_eq!(store.current_balance(), Decimal::ZERO);
        assert!(store.current_history().is_empty());

        // Logging out twice is a no-op
        store.log_out();
    }

    #[test]
    fn test_save_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        let store = AccountStore::default();
        assert!(matches!(store.save(&path), Err(TellerError::NothingToSave)));
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_leaves_state() {
        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();

        assert!(matches!(
            store.load("/definitely/not/here.json"),
            Err(TellerError::Io(_))
        ));
        assert_eq!(store.account_names(), vec!["alice"]);
        assert_eq!(store.current_user(), "alice");
    }

    #[test]
    fn test_load_replaces_accounts_and_clears_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.json");

        let mut original = AccountStore::default();
        original.create_account("alice", "pw1").unwrap();
        original.deposit(dec(100)).unwrap();
        original.save(&path).unwrap();

        let mut other = AccountStore::default();
        other.create_account("bob", "pw2").unwrap();

        other.load(&path).unwrap();
        assert_eq!(other.account_names(), vec!["alice"]);
        assert!(!other.is_logged_on());
    }

    #[test]
    fn test_save_load_round_trip_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");

        let mut store = AccountStore::default();
        store.create_account("alice", "pw1").unwrap();
        assert_eq!(store.current_balance(), Decimal::ZERO);

        store.deposit(dec(100)).unwrap();
        assert_eq!(store.current_balance(), dec(100));

        // Default policy denies the overdraft and keeps the balance
        assert!(matches!(
            store.withdraw(dec(150)),
            Err(TellerError::InsufficientFunds { .. })
        ));
        assert_eq!(store.current_balance(), dec(100));

        store.save(&path).unwrap();

        let mut restored = AccountStore::default();
        restored.load(&path).unwrap();
        restored.log_on("alice", "pw1").unwrap();

        assert_eq!(restored.current_balance(), dec(100));
        let history = restored.current_history();
        assert_eq!(history.len(), 2);
        assert!(history[1].contains("insufficient funds"));
    }

    #[test]
    fn test_allow_negative_policy() {
        let mut store = AccountStore::new(OverdraftPolicy::AllowNegative);
        store.create_account("alice", "pw1").unwrap();
        store.deposit(dec(100)).unwrap();

        store.withdraw(dec(150)).unwrap();
        assert_eq!(store.current_balance(), dec(-50));
    }
}
