//! Whole-collection snapshot persistence
//!
//! Snapshots are a versioned JSON envelope holding every account with its
//! digest and full history. Only digests cross this boundary, never
//! plaintext passwords.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{Account, AccountId};
use crate::error::TellerError;

/// Bumped on incompatible format changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    accounts: Vec<Account>,
}

/// Encode the full collection. Accounts are ordered by name so the same
/// collection always produces the same bytes.
pub fn to_snapshot_bytes(
    accounts: &HashMap<AccountId, Account>,
) -> Result<Vec<u8>, TellerError> {
    let mut list: Vec<Account> = accounts.values().cloned().collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));

    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        accounts: list,
    };
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| TellerError::Snapshot(e.to_string()))?;
    Ok(json.into_bytes())
}

/// Decode a snapshot. Fails on malformed input or a version this build
/// does not understand.
pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<HashMap<AccountId, Account>, TellerError> {
    let snapshot: Snapshot =
        serde_json::from_slice(bytes).map_err(|e| TellerError::Snapshot(e.to_string()))?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(TellerError::Snapshot(format!(
            "unsupported snapshot version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    Ok(snapshot
        .accounts
        .into_iter()
        .map(|account| (account.name.clone(), account))
        .collect())
}

pub fn write_snapshot(
    path: &Path,
    accounts: &HashMap<AccountId, Account>,
) -> Result<(), TellerError> {
    let bytes = to_snapshot_bytes(accounts)?;
    fs::write(path, bytes).map_err(|e| TellerError::Io(format!("{}: {}", path.display(), e)))
}

pub fn read_snapshot(path: &Path) -> Result<HashMap<AccountId, Account>, TellerError> {
    let bytes =
        fs::read(path).map_err(|e| TellerError::Io(format!("{}: {}", path.display(), e)))?;
    from_snapshot_bytes(&bytes)
}
