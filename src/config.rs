use serde::{Deserialize, Serialize};

/// What happens when a withdrawal exceeds the balance.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverdraftPolicy {
    /// Reject the withdrawal and record the rejection.
    #[default]
    Deny,
    /// Always permit; the balance may go negative.
    AllowNegative,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TellerConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    #[serde(default)]
    pub overdraft: OverdraftPolicy,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_snapshot_path() -> String {
    "accounts.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            overdraft: OverdraftPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl TellerConfig {
    pub fn load_or_default(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            match std::fs::read_to_string(path) {
                Ok(s) => match toml::from_str(&s) {
                    Ok(c) => {
                        tracing::info!("Config loaded from {}", path);
                        c
                    }
                    Err(e) => {
                        tracing::warn!("Config parse error in {}: {}. Using defaults.", path, e);
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("Config read error in {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }
}
