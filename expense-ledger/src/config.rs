//! Configuration for the expense ledger service

use crate::error::{Error, Result};
use crate::policy::{LedgerPolicy, MissingUserPolicy, SelectionMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listen address
    pub listen_addr: String,

    /// Data directory for the RocksDB binding
    pub data_dir: PathBuf,

    /// Which store binding to construct
    pub store_backend: StoreBackend,

    /// RocksDB tuning
    pub rocksdb: RocksDbConfig,

    /// Ledger behavior policy
    pub policy: LedgerPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./data/expenses"),
            store_backend: StoreBackend::Memory,
            rocksdb: RocksDbConfig::default(),
            policy: LedgerPolicy::default(),
        }
    }
}

/// Store binding selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// In-memory store (dev and tests)
    Memory,
    /// RocksDB store under `data_dir`
    Rocksdb,
}

/// RocksDB tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RocksDbConfig {
    /// Write buffer size (MB)
    pub write_buffer_size_mb: usize,

    /// Max write buffers
    pub max_write_buffer_number: i32,

    /// Max background jobs (compaction + flush)
    pub max_background_jobs: i32,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            max_background_jobs: 2,
        }
    }
}

impl Config {
    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Validation(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Validation(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Defaults with environment variable overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(addr) = std::env::var("EXPENSE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(data_dir) = std::env::var("EXPENSE_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(backend) = std::env::var("EXPENSE_STORE_BACKEND") {
            config.store_backend = match backend.as_str() {
                "memory" => StoreBackend::Memory,
                "rocksdb" => StoreBackend::Rocksdb,
                other => {
                    return Err(Error::Validation(format!(
                        "Unknown store backend: {}",
                        other
                    )))
                }
            };
        }

        if let Ok(mode) = std::env::var("EXPENSE_SELECTION_MODE") {
            config.policy.selection_mode = match mode.as_str() {
                "scan" => SelectionMode::Scan,
                "indexed" => SelectionMode::Indexed,
                other => {
                    return Err(Error::Validation(format!(
                        "Unknown selection mode: {}",
                        other
                    )))
                }
            };
        }

        if let Ok(user) = std::env::var("EXPENSE_DEFAULT_USER") {
            config.policy.missing_user = MissingUserPolicy::Placeholder(user);
        }

        if std::env::var("EXPENSE_REQUIRE_USER_ID").is_ok_and(|v| v == "1" || v == "true") {
            config.policy.missing_user = MissingUserPolicy::Reject;
        }

        if std::env::var("EXPENSE_MINT_ENTRY_ID").is_ok_and(|v| v == "1" || v == "true") {
            config.policy.mint_entry_id = true;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PLACEHOLDER_USER;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(
            config.policy.missing_user,
            MissingUserPolicy::Placeholder(PLACEHOLDER_USER.to_string())
        );
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            listen_addr = "127.0.0.1:9000"
            store_backend = "rocksdb"

            [rocksdb]
            write_buffer_size_mb = 128

            [policy]
            selection_mode = "indexed"
            missing_user = "reject"
            mint_entry_id = true
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.store_backend, StoreBackend::Rocksdb);
        assert_eq!(config.rocksdb.write_buffer_size_mb, 128);
        assert_eq!(config.policy.selection_mode, SelectionMode::Indexed);
        assert_eq!(config.policy.missing_user, MissingUserPolicy::Reject);
        assert!(config.policy.mint_entry_id);
    }

    #[test]
    fn test_parse_toml_placeholder_user() {
        let config: Config = toml::from_str(
            r#"
            [policy]
            selection_mode = "scan"
            missing_user = { placeholder = "household" }
            mint_entry_id = false
            "#,
        )
        .unwrap();

        assert_eq!(
            config.policy.missing_user,
            MissingUserPolicy::Placeholder("household".to_string())
        );
    }
}
