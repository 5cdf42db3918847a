//! Configuration file handling for the pocket-money ledger.
//!
//! The configuration file is stored at `$POCKET_HOME/config.json` and holds the
//! shared password hash, the configured monthly auto-deposits, and the date of the
//! last successful auto-deposit run.

use crate::model::Amount;
use crate::{utils, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "pocket";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const LEDGER_CSV: &str = "ledger.csv";
const JOURNAL_FILE: &str = "autodeposit.journal";

/// The `Config` object represents the state of the app's home directory. You
/// instantiate it by providing the path to `$POCKET_HOME` and from there it loads
/// `$POCKET_HOME/config.json` and knows where the ledger and the auto-deposit
/// journal live.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    ledger_path: PathBuf,
    journal_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory (if needed) and an initial `config.json` with the
    /// given password hash, no auto-deposits, and today as the last auto-deposit
    /// date so that no back-deposit fires on the first load.
    ///
    /// # Errors
    /// - Returns an error if the directory already contains a config file, or if
    ///   any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, password_hash: String) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the pocket home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!(
                "A config file already exists at '{}', refusing to overwrite it",
                config_path.display()
            );
        }

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            password_hash,
            auto_deposits: BTreeMap::new(),
            last_auto_deposit: chrono::Local::now().date_naive(),
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            ledger_path: root.join(LEDGER_CSV),
            journal_path: root.join(JOURNAL_FILE),
            root,
            config_path,
            config_file,
        })
    }

    /// Validates that the home directory and config file exist, loads the config
    /// file, and returns the loaded configuration object.
    pub async fn load(pocket_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = pocket_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The pocket home directory is missing, run 'pocket init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing at '{}', run 'pocket init' first",
                config_path.display()
            );
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            ledger_path: root.join(LEDGER_CSV),
            journal_path: root.join(JOURNAL_FILE),
            root,
            config_path,
            config_file,
        })
    }

    /// Persists the current configuration. Called immediately after each mutation.
    pub async fn save(&self) -> Result<()> {
        self.config_file.save(&self.config_path).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn password_hash(&self) -> &str {
        &self.config_file.password_hash
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.config_file.password_hash = password_hash;
    }

    /// The configured monthly auto-deposits, keyed by (normalized) child name.
    /// Iteration is name-ascending, so scheduled deposits are applied in that
    /// order rather than the order the entries were configured in.
    pub fn auto_deposits(&self) -> &BTreeMap<String, Amount> {
        &self.config_file.auto_deposits
    }

    /// Inserts or overwrites the monthly deposit for a child. Last write wins.
    pub fn set_auto_deposit(&mut self, child: String, amount: Amount) {
        let _ = self.config_file.auto_deposits.insert(child, amount);
    }

    pub fn last_auto_deposit(&self) -> NaiveDate {
        self.config_file.last_auto_deposit
    }

    pub fn set_last_auto_deposit(&mut self, date: NaiveDate) {
        self.config_file.last_auto_deposit = date;
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "pocket",
///   "config_version": 1,
///   "password_hash": "e3c8d46ef0ca7b1e39d58b4b1351c1354ee2c87cbb35c2b2179afb041cf24e0d",
///   "auto_deposits": {
///     "Alice": "100",
///     "Bob": "75.50"
///   },
///   "last_auto_deposit": "2025-09-01"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "pocket"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Hex-encoded SHA-256 digest of the shared password
    password_hash: String,

    /// Child name -> positive monthly deposit amount
    auto_deposits: BTreeMap<String, Amount>,

    /// Date of the most recent successful monthly auto-deposit run (YYYY-MM-DD)
    last_auto_deposit: NaiveDate,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` does
    /// not match.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write_atomic(path.as_ref(), data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_and_load() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        let config = Config::create(&home, "abc123".to_string()).await.unwrap();
        assert_eq!(config.password_hash(), "abc123");
        assert!(config.auto_deposits().is_empty());
        assert_eq!(config.last_auto_deposit(), chrono::Local::now().date_naive());

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(loaded.password_hash(), "abc123");
        assert_eq!(loaded.ledger_path(), config.ledger_path());
    }

    #[tokio::test]
    async fn test_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        Config::create(&home, "abc".to_string()).await.unwrap();
        assert!(Config::create(&home, "def".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_home_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nowhere")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_config_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path()).await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("The config file is missing"));
    }

    #[tokio::test]
    async fn test_mutations_persist() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        let mut config = Config::create(&home, "abc".to_string()).await.unwrap();

        config.set_auto_deposit("Alice".to_string(), Amount::from_str("100").unwrap());
        let date = NaiveDate::from_ymd_opt(2025, 10, 5).unwrap();
        config.set_last_auto_deposit(date);
        config.save().await.unwrap();

        let loaded = Config::load(&home).await.unwrap();
        assert_eq!(
            loaded.auto_deposits().get("Alice"),
            Some(&Amount::from_str("100").unwrap())
        );
        assert_eq!(loaded.last_auto_deposit(), date);
    }

    #[tokio::test]
    async fn test_auto_deposit_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        let mut config = Config::create(&home, "abc".to_string()).await.unwrap();
        config.set_auto_deposit("Alice".to_string(), Amount::from_str("100").unwrap());
        config.set_auto_deposit("Alice".to_string(), Amount::from_str("150").unwrap());
        assert_eq!(config.auto_deposits().len(), 1);
        assert_eq!(
            config.auto_deposits().get("Alice"),
            Some(&Amount::from_str("150").unwrap())
        );
    }

    #[tokio::test]
    async fn test_config_file_rejects_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "password_hash": "abc",
            "auto_deposits": {},
            "last_auto_deposit": "2025-09-01"
        }"#;
        std::fs::write(&path, json).unwrap();
        let result = ConfigFile::load(&path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_reads_amounts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "pocket",
            "config_version": 1,
            "password_hash": "abc",
            "auto_deposits": {"Alice": "100"},
            "last_auto_deposit": "2025-09-01"
        }"#;
        std::fs::write(&path, json).unwrap();
        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(
            config.auto_deposits.get("Alice"),
            Some(&Amount::from_str("100").unwrap())
        );
    }

    #[tokio::test]
    async fn test_config_file_reads_numeric_amounts() {
        // Files written by hand (or by an earlier version) hold bare numbers
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let json = r#"{
            "app_name": "pocket",
            "config_version": 1,
            "password_hash": "abc",
            "auto_deposits": {"Alice": 100, "Bob": 75.5},
            "last_auto_deposit": "2025-09-01"
        }"#;
        std::fs::write(&path, json).unwrap();
        let config = ConfigFile::load(&path).await.unwrap();
        assert_eq!(
            config.auto_deposits.get("Alice"),
            Some(&Amount::from_str("100").unwrap())
        );
        assert_eq!(
            config.auto_deposits.get("Bob"),
            Some(&Amount::from_str("75.5").unwrap())
        );
    }
}
