use crate::commands::Out;
use crate::{auth, Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json`.
///
/// # Arguments
/// - `pocket_home` - The directory that will hold the ledger and config, e.g.
///   `$HOME/pocket`
/// - `password` - The shared password for mutating commands. Prompted for (typed
///   twice) when not supplied. Only its SHA-256 digest is stored.
///
/// # Errors
/// - Returns an error if a config file already exists or any file operation fails.
pub async fn init(pocket_home: &Path, password: Option<&str>) -> Result<Out<()>> {
    let password = match password {
        Some(p) => p.to_string(),
        None => auth::prompt_new_password()?,
    };
    let config = Config::create(pocket_home, auth::hash_password(&password))
        .await
        .context("Unable to create the data directory and config")?;
    Ok(Out::new_message(format!(
        "Created the pocket home directory at {}",
        config.root().display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_config() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        init(&home, Some("secret")).await.unwrap();

        let config = Config::load(&home).await.unwrap();
        assert!(crate::auth::verify("secret", config.password_hash()));
        assert!(config.auto_deposits().is_empty());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("pocket");
        init(&home, Some("secret")).await.unwrap();
        assert!(init(&home, Some("other")).await.is_err());
    }
}
