//! Password gating for mutating operations.
//!
//! A single shared password protects every mutation. Only its SHA-256 digest is
//! stored; each session the entered password is hashed and compared. This is not
//! hardened authentication (no sessions, no tokens, no rate limiting), it keeps the
//! kids out of the ledger.

use crate::{Config, Result};
use anyhow::{bail, Context};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a password.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// Checks a password against a stored digest.
pub fn verify(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

/// Requires the shared password before a mutating operation. Uses `supplied` when
/// given (the `--password` flag or `POCKET_PASSWORD`), otherwise prompts on the
/// terminal.
pub(crate) fn unlock(config: &Config, supplied: Option<&str>) -> Result<()> {
    let password = match supplied {
        Some(p) => p.to_string(),
        None => dialoguer::Password::new()
            .with_prompt("Enter password to modify data")
            .interact()
            .context("Unable to read the password from the terminal")?,
    };
    if !verify(&password, config.password_hash()) {
        bail!("Invalid password");
    }
    Ok(())
}

/// Prompts for a new password, typed twice.
pub(crate) fn prompt_new_password() -> Result<String> {
    dialoguer::Password::new()
        .with_prompt("New password")
        .with_confirmation("Confirm new password", "The passwords do not match")
        .interact()
        .context("Unable to read the new password from the terminal")
}
