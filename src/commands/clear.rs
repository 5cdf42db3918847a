use crate::commands::Out;
use crate::{auth, Config, Ledger, Result};
use anyhow::Context;

/// Deletes ALL transactions. Password-gated, and asks for confirmation on the
/// terminal unless `yes` is set. The wipe itself is unconditional once confirmed.
pub async fn clear(config: &Config, password: Option<&str>, yes: bool) -> Result<Out<()>> {
    auth::unlock(config, password)?;
    let mut ledger = Ledger::load(config.ledger_path()).await?;
    if ledger.is_empty() {
        return Ok("The ledger is already empty.".into());
    }
    let count = ledger.rows().len();
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete ALL {count} record(s)? This cannot be undone."
            ))
            .default(false)
            .interact()
            .context("Unable to read the confirmation from the terminal")?;
        if !confirmed {
            return Ok("Aborted, no data was deleted.".into());
        }
    }
    ledger.clear().await?;
    Ok(Out::new_message(format!("Deleted {count} transaction(s).")))
}
