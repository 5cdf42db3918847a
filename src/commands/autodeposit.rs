use crate::commands::{render_table, Out};
use crate::model::Amount;
use crate::scheduler::{self, RunOutcome};
use crate::{auth, Config, Ledger, Result};
use chrono::Local;
use std::collections::BTreeMap;

/// Runs the scheduler's catch-up against today's date: recovery first, then the
/// monthly run if one is due. The CLI calls this once per invocation before
/// dispatching a command; `pocket autodeposit run` calls it explicitly.
pub async fn catch_up(config: &mut Config) -> Result<RunOutcome> {
    let mut ledger = Ledger::load(config.ledger_path()).await?;
    scheduler::catch_up(config, &mut ledger, Local::now().date_naive()).await
}

/// Explicitly runs the monthly catch-up and reports what happened.
pub async fn run_autodeposits(config: &mut Config) -> Result<Out<RunOutcome>> {
    let outcome = catch_up(config).await?;
    let message = if outcome.ran() {
        format!(
            "Monthly auto-deposits have been processed: {} deposit(s).",
            outcome.deposits().len()
        )
    } else {
        format!(
            "Auto-deposits are up to date (last run {}).",
            config.last_auto_deposit()
        )
    };
    Ok(Out::new(message, outcome))
}

/// Configures (or overwrites) a child's monthly deposit. Password-gated.
pub async fn set_autodeposit(
    config: &mut Config,
    password: Option<&str>,
    child: &str,
    amount: Amount,
) -> Result<Out<()>> {
    auth::unlock(config, password)?;
    let child = scheduler::set_auto_deposit(config, child, amount).await?;
    Ok(Out::new_message(format!(
        "Auto-deposit configured: {child} receives R {amount} monthly."
    )))
}

/// Shows the configured monthly deposits and the last run date.
pub async fn list_autodeposits(config: &Config) -> Result<Out<BTreeMap<String, Amount>>> {
    let deposits = config.auto_deposits().clone();
    if deposits.is_empty() {
        return Ok("No auto-deposits configured.".into());
    }
    let rows: Vec<Vec<String>> = deposits
        .iter()
        .map(|(child, amount)| vec![child.clone(), format!("R {amount}")])
        .collect();
    let table = render_table(&["Child", "Monthly Amount"], &rows);
    Ok(Out::new(
        format!(
            "{table}\n\nLast auto-deposit run: {}",
            config.last_auto_deposit()
        ),
        deposits,
    ))
}
