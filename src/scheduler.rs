//! The monthly auto-deposit scheduler.
//!
//! A run is due when the current calendar month is strictly later than the month of
//! the last successful run; the day of the month is irrelevant, so at most one run
//! happens per calendar month no matter how many times the check fires. The CLI
//! triggers a catch-up once per invocation.
//!
//! A run touches two durable files (the ledger and the config), so the intended
//! entries are journaled first. If the process dies between the two writes, the next
//! catch-up replays the journal: entries are re-applied only when their id is absent
//! from the ledger, and the last-run date only advances forward.

use crate::config::Config;
use crate::ledger::Ledger;
use crate::model::{normalize_child, Amount, Transaction};
use crate::{utils, Result};
use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The reason recorded on every scheduled deposit.
pub const AUTO_DEPOSIT_REASON: &str = "Monthly Auto Deposit";

/// True iff `today` falls in a strictly later calendar month than `last`.
pub fn is_due(last: NaiveDate, today: NaiveDate) -> bool {
    (today.year(), today.month()) > (last.year(), last.month())
}

/// The write-ahead record for one auto-deposit run. It is written before either
/// durable file is touched and deleted once both are committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Journal {
    run_date: NaiveDate,
    entries: Vec<Transaction>,
}

/// What a catch-up call did.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    ran: bool,
    deposits: Vec<Transaction>,
}

impl RunOutcome {
    /// True when this call performed a monthly run (not counting journal recovery).
    pub fn ran(&self) -> bool {
        self.ran
    }

    /// The deposits appended by this call's run, one per configured child.
    pub fn deposits(&self) -> &[Transaction] {
        &self.deposits
    }

    fn skipped() -> Self {
        Self {
            ran: false,
            deposits: Vec::new(),
        }
    }
}

/// Recovers any interrupted run, then performs the monthly run if one is due:
/// appends one deposit per configured child (each with its own fresh timestamp),
/// advances `last_auto_deposit` to `today`, and persists the config.
///
/// Calling this again in the same calendar month is a no-op.
pub async fn catch_up(
    config: &mut Config,
    ledger: &mut Ledger,
    today: NaiveDate,
) -> Result<RunOutcome> {
    recover(config, ledger).await?;

    if !is_due(config.last_auto_deposit(), today) {
        debug!(
            "Auto-deposits are up to date (last run {})",
            config.last_auto_deposit()
        );
        return Ok(RunOutcome::skipped());
    }

    // Keys are normalized when written through `set_auto_deposit`, but a hand-edited
    // config can hold raw names; normalize again so every row matches `balance`.
    let entries: Vec<Transaction> = config
        .auto_deposits()
        .iter()
        .map(|(child, amount)| {
            Transaction::new(normalize_child(child), *amount, AUTO_DEPOSIT_REASON)
        })
        .collect();

    // Journal the whole run before touching the ledger or the config, then commit
    // both and remove the journal.
    let journal = Journal {
        run_date: today,
        entries: entries.clone(),
    };
    utils::write_atomic(config.journal_path(), serde_json::to_string_pretty(&journal)?).await?;

    ledger.extend(entries.clone()).await?;
    config.set_last_auto_deposit(today);
    config.save().await?;
    utils::remove(config.journal_path()).await?;

    info!(
        "Processed {} monthly auto-deposit(s) for {}",
        entries.len(),
        today
    );
    Ok(RunOutcome {
        ran: true,
        deposits: entries,
    })
}

/// Replays a leftover journal from a run that did not commit both files. Idempotent:
/// entries already in the ledger are skipped by id, and the last-run date never moves
/// backwards.
async fn recover(config: &mut Config, ledger: &mut Ledger) -> Result<()> {
    if !config.journal_path().is_file() {
        return Ok(());
    }
    warn!("Found an interrupted auto-deposit run, replaying it");
    let journal: Journal = utils::deserialize(config.journal_path()).await?;

    let missing: Vec<Transaction> = journal
        .entries
        .into_iter()
        .filter(|t| !ledger.contains(t.id()))
        .collect();
    if !missing.is_empty() {
        ledger.extend(missing).await?;
    }
    if config.last_auto_deposit() < journal.run_date {
        config.set_last_auto_deposit(journal.run_date);
        config.save().await?;
    }
    utils::remove(config.journal_path()).await
}

/// Configures (or overwrites) a monthly auto-deposit for a child and persists the
/// config immediately. Returns the normalized child name.
pub async fn set_auto_deposit(config: &mut Config, child: &str, amount: Amount) -> Result<String> {
    let child = normalize_child(child);
    if child.is_empty() {
        bail!("The child's name cannot be empty");
    }
    if !amount.is_positive() {
        bail!("The monthly deposit amount must be positive");
    }
    config.set_auto_deposit(child.clone(), amount);
    config.save().await?;
    Ok(child)
}
