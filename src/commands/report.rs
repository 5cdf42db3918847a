//! Read-only reporting commands: balances, per-child summary, and history.
//!
//! These render the pure aggregations from [`crate::report`] as padded text tables;
//! the underlying data rides along as the `Out` structure.

use crate::commands::{render_table, Out};
use crate::model::Transaction;
use crate::report::{self, ChildBalance, Summary};
use crate::{Config, Ledger, Result};

/// Shows the current balance of every child, sorted by name.
pub async fn balances(config: &Config) -> Result<Out<Vec<ChildBalance>>> {
    let ledger = Ledger::load(config.ledger_path()).await?;
    if ledger.is_empty() {
        return Ok("No transactions yet. Add one to get started.".into());
    }
    let balances = report::balances(ledger.rows());
    let rows: Vec<Vec<String>> = balances
        .iter()
        .map(|b| {
            vec![
                b.child.clone(),
                format!("R {}", crate::Amount::new(b.balance)),
                format!("R {}", crate::Amount::new(b.last_change)),
            ]
        })
        .collect();
    let table = render_table(&["Child", "Balance", "Last Change"], &rows);
    Ok(Out::new(
        format!("Current Balances\n\n{table}"),
        balances,
    ))
}

/// Shows one child's financial overview (earned, spent, balance) and their running
/// balance history in timestamp order.
pub async fn summary(config: &Config, child: &str) -> Result<Out<Summary>> {
    let ledger = Ledger::load(config.ledger_path()).await?;
    let summary = report::summary(ledger.rows(), child);
    let points = report::running_balance(ledger.rows(), child);
    let child = crate::model::normalize_child(child);
    if points.is_empty() {
        return Ok(Out::new(
            format!("No transactions yet for {child}."),
            summary,
        ));
    }

    let overview = format!(
        "Total Earned:    R {}\nTotal Spent:     R {}\nCurrent Balance: R {}",
        crate::Amount::new(summary.earned),
        crate::Amount::new(summary.spent),
        crate::Amount::new(summary.balance),
    );
    let rows: Vec<Vec<String>> = points
        .iter()
        .map(|p| {
            vec![
                p.timestamp.format(crate::model::TIMESTAMP_FORMAT).to_string(),
                format!("R {}", crate::Amount::new(p.amount)),
                format!("R {}", crate::Amount::new(p.balance)),
            ]
        })
        .collect();
    let table = render_table(&["Timestamp", "Amount", "Running Balance"], &rows);
    Ok(Out::new(
        format!("Overview for {child}\n\n{overview}\n\nBalance History\n\n{table}"),
        summary,
    ))
}

/// Lists transactions newest first, optionally for a single child.
pub async fn history(config: &Config, child: Option<&str>) -> Result<Out<Vec<Transaction>>> {
    let ledger = Ledger::load(config.ledger_path()).await?;
    let filter = child.map(crate::model::normalize_child);
    let mut entries: Vec<Transaction> = ledger
        .rows()
        .iter()
        .filter(|t| filter.as_deref().is_none_or(|c| t.child() == c))
        .cloned()
        .collect();
    if entries.is_empty() {
        return Ok("No transactions to show.".into());
    }
    entries.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|t| {
            vec![
                t.timestamp().format(crate::model::TIMESTAMP_FORMAT).to_string(),
                t.child().to_string(),
                format!("R {}", t.amount()),
                t.reason().to_string(),
            ]
        })
        .collect();
    let table = render_table(&["Timestamp", "Child", "Amount", "Reason"], &rows);
    Ok(Out::new(
        format!("{} transaction(s)\n\n{table}", entries.len()),
        entries,
    ))
}
