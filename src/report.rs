//! Pure aggregations over a loaded transaction table.
//!
//! Nothing here touches storage: every function takes the rows as a slice and
//! recomputes its result from scratch. An empty table produces empty results,
//! never errors.

use crate::model::{normalize_child, Transaction};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One child's derived balance, plus the amount of their most recent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildBalance {
    pub child: String,
    pub balance: Decimal,
    pub last_change: Decimal,
}

/// Per-child balances: group by child, sum the amounts, sorted by child name
/// ascending. `last_change` is the amount of the child's latest row in append order.
pub fn balances(rows: &[Transaction]) -> Vec<ChildBalance> {
    let mut totals: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.child()).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += row.amount().value();
        entry.1 = row.amount().value();
    }
    totals
        .into_iter()
        .map(|(child, (balance, last_change))| ChildBalance {
            child: child.to_string(),
            balance,
            last_change,
        })
        .collect()
}

/// The distinct child names in the table, sorted ascending.
pub fn children(rows: &[Transaction]) -> Vec<String> {
    let mut names: Vec<String> = rows.iter().map(|t| t.child().to_string()).collect();
    names.sort();
    names.dedup();
    names
}

/// One point on a child's running-balance line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancePoint {
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
    pub balance: Decimal,
}

/// A child's balance history: their transactions sorted by timestamp ascending with
/// a prefix sum of the amounts. Rows sharing a timestamp keep their append order
/// (the sort is stable).
pub fn running_balance(rows: &[Transaction], child: &str) -> Vec<BalancePoint> {
    let child = normalize_child(child);
    let mut entries: Vec<&Transaction> = rows.iter().filter(|t| t.child() == child).collect();
    entries.sort_by_key(|t| t.timestamp());
    let mut balance = Decimal::ZERO;
    entries
        .into_iter()
        .map(|t| {
            balance += t.amount().value();
            BalancePoint {
                timestamp: t.timestamp(),
                amount: t.amount().value(),
                balance,
            }
        })
        .collect()
}

/// The financial overview for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all positive amounts.
    pub earned: Decimal,
    /// Sum of all negative amounts, reported as its absolute value.
    pub spent: Decimal,
    /// Sum of all amounts.
    pub balance: Decimal,
    /// Amount of the latest transaction in timestamp order, if any.
    pub last_change: Option<Decimal>,
}

pub fn summary(rows: &[Transaction], child: &str) -> Summary {
    let points = running_balance(rows, child);
    let mut earned = Decimal::ZERO;
    let mut spent = Decimal::ZERO;
    for point in &points {
        if point.amount.is_sign_positive() {
            earned += point.amount;
        } else {
            spent += point.amount.abs();
        }
    }
    Summary {
        earned,
        spent,
        balance: points.last().map(|p| p.balance).unwrap_or_default(),
        last_change: points.last().map(|p| p.amount),
    }
}
