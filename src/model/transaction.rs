use crate::model::Amount;
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The timestamp format used in the ledger file, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Represents a single row in the ledger: one signed cash movement for one child.
///
/// Transactions are immutable once created. A positive amount is a deposit, a negative
/// amount is a withdrawal. The `id` disambiguates rows that share a timestamp, since
/// the timestamp only has second precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    child: String,
    amount: Amount,
    reason: String,
    #[serde(with = "timestamp_format")]
    timestamp: NaiveDateTime,
}

impl Transaction {
    /// Creates a new transaction stamped with a fresh id and the current wall-clock
    /// time truncated to second precision.
    ///
    /// The caller is responsible for normalizing `child` and validating `amount`.
    pub(crate) fn new(
        child: impl Into<String>,
        amount: Amount,
        reason: impl Into<String>,
    ) -> Self {
        let now = Local::now().naive_local();
        Self {
            id: Uuid::new_v4(),
            child: child.into(),
            amount,
            reason: reason.into(),
            timestamp: now.with_nanosecond(0).unwrap_or(now),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn child(&self) -> &str {
        &self.child
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Normalizes a child's name: trims surrounding whitespace and title-cases each word,
/// so `"  alice smith "` becomes `"Alice Smith"`.
pub fn normalize_child(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alphanumeric = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            if prev_alphanumeric {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphanumeric = true;
        } else {
            out.push(c);
            prev_alphanumeric = false;
        }
    }
    out
}

/// Represents the columns of the ledger file, in order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerColumn {
    Id,
    Child,
    Amount,
    Reason,
    Timestamp,
}

serde_plain::derive_display_from_serialize!(LedgerColumn);
serde_plain::derive_fromstr_from_deserialize!(LedgerColumn);

impl LedgerColumn {
    pub const ALL: [LedgerColumn; 5] = [
        LedgerColumn::Id,
        LedgerColumn::Child,
        LedgerColumn::Amount,
        LedgerColumn::Reason,
        LedgerColumn::Timestamp,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            LedgerColumn::Id => "id",
            LedgerColumn::Child => "child",
            LedgerColumn::Amount => "amount",
            LedgerColumn::Reason => "reason",
            LedgerColumn::Timestamp => "timestamp",
        }
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_normalize_child_trims_and_title_cases() {
        assert_eq!(normalize_child("  alice smith "), "Alice Smith");
        assert_eq!(normalize_child("BOB"), "Bob");
        assert_eq!(normalize_child("mary-jane"), "Mary-Jane");
        assert_eq!(normalize_child("o'brien"), "O'Brien");
    }

    #[test]
    fn test_normalize_child_blank() {
        assert_eq!(normalize_child("   "), "");
        assert_eq!(normalize_child(""), "");
    }

    #[test]
    fn test_new_stamps_second_precision() {
        let t = Transaction::new("Alice", Amount::from_str("5").unwrap(), "sweets");
        assert_eq!(t.timestamp().and_utc().timestamp_subsec_nanos(), 0);
        assert_eq!(t.child(), "Alice");
        assert_eq!(t.reason(), "sweets");
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Transaction::new("Alice", Amount::from_str("5").unwrap(), "");
        let b = Transaction::new("Alice", Amount::from_str("5").unwrap(), "");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_timestamp_serde_round_trip() {
        let t = Transaction::new("Alice", Amount::from_str("5").unwrap(), "sweets");
        let json = serde_json::to_string(&t).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }

    #[test]
    fn test_ledger_column_names() {
        let headers: Vec<String> = LedgerColumn::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(headers, vec!["id", "child", "amount", "reason", "timestamp"]);
        assert_eq!(LedgerColumn::from_str("child").unwrap(), LedgerColumn::Child);
        assert_eq!(LedgerColumn::Timestamp.header(), "timestamp");
    }
}
