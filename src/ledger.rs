//! The ledger store: an append-only table of transactions backed by a CSV file.
//!
//! The file has a header row (`id,child,amount,reason,timestamp`) and rows in append
//! order. The whole table is loaded fresh for each operation and persisted immediately
//! after each append or wipe; balances are always recomputed from the rows, never
//! cached.

use crate::model::{normalize_child, Amount, LedgerColumn, Transaction};
use crate::{utils, Result};
use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// The transaction table and the file backing it.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    rows: Vec<Transaction>,
}

impl Ledger {
    /// Loads the ledger from `path`. A missing file is not an error: it yields an
    /// empty ledger. A file that exists but cannot be parsed, or whose header row
    /// does not match the expected columns, is an error.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Ok(Self {
                path,
                rows: Vec::new(),
            });
        }
        let content = utils::read(&path).await?;
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let headers = reader
            .headers()
            .with_context(|| format!("Unable to read the header row of {}", path.display()))?;
        let expected = LedgerColumn::ALL.map(|c| c.header());
        if headers.iter().ne(expected) {
            bail!(
                "The ledger file at {} has unexpected columns '{}', expected '{}'",
                path.display(),
                headers.iter().collect::<Vec<_>>().join(","),
                expected.join(",")
            );
        }
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: Transaction = result
                .with_context(|| format!("Corrupt ledger row in {}", path.display()))?;
            rows.push(row);
        }
        debug!("Loaded {} transactions from {}", rows.len(), path.display());
        Ok(Self { path, rows })
    }

    /// The transactions in append order.
    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if a transaction with the given id is already in the table.
    pub fn contains(&self, id: Uuid) -> bool {
        self.rows.iter().any(|t| t.id() == id)
    }

    /// Validates, records and persists a new transaction, returning it.
    ///
    /// The child name is normalized (trimmed, title-cased) and must be non-empty
    /// afterwards; the amount must be non-zero. Nothing is persisted when
    /// validation fails.
    pub async fn append(&mut self, child: &str, amount: Amount, reason: &str) -> Result<Transaction> {
        let child = normalize_child(child);
        if child.is_empty() {
            bail!("The child's name cannot be empty");
        }
        if amount.is_zero() {
            bail!("The amount cannot be zero");
        }
        let entry = Transaction::new(child, amount, reason);
        self.rows.push(entry.clone());
        self.save().await?;
        Ok(entry)
    }

    /// Appends pre-built transactions (e.g. scheduler deposits) and persists once.
    pub(crate) async fn extend(&mut self, entries: Vec<Transaction>) -> Result<()> {
        self.rows.extend(entries);
        self.save().await
    }

    /// The sum of all amounts for `child` (matched after normalization).
    /// An unknown child has a balance of zero.
    pub fn balance(&self, child: &str) -> Decimal {
        let child = normalize_child(child);
        self.rows
            .iter()
            .filter(|t| t.child() == child)
            .map(|t| t.amount().value())
            .sum()
    }

    /// Irreversibly deletes all transactions, in memory and on disk. Confirmation
    /// belongs to the caller; this is unconditional.
    pub async fn clear(&mut self) -> Result<()> {
        self.rows.clear();
        if self.path.is_file() {
            utils::remove(&self.path).await?;
        }
        debug!("Cleared the ledger at {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        // The serializer only emits the header row alongside the first record, so an
        // empty table needs it written explicitly.
        if self.rows.is_empty() {
            writer
                .write_record(LedgerColumn::ALL.map(|c| c.header()))
                .context("Unable to write the ledger header")?;
        }
        for row in &self.rows {
            writer
                .serialize(row)
                .context("Unable to serialize a ledger row")?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to finish writing the ledger: {}", e.error()))?;
        utils::write_atomic(&self.path, data).await?;
        debug!(
            "Wrote {} transactions to {}",
            self.rows.len(),
            self.path.display()
        );
        Ok(())
    }
}
