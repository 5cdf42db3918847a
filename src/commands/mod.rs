//! Command handlers for the pocket CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod autodeposit;
mod clear;
mod init;
mod passwd;
mod report;

use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

pub use add::add;
pub use autodeposit::{catch_up, list_autodeposits, run_autodeposits, set_autodeposit};
pub use clear::clear;
pub use init::init;
pub use passwd::passwd;
pub use report::{balances, history, summary};

/// The output type for a command. This allows the command to return a consistent,
/// printable message and, optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the
    /// command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout and the structured data (if it exists) as JSON
    /// to `debug!`.
    pub fn print(&self) {
        println!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Renders rows as a markdown-style table with padded columns.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ix, cell) in row.iter().enumerate() {
            if ix < widths.len() {
                widths[ix] = widths[ix].max(cell.len());
            }
        }
    }
    let render_row = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect();
        format!("| {} |", padded.join(" | "))
    };
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![render_row(&header_cells), render_row(&separator)];
    lines.extend(rows.iter().map(|row| render_row(row)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_message_only() {
        let out: Out<()> = "hello".into();
        assert_eq!(out.message(), "hello");
        assert!(out.structure().is_none());
    }

    #[test]
    fn test_out_with_structure() {
        let out = Out::new("hello", 42u32);
        assert_eq!(out.message(), "hello");
        assert_eq!(out.structure(), Some(&42));
    }

    #[test]
    fn test_render_table_pads_columns() {
        let table = render_table(
            &["Child", "Balance"],
            &[
                vec!["Alice".to_string(), "70.00".to_string()],
                vec!["Bo".to_string(), "1,000.00".to_string()],
            ],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Child | Balance  |");
        assert_eq!(lines[1], "| ----- | -------- |");
        assert_eq!(lines[2], "| Alice | 70.00    |");
        assert_eq!(lines[3], "| Bo    | 1,000.00 |");
    }
}
