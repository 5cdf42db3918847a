//! These structs provide the CLI interface for the pocket CLI.

use crate::model::Amount;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// pocket: A command-line pocket-money ledger for the household.
///
/// The purpose of this program is to record signed pocket-money transactions per
/// child in a flat file, show balances, summaries and transaction history, and to
/// credit a configured monthly auto-deposit per child. All data lives in a single
/// directory (by default ~/pocket) and mutating commands are gated by a shared
/// password.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the initial configuration file.
    ///
    /// This is the first command to run. Decide which directory should hold the
    /// ledger and pass it as --pocket-home (default: $HOME/pocket), then choose the
    /// shared password: it is prompted for, or taken from --password /
    /// POCKET_PASSWORD. Only its SHA-256 digest is stored.
    Init,
    /// Record a transaction: a positive amount adds funds, a negative amount spends.
    Add(AddArgs),
    /// Show the current balance of every child.
    Balances,
    /// Show one child's financial overview and running balance history.
    Summary(SummaryArgs),
    /// List transactions, newest first, optionally for a single child.
    History(HistoryArgs),
    /// Configure, list or run the monthly auto-deposits.
    Autodeposit(AutodepositArgs),
    /// Delete ALL transactions. This cannot be undone.
    Clear(ClearArgs),
    /// Change the shared password.
    Passwd,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for
    /// instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and configuration are held. Defaults to
    /// ~/pocket
    #[arg(long, env = "POCKET_HOME", default_value_t = default_pocket_home())]
    pocket_home: DisplayPath,

    /// The shared password for mutating commands. Prompted for when omitted.
    #[arg(long, env = "POCKET_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, pocket_home: PathBuf, password: Option<String>) -> Self {
        Self {
            log_level,
            pocket_home: pocket_home.into(),
            password,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn pocket_home(&self) -> &DisplayPath {
        &self.pocket_home
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

/// Args for the `pocket add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The child's name. It will be trimmed and title-cased, so "alice" and
    /// "Alice " are the same account.
    child: String,

    /// The amount: positive = add funds, negative = spend funds. A currency prefix
    /// and thousands separators are accepted, e.g. -R1,250.50
    #[arg(allow_hyphen_values = true)]
    amount: Amount,

    /// What the money was for, e.g. 'Allowance', 'Candy', 'Chores'
    #[arg(long, default_value = "")]
    reason: String,
}

impl AddArgs {
    pub fn new(child: impl Into<String>, amount: Amount, reason: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            amount,
            reason: reason.into(),
        }
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
}

/// Args for the `pocket summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The child to summarize.
    child: String,
}

impl SummaryArgs {
    pub fn new(child: impl Into<String>) -> Self {
        Self {
            child: child.into(),
        }
    }

    pub fn child(&self) -> &str {
        &self.child
    }
}

/// Args for the `pocket history` command.
#[derive(Debug, Parser, Clone)]
pub struct HistoryArgs {
    /// Show only this child's transactions instead of all of them.
    #[arg(long)]
    child: Option<String>,
}

impl HistoryArgs {
    pub fn new(child: Option<String>) -> Self {
        Self { child }
    }

    pub fn child(&self) -> Option<&str> {
        self.child.as_deref()
    }
}

/// Args for the `pocket autodeposit` command.
#[derive(Debug, Parser, Clone)]
pub struct AutodepositArgs {
    #[command(subcommand)]
    action: AutodepositSubcommand,
}

impl AutodepositArgs {
    pub fn action(&self) -> &AutodepositSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum AutodepositSubcommand {
    /// Configure (or overwrite) a monthly deposit for a child.
    Set(SetAutodepositArgs),
    /// Show the configured monthly deposits and the last run date.
    List,
    /// Run the monthly catch-up now. This also happens automatically on every
    /// invocation, and is a no-op when the current month has already run.
    Run,
}

/// Args for the `pocket autodeposit set` command.
#[derive(Debug, Parser, Clone)]
pub struct SetAutodepositArgs {
    /// The child's name.
    child: String,

    /// The monthly amount. Must be positive.
    amount: Amount,
}

impl SetAutodepositArgs {
    pub fn new(child: impl Into<String>, amount: Amount) -> Self {
        Self {
            child: child.into(),
            amount,
        }
    }

    pub fn child(&self) -> &str {
        &self.child
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Args for the `pocket clear` command.
#[derive(Debug, Parser, Clone)]
pub struct ClearArgs {
    /// Skip the interactive confirmation.
    #[arg(long)]
    yes: bool,
}

impl ClearArgs {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

fn default_pocket_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("pocket"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --pocket-home or POCKET_HOME instead of relying on the default \
                pocket home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("pocket")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::parse_from(["pocket", "add", "alice", "-R1,250.50", "--reason", "Bike"]);
        match args.command() {
            Command::Add(add) => {
                assert_eq!(add.child(), "alice");
                assert!(add.amount().is_negative());
                assert_eq!(add.reason(), "Bike");
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_autodeposit_set() {
        let args = Args::parse_from(["pocket", "autodeposit", "set", "Bob", "75.50"]);
        match args.command() {
            Command::Autodeposit(ad) => match ad.action() {
                AutodepositSubcommand::Set(set) => {
                    assert_eq!(set.child(), "Bob");
                    assert!(set.amount().is_positive());
                }
                other => panic!("expected set, got {other:?}"),
            },
            other => panic!("expected autodeposit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_clear_yes() {
        let args = Args::parse_from(["pocket", "clear", "--yes"]);
        match args.command() {
            Command::Clear(clear) => assert!(clear.yes()),
            other => panic!("expected clear, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_invalid_amount() {
        assert!(Args::try_parse_from(["pocket", "add", "alice", "lots"]).is_err());
    }
}
