use clap::Parser;
use pocket_ledger::args::{Args, AutodepositSubcommand, Command};
use pocket_ledger::{commands, Config, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().pocket_home().path();
    let password = args.common().password();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home, password).await?.print(),

        Command::Add(add_args) => {
            let config = session(home).await?;
            commands::add(
                &config,
                password,
                add_args.child(),
                add_args.amount(),
                add_args.reason(),
            )
            .await?
            .print()
        }

        Command::Balances => {
            let config = session(home).await?;
            commands::balances(&config).await?.print()
        }

        Command::Summary(summary_args) => {
            let config = session(home).await?;
            commands::summary(&config, summary_args.child()).await?.print()
        }

        Command::History(history_args) => {
            let config = session(home).await?;
            commands::history(&config, history_args.child()).await?.print()
        }

        Command::Autodeposit(autodeposit_args) => match autodeposit_args.action() {
            AutodepositSubcommand::Set(set_args) => {
                let mut config = session(home).await?;
                commands::set_autodeposit(&mut config, password, set_args.child(), set_args.amount())
                    .await?
                    .print()
            }
            AutodepositSubcommand::List => {
                let config = session(home).await?;
                commands::list_autodeposits(&config).await?.print()
            }
            AutodepositSubcommand::Run => {
                // No session() here: the explicit run reports its own outcome.
                let mut config = Config::load(home).await?;
                commands::run_autodeposits(&mut config).await?.print()
            }
        },

        Command::Clear(clear_args) => {
            let config = session(home).await?;
            commands::clear(&config, password, clear_args.yes()).await?.print()
        }

        Command::Passwd => {
            let mut config = session(home).await?;
            commands::passwd(&mut config, password).await?.print()
        }
    };
    Ok(())
}

/// Loads the config and performs the once-per-session auto-deposit catch-up.
async fn session(home: &Path) -> Result<Config> {
    let mut config = Config::load(home).await?;
    let outcome = commands::catch_up(&mut config).await?;
    if outcome.ran() {
        info!(
            "Monthly auto-deposits have been processed: {} deposit(s)",
            outcome.deposits().len()
        );
    }
    Ok(config)
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
