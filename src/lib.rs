pub mod args;
mod auth;
pub mod commands;
mod config;
mod error;
mod ledger;
pub mod model;
pub mod report;
pub mod scheduler;
mod utils;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use ledger::Ledger;
pub use model::Amount;
