//! PayXpert operator console.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Initialize logging, open the store once, and hand the services to the
//!   menu loop on stdin/stdout.

mod config;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use config::{AppConfig, Cli};
use log::info;
use payxpert_core::{init_logging, ConnectionProvider, PayrollServices, SqliteConnectionProvider};
use shell::Shell;
use std::io;

fn main() -> Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = AppConfig::resolve(Cli::parse(), &cwd)?;

    if let Some(logging) = &config.logging {
        init_logging(&logging.level, &logging.dir).context("initializing logging")?;
    }
    info!(
        "event=app_start module=cli status=ok version={}",
        payxpert_core::core_version()
    );

    let provider = SqliteConnectionProvider::new(config.db.clone());
    let conn = provider
        .get_connection()
        .context("opening the PayXpert database")?;
    let services = PayrollServices::new(&conn, &config.policy);

    let stdin = io::stdin();
    let stdout = io::stdout();
    Shell::new(&services, stdin.lock(), stdout.lock()).run()?;

    info!("event=app_exit module=cli status=ok");
    Ok(())
}
