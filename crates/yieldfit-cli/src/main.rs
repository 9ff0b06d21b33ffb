//! Yieldfit CLI - bond yields and yield curve fitting from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Yield to maturity of a single bond
//! yieldfit ytm --coupon 4.5 --maturity 2013-03-07 --price 101.96 --settlement 2012-09-19
//!
//! # Fit the default set of curves to a bond price table
//! yieldfit fit --data data/gilt_bond_prices.txt --settlement 2012-09-19
//!
//! # Nelson-Siegel only, queried at two dates, as JSON
//! yieldfit --format json fit --data prices.csv --settlement 2012-09-19 \
//!     --model nelson-siegel --query 2020-09-19 --query 2030-09-19
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod data;
mod error;
mod output;
mod run_config;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table/JSON/CSV output on stdout stays clean
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Ytm(args) => commands::ytm::execute(args, format)?,
        Commands::Fit(args) => commands::fit::execute(args, format)?,
    }

    Ok(())
}
