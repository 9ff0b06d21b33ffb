//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{FitArgs, YtmArgs};

/// Yieldfit - bond yields and yield curve fitting
#[derive(Parser)]
#[command(name = "yieldfit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Yield to maturity of a fixed coupon bond from its clean price
    Ytm(YtmArgs),

    /// Fit yield curves to a table of bond prices
    Fit(FitArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

/// Curve families selectable with `--model`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Polynomial in time to maturity (`--degree`, default 3)
    Polynomial,
    /// Nelson-Siegel
    NelsonSiegel,
    /// Nelson-Siegel-Svensson
    Svensson,
    /// Least squares cubic B-spline (`--knots`, default 1,3,5,10)
    Bspline,
}
