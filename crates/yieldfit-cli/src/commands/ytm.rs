//! Ytm command implementation.
//!
//! Solves the yield to maturity of one fixed coupon bond from its clean price.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use yieldfit_bonds::FixedBond;

use crate::cli::OutputFormat;
use crate::commands::{coupon_rate, parse_date, parse_day_count, parse_frequency, validate_price};
use crate::output::{format_percent, print_header, print_json_value, print_output, KeyValue};

/// Arguments for the ytm command.
#[derive(Args, Debug)]
pub struct YtmArgs {
    /// Annual coupon rate (as percentage, e.g., 4.5 for 4.5%)
    #[arg(short, long)]
    pub coupon: Decimal,

    /// Maturity date (YYYY-MM-DD or DD-Mon-YY)
    #[arg(short, long)]
    pub maturity: String,

    /// Clean price per 100 face
    #[arg(short, long)]
    pub price: Decimal,

    /// Settlement date (YYYY-MM-DD or DD-Mon-YY)
    #[arg(short, long)]
    pub settlement: String,

    /// Coupon frequency: annual, semi-annual, quarterly, monthly (or 1, 2, 4, 12)
    #[arg(long, default_value = "semi-annual")]
    pub frequency: String,

    /// Day count convention, e.g. "ACT/ACT ICMA", "ACT/365F", "30/360"
    #[arg(long, default_value = "ACT/ACT ICMA")]
    pub day_count: String,
}

/// Yield calculation result.
#[derive(Debug, Serialize)]
struct YtmReport {
    maturity: String,
    settlement: String,
    coupon_rate: Decimal,
    clean_price: Decimal,
    accrued_interest: Decimal,
    full_price: f64,
    yield_to_maturity: f64,
    modified_duration: f64,
    iterations: u32,
}

/// Execute the ytm command.
pub fn execute(args: YtmArgs, format: OutputFormat) -> Result<()> {
    let maturity = parse_date(&args.maturity)?;
    let settlement = parse_date(&args.settlement)?;
    let frequency = parse_frequency(&args.frequency)?;
    let day_count = parse_day_count(&args.day_count)?;
    let clean_price = validate_price(args.price)?;

    let bond = FixedBond::builder()
        .coupon_rate(coupon_rate(args.coupon)?)
        .maturity(maturity)
        .frequency(frequency)
        .day_count(day_count)
        .build()?;

    let ytm = bond.yield_to_maturity(settlement, clean_price)?;
    let duration = bond.modified_duration(settlement, ytm.yield_value)?;
    debug!(
        iterations = ytm.iterations,
        residual = ytm.residual,
        "solved yield for {}% {}",
        args.coupon,
        maturity
    );

    let report = YtmReport {
        maturity: maturity.to_string(),
        settlement: settlement.to_string(),
        coupon_rate: bond.coupon_rate(),
        clean_price,
        accrued_interest: ytm.accrued_interest,
        full_price: ytm.dirty_price,
        yield_to_maturity: ytm.yield_value,
        modified_duration: duration,
        iterations: ytm.iterations,
    };

    let rows = vec![
        KeyValue::new("Coupon", format!("{}%", args.coupon)),
        KeyValue::new("Maturity", report.maturity.clone()),
        KeyValue::new("Settlement", report.settlement.clone()),
        KeyValue::new("Frequency", frequency.to_string()),
        KeyValue::new("Day Count", day_count.to_string()),
        KeyValue::new("Clean Price", format!("{:.6}", report.clean_price)),
        KeyValue::new("Accrued Interest", format!("{:.6}", report.accrued_interest)),
        KeyValue::new("Full Price", format!("{:.6}", report.full_price)),
        KeyValue::new("Yield to Maturity", format_percent(report.yield_to_maturity)),
        KeyValue::new("Modified Duration", format!("{:.4}", report.modified_duration)),
    ];

    match format {
        OutputFormat::Table => {
            print_header("Yield to Maturity");
            print_output(&rows, format)?;
        }
        OutputFormat::Json => print_json_value(&report)?,
        OutputFormat::Csv => print_output(&rows, format)?,
        OutputFormat::Minimal => println!("{:.10}", report.yield_to_maturity),
    }

    Ok(())
}
