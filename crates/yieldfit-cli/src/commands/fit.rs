//! Fit command implementation.
//!
//! Loads a bond price table, solves each bond's yield at mid price and fits
//! one or more curve models to the yields.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info};

use yieldfit_bonds::FixedBond;
use yieldfit_core::daycounts::DayCountConvention;
use yieldfit_core::{Date, Frequency};
use yieldfit_curves::config::{
    NelsonSiegelConfig, SvenssonConfig, DEFAULT_POLYNOMIAL_DEGREE, DEFAULT_SPLINE_DEGREE,
    DEFAULT_SPLINE_KNOTS,
};
use yieldfit_curves::{
    CurveConfig, CurveFitModel, CurveFitSpec, Extrapolation, FittedParameters, YieldCurve,
};

use crate::cli::{ModelKind, OutputFormat};
use crate::commands::{coupon_rate, parse_date, parse_day_count, parse_frequency};
use crate::data::{load_quotes, BondQuote};
use crate::error::{CliError, CliResult};
use crate::output::{
    format_bps, format_percent, print_header, print_json_value, print_output, print_warning,
};
use crate::run_config::RunConfig;

/// Arguments for the fit command.
#[derive(Args, Debug, Default)]
pub struct FitArgs {
    /// Bond price table with maturity, coupon, bid and ask columns
    #[arg(short, long)]
    pub data: PathBuf,

    /// Settlement date (YYYY-MM-DD or DD-Mon-YY)
    #[arg(short, long)]
    pub settlement: Option<String>,

    /// TOML run file with settlement, conventions, curve settings and models
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model to fit; repeat for several. Defaults to cubic and quintic
    /// polynomials, Nelson-Siegel, Svensson and a cubic B-spline
    #[arg(short, long, value_enum)]
    pub model: Vec<ModelKind>,

    /// Degree for polynomial fits
    #[arg(long)]
    pub degree: Option<usize>,

    /// Interior knots in years for B-spline fits, comma separated
    #[arg(long, value_delimiter = ',')]
    pub knots: Vec<f64>,

    /// Date to report interpolated yields at; repeat for several
    #[arg(short, long)]
    pub query: Vec<String>,

    /// Coupon frequency of the bonds (default semi-annual)
    #[arg(long)]
    pub frequency: Option<String>,

    /// Day count of the bonds (default ACT/ACT ICMA)
    #[arg(long)]
    pub day_count: Option<String>,

    /// Hold yields flat beyond the shortest and longest bonds
    #[arg(long)]
    pub flat_extrapolation: bool,
}

/// Everything a fit run needs once flags and run file are merged.
#[derive(Debug, Clone, PartialEq)]
struct FitPlan {
    settlement: Date,
    frequency: Frequency,
    day_count: DayCountConvention,
    curve: CurveConfig,
    specs: Vec<CurveFitSpec>,
    queries: Vec<Date>,
}

/// The five fits run when no model is requested.
fn default_specs() -> Vec<CurveFitSpec> {
    vec![
        CurveFitSpec::Polynomial { degree: 3 },
        CurveFitSpec::Polynomial { degree: 5 },
        CurveFitSpec::NelsonSiegel(NelsonSiegelConfig::default()),
        CurveFitSpec::NelsonSiegelSvensson(SvenssonConfig::default()),
        CurveFitSpec::BSpline {
            knots: DEFAULT_SPLINE_KNOTS.to_vec(),
            degree: DEFAULT_SPLINE_DEGREE,
        },
    ]
}

fn spec_for(kind: ModelKind, args: &FitArgs) -> CurveFitSpec {
    match kind {
        ModelKind::Polynomial => CurveFitSpec::Polynomial {
            degree: args.degree.unwrap_or(DEFAULT_POLYNOMIAL_DEGREE),
        },
        ModelKind::NelsonSiegel => CurveFitSpec::NelsonSiegel(NelsonSiegelConfig::default()),
        ModelKind::Svensson => CurveFitSpec::NelsonSiegelSvensson(SvenssonConfig::default()),
        ModelKind::Bspline => CurveFitSpec::BSpline {
            knots: if args.knots.is_empty() {
                DEFAULT_SPLINE_KNOTS.to_vec()
            } else {
                args.knots.clone()
            },
            degree: DEFAULT_SPLINE_DEGREE,
        },
    }
}

/// Merges flags over the run file. Flags win field by field.
fn plan(args: &FitArgs, run: RunConfig) -> CliResult<FitPlan> {
    let settlement = args
        .settlement
        .as_deref()
        .or(run.settlement.as_deref())
        .ok_or_else(|| CliError::MissingArgument("--settlement".to_string()))
        .and_then(parse_date)?;

    let frequency = match args.frequency.as_deref().or(run.frequency.as_deref()) {
        Some(s) => parse_frequency(s)?,
        None => Frequency::SemiAnnual,
    };
    let day_count = match args.day_count.as_deref().or(run.day_count.as_deref()) {
        Some(s) => parse_day_count(s)?,
        None => DayCountConvention::ActActIcma,
    };

    let mut curve = run.curve;
    if args.flat_extrapolation {
        curve = curve.with_extrapolation(Extrapolation::Flat);
    }

    let specs = if !args.model.is_empty() {
        args.model.iter().map(|&kind| spec_for(kind, args)).collect()
    } else if !run.models.is_empty() {
        run.models
    } else {
        default_specs()
    };

    let query_strings = if args.query.is_empty() { &run.queries } else { &args.query };
    let queries = query_strings
        .iter()
        .map(|q| parse_date(q))
        .collect::<CliResult<Vec<_>>>()?;
    if let Some(early) = queries.iter().find(|&&q| q <= settlement) {
        return Err(CliError::InvalidDate(format!(
            "{early} is not after settlement {settlement}"
        )));
    }

    Ok(FitPlan {
        settlement,
        frequency,
        day_count,
        curve,
        specs,
        queries,
    })
}

/// Builds the bonds and solves their mid-price yields.
///
/// Bonds maturing on or before settlement are skipped.
fn solve_yields(quotes: &[BondQuote], plan: &FitPlan) -> Result<(Vec<FixedBond>, Vec<f64>)> {
    let mut bonds = Vec::with_capacity(quotes.len());
    let mut yields = Vec::with_capacity(quotes.len());

    for quote in quotes {
        if quote.maturity <= plan.settlement {
            info!("skipping {}% {}: matured by settlement", quote.coupon, quote.maturity);
            continue;
        }

        let bond = FixedBond::builder()
            .identifier(format!("{}% {}", quote.coupon, quote.maturity))
            .coupon_rate(coupon_rate(quote.coupon)?)
            .maturity(quote.maturity)
            .frequency(plan.frequency)
            .day_count(plan.day_count)
            .build()?;

        let ytm = bond.yield_to_maturity(plan.settlement, quote.mid())?;
        debug!(
            iterations = ytm.iterations,
            "{}% {} at {}: yield {:.6}",
            quote.coupon,
            quote.maturity,
            quote.mid(),
            ytm.yield_value
        );

        bonds.push(bond);
        yields.push(ytm.yield_value);
    }

    Ok((bonds, yields))
}

/// Summary of one fitted model.
#[derive(Debug, Serialize, Tabled)]
struct FitRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Parameters")]
    parameters: String,
    #[tabled(rename = "RMS Error")]
    rms_error: String,
    #[tabled(rename = "Max Error")]
    max_error: String,
}

/// One interpolated yield.
#[derive(Debug, Serialize, Tabled)]
struct QueryRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Years")]
    years: String,
    #[tabled(rename = "Yield")]
    yield_value: String,
}

#[derive(Debug, Serialize)]
struct QueryYield {
    date: String,
    years: f64,
    yield_value: f64,
}

#[derive(Debug, Serialize)]
struct FitEntry {
    model: String,
    spec: CurveFitSpec,
    parameters: Option<FittedParameters>,
    rms_error: f64,
    max_abs_error: f64,
    queries: Vec<QueryYield>,
}

#[derive(Debug, Serialize)]
struct FitFailure {
    model: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct FitReport {
    settlement: String,
    bonds: usize,
    fits: Vec<FitEntry>,
    failures: Vec<FitFailure>,
}

fn describe(parameters: Option<&FittedParameters>) -> String {
    match parameters {
        None => String::new(),
        Some(FittedParameters::Polynomial(p)) => p
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| format!("a{i}={c:.6e}"))
            .collect::<Vec<_>>()
            .join(" "),
        Some(FittedParameters::NelsonSiegel(p)) => format!(
            "b1={:.6} b2={:.6} b3={:.6} tau={:.4}",
            p.beta1, p.beta2, p.beta3, p.tau
        ),
        Some(FittedParameters::NelsonSiegelSvensson(p)) => format!(
            "b1={:.6} b2={:.6} b3={:.6} b4={:.6} tau1={:.4} tau2={:.4}",
            p.beta1, p.beta2, p.beta3, p.beta4, p.tau1, p.tau2
        ),
        Some(FittedParameters::BSpline(p)) => p
            .coefficients
            .iter()
            .map(|c| format!("{c:.6}"))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn fit_one(
    spec: &CurveFitSpec,
    plan: &FitPlan,
    bonds: &[FixedBond],
    yields: &[f64],
) -> std::result::Result<YieldCurve, (String, String)> {
    let model = CurveFitModel::from_spec(spec).map_err(|e| (format!("{spec:?}"), e.to_string()))?;
    let label = model.to_string();
    YieldCurve::with_config(plan.settlement, bonds, yields, model, plan.curve)
        .map_err(|e| (label, e.to_string()))
}

fn entry_for(curve: &YieldCurve, queries: &[Date]) -> Result<FitEntry> {
    let queries = queries
        .iter()
        .map(|&date| -> Result<QueryYield> {
            Ok(QueryYield {
                date: date.to_string(),
                years: curve.time_to(date)?,
                yield_value: curve.interpolated_yield(date)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FitEntry {
        model: curve.model().to_string(),
        spec: curve.model().spec(),
        parameters: curve.model().parameters(),
        rms_error: curve.rms_error(),
        max_abs_error: curve.max_abs_error(),
        queries,
    })
}

/// Execute the fit command.
pub fn execute(args: FitArgs, format: OutputFormat) -> Result<()> {
    let run = match &args.config {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    let plan = plan(&args, run)?;

    let quotes = load_quotes(&args.data)?;
    info!("loaded {} bonds from {}", quotes.len(), args.data.display());

    let (bonds, yields) = solve_yields(&quotes, &plan)?;

    let mut report = FitReport {
        settlement: plan.settlement.to_string(),
        bonds: bonds.len(),
        fits: Vec::new(),
        failures: Vec::new(),
    };

    for spec in &plan.specs {
        match fit_one(spec, &plan, &bonds, &yields) {
            Ok(curve) => {
                info!(rms = curve.rms_error(), "fitted {}", curve.model());
                report.fits.push(entry_for(&curve, &plan.queries)?);
            }
            Err((model, error)) => {
                print_warning(&format!("{model}: {error}"));
                report.failures.push(FitFailure { model, error });
            }
        }
    }

    if report.fits.is_empty() {
        bail!("no model could be fitted to {} bonds", report.bonds);
    }

    render(&report, format)
}

fn render(report: &FitReport, format: OutputFormat) -> Result<()> {
    let fit_rows: Vec<FitRow> = report
        .fits
        .iter()
        .map(|fit| FitRow {
            model: fit.model.clone(),
            parameters: describe(fit.parameters.as_ref()),
            rms_error: format_bps(fit.rms_error),
            max_error: format_bps(fit.max_abs_error),
        })
        .collect();

    let query_rows: Vec<QueryRow> = report
        .fits
        .iter()
        .flat_map(|fit| {
            fit.queries.iter().map(|q| QueryRow {
                model: fit.model.clone(),
                date: q.date.clone(),
                years: format!("{:.4}", q.years),
                yield_value: format_percent(q.yield_value),
            })
        })
        .collect();

    match format {
        OutputFormat::Table => {
            print_header(&format!(
                "Curve fits to {} bonds, settlement {}",
                report.bonds, report.settlement
            ));
            print_output(&fit_rows, format)?;
            if !query_rows.is_empty() {
                print_header("Interpolated yields");
                print_output(&query_rows, format)?;
            }
        }
        OutputFormat::Json => print_json_value(report)?,
        OutputFormat::Csv => {
            print_output(&fit_rows, format)?;
            if !query_rows.is_empty() {
                println!();
                print_output(&query_rows, format)?;
            }
        }
        OutputFormat::Minimal => {
            // One number per line: queried yields if any, else RMS errors
            if query_rows.is_empty() {
                for fit in &report.fits {
                    println!("{:.10}", fit.rms_error);
                }
            } else {
                for q in report.fits.iter().flat_map(|fit| &fit.queries) {
                    println!("{:.10}", q.yield_value);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(settlement: Option<&str>) -> FitArgs {
        FitArgs {
            data: PathBuf::from("prices.csv"),
            settlement: settlement.map(str::to_string),
            ..FitArgs::default()
        }
    }

    #[test]
    fn test_default_plan_runs_five_fits() {
        let plan = plan(&args(Some("2012-09-19")), RunConfig::default()).unwrap();

        assert_eq!(plan.settlement, Date::from_ymd(2012, 9, 19).unwrap());
        assert_eq!(plan.frequency, Frequency::SemiAnnual);
        assert_eq!(plan.day_count, DayCountConvention::ActActIcma);
        assert_eq!(plan.specs, default_specs());
        assert!(plan.queries.is_empty());
    }

    #[test]
    fn test_settlement_is_required() {
        let err = plan(&args(None), RunConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::MissingArgument(_)));
    }

    #[test]
    fn test_flags_override_run_file() {
        let run = RunConfig {
            settlement: Some("01-Jan-12".to_string()),
            frequency: Some("annual".to_string()),
            models: vec![CurveFitSpec::Polynomial { degree: 2 }],
            queries: vec!["2020-01-01".to_string()],
            ..RunConfig::default()
        };
        let mut flags = args(Some("2012-09-19"));
        flags.model = vec![ModelKind::Polynomial, ModelKind::Bspline];
        flags.degree = Some(4);
        flags.knots = vec![2.0, 8.0];
        flags.flat_extrapolation = true;

        let plan = plan(&flags, run).unwrap();

        assert_eq!(plan.settlement, Date::from_ymd(2012, 9, 19).unwrap());
        assert_eq!(plan.frequency, Frequency::Annual);
        assert_eq!(plan.curve.extrapolation, Extrapolation::Flat);
        assert_eq!(
            plan.specs,
            vec![
                CurveFitSpec::Polynomial { degree: 4 },
                CurveFitSpec::BSpline {
                    knots: vec![2.0, 8.0],
                    degree: 3,
                },
            ]
        );
        assert_eq!(plan.queries, vec![Date::from_ymd(2020, 1, 1).unwrap()]);
    }

    #[test]
    fn test_queries_must_follow_settlement() {
        let mut flags = args(Some("2012-09-19"));
        flags.query = vec!["2012-09-19".to_string()];
        assert!(matches!(
            plan(&flags, RunConfig::default()),
            Err(CliError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_matured_bonds_are_skipped() {
        let plan = plan(&args(Some("2012-09-19")), RunConfig::default()).unwrap();
        let quotes = crate::data::parse_quotes(
            "maturity,coupon,bid,ask\n2012-03-07,4.5,100,100\n2022-03-07,4.0,110,110.2\n",
            "test",
        )
        .unwrap();

        let (bonds, yields) = solve_yields(&quotes, &plan).unwrap();

        assert_eq!(bonds.len(), 1);
        assert!(yields[0] > 0.0 && yields[0] < 0.04);
    }

    #[test]
    fn test_describe_nelson_siegel() {
        let text = describe(Some(&FittedParameters::NelsonSiegel(
            yieldfit_curves::models::NelsonSiegelParameters {
                beta1: 0.04,
                beta2: -0.02,
                beta3: 0.01,
                tau: 2.5,
            },
        )));
        assert_eq!(text, "b1=0.040000 b2=-0.020000 b3=0.010000 tau=2.5000");
    }
}
