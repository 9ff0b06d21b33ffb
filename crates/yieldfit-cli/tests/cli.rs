//! End-to-end tests of the `yieldfit` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const GILTS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/gilt_bond_prices.txt");

fn yieldfit() -> Command {
    Command::cargo_bin("yieldfit").unwrap()
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn ytm_table_lists_the_analytics() {
    yieldfit()
        .args([
            "ytm",
            "--coupon",
            "4.5",
            "--maturity",
            "07-Mar-13",
            "--price",
            "101.96",
            "--settlement",
            "2012-09-19",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yield to Maturity"))
        .stdout(predicate::str::contains("Accrued Interest"))
        .stdout(predicate::str::contains("Modified Duration"));
}

#[test]
fn ytm_of_a_par_bond_on_a_coupon_date_is_its_coupon() {
    let output = yieldfit()
        .args([
            "--format",
            "minimal",
            "ytm",
            "--coupon",
            "5",
            "--maturity",
            "2022-03-07",
            "--price",
            "100",
            "--settlement",
            "2012-03-07",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let ytm: f64 = String::from_utf8(output).unwrap().trim().parse().unwrap();
    assert!((ytm - 0.05).abs() < 1e-7);
}

#[test]
fn ytm_json_reports_full_price() {
    let report = json_stdout(yieldfit().args([
        "--format",
        "json",
        "ytm",
        "--coupon",
        "5",
        "--maturity",
        "2022-03-07",
        "--price",
        "100",
        "--settlement",
        "2012-03-07",
        "--frequency",
        "2",
    ]));

    let accrued = report["accrued_interest"].as_f64().unwrap();
    let full = report["full_price"].as_f64().unwrap();
    assert!(accrued.abs() < 1e-12);
    assert!((full - 100.0).abs() < 1e-6);
    assert!(report["modified_duration"].as_f64().unwrap() > 7.0);
}

#[test]
fn ytm_rejects_a_non_positive_price() {
    yieldfit()
        .args([
            "ytm",
            "--coupon",
            "5",
            "--maturity",
            "2022-03-07",
            "--price",
            "0",
            "--settlement",
            "2012-03-07",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid price"));
}

#[test]
fn fit_runs_the_five_default_models() {
    yieldfit()
        .args(["fit", "--data", GILTS, "--settlement", "2012-09-19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Polynomial (degree 3)"))
        .stdout(predicate::str::contains("Polynomial (degree 5)"))
        .stdout(predicate::str::contains("Nelson-Siegel"))
        .stdout(predicate::str::contains("Nelson-Siegel-Svensson"))
        .stdout(predicate::str::contains("B-Spline"));
}

#[test]
fn fit_json_reports_parameters_and_queries() {
    let report = json_stdout(yieldfit().args([
        "--format",
        "json",
        "fit",
        "--data",
        GILTS,
        "--settlement",
        "2012-09-19",
        "--query",
        "2030-09-19",
    ]));

    assert_eq!(report["bonds"].as_u64().unwrap(), 34);
    let fits = report["fits"].as_array().unwrap();
    assert_eq!(fits.len(), 5);
    assert!(report["failures"].as_array().unwrap().is_empty());

    let ns = fits.iter().find(|f| f["model"] == "Nelson-Siegel").unwrap();
    assert!(ns["rms_error"].as_f64().unwrap() < 0.0006);
    assert!(ns["parameters"]["NelsonSiegel"]["tau"].as_f64().unwrap() > 0.0);

    for fit in fits {
        let yield_2030 = fit["queries"][0]["yield_value"].as_f64().unwrap();
        assert!(yield_2030 > 0.02 && yield_2030 < 0.04, "{}: {yield_2030}", fit["model"]);
    }
}

#[test]
fn fit_selects_models_from_flags() {
    let report = json_stdout(yieldfit().args([
        "--format",
        "json",
        "fit",
        "--data",
        GILTS,
        "--settlement",
        "19-Sep-12",
        "--model",
        "polynomial",
        "--degree",
        "4",
        "--model",
        "bspline",
        "--knots",
        "2,5,10,20",
    ]));

    let fits = report["fits"].as_array().unwrap();
    assert_eq!(fits.len(), 2);
    assert_eq!(fits[0]["spec"]["Polynomial"]["degree"], 4);
    assert_eq!(fits[1]["spec"]["BSpline"]["knots"].as_array().unwrap().len(), 4);
}

#[test]
fn fit_reads_a_run_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"
settlement = "2012-09-19"
queries = ["2020-09-19"]

[curve]
extrapolation = "flat"

[[models]]
NelsonSiegelSvensson = {{}}
"#
    )
    .unwrap();

    let report = json_stdout(yieldfit().args([
        "--format",
        "json",
        "fit",
        "--data",
        GILTS,
        "--config",
        config.path().to_str().unwrap(),
    ]));

    let fits = report["fits"].as_array().unwrap();
    assert_eq!(fits.len(), 1);
    assert_eq!(fits[0]["model"], "Nelson-Siegel-Svensson");
    assert_eq!(fits[0]["queries"].as_array().unwrap().len(), 1);
}

#[test]
fn fit_accepts_comma_delimited_tables_and_prints_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    std::fs::write(
        &path,
        "maturity,coupon,bid,ask\n\
         2014-03-07,2.25,102.26,102.33\n\
         2016-09-07,4.00,109.88,109.94\n\
         2019-03-07,4.50,114.90,114.96\n\
         2022-03-07,4.00,113.48,113.54\n\
         2027-12-07,4.25,117.26,117.31\n\
         2032-06-07,4.25,118.46,118.51\n\
         2042-12-07,4.50,124.45,124.50\n",
    )
    .unwrap();

    yieldfit()
        .args([
            "--format",
            "csv",
            "fit",
            "--data",
            path.to_str().unwrap(),
            "--settlement",
            "2012-09-19",
            "--model",
            "nelson-siegel",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("model,parameters,rms_error,max_error"))
        .stdout(predicate::str::contains("Nelson-Siegel,b1="));
}

#[test]
fn fit_requires_a_settlement_date() {
    yieldfit()
        .args(["fit", "--data", GILTS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--settlement"));
}

#[test]
fn fit_fails_when_no_model_fits() {
    yieldfit()
        .args([
            "fit",
            "--data",
            GILTS,
            "--settlement",
            "2012-09-19",
            "--model",
            "bspline",
            "--knots",
            "60,70",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("B-Spline"))
        .stderr(predicate::str::contains("no model could be fitted"));
}
