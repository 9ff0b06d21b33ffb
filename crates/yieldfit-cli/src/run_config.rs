//! TOML run files for `yieldfit fit`.
//!
//! ```toml
//! settlement = "2012-09-19"
//! frequency = "semi-annual"
//! day_count = "ACT/ACT ICMA"
//! queries = ["2020-09-19", "2030-09-19"]
//!
//! [curve]
//! extrapolation = "flat"
//!
//! [curve.fitter]
//! max_iterations = 200
//!
//! [[models]]
//! Polynomial = { degree = 3 }
//!
//! [[models]]
//! NelsonSiegel = { tau_bounds = [0.5, 30.0] }
//! ```
//!
//! Every field is optional. Command-line flags take precedence.

use std::path::Path;

use serde::Deserialize;
use yieldfit_curves::{CurveConfig, CurveFitSpec};

use crate::error::{CliError, CliResult};

/// Contents of a run file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Settlement date, ISO or DD-Mon-YY.
    pub settlement: Option<String>,
    /// Coupon frequency of every bond in the table.
    pub frequency: Option<String>,
    /// Day count of every bond in the table.
    pub day_count: Option<String>,
    /// Curve settings.
    pub curve: CurveConfig,
    /// Models to fit, in order.
    pub models: Vec<CurveFitSpec>,
    /// Dates at which to report interpolated yields.
    pub queries: Vec<String>,
}

impl RunConfig {
    /// Loads a run file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses run file contents.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yieldfit_curves::config::NelsonSiegelConfig;
    use yieldfit_curves::Extrapolation;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = RunConfig::from_toml("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.curve, CurveConfig::default());
    }

    #[test]
    fn test_full_run_file() {
        let config = RunConfig::from_toml(
            r#"
            settlement = "19-Sep-12"
            frequency = "annual"
            day_count = "30/360"
            queries = ["2020-09-19"]

            [curve]
            extrapolation = "flat"

            [curve.fitter]
            max_iterations = 200

            [[models]]
            Polynomial = { degree = 5 }

            [[models]]
            NelsonSiegel = { tau_bounds = [0.5, 30.0] }

            [[models]]
            BSpline = { knots = [2.0, 7.0] }
            "#,
        )
        .unwrap();

        assert_eq!(config.settlement.as_deref(), Some("19-Sep-12"));
        assert_eq!(config.queries, vec!["2020-09-19".to_string()]);
        assert_eq!(config.curve.extrapolation, Extrapolation::Flat);
        assert_eq!(config.curve.fitter.max_iterations, 200);
        assert_eq!(config.models.len(), 3);
        assert_eq!(config.models[0], CurveFitSpec::Polynomial { degree: 5 });
        assert_eq!(
            config.models[1],
            CurveFitSpec::NelsonSiegel(NelsonSiegelConfig {
                initial_tau: None,
                tau_bounds: (0.5, 30.0),
            })
        );
        assert_eq!(
            config.models[2],
            CurveFitSpec::BSpline {
                knots: vec![2.0, 7.0],
                degree: 3,
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(RunConfig::from_toml("settlment = \"2012-09-19\"").is_err());
    }
}
