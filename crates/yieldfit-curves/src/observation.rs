//! Maturity/yield observations.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// A market yield observed at a time to maturity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldObservation {
    /// Time to maturity in years.
    pub maturity: f64,
    /// Observed yield as a decimal (0.025 = 2.5%).
    pub yield_value: f64,
}

impl YieldObservation {
    /// Creates an observation.
    #[must_use]
    pub fn new(maturity: f64, yield_value: f64) -> Self {
        Self {
            maturity,
            yield_value,
        }
    }
}

/// Checks that there are at least `required` observations, all finite and
/// at non-negative maturities.
pub(crate) fn validate(observations: &[YieldObservation], required: usize) -> CurveResult<()> {
    if observations.len() < required {
        return Err(CurveError::insufficient_data(required, observations.len()));
    }
    if let Some(obs) = observations
        .iter()
        .find(|o| !o.maturity.is_finite() || o.maturity < 0.0)
    {
        return Err(CurveError::invalid_parameter(
            "maturity",
            format!("must be finite and non-negative, got {}", obs.maturity),
        ));
    }
    if let Some(obs) = observations.iter().find(|o| !o.yield_value.is_finite()) {
        return Err(CurveError::invalid_parameter(
            "yield",
            format!("non-finite yield at maturity {}", obs.maturity),
        ));
    }
    Ok(())
}

/// Smallest and largest maturity. Assumes a non-empty slice.
pub(crate) fn maturity_span(observations: &[YieldObservation]) -> (f64, f64) {
    observations.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), o| (lo.min(o.maturity), hi.max(o.maturity)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_counts_and_values() {
        let obs = vec![YieldObservation::new(1.0, 0.01), YieldObservation::new(2.0, 0.02)];
        assert!(validate(&obs, 2).is_ok());
        assert_eq!(validate(&obs, 3), Err(CurveError::insufficient_data(3, 2)));

        let bad = vec![YieldObservation::new(-1.0, 0.01)];
        assert!(matches!(
            validate(&bad, 1),
            Err(CurveError::InvalidParameter { .. })
        ));

        let bad = vec![YieldObservation::new(1.0, f64::NAN)];
        assert!(matches!(
            validate(&bad, 1),
            Err(CurveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_maturity_span() {
        let obs = vec![
            YieldObservation::new(5.0, 0.01),
            YieldObservation::new(0.5, 0.01),
            YieldObservation::new(30.0, 0.01),
        ];
        assert_eq!(maturity_span(&obs), (0.5, 30.0));
    }
}
