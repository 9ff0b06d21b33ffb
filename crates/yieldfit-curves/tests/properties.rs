//! Property tests for the parametric curve shapes and linear fits.

use proptest::prelude::*;
use yieldfit_curves::models::{NelsonSiegelParameters, SvenssonParameters};
use yieldfit_curves::prelude::*;

fn beta() -> impl Strategy<Value = f64> {
    -0.1f64..0.1
}

fn tau() -> impl Strategy<Value = f64> {
    0.05f64..50.0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn nelson_siegel_limits(b1 in beta(), b2 in beta(), b3 in beta(), tau in tau()) {
        let p = NelsonSiegelParameters { beta1: b1, beta2: b2, beta3: b3, tau };

        prop_assert!((p.yield_at(1e-12) - (b1 + b2)).abs() < 1e-9);
        prop_assert!((p.yield_at(1e9) - b1).abs() < 1e-6);
    }

    #[test]
    fn nelson_siegel_is_finite_and_continuous(
        b1 in beta(), b2 in beta(), b3 in beta(), tau in tau(), t in 1e-6f64..100.0,
    ) {
        let p = NelsonSiegelParameters { beta1: b1, beta2: b2, beta3: b3, tau };
        let y = p.yield_at(t);
        prop_assert!(y.is_finite());
        // Loadings are bounded by one with slopes bounded by 1/τ
        prop_assert!((p.yield_at(t + 1e-7) - y).abs() < 1e-6 * (1.0 + 1.0 / tau));
    }

    #[test]
    fn svensson_limits(
        b1 in beta(), b2 in beta(), b3 in beta(), b4 in beta(), tau1 in tau(), tau2 in tau(),
    ) {
        let p = SvenssonParameters { beta1: b1, beta2: b2, beta3: b3, beta4: b4, tau1, tau2 };

        prop_assert!((p.yield_at(1e-12) - (b1 + b2)).abs() < 1e-9);
        prop_assert!((p.yield_at(1e9) - b1).abs() < 1e-6);
        prop_assert!(p.yield_at(7.5).is_finite());
    }

    #[test]
    fn flat_fit_is_the_mean(yields in prop::collection::vec(-0.01f64..0.08, 1..30)) {
        let observations: Vec<_> = yields
            .iter()
            .enumerate()
            .map(|(i, &y)| YieldObservation::new(0.5 * (i + 1) as f64, y))
            .collect();
        let mean = yields.iter().sum::<f64>() / yields.len() as f64;

        let mut model = CurveFitModel::polynomial(0);
        model.fit(&observations, &FitterConfig::default()).unwrap();
        prop_assert!((model.yield_at(3.3).unwrap() - mean).abs() < 1e-12);
    }
}
