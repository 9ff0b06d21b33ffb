//! Newton-Raphson safeguarded by bisection.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bracketed Newton-Raphson with a bisection fallback.
///
/// Keeps a bracket `[lo, hi]` with a sign change and shrinks it with every
/// function evaluation. Each iteration takes the Newton step when it lands
/// strictly inside the bracket; if the derivative is degenerate or the step
/// would leave the bracket, the iteration bisects instead.
///
/// Converges when `|f(x)| < config.tolerance`.
///
/// # Errors
///
/// - `MathError::InvalidBracket` if `f` has the same sign at both bounds
/// - `MathError::ConvergenceFailed` after `config.max_iterations`
///
/// # Example
///
/// ```rust
/// use yieldfit_math::solvers::{newton_bisection, SolverConfig};
///
/// // Newton from 0.0 on atan overshoots; the bracket keeps it stable.
/// let f = |x: f64| x.atan() - 1.0;
/// let df = |x: f64| 1.0 / (1.0 + x * x);
///
/// let result = newton_bisection(f, df, 0.0, (-10.0, 10.0), &SolverConfig::default()).unwrap();
/// assert!((result.root - 1.0_f64.tan()).abs() < 1e-8);
/// ```
pub fn newton_bisection<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bracket: (f64, f64),
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut lo = bracket.0.min(bracket.1);
    let mut hi = bracket.0.max(bracket.1);
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }
    if f_lo.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: f_lo,
        });
    }
    if f_hi.abs() < config.tolerance {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: f_hi,
        });
    }

    let mut x = if initial_guess > lo && initial_guess < hi {
        initial_guess
    } else {
        0.5 * (lo + hi)
    };
    let mut fx = f(x);

    for iteration in 0..config.max_iterations {
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if fx * f_lo < 0.0 {
            hi = x;
        } else {
            lo = x;
            f_lo = fx;
        }

        let dfx = df(x);
        let newton = x - fx / dfx;
        x = if dfx.abs() > f64::MIN_POSITIVE && newton.is_finite() && newton > lo && newton < hi
        {
            newton
        } else {
            trace!("newton step left [{lo}, {hi}], bisecting");
            0.5 * (lo + hi)
        };
        fx = f(x);
    }

    if fx.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x,
            iterations: config.max_iterations,
            residual: fx,
        });
    }

    Err(MathError::convergence_failed(config.max_iterations, fx))
}
