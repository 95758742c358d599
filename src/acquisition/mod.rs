//! Acquisition functions and their maximization.
//!
//! Every [`Acquisition`] maps a surrogate [`Prediction`] to a score where
//! larger is better. [`AcquisitionOptimizer`] searches the space for the
//! highest-scoring candidate.
//!
//! | Function | Score | Parameter |
//! |----------|-------|-----------|
//! | [`Acquisition::Lcb`] | `-(mean - kappa * std)` | `kappa >= 0` (exploration weight) |
//! | [`Acquisition::Ei`] | expected improvement over `y_best - xi` | `xi >= 0` |
//! | [`Acquisition::Pi`] | probability of improving on `y_best - xi` | `xi >= 0` |

mod optimizer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use optimizer::AcquisitionOptimizer;

use crate::error::{Error, Result};
use crate::surrogate::Prediction;

/// Standard deviations below this are treated as zero.
const MIN_STD: f64 = 1e-12;

/// Scoring rule that trades predicted value against uncertainty.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Acquisition {
    /// Lower confidence bound, negated so that larger is better.
    Lcb {
        /// Weight of the uncertainty term.
        kappa: f64,
    },
    /// Expected improvement.
    Ei {
        /// Minimum improvement considered worthwhile.
        xi: f64,
    },
    /// Probability of improvement.
    Pi {
        /// Minimum improvement considered worthwhile.
        xi: f64,
    },
}

impl Default for Acquisition {
    fn default() -> Self {
        Self::Lcb { kappa: 1.5 }
    }
}

impl Acquisition {
    /// Checks that the parameter is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming `kappa` or `xi`.
    pub fn validate(&self) -> Result<()> {
        let (name, value) = match *self {
            Self::Lcb { kappa } => ("kappa", kappa),
            Self::Ei { xi } | Self::Pi { xi } => ("xi", xi),
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Error::InvalidParameter {
                name,
                reason: format!("{value} must be finite and non-negative"),
            })
        }
    }

    /// Scores a prediction. `y_best` is the lowest value observed so far
    /// (`f64::INFINITY` before any observation).
    ///
    /// # Examples
    ///
    /// ```
    /// use smbo::acquisition::Acquisition;
    /// use smbo::surrogate::Prediction;
    ///
    /// let lcb = Acquisition::Lcb { kappa: 2.0 };
    /// let certain = Prediction { mean: 1.0, std: 0.0 };
    /// let uncertain = Prediction { mean: 1.0, std: 0.5 };
    /// assert!(lcb.score(uncertain, 0.0) > lcb.score(certain, 0.0));
    /// ```
    #[must_use]
    pub fn score(&self, prediction: Prediction, y_best: f64) -> f64 {
        let Prediction { mean, std } = prediction;
        match *self {
            Self::Lcb { kappa } => -(mean - kappa * std),
            Self::Ei { xi } => {
                let improvement = y_best - xi - mean;
                if std < MIN_STD {
                    return improvement.max(0.0);
                }
                let z = improvement / std;
                (improvement * norm_cdf(z) + std * norm_pdf(z)).max(0.0)
            }
            Self::Pi { xi } => {
                let improvement = y_best - xi - mean;
                if std < MIN_STD {
                    return if improvement > 0.0 { 1.0 } else { 0.0 };
                }
                norm_cdf(improvement / std)
            }
        }
    }
}

/// Standard normal PDF.
fn norm_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF (Zelen and Severo polynomial approximation).
fn norm_cdf(x: f64) -> f64 {
    if x < -8.0 {
        return 0.0;
    }
    if x > 8.0 {
        return 1.0;
    }
    let t = 1.0 / (1.0 + 0.231_641_9 * x.abs());
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782 + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let upper = norm_pdf(x.abs()) * poly;
    if x >= 0.0 { 1.0 - upper } else { upper }
}
