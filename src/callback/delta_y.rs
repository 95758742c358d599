use super::{Callback, Decision};
use crate::error::{Error, Result};
use crate::result::OptimizeResult;

/// Stops once the `n_best` lowest objective values are within `delta` of
/// each other.
///
/// With fewer than `n_best` observations the answer is
/// [`Decision::Undetermined`].
///
/// # Examples
///
/// ```
/// use smbo::callback::{Decision, DeltaYStopper};
///
/// let stopper = DeltaYStopper::new(0.2, 3)?;
/// assert_eq!(stopper.check(&[0.0, 0.1]), Decision::Undetermined);
/// assert_eq!(stopper.check(&[0.0, 0.1, 0.15]), Decision::Stop);
/// assert_eq!(stopper.check(&[0.0, 0.1, 0.25]), Decision::Continue);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaYStopper {
    delta: f64,
    n_best: usize,
}

impl DeltaYStopper {
    /// Creates the stopper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when `n_best` is zero or `delta`
    /// is negative or NaN.
    pub fn new(delta: f64, n_best: usize) -> Result<Self> {
        if n_best == 0 {
            return Err(Error::InvalidParameter {
                name: "n_best",
                reason: "at least one value must be compared".to_owned(),
            });
        }
        if delta.is_nan() || delta < 0.0 {
            return Err(Error::InvalidParameter {
                name: "delta",
                reason: format!("{delta} must be non-negative"),
            });
        }
        Ok(Self { delta, n_best })
    }

    /// Applies the criterion to a list of objective values.
    #[must_use]
    pub fn check(&self, func_vals: &[f64]) -> Decision {
        if func_vals.len() < self.n_best {
            return Decision::Undetermined;
        }
        let mut sorted = func_vals.to_vec();
        sorted.sort_by(f64::total_cmp);
        let spread = sorted[self.n_best - 1] - sorted[0];
        Decision::from(spread < self.delta)
    }
}

impl Default for DeltaYStopper {
    fn default() -> Self {
        Self {
            delta: 0.01,
            n_best: 5,
        }
    }
}

impl Callback for DeltaYStopper {
    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision {
        self.check(&result.func_vals)
    }
}
