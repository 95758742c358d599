use super::Acquisition;
use crate::error::{Error, Result};
use crate::space::{Point, Space};
use crate::surrogate::Surrogate;

const INITIAL_STEP: f64 = 0.05;
const MIN_STEP: f64 = 1e-3;
const MAX_MOVES: usize = 1000;

/// Maximizes an acquisition function over a [`Space`].
///
/// A pool of `n_points` random candidates is scored and the best one (the
/// earliest on ties) is refined by a coordinate search over the continuous
/// dimensions in transformed space. Given the same generator state the
/// proposal is fully deterministic.
///
/// When every pool score is equal, as with an unfitted or degenerate model,
/// the first pool candidate is returned unchanged: a uniform random point.
///
/// # Examples
///
/// ```
/// use smbo::acquisition::{Acquisition, AcquisitionOptimizer};
/// use smbo::space::Space;
/// use smbo::surrogate::{ExtraTreesRegressor, Surrogate};
///
/// let space = Space::from_bounds(&[(-1.0, 1.0)])?;
/// let x = vec![vec![0.0], vec![0.5], vec![1.0]];
/// let mut model = ExtraTreesRegressor::new();
/// model.fit(&x, &[1.0, 0.0, 1.0])?;
///
/// let search = AcquisitionOptimizer::default();
/// let mut rng = fastrand::Rng::with_seed(0);
/// let next = search.propose(&model, &space, Acquisition::default(), 0.0, &mut rng)?;
/// assert!(space.contains(&next));
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcquisitionOptimizer {
    /// Random candidates scored per proposal (default: 2500).
    pub n_points: usize,
    /// Refine the best candidate on continuous dimensions (default: `true`).
    pub local_search: bool,
}

impl Default for AcquisitionOptimizer {
    fn default() -> Self {
        Self {
            n_points: 2500,
            local_search: true,
        }
    }
}

impl AcquisitionOptimizer {
    /// Checks that at least one candidate is sampled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when `n_points` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.n_points == 0 {
            return Err(Error::InvalidParameter {
                name: "n_points",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Proposes the next point to evaluate.
    ///
    /// `y_best` is the incumbent value used by improvement-based functions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for `n_points == 0`.
    pub fn propose(
        &self,
        model: &dyn Surrogate,
        space: &Space,
        acquisition: Acquisition,
        y_best: f64,
        rng: &mut fastrand::Rng,
    ) -> Result<Point> {
        self.validate()?;
        let pool = space.sample(self.n_points, rng);
        let encoded = space.transform_many(&pool)?;
        let score = |v: &[f64]| {
            let s = acquisition.score(model.predict(v), y_best);
            if s.is_nan() { f64::NEG_INFINITY } else { s }
        };

        let scores: Vec<f64> = encoded.iter().map(|v| score(v)).collect();
        let mut best = 0;
        for (i, &s) in scores.iter().enumerate().skip(1) {
            if s > scores[best] {
                best = i;
            }
        }
        let lowest = scores.iter().copied().fold(f64::INFINITY, f64::min);
        if scores[best] <= lowest {
            trace_debug!(n_points = self.n_points, "flat acquisition surface, exploring");
            return Ok(pool[0].clone());
        }

        let columns = space.continuous_columns();
        if !self.local_search || columns.is_empty() {
            return Ok(pool[best].clone());
        }

        let mut v = encoded[best].clone();
        let mut v_score = scores[best];
        let mut step = INITIAL_STEP;
        let mut moved = false;
        let mut moves = 0;
        while step >= MIN_STEP && moves < MAX_MOVES {
            let mut improved = false;
            for &c in &columns {
                for dir in [1.0, -1.0] {
                    if (dir > 0.0 && v[c] >= 1.0) || (dir < 0.0 && v[c] <= 0.0) {
                        continue;
                    }
                    let mut candidate = v.clone();
                    candidate[c] = (v[c] + dir * step).clamp(0.0, 1.0);
                    let s = score(&candidate);
                    if s > v_score {
                        v = candidate;
                        v_score = s;
                        improved = true;
                    }
                }
            }
            if improved {
                moved = true;
                moves += 1;
            } else {
                step /= 2.0;
            }
        }

        if moved {
            space.inverse_transform(&v)
        } else {
            Ok(pool[best].clone())
        }
    }
}
