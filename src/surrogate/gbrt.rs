//! Gradient boosted quantile regression.
//!
//! [`GradientBoostingQuantileRegressor`] fits one boosted ensemble per
//! quantile (0.16, 0.5 and 0.84 by default). The median ensemble provides
//! the mean estimate and half the distance between the outer quantiles is
//! used as the uncertainty, which is roughly one standard deviation for a
//! normal predictive distribution.
//!
//! Each ensemble minimizes the pinball loss: every stage fits a shallow
//! tree to the sign of the residuals and then replaces each leaf value with
//! the `alpha`-quantile of the residuals that fall into it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::tree::{MaxFeatures, RegressionTree, Splitter, TreeParams};
use super::{Prediction, Surrogate, SurrogateKind};
use crate::error::{Error, Result};

/// Hyper-parameters of each boosted ensemble.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GbrtConfig {
    /// Boosting stages (default: 100).
    pub n_estimators: usize,
    /// Shrinkage applied to each stage (default: 0.1).
    pub learning_rate: f64,
    /// Depth of each stage tree (default: 3).
    pub max_depth: usize,
    /// Minimum samples required in a leaf node (default: 1).
    pub min_samples_leaf: usize,
    /// Fraction of rows drawn without replacement for each stage (default: 1.0).
    pub subsample: f64,
}

impl Default for GbrtConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 1,
            subsample: 1.0,
        }
    }
}

impl GbrtConfig {
    fn validate(&self) -> Result<()> {
        let reject = |name, reason: &str| {
            Err(Error::InvalidParameter {
                name,
                reason: reason.into(),
            })
        };
        if self.n_estimators == 0 {
            return reject("n_estimators", "must be positive");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return reject("learning_rate", "must be positive and finite");
        }
        if self.max_depth == 0 {
            return reject("max_depth", "must be positive");
        }
        if self.min_samples_leaf == 0 {
            return reject("min_samples_leaf", "must be positive");
        }
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return reject("subsample", "must be in (0, 1]");
        }
        Ok(())
    }
}

/// Boosted trees minimizing the pinball loss at a single quantile `alpha`.
#[derive(Clone, Debug)]
pub struct GradientBoostingRegressor {
    config: GbrtConfig,
    alpha: f64,
    seed: u64,
    init: f64,
    trees: Vec<RegressionTree>,
}

impl GradientBoostingRegressor {
    /// Creates an unfitted quantile regressor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `alpha` is outside `(0, 1)` or
    /// the configuration is invalid.
    pub fn new(alpha: f64, config: GbrtConfig) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                reason: format!("quantile {alpha} must be in (0, 1)"),
            });
        }
        config.validate()?;
        Ok(Self {
            config,
            alpha,
            seed: 0,
            init: 0.0,
            trees: Vec::new(),
        })
    }

    /// The quantile this regressor estimates.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fit on `(x, y)`. An empty data set leaves the model predicting zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `x` and `y` differ in length.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.trees.clear();
        self.init = 0.0;
        let n = y.len();
        if n == 0 {
            return Ok(());
        }

        let mut rng = fastrand::Rng::with_seed(self.seed);
        let params = TreeParams {
            max_depth: Some(self.config.max_depth),
            min_samples_split: 2,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: MaxFeatures::All,
            splitter: Splitter::Best,
        };
        let n_sub = ((self.config.subsample * n as f64).ceil() as usize).clamp(1, n);

        self.init = quantile(y.to_vec(), self.alpha);
        let mut raw = vec![self.init; n];
        let mut rows: Vec<usize> = (0..n).collect();

        for _ in 0..self.config.n_estimators {
            let gradient: Vec<f64> = y
                .iter()
                .zip(&raw)
                .map(|(yi, fi)| if yi > fi { self.alpha } else { self.alpha - 1.0 })
                .collect();

            if n_sub < n {
                rng.shuffle(&mut rows);
            }
            let sample = &rows[..n_sub];
            let mut tree = RegressionTree::fit(x, &gradient, sample, &params, &mut rng);

            // Pinball-loss line search: each leaf moves by the alpha-quantile
            // of the residuals it holds.
            let mut by_leaf: Vec<(usize, f64)> = sample
                .iter()
                .map(|&i| (tree.leaf_index(&x[i]), y[i] - raw[i]))
                .collect();
            by_leaf.sort_by(|a, b| a.0.cmp(&b.0));
            for group in by_leaf.chunk_by(|a, b| a.0 == b.0) {
                let residuals = group.iter().map(|&(_, r)| r).collect();
                tree.set_leaf_value(group[0].0, quantile(residuals, self.alpha));
            }

            for (fi, xi) in raw.iter_mut().zip(x) {
                *fi += self.config.learning_rate * tree.predict(xi);
            }
            self.trees.push(tree);
        }
        Ok(())
    }

    /// Predicted `alpha`-quantile at `x`.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.init
            + self.config.learning_rate * self.trees.iter().map(|t| t.predict(x)).sum::<f64>()
    }
}

/// Linearly interpolated quantile. `values` must be non-empty.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn quantile(mut values: Vec<f64>, alpha: f64) -> f64 {
    values.sort_by(f64::total_cmp);
    let pos = alpha * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    values[lo] + frac * (values[hi] - values[lo])
}

/// Default quantiles: median plus roughly one standard deviation on each side.
pub const DEFAULT_QUANTILES: [f64; 3] = [0.16, 0.5, 0.84];

/// Surrogate built from three quantile regressors.
///
/// # Examples
///
/// ```
/// use smbo::surrogate::{GradientBoostingQuantileRegressor, Surrogate};
///
/// let mut gbrt = GradientBoostingQuantileRegressor::new().seed(0);
/// let x: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i) / 29.0]).collect();
/// let y: Vec<f64> = x.iter().map(|r| 4.0 * r[0]).collect();
/// gbrt.fit(&x, &y)?;
///
/// let p = gbrt.predict(&[0.9]);
/// assert!((p.mean - 3.6).abs() < 0.5);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct GradientBoostingQuantileRegressor {
    low: GradientBoostingRegressor,
    median: GradientBoostingRegressor,
    high: GradientBoostingRegressor,
}

impl GradientBoostingQuantileRegressor {
    /// Creates the surrogate with the default [`GbrtConfig`] and quantiles.
    #[must_use]
    pub fn new() -> Self {
        let make = |alpha| GradientBoostingRegressor {
            config: GbrtConfig::default(),
            alpha,
            seed: 0,
            init: 0.0,
            trees: Vec::new(),
        };
        Self {
            low: make(DEFAULT_QUANTILES[0]),
            median: make(DEFAULT_QUANTILES[1]),
            high: make(DEFAULT_QUANTILES[2]),
        }
    }

    /// Creates the surrogate with custom quantiles `(low, median, high)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the quantiles are not strictly
    /// increasing inside `(0, 1)` or the configuration is invalid.
    pub fn with_config(config: GbrtConfig, quantiles: [f64; 3]) -> Result<Self> {
        if !(quantiles[0] < quantiles[1] && quantiles[1] < quantiles[2]) {
            return Err(Error::InvalidParameter {
                name: "quantiles",
                reason: format!("{quantiles:?} must be strictly increasing"),
            });
        }
        Ok(Self {
            low: GradientBoostingRegressor::new(quantiles[0], config.clone())?,
            median: GradientBoostingRegressor::new(quantiles[1], config.clone())?,
            high: GradientBoostingRegressor::new(quantiles[2], config)?,
        })
    }

    /// Sets the seed used by the next fit.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Predicted `(low, median, high)` quantiles at `x`.
    #[must_use]
    pub fn predict_quantiles(&self, x: &[f64]) -> [f64; 3] {
        [
            self.low.predict(x),
            self.median.predict(x),
            self.high.predict(x),
        ]
    }
}

impl Default for GradientBoostingQuantileRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Surrogate for GradientBoostingQuantileRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.low.fit(x, y)?;
        self.median.fit(x, y)?;
        self.high.fit(x, y)
    }

    fn predict(&self, x: &[f64]) -> Prediction {
        let [low, median, high] = self.predict_quantiles(x);
        Prediction {
            mean: median,
            std: (high - low).abs() / 2.0,
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.low.seed = seed;
        self.median.seed = seed.wrapping_add(1);
        self.high.seed = seed.wrapping_add(2);
    }

    fn name(&self) -> &str {
        SurrogateKind::GradientBoostedQuantile.as_str()
    }

    fn box_clone(&self) -> Box<dyn Surrogate> {
        Box::new(self.clone())
    }
}
