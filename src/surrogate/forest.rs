//! Tree-ensemble surrogates: random forests and extremely randomized trees.
//!
//! Both fit `n_estimators` regression trees and predict the mean of the
//! per-tree predictions. The uncertainty estimate is the standard deviation
//! across trees, so regions where the trees disagree look uncertain to the
//! acquisition function.
//!
//! | Model | Sample | Threshold |
//! |-------|--------|-----------|
//! | [`RandomForestRegressor`] | bootstrap | best midpoint |
//! | [`ExtraTreesRegressor`] | full data | uniform random |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::tree::{MaxFeatures, RegressionTree, Splitter, TreeParams};
use super::{Prediction, Surrogate, SurrogateKind};
use crate::error::{Error, Result};

/// Hyper-parameters shared by both forest surrogates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForestConfig {
    /// Number of trees (default: 100).
    pub n_estimators: usize,
    /// Maximum depth of each tree. `None` for unlimited (default: `None`).
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node (default: 2).
    pub min_samples_split: usize,
    /// Minimum samples required in a leaf node (default: 1).
    pub min_samples_leaf: usize,
    /// Features considered per split (default: all).
    pub max_features: MaxFeatures,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
        }
    }
}

impl ForestConfig {
    fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(Error::InvalidParameter {
                name: "n_estimators",
                reason: "must be positive".into(),
            });
        }
        if self.min_samples_leaf == 0 {
            return Err(Error::InvalidParameter {
                name: "min_samples_leaf",
                reason: "must be positive".into(),
            });
        }
        if let MaxFeatures::Fraction(f) = self.max_features
            && !(f > 0.0 && f <= 1.0)
        {
            return Err(Error::InvalidParameter {
                name: "max_features",
                reason: format!("fraction {f} must be in (0, 1]"),
            });
        }
        Ok(())
    }

    fn tree_params(&self, splitter: Splitter) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split.max(2),
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            splitter,
        }
    }
}

/// The ensemble both public forest types wrap.
#[derive(Clone, Debug)]
struct Forest {
    config: ForestConfig,
    bootstrap: bool,
    splitter: Splitter,
    seed: u64,
    trees: Vec<RegressionTree>,
}

impl Forest {
    fn new(config: ForestConfig, bootstrap: bool, splitter: Splitter, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bootstrap,
            splitter,
            seed,
            trees: Vec::new(),
        })
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.trees.clear();
        let n = x.len();
        if n == 0 {
            return Ok(());
        }

        let mut rng = fastrand::Rng::with_seed(self.seed);
        let params = self.config.tree_params(self.splitter);
        let all: Vec<usize> = (0..n).collect();
        self.trees = (0..self.config.n_estimators)
            .map(|_| {
                if self.bootstrap {
                    let sample: Vec<usize> = (0..n).map(|_| rng.usize(0..n)).collect();
                    RegressionTree::fit(x, y, &sample, &params, &mut rng)
                } else {
                    RegressionTree::fit(x, y, &all, &params, &mut rng)
                }
            })
            .collect();
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn predict(&self, x: &[f64]) -> Prediction {
        if self.trees.is_empty() {
            return Prediction::default();
        }
        let preds: Vec<f64> = self.trees.iter().map(|t| t.predict(x)).collect();
        let n = preds.len() as f64;
        let mean = preds.iter().sum::<f64>() / n;
        let var = preds.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        Prediction {
            mean,
            std: var.max(0.0).sqrt(),
        }
    }
}

macro_rules! forest_surrogate {
    ($name:ident, $kind:expr, $bootstrap:expr, $splitter:expr, $config:expr) => {
        impl $name {
            /// Creates the surrogate with its default configuration.
            #[must_use]
            pub fn new() -> Self {
                Self(Forest {
                    config: $config,
                    bootstrap: $bootstrap,
                    splitter: $splitter,
                    seed: 0,
                    trees: Vec::new(),
                })
            }

            /// Creates the surrogate with a custom configuration.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidParameter`] for a zero tree count,
            /// a zero leaf size or a `max_features` fraction outside `(0, 1]`.
            pub fn with_config(config: ForestConfig) -> Result<Self> {
                Forest::new(config, $bootstrap, $splitter, 0).map(Self)
            }

            /// Sets the seed used by the next fit.
            #[must_use]
            pub fn seed(mut self, seed: u64) -> Self {
                self.0.seed = seed;
                self
            }

            /// The configuration in use.
            #[must_use]
            pub fn config(&self) -> &ForestConfig {
                &self.0.config
            }

            /// Number of fitted trees (zero before the first fit with data).
            #[must_use]
            pub fn n_trees(&self) -> usize {
                self.0.trees.len()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Surrogate for $name {
            fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
                self.0.fit(x, y)
            }

            fn predict(&self, x: &[f64]) -> Prediction {
                self.0.predict(x)
            }

            fn reseed(&mut self, seed: u64) {
                self.0.seed = seed;
            }

            fn name(&self) -> &str {
                $kind.as_str()
            }

            fn box_clone(&self) -> Box<dyn Surrogate> {
                Box::new(self.clone())
            }
        }
    };
}

/// Random forest regressor: bootstrap samples, best-split trees.
///
/// [`RandomForestRegressor::new`] considers [`MaxFeatures::Sqrt`] features
/// per split and keeps at least 3 samples per leaf; every other setting is
/// the [`ForestConfig`] default.
///
/// # Examples
///
/// ```
/// use smbo::surrogate::{RandomForestRegressor, Surrogate};
///
/// let mut rf = RandomForestRegressor::new().seed(3);
/// let x: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i) / 19.0]).collect();
/// let y: Vec<f64> = x.iter().map(|r| (r[0] - 0.5).powi(2)).collect();
/// rf.fit(&x, &y)?;
///
/// let p = rf.predict(&[0.5]);
/// assert!(p.mean < 0.05);
/// assert!(p.std >= 0.0);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct RandomForestRegressor(Forest);

forest_surrogate!(
    RandomForestRegressor,
    SurrogateKind::RandomForest,
    true,
    Splitter::Best,
    ForestConfig {
        min_samples_leaf: 3,
        max_features: MaxFeatures::Sqrt,
        ..ForestConfig::default()
    }
);

/// Extremely randomized trees: full data, random thresholds.
///
/// # Examples
///
/// ```
/// use smbo::surrogate::{ExtraTreesRegressor, ForestConfig, Surrogate};
///
/// let config = ForestConfig {
///     n_estimators: 50,
///     ..ForestConfig::default()
/// };
/// let mut et = ExtraTreesRegressor::with_config(config)?.seed(1);
/// et.fit(&[vec![0.0], vec![1.0]], &[1.0, 3.0])?;
/// assert_eq!(et.n_trees(), 50);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct ExtraTreesRegressor(Forest);

forest_surrogate!(
    ExtraTreesRegressor,
    SurrogateKind::ExtraTrees,
    false,
    Splitter::Random,
    ForestConfig::default()
);

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(n: u32) -> (Vec<Vec<f64>>, Vec<f64>) {
        let x: Vec<Vec<f64>> = (0..n).map(|i| vec![f64::from(i) / f64::from(n - 1)]).collect();
        let y = x.iter().map(|r| (r[0] - 0.3).powi(2)).collect();
        (x, y)
    }

    #[test]
    fn unfitted_prediction_is_degenerate() {
        let rf = RandomForestRegressor::new();
        assert_eq!(rf.predict(&[0.5]), Prediction::default());
        let mut et = ExtraTreesRegressor::new();
        et.fit(&[], &[]).unwrap();
        assert_eq!(et.n_trees(), 0);
        assert_eq!(et.predict(&[0.5]), Prediction::default());
    }

    #[test]
    fn default_configs_differ_per_forest() {
        let rf = RandomForestRegressor::new();
        assert_eq!(rf.config().max_features, MaxFeatures::Sqrt);
        assert_eq!(rf.config().min_samples_leaf, 3);
        assert_eq!(ExtraTreesRegressor::new().config(), &ForestConfig::default());
    }

    #[test]
    fn single_observation_has_zero_spread() {
        for mut model in [
            Box::new(RandomForestRegressor::new()) as Box<dyn Surrogate>,
            Box::new(ExtraTreesRegressor::new()),
        ] {
            model.fit(&[vec![0.2]], &[4.0]).unwrap();
            let p = model.predict(&[0.9]);
            assert!((p.mean - 4.0).abs() < 1e-12);
            assert!(p.std.abs() < 1e-12);
        }
    }

    #[test]
    fn extra_trees_interpolate_training_points() {
        let (x, y) = quadratic(15);
        let mut et = ExtraTreesRegressor::new().seed(5);
        et.fit(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            let p = et.predict(xi);
            assert!((p.mean - yi).abs() < 1e-9);
            assert!(p.std < 1e-9);
        }
    }

    #[test]
    fn forest_uncertainty_grows_between_points() {
        let x = vec![vec![0.0], vec![0.1], vec![0.9], vec![1.0]];
        let y = vec![0.0, 0.0, 1.0, 1.0];
        let mut et = ExtraTreesRegressor::new().seed(2);
        et.fit(&x, &y).unwrap();
        assert!(et.predict(&[0.5]).std > et.predict(&[0.0]).std);
    }

    #[test]
    fn random_forest_tracks_the_minimum() {
        let (x, y) = quadratic(30);
        let mut rf = RandomForestRegressor::new().seed(9);
        rf.fit(&x, &y).unwrap();
        assert!(rf.predict(&[0.3]).mean < rf.predict(&[0.95]).mean);
    }

    #[test]
    fn same_seed_same_model() {
        let (x, y) = quadratic(12);
        let mut a = RandomForestRegressor::new().seed(4);
        let mut b = RandomForestRegressor::new().seed(4);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        for q in [0.05, 0.33, 0.71] {
            assert_eq!(a.predict(&[q]), b.predict(&[q]));
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let zero = ForestConfig {
            n_estimators: 0,
            ..ForestConfig::default()
        };
        assert!(matches!(
            RandomForestRegressor::with_config(zero),
            Err(Error::InvalidParameter {
                name: "n_estimators",
                ..
            })
        ));
        let frac = ForestConfig {
            max_features: MaxFeatures::Fraction(1.5),
            ..ForestConfig::default()
        };
        assert!(ExtraTreesRegressor::with_config(frac).is_err());
    }

    #[test]
    fn mismatched_lengths_fail() {
        let mut rf = RandomForestRegressor::new();
        assert!(matches!(
            rf.fit(&[vec![0.0]], &[1.0, 2.0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
