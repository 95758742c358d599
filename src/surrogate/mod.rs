//! Surrogate models of the objective.
//!
//! A [`Surrogate`] is trained on transformed points (see
//! [`Space::transform`](crate::space::Space::transform)) and predicts a mean
//! and a standard deviation for any candidate. The optimizer clones a fresh
//! model from its template at every step, so implementations only need to
//! support repeated `fit` calls on growing data.
//!
//! # Built-in models
//!
//! | Identifier | Model | Feature flag |
//! |------------|-------|--------------|
//! | `"rf"` | [`RandomForestRegressor`] | — |
//! | `"et"` | [`ExtraTreesRegressor`] | — |
//! | `"gbrt"` | [`GradientBoostingQuantileRegressor`] | — |
//! | `"gp"` | `GaussianProcessRegressor` | `gp` |
//!
//! # Custom models
//!
//! Any type implementing [`Surrogate`] can be passed as a
//! [`BaseEstimator`]. Models that report [`Task::Classification`] are
//! rejected because they cannot rank candidates by expected value.

mod forest;
mod gbrt;
#[cfg(feature = "gp")]
mod gp;
mod tree;

use core::any::Any;
use core::fmt;
use core::str::FromStr;

pub use forest::{ExtraTreesRegressor, ForestConfig, RandomForestRegressor};
pub use gbrt::{
    DEFAULT_QUANTILES, GbrtConfig, GradientBoostingQuantileRegressor, GradientBoostingRegressor,
};
#[cfg(feature = "gp")]
pub use gp::{GaussianProcessRegressor, GpConfig};
pub use tree::MaxFeatures;

use crate::error::{Error, Result};

/// Predicted mean and standard deviation of the objective at one point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Prediction {
    /// Expected objective value.
    pub mean: f64,
    /// Uncertainty of the estimate. Zero means the model is certain.
    pub std: f64,
}

/// What a model predicts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Task {
    /// Real-valued output with uncertainty.
    #[default]
    Regression,
    /// Class labels. Not usable as a surrogate.
    Classification,
}

/// A regressor that can estimate its own uncertainty.
pub trait Surrogate: Send + Sync + fmt::Debug {
    /// Fit on transformed points `x` and objective values `y`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are inconsistent (for example
    /// `x.len() != y.len()`).
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict at one transformed point. Unfitted models return a
    /// degenerate but well-defined prediction.
    fn predict(&self, x: &[f64]) -> Prediction;

    /// The kind of output this model produces.
    fn task(&self) -> Task {
        Task::Regression
    }

    /// Replace the seed used by subsequent fits. Deterministic models ignore it.
    fn reseed(&mut self, _seed: u64) {}

    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Clone into a new box.
    fn box_clone(&self) -> Box<dyn Surrogate>;
}

impl Clone for Box<dyn Surrogate> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Built-in surrogate identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurrogateKind {
    /// `"rf"`: [`RandomForestRegressor`].
    RandomForest,
    /// `"et"`: [`ExtraTreesRegressor`].
    ExtraTrees,
    /// `"gbrt"`: [`GradientBoostingQuantileRegressor`].
    GradientBoostedQuantile,
    /// `"gp"`: [`GaussianProcessRegressor`].
    #[cfg(feature = "gp")]
    GaussianProcess,
}

impl SurrogateKind {
    /// Every built-in kind, in identifier order.
    pub const ALL: &'static [Self] = &[
        Self::RandomForest,
        Self::ExtraTrees,
        Self::GradientBoostedQuantile,
        #[cfg(feature = "gp")]
        Self::GaussianProcess,
    ];

    /// The string identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RandomForest => "rf",
            Self::ExtraTrees => "et",
            Self::GradientBoostedQuantile => "gbrt",
            #[cfg(feature = "gp")]
            Self::GaussianProcess => "gp",
        }
    }

    /// A fresh, unfitted model of this kind.
    #[must_use]
    pub fn build(self) -> Box<dyn Surrogate> {
        match self {
            Self::RandomForest => Box::new(RandomForestRegressor::new()),
            Self::ExtraTrees => Box::new(ExtraTreesRegressor::new()),
            Self::GradientBoostedQuantile => Box::new(GradientBoostingQuantileRegressor::new()),
            #[cfg(feature = "gp")]
            Self::GaussianProcess => Box::new(GaussianProcessRegressor::new()),
        }
    }

    fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|k| format!("\"{}\"", k.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for SurrogateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurrogateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::UnknownEstimator {
                got: s.to_owned(),
                valid: Self::valid_list(),
            })
    }
}

/// The surrogate selection passed to the optimizer: an identifier or a model.
///
/// # Examples
///
/// ```
/// use smbo::surrogate::{BaseEstimator, RandomForestRegressor, SurrogateKind};
///
/// let by_name = BaseEstimator::from("rf");
/// let by_kind = BaseEstimator::from(SurrogateKind::RandomForest);
/// let by_model = BaseEstimator::model(RandomForestRegressor::new().seed(7));
///
/// for estimator in [by_name, by_kind, by_model] {
///     assert_eq!(estimator.resolve()?.name(), "rf");
/// }
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub enum BaseEstimator {
    /// A built-in kind.
    Kind(SurrogateKind),
    /// A string identifier, checked on [`resolve`](Self::resolve).
    Named(String),
    /// A user-supplied model.
    Model(Box<dyn Surrogate>),
}

impl BaseEstimator {
    /// Wraps a model.
    #[must_use]
    pub fn model(model: impl Surrogate + 'static) -> Self {
        Self::Model(Box::new(model))
    }

    /// Interprets a dynamically typed value as an estimator.
    ///
    /// Accepts `String`, `&'static str`, [`SurrogateKind`] and
    /// `Box<dyn Surrogate>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EstimatorCapability`] for any other type.
    pub fn from_any(value: Box<dyn Any>) -> Result<Self> {
        let value = match value.downcast::<String>() {
            Ok(s) => return Ok(Self::Named(*s)),
            Err(v) => v,
        };
        let value = match value.downcast::<&'static str>() {
            Ok(s) => return Ok(Self::Named((*s).to_owned())),
            Err(v) => v,
        };
        let value = match value.downcast::<SurrogateKind>() {
            Ok(k) => return Ok(Self::Kind(*k)),
            Err(v) => v,
        };
        match value.downcast::<Box<dyn Surrogate>>() {
            Ok(m) => Ok(Self::Model(*m)),
            Err(_) => Err(Error::EstimatorCapability {
                found: "a value that is neither an identifier nor a regressor".into(),
            }),
        }
    }

    /// Produces the model, validating identifiers and capabilities.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEstimator`] for an unrecognized identifier and
    /// [`Error::EstimatorCapability`] for a model that is not a regressor.
    pub fn resolve(self) -> Result<Box<dyn Surrogate>> {
        let model = match self {
            Self::Kind(kind) => kind.build(),
            Self::Named(name) => name.parse::<SurrogateKind>()?.build(),
            Self::Model(model) => model,
        };
        if model.task() != Task::Regression {
            return Err(Error::EstimatorCapability {
                found: format!("classifier \"{}\"", model.name()),
            });
        }
        Ok(model)
    }
}

impl Default for BaseEstimator {
    fn default() -> Self {
        Self::Kind(SurrogateKind::ExtraTrees)
    }
}

impl From<&str> for BaseEstimator {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for BaseEstimator {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<SurrogateKind> for BaseEstimator {
    fn from(kind: SurrogateKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<Box<dyn Surrogate>> for BaseEstimator {
    fn from(model: Box<dyn Surrogate>) -> Self {
        Self::Model(model)
    }
}
