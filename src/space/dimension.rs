//! Search-space dimension types.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::error::{Error, Result};
use crate::rng_util;

/// How values of a [`Real`] dimension are spread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Prior {
    /// Uniform between the bounds.
    #[default]
    Uniform,
    /// Uniform in log space. Requires a positive lower bound.
    LogUniform,
}

/// A continuous dimension `[low, high]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Real {
    low: f64,
    high: f64,
    prior: Prior,
}

impl Real {
    /// Creates a uniform real dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless `low < high` and both are finite.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        Self::with_prior(low, high, Prior::Uniform)
    }

    /// Creates a log-uniform real dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless `low < high`, and
    /// [`Error::InvalidLogBounds`] if `low <= 0`.
    pub fn log_uniform(low: f64, high: f64) -> Result<Self> {
        Self::with_prior(low, high, Prior::LogUniform)
    }

    /// Creates a real dimension with an explicit prior.
    ///
    /// # Errors
    ///
    /// See [`Real::new`] and [`Real::log_uniform`].
    pub fn with_prior(low: f64, high: f64, prior: Prior) -> Result<Self> {
        let dim = Self { low, high, prior };
        dim.validate()?;
        Ok(dim)
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// The prior of this dimension.
    #[must_use]
    pub fn prior(&self) -> Prior {
        self.prior
    }

    fn validate(&self) -> Result<()> {
        if !(self.low.is_finite() && self.high.is_finite() && self.low < self.high) {
            return Err(Error::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        if self.prior == Prior::LogUniform && self.low <= 0.0 {
            return Err(Error::InvalidLogBounds(self.low));
        }
        Ok(())
    }

    fn warp(&self, v: f64) -> f64 {
        match self.prior {
            Prior::Uniform => v,
            Prior::LogUniform => v.ln(),
        }
    }

    fn unwarp(&self, v: f64) -> f64 {
        match self.prior {
            Prior::Uniform => v,
            Prior::LogUniform => v.exp(),
        }
    }

    fn to_unit(&self, v: f64) -> f64 {
        let (lo, hi) = (self.warp(self.low), self.warp(self.high));
        (self.warp(v) - lo) / (hi - lo)
    }

    fn from_unit(&self, u: f64) -> f64 {
        let (lo, hi) = (self.warp(self.low), self.warp(self.high));
        self.unwarp(lo + u.clamp(0.0, 1.0) * (hi - lo))
            .clamp(self.low, self.high)
    }
}

/// An integer dimension `{low, ..., high}`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Integer {
    low: i64,
    high: i64,
}

impl Integer {
    /// Creates an integer dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless `low < high`.
    pub fn new(low: i64, high: i64) -> Result<Self> {
        let dim = Self { low, high };
        dim.validate()?;
        Ok(dim)
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn low(&self) -> i64 {
        self.low
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn high(&self) -> i64 {
        self.high
    }

    #[allow(clippy::cast_precision_loss)]
    fn validate(&self) -> Result<()> {
        if self.low >= self.high {
            return Err(Error::InvalidBounds {
                low: self.low as f64,
                high: self.high as f64,
            });
        }
        Ok(())
    }

    /// Width of the range. Computed unsigned so `i64::MIN..=i64::MAX` fits.
    #[allow(clippy::cast_precision_loss)]
    fn span(&self) -> f64 {
        self.high.abs_diff(self.low) as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_unit(&self, v: i64) -> f64 {
        v.abs_diff(self.low) as f64 / self.span()
    }

    /// The value `offset` steps above `low`, saturating at `high`.
    fn offset(&self, offset: u64) -> i64 {
        self.low.saturating_add_unsigned(offset).min(self.high)
    }
}

/// A categorical dimension over an ordered set of labels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Categorical {
    labels: Vec<String>,
}

impl Categorical {
    /// Creates a categorical dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCategories`] for an empty label list and
    /// [`Error::DuplicateCategory`] if a label appears twice.
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dim = Self {
            labels: labels.into_iter().map(Into::into).collect(),
        };
        dim.validate()?;
        Ok(dim)
    }

    /// The labels, in declaration order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(Error::EmptyCategories);
        }
        let mut seen = HashSet::with_capacity(self.labels.len());
        for label in &self.labels {
            if !seen.insert(label.as_str()) {
                return Err(Error::DuplicateCategory(label.clone()));
            }
        }
        Ok(())
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

/// One axis of the search space.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimension {
    /// A continuous dimension.
    Real(Real),
    /// A discrete numeric dimension.
    Integer(Integer),
    /// A finite set of labels.
    Categorical(Categorical),
}

impl Dimension {
    /// Shorthand for `Dimension::Real(Real::new(low, high)?)`.
    ///
    /// # Errors
    ///
    /// See [`Real::new`].
    pub fn real(low: f64, high: f64) -> Result<Self> {
        Real::new(low, high).map(Self::Real)
    }

    /// Shorthand for `Dimension::Real(Real::log_uniform(low, high)?)`.
    ///
    /// # Errors
    ///
    /// See [`Real::log_uniform`].
    pub fn log_uniform(low: f64, high: f64) -> Result<Self> {
        Real::log_uniform(low, high).map(Self::Real)
    }

    /// Shorthand for `Dimension::Integer(Integer::new(low, high)?)`.
    ///
    /// # Errors
    ///
    /// See [`Integer::new`].
    pub fn integer(low: i64, high: i64) -> Result<Self> {
        Integer::new(low, high).map(Self::Integer)
    }

    /// Shorthand for `Dimension::Categorical(Categorical::new(labels)?)`.
    ///
    /// # Errors
    ///
    /// See [`Categorical::new`].
    pub fn categorical<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Categorical::new(labels).map(Self::Categorical)
    }

    /// Number of model-input columns this dimension occupies.
    #[must_use]
    pub fn transformed_size(&self) -> usize {
        match self {
            Self::Real(_) | Self::Integer(_) => 1,
            Self::Categorical(c) => c.labels.len(),
        }
    }

    /// Returns `true` for continuous dimensions.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Returns `true` if `value` has the right kind and lies within bounds.
    #[must_use]
    pub fn contains(&self, value: &Value) -> bool {
        self.check(0, value).is_ok()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::Real(d) => d.validate(),
            Self::Integer(d) => d.validate(),
            Self::Categorical(d) => d.validate(),
        }
    }

    pub(crate) fn check(&self, index: usize, value: &Value) -> Result<()> {
        let reason = match (self, value) {
            (Self::Real(d), Value::Real(v)) => {
                if v.is_finite() && (d.low..=d.high).contains(v) {
                    return Ok(());
                }
                format!("{v} is outside [{}, {}]", d.low, d.high)
            }
            (Self::Integer(d), Value::Integer(v)) => {
                if (d.low..=d.high).contains(v) {
                    return Ok(());
                }
                format!("{v} is outside [{}, {}]", d.low, d.high)
            }
            (Self::Categorical(d), Value::Category(label)) => {
                if d.index_of(label).is_some() {
                    return Ok(());
                }
                format!("unknown category {label:?}")
            }
            (_, other) => format!("{other} has the wrong kind for {}", self.kind_name()),
        };
        Err(Error::OutOfDomain {
            dimension: index,
            reason,
        })
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Real(_) => "a real dimension",
            Self::Integer(_) => "an integer dimension",
            Self::Categorical(_) => "a categorical dimension",
        }
    }

    /// Append the model-input encoding of an already checked `value`.
    pub(crate) fn transform_into(&self, value: &Value, out: &mut Vec<f64>) {
        match (self, value) {
            (Self::Real(d), Value::Real(v)) => out.push(d.to_unit(*v)),
            (Self::Integer(d), Value::Integer(v)) => out.push(d.to_unit(*v)),
            (Self::Categorical(d), Value::Category(label)) => {
                let hot = d.index_of(label);
                out.extend((0..d.labels.len()).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }));
            }
            _ => out.extend(core::iter::repeat_n(0.0, self.transformed_size())),
        }
    }

    /// Decode `encoded` (exactly `transformed_size()` entries), clipping into bounds.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn inverse_transform(&self, encoded: &[f64]) -> Value {
        match self {
            Self::Real(d) => Value::Real(d.from_unit(encoded[0])),
            Self::Integer(d) => {
                let steps = (encoded[0].clamp(0.0, 1.0) * d.span()).round() as u64;
                Value::Integer(d.offset(steps))
            }
            Self::Categorical(d) => {
                let mut best = 0;
                for (i, &v) in encoded.iter().enumerate() {
                    if v > encoded[best] {
                        best = i;
                    }
                }
                Value::Category(d.labels[best].clone())
            }
        }
    }

    /// Draw a uniform random value (log-uniform for log priors).
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Value {
        match self {
            Self::Real(d) => {
                let (lo, hi) = (d.warp(d.low), d.warp(d.high));
                Value::Real(d.unwarp(rng_util::f64_range(rng, lo, hi)).clamp(d.low, d.high))
            }
            Self::Integer(d) => Value::Integer(rng.i64(d.low..=d.high)),
            Self::Categorical(d) => Value::Category(d.labels[rng.usize(0..d.labels.len())].clone()),
        }
    }

    /// Maps a point of `[0, 1)` onto this dimension, one equal-width bin per
    /// discrete value.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub(crate) fn from_unit(&self, u: f64) -> Value {
        match self {
            Self::Real(d) => Value::Real(d.from_unit(u)),
            Self::Integer(d) => {
                let k = (u.clamp(0.0, 1.0) * (d.span() + 1.0)).floor() as u64;
                Value::Integer(d.offset(k))
            }
            Self::Categorical(d) => {
                let n = d.labels.len();
                let k = ((u.clamp(0.0, 1.0) * n as f64).floor() as usize).min(n - 1);
                Value::Category(d.labels[k].clone())
            }
        }
    }

    /// Distance between two checked values: absolute difference for numeric
    /// dimensions, 0/1 mismatch for categorical ones.
    pub(crate) fn distance(&self, a: &Value, b: &Value) -> f64 {
        match (a, b) {
            (Value::Category(x), Value::Category(y)) => {
                if x == y {
                    0.0
                } else {
                    1.0
                }
            }
            _ => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => (x - y).abs(),
                _ => 1.0,
            },
        }
    }
}

impl From<Real> for Dimension {
    fn from(d: Real) -> Self {
        Self::Real(d)
    }
}

impl From<Integer> for Dimension {
    fn from(d: Integer) -> Self {
        Self::Integer(d)
    }
}

impl From<Categorical> for Dimension {
    fn from(d: Categorical) -> Self {
        Self::Categorical(d)
    }
}
