//! The search domain: an ordered list of [`Dimension`]s.
//!
//! A [`Space`] converts between points in user units ([`Point`], one
//! [`Value`] per dimension) and the flat `f64` vectors surrogate models are
//! trained on:
//!
//! | Dimension | Model input |
//! |-----------|-------------|
//! | [`Real`] | position in `[0, 1]` (in log space for [`Prior::LogUniform`]) |
//! | [`Integer`] | position in `[0, 1]` |
//! | [`Categorical`] | one-hot block, one column per label |
//!
//! # Examples
//!
//! ```
//! use smbo::space::{Dimension, Space, Value};
//!
//! let space = Space::new(vec![
//!     Dimension::real(-2.0, 2.0)?,
//!     Dimension::integer(1, 8)?,
//!     Dimension::categorical(["relu", "tanh"])?,
//! ])?;
//!
//! let point = vec![Value::Real(0.0), Value::Integer(8), Value::from("tanh")];
//! let encoded = space.transform(&point)?;
//! assert_eq!(encoded, vec![0.5, 1.0, 0.0, 1.0]);
//! assert_eq!(space.inverse_transform(&encoded)?, point);
//! # Ok::<(), smbo::Error>(())
//! ```

mod dimension;
mod initial;
mod value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use dimension::{Categorical, Dimension, Integer, Prior, Real};
pub use initial::InitialPoints;
pub use value::{Point, Value};

use crate::error::{Error, Result};

/// An ordered, immutable sequence of dimensions.
///
/// The empty space is allowed: it has exactly one point, the empty one.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Vec<Dimension>", into = "Vec<Dimension>")
)]
pub struct Space {
    dimensions: Vec<Dimension>,
    /// Start column of each dimension in the transformed vector.
    offsets: Vec<usize>,
    transformed_len: usize,
}

impl Space {
    /// Builds a space, re-validating every dimension.
    ///
    /// # Errors
    ///
    /// Returns the first dimension error ([`Error::InvalidBounds`],
    /// [`Error::EmptyCategories`], ...).
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        for dim in &dimensions {
            dim.validate()?;
        }
        let mut offsets = Vec::with_capacity(dimensions.len());
        let mut transformed_len = 0;
        for dim in &dimensions {
            offsets.push(transformed_len);
            transformed_len += dim.transformed_size();
        }
        Ok(Self {
            dimensions,
            offsets,
            transformed_len,
        })
    }

    /// The degenerate space with no dimensions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            dimensions: Vec::new(),
            offsets: Vec::new(),
            transformed_len: 0,
        }
    }

    /// Builds a space of uniform real dimensions from `(low, high)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] for any pair with `low >= high`.
    pub fn from_bounds(bounds: &[(f64, f64)]) -> Result<Self> {
        bounds
            .iter()
            .map(|&(low, high)| Dimension::real(low, high))
            .collect::<Result<Vec<_>>>()
            .and_then(Self::new)
    }

    /// Number of dimensions.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns `true` for the degenerate empty space.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// The dimensions, in order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Length of the vectors produced by [`transform`](Self::transform).
    #[must_use]
    pub fn transformed_n_dims(&self) -> usize {
        self.transformed_len
    }

    /// Checks that `point` has one in-domain value per dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] for a wrong number of values
    /// and [`Error::OutOfDomain`] naming the first offending dimension.
    pub fn validate_point(&self, point: &[Value]) -> Result<()> {
        if point.len() != self.dimensions.len() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions.len(),
                got: point.len(),
            });
        }
        for (i, (dim, value)) in self.dimensions.iter().zip(point).enumerate() {
            dim.check(i, value)?;
        }
        Ok(())
    }

    /// Returns `true` if `point` lies within the space.
    #[must_use]
    pub fn contains(&self, point: &[Value]) -> bool {
        self.validate_point(point).is_ok()
    }

    /// Encodes a point as model input.
    ///
    /// # Errors
    ///
    /// Fails like [`validate_point`](Self::validate_point).
    pub fn transform(&self, point: &[Value]) -> Result<Vec<f64>> {
        self.validate_point(point)?;
        let mut out = Vec::with_capacity(self.transformed_len);
        for (dim, value) in self.dimensions.iter().zip(point) {
            dim.transform_into(value, &mut out);
        }
        Ok(out)
    }

    /// Encodes several points.
    ///
    /// # Errors
    ///
    /// Fails on the first point outside the space.
    pub fn transform_many(&self, points: &[Point]) -> Result<Vec<Vec<f64>>> {
        points.iter().map(|p| self.transform(p)).collect()
    }

    /// Decodes a model-input vector, clipping each coordinate into its dimension.
    ///
    /// Categorical blocks decode to the label with the largest entry
    /// (first one on ties), so the result always lies in the space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] for a vector of the wrong length
    /// and [`Error::OutOfDomain`] for NaN entries.
    pub fn inverse_transform(&self, encoded: &[f64]) -> Result<Point> {
        if encoded.len() != self.transformed_len {
            return Err(Error::DimensionMismatch {
                expected: self.transformed_len,
                got: encoded.len(),
            });
        }
        if let Some(col) = encoded.iter().position(|v| v.is_nan()) {
            let dimension = self.offsets.iter().rposition(|&o| o <= col).unwrap_or(0);
            return Err(Error::OutOfDomain {
                dimension,
                reason: "encoded value is NaN".into(),
            });
        }
        Ok(self
            .dimensions
            .iter()
            .zip(&self.offsets)
            .map(|(dim, &start)| dim.inverse_transform(&encoded[start..start + dim.transformed_size()]))
            .collect())
    }

    /// Draws `n` independent uniform random points.
    pub fn sample(&self, n: usize, rng: &mut fastrand::Rng) -> Vec<Point> {
        (0..n)
            .map(|_| self.dimensions.iter().map(|d| d.sample(rng)).collect())
            .collect()
    }

    /// Distance between two points: summed absolute differences on numeric
    /// dimensions plus one per differing categorical label.
    ///
    /// # Errors
    ///
    /// Fails if either point lies outside the space.
    pub fn distance(&self, a: &[Value], b: &[Value]) -> Result<f64> {
        self.validate_point(a)?;
        self.validate_point(b)?;
        Ok(self
            .dimensions
            .iter()
            .zip(a.iter().zip(b))
            .map(|(dim, (x, y))| dim.distance(x, y))
            .sum())
    }

    /// Transformed-vector columns of the continuous dimensions.
    pub(crate) fn continuous_columns(&self) -> Vec<usize> {
        self.dimensions
            .iter()
            .zip(&self.offsets)
            .filter(|(dim, _)| dim.is_continuous())
            .map(|(_, &offset)| offset)
            .collect()
    }

    /// Maps one coordinate of `[0, 1)` per dimension onto a point.
    pub(crate) fn point_from_unit(&self, unit: &[f64]) -> Point {
        self.dimensions
            .iter()
            .zip(unit)
            .map(|(dim, &u)| dim.from_unit(u))
            .collect()
    }
}

impl TryFrom<Vec<Dimension>> for Space {
    type Error = Error;

    fn try_from(dimensions: Vec<Dimension>) -> Result<Self> {
        Self::new(dimensions)
    }
}

impl From<Space> for Vec<Dimension> {
    fn from(space: Space) -> Self {
        space.dimensions
    }
}
