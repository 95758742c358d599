//! Point coordinates in user units.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single coordinate of a point, in the units of its dimension.
///
/// Categorical coordinates keep their original label; the one-hot
/// encoding used by surrogate models never leaks into user-facing points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A coordinate of a [`Real`](super::Real) dimension.
    Real(f64),
    /// A coordinate of an [`Integer`](super::Integer) dimension.
    Integer(i64),
    /// A label of a [`Categorical`](super::Categorical) dimension.
    Category(String),
}

/// A point of the search space: one [`Value`] per dimension, in order.
pub type Point = Vec<Value>;

impl Value {
    /// Returns the numeric value of a real or integer coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            Self::Category(_) => None,
        }
    }

    /// Returns the value of an integer coordinate.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the label of a categorical coordinate.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Category(label) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Category(label) => write!(f, "{label:?}"),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(label: &str) -> Self {
        Self::Category(label.to_owned())
    }
}

impl From<String> for Value {
    fn from(label: String) -> Self {
        Self::Category(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Real(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Integer(3).as_i64(), Some(3));
        assert_eq!(Value::Real(3.0).as_i64(), None);
        assert_eq!(Value::from("a").as_str(), Some("a"));
        assert_eq!(Value::from("a").as_f64(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Value::Real(0.5).to_string(), "0.5");
        assert_eq!(Value::Integer(-2).to_string(), "-2");
        assert_eq!(Value::from("rbf").to_string(), "\"rbf\"");
    }
}
