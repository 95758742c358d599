//! The [`Objective`] trait defines what gets minimized.
//!
//! Plain closures `FnMut(&[Value]) -> Result<f64, E>` are objectives through
//! a blanket impl and can be passed straight to
//! [`Minimizer::run`](crate::Minimizer::run). Implement the trait on a
//! struct when the objective carries state of its own and pass it to
//! [`Minimizer::run_objective`](crate::Minimizer::run_objective):
//!
//! ```
//! use smbo::space::{Space, Value};
//! use smbo::{Minimizer, Objective};
//!
//! struct CountingQuadratic {
//!     calls: usize,
//! }
//!
//! impl Objective for CountingQuadratic {
//!     type Error = smbo::Error;
//!
//!     fn evaluate(&mut self, x: &[Value]) -> Result<f64, Self::Error> {
//!         self.calls += 1;
//!         Ok(x[0].as_f64().unwrap_or_default().powi(2))
//!     }
//! }
//!
//! let mut objective = CountingQuadratic { calls: 0 };
//! let result = Minimizer::new(Space::from_bounds(&[(-1.0, 1.0)])?)
//!     .n_calls(12)
//!     .random_state(1)
//!     .run_objective(&mut objective)?;
//! assert_eq!(objective.calls, 12);
//! assert_eq!(result.func_vals.len(), 12);
//! # Ok::<(), smbo::Error>(())
//! ```

use core::fmt::Display;

use crate::space::Value;

/// A black-box function of one point in the search space.
///
/// An `Err` aborts the run immediately; its message is carried by
/// [`Error::Objective`](crate::Error::Objective).
pub trait Objective {
    /// The error type returned by [`evaluate`](Objective::evaluate).
    type Error: Display;

    /// Evaluate the objective at `x`, one value per dimension.
    ///
    /// # Errors
    ///
    /// Any error whose type implements `Display`.
    fn evaluate(&mut self, x: &[Value]) -> Result<f64, Self::Error>;
}

impl<F, E> Objective for F
where
    F: FnMut(&[Value]) -> Result<f64, E>,
    E: Display,
{
    type Error = E;

    fn evaluate(&mut self, x: &[Value]) -> Result<f64, E> {
        self(x)
    }
}
