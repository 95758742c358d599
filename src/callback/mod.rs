//! Hooks invoked around every objective evaluation.
//!
//! A [`Callback`] sees the [`OptimizeResult`] after each evaluation and
//! returns a [`Decision`]. The run stops as soon as one callback answers
//! [`Decision::Stop`]; every callback is still invoked for that evaluation.
//! Closures of type `FnMut(&OptimizeResult) -> Decision` are callbacks too.
//!
//! | Callback | Stops when |
//! |----------|------------|
//! | [`TimerCallback`] | never (records durations) |
//! | [`DeltaYStopper`] | the `n_best` lowest values lie within `delta` |
//! | [`DeltaXStopper`] | the last two points are closer than `delta` |
//! | [`DeadlineStopper`] | the remaining time would not fit another slowest iteration |
//! | `VerboseCallback` | never (logs each evaluation, feature `tracing`) |
//!
//! # Examples
//!
//! ```
//! use smbo::callback::Decision;
//! use smbo::space::Space;
//! use smbo::{Minimizer, OptimizeResult, RunStatus};
//!
//! let mut below_one = |r: &OptimizeResult| Decision::from(r.fun < 1.0);
//! let result = Minimizer::new(Space::from_bounds(&[(-2.0, 2.0)])?)
//!     .n_calls(30)
//!     .random_state(0)
//!     .callback(&mut below_one)
//!     .run(|x| Ok::<_, smbo::Error>(x[0].as_f64().unwrap_or_default().powi(2)))?;
//! assert_eq!(result.status, RunStatus::Stopped);
//! assert!(result.fun < 1.0);
//! # Ok::<(), smbo::Error>(())
//! ```

mod deadline;
mod delta_x;
mod delta_y;
mod timer;
#[cfg(feature = "tracing")]
mod verbose;

pub use deadline::DeadlineStopper;
pub use delta_x::DeltaXStopper;
pub use delta_y::DeltaYStopper;
pub use timer::TimerCallback;
#[cfg(feature = "tracing")]
pub use verbose::VerboseCallback;

use crate::result::OptimizeResult;

/// What a callback wants the loop to do next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Decision {
    /// Keep going.
    Continue,
    /// Stop after this evaluation.
    Stop,
    /// No opinion, for example because there is not enough data yet.
    #[default]
    Undetermined,
}

impl Decision {
    /// Returns `true` for [`Decision::Stop`].
    #[must_use]
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }

    /// Merges the answers of several callbacks: any `Stop` wins, then any
    /// `Continue`, otherwise `Undetermined`.
    #[must_use]
    pub fn combine(decisions: impl IntoIterator<Item = Self>) -> Self {
        decisions
            .into_iter()
            .fold(Self::Undetermined, |acc, d| match (acc, d) {
                (Self::Stop, _) | (_, Self::Stop) => Self::Stop,
                (Self::Continue, _) | (_, Self::Continue) => Self::Continue,
                _ => Self::Undetermined,
            })
    }
}

/// `true` means stop.
impl From<bool> for Decision {
    fn from(stop: bool) -> Self {
        if stop { Self::Stop } else { Self::Continue }
    }
}

/// `None` means undetermined, `Some(true)` means stop.
impl From<Option<bool>> for Decision {
    fn from(stop: Option<bool>) -> Self {
        stop.map_or(Self::Undetermined, Self::from)
    }
}

/// Observer of an optimization run.
pub trait Callback {
    /// Called right before the objective is evaluated.
    fn before_evaluation(&mut self, _result: &OptimizeResult) {}

    /// Called after each evaluation has been recorded in `result`.
    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision;
}

impl<F> Callback for F
where
    F: FnMut(&OptimizeResult) -> Decision,
{
    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision {
        self(result)
    }
}
