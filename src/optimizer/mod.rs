//! The sequential optimization state machine.
//!
//! An [`Optimizer`] moves through the phases
//! `WarmStart → RandomSampling → ModelGuided → Done`, skipping phases with
//! nothing to do, and can be moved to `Stopped` from any sampling phase.
//! Configuration is validated when it is built, before any evaluation.
//!
//! The usual entry point is [`Minimizer::run`], which drives the machine
//! with an objective and callbacks. [`Optimizer::ask`] and
//! [`Optimizer::tell`] expose the same machine to callers that evaluate
//! the objective themselves:
//!
//! ```
//! use smbo::space::Space;
//! use smbo::{Minimizer, Phase};
//!
//! let mut opt = Minimizer::new(Space::from_bounds(&[(-2.0, 2.0)])?)
//!     .n_calls(8)
//!     .n_random_starts(3)
//!     .random_state(5)
//!     .build()?;
//!
//! while opt.phase() != Phase::Done {
//!     let x = opt.ask()?;
//!     let y = x[0].as_f64().unwrap_or_default().powi(2);
//!     opt.tell(x, y)?;
//! }
//! assert_eq!(opt.result().func_vals.len(), 8);
//! # Ok::<(), smbo::Error>(())
//! ```

mod builder;
mod minimize;

use std::collections::VecDeque;

pub use builder::Minimizer;
#[cfg(feature = "gp")]
pub use minimize::gp_minimize;
pub use minimize::{dummy_minimize, forest_minimize, gbrt_minimize, minimize};

use crate::acquisition::{Acquisition, AcquisitionOptimizer};
use crate::error::{Error, Result};
use crate::result::{OptimizeResult, RunStatus};
use crate::rng_util;
use crate::space::Point;
use crate::surrogate::Surrogate;

/// Where the optimizer is in its run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Evaluating user-supplied `x0` points.
    WarmStart,
    /// Evaluating the initial design.
    RandomSampling,
    /// Fitting the surrogate and maximizing the acquisition function.
    ModelGuided,
    /// The budget is used up.
    Done,
    /// A callback or [`Optimizer::stop`] ended the run early.
    Stopped,
}

impl Phase {
    /// Returns `true` for `Done` and `Stopped`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Stopped)
    }
}

/// Validated optimizer state.
///
/// Built by [`Minimizer::build`]. The generator seeded from
/// `random_state` is the only source of randomness.
#[derive(Debug)]
pub struct Optimizer {
    n_calls: usize,
    estimator: Box<dyn Surrogate>,
    acquisition: Acquisition,
    search: AcquisitionOptimizer,
    retain_models: bool,
    rng: fastrand::Rng,
    warm_start: VecDeque<Point>,
    initial: VecDeque<Point>,
    pending: Option<Point>,
    phase: Phase,
    result: OptimizeResult,
}

impl Optimizer {
    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The live result.
    #[must_use]
    pub fn result(&self) -> &OptimizeResult {
        &self.result
    }

    /// Consumes the optimizer, returning the result.
    #[must_use]
    pub fn into_result(self) -> OptimizeResult {
        self.result
    }

    /// Total number of observations allowed.
    #[must_use]
    pub fn n_calls(&self) -> usize {
        self.n_calls
    }

    /// Observations still allowed by the budget.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.n_calls.saturating_sub(self.result.len())
    }

    /// Identifier of the surrogate in use.
    #[must_use]
    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    /// The next point to evaluate.
    ///
    /// Repeated calls without a [`tell`](Self::tell) return the same point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BudgetExhausted`] once the run is over, and
    /// propagates surrogate fitting errors.
    pub fn ask(&mut self) -> Result<Point> {
        if let Some(point) = &self.pending {
            return Ok(point.clone());
        }
        let point = match self.phase {
            Phase::WarmStart => self.warm_start.front().cloned(),
            Phase::RandomSampling => self.initial.front().cloned(),
            Phase::ModelGuided => Some(self.propose()?),
            Phase::Done | Phase::Stopped => None,
        }
        .ok_or(Error::BudgetExhausted(self.n_calls))?;
        self.pending = Some(point.clone());
        Ok(point)
    }

    /// Records the value of a point.
    ///
    /// In the warm-start and random phases the told point takes the place
    /// of the next scheduled one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BudgetExhausted`] once the run is over, a domain
    /// error for a point outside the space and [`Error::NanObjective`] for
    /// a NaN value.
    pub fn tell(&mut self, x: Point, y: f64) -> Result<()> {
        if self.phase.is_terminal() {
            return Err(Error::BudgetExhausted(self.n_calls));
        }
        self.result.space.validate_point(&x)?;
        #[cfg(feature = "tracing")]
        let previous_best = self.result.fun;
        self.result.push(x, y)?;
        self.pending = None;
        match self.phase {
            Phase::WarmStart => {
                self.warm_start.pop_front();
            }
            Phase::RandomSampling => {
                self.initial.pop_front();
            }
            _ => {}
        }
        trace_debug!(iteration = self.result.len(), value = y, "observation recorded");
        #[cfg(feature = "tracing")]
        {
            if y < previous_best {
                tracing::info!(iteration = self.result.len(), value = y, "new best value found");
            }
        }
        self.advance();
        Ok(())
    }

    /// Ends the run early. The result is marked [`RunStatus::Stopped`]
    /// unless the budget was already used up.
    pub fn stop(&mut self) {
        if self.phase != Phase::Done {
            self.phase = Phase::Stopped;
            self.result.status = RunStatus::Stopped;
            self.pending = None;
        }
    }

    fn advance(&mut self) {
        let next = if self.result.len() >= self.n_calls {
            Phase::Done
        } else if !self.warm_start.is_empty() {
            Phase::WarmStart
        } else if !self.initial.is_empty() {
            Phase::RandomSampling
        } else {
            Phase::ModelGuided
        };
        if next != self.phase {
            trace_info!(from = ?self.phase, to = ?next, "phase changed");
            self.phase = next;
        }
    }

    /// Fits a fresh surrogate on the history and maximizes the acquisition.
    fn propose(&mut self) -> Result<Point> {
        let mut model = self.estimator.box_clone();
        model.reseed(rng_util::child_seed(&mut self.rng));
        let x = self.result.space.transform_many(&self.result.x_iters)?;
        model.fit(&x, &self.result.func_vals)?;
        let point = self.search.propose(
            model.as_ref(),
            &self.result.space,
            self.acquisition,
            self.result.fun,
            &mut self.rng,
        )?;
        if self.retain_models {
            self.result.models.push(model);
        }
        Ok(point)
    }
}
