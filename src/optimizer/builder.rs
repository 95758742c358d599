use std::collections::VecDeque;

use super::minimize::drive;
use super::{Optimizer, Phase};
use crate::acquisition::{Acquisition, AcquisitionOptimizer};
use crate::callback::Callback;
use crate::error::{Error, Result};
use crate::objective::Objective;
use crate::result::OptimizeResult;
use crate::space::{InitialPoints, Point, Space, Value};
use crate::surrogate::BaseEstimator;

/// Default evaluation budget.
const DEFAULT_N_CALLS: usize = 100;
/// Default size of the initial design.
const DEFAULT_N_RANDOM_STARTS: usize = 10;

/// A builder for an optimization run.
///
/// # Defaults
///
/// | Setting | Default |
/// |---------|---------|
/// | `n_calls` | 100 |
/// | `n_random_starts` | `min(10, n_calls)` |
/// | `base_estimator` | `"et"` ([`ExtraTreesRegressor`](crate::surrogate::ExtraTreesRegressor)) |
/// | `acquisition` | [`Acquisition::Lcb`] with `kappa = 1.5` |
/// | `n_points` | 2500 |
/// | `local_search` | `true` |
/// | `initial_points` | [`InitialPoints::Lhs`] |
/// | `retain_models` | `true` |
/// | `random_state` | unseeded |
///
/// `n_calls` counts observations, including any precomputed `y0` values.
/// `n_random_starts` includes the `x0` points: a run with three `x0` points
/// and `n_random_starts(5)` draws two random points.
///
/// # Examples
///
/// ```
/// use smbo::space::{Dimension, Space};
/// use smbo::surrogate::SurrogateKind;
/// use smbo::Minimizer;
///
/// let space = Space::new(vec![
///     Dimension::real(-2.0, 2.0)?,
///     Dimension::categorical(["a", "b"])?,
/// ])?;
/// let result = Minimizer::new(space)
///     .n_calls(15)
///     .n_random_starts(5)
///     .base_estimator(SurrogateKind::RandomForest)
///     .random_state(42)
///     .run(|x| {
///         let v = x[0].as_f64().unwrap_or_default();
///         let offset = if x[1].as_str() == Some("a") { 0.0 } else { 1.0 };
///         Ok::<_, smbo::Error>(v * v + offset)
///     })?;
/// assert_eq!(result.func_vals.len(), 15);
/// # Ok::<(), smbo::Error>(())
/// ```
pub struct Minimizer<'a> {
    space: Space,
    n_calls: usize,
    n_random_starts: Option<usize>,
    x0: Vec<Point>,
    y0: Vec<f64>,
    random_state: Option<u64>,
    base_estimator: BaseEstimator,
    acquisition: Acquisition,
    search: AcquisitionOptimizer,
    initial_points: InitialPoints,
    retain_models: bool,
    callbacks: Vec<&'a mut dyn Callback>,
}

impl<'a> Minimizer<'a> {
    /// Starts a run over `space` with default settings.
    #[must_use]
    pub fn new(space: Space) -> Self {
        Self {
            space,
            n_calls: DEFAULT_N_CALLS,
            n_random_starts: None,
            x0: Vec::new(),
            y0: Vec::new(),
            random_state: None,
            base_estimator: BaseEstimator::default(),
            acquisition: Acquisition::default(),
            search: AcquisitionOptimizer::default(),
            initial_points: InitialPoints::default(),
            retain_models: true,
            callbacks: Vec::new(),
        }
    }

    /// Sets the total number of observations.
    #[must_use]
    pub fn n_calls(mut self, n: usize) -> Self {
        self.n_calls = n;
        self
    }

    /// Sets the size of the initial design, `x0` points included.
    #[must_use]
    pub fn n_random_starts(mut self, n: usize) -> Self {
        self.n_random_starts = Some(n);
        self
    }

    /// Sets points to evaluate first.
    #[must_use]
    pub fn x0(mut self, points: Vec<Point>) -> Self {
        self.x0 = points;
        self
    }

    /// Sets known objective values for the `x0` points. They are recorded
    /// without calling the objective or the callbacks.
    #[must_use]
    pub fn y0(mut self, values: Vec<f64>) -> Self {
        self.y0 = values;
        self
    }

    /// Seeds the generator for a reproducible run.
    #[must_use]
    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Chooses the surrogate: an identifier, a [`SurrogateKind`] or a model.
    ///
    /// [`SurrogateKind`]: crate::surrogate::SurrogateKind
    #[must_use]
    pub fn base_estimator(mut self, estimator: impl Into<BaseEstimator>) -> Self {
        self.base_estimator = estimator.into();
        self
    }

    /// Sets the acquisition function.
    #[must_use]
    pub fn acquisition(mut self, acquisition: Acquisition) -> Self {
        self.acquisition = acquisition;
        self
    }

    /// Sets the number of random candidates scored per proposal.
    #[must_use]
    pub fn n_points(mut self, n: usize) -> Self {
        self.search.n_points = n;
        self
    }

    /// Enables or disables local refinement of the best candidate.
    #[must_use]
    pub fn local_search(mut self, enabled: bool) -> Self {
        self.search.local_search = enabled;
        self
    }

    /// Sets the design used for the random-start phase.
    #[must_use]
    pub fn initial_points(mut self, design: InitialPoints) -> Self {
        self.initial_points = design;
        self
    }

    /// Keeps every fitted surrogate in [`OptimizeResult::models`].
    #[must_use]
    pub fn retain_models(mut self, retain: bool) -> Self {
        self.retain_models = retain;
        self
    }

    /// Registers a callback. Callbacks run in registration order.
    #[must_use]
    pub fn callback(mut self, callback: &'a mut dyn Callback) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Validates the configuration and builds the state machine.
    ///
    /// Registered callbacks are only used by [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Checks, in order: the estimator ([`Error::UnknownEstimator`],
    /// [`Error::EstimatorCapability`]), the budget ([`Error::ZeroCalls`],
    /// [`Error::TooManyRandomStarts`], [`Error::TooManyInitialPoints`]),
    /// the warm start ([`Error::WarmStartLengthMismatch`], domain errors,
    /// [`Error::NanObjective`]) and the search settings
    /// ([`Error::InvalidParameter`]).
    pub fn build(self) -> Result<Optimizer> {
        self.into_parts().map(|(optimizer, _)| optimizer)
    }

    fn into_parts(self) -> Result<(Optimizer, Vec<&'a mut dyn Callback>)> {
        let estimator = self.base_estimator.resolve()?;

        let n_calls = self.n_calls;
        if n_calls == 0 {
            return Err(Error::ZeroCalls);
        }
        let n_random_starts = self
            .n_random_starts
            .unwrap_or_else(|| DEFAULT_N_RANDOM_STARTS.min(n_calls));
        if n_random_starts > n_calls {
            return Err(Error::TooManyRandomStarts {
                n_random_starts,
                n_calls,
            });
        }
        if self.x0.len() > n_calls {
            return Err(Error::TooManyInitialPoints {
                n_initial: self.x0.len(),
                n_calls,
            });
        }
        if !self.y0.is_empty() && self.y0.len() != self.x0.len() {
            return Err(Error::WarmStartLengthMismatch {
                x0: self.x0.len(),
                y0: self.y0.len(),
            });
        }
        for point in &self.x0 {
            self.space.validate_point(point)?;
        }
        if let Some(i) = self.y0.iter().position(|y| y.is_nan()) {
            return Err(Error::NanObjective(i));
        }
        self.acquisition.validate()?;
        self.search.validate()?;

        let mut rng = self
            .random_state
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        let n_initial = n_random_starts
            .saturating_sub(self.x0.len())
            .min(n_calls - self.x0.len());
        let initial: VecDeque<Point> = self
            .initial_points
            .generate(&self.space, n_initial, &mut rng)
            .into();

        let mut result = OptimizeResult::new(self.space, self.random_state);
        let warm_start = if self.y0.is_empty() {
            self.x0.into()
        } else {
            for (x, y) in self.x0.into_iter().zip(self.y0) {
                result.push(x, y)?;
            }
            VecDeque::new()
        };

        trace_info!(
            n_calls,
            n_random_starts,
            n_initial,
            estimator = estimator.name(),
            "optimizer configured"
        );

        let mut optimizer = Optimizer {
            n_calls,
            estimator,
            acquisition: self.acquisition,
            search: self.search,
            retain_models: self.retain_models,
            rng,
            warm_start,
            initial,
            pending: None,
            phase: Phase::WarmStart,
            result,
        };
        optimizer.advance();
        Ok((optimizer, self.callbacks))
    }

    /// Runs the optimization with a closure objective.
    ///
    /// # Errors
    ///
    /// Fails like [`build`](Self::build) before any evaluation, with
    /// [`Error::Objective`] if the objective fails and with
    /// [`Error::NanObjective`] if it returns NaN.
    pub fn run<F, E>(self, mut objective: F) -> Result<OptimizeResult>
    where
        F: FnMut(&[Value]) -> core::result::Result<f64, E>,
        E: core::fmt::Display,
    {
        self.run_objective(&mut objective)
    }

    /// Runs the optimization with any [`Objective`].
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_objective<O>(self, objective: &mut O) -> Result<OptimizeResult>
    where
        O: Objective + ?Sized,
    {
        let (optimizer, mut callbacks) = self.into_parts()?;
        drive(optimizer, &mut callbacks, objective)
    }
}

impl core::fmt::Debug for Minimizer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Minimizer")
            .field("space", &self.space)
            .field("n_calls", &self.n_calls)
            .field("n_random_starts", &self.n_random_starts)
            .field("base_estimator", &self.base_estimator)
            .field("acquisition", &self.acquisition)
            .field("n_callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}
