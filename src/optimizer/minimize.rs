use super::{Minimizer, Optimizer, Phase};
use crate::callback::{Callback, Decision};
use crate::error::{Error, Result};
use crate::objective::Objective;
use crate::result::OptimizeResult;
use crate::space::{InitialPoints, Space, Value};
use crate::surrogate::{BaseEstimator, SurrogateKind};

/// Drives `optimizer` to completion.
///
/// Every callback sees every evaluation. A stop request during the
/// warm-start phase takes effect once the `x0` points are all evaluated.
pub(super) fn drive<O>(
    mut optimizer: Optimizer,
    callbacks: &mut [&mut dyn Callback],
    objective: &mut O,
) -> Result<OptimizeResult>
where
    O: Objective + ?Sized,
{
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "minimize",
        n_calls = optimizer.n_calls(),
        estimator = optimizer.estimator_name()
    )
    .entered();

    let mut stop_requested = false;
    while !optimizer.phase().is_terminal() {
        let x = optimizer.ask()?;
        for callback in callbacks.iter_mut() {
            callback.before_evaluation(optimizer.result());
        }
        let y = objective
            .evaluate(&x)
            .map_err(|e| Error::Objective(e.to_string()))?;
        optimizer.tell(x, y)?;

        let result = optimizer.result();
        let decision = Decision::combine(callbacks.iter_mut().map(|c| c.after_evaluation(result)));
        if decision.is_stop() && !stop_requested {
            trace_info!(iteration = result.len(), "callback requested stop");
            stop_requested = true;
        }
        if stop_requested && !matches!(optimizer.phase(), Phase::WarmStart | Phase::Done) {
            optimizer.stop();
        }
    }

    trace_info!(
        n_evaluations = optimizer.result().len(),
        best = optimizer.result().fun,
        status = ?optimizer.result().status,
        "optimization finished"
    );
    Ok(optimizer.into_result())
}

/// Minimizes `objective` with the default surrogate (extra trees).
///
/// # Errors
///
/// See [`Minimizer::run`].
///
/// # Examples
///
/// ```
/// use smbo::minimize;
/// use smbo::space::Space;
///
/// let space = Space::from_bounds(&[(-2.0, 2.0)])?;
/// let result = minimize(space, 20, Some(0), &mut [], |x| {
///     Ok::<_, smbo::Error>(x[0].as_f64().unwrap_or_default().powi(2))
/// })?;
/// assert!(result.fun < 0.1);
/// # Ok::<(), smbo::Error>(())
/// ```
pub fn minimize<F, E>(
    space: Space,
    n_calls: usize,
    random_state: Option<u64>,
    callbacks: &mut [&mut dyn Callback],
    objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    run_with(
        Minimizer::new(space).n_calls(n_calls),
        random_state,
        callbacks,
        objective,
    )
}

/// Pure random search: every point is an independent uniform draw.
///
/// # Errors
///
/// See [`Minimizer::run`].
pub fn dummy_minimize<F, E>(
    space: Space,
    n_calls: usize,
    random_state: Option<u64>,
    callbacks: &mut [&mut dyn Callback],
    objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    run_with(
        Minimizer::new(space)
            .n_calls(n_calls)
            .n_random_starts(n_calls)
            .initial_points(InitialPoints::Random)
            .retain_models(false),
        random_state,
        callbacks,
        objective,
    )
}

/// Minimizes with a tree-ensemble surrogate (`"rf"`, `"et"` or a model).
///
/// # Errors
///
/// See [`Minimizer::run`].
pub fn forest_minimize<F, E>(
    space: Space,
    n_calls: usize,
    random_state: Option<u64>,
    base_estimator: impl Into<BaseEstimator>,
    callbacks: &mut [&mut dyn Callback],
    objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    run_with(
        Minimizer::new(space)
            .n_calls(n_calls)
            .base_estimator(base_estimator),
        random_state,
        callbacks,
        objective,
    )
}

/// Minimizes with gradient boosted quantile trees.
///
/// # Errors
///
/// See [`Minimizer::run`].
pub fn gbrt_minimize<F, E>(
    space: Space,
    n_calls: usize,
    random_state: Option<u64>,
    callbacks: &mut [&mut dyn Callback],
    objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    run_with(
        Minimizer::new(space)
            .n_calls(n_calls)
            .base_estimator(SurrogateKind::GradientBoostedQuantile),
        random_state,
        callbacks,
        objective,
    )
}

/// Minimizes with a Gaussian process surrogate and expected improvement.
///
/// Requires the **`gp`** feature.
///
/// # Errors
///
/// See [`Minimizer::run`].
#[cfg(feature = "gp")]
pub fn gp_minimize<F, E>(
    space: Space,
    n_calls: usize,
    random_state: Option<u64>,
    callbacks: &mut [&mut dyn Callback],
    objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    run_with(
        Minimizer::new(space)
            .n_calls(n_calls)
            .base_estimator(SurrogateKind::GaussianProcess)
            .acquisition(crate::acquisition::Acquisition::Ei { xi: 0.01 }),
        random_state,
        callbacks,
        objective,
    )
}

fn run_with<F, E>(
    minimizer: Minimizer<'_>,
    random_state: Option<u64>,
    callbacks: &mut [&mut dyn Callback],
    mut objective: F,
) -> Result<OptimizeResult>
where
    F: FnMut(&[Value]) -> core::result::Result<f64, E>,
    E: core::fmt::Display,
{
    let minimizer = match random_state {
        Some(seed) => minimizer.random_state(seed),
        None => minimizer,
    };
    drive(minimizer.build()?, callbacks, &mut objective)
}
