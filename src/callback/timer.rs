use core::time::Duration;
use std::time::Instant;

use super::{Callback, Decision};
use crate::result::OptimizeResult;

/// Records the wall-clock duration of every evaluation.
///
/// The clock starts in [`before_evaluation`](Callback::before_evaluation)
/// and stops in [`after_evaluation`](Callback::after_evaluation). If the
/// loop skipped the start hook, the time since the previous evaluation (or
/// since construction) is recorded instead. Never stops the run.
///
/// # Examples
///
/// ```
/// use smbo::callback::TimerCallback;
/// use smbo::space::Space;
/// use smbo::dummy_minimize;
///
/// let mut timer = TimerCallback::new();
/// let space = Space::from_bounds(&[(-1.0, 1.0)])?;
/// dummy_minimize(space, 5, Some(0), &mut [&mut timer], |x| {
///     Ok::<_, smbo::Error>(x[0].as_f64().unwrap_or_default().abs())
/// })?;
/// assert_eq!(timer.iter_time().len(), 5);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct TimerCallback {
    started: Option<Instant>,
    last: Instant,
    iter_time: Vec<Duration>,
}

impl TimerCallback {
    /// Creates a timer with no recorded iterations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: None,
            last: Instant::now(),
            iter_time: Vec::new(),
        }
    }

    /// Duration of each evaluation, in order.
    #[must_use]
    pub fn iter_time(&self) -> &[Duration] {
        &self.iter_time
    }

    /// Durations in seconds.
    #[must_use]
    pub fn iter_time_secs(&self) -> Vec<f64> {
        self.iter_time.iter().map(Duration::as_secs_f64).collect()
    }

    /// Sum of all recorded durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.iter_time.iter().sum()
    }

    /// Longest recorded duration (zero before the first evaluation).
    #[must_use]
    pub fn slowest(&self) -> Duration {
        self.iter_time.iter().copied().max().unwrap_or_default()
    }
}

impl Default for TimerCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl Callback for TimerCallback {
    fn before_evaluation(&mut self, _result: &OptimizeResult) {
        self.started = Some(Instant::now());
    }

    fn after_evaluation(&mut self, _result: &OptimizeResult) -> Decision {
        let now = Instant::now();
        let start = self.started.take().unwrap_or(self.last);
        self.iter_time.push(now.duration_since(start));
        self.last = now;
        Decision::Undetermined
    }
}
