use core::time::Duration;

use super::{Callback, Decision, TimerCallback};
use crate::result::OptimizeResult;

/// Stops when the time left before `total` is not larger than the slowest
/// evaluation so far.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use smbo::callback::DeadlineStopper;
/// use smbo::space::Space;
/// use smbo::{Minimizer, RunStatus};
///
/// let mut deadline = DeadlineStopper::new(Duration::from_millis(30));
/// let result = Minimizer::new(Space::from_bounds(&[(0.0, 1.0)])?)
///     .n_calls(100)
///     .n_random_starts(100)
///     .callback(&mut deadline)
///     .run(|x| {
///         std::thread::sleep(Duration::from_millis(5));
///         Ok::<_, smbo::Error>(x[0].as_f64().unwrap_or_default())
///     })?;
/// assert_eq!(result.status, RunStatus::Stopped);
/// assert!(result.func_vals.len() < 100);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DeadlineStopper {
    total: Duration,
    timer: TimerCallback,
}

impl DeadlineStopper {
    /// Creates a stopper for a budget of `total` wall-clock time.
    #[must_use]
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            timer: TimerCallback::new(),
        }
    }

    /// Durations recorded so far.
    #[must_use]
    pub fn iter_time(&self) -> &[Duration] {
        self.timer.iter_time()
    }

    /// Time left before the deadline (zero once it has passed).
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.timer.total())
    }
}

impl Callback for DeadlineStopper {
    fn before_evaluation(&mut self, result: &OptimizeResult) {
        self.timer.before_evaluation(result);
    }

    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision {
        self.timer.after_evaluation(result);
        Decision::from(self.remaining() <= self.timer.slowest())
    }
}
