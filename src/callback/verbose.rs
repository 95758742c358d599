use super::{Callback, Decision};
use crate::result::OptimizeResult;

/// Emits one `tracing` info event per evaluation with the iteration index,
/// the value just observed and the incumbent.
///
/// Requires the **`tracing`** feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerboseCallback {
    n_init: usize,
}

impl VerboseCallback {
    /// Creates the callback. `n_init` evaluations are labelled as initial
    /// points in the log.
    #[must_use]
    pub fn new(n_init: usize) -> Self {
        Self { n_init }
    }
}

impl Callback for VerboseCallback {
    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision {
        let iteration = result.len();
        if let Some(&value) = result.func_vals.last() {
            tracing::info!(
                iteration,
                value,
                best = result.fun,
                initial = iteration <= self.n_init,
                "evaluation done"
            );
        }
        Decision::Undetermined
    }
}
