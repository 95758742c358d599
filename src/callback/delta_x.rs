use super::{Callback, Decision};
use crate::result::OptimizeResult;

/// Stops once the last two evaluated points are closer than `delta` under
/// [`Space::distance`](crate::space::Space::distance).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeltaXStopper {
    delta: f64,
}

impl DeltaXStopper {
    /// Creates the stopper.
    #[must_use]
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }
}

impl Callback for DeltaXStopper {
    fn after_evaluation(&mut self, result: &OptimizeResult) -> Decision {
        let [.., a, b] = result.x_iters.as_slice() else {
            return Decision::Undetermined;
        };
        match result.space.distance(a, b) {
            Ok(d) => Decision::from(d < self.delta),
            Err(_) => Decision::Undetermined,
        }
    }
}
