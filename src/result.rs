use crate::error::{Error, Result};
use crate::space::{Point, Space, Value};
use crate::surrogate::{Prediction, Surrogate};

/// How a run ended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// Every call of the budget was used.
    #[default]
    Completed,
    /// A callback asked to stop before the budget was exhausted.
    Stopped,
}

/// Everything known about an optimization run.
///
/// The history is append-only: `x_iters[i]` was evaluated to
/// `func_vals[i]`, and `(x, fun)` is the first observation with the lowest
/// value. Before any observation `x` is empty and `fun` is infinite.
///
/// # Examples
///
/// ```
/// use smbo::space::{Space, Value};
/// use smbo::OptimizeResult;
///
/// let space = Space::from_bounds(&[(-1.0, 1.0)])?;
/// let result = OptimizeResult::from_observations(
///     space,
///     vec![vec![Value::Real(0.5)], vec![Value::Real(-0.1)]],
///     vec![0.25, 0.01],
/// )?;
/// assert_eq!(result.best_index(), Some(1));
/// assert_eq!(result.x, vec![Value::Real(-0.1)]);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizeResult {
    /// Best point found.
    pub x: Point,
    /// Objective value at `x`.
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "persist::infinity",
            skip_serializing_if = "persist::is_infinite"
        )
    )]
    pub fun: f64,
    /// Every evaluated point, in evaluation order.
    pub x_iters: Vec<Point>,
    /// Objective value of each point in `x_iters`.
    pub func_vals: Vec<f64>,
    /// Surrogates fitted during the model-guided phase, oldest first.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub models: Vec<Box<dyn Surrogate>>,
    /// The search space.
    pub space: Space,
    /// Seed of the run, if one was given.
    pub random_state: Option<u64>,
    /// How the run ended.
    pub status: RunStatus,
}

impl OptimizeResult {
    pub(crate) fn new(space: Space, random_state: Option<u64>) -> Self {
        Self {
            x: Vec::new(),
            fun: f64::INFINITY,
            x_iters: Vec::new(),
            func_vals: Vec::new(),
            models: Vec::new(),
            space,
            random_state,
            status: RunStatus::Completed,
        }
    }

    /// Builds a result from observations made elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ,
    /// a domain error for a point outside `space` and
    /// [`Error::NanObjective`] for a NaN value.
    pub fn from_observations(space: Space, x_iters: Vec<Point>, func_vals: Vec<f64>) -> Result<Self> {
        if x_iters.len() != func_vals.len() {
            return Err(Error::DimensionMismatch {
                expected: x_iters.len(),
                got: func_vals.len(),
            });
        }
        let mut result = Self::new(space, None);
        for (x, y) in x_iters.into_iter().zip(func_vals) {
            result.space.validate_point(&x)?;
            result.push(x, y)?;
        }
        Ok(result)
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.func_vals.len()
    }

    /// Returns `true` before the first observation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.func_vals.is_empty()
    }

    /// Index of the incumbent in the history (first one on ties).
    #[must_use]
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &y) in self.func_vals.iter().enumerate() {
            if best.is_none_or(|b| y < self.func_vals[b]) {
                best = Some(i);
            }
        }
        best
    }

    /// Predicts the objective at `point` with the most recent retained model.
    ///
    /// Returns `Ok(None)` when no model was retained.
    ///
    /// # Errors
    ///
    /// Fails if `point` lies outside the space.
    pub fn predict(&self, point: &[Value]) -> Result<Option<Prediction>> {
        let encoded = self.space.transform(point)?;
        Ok(self.models.last().map(|m| m.predict(&encoded)))
    }

    /// Appends an observation and updates the incumbent.
    pub(crate) fn push(&mut self, x: Point, y: f64) -> Result<()> {
        if y.is_nan() {
            return Err(Error::NanObjective(self.func_vals.len()));
        }
        if y < self.fun || self.func_vals.is_empty() {
            self.x.clone_from(&x);
            self.fun = y;
        }
        self.x_iters.push(x);
        self.func_vals.push(y);
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod persist {
    use std::path::Path;

    use super::OptimizeResult;

    pub(super) fn infinity() -> f64 {
        f64::INFINITY
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn is_infinite(v: &f64) -> bool {
        v.is_infinite()
    }

    #[derive(serde::Serialize)]
    struct SnapshotRef<'a> {
        version: u32,
        result: &'a OptimizeResult,
    }

    #[derive(serde::Deserialize)]
    struct Snapshot {
        version: u32,
        result: OptimizeResult,
    }

    impl OptimizeResult {
        /// Saves the result (without models) as JSON.
        ///
        /// The file is written to a temporary sibling and renamed into place.
        ///
        /// # Errors
        ///
        /// Returns an I/O error if the file cannot be created or written.
        pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
            let path = path.as_ref();
            let snapshot = SnapshotRef {
                version: 1,
                result: self,
            };
            let parent = path.parent().unwrap_or(Path::new("."));
            let tmp_path = parent.join(format!(
                ".{}.tmp",
                path.file_name().unwrap_or_default().to_string_lossy()
            ));
            let file = std::fs::File::create(&tmp_path)?;
            serde_json::to_writer_pretty(file, &snapshot).map_err(std::io::Error::other)?;
            std::fs::rename(&tmp_path, path)
        }

        /// Loads a result saved by [`save`](Self::save).
        ///
        /// The history is re-validated against the stored space and the
        /// incumbent is recomputed. `models` is empty.
        ///
        /// # Errors
        ///
        /// Returns an I/O error if the file cannot be read, parsed, or holds
        /// an inconsistent history.
        pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
            let invalid = |e: crate::Error| std::io::Error::new(std::io::ErrorKind::InvalidData, e);
            let file = std::fs::File::open(path)?;
            let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            if snapshot.version != 1 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("unsupported result version {}", snapshot.version),
                ));
            }
            let stored = snapshot.result;
            let mut result =
                Self::from_observations(stored.space, stored.x_iters, stored.func_vals)
                    .map_err(invalid)?;
            result.random_state = stored.random_state;
            result.status = stored.status;
            Ok(result)
        }
    }
}
