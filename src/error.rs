/// Errors returned by the optimizer.
///
/// Variants fall into four families, reported by [`Error::kind`]:
/// configuration problems detected before the first evaluation, invalid
/// surrogate selections, values outside the search space, and failures of
/// the objective itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a numeric dimension has `low >= high` (or non-finite bounds).
    #[error("invalid bounds: low ({low}) must be strictly less than high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when a log-uniform dimension has a non-positive lower bound.
    #[error("invalid log bounds: low ({0}) must be positive for a log-uniform prior")]
    InvalidLogBounds(f64),

    /// Returned when a categorical dimension has no categories.
    #[error("categorical dimension requires at least one category")]
    EmptyCategories,

    /// Returned when a categorical dimension lists the same label twice.
    #[error("duplicate category label '{0}'")]
    DuplicateCategory(String),

    /// Returned when the evaluation budget is zero.
    #[error("n_calls must be positive")]
    ZeroCalls,

    /// Returned when more random starts are requested than the budget allows.
    #[error("n_random_starts ({n_random_starts}) must not exceed n_calls ({n_calls})")]
    TooManyRandomStarts {
        /// Requested number of random starts.
        n_random_starts: usize,
        /// Total evaluation budget.
        n_calls: usize,
    },

    /// Returned when the warm-start points alone exceed the budget.
    #[error("{n_initial} warm-start points do not fit in a budget of {n_calls} calls")]
    TooManyInitialPoints {
        /// Number of user supplied points.
        n_initial: usize,
        /// Total evaluation budget.
        n_calls: usize,
    },

    /// Returned when `y0` and `x0` have different lengths.
    #[error("y0 has {y0} values but x0 has {x0} points")]
    WarmStartLengthMismatch {
        /// Number of `x0` points.
        x0: usize,
        /// Number of `y0` values.
        y0: usize,
    },

    /// Returned when a tuning parameter is outside its valid range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned by `ask`/`tell` once every call of the budget is used.
    #[error("evaluation budget of {0} calls is exhausted")]
    BudgetExhausted(usize),

    /// Returned when a surrogate identifier is not recognized.
    #[error("Valid values for the base_estimator parameter are: {valid}; got \"{got}\"")]
    UnknownEstimator {
        /// The identifier that was supplied.
        got: String,
        /// Comma separated list of recognized identifiers.
        valid: String,
    },

    /// Returned when the supplied estimator cannot act as a surrogate.
    #[error(
        "The base_estimator parameter has to either be a string or a regressor instance \
         implementing fit and predict with uncertainty; got {found}"
    )]
    EstimatorCapability {
        /// Description of what was supplied instead.
        found: String,
    },

    /// Returned when a point lies outside the declared bounds or categories.
    #[error("value out of domain for dimension {dimension}: {reason}")]
    OutOfDomain {
        /// Index of the offending dimension.
        dimension: usize,
        /// Description of the violation.
        reason: String,
    },

    /// Returned when a point or vector has the wrong number of entries.
    #[error("dimension mismatch: expected {expected} entries, got {got}")]
    DimensionMismatch {
        /// The expected length.
        expected: usize,
        /// The actual length.
        got: usize,
    },

    /// Returned when an observation value is NaN.
    #[error("objective value at iteration {0} is NaN")]
    NanObjective(usize),

    /// Returned when the objective function fails; the run is aborted.
    #[error("objective failed: {0}")]
    Objective(String),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad space, budget or start-count combination. Raised before any evaluation.
    Configuration,
    /// Unknown surrogate identifier or an estimator lacking the surrogate capability.
    InvalidEstimator,
    /// A point outside the search space was presented.
    Domain,
    /// The objective function failed.
    Objective,
}

impl Error {
    /// Returns the family this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBounds { .. }
            | Self::InvalidLogBounds(_)
            | Self::EmptyCategories
            | Self::DuplicateCategory(_)
            | Self::ZeroCalls
            | Self::TooManyRandomStarts { .. }
            | Self::TooManyInitialPoints { .. }
            | Self::WarmStartLengthMismatch { .. }
            | Self::InvalidParameter { .. }
            | Self::BudgetExhausted(_)
            | Self::Internal(_) => ErrorKind::Configuration,
            Self::UnknownEstimator { .. } | Self::EstimatorCapability { .. } => {
                ErrorKind::InvalidEstimator
            }
            Self::OutOfDomain { .. } | Self::DimensionMismatch { .. } | Self::NanObjective(_) => {
                ErrorKind::Domain
            }
            Self::Objective(_) => ErrorKind::Objective,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
