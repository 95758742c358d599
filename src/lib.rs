#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Sequential model-based optimization of expensive black-box functions.
//!
//! Describe the domain as a [`Space`](space::Space), hand an objective to a
//! [`Minimizer`], and the crate alternates between evaluating the objective
//! and fitting a cheap surrogate model that decides where to look next.
//!
//! # Getting Started
//!
//! ```
//! use smbo::prelude::*;
//!
//! let space = Space::new(vec![Dimension::real(-5.0, 5.0)?])?;
//!
//! let result = Minimizer::new(space)
//!     .n_calls(25)
//!     .random_state(0)
//!     .run(|x: &[Value]| {
//!         let v = x[0].as_f64().unwrap_or_default();
//!         Ok::<_, Error>((v - 1.0).powi(2))
//!     })?;
//!
//! assert_eq!(result.func_vals.len(), 25);
//! println!("x = {:?}, f(x) = {:.4}", result.x, result.fun);
//! # Ok::<(), Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Space`](space::Space) | Ordered list of real, integer and categorical dimensions; maps points to model inputs. |
//! | [`Minimizer`] | Validates the configuration and runs the optimization loop. |
//! | [`Optimizer`] | The underlying state machine with an ask/tell interface. |
//! | [`Surrogate`](surrogate::Surrogate) | Regression model predicting mean and uncertainty of the objective. |
//! | [`Acquisition`](acquisition::Acquisition) | Turns predictions into a score to maximize (LCB, EI, PI). |
//! | [`Callback`](callback::Callback) | Observes each evaluation and may stop the run. |
//! | [`OptimizeResult`] | Every evaluated point and value, the best one and the fitted models. |
//!
//! # Surrogates
//!
//! | Name | Model | Feature flag |
//! |------|-------|--------------|
//! | `"rf"` | [`RandomForestRegressor`](surrogate::RandomForestRegressor) | — |
//! | `"et"` | [`ExtraTreesRegressor`](surrogate::ExtraTreesRegressor) (default) | — |
//! | `"gbrt"` | [`GradientBoostingQuantileRegressor`](surrogate::GradientBoostingQuantileRegressor) | — |
//! | `"gp"` | `GaussianProcessRegressor` | `gp` |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on spaces and results, `OptimizeResult::save`/`OptimizeResult::load` | off |
//! | `sobol` | [`InitialPoints::Sobol`](space::InitialPoints) initial designs | off |
//! | `gp` | Gaussian process surrogate and `gp_minimize` | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at phase changes and new best values | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod acquisition;
pub mod callback;
mod error;
mod objective;
mod optimizer;
mod result;
mod rng_util;
pub mod space;
pub mod surrogate;

pub use error::{Error, ErrorKind, Result};
pub use objective::Objective;
#[cfg(feature = "gp")]
pub use optimizer::gp_minimize;
pub use optimizer::{
    Minimizer, Optimizer, Phase, dummy_minimize, forest_minimize, gbrt_minimize, minimize,
};
pub use result::{OptimizeResult, RunStatus};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use smbo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::acquisition::{Acquisition, AcquisitionOptimizer};
    pub use crate::callback::{
        Callback, DeadlineStopper, Decision, DeltaXStopper, DeltaYStopper, TimerCallback,
    };
    #[cfg(feature = "tracing")]
    pub use crate::callback::VerboseCallback;
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::objective::Objective;
    #[cfg(feature = "gp")]
    pub use crate::optimizer::gp_minimize;
    pub use crate::optimizer::{
        Minimizer, Optimizer, Phase, dummy_minimize, forest_minimize, gbrt_minimize, minimize,
    };
    pub use crate::result::{OptimizeResult, RunStatus};
    pub use crate::space::{Dimension, InitialPoints, Point, Prior, Space, Value};
    pub use crate::surrogate::{BaseEstimator, Prediction, Surrogate, SurrogateKind};
}
