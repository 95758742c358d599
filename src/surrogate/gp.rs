//! Gaussian process regression with a Matérn 5/2 kernel.
//!
//! Targets are standardized before fitting and predictions are mapped back
//! to the original scale. ARD lengthscales are set to the per-column
//! standard deviation of the training inputs. If the kernel matrix is not
//! positive definite the fit retries with a larger diagonal jitter; when
//! every attempt fails the model stays unfitted and predicts the training
//! mean and standard deviation everywhere.
//!
//! Requires the **`gp`** feature (adds the `nalgebra` dependency).

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, DVector, Dyn};

use super::{Prediction, Surrogate, SurrogateKind};
use crate::error::{Error, Result};

const SQRT_5: f64 = 2.236_067_977_499_79;

/// Settings for [`GaussianProcessRegressor`].
#[derive(Clone, Debug, PartialEq)]
pub struct GpConfig {
    /// Observation noise added to the kernel diagonal (default: 1e-6).
    pub noise_variance: f64,
    /// Lower clamp for the ARD lengthscales (default: 0.01).
    pub min_lengthscale: f64,
    /// Most recent observations used for fitting (default: 200).
    pub max_train_points: usize,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            noise_variance: 1e-6,
            min_lengthscale: 0.01,
            max_train_points: 200,
        }
    }
}

#[derive(Clone)]
struct Fitted {
    cholesky: Cholesky<f64, Dyn>,
    alpha: DVector<f64>,
    x_train: Vec<Vec<f64>>,
    lengthscales: Vec<f64>,
}

/// Gaussian process surrogate.
///
/// # Examples
///
/// ```
/// use smbo::surrogate::{GaussianProcessRegressor, Surrogate};
///
/// let mut gp = GaussianProcessRegressor::new();
/// gp.fit(&[vec![0.0], vec![0.5], vec![1.0]], &[1.0, 0.0, 1.0])?;
///
/// let at_data = gp.predict(&[0.5]);
/// assert!(at_data.mean.abs() < 1e-3);
/// assert!(gp.predict(&[0.25]).std > at_data.std);
/// # Ok::<(), smbo::Error>(())
/// ```
#[derive(Clone)]
pub struct GaussianProcessRegressor {
    config: GpConfig,
    y_mean: f64,
    y_std: f64,
    fitted: Option<Fitted>,
}

impl Default for GaussianProcessRegressor {
    fn default() -> Self {
        Self {
            config: GpConfig::default(),
            y_mean: 0.0,
            y_std: 1.0,
            fitted: None,
        }
    }
}

impl core::fmt::Debug for GaussianProcessRegressor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GaussianProcessRegressor")
            .field("config", &self.config)
            .field("fitted", &self.fitted.is_some())
            .finish_non_exhaustive()
    }
}

impl GaussianProcessRegressor {
    /// Creates an unfitted GP with the default [`GpConfig`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unfitted GP with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a negative noise variance,
    /// a non-positive minimum lengthscale or a zero training cap.
    pub fn with_config(config: GpConfig) -> Result<Self> {
        if !(config.noise_variance >= 0.0 && config.noise_variance.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "noise_variance",
                reason: "must be non-negative and finite".into(),
            });
        }
        if !(config.min_lengthscale > 0.0 && config.min_lengthscale.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "min_lengthscale",
                reason: "must be positive".into(),
            });
        }
        if config.max_train_points == 0 {
            return Err(Error::InvalidParameter {
                name: "max_train_points",
                reason: "must be positive".into(),
            });
        }
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Returns `true` once a fit produced a usable factorization.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }
}

/// `k(a, b) = (1 + √5 r + 5/3 r²) exp(-√5 r)` with unit signal variance.
fn matern52(a: &[f64], b: &[f64], lengthscales: &[f64]) -> f64 {
    let r_sq: f64 = a
        .iter()
        .zip(b)
        .zip(lengthscales)
        .map(|((x, y), l)| ((x - y) / l).powi(2))
        .sum();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

impl Surrogate for GaussianProcessRegressor {
    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.fitted = None;
        self.y_mean = 0.0;
        self.y_std = 1.0;
        let skip = y.len().saturating_sub(self.config.max_train_points);
        let (x, y) = (&x[skip..], &y[skip..]);
        let n = y.len();
        if n == 0 {
            return Ok(());
        }

        self.y_mean = y.iter().sum::<f64>() / n as f64;
        let y_var = if n > 1 {
            y.iter().map(|v| (v - self.y_mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            1.0
        };
        self.y_std = y_var.sqrt().max(1e-10);
        let y_std = DVector::from_iterator(n, y.iter().map(|v| (v - self.y_mean) / self.y_std));

        let d = x[0].len();
        let lengthscales: Vec<f64> = (0..d)
            .map(|j| {
                let mean = x.iter().map(|r| r[j]).sum::<f64>() / n as f64;
                let var = x.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n as f64;
                var.sqrt().max(self.config.min_lengthscale)
            })
            .collect();

        for jitter in [0.0, 1e-6, 1e-4, 1e-2] {
            let noise = self.config.noise_variance + jitter;
            let k = DMatrix::from_fn(n, n, |i, j| {
                let k = matern52(&x[i], &x[j], &lengthscales);
                if i == j { k + noise } else { k }
            });
            if let Some(cholesky) = Cholesky::new(k) {
                let alpha = cholesky.solve(&y_std);
                self.fitted = Some(Fitted {
                    cholesky,
                    alpha,
                    x_train: x.to_vec(),
                    lengthscales,
                });
                return Ok(());
            }
            trace_debug!(jitter, "GP kernel matrix not positive definite, retrying");
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> Prediction {
        let Some(fitted) = &self.fitted else {
            return Prediction {
                mean: self.y_mean,
                std: self.y_std,
            };
        };
        let k_star = DVector::from_fn(fitted.x_train.len(), |i, _| {
            matern52(x, &fitted.x_train[i], &fitted.lengthscales)
        });
        let mean = k_star.dot(&fitted.alpha);
        let v = fitted.cholesky.solve(&k_star);
        let var = (1.0 - k_star.dot(&v)).max(0.0);
        Prediction {
            mean: mean * self.y_std + self.y_mean,
            std: var.sqrt() * self.y_std,
        }
    }

    fn name(&self) -> &str {
        SurrogateKind::GaussianProcess.as_str()
    }

    fn box_clone(&self) -> Box<dyn Surrogate> {
        Box::new(self.clone())
    }
}
