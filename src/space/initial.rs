//! Designs for the random-start phase.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Point, Space};

/// Strategy used to draw the `n_random_starts` initial points.
///
/// The default is [`InitialPoints::Lhs`], so every stratum of every
/// dimension is visited. When `n` is a multiple of a categorical dimension's
/// size, every category is drawn equally often.
///
/// | Variant | Coverage | Feature flag |
/// |---------|----------|--------------|
/// | `Random` | independent uniform draws | — |
/// | `Lhs` | Latin hypercube: every dimension is split into `n` equal strata and each stratum is hit once | — |
/// | `Sobol` | scrambled Sobol low-discrepancy sequence | `sobol` |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InitialPoints {
    /// Independent uniform random points.
    Random,
    /// Latin hypercube sampling.
    #[default]
    Lhs,
    /// Scrambled Sobol sequence (Burley 2020).
    #[cfg(feature = "sobol")]
    Sobol,
}

impl InitialPoints {
    /// Draw `n` points of `space`. Every random decision comes from `rng`.
    pub(crate) fn generate(self, space: &Space, n: usize, rng: &mut fastrand::Rng) -> Vec<Point> {
        match self {
            Self::Random => space.sample(n, rng),
            Self::Lhs => latin_hypercube(space, n, rng),
            #[cfg(feature = "sobol")]
            Self::Sobol => sobol(space, n, rng),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn latin_hypercube(space: &Space, n: usize, rng: &mut fastrand::Rng) -> Vec<Point> {
    if n == 0 {
        return Vec::new();
    }
    let d = space.n_dims();
    let mut unit = vec![vec![0.0; d]; n];
    for j in 0..d {
        let mut strata: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut strata);
        for (row, &stratum) in unit.iter_mut().zip(&strata) {
            row[j] = (stratum as f64 + rng.f64()) / n as f64;
        }
    }
    unit.iter().map(|u| space.point_from_unit(u)).collect()
}

/// Highest dimension index `sobol_burley` provides.
#[cfg(feature = "sobol")]
const SOBOL_MAX_DIMENSIONS: usize = 256;

#[cfg(feature = "sobol")]
#[allow(clippy::cast_possible_truncation)]
fn sobol(space: &Space, n: usize, rng: &mut fastrand::Rng) -> Vec<Point> {
    let seed = rng.u32(..);
    (0..n)
        .map(|i| {
            let unit: Vec<f64> = (0..space.n_dims())
                .map(|j| {
                    if j < SOBOL_MAX_DIMENSIONS {
                        f64::from(sobol_burley::sample(i as u32, j as u32, seed))
                    } else {
                        rng.f64()
                    }
                })
                .collect();
            space.point_from_unit(&unit)
        })
        .collect()
}
