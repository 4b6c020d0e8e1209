/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Inverse interpolation used to locate the epoch at which a stop quantity reaches its goal.
//!
//! Samples are `(x, y)` pairs where `x` is the independent value and `y` the value sought. Stopping
//! conditions feed `(quantity value, seconds since the oldest sample)` and ask for the time at
//! which the quantity equals its goal.

use crate::errors::{
    InterpolationError, NonFiniteInterpolantSnafu, NotBracketedSnafu, NotEnoughPointsSnafu,
    RepeatedAbscissaSnafu,
};
use snafu::prelude::*;
use std::fmt;

pub trait Interpolator: fmt::Debug + fmt::Display + Send + Sync {
    /// Minimum number of samples needed by this interpolator
    fn required_points(&self) -> usize;

    /// Returns the `y` value at `x`, using the segment of the samples which brackets `x`
    fn interpolate(&self, samples: &[(f64, f64)], x: f64) -> Result<f64, InterpolationError>;
}

/// Index `i` of the most recent segment `[samples[i], samples[i + 1]]` which brackets `x`
fn bracketing_segment(samples: &[(f64, f64)], x: f64) -> Option<usize> {
    samples.windows(2).rposition(|pair| {
        let (lo, hi) = if pair[0].0 <= pair[1].0 {
            (pair[0].0, pair[1].0)
        } else {
            (pair[1].0, pair[0].0)
        };
        lo <= x && x <= hi
    })
}

/// Piecewise linear interpolation on the bracketing segment.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinearInterpolator;

impl Interpolator for LinearInterpolator {
    fn required_points(&self) -> usize {
        2
    }

    fn interpolate(&self, samples: &[(f64, f64)], x: f64) -> Result<f64, InterpolationError> {
        ensure!(
            samples.len() >= self.required_points(),
            NotEnoughPointsSnafu {
                interpolator: self.to_string(),
                required: self.required_points(),
                provided: samples.len(),
            }
        );
        let i = bracketing_segment(samples, x).context(NotBracketedSnafu {
            interpolator: self.to_string(),
            target: x,
        })?;
        let (x0, y0) = samples[i];
        let (x1, y1) = samples[i + 1];

        if x0 == x1 {
            // Flat segment: only its own abscissa is reachable, and that is ambiguous
            return RepeatedAbscissaSnafu {
                interpolator: self.to_string(),
                value: x0,
            }
            .fail();
        }

        let y = y0 + (x - x0) * (y1 - y0) / (x1 - x0);
        ensure!(
            y.is_finite(),
            NonFiniteInterpolantSnafu {
                interpolator: self.to_string(),
                target: x,
            }
        );
        Ok(y)
    }
}

impl fmt::Display for LinearInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linear interpolator")
    }
}

/// Lagrange polynomial interpolation of the provided order, through the `order + 1` consecutive
/// samples centered on the bracketing segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LagrangeInterpolator {
    pub order: usize,
}

impl LagrangeInterpolator {
    pub const fn new(order: usize) -> Self {
        Self { order }
    }
}

impl Default for LagrangeInterpolator {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Interpolator for LagrangeInterpolator {
    fn required_points(&self) -> usize {
        self.order.max(1) + 1
    }

    fn interpolate(&self, samples: &[(f64, f64)], x: f64) -> Result<f64, InterpolationError> {
        let n = self.required_points();
        ensure!(
            samples.len() >= n,
            NotEnoughPointsSnafu {
                interpolator: self.to_string(),
                required: n,
                provided: samples.len(),
            }
        );
        let i = bracketing_segment(samples, x).context(NotBracketedSnafu {
            interpolator: self.to_string(),
            target: x,
        })?;

        let start = (i + 1).saturating_sub(n / 2).min(samples.len() - n);
        let window = &samples[start..start + n];

        for (j, (xj, _)) in window.iter().enumerate() {
            ensure!(
                window[j + 1..].iter().all(|(xk, _)| xk != xj),
                RepeatedAbscissaSnafu {
                    interpolator: self.to_string(),
                    value: *xj,
                }
            );
        }

        let mut y = 0.0;
        for (j, (xj, yj)) in window.iter().enumerate() {
            let mut basis = 1.0;
            for (k, (xk, _)) in window.iter().enumerate() {
                if k != j {
                    basis *= (x - xk) / (xj - xk);
                }
            }
            y += yj * basis;
        }

        ensure!(
            y.is_finite(),
            NonFiniteInterpolantSnafu {
                interpolator: self.to_string(),
                target: x,
            }
        );
        Ok(y)
    }
}

impl fmt::Display for LagrangeInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lagrange interpolator of order {}", self.order)
    }
}

#[cfg(test)]
mod ut_interpolation {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_picks_bracketing_segment() {
        let samples = [(0.0, 0.0), (10.0, 1.0), (20.0, 2.0), (30.0, 3.0)];
        let t = LinearInterpolator.interpolate(&samples, 15.0).unwrap();
        assert_abs_diff_eq!(t, 1.5, epsilon = 1e-12);

        // Decreasing values
        let samples = [(30.0, 0.0), (20.0, 1.0), (10.0, 2.0)];
        let t = LinearInterpolator.interpolate(&samples, 12.5).unwrap();
        assert_abs_diff_eq!(t, 1.75, epsilon = 1e-12);
    }

    #[test]
    fn linear_errors() {
        let samples = [(0.0, 0.0), (10.0, 1.0)];
        assert!(matches!(
            LinearInterpolator.interpolate(&samples, 11.0),
            Err(InterpolationError::NotBracketed { .. })
        ));
        assert!(matches!(
            LinearInterpolator.interpolate(&samples[..1], 0.0),
            Err(InterpolationError::NotEnoughPoints { .. })
        ));
        let flat = [(5.0, 0.0), (5.0, 1.0)];
        assert!(matches!(
            LinearInterpolator.interpolate(&flat, 5.0),
            Err(InterpolationError::RepeatedAbscissa { .. })
        ));
    }

    #[test]
    fn lagrange_is_exact_on_polynomials() {
        // t(x) = x^3 - 2x + 1 is reproduced exactly by a cubic
        let poly = |x: f64| x.powi(3) - 2.0 * x + 1.0;
        let samples: Vec<(f64, f64)> = (0..6)
            .map(|i| {
                let x = i as f64 * 0.5;
                (x, poly(x))
            })
            .collect();
        let interp = LagrangeInterpolator::new(3);
        assert_eq!(interp.required_points(), 4);
        let y = interp.interpolate(&samples, 1.3).unwrap();
        assert_abs_diff_eq!(y, poly(1.3), epsilon = 1e-10);
        // Last segment uses the last four samples
        let y = interp.interpolate(&samples, 2.4).unwrap();
        assert_abs_diff_eq!(y, poly(2.4), epsilon = 1e-10);
    }

    #[test]
    fn lagrange_needs_enough_points() {
        let samples = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        let err = LagrangeInterpolator::new(3)
            .interpolate(&samples, 0.5)
            .unwrap_err();
        assert_eq!(
            err,
            InterpolationError::NotEnoughPoints {
                interpolator: "Lagrange interpolator of order 3".to_string(),
                required: 4,
                provided: 3
            }
        );
    }
}
