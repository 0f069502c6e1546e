//! Shapiro–Wilk test of normality.
//!
//! Implements Royston's (1995) approximation (algorithm AS R94): the
//! coefficients come from Blom scores corrected by polynomial fits, and the
//! p-value from a normalizing transformation of `ln(1 - W)`. Exact for
//! `n = 3`, valid for `3 <= n <= 5000`.
//!
//! # Examples
//!
//! ```
//! use climastat_stats::normality::shapiro_wilk;
//!
//! let symmetric = [49.0, 50.0, 50.0, 51.0, 52.0];
//! let result = shapiro_wilk(&symmetric).unwrap();
//! assert!(result.p_value > 0.05);
//!
//! let skewed = [1.0, 1.0, 1.0, 1.0, 100.0];
//! let result = shapiro_wilk(&skewed).unwrap();
//! assert!(result.p_value < 0.05);
//! ```

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_3, PI};

use serde::Serialize;

use crate::{StatsError, check_sample, descriptive, distribution};

/// Smallest sample for which the statistic is defined.
pub const MIN_OBSERVATIONS: usize = 3;
/// Largest sample covered by Royston's approximation.
pub const MAX_OBSERVATIONS: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

/// Outcome of a Shapiro–Wilk test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapiroWilkResult {
    /// The W statistic in `(0, 1]`; values near 1 indicate normality.
    pub w: f64,
    /// Probability of a W this small under the normal null hypothesis.
    pub p_value: f64,
    /// Sample size.
    pub n: usize,
}

/// Runs the Shapiro–Wilk test on `values` (any order).
pub fn shapiro_wilk(values: &[f64]) -> Result<ShapiroWilkResult, StatsError> {
    check_sample(values, MIN_OBSERVATIONS)?;
    let n = values.len();
    if n > MAX_OBSERVATIONS {
        return Err(StatsError::TooManyObservations {
            limit: MAX_OBSERVATIONS,
            actual: n,
        });
    }

    let mut x = values.to_vec();
    x.sort_by(f64::total_cmp);
    let range = x[n - 1] - x[0];
    if range <= f64::EPSILON * x[0].abs().max(1.0) {
        return Err(StatsError::Degenerate {
            reason: "all values are identical",
        });
    }
    // W is scale invariant; work on range-scaled data for precision
    for v in &mut x {
        *v /= range;
    }

    let a = coefficients(n)?;
    let numerator = a
        .iter()
        .enumerate()
        .map(|(i, ai)| ai * (x[n - 1 - i] - x[i]))
        .sum::<f64>();
    let ss = descriptive::sum_of_squares(&x, descriptive::mean(&x));
    let w = (numerator * numerator / ss).min(1.0);

    Ok(ShapiroWilkResult {
        w,
        p_value: p_value(w, n).clamp(0.0, 1.0),
        n,
    })
}

/// Horner evaluation of `c[0] + c[1] x + c[2] x² + ...`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Antisymmetric coefficients `a_1..a_{n/2}` (positive, largest first).
#[expect(clippy::cast_precision_loss)]
fn coefficients(n: usize) -> Result<Vec<f64>, StatsError> {
    if n == 3 {
        return Ok(vec![FRAC_1_SQRT_2]);
    }

    let an = n as f64;
    let half = n / 2;
    // Blom scores of the lower half; all negative
    let m = (1..=half)
        .map(|i| distribution::normal_quantile((i as f64 - 0.375) / (an + 0.25)))
        .collect::<Vec<_>>();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let mut a = vec![0.0; half];
    a[0] = poly(&C1, rsn) - m[0] / ssumm2;
    let (numerator, denominator, first_scaled) = if n > 5 {
        a[1] = poly(&C2, rsn) - m[1] / ssumm2;
        (
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a[0] * a[0] - 2.0 * a[1] * a[1],
            2,
        )
    } else {
        (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a[0] * a[0], 1)
    };
    if numerator <= 0.0 || denominator <= 0.0 {
        return Err(StatsError::Degenerate {
            reason: "Shapiro-Wilk coefficients could not be normalized",
        });
    }
    let fac = (numerator / denominator).sqrt();
    for (ai, mi) in a.iter_mut().zip(&m).skip(first_scaled) {
        *ai = -mi / fac;
    }
    Ok(a)
}

#[expect(clippy::cast_precision_loss)]
fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        // Exact distribution of W for three observations
        let w = w.max(0.75);
        return (6.0 / PI) * (w.sqrt().asin() - FRAC_PI_3);
    }
    if w >= 1.0 {
        return 1.0;
    }

    let an = n as f64;
    let y = (1.0 - w).ln();
    let (z, m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return 1e-99;
        }
        (-(gamma - y).ln(), poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (y, poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };
    distribution::normal_sf((z - m) / s)
}
