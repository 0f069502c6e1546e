//! Reference distributions used by the hypothesis tests.
//!
//! Thin wrappers over `statrs` that turn invalid parameters into
//! [`StatsError::Degenerate`] instead of panicking.

use std::f64::consts::SQRT_2;

use statrs::{
    distribution::{ContinuousCDF, FisherSnedecor, StudentsT},
    function::erf,
};

use crate::StatsError;

/// Standard normal cumulative distribution function.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erf::erfc(-z / SQRT_2)
}

/// Standard normal upper tail, `1 - Φ(z)`, without cancellation for large `z`.
#[must_use]
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erf::erfc(z / SQRT_2)
}

/// Standard normal quantile function, `Φ⁻¹(p)` for `p` in `(0, 1)`.
#[must_use]
pub fn normal_quantile(p: f64) -> f64 {
    -SQRT_2 * erf::erfc_inv(2.0 * p)
}

fn students_t(df: f64) -> Result<StudentsT, StatsError> {
    StudentsT::new(0.0, 1.0, df).map_err(|_| StatsError::Degenerate {
        reason: "Student t distribution needs positive degrees of freedom",
    })
}

/// Two-sided p-value of a Student t statistic.
pub fn students_t_two_sided(t: f64, df: f64) -> Result<f64, StatsError> {
    Ok((2.0 * students_t(df)?.sf(t.abs())).min(1.0))
}

/// Student t quantile function.
pub fn students_t_quantile(p: f64, df: f64) -> Result<f64, StatsError> {
    Ok(students_t(df)?.inverse_cdf(p))
}

fn fisher_f(df1: f64, df2: f64) -> Result<FisherSnedecor, StatsError> {
    FisherSnedecor::new(df1, df2).map_err(|_| StatsError::Degenerate {
        reason: "F distribution needs positive degrees of freedom",
    })
}

/// Lower tail of the F distribution.
pub fn fisher_f_cdf(f: f64, df1: f64, df2: f64) -> Result<f64, StatsError> {
    Ok(fisher_f(df1, df2)?.cdf(f))
}

/// Upper tail of the F distribution.
pub fn fisher_f_sf(f: f64, df1: f64, df2: f64) -> Result<f64, StatsError> {
    Ok(fisher_f(df1, df2)?.sf(f))
}
