//! Wilcoxon rank-sum (Mann–Whitney U) test.
//!
//! The statistic is `W = R_a - n_a (n_a + 1) / 2`, the number of `(a_i, b_j)`
//! pairs with `a_i > b_j` (ties count one half). Small samples without ties
//! use the exact null distribution; otherwise a normal approximation with tie
//! and continuity corrections is used.

use serde::Serialize;

use crate::{StatsError, check_sample, distribution};

/// Samples of this size or larger always use the normal approximation.
pub const EXACT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSumMethod {
    Exact,
    NormalApproximation,
}

/// Outcome of a two-sided rank-sum test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankSumResult {
    /// W (equivalently U) of the first sample.
    pub statistic: f64,
    pub p_value: f64,
    pub method: RankSumMethod,
    pub n_a: usize,
    pub n_b: usize,
}

/// Mid-ranks (1-based) of `values`, in input order.
///
/// ```
/// use climastat_stats::rank::average_ranks;
///
/// assert_eq!(average_ranks(&[10.0, 30.0, 20.0, 20.0]), vec![1.0, 4.0, 2.5, 2.5]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    for (start, end) in tie_groups(values, &order) {
        // Positions start..end share ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
    }
    ranks
}

/// `[start, end)` runs of equal values along `order`.
fn tie_groups(values: &[f64], order: &[usize]) -> Vec<(usize, usize)> {
    let mut groups = vec![];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        groups.push((start, end));
        start = end;
    }
    groups
}

/// Two-sided Wilcoxon rank-sum test of `H0: a and b share one distribution`.
///
/// ```
/// use climastat_stats::rank::{RankSumMethod, rank_sum_test};
///
/// let result = rank_sum_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert_eq!(result.method, RankSumMethod::Exact);
/// assert!((result.p_value - 0.1).abs() < 1e-12);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rank_sum_test(a: &[f64], b: &[f64]) -> Result<RankSumResult, StatsError> {
    check_sample(a, 1)?;
    check_sample(b, 1)?;

    let n_a = a.len();
    let n_b = b.len();
    let combined = a.iter().chain(b).copied().collect::<Vec<_>>();
    let ranks = average_ranks(&combined);
    let rank_sum_a = ranks[..n_a].iter().sum::<f64>();
    let statistic = rank_sum_a - (n_a * (n_a + 1)) as f64 / 2.0;

    let mut order = (0..combined.len()).collect::<Vec<_>>();
    order.sort_by(|&i, &j| combined[i].total_cmp(&combined[j]));
    let ties = tie_groups(&combined, &order)
        .into_iter()
        .map(|(start, end)| (end - start) as f64)
        .filter(|&t| t > 1.0)
        .collect::<Vec<_>>();

    let product = (n_a * n_b) as f64;
    if ties.is_empty() && n_a < EXACT_LIMIT && n_b < EXACT_LIMIT {
        let counts = rank_sum_counts(n_a, n_b);
        let total = counts.iter().sum::<i128>() as f64;
        let w = statistic.round() as usize;
        let tail = if statistic > product / 2.0 {
            counts[w..].iter().sum::<i128>()
        } else {
            counts[..=w].iter().sum::<i128>()
        };
        return Ok(RankSumResult {
            statistic,
            p_value: (2.0 * tail as f64 / total).min(1.0),
            method: RankSumMethod::Exact,
            n_a,
            n_b,
        });
    }

    let n = (n_a + n_b) as f64;
    let tie_term = ties.iter().map(|t| t * t * t - t).sum::<f64>() / (n * (n - 1.0));
    let sigma = (product / 12.0 * ((n + 1.0) - tie_term)).sqrt();
    if sigma <= 0.0 || !sigma.is_finite() {
        return Err(StatsError::Degenerate {
            reason: "all observations are tied",
        });
    }
    let shift = statistic - product / 2.0;
    let correction = if shift == 0.0 { 0.0 } else { 0.5 * shift.signum() };
    let z = (shift - correction) / sigma;
    let p_value = (2.0 * distribution::normal_cdf(z).min(distribution::normal_sf(z))).min(1.0);

    Ok(RankSumResult {
        statistic,
        p_value,
        method: RankSumMethod::NormalApproximation,
        n_a,
        n_b,
    })
}

/// Number of rankings yielding each `W` in `0..=m*n` under the null hypothesis.
///
/// These are the coefficients of the Gaussian binomial `[m+n choose m]_q`,
/// built as `prod_{i=1..m} (1 - q^(n+i)) / (1 - q^i)`.
fn rank_sum_counts(m: usize, n: usize) -> Vec<i128> {
    let max = m * n;
    let mut counts = vec![0_i128; max + 1];
    counts[0] = 1;
    for i in 1..=m {
        let shift = n + i;
        for k in (shift..=max).rev() {
            counts[k] -= counts[k - shift];
        }
        for k in i..=max {
            counts[k] += counts[k - i];
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_distribution_small() {
        assert_eq!(rank_sum_counts(3, 3), vec![1, 1, 2, 3, 3, 3, 3, 2, 1, 1]);
        assert_eq!(rank_sum_counts(1, 4), vec![1, 1, 1, 1, 1]);
        assert_eq!(rank_sum_counts(2, 2).iter().sum::<i128>(), 6);
    }

    #[test]
    fn test_exact_distribution_total_is_binomial() {
        // C(60, 30)
        let total = rank_sum_counts(30, 30).iter().sum::<i128>();
        assert_eq!(total, 118_264_581_564_861_424);
    }

    #[test]
    fn test_upper_tail_uses_complement() {
        let low = rank_sum_test(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        let high = rank_sum_test(&[4.0, 5.0, 6.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(high.statistic, 9.0);
        assert!((low.p_value - high.p_value).abs() < 1e-15);
    }

    #[test]
    fn test_ties_use_normal_approximation() {
        let result = rank_sum_test(&[1.0, 1.0, 1.0, 1.0, 100.0], &[2.0, 3.0, 2.0, 3.0, 2.0]).unwrap();
        assert_eq!(result.method, RankSumMethod::NormalApproximation);
        assert_eq!(result.statistic, 5.0);
        assert!((result.p_value - 0.1251).abs() < 1e-3, "p = {}", result.p_value);
    }

    #[test]
    fn test_all_tied_is_degenerate() {
        assert!(matches!(
            rank_sum_test(&[4.0, 4.0], &[4.0, 4.0, 4.0]),
            Err(StatsError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_balanced_ranks_have_p_one() {
        let result = rank_sum_test(&[1.0, 2.0, 3.0, 4.0], &[0.5, 1.5, 3.5, 4.5]).unwrap();
        assert_eq!(result.statistic, 8.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
    }
}
