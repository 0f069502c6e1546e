use serde::Serialize;

use crate::{descriptive::DescriptiveStats, histogram::Histogram, percentiles::Percentiles};

/// Percentile points reported alongside every distribution summary.
pub const SUMMARY_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Descriptive statistics, percentiles and a histogram of one dataset.
///
/// # Examples
///
/// ```
/// use climastat_stats::comprehensive::ComprehensiveStats;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let stats = ComprehensiveStats::new(&values, 5).unwrap();
///
/// assert_eq!(stats.stats.mean, 5.5);
/// assert_eq!(stats.percentiles.get(50.0), Some(6.0));
/// assert_eq!(stats.histogram.total(), 10);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveStats {
    pub stats: DescriptiveStats,
    pub percentiles: Percentiles,
    pub histogram: Histogram,
}

impl ComprehensiveStats {
    /// Summarizes unsorted values; `None` if `values` is empty.
    #[must_use]
    pub fn new(values: &[f64], hist_num_bins: usize) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, &SUMMARY_PERCENTILES);
        let histogram = Histogram::new(&sorted, hist_num_bins);

        Some(Self {
            stats,
            percentiles,
            histogram,
        })
    }
}
