use std::{fmt::Write as _, ops::Range};

use serde::Serialize;

/// Equal-width frequency distribution of a dataset.
///
/// Bins cover `[min, max]` of the histogram bounds. When explicit bounds are
/// narrower than the data, values below or above them are tallied in
/// `underflow` / `overflow` instead of being dropped.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Main bins in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Number of values below the first bin.
    pub underflow: u64,
    /// Number of values above the last bin.
    pub overflow: u64,
}

/// A single histogram bin.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// Range covered by the bin (inclusive start, exclusive end, except for the last bin).
    pub range: Range<f64>,
    /// Number of values in the bin.
    pub count: u64,
}

impl HistogramBin {
    /// Midpoint of the bin range.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        f64::midpoint(self.range.start, self.range.end)
    }
}

impl Histogram {
    /// Builds a histogram whose bounds are the minimum and maximum of `values`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use climastat_stats::histogram::Histogram;
    /// let values = [21.0, 21.5, 22.0, 22.5, 23.0, 24.0];
    /// let histogram = Histogram::new(&values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total(), 6);
    /// ```
    #[must_use]
    pub fn new(values: &[f64], num_bins: usize) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self::with_bounds(values, num_bins, min, max)
    }

    /// Builds a histogram over explicit bounds.
    ///
    /// A zero-width range (all values equal) is widened to one unit centred on
    /// the value so that the single populated bin has a sensible label.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn with_bounds(values: &[f64], num_bins: usize, min: f64, max: f64) -> Self {
        if values.is_empty() || num_bins == 0 || !min.is_finite() || !max.is_finite() {
            return Self {
                bins: vec![],
                underflow: 0,
                overflow: 0,
            };
        }

        let (min, max) = if max - min < f64::EPSILON * min.abs().max(1.0) {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (max - min) / num_bins as f64;

        let mut bins = (0..num_bins)
            .map(|i| HistogramBin {
                // Derive each edge from the bin index rather than accumulating widths
                range: (min + width * i as f64)..(min + width * (i + 1) as f64),
                count: 0,
            })
            .collect::<Vec<_>>();
        if let Some(last) = bins.last_mut() {
            last.range.end = max;
        }

        let mut underflow = 0;
        let mut overflow = 0;
        for &value in values.iter().filter(|v| !v.is_nan()) {
            if value < min {
                underflow += 1;
            } else if value > max {
                overflow += 1;
            } else {
                let idx = (((value - min) / width).floor() as usize).min(num_bins - 1);
                bins[idx].count += 1;
            }
        }

        Self {
            bins,
            underflow,
            overflow,
        }
    }

    /// Total number of values counted, including underflow and overflow.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum::<u64>() + self.underflow + self.overflow
    }

    /// Renders the histogram as horizontal text bars, one line per bin.
    ///
    /// The longest bar is `max_bar_width` characters wide.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn render(&self, max_bar_width: usize) -> String {
        let max_count = self.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let mut out = String::new();
        if self.underflow > 0 {
            let _ = writeln!(out, "{:>17} | {:<5}", "< min", self.underflow);
        }
        for bin in &self.bins {
            let bar_width = (bin.count * max_bar_width as u64 / max_count) as usize;
            let label = format!("{:.2}..{:.2}", bin.range.start, bin.range.end);
            let _ = writeln!(
                out,
                "{:>17} | {:<5} {}",
                label,
                bin.count,
                "#".repeat(bar_width)
            );
        }
        if self.overflow > 0 {
            let _ = writeln!(out, "{:>17} | {:<5}", "> max", self.overflow);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let histogram = Histogram::new(&[], 5);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_max_value_lands_in_last_bin() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let histogram = Histogram::new(&values, 4);
        assert_eq!(histogram.bins.len(), 4);
        assert_eq!(histogram.bins[3].count, 2);
        assert_eq!(histogram.total(), 5);
    }

    #[test]
    fn test_constant_values() {
        let histogram = Histogram::new(&[42.0; 10], 3);
        assert_eq!(histogram.total(), 10);
        assert_eq!(histogram.bins.iter().filter(|b| b.count > 0).count(), 1);
    }

    #[test]
    fn test_explicit_bounds_track_tails() {
        let values = [-5.0, 0.0, 5.0, 10.0, 15.0];
        let histogram = Histogram::with_bounds(&values, 2, 0.0, 10.0);
        assert_eq!(histogram.underflow, 1);
        assert_eq!(histogram.overflow, 1);
        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[1].count, 2);
    }

    #[test]
    fn test_render_scales_bars() {
        let histogram = Histogram::new(&[1.0, 1.0, 1.0, 1.0, 2.0], 2);
        let text = histogram.render(8);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("########"));
        assert!(lines[1].ends_with("##"));
        assert!((histogram.bins[0].midpoint() - 1.25).abs() < 1e-12);
    }
}
