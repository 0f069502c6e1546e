//! Distribution summaries per location and variable
//!
//! Prints a descriptive table, a text histogram per variable and optionally
//! writes the histogram bins as CSV.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use climastat_analysis::{
    analysis::{DEFAULT_HISTOGRAM_BINS, DistributionSummary, LocationOverview},
    reading::LocationData,
    sample::Variable,
};
use climastat_stats::{histogram::Histogram, percentiles::Percentiles};

use super::LocationPairArg;
use crate::util;

const HISTOGRAM_WIDTH: usize = 40;

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    pub locations: LocationPairArg,

    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Directory to write histogram bins as CSV (created if missing)
    #[arg(long)]
    pub histogram_dir: Option<PathBuf>,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.bins > 0, "--bins must be positive");
    let (first, second) = arg.locations.load()?;

    for data in [&first, &second] {
        print_overview(&LocationOverview::from(data));
        let summaries = Variable::ALL
            .into_iter()
            .map(|variable| DistributionSummary::run(data, variable, arg.bins))
            .collect::<Vec<_>>();
        print_summary_table(&summaries);
        for summary in &summaries {
            print_histogram(summary);
        }
        if let Some(dir) = &arg.histogram_dir {
            save_histograms(dir, data, &summaries)?;
        }
        println!();
    }
    Ok(())
}

pub(crate) fn print_overview(overview: &LocationOverview) {
    println!(
        "{}: {} readings, {} complete days ({} rows skipped, {} days dropped)",
        overview.location,
        overview.readings,
        overview.days,
        overview.skipped_rows,
        overview.incomplete_days,
    );
}

/// Percentile columns use nearest rank, so P50 can differ from the
/// midpoint median stored in the JSON summary.
pub(crate) fn print_summary_table(summaries: &[DistributionSummary]) {
    println!(
        "  {:<10} {:>5} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "Variable", "N", "Mean", "StdDev", "Min", "P25", "P50", "P75", "Max", "IQR",
    );
    println!("  {}", "-".repeat(98));
    for summary in summaries {
        println!("  {}", summary_row(summary));
    }
}

fn summary_row(summary: &DistributionSummary) -> String {
    let Some(stats) = &summary.summary else {
        return format!("{:<10} {:>5}", summary.variable.label(), 0);
    };
    let percentile = |p| stats.percentiles.get(p).unwrap_or(f64::NAN);
    format!(
        "{:<10} {:>5} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
        summary.variable.label(),
        stats.stats.count,
        stats.stats.mean,
        stats.stats.std_dev,
        stats.stats.min,
        percentile(25.0),
        percentile(50.0),
        percentile(75.0),
        stats.stats.max,
        stats.percentiles.iqr().unwrap_or(f64::NAN),
    )
}

fn print_histogram(summary: &DistributionSummary) {
    let Some(stats) = &summary.summary else {
        return;
    };
    println!();
    println!(
        "  {} ({}, {}), n = {}",
        summary.variable.label(),
        summary.variable.description(),
        summary.variable.quantity().unit(),
        stats.histogram.total(),
    );
    println!("    {}", percentile_line(&stats.percentiles));
    for line in stats.histogram.render(HISTOGRAM_WIDTH).lines() {
        println!("    {line}");
    }
}

fn percentile_line(percentiles: &Percentiles) -> String {
    percentiles
        .iter()
        .map(|(p, value)| format!("P{p} = {value:.2}"))
        .collect::<Vec<_>>()
        .join("  ")
}

fn save_histograms(
    dir: &Path,
    data: &LocationData,
    summaries: &[DistributionSummary],
) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    for summary in summaries {
        let Some(stats) = &summary.summary else {
            continue;
        };
        let csv_path = dir.join(format!(
            "{}_{}_histogram.csv",
            util::file_stem(&data.location),
            util::file_stem(summary.variable.label()),
        ));
        fs::write(&csv_path, histogram_csv(&stats.histogram))
            .with_context(|| format!("Failed to write CSV file: {}", csv_path.display()))?;
        tracing::info!(path = %csv_path.display(), "saved histogram");
    }
    Ok(())
}

fn histogram_csv(histogram: &Histogram) -> String {
    let mut csv_content = String::from("bin_start,bin_end,bin_mid,count\n");
    for bin in &histogram.bins {
        let _ = writeln!(
            &mut csv_content,
            "{},{},{},{}",
            bin.range.start,
            bin.range.end,
            bin.midpoint(),
            bin.count
        );
    }
    csv_content
}

#[cfg(test)]
mod tests {
    use climastat_stats::comprehensive::ComprehensiveStats;

    use super::*;

    #[test]
    fn test_histogram_csv() {
        let histogram = Histogram::new(&[1.0, 2.0, 2.5, 4.0], 3);
        let csv = histogram_csv(&histogram);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("bin_start,bin_end,bin_mid,count"));
        assert_eq!(lines.next(), Some("1,2,1.5,1"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_summary_row_uses_nearest_rank_percentiles() {
        let summary = DistributionSummary {
            location: "Attic".to_owned(),
            variable: Variable::TemperatureMean,
            summary: ComprehensiveStats::new(&[1.0, 2.0, 3.0, 4.0], 2),
        };
        let row = summary_row(&summary);
        let columns = row.split_whitespace().collect::<Vec<_>>();
        // Variable, N, Mean, StdDev, Min, P25, P50, P75, Max, IQR
        assert_eq!(columns[0], "T_Mean");
        assert_eq!(columns[1], "4");
        assert_eq!(columns[2], "2.500");
        assert_eq!(&columns[5..], ["2.000", "3.000", "4.000", "4.000", "2.000"]);
    }

    #[test]
    fn test_percentile_line() {
        let percentiles = Percentiles::new(&[18.0, 19.5, 21.0, 22.5], &[25.0, 75.0]);
        assert_eq!(percentile_line(&percentiles), "P25 = 19.50  P75 = 22.50");
    }

    #[test]
    fn test_summary_row_without_data() {
        let summary = DistributionSummary {
            location: "Attic".to_owned(),
            variable: Variable::HumidityRange,
            summary: None,
        };
        assert_eq!(summary_row(&summary).split_whitespace().collect::<Vec<_>>(), ["RH_Range", "0"]);
    }
}
