use std::path::PathBuf;

use clap::Args;
use climastat_analysis::analysis::{AnalysisReport, DEFAULT_HISTOGRAM_BINS, ReportConfig};

use super::{
    AlphaArg, LocationPairArg, anova::print_effects, compare::print_comparison,
    correlate::print_correlations, summarize,
};
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[clap(flatten)]
    pub locations: LocationPairArg,

    #[clap(flatten)]
    pub alpha: AlphaArg,

    /// Number of histogram bins in the distribution summaries
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    pub bins: usize,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.bins > 0, "--bins must be positive");
    let config = ReportConfig {
        selector: arg.alpha.selector()?,
        histogram_bins: arg.bins,
        ..ReportConfig::default()
    };
    let (first, second) = arg.locations.load()?;

    tracing::info!("running all analyses");
    let report = AnalysisReport::build(&first, &second, &config);

    println!("== Distributions ==");
    let per_location = report.distributions.chunks(config.variables.len());
    for (overview, summaries) in report.locations.iter().zip(per_location) {
        summarize::print_overview(overview);
        summarize::print_summary_table(summaries);
        println!();
    }

    println!("== Location comparison ==");
    print_comparison(&report.comparison);
    println!();

    println!("== Time of day ==");
    print_effects(&report.time_of_day);
    println!();

    println!("== Correlation ==");
    print_correlations(&report.correlations);

    if let Some(path) = &arg.output {
        util::write_json_file(&report, path)?;
    }
    Ok(())
}
