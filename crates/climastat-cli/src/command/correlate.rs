use std::path::PathBuf;

use clap::Args;
use climastat_analysis::{
    analysis::{AnalysisOutcome, QuantityCorrelation},
    selector::format_p,
};

use super::LocationPairArg;
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct CorrelateArg {
    #[clap(flatten)]
    pub locations: LocationPairArg,

    /// Write the correlations as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CorrelateArg) -> anyhow::Result<()> {
    let (first, second) = arg.locations.load()?;

    let correlations = [&first, &second]
        .into_iter()
        .map(QuantityCorrelation::run)
        .collect::<Vec<_>>();
    print_correlations(&correlations);

    if let Some(path) = &arg.output {
        util::write_json_file(&correlations, path)?;
    }
    Ok(())
}

pub(crate) fn print_correlations(correlations: &[QuantityCorrelation]) {
    println!("Temperature vs humidity (Pearson, all readings)");
    println!(
        "  {:<16} {:>5} {:>8} {:>9} {:>10} {:>20}",
        "Location", "N", "r", "t", "p-value", "95% CI"
    );
    println!("  {}", "-".repeat(73));
    for correlation in correlations {
        match &correlation.outcome {
            AnalysisOutcome::Completed(result) => {
                let interval = result
                    .confidence_interval
                    .map_or_else(|| "-".to_owned(), |(lo, hi)| format!("[{lo:.3}, {hi:.3}]"));
                println!(
                    "  {:<16} {:>5} {:>8.3} {:>9.3} {:>10} {:>20}",
                    correlation.location,
                    result.n,
                    result.r,
                    result.statistic,
                    format_p(result.p_value),
                    interval,
                );
            }
            AnalysisOutcome::Failed { error } => {
                println!("  {:<16} failed: {error}", correlation.location);
            }
        }
    }
}
