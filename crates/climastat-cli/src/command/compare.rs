use std::path::PathBuf;

use clap::Args;
use climastat_analysis::{
    analysis::{AnalysisOutcome, LocationComparison, VariableComparison},
    sample::Variable,
    selector::format_p,
};

use super::{AlphaArg, LocationPairArg};
use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    pub locations: LocationPairArg,

    #[clap(flatten)]
    pub alpha: AlphaArg,

    /// Variables to compare (comma-separated)
    #[arg(long, value_delimiter = ',', default_values = ["T_Mean", "T_Range", "RH_Mean", "RH_Range"])]
    pub variables: Vec<Variable>,

    /// Write the comparison as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let selector = arg.alpha.selector()?;
    let (first, second) = arg.locations.load()?;

    let comparison = LocationComparison::run(&selector, &first, &second, &arg.variables);
    print_comparison(&comparison);

    if let Some(path) = &arg.output {
        util::write_json_file(&comparison, path)?;
    }
    Ok(())
}

pub(crate) fn print_comparison(comparison: &LocationComparison) {
    println!(
        "Comparison: {} (A) vs {} (B), alpha = {}",
        comparison.first, comparison.second, comparison.alpha
    );
    println!();
    for entry in &comparison.variables {
        println!(
            "[{}] {} (n = {} / {})",
            entry.variable.label(),
            entry.variable.description(),
            entry.n_first,
            entry.n_second,
        );
        match &entry.outcome {
            AnalysisOutcome::Completed(result) => println!("{result}"),
            AnalysisOutcome::Failed { error } => println!("  Not compared: {error}"),
        }
        println!();
    }

    println!("  {}", summary_header());
    println!("  {}", "-".repeat(51));
    for entry in &comparison.variables {
        println!("  {}", summary_line(entry));
    }
}

fn summary_header() -> String {
    format!(
        "{:<10} {:<16} {:>10} {:>12}",
        "Variable", "Test", "p-value", "Significant"
    )
}

fn summary_line(entry: &VariableComparison) -> String {
    let (test, p_value, verdict) = match &entry.outcome {
        AnalysisOutcome::Completed(result) => (
            result.branch().to_string(),
            format_p(result.final_p_value()),
            if result.is_significant() { "yes" } else { "no" },
        ),
        AnalysisOutcome::Failed { .. } => ("failed".to_owned(), "-".to_owned(), "-"),
    };
    format!(
        "{:<10} {:<16} {:>10} {:>12}",
        entry.variable.label(),
        test,
        p_value,
        verdict
    )
}

#[cfg(test)]
mod tests {
    use climastat_analysis::selector;

    use super::*;

    fn entry(a: &[f64], b: &[f64]) -> VariableComparison {
        VariableComparison {
            variable: Variable::HumidityMean,
            n_first: a.len(),
            n_second: b.len(),
            outcome: match selector::compare(a, b, "RH_Mean") {
                Ok(result) => AnalysisOutcome::Completed(result),
                Err(err) => AnalysisOutcome::Failed {
                    error: err.to_string(),
                },
            },
        }
    }

    #[test]
    fn test_summary_columns_line_up() {
        let header = summary_header();
        assert!(header.trim_end().ends_with("Significant"));

        let line = summary_line(&entry(&[50.0, 52.0, 49.0, 51.0, 50.0], &[60.0, 61.0, 59.0, 62.0, 60.0]));
        assert_eq!(line.len(), header.len());
        assert!(line.ends_with("yes"), "{line}");
    }

    #[test]
    fn test_failed_comparison_line() {
        let line = summary_line(&entry(&[], &[1.0, 2.0, 3.0]));
        let columns = line.split_whitespace().collect::<Vec<_>>();
        assert_eq!(columns, ["RH_Mean", "failed", "-", "-"]);
    }
}
