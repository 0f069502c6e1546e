use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use climastat_analysis::{reading::LocationData, sheet::SensorSheet};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn emit_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    match path {
        Some(path) => write_json_file(value, path),
        None => write_pretty_json(io::stdout().lock(), value).context("Failed to print JSON"),
    }
}

/// Writes `value` as pretty JSON to a new file at `path`.
pub fn write_json_file<T>(value: &T, path: &Path) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_pretty_json(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved JSON");
    Ok(())
}

fn write_pretty_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a sensor sheet and derives the location's daily summaries.
pub fn load_location(path: &Path) -> anyhow::Result<LocationData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open sensor sheet: {}", path.display()))?;
    let sheet: SensorSheet = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse sensor sheet: {}", path.display()))?;
    let data = LocationData::from_sheet(&sheet)
        .with_context(|| format!("Invalid sensor sheet: {}", path.display()))?;
    tracing::info!(
        location = %data.location,
        path = %path.display(),
        readings = data.readings.len(),
        days = data.days.len(),
        "loaded sensor sheet"
    );
    Ok(data)
}

/// Installs the stderr log subscriber; `RUST_LOG` takes precedence.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Lowercase, filesystem-friendly form of a location name.
pub fn file_stem(name: &str) -> String {
    let stem = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>();
    stem.trim_matches('_').to_owned()
}
