use std::{fs, io, path::Path};

use anyhow::Context;
use args::{Args, Command};
use clap::Parser;
use config::{BreakdownConfig, Config, Limit, RowOrder, WorkbenchConfig};
use triage::{AlertFrame, LabelBreakdown, RowTreeBuilder};

mod args;
mod logger;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init(&args.log_level);

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let output = match args.command {
        Command::Rows {
            input,
            group_by,
            order,
        } => rows(&config.workbench, &input, group_by, order)?,
        Command::Labels {
            input,
            max_keys,
            max_values,
        } => labels(&config.breakdown, &input, max_keys, max_values)?,
    };

    println!("{output}");

    Ok(())
}

fn rows(
    config: &WorkbenchConfig,
    input: &Path,
    group_by: Vec<String>,
    order: Option<RowOrder>,
) -> anyhow::Result<String> {
    let json = read_input(input)?;

    let series = triage::decode_frames(&json)
        .with_context(|| format!("Failed to decode data frames from {}", input.display()))?;

    let group_by = if group_by.is_empty() {
        config.group_by.clone()
    } else {
        group_by
    };

    let builder = RowTreeBuilder::new(order.unwrap_or(config.order));

    let rows = match series.first() {
        Some(table) => {
            if series.len() > 1 {
                log::debug!("Received {} frames, using the first one", series.len());
            }

            if let Err(error) = AlertFrame::try_from(table) {
                log::warn!("Frame from {} cannot be aggregated: {error}", input.display());
            }

            builder.build(table, &group_by)
        }
        None => {
            log::warn!("No data frames in {}", input.display());
            Vec::new()
        }
    };

    log::info!("Built {} top-level rows grouped by [{}]", rows.len(), group_by.join(", "));

    serde_json::to_string_pretty(&rows).context("Failed to serialize workbench rows")
}

fn labels(
    config: &BreakdownConfig,
    input: &Path,
    max_keys: Option<Limit>,
    max_values: Option<Limit>,
) -> anyhow::Result<String> {
    let json = read_input(input)?;

    let records = triage::decode_label_sets(&json)
        .with_context(|| format!("Failed to decode label records from {}", input.display()))?;

    let breakdown = LabelBreakdown::new(
        max_keys.unwrap_or(config.max_keys),
        max_values.unwrap_or(config.max_values),
    )
    .with_internal_labels(&config.internal_labels);

    let labels = breakdown.compute(&records);

    log::info!("Ranked {} label keys over {} records", labels.len(), records.len());

    serde_json::to_string_pretty(&labels).context("Failed to serialize label breakdown")
}

/// Reads the whole input file, or stdin for `-`.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin()).context("Failed to read input from stdin");
    }

    fs::read_to_string(path).with_context(|| format!("Failed to open input file {}", path.display()))
}
