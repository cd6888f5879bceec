use anyhow::{Context, Result};
use tracing::{debug, info};
use trsfile::{ReaderConfig, TraceSet, TrsTag};

mod models;
mod utils;

use crate::models::summary_model::TraceSetSummary;
use crate::utils::conf_helper::{init_config, log_level};

const USAGE: &str = "usage: trs-info <file.trs> [preview]";

fn main() -> Result<()> {
    let config = init_config()?;

    tracing_subscriber::fmt()
        .with_max_level(log_level(config))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context(USAGE)?;
    let preview = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid preview count '{}'", n))?,
        None => config.preview_traces,
    };

    let reader_config = ReaderConfig::with_max_window_size(config.max_window_size);
    let mut trace_set = TraceSet::open_with(&path, &reader_config)
        .with_context(|| format!("failed to open {}", path))?;

    let metadata = trace_set.metadata();
    info!(
        "{}: {} traces of {} samples",
        path,
        trace_set.number_of_traces(),
        metadata.get_int(TrsTag::NumberOfSamples)?
    );
    debug!("header:\n{}", metadata);

    let summary = TraceSetSummary::collect(&mut trace_set, preview)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    trace_set.close()?;
    Ok(())
}
