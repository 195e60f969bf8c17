use super::SelectArgs;
use chrono::Local;
use clap::Args;
use cpk_forge::api;
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::{CpkError, CpkResult};
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    #[command(flatten)]
    pub config: AnalysisConfig,

    #[command(flatten)]
    pub select: SelectArgs,

    /// Comma-separated test log.
    pub file: PathBuf,
}

pub fn run(args: &ChartArgs, config: &AnalysisConfig) -> CpkResult<()> {
    let log = api::load_log(&args.file, config)?;
    let record = api::select_record(
        &log.records,
        args.select.item.as_deref(),
        args.select.index,
    )?;

    let analysis = api::analyze_record(record, config, Local::now().naive_local())?;
    match &analysis.chart {
        Some(chart) => {
            println!("{}", serde_json::to_string_pretty(chart)?);
            Ok(())
        }
        None => {
            warn!("{}", analysis.report.summary_text(config.display_precision));
            Err(CpkError::NoVariation)
        }
    }
}
