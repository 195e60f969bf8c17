use crate::tables;
use clap::Args;
use cpk_forge::api;
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::CpkResult;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub config: AnalysisConfig,

    /// Comma-separated test log.
    pub file: PathBuf,
}

pub fn run(args: &ScanArgs, config: &AnalysisConfig) -> CpkResult<()> {
    let log = api::load_log(&args.file, config)?;
    if log.records.is_empty() {
        warn!("⚠️  No usable test records found in {}", args.file.display());
        return Ok(());
    }

    let previews = api::preview_all(&log.records);
    tables::records(&log.records, &previews, config.display_precision);
    tables::verdict_legend();
    tables::skipped(&log);
    Ok(())
}
