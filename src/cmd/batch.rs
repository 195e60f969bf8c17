use crate::tables;
use clap::Args;
use cpk_forge::api;
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::CpkResult;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: AnalysisConfig,

    /// Comma-separated test log.
    pub file: PathBuf,
}

pub fn run(args: &BatchArgs, config: &AnalysisConfig) -> CpkResult<()> {
    let log = api::load_log(&args.file, config)?;
    let entries = api::analyze_all(&log.records, config);
    tables::batch(&entries, config.display_precision);
    Ok(())
}
