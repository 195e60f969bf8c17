use super::SelectArgs;
use crate::tables;
use chrono::Local;
use clap::Args;
use cpk_forge::api;
use cpk_forge::capability::RecordPreview;
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::CpkResult;
use cpk_forge::report::suggested_file_name;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: AnalysisConfig,

    #[command(flatten)]
    pub select: SelectArgs,

    /// Export path (.csv, .json, anything else is text). A directory gets a
    /// generated CSV file name.
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Comma-separated test log.
    pub file: PathBuf,
}

pub fn run(args: &AnalyzeArgs, config: &AnalysisConfig) -> CpkResult<()> {
    let log = api::load_log(&args.file, config)?;
    let record = api::select_record(
        &log.records,
        args.select.item.as_deref(),
        args.select.index,
    )?;

    tables::preview(record, &RecordPreview::from_record(record), config.display_precision);

    let now = Local::now().naive_local();
    let analysis = api::analyze_record(record, config, now)?;

    println!("\n{}", analysis.report.summary_text(config.display_precision));
    if let Some(chart) = &analysis.chart {
        tables::histogram(chart, config.display_precision);
    }

    if let Some(path) = &args.export {
        let target = if path.is_dir() {
            path.join(format!("{}.csv", suggested_file_name(&record.item_name, now)))
        } else {
            path.clone()
        };
        analysis
            .report
            .export_to_path(&target, config.export_precision)?;
    }
    Ok(())
}
