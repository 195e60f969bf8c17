//! Service entry points shared by the CLI and any other front end.

use crate::capability::{
    quick_evaluate, CapabilityAnalyzer, CapabilityResult, QuickVerdict, RecordPreview,
};
use crate::chart::ChartGeometry;
use crate::config::AnalysisConfig;
use crate::error::{CpkError, CpkResult};
use crate::records::{self, ParsedLog, TestRecord};
use crate::report::CapabilityReport;
use chrono::NaiveDateTime;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Service: Parse a test log with the configured header literal.
pub fn load_log<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> CpkResult<ParsedLog> {
    let log = records::load_records(path, &config.header_prefix)?;
    info!(
        "Loaded {} test records ({} rows skipped)",
        log.records.len(),
        log.skipped_total()
    );
    Ok(log)
}

/// Service: Pick one record by zero-based index or by case-insensitive
/// item-name substring. With neither, the first record is returned.
pub fn select_record<'a>(
    records: &'a [TestRecord],
    item: Option<&str>,
    index: Option<usize>,
) -> CpkResult<&'a TestRecord> {
    if let Some(i) = index {
        return records
            .get(i)
            .ok_or_else(|| CpkError::RecordNotFound(format!("#{}", i)));
    }
    match item {
        Some(filter) => {
            let needle = filter.to_lowercase();
            records
                .iter()
                .find(|r| r.item_name.to_lowercase().contains(&needle))
                .ok_or_else(|| CpkError::RecordNotFound(filter.to_string()))
        }
        None => records
            .first()
            .ok_or_else(|| CpkError::RecordNotFound("<first record>".to_string())),
    }
}

pub fn analyzer_for(config: &AnalysisConfig) -> CapabilityAnalyzer {
    CapabilityAnalyzer::new(config.std_dev_mode())
}

/// Detailed analysis plus chart data for one record. Chart data is `None`
/// when the readings have no variation.
pub struct Analysis {
    pub result: CapabilityResult,
    pub report: CapabilityReport,
    pub chart: Option<ChartGeometry>,
}

pub fn analyze_record(
    record: &TestRecord,
    config: &AnalysisConfig,
    analyzed_at: NaiveDateTime,
) -> CpkResult<Analysis> {
    let result = analyzer_for(config).analyze_record(record)?;
    let chart = match ChartGeometry::build(&result, config.bin_count, config.curve_points) {
        Ok(geometry) => Some(geometry),
        Err(CpkError::NoVariation) => None,
        Err(e) => return Err(e),
    };
    let report = CapabilityReport::new(&result, analyzed_at);
    Ok(Analysis {
        result,
        report,
        chart,
    })
}

pub struct BatchEntry {
    pub index: usize,
    pub item_name: String,
    pub verdict: QuickVerdict,
    pub outcome: CpkResult<CapabilityResult>,
}

/// Analyzes every record independently and in parallel. Failures stay
/// attached to their record.
pub fn analyze_all(records: &[TestRecord], config: &AnalysisConfig) -> Vec<BatchEntry> {
    let analyzer = analyzer_for(config);
    records
        .par_iter()
        .enumerate()
        .map(|(index, record)| BatchEntry {
            index,
            item_name: record.item_name.clone(),
            verdict: quick_evaluate(record),
            outcome: analyzer.analyze_record(record),
        })
        .collect()
}

pub fn preview_all(records: &[TestRecord]) -> Vec<RecordPreview> {
    records.par_iter().map(RecordPreview::from_record).collect()
}
