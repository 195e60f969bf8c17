use chrono::NaiveDate;
use cpk_forge::api::{analyze_all, analyze_record, load_log, preview_all, select_record};
use cpk_forge::capability::{QuickVerdict, ZeroVariation};
use cpk_forge::config::AnalysisConfig;
use cpk_forge::error::CpkError;
use cpk_forge::records::{parse_str, TestRecord, DEFAULT_HEADER_PREFIX};
use std::io::Write;

const LOG: &str = "\
STEP ITEM,SPEC,S1,S2,S3,S4,S5,UNIT
1.0,Width,9~11,9.8,10.0,10.2,9.9,10.1,mm
Height,4~6,5,5,5,5,0,mm
2.0,Voltage,3.2~3.4,3.3,0,0,0,0,V
Gap,5~1,1,2,3,4,5,mm
";

fn records() -> Vec<TestRecord> {
    parse_str(LOG, DEFAULT_HEADER_PREFIX).records
}

#[test]
fn test_select_by_index_substring_and_default() {
    let recs = records();

    assert_eq!(select_record(&recs, None, Some(1)).unwrap().item_name, "Height");
    assert_eq!(select_record(&recs, Some("VOLT"), None).unwrap().item_name, "Voltage");
    assert_eq!(select_record(&recs, None, None).unwrap().item_name, "Width");

    let err = select_record(&recs, None, Some(99)).unwrap_err();
    assert!(matches!(err, CpkError::RecordNotFound(_)));
    let err = select_record(&recs, Some("torque"), None).unwrap_err();
    assert!(matches!(err, CpkError::RecordNotFound(_)));
    let err = select_record(&[], None, None).unwrap_err();
    assert!(matches!(err, CpkError::RecordNotFound(_)));
}

#[test]
fn test_analyze_record_bundles_chart() {
    let recs = records();
    let at = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();

    let analysis = analyze_record(&recs[0], &AnalysisConfig::default(), at).unwrap();
    assert!(analysis.result.is_capable);
    assert_eq!(analysis.report.item_name, "Width");
    assert_eq!(analysis.report.analyzed_at, at);
    let chart = analysis.chart.unwrap();
    assert_eq!(chart.histogram.bins.len(), 20);
}

#[test]
fn test_analyze_record_without_variation_has_no_chart() {
    let recs = records();
    let at = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let analysis = analyze_record(&recs[1], &AnalysisConfig::default(), at).unwrap();
    assert_eq!(analysis.result.zero_variation, Some(ZeroVariation::Within));
    assert!(analysis.chart.is_none());
}

#[test]
fn test_batch_keeps_failures_per_record() {
    let recs = records();
    let entries = analyze_all(&recs, &AnalysisConfig::default());

    assert_eq!(entries.len(), 4);
    let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    assert!(entries[0].outcome.is_ok());
    assert_eq!(entries[0].verdict, QuickVerdict::VeryGood);

    assert!(entries[1].outcome.as_ref().unwrap().zero_variation.is_some());
    assert_eq!(entries[1].verdict, QuickVerdict::Perfect);

    assert!(matches!(
        entries[2].outcome,
        Err(CpkError::InsufficientData { n: 1 })
    ));
    assert_eq!(entries[2].verdict, QuickVerdict::InsufficientData);

    assert!(matches!(entries[3].outcome, Err(CpkError::InvalidSpec { .. })));
    assert_eq!(entries[3].verdict, QuickVerdict::Inadequate);
}

#[test]
fn test_preview_all_matches_records() {
    let recs = records();
    let previews = preview_all(&recs);
    assert_eq!(previews.len(), recs.len());
    assert_eq!(previews[1].sample_count, 4);
}

#[test]
fn test_load_log_respects_header_prefix() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", LOG).unwrap();

    let config = AnalysisConfig::default();
    let log = load_log(file.path(), &config).unwrap();
    assert_eq!(log.records.len(), 4);
    assert_eq!(log.skipped_total(), 1);
}
