use cpk_forge::records::{
    load_records, parse_reader, parse_str, SkipReason, DEFAULT_HEADER_PREFIX,
};
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE_LOG: &str = "\
[Test Log]
STEP ITEM,SPEC,S1,S2,S3,UNIT
1.0,Width,Outer,10~20,15,16,14,mm
Height,5~6,5.5,5.6,0,mm
2.0,Voltage,3.2~3.4,0,0,0,V
Current,0.1~0.2,0.15,bad,0.16,A
Broken,line
NoSpec,a,b,c
";

#[test]
fn test_loader_parses_realistic_log() {
    let log = parse_str(SAMPLE_LOG, DEFAULT_HEADER_PREFIX);

    assert_eq!(log.records.len(), 3);
    assert_eq!(log.records[0].item_name, "Width Outer");
    assert_eq!(log.records[0].step, "1.0");
    assert_eq!(log.records[1].item_name, "Height");
    assert_eq!(log.records[1].step, "1.0");
    assert_eq!(log.records[1].readings(), vec![5.5, 5.6]);
    assert_eq!(log.records[2].item_name, "Current");
    assert_eq!(log.records[2].step, "2.0");
    assert_eq!(log.records[2].values, vec![0.15, 0.16]);
}

#[test]
fn test_loader_counts_skip_reasons() {
    let log = parse_str(SAMPLE_LOG, DEFAULT_HEADER_PREFIX);

    assert_eq!(log.lines_read, 8);
    assert_eq!(log.skipped_for(SkipReason::SectionMarker), 1);
    assert_eq!(log.skipped_for(SkipReason::Header), 1);
    assert_eq!(log.skipped_for(SkipReason::NoReadings), 1);
    assert_eq!(log.skipped_for(SkipReason::TooFewTokens), 1);
    assert_eq!(log.skipped_for(SkipReason::NoSpecToken), 1);
    assert_eq!(log.skipped_for(SkipReason::Unreadable), 0);
    assert_eq!(log.skipped_total() + log.records.len(), log.lines_read);
}

#[test]
fn test_loader_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1.0,WidthTest,10~20,15,16,14,mm").unwrap();
    writeln!(file, "Garbage").unwrap();

    let log = load_records(file.path(), DEFAULT_HEADER_PREFIX).unwrap();
    assert_eq!(log.records.len(), 1);
    assert_eq!(log.records[0].values, vec![15.0, 16.0, 14.0]);
}

#[test]
fn test_loader_handles_crlf() {
    let log = parse_str(
        "1.0,A,1~2,1.1,1.2,V\r\nB,1~2,1.3,1.4,V\r\n",
        DEFAULT_HEADER_PREFIX,
    );
    assert_eq!(log.records.len(), 2);
    assert_eq!(log.records[1].unit, "V");
    assert_eq!(log.records[1].step, "1.0");
}

#[test]
fn test_loader_missing_file_is_io_error() {
    let err = load_records("/definitely/not/here.csv", DEFAULT_HEADER_PREFIX).unwrap_err();
    assert!(err.to_string().starts_with("IO Error"));
}

#[test]
fn test_loader_keeps_rows_with_non_utf8_item_name() {
    // CP949-encoded item name.
    let log = parse_reader(
        &b"1.0,\xC6\xF8,9~11,9.8,10.0,10.2,mm\n"[..],
        DEFAULT_HEADER_PREFIX,
    );

    assert_eq!(log.records.len(), 1);
    assert_eq!(log.skipped_for(SkipReason::Unreadable), 0);
    let rec = &log.records[0];
    assert!(rec.item_name.contains('\u{FFFD}'));
    assert_eq!(rec.step, "1.0");
    assert_eq!(rec.values, vec![9.8, 10.0, 10.2]);
    assert_eq!(rec.unit, "mm");
}

#[test]
fn test_loader_drops_only_the_non_utf8_value_token() {
    let log = parse_reader(&b"X,9~11,\xff\xfe,10.0,mm\n"[..], DEFAULT_HEADER_PREFIX);

    assert_eq!(log.records.len(), 1);
    assert_eq!(log.records[0].item_name, "X");
    assert_eq!(log.records[0].values, vec![10.0]);
}

#[test]
fn test_loader_counts_empty_lines_as_blank() {
    let log = parse_str(
        "Short\n\n\n1.0,A,1~2,1.1,1.2,V\n   \nB,1~2,1.3,1.4,V",
        DEFAULT_HEADER_PREFIX,
    );

    assert_eq!(log.records.len(), 2);
    assert_eq!(log.lines_read, 6);
    assert_eq!(log.skipped_for(SkipReason::Blank), 3);
    assert_eq!(log.skipped_for(SkipReason::TooFewTokens), 1);
    assert_eq!(log.skipped_total() + log.records.len(), log.lines_read);
}

#[test]
fn test_loader_empty_input() {
    let log = parse_str("", DEFAULT_HEADER_PREFIX);
    assert!(log.records.is_empty());
    assert_eq!(log.skipped_total(), 0);
}
