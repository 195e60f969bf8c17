use cpk_forge::records::{RecordParser, SkipReason};
use cpk_forge::spec_limits::{is_spec_token, SpecBound};
use rstest::rstest;

// --- SPEC TOKENS ---

#[rstest]
#[case("10~20", true)]
#[case("-0.5~0.5", true)]
#[case(" 1.5 ~ 2 ", true)]
#[case("10-20", false)]
#[case("1~2~3", false)]
#[case("a~2", false)]
#[case("~2", false)]
#[case("1~", false)]
fn test_spec_token_classification(#[case] token: &str, #[case] expected: bool) {
    assert_eq!(is_spec_token(token), expected);
}

#[test]
fn test_spec_bound_parses_both_limits() {
    let spec = SpecBound::parse("9.5~10.5");
    assert_eq!(spec.lower_limit, 9.5);
    assert_eq!(spec.upper_limit, 10.5);
    assert_eq!(spec.raw_text, "9.5~10.5");
    assert!(spec.is_bounded());
    assert!(spec.contains(10.0));
    assert!(!spec.contains(10.6));
}

#[test]
fn test_spec_bound_falls_back_to_unbounded() {
    for token in ["", "nope", "1~x", "1~2~3"] {
        let spec = SpecBound::parse(token);
        assert_eq!(spec.lower_limit, f64::NEG_INFINITY, "token {:?}", token);
        assert_eq!(spec.upper_limit, f64::INFINITY, "token {:?}", token);
        assert!(!spec.has_lower());
        assert!(!spec.has_upper());
    }
}

#[test]
fn test_spec_bound_new_joins_numbers() {
    let spec = SpecBound::new(10.0, 20.5);
    assert_eq!(spec.raw_text, "10~20.5");
    assert_eq!(SpecBound::parse(&spec.raw_text), spec);
}

// --- LINE PARSER ---

#[test]
fn test_parse_line_with_step_header() {
    let mut parser = RecordParser::default();
    let rec = parser
        .parse_line("1.0,WidthTest,10~20,15,16,14,mm")
        .unwrap();

    assert_eq!(rec.step, "1.0");
    assert_eq!(rec.item_name, "WidthTest");
    assert_eq!(rec.spec_text, "10~20");
    assert_eq!(rec.spec.lower_limit, 10.0);
    assert_eq!(rec.spec.upper_limit, 20.0);
    assert_eq!(rec.values, vec![15.0, 16.0, 14.0]);
    assert_eq!(rec.unit, "mm");
}

#[test]
fn test_step_carries_over_to_following_lines() {
    let mut parser = RecordParser::default();
    parser.parse_line("1.0,Width,10~20,15,16,mm").unwrap();

    let rec = parser.parse_line("Height,Top,5~6,5.5,5.6,mm").unwrap();
    assert_eq!(rec.step, "1.0");
    assert_eq!(rec.item_name, "Height Top");

    let rec = parser.parse_line("2,Depth,1~3,2,2.1,mm").unwrap();
    assert_eq!(rec.step, "2");
    assert_eq!(rec.item_name, "Depth");
}

#[test]
fn test_step_updates_even_when_line_is_dropped() {
    let mut parser = RecordParser::default();
    assert_eq!(
        parser.parse_line("3.0,NoSpec,abc,def"),
        Err(SkipReason::NoSpecToken)
    );
    assert_eq!(parser.current_step(), "3.0");

    let rec = parser.parse_line("Item,1~2,1.5,1.6,V").unwrap();
    assert_eq!(rec.step, "3.0");
}

#[test]
fn test_unparseable_values_are_omitted() {
    let mut parser = RecordParser::default();
    let rec = parser.parse_line("A,1~2,1.5,x,1.7,V").unwrap();
    assert_eq!(rec.values, vec![1.5, 1.7]);
}

#[test]
fn test_empty_fields_and_whitespace_are_discarded() {
    let mut parser = RecordParser::default();
    let rec = parser.parse_line("A,,1~2, ,1.5,,V ").unwrap();
    assert_eq!(rec.values, vec![1.5]);
    assert_eq!(rec.unit, "V");
}

#[test]
fn test_zero_values_are_kept_but_not_read() {
    let mut parser = RecordParser::default();
    let rec = parser.parse_line("A,1~2,0,1.5,0,1.6,V").unwrap();
    assert_eq!(rec.values, vec![0.0, 1.5, 0.0, 1.6]);
    assert_eq!(rec.readings(), vec![1.5, 1.6]);
}

#[test]
fn test_spec_search_starts_after_step_token() {
    // "10~20" in the first column is a step; the spec is the next match.
    let mut parser = RecordParser::default();
    let rec = parser.parse_line("10~20,Gap,1~2,1.1,1.2,mm").unwrap();
    assert_eq!(rec.step, "10~20");
    assert_eq!(rec.item_name, "Gap");
    assert_eq!(rec.spec.lower_limit, 1.0);
}

#[rstest]
#[case("", SkipReason::Blank)]
#[case("   ", SkipReason::Blank)]
#[case(" , ,", SkipReason::Blank)]
#[case("STEP ITEM,SPEC,V1,V2,UNIT", SkipReason::Header)]
#[case("  STEP ITEM", SkipReason::Header)]
#[case("[Section 1],a,b,c", SkipReason::SectionMarker)]
#[case("Name,1~2,V", SkipReason::TooFewTokens)]
#[case("Name,Other,1.5,1.6,V", SkipReason::NoSpecToken)]
#[case("Name,1~2,0,0,V", SkipReason::NoReadings)]
#[case("Name,1~2,x,y,V", SkipReason::NoReadings)]
fn test_skip_reasons(#[case] line: &str, #[case] reason: SkipReason) {
    let mut parser = RecordParser::default();
    assert_eq!(parser.parse_line(line), Err(reason));
}

#[test]
fn test_custom_header_prefix() {
    let mut parser = RecordParser::new("#");
    assert_eq!(
        parser.parse_line("# comment,a,b,c"),
        Err(SkipReason::Header)
    );
    // The default literal is ordinary text now.
    assert_eq!(
        parser.parse_line("STEP ITEM,a,b,c"),
        Err(SkipReason::NoSpecToken)
    );
}
