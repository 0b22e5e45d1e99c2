//! Filter tests

use std::borrow::Cow;
use std::path::PathBuf;

use logtee_record::Record;

use crate::{Destination, Filter, FilterError, FilterParseError};

fn record(line: &str) -> Record {
    Record::from_line(line).unwrap()
}

#[test]
fn test_parse_match_all() {
    let filter = Filter::parse(":everything.log").unwrap();
    assert_eq!(
        filter.destination(),
        &Destination::File(PathBuf::from("everything.log"))
    );

    let rec = record(r#"{"component":"anything","type":"msg"}"#);
    assert!(matches!(
        filter.evaluate(&rec).unwrap(),
        Some(Cow::Borrowed(_))
    ));
}

#[test]
fn test_parse_stdout_destination() {
    let filter = Filter::parse("scanner:-").unwrap();
    assert!(filter.is_stdout());
}

#[test]
fn test_parse_destination_with_colons() {
    // Only the first ':' splits; the rest belongs to the path.
    let filter = Filter::parse("scanner:logs:archive:out.log").unwrap();
    assert_eq!(
        filter.destination(),
        &Destination::File(PathBuf::from("logs:archive:out.log"))
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        Filter::parse("no-destination"),
        Err(FilterParseError::MissingDestination(_))
    ));
    assert!(matches!(
        Filter::parse("scanner:"),
        Err(FilterParseError::MissingDestination(_))
    ));
    assert!(matches!(
        Filter::parse("scanner,,parser:out.log"),
        Err(FilterParseError::EmptyMatcher(_))
    ));
    assert!(matches!(
        Filter::parse("type=:out.log"),
        Err(FilterParseError::EmptyMatcher(_))
    ));
    assert!(matches!(
        Filter::parse("scanner%:out.log"),
        Err(FilterParseError::EmptyProjection(_))
    ));
    assert!(matches!(
        Filter::parse("scanner%a,,b:out.log"),
        Err(FilterParseError::EmptyProjection(_))
    ));
}

#[test]
fn test_bare_token_matches_component() {
    let filter = Filter::parse("scanner:out.log").unwrap();

    let hit = record(r#"{"component":"scanner","type":"msg"}"#);
    assert!(filter.evaluate(&hit).unwrap().is_some());

    let miss = record(r#"{"component":"parser","type":"msg"}"#);
    assert!(filter.evaluate(&miss).unwrap().is_none());
}

#[test]
fn test_same_key_matchers_or_together() {
    let filter = Filter::parse("scanner,parser:out.log").unwrap();

    for comp in ["scanner", "parser"] {
        let rec = record(&format!(r#"{{"component":"{comp}"}}"#));
        assert!(filter.evaluate(&rec).unwrap().is_some(), "{comp} should match");
    }

    let miss = record(r#"{"component":"other"}"#);
    assert!(filter.evaluate(&miss).unwrap().is_none());
}

#[test]
fn test_distinct_keys_and_together() {
    let filter = Filter::parse("scanner,type=msg:out.log").unwrap();

    let both = record(r#"{"component":"scanner","type":"msg"}"#);
    assert!(filter.evaluate(&both).unwrap().is_some());

    let wrong_type = record(r#"{"component":"scanner","type":"trace"}"#);
    assert!(filter.evaluate(&wrong_type).unwrap().is_none());

    let wrong_component = record(r#"{"component":"parser","type":"msg"}"#);
    assert!(filter.evaluate(&wrong_component).unwrap().is_none());
}

#[test]
fn test_numeric_and_bool_matching() {
    let filter = Filter::parse("priority=3:errors.log").unwrap();
    let hit = record(r#"{"component":"x","priority":3}"#);
    assert!(filter.evaluate(&hit).unwrap().is_some());
    let miss = record(r#"{"component":"x","priority":6}"#);
    assert!(filter.evaluate(&miss).unwrap().is_none());

    let filter = Filter::parse("final=true:out.log").unwrap();
    let hit = record(r#"{"final":true}"#);
    assert!(filter.evaluate(&hit).unwrap().is_some());
}

#[test]
fn test_missing_field_rejects() {
    let filter = Filter::parse("type=msg:out.log").unwrap();
    let rec = record(r#"{"component":"scanner"}"#);
    assert_eq!(filter.evaluate(&rec).unwrap(), None);
}

#[test]
fn test_structured_field_is_predicate_failure() {
    let filter = Filter::parse("data=x:out.log").unwrap();
    let rec = record(r#"{"data":["a","b"]}"#);
    assert_eq!(
        filter.evaluate(&rec),
        Err(FilterError::Unmatchable("data".to_string()))
    );
}

#[test]
fn test_projection_keeps_transformed_copy() {
    let filter = Filter::parse("scanner%timestamp,data:out.log").unwrap();
    let rec = record(
        r#"{"timestamp":"2020-04-02T12:48:08.906523","component":"scanner","type":"msg","data":"hi"}"#,
    );

    let kept = filter.evaluate(&rec).unwrap().unwrap();
    let Cow::Owned(projected) = kept else {
        panic!("projection should produce an owned record");
    };
    let names: Vec<&str> = projected.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["timestamp", "data"]);
    // The source record is untouched.
    assert_eq!(rec.len(), 4);
}

#[test]
fn test_evaluation_is_pure() {
    let filter = Filter::parse("scanner:out.log").unwrap();
    let rec = record(r#"{"component":"scanner"}"#);
    for _ in 0..3 {
        assert!(filter.evaluate(&rec).unwrap().is_some());
    }
    assert_eq!(rec.len(), 1);
}
