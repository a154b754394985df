//! Tests for the filter DSL

use super::*;
use crate::error::Error;
use crate::schema::FieldType;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// Key Parser Tests
// ============================================================================

#[test]
fn test_parse_where_without_operator() {
    let directive = parse_key("where__title").unwrap().unwrap();
    assert_eq!(
        directive,
        Directive::Where {
            field: "title".to_string(),
            operator: None
        }
    );
    assert_eq!(directive.field(), "title");
    assert_eq!(directive.operator(), Some(Operator::Equal));
}

#[test]
fn test_parse_where_with_operator() {
    let directive = parse_key("where__id__more_than").unwrap().unwrap();
    assert_eq!(
        directive,
        Directive::Where {
            field: "id".to_string(),
            operator: Some(Operator::MoreThan)
        }
    );
}

#[test]
fn test_parse_order() {
    let directive = parse_key("order__createdAt").unwrap().unwrap();
    assert_eq!(
        directive,
        Directive::Order {
            field: "createdAt".to_string()
        }
    );
    assert_eq!(directive.operator(), None);
}

#[test_case("take" ; "take")]
#[test_case("page" ; "page")]
#[test_case("whereabouts" ; "prefix without delimiter")]
#[test_case("ordering__x" ; "similar prefix")]
#[test_case("foo__where__id" ; "prefix not at start")]
fn test_non_directive_keys_are_ignored(key: &str) {
    assert!(parse_key(key).unwrap().is_none());
}

#[test_case("where__id__more_than__x" ; "four segments")]
#[test_case("where__a__b__c__d" ; "five segments")]
#[test_case("order__createdAt__desc" ; "order with operator")]
#[test_case("where__" ; "empty field")]
#[test_case("where____more_than" ; "empty field with operator")]
#[test_case("where__title__" ; "empty operator")]
#[test_case("order__" ; "empty order field")]
#[test_case("where__like count" ; "invalid identifier")]
fn test_malformed_keys(key: &str) {
    match parse_key(key) {
        Err(Error::MalformedFilterKey { key: reported }) => assert_eq!(reported, key),
        other => panic!("Expected MalformedFilterKey for {key}, got {other:?}"),
    }
}

#[test]
fn test_unknown_operator_rejected_at_parse() {
    match parse_key("where__title__fuzzy_match") {
        Err(Error::UnknownOperator { operator }) => assert_eq!(operator, "fuzzy_match"),
        other => panic!("Expected UnknownOperator, got {other:?}"),
    }
}

// ============================================================================
// Operator Registry Tests
// ============================================================================

#[test]
fn test_operator_tokens_round_trip() {
    for op in Operator::ALL {
        assert_eq!(Operator::resolve(op.token()).unwrap(), op);
        assert_eq!(op.token().parse::<Operator>().unwrap(), op);
    }
}

#[test]
fn test_resolve_unknown_operator() {
    assert!(matches!(
        Operator::resolve("MoreThan"),
        Err(Error::UnknownOperator { .. })
    ));
}

#[test_case(Operator::Equal, "5", Predicate::Equals(FilterValue::Integer(5)) ; "equal")]
#[test_case(Operator::Not, "5", Predicate::Not(FilterValue::Integer(5)) ; "not")]
#[test_case(Operator::MoreThan, " 5 ", Predicate::MoreThan(FilterValue::Integer(5)) ; "more than trims")]
#[test_case(Operator::LessThanOrEqual, "9", Predicate::LessThanOrEqual(FilterValue::Integer(9)) ; "less than or equal")]
#[test_case(Operator::Between, "3,7", Predicate::Between(FilterValue::Integer(3), FilterValue::Integer(7)) ; "between")]
#[test_case(Operator::In, "1, 2,3", Predicate::In(vec![FilterValue::Integer(1), FilterValue::Integer(2), FilterValue::Integer(3)]) ; "in")]
fn test_build_integer_predicates(op: Operator, raw: &str, expected: Predicate) {
    let predicate = op.build("likeCount", FieldType::Integer, raw).unwrap();
    assert_eq!(predicate, expected);
    assert_eq!(predicate.operator(), op);
}

#[test_case("3" ; "one value")]
#[test_case("3,5,7" ; "three values")]
#[test_case("" ; "empty")]
fn test_between_arity(raw: &str) {
    match Operator::Between.build("id", FieldType::Integer, raw) {
        Err(Error::InvalidOperatorArity {
            operator, found, ..
        }) => {
            assert_eq!(operator, "between");
            assert_eq!(found, raw.split(',').count());
        }
        other => panic!("Expected InvalidOperatorArity, got {other:?}"),
    }
}

#[test]
fn test_in_requires_a_value() {
    assert!(matches!(
        Operator::In.build("id", FieldType::Integer, " , "),
        Err(Error::InvalidOperatorArity { found: 0, .. })
    ));
}

#[test]
fn test_like_only_on_text() {
    let predicate = Operator::ILike
        .build("title", FieldType::Text, "Rust")
        .unwrap();
    assert_eq!(
        predicate,
        Predicate::Like {
            needle: "Rust".to_string(),
            case_insensitive: true
        }
    );
    assert_eq!(predicate.operator(), Operator::ILike);

    assert!(matches!(
        Operator::Like.build("likeCount", FieldType::Integer, "1"),
        Err(Error::OperatorNotSupported { .. })
    ));
}

#[test_case(FieldType::Integer, "abc" ; "integer")]
#[test_case(FieldType::Float, "1.2.3" ; "float")]
#[test_case(FieldType::Boolean, "maybe" ; "boolean")]
#[test_case(FieldType::Timestamp, "yesterday" ; "timestamp")]
fn test_invalid_values(field_type: FieldType, raw: &str) {
    assert!(matches!(
        Operator::Equal.build("f", field_type, raw),
        Err(Error::InvalidFilterValue { .. })
    ));
}

// ============================================================================
// Value & Predicate Evaluation Tests
// ============================================================================

#[test]
fn test_timestamp_formats() {
    let expected = parse_timestamp("2024-03-01T00:00:00Z").unwrap();
    assert_eq!(parse_timestamp("2024-03-01"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01T00:00:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01 00:00:00.000"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01T09:00:00+09:00"), Some(expected));
    assert_eq!(parse_timestamp("not a date"), None);
}

#[test]
fn test_between_matches_inclusive_range() {
    let predicate = Operator::Between
        .build("id", FieldType::Integer, "3,7")
        .unwrap();

    let matched: Vec<i64> = (0..10).filter(|i| predicate.matches(&json!(i))).collect();
    assert_eq!(matched, vec![3, 4, 5, 6, 7]);
}

#[test]
fn test_comparisons() {
    let more = Predicate::MoreThan(FilterValue::Integer(5));
    assert!(more.matches(&json!(6)));
    assert!(!more.matches(&json!(5)));
    assert!(more.matches(&json!(5.5)));

    let less_eq = Predicate::LessThanOrEqual(FilterValue::Float(1.5));
    assert!(less_eq.matches(&json!(1.5)));
    assert!(!less_eq.matches(&json!(2)));

    let not = Predicate::Not(FilterValue::Text("draft".to_string()));
    assert!(not.matches(&json!("published")));
    assert!(!not.matches(&json!("draft")));
}

#[test]
fn test_null_never_matches() {
    assert!(!Predicate::Not(FilterValue::Integer(1)).matches(&json!(null)));
    assert!(!Predicate::Equals(FilterValue::Boolean(false)).matches(&json!(null)));
}

#[test]
fn test_like_matching() {
    let i_like = Predicate::Like {
        needle: "rust".to_string(),
        case_insensitive: true,
    };
    assert!(i_like.matches(&json!("Learning Rust in 2024")));
    assert!(!i_like.matches(&json!("Learning Go")));
    assert!(!i_like.matches(&json!(42)));

    let like = Predicate::Like {
        needle: "rust".to_string(),
        case_insensitive: false,
    };
    assert!(!like.matches(&json!("Learning Rust")));
    assert!(like.matches(&json!("rusty")));
}

#[test]
fn test_timestamp_comparison_against_record_string() {
    let predicate = Operator::MoreThan
        .build("createdAt", FieldType::Timestamp, "2024-01-01")
        .unwrap();
    assert!(predicate.matches(&json!("2024-01-02T10:00:00Z")));
    assert!(!predicate.matches(&json!("2023-12-31T23:59:59Z")));
    assert!(!predicate.matches(&json!("garbage")));
}

#[test]
fn test_boolean_values() {
    let predicate = Operator::Equal
        .build("published", FieldType::Boolean, "TRUE")
        .unwrap();
    assert!(predicate.matches(&json!(true)));
    assert!(!predicate.matches(&json!(false)));
}
