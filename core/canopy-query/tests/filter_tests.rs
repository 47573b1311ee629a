use canopy_query::{parse_filter, parse_filters, QueryError};
use canopy_store::FilterOperator;
use canopy_types::{Key, PropertyValue};
use pretty_assertions::assert_eq;

// ── Grammar ─────────────────────────────────────────────────────────────────

#[test]
fn parses_a_long_comparison() {
    let predicate = parse_filter("age > Long(21)").unwrap();
    assert_eq!(predicate.field, "age");
    assert_eq!(predicate.op, FilterOperator::GreaterThan);
    assert_eq!(predicate.value, PropertyValue::Integer(21));
}

#[test]
fn parses_a_string_equality() {
    let predicate = parse_filter("name = String(Bob)").unwrap();
    assert_eq!(predicate.field, "name");
    assert_eq!(predicate.op, FilterOperator::Equal);
    assert_eq!(predicate.value, PropertyValue::String("Bob".to_string()));
}

#[test]
fn parses_every_operator_symbol() {
    for (symbol, op) in [
        ("<", FilterOperator::LessThan),
        ("<=", FilterOperator::LessThanOrEqual),
        (">", FilterOperator::GreaterThan),
        (">=", FilterOperator::GreaterThanOrEqual),
        ("=", FilterOperator::Equal),
        ("!=", FilterOperator::NotEqual),
    ] {
        let predicate = parse_filter(&format!("age {symbol} Long(1)")).unwrap();
        assert_eq!(predicate.op, op, "symbol {symbol}");
    }
}

#[test]
fn fields_may_contain_spaces() {
    let predicate = parse_filter("postal address = String(1 Main St)").unwrap();
    assert_eq!(predicate.field, "postal address");
}

#[test]
fn kind_names_match_case_insensitively() {
    assert!(parse_filter("age > long(21)").is_ok());
    assert!(parse_filter("age > LONG(21)").is_ok());
    assert!(parse_filter("name = STRING(x)").is_ok());
    assert!(parse_filter("ok = boolean(true)").is_ok());
}

#[test]
fn boolean_and_email_values_decode_to_their_kinds() {
    let predicate = parse_filter("active = Boolean(TRUE)").unwrap();
    assert_eq!(predicate.value, PropertyValue::Boolean(true));

    let predicate = parse_filter("contact = Email(a@b.example)").unwrap();
    assert_eq!(predicate.value, PropertyValue::Email("a@b.example".to_string()));
}

#[test]
fn null_filters_take_an_empty_value() {
    let predicate = parse_filter("gone = Null()").unwrap();
    assert_eq!(predicate.value, PropertyValue::Null);
    assert!(parse_filter("gone = Null(x)").is_err());
}

// ── Rejections ──────────────────────────────────────────────────────────────

#[test]
fn rejects_kinds_outside_the_whitelist() {
    // DATETIME is a registry kind, but not a filter kind.
    let err = parse_filter("when > Datetime(2024-01-01T00:00:00Z)").unwrap_err();
    assert!(matches!(err, QueryError::FilterFormat(_)));
    assert!(parse_filter("age > Rating(5)").is_err());
    assert!(parse_filter("age > Widget(5)").is_err());
}

#[test]
fn rejects_strings_without_the_shape() {
    for filter in ["", "age", "age > 21", "age Long(21)", "age > Long(21) "] {
        assert!(
            matches!(parse_filter(filter), Err(QueryError::FilterFormat(_))),
            "`{filter}` should be a format error"
        );
    }
}

#[test]
fn format_errors_name_the_offending_string() {
    let err = parse_filter("totally wrong").unwrap_err();
    assert!(err.to_string().contains("totally wrong"));
}

#[test]
fn rejects_unknown_operator_runs() {
    let err = parse_filter("age == Long(21)").unwrap_err();
    assert!(matches!(err, QueryError::UnknownOperator(ref s) if s == "=="));
    assert!(parse_filter("age <> Long(21)").is_err());
}

#[test]
fn value_decode_failures_carry_through() {
    let err = parse_filter("age > Long(twenty)").unwrap_err();
    assert!(matches!(err, QueryError::Value(_)));
}

// ── Key filters ─────────────────────────────────────────────────────────────

#[test]
fn key_values_use_the_path_grammar() {
    let predicate = parse_filter("owner = Key(Person(42))").unwrap();
    assert_eq!(predicate.value, PropertyValue::Key(Key::with_id("Person", 42)));
}

#[test]
fn key_values_may_carry_ancestor_paths() {
    let predicate = parse_filter("owner = Key(Org(1)/Person(2))").unwrap();
    let expected = Key::with_id("Org", 1).child_with_id("Person", 2);
    assert_eq!(predicate.value, PropertyValue::Key(expected));
}

#[test]
fn key_field_overrides_the_declared_kind() {
    // Whatever the caller wrote, __key__ comparisons parse as keys.
    let predicate = parse_filter("__key__ = String(Person(42))").unwrap();
    assert_eq!(predicate.field, "__key__");
    assert_eq!(predicate.value, PropertyValue::Key(Key::with_id("Person", 42)));
}

#[test]
fn key_field_with_key_kind_parses_too() {
    let predicate = parse_filter("__key__ >= Key(Person(42))").unwrap();
    assert_eq!(predicate.op, FilterOperator::GreaterThanOrEqual);
    assert_eq!(predicate.value, PropertyValue::Key(Key::with_id("Person", 42)));
}

#[test]
fn named_keys_in_filters_are_unsupported() {
    let err = parse_filter("__key__ = Key(Person(\"bob\"))").unwrap_err();
    assert!(err.to_string().contains("not supported yet"));
}

// ── Batches ─────────────────────────────────────────────────────────────────

#[test]
fn parses_each_filter_in_order() {
    let filters = vec![
        "age > Long(21)".to_string(),
        "age < Long(65)".to_string(),
        "name != String(root)".to_string(),
    ];
    let predicates = parse_filters(&filters).unwrap();
    assert_eq!(predicates.len(), 3);
    assert_eq!(predicates[0].field, "age");
    assert_eq!(predicates[2].op, FilterOperator::NotEqual);
}

#[test]
fn one_bad_filter_fails_the_batch() {
    let filters = vec!["age > Long(21)".to_string(), "broken".to_string()];
    assert!(parse_filters(&filters).is_err());
}

#[test]
fn no_filters_parse_to_no_predicates() {
    assert!(parse_filters(&[]).unwrap().is_empty());
}
