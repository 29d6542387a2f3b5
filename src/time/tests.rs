use super::*;
use crate::catalog::{classify, AttributeSpec, AxisKind, DeclaredType, VariableDescriptor};

fn component(key: &str, kind: TimeComponentKind, format: &str) -> VariableDescriptor {
    VariableDescriptor::new(key, key, DeclaredType::Text, Role::time_component(kind, format))
}

fn detect(descriptors: &[VariableDescriptor]) -> Result<TimeMode, TimeAxisError> {
    let classification = classify(descriptors).unwrap();
    TimeMode::detect(&classification)
}

#[test]
fn test_detect_relative_time() {
    let descriptors = vec![VariableDescriptor::new(
        "t",
        "elapsed",
        DeclaredType::Integer,
        Role::coordinate(AxisKind::Time),
    )
    .with_attribute(AttributeSpec::text("units", "days since 2000-01-01"))];
    let mode = detect(&descriptors).unwrap();
    assert!(!mode.is_synthesized());
    assert_eq!(mode.variable_name(), "elapsed");

    let table = ParsedTable::from_str_columns(&[("t", &["0", "1"][..])]).unwrap();
    let axis = synthesize(&mode, &table, IntegerWidth::I32).unwrap();
    assert_eq!(axis.units, "days since 2000-01-01");
    assert_eq!(
        axis.source,
        TimeSource::Column {
            source_key: "t".to_string()
        }
    );
}

#[test]
fn test_relative_time_requires_units() {
    let descriptors = vec![VariableDescriptor::new(
        "t",
        "elapsed",
        DeclaredType::Float,
        Role::coordinate(AxisKind::Time),
    )];
    assert!(matches!(
        detect(&descriptors),
        Err(TimeAxisError::MissingUnits(name)) if name == "elapsed"
    ));
}

#[test]
fn test_detect_rejects_bad_combinations() {
    let no_time = vec![VariableDescriptor::new("x", "x", DeclaredType::Float, Role::Data)];
    assert!(matches!(detect(&no_time), Err(TimeAxisError::NoTimeInformation)));

    let two_dates = vec![
        component("d1", TimeComponentKind::DateOnly, "yyyy-MM-dd"),
        component("d2", TimeComponentKind::DateOnly, "yyyy-MM-dd"),
    ];
    assert!(matches!(
        detect(&two_dates),
        Err(TimeAxisError::TooManyTimeComponents { .. })
    ));

    let mixed = vec![
        component("full", TimeComponentKind::FullDateTime, "yyyy-MM-dd HH:mm"),
        component("d", TimeComponentKind::DateOnly, "yyyy-MM-dd"),
    ];
    assert!(matches!(
        detect(&mixed),
        Err(TimeAxisError::TooManyTimeComponents { .. })
    ));

    let time_only = vec![component("clock", TimeComponentKind::TimeOnly, "HH:mm")];
    assert!(matches!(
        detect(&time_only),
        Err(TimeAxisError::MissingDateComponent(name)) if name == "clock"
    ));

    let no_format = vec![component("d", TimeComponentKind::DateOnly, "")];
    assert!(matches!(detect(&no_format), Err(TimeAxisError::MissingFormat(_))));
}

#[test]
fn test_full_datetime_synthesis() {
    let descriptors = vec![component(
        "when",
        TimeComponentKind::FullDateTime,
        "yyyy-MM-dd'T'HH:mm:ss",
    )];
    let mode = detect(&descriptors).unwrap();
    assert_eq!(mode.variable_name(), "time");

    let table = ParsedTable::from_str_columns(&[(
        "when",
        &["1970-01-01T00:00:00", "1970-01-01T00:01:00"][..],
    )])
    .unwrap();
    let axis = synthesize(&mode, &table, IntegerWidth::I32).unwrap();
    assert_eq!(axis.units, SYNTHESIZED_TIME_UNITS);
    assert_eq!(
        axis.synthesized_values(),
        Some(&TimeValues::Int32(vec![0, 60]))
    );
}

#[test]
fn test_date_and_time_are_combined() {
    let descriptors = vec![
        component("clock", TimeComponentKind::TimeOnly, "HH:mm"),
        component("day", TimeComponentKind::DateOnly, "dd/MM/yyyy"),
    ];
    let mode = detect(&descriptors).unwrap();
    let table = ParsedTable::from_str_columns(&[
        ("clock", &["00:00", "12:30"][..]),
        ("day", &["01/01/1970", "02/01/1970"][..]),
    ])
    .unwrap();
    let axis = synthesize(&mode, &table, IntegerWidth::I64).unwrap();
    assert_eq!(
        axis.synthesized_values(),
        Some(&TimeValues::Int64(vec![0, 86_400 + 12 * 3600 + 30 * 60]))
    );
}

#[test]
fn test_hour_only_time_column_keeps_hour() {
    let descriptors = vec![
        component("day", TimeComponentKind::DateOnly, "yyyy-MM-dd"),
        component("hour", TimeComponentKind::TimeOnly, "HH"),
    ];
    let mode = detect(&descriptors).unwrap();
    let table = ParsedTable::from_str_columns(&[
        ("day", &["2020-01-01", "2020-01-01"][..]),
        ("hour", &["05", "23"][..]),
    ])
    .unwrap();
    let axis = synthesize(&mode, &table, IntegerWidth::I64).unwrap();
    assert_eq!(
        axis.synthesized_values(),
        Some(&TimeValues::Int64(vec![1_577_854_800, 1_577_919_600]))
    );
}

#[test]
fn test_date_only_is_midnight() {
    let descriptors = vec![component("day", TimeComponentKind::DateOnly, "yyyy-MM-dd")];
    let mode = detect(&descriptors).unwrap();
    let table = ParsedTable::from_str_columns(&[("day", &["1970-01-03"][..])]).unwrap();
    let axis = synthesize(&mode, &table, IntegerWidth::I32).unwrap();
    assert_eq!(axis.synthesized_values().and_then(|v| v.get(0)), Some(172_800));
}

#[test]
fn test_parse_error_names_row_and_text() {
    let descriptors = vec![component("when", TimeComponentKind::FullDateTime, "yyyy-MM-dd HH:mm")];
    let mode = detect(&descriptors).unwrap();
    let table =
        ParsedTable::from_str_columns(&[("when", &["1970-01-01 00:00", "yesterday"][..])]).unwrap();
    match synthesize(&mode, &table, IntegerWidth::I32) {
        Err(TimeAxisError::Parse {
            column, row, text, ..
        }) => {
            assert_eq!(column, "when");
            assert_eq!(row, 1);
            assert_eq!(text, "yesterday");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_overflow_in_32_bit_mode() {
    let descriptors = vec![component("day", TimeComponentKind::DateOnly, "yyyy-MM-dd")];
    let mode = detect(&descriptors).unwrap();
    let table = ParsedTable::from_str_columns(&[("day", &["2000-01-01", "2100-01-01"][..])]).unwrap();

    assert!(matches!(
        synthesize(&mode, &table, IntegerWidth::I32),
        Err(TimeAxisError::Overflow { row: 1, .. })
    ));
    let wide = synthesize(&mode, &table, IntegerWidth::I64).unwrap();
    assert_eq!(wide.synthesized_values().map(TimeValues::nc_type), Some(NcType::Int64));
}

#[test]
fn test_missing_time_column() {
    let descriptors = vec![component("when", TimeComponentKind::FullDateTime, "yyyy")];
    let mode = detect(&descriptors).unwrap();
    let table = ParsedTable::from_str_columns(&[("other", &["2000"][..])]).unwrap();
    assert!(matches!(
        synthesize(&mode, &table, IntegerWidth::I32),
        Err(TimeAxisError::MissingColumn(key)) if key == "when"
    ));
}

#[test]
fn test_extrema() {
    let values = TimeValues::Int32(vec![30, -5, 12]);
    assert_eq!(values.extrema(), Some((-5, 30)));
    assert_eq!(TimeValues::Int64(vec![]).extrema(), None);
}
