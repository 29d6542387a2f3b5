use super::*;
use crate::catalog::{AttributeSpec, AxisKind, DeclaredType, Role, TimeComponentKind, VariableDescriptor};
use crate::matchup::{align, MatchupRequest, Observation, SeriesSet};
use crate::ncfile::{AttrValue, FileFormat, NcReader, NcType};
use crate::template::AttributeGroup;
use proptest::prelude::*;
use tempfile::tempdir;

fn float(key: &str, name: &str, role: Role) -> VariableDescriptor {
    VariableDescriptor::new(key, name, DeclaredType::Float, role)
}

fn trajectory_template() -> Template {
    let mut template = Template::new(vec![
        float("lat", "latitude", Role::coordinate(AxisKind::Latitude)),
        float("lon", "longitude", Role::coordinate(AxisKind::Longitude)),
        VariableDescriptor::new(
            "when",
            "when",
            DeclaredType::Text,
            Role::time_component(TimeComponentKind::FullDateTime, "yyyy-MM-dd'T'HH:mm:ss"),
        ),
        float("temp", "sea_water_temperature", Role::Data)
            .with_attribute(AttributeSpec::text("units", "degC")),
    ]);
    template.global_attributes =
        vec![AttributeGroup::new("general").with_attribute(AttributeSpec::text("title", "Cruise 12"))];
    template.feature_id = Some("cruise12".to_string());
    template
}

fn trajectory_table() -> ParsedTable {
    ParsedTable::from_str_columns(&[
        ("lat", &["10.0", "10.1"][..]),
        ("lon", &["-80.0", "-80.1"][..]),
        ("when", &["2020-01-01T00:00:00", "2020-01-01T01:00:00"][..]),
        ("temp", &["5.5", "4.25"][..]),
    ])
    .unwrap()
}

#[test]
fn test_trajectory_roundtrip() {
    let encoder = DsgEncoder::new();
    let bytes = encoder
        .encode_to_bytes(&trajectory_template(), &trajectory_table(), FeatureType::Trajectory)
        .unwrap();

    let reader = NcReader::from_bytes(bytes).unwrap();
    let header = reader.header();
    assert_eq!(header.format, FileFormat::Classic);
    assert_eq!(header.dimension("time").map(|d| d.len), Some(2));
    assert_eq!(
        header.global_attribute("featureType").and_then(AttrValue::as_text),
        Some("trajectory")
    );
    assert_eq!(
        header.global_attribute("title").and_then(AttrValue::as_text),
        Some("Cruise 12")
    );

    let temp = header.variable("sea_water_temperature").unwrap();
    assert_eq!(
        temp.attribute("coordinates").and_then(AttrValue::as_text),
        Some("time latitude longitude")
    );
    assert_eq!(header.dimension_names(temp), vec!["time".to_string()]);

    let time = header.variable("time").unwrap();
    assert_eq!(time.nc_type, NcType::Int);
    assert_eq!(time.attribute("axis").and_then(AttrValue::as_text), Some("T"));
    assert_eq!(
        reader.read_variable("time").unwrap(),
        VarData::Int(vec![1_577_836_800, 1_577_840_400])
    );
    assert_eq!(
        reader.read_variable("sea_water_temperature").unwrap(),
        VarData::Double(vec![5.5, 4.25])
    );

    let id = header.variable("trajectory").unwrap();
    assert_eq!(
        id.attribute("cf_role").and_then(AttrValue::as_text),
        Some("trajectory_id")
    );
    assert_eq!(
        reader.read_variable("trajectory").unwrap(),
        VarData::Char(b"cruise12".to_vec())
    );
}

#[test]
fn test_encode_writes_named_file() {
    let dir = tempdir().unwrap();
    let target = OutputTarget::new(dir.path(), "leg 2.csv");
    assert_eq!(target.file_name(), "leg_2.nc");

    let stats = DsgEncoder::new()
        .encode(&trajectory_template(), &trajectory_table(), FeatureType::Trajectory, &target)
        .unwrap();

    let path = dir.path().join("leg_2.nc");
    assert_eq!(stats.output_path.as_deref(), Some(path.as_path()));
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.bytes_written, std::fs::metadata(&path).unwrap().len());

    let reader = NcReader::open(&path).unwrap();
    assert!(reader.header().variable("sea_water_temperature").is_some());
    // Only the output file is left; the temporary file was renamed
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_bad_cell_leaves_no_file() {
    let dir = tempdir().unwrap();
    let table = ParsedTable::from_str_columns(&[
        ("lat", &["10.0", "10.1"][..]),
        ("lon", &["-80.0", "-80.1"][..]),
        ("when", &["2020-01-01T00:00:00", "2020-01-01T01:00:00"][..]),
        ("temp", &["5.5", "N/A"][..]),
    ])
    .unwrap();

    let err = DsgEncoder::new()
        .encode(
            &trajectory_template(),
            &table,
            FeatureType::Trajectory,
            &OutputTarget::new(dir.path(), "bad.csv"),
        )
        .unwrap_err();

    match &err {
        EncodingError::ConversionError(conversion) => {
            assert_eq!(conversion.column, "sea_water_temperature");
            assert_eq!(conversion.row, 1);
            assert_eq!(conversion.text, "N/A");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_resource_error());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_output_directory() {
    let dir = tempdir().unwrap();
    let target = OutputTarget::new(dir.path().join("absent"), "x.csv");
    let err = DsgEncoder::new()
        .encode(&trajectory_template(), &trajectory_table(), FeatureType::Trajectory, &target)
        .unwrap_err();
    assert!(matches!(err, EncodingError::OutputDirectoryMissing(_)));
    assert!(err.is_resource_error());
}

#[test]
fn test_empty_table_rejected() {
    let table = ParsedTable::from_str_columns(&[
        ("lat", &[][..]),
        ("lon", &[][..]),
        ("when", &[][..]),
        ("temp", &[][..]),
    ])
    .unwrap();
    let err = DsgEncoder::new()
        .encode_to_bytes(&trajectory_template(), &table, FeatureType::Trajectory)
        .unwrap_err();
    assert!(matches!(err, EncodingError::EmptyTable));
}

#[test]
fn test_missing_column_reported() {
    let table = ParsedTable::from_str_columns(&[
        ("lat", &["1"][..]),
        ("lon", &["2"][..]),
        ("when", &["2020-01-01T00:00:00"][..]),
    ])
    .unwrap();
    let err = DsgEncoder::new()
        .encode_to_bytes(&trajectory_template(), &table, FeatureType::Trajectory)
        .unwrap_err();
    match err {
        EncodingError::MissingColumn { name, source_key } => {
            assert_eq!(name, "sea_water_temperature");
            assert_eq!(source_key, "temp");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_relative_time_encoding_is_deterministic() {
    let template = Template::new(vec![
        VariableDescriptor::new("t", "time", DeclaredType::Integer, Role::coordinate(AxisKind::Time))
            .with_attribute(AttributeSpec::text("units", "seconds since 2000-01-01")),
        float("lat", "lat", Role::coordinate(AxisKind::Latitude)),
        float("lon", "lon", Role::coordinate(AxisKind::Longitude)),
        float("v", "salinity", Role::Data),
    ]);
    let table = ParsedTable::from_str_columns(&[
        ("t", &["0", "60", "120"][..]),
        ("lat", &["1", "2", "3"][..]),
        ("lon", &["4", "5", "6"][..]),
        ("v", &["35.1", "35.2", "35.3"][..]),
    ])
    .unwrap();

    let encoder = DsgEncoder::new();
    let first = encoder
        .encode_to_bytes(&template, &table, FeatureType::TimeSeries)
        .unwrap();
    let second = encoder
        .encode_to_bytes(&template, &table, FeatureType::TimeSeries)
        .unwrap();
    assert_eq!(first, second);

    let reader = NcReader::from_bytes(first).unwrap();
    let time = reader.header().variable("time").unwrap();
    assert_eq!(
        time.attribute("units").and_then(AttrValue::as_text),
        Some("seconds since 2000-01-01")
    );
    assert_eq!(reader.read_variable("time").unwrap(), VarData::Int(vec![0, 60, 120]));
    assert!(reader.header().variable("station_name").is_some());
}

#[test]
fn test_wide_format_stores_int64() {
    let template = Template::new(vec![
        float("lat", "lat", Role::coordinate(AxisKind::Latitude)),
        float("lon", "lon", Role::coordinate(AxisKind::Longitude)),
        VariableDescriptor::new(
            "when",
            "when",
            DeclaredType::Text,
            Role::time_component(TimeComponentKind::FullDateTime, "yyyy-MM-dd"),
        ),
        VariableDescriptor::new("n", "count", DeclaredType::Integer, Role::Data),
    ]);
    let table = ParsedTable::from_str_columns(&[
        ("lat", &["1"][..]),
        ("lon", &["2"][..]),
        ("when", &["2200-01-01"][..]),
        ("n", &["5000000000"][..]),
    ])
    .unwrap();

    // Past 2038 and beyond i32: classic output must refuse
    assert!(DsgEncoder::new()
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .is_err());

    let bytes = DsgEncoder::with_config(EncoderConfig::wide())
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .unwrap();
    let reader = NcReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.header().format, FileFormat::Cdf5);
    assert_eq!(reader.read_variable("count").unwrap(), VarData::Int64(vec![5_000_000_000]));
    assert_eq!(reader.read_variable("time").unwrap(), VarData::Int64(vec![7_258_118_400]));
}

#[test]
fn test_matchup_then_encode() {
    let mut set = SeriesSet::new();
    for (t, lat, lon) in [(0, "10.0", "-80.0"), (60, "10.5", "-80.5")] {
        set.push("lat", Observation::new(t, lat, "degrees_north"));
        set.push("lon", Observation::new(t, lon, "degrees_east"));
    }
    set.push("temp", Observation::new(0, "5.0", "degC"));
    set.push("temp", Observation::new(30, "6.0", "degC"));

    let request = MatchupRequest::one_location_one_observation("lat", "lon", vec!["temp".into()]);
    let aligned = align(&set, &request).unwrap();
    let table = aligned.to_parsed_table().unwrap();
    let template = Template::new(aligned.descriptors());

    let bytes = DsgEncoder::new()
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .unwrap();
    let reader = NcReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.read_variable("time").unwrap(), VarData::Int(vec![0, 60]));
    assert_eq!(
        reader.read_variable("temp").unwrap(),
        VarData::Double(vec![5.0, 6.0])
    );
}

#[test]
fn test_bad_attribute_name_rejected_before_rows() {
    let dir = tempdir().unwrap();
    let mut template = trajectory_template();
    template.variables[3] = float("temp", "sea_water_temperature", Role::Data)
        .with_attribute(AttributeSpec::text("units ", "degC"));
    // Every cell is unparseable; the declaration error must come first
    let table = ParsedTable::from_str_columns(&[
        ("lat", &["x"][..]),
        ("lon", &["x"][..]),
        ("when", &["x"][..]),
        ("temp", &["x"][..]),
    ])
    .unwrap();

    let err = DsgEncoder::new()
        .encode(
            &template,
            &table,
            FeatureType::Trajectory,
            &OutputTarget::new(dir.path(), "named.csv"),
        )
        .unwrap_err();
    match err {
        EncodingError::AttributeError(AttributeError::InvalidName { owner, name }) => {
            assert_eq!(owner, "sea_water_temperature");
            assert_eq!(name, "units ");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

fn temperature_table(values: &[f64]) -> ParsedTable {
    let lat: Vec<String> = values.iter().map(|_| "10.0".to_string()).collect();
    let lon: Vec<String> = values.iter().map(|_| "-80.0".to_string()).collect();
    let when: Vec<String> = (0..values.len())
        .map(|i| format!("2020-01-01T00:{:02}:00", i))
        .collect();
    let temp: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    fn borrow(cells: &[String]) -> Vec<&str> {
        cells.iter().map(String::as_str).collect()
    }
    let (lat, lon, when, temp) = (borrow(&lat), borrow(&lon), borrow(&when), borrow(&temp));
    ParsedTable::from_str_columns(&[
        ("lat", &lat[..]),
        ("lon", &lon[..]),
        ("when", &when[..]),
        ("temp", &temp[..]),
    ])
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_valid_range_matches_column(values in prop::collection::vec(-1e6f64..1e6, 1..50)) {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let template = trajectory_template();
        let table = temperature_table(&values);
        let encoder = DsgEncoder::new();

        let schema = encoder.schema(&template, &table, FeatureType::Trajectory).unwrap();
        let temp = schema.variable("sea_water_temperature").unwrap();
        prop_assert_eq!(
            temp.attribute("valid_min").map(|a| &a.value),
            Some(&AttrValue::Double(vec![min]))
        );
        prop_assert_eq!(
            temp.attribute("valid_max").map(|a| &a.value),
            Some(&AttrValue::Double(vec![max]))
        );

        let bytes = encoder
            .encode_to_bytes(&template, &table, FeatureType::Trajectory)
            .unwrap();
        let reader = NcReader::from_bytes(bytes).unwrap();
        let stored = reader.header().variable("sea_water_temperature").unwrap();
        prop_assert_eq!(stored.attribute("valid_min"), Some(&AttrValue::Double(vec![min])));
        prop_assert_eq!(stored.attribute("valid_max"), Some(&AttrValue::Double(vec![max])));
        prop_assert_eq!(
            reader.read_variable("sea_water_temperature").unwrap(),
            VarData::Double(values.clone())
        );
    }
}
