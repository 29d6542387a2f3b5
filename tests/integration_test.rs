//! Integration tests for dsgconvert
//!
//! These tests run the full pipeline: delimited text and a JSON template in,
//! a CF-DSG netCDF file out, read back with the bundled reader.

use dsgconvert::prelude::*;
use dsgconvert::matchup::LongRecord;
use dsgconvert::ncfile::{AttrValue, VarData};
use std::fs;
use tempfile::tempdir;

const TRAJECTORY_TEMPLATE: &str = r#"{
    "feature_id": "leg-3",
    "global_attributes": [
        { "group": "ACDD", "attributes": [
            { "name": "title", "value": "Glider leg 3" },
            { "name": "institution", "value": "Ocean Lab" }
        ] }
    ],
    "variables": [
        { "column": "Date", "name": "date",
          "role": { "kind": "time_component", "time_kind": "date_only", "format": "dd/MM/yyyy" } },
        { "column": "Time", "name": "clock",
          "role": { "kind": "time_component", "time_kind": "time_only", "format": "HH:mm" } },
        { "column": "Lat", "name": "latitude", "type": "float",
          "role": { "kind": "coordinate", "axis": "latitude" } },
        { "column": "Lon", "name": "longitude", "type": "float",
          "role": { "kind": "coordinate", "axis": "longitude" } },
        { "column": "Depth", "name": "depth", "type": "float",
          "role": { "kind": "coordinate", "axis": "vertical" },
          "attributes": [ { "name": "positive", "value": "down" }, { "name": "units", "value": "m" } ] },
        { "column": "Temp (C)", "name": "Temp (C)", "type": "float",
          "role": { "kind": "data" },
          "attributes": [ { "name": "units", "value": "degC" } ] },
        { "column": "Flag", "name": "qc", "type": "integer", "role": { "kind": "data" } },
        { "column": "Notes", "name": "notes", "role": { "kind": "do_not_use" } }
    ]
}"#;

const TRAJECTORY_CSV: &str = "\
Date,Time,Lat,Lon,Depth,Temp (C),Flag,Notes
01/03/2021,06:00,44.10,-63.20,5.0,7.25,1,start
01/03/2021,06:30,44.12,-63.18,12.5,7.00,1,
01/03/2021,07:00,44.15,-63.15,20.0,6.50,3,end
";

#[test]
fn test_csv_to_trajectory_file() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("leg3.csv");
    fs::write(&csv_path, TRAJECTORY_CSV).unwrap();

    let template = Template::from_json_str(TRAJECTORY_TEMPLATE).unwrap();
    let table = read_delimited_file(&csv_path, &TableReadOptions::default()).unwrap();
    assert_eq!(table.row_count(), 3);

    let out_dir = dir.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    let stats = DsgEncoder::new()
        .encode(
            &template,
            &table,
            FeatureType::Trajectory,
            &OutputTarget::new(&out_dir, "leg3.csv"),
        )
        .unwrap();
    assert_eq!(stats.rows, 3);

    let path = out_dir.join("leg3.nc");
    let reader = NcReader::open(&path).unwrap();
    let header = reader.header();

    assert_eq!(header.dimension("time").map(|d| d.len), Some(3));
    assert_eq!(
        header.global_attribute("institution").and_then(AttrValue::as_text),
        Some("Ocean Lab")
    );
    assert_eq!(
        header.global_attribute("Conventions").and_then(AttrValue::as_text),
        Some("CF-1.6")
    );

    // Ignored and time-component columns are not variables
    assert!(header.variable("notes").is_none());
    assert!(header.variable("date").is_none());
    assert!(header.variable("clock").is_none());

    assert_eq!(
        reader.read_variable("time").unwrap(),
        VarData::Int(vec![1_614_578_400, 1_614_580_200, 1_614_582_000])
    );
    assert_eq!(reader.read_variable("qc").unwrap(), VarData::Int(vec![1, 1, 3]));

    let temp = header.variable("Temp__C_").unwrap();
    assert_eq!(
        temp.attribute("coordinates").and_then(AttrValue::as_text),
        Some("time latitude longitude depth")
    );
    assert_eq!(
        temp.attribute("valid_min").and_then(AttrValue::as_f64),
        Some(6.5)
    );

    let depth = header.variable("depth").unwrap();
    assert_eq!(depth.attribute("axis").and_then(AttrValue::as_text), Some("Z"));
    assert_eq!(depth.attribute("positive").and_then(AttrValue::as_text), Some("down"));

    let report = validate_dsg_file(&path).unwrap();
    assert!(!report.has_failures(), "{}", report);
}

#[test]
fn test_profile_from_tsv_with_global_position() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cast.tsv");
    fs::write(
        &path,
        "CTD cast 17\nseconds\tpressure\tsalinity\n0\t1.0\t34.9\n10\t5.0\t35.0\n20\t10.0\t35.1\n",
    )
    .unwrap();

    let template = Template::from_json_str(
        r#"{
        "feature_type": "profile",
        "global_attributes": [
            { "group": "position", "attributes": [
                { "name": "geospatial_lat_start", "value": "-33.9", "type": "float" },
                { "name": "geospatial_lon_start", "value": "151.3", "type": "float" }
            ] }
        ],
        "variables": [
            { "column": "0", "name": "time", "type": "integer",
              "role": { "kind": "coordinate", "axis": "time" },
              "attributes": [ { "name": "units", "value": "seconds since 2022-02-01T00:00:00Z" } ] },
            { "column": "pressure", "name": "pressure", "type": "float",
              "role": { "kind": "coordinate", "axis": "vertical" },
              "attributes": [ { "name": "positive", "value": "down" } ] },
            { "column": "salinity", "name": "psal", "type": "float", "role": { "kind": "data" } }
        ]
    }"#,
    )
    .unwrap();

    let options = TableReadOptions {
        delimiter: b'\t',
        header_lines: 2,
        ..Default::default()
    };
    let table = read_delimited_file(&path, &options).unwrap();
    let feature_type = template.feature_type.unwrap();

    let bytes = DsgEncoder::with_config(EncoderConfig::wide())
        .encode_to_bytes(&template, &table, feature_type)
        .unwrap();
    let reader = NcReader::from_bytes(bytes).unwrap();
    let header = reader.header();

    assert_eq!(header.dimension("pressure").map(|d| d.len), Some(3));
    let latitude = header.variable("latitude").unwrap();
    assert!(latitude.is_scalar());
    assert_eq!(reader.read_variable("latitude").unwrap(), VarData::Double(vec![-33.9]));
    assert_eq!(reader.read_variable("time").unwrap(), VarData::Int64(vec![0, 10, 20]));
    assert_eq!(
        header.variable("profile").and_then(|v| v.attribute("cf_role")).and_then(AttrValue::as_text),
        Some("profile_id")
    );
    assert_eq!(
        reader.read_variable("profile").unwrap(),
        VarData::Char(b"feature1".to_vec())
    );
}

#[test]
fn test_matchup_nearest_tie_resolves_to_floor() {
    let records = vec![
        LongRecord { timestamp: 100, variable: "lat".into(), value: "10.0".into(), unit: "degrees_north".into() },
        LongRecord { timestamp: 100, variable: "lon".into(), value: "20.0".into(), unit: "degrees_east".into() },
        LongRecord { timestamp: 200, variable: "lat".into(), value: "10.1".into(), unit: "degrees_north".into() },
        LongRecord { timestamp: 200, variable: "lon".into(), value: "20.1".into(), unit: "degrees_east".into() },
        LongRecord { timestamp: 90, variable: "temp".into(), value: "5.0".into(), unit: "degC".into() },
        LongRecord { timestamp: 150, variable: "temp".into(), value: "6.0".into(), unit: "degC".into() },
        LongRecord { timestamp: 250, variable: "temp".into(), value: "7.0".into(), unit: "degC".into() },
    ];
    let set = SeriesSet::from_long_records(records).unwrap();
    let request = MatchupRequest::one_location_one_observation("lat", "lon", vec!["temp".into()]);
    let aligned = align(&set, &request).unwrap();

    let table = aligned.to_parsed_table().unwrap();
    assert_eq!(table.column("temp").unwrap(), &["5.0", "6.0"]);

    let template = Template::new(aligned.descriptors());
    let bytes = DsgEncoder::new()
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .unwrap();
    let reader = NcReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.read_variable("temp").unwrap(), VarData::Double(vec![5.0, 6.0]));
    assert_eq!(
        reader
            .header()
            .variable("temp")
            .and_then(|v| v.attribute("units"))
            .and_then(AttrValue::as_text),
        Some("degC")
    );
}

#[test]
fn test_failed_conversion_leaves_directory_empty() {
    let dir = tempdir().unwrap();
    let template = Template::from_json_str(TRAJECTORY_TEMPLATE).unwrap();
    let csv = TRAJECTORY_CSV.replace("7.00", "N/A");
    let table = read_delimited(csv.as_bytes(), &TableReadOptions::default()).unwrap();

    let err = DsgEncoder::new()
        .encode(
            &template,
            &table,
            FeatureType::Trajectory,
            &OutputTarget::new(dir.path(), "leg3.csv"),
        )
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("N/A"), "{}", message);
    assert!(message.contains("row 1"), "{}", message);
    assert!(!err.is_resource_error());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_re_encoding_is_byte_identical() {
    let template = Template::from_json_str(TRAJECTORY_TEMPLATE).unwrap();
    let table = read_delimited(TRAJECTORY_CSV.as_bytes(), &TableReadOptions::default()).unwrap();
    let encoder = DsgEncoder::new();
    let first = encoder
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .unwrap();
    let second = encoder
        .encode_to_bytes(&template, &table, FeatureType::Trajectory)
        .unwrap();
    assert_eq!(first, second);
}
