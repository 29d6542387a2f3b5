use super::*;
use std::path::Path;
use tempfile::tempdir;

fn write_sample(path: &Path, format: FileFormat) -> Result<(), NcError> {
    let mut writer = NcWriter::create(path, format)?;
    writer.add_dimension("time", 3)?;
    writer.add_dimension("name_strlen", 5)?;
    writer.add_global_attribute(Attribute::text("Conventions", "CF-1.6"))?;
    writer.add_variable("time", NcType::Int, &["time"])?;
    writer.add_variable_attribute("time", Attribute::text("axis", "T"))?;
    writer.add_variable("temp", NcType::Double, &["time"])?;
    writer.add_variable_attribute("temp", Attribute::new("valid_min", AttrValue::Double(vec![1.5])))?;
    writer.add_variable("name", NcType::Char, &["name_strlen"])?;
    writer.add_variable("depth", NcType::Double, &[])?;
    writer.end_define()?;

    writer.write_variable("time", &VarData::Int(vec![0, 60, 120]))?;
    writer.write_variable("temp", &VarData::Double(vec![1.5, 2.5, 3.5]))?;
    writer.write_variable("name", &VarData::Char(b"abc\0\0".to_vec()))?;
    writer.write_variable("depth", &VarData::Double(vec![12.0]))?;
    writer.finish()
}

#[test]
fn test_signature_matches_format() -> Result<(), NcError> {
    let dir = tempdir()?;
    for (format, version) in [(FileFormat::Classic, 1u8), (FileFormat::Cdf5, 5u8)] {
        let path = dir.path().join(format!("sample_{}.nc", format));
        write_sample(&path, format)?;
        let bytes = std::fs::read(&path)?;
        assert_eq!(&bytes[..3], MAGIC);
        assert_eq!(bytes[3], version);
        assert_eq!(FileFormat::from_signature(&bytes)?, format);
    }
    Ok(())
}

#[test]
fn test_write_then_read_back() -> Result<(), NcError> {
    let dir = tempdir()?;
    for format in [FileFormat::Classic, FileFormat::Cdf5] {
        let path = dir.path().join(format!("roundtrip_{}.nc", format));
        write_sample(&path, format)?;
        let reader = NcReader::open(&path)?;
        let header = reader.header();

        assert_eq!(header.format, format);
        assert_eq!(header.dimension("time").map(|d| d.len), Some(3));
        assert_eq!(
            header.global_attribute("Conventions").and_then(|v| v.as_text()),
            Some("CF-1.6")
        );

        let temp = header.variable("temp").expect("temp variable");
        assert_eq!(temp.attribute("valid_min"), Some(&AttrValue::Double(vec![1.5])));
        assert_eq!(header.dimension_names(temp), vec!["time".to_string()]);
        assert_eq!(header.shape(temp), vec![3]);

        assert_eq!(reader.read_variable("time")?, VarData::Int(vec![0, 60, 120]));
        assert_eq!(
            reader.read_variable("temp")?,
            VarData::Double(vec![1.5, 2.5, 3.5])
        );
        assert_eq!(
            reader.read_variable("name")?.to_strings(5),
            Some(vec!["abc".to_string()])
        );
        assert!(header.variable("depth").expect("depth").is_scalar());
        assert_eq!(reader.read_variable("depth")?, VarData::Double(vec![12.0]));
        assert!(matches!(
            reader.read_variable("missing"),
            Err(NcError::UnknownVariable(_))
        ));
    }
    Ok(())
}

#[test]
fn test_from_bytes_matches_open() -> Result<(), NcError> {
    let dir = tempdir()?;
    let path = dir.path().join("sample.nc");
    write_sample(&path, FileFormat::Classic)?;

    let reader = NcReader::from_bytes(std::fs::read(&path)?)?;
    assert_eq!(reader.file_size(), std::fs::metadata(&path)?.len());
    assert_eq!(reader.read_variable("time")?, VarData::Int(vec![0, 60, 120]));
    Ok(())
}

#[test]
fn test_structure_frozen_after_define() -> Result<(), NcError> {
    let dir = tempdir()?;
    let mut writer = NcWriter::create(dir.path().join("frozen.nc"), FileFormat::Classic)?;
    writer.add_dimension("obs", 1)?;
    writer.add_variable("x", NcType::Int, &["obs"])?;
    writer.end_define()?;
    assert!(!writer.is_define_mode());

    assert!(matches!(
        writer.add_dimension("late", 4),
        Err(NcError::DefineModeClosed(_))
    ));
    assert!(matches!(
        writer.add_variable("y", NcType::Int, &["obs"]),
        Err(NcError::DefineModeClosed(_))
    ));
    assert!(matches!(
        writer.add_global_attribute(Attribute::text("title", "late")),
        Err(NcError::DefineModeClosed(_))
    ));
    assert!(matches!(writer.end_define(), Err(NcError::DefineModeClosed(_))));
    Ok(())
}

#[test]
fn test_int64_requires_cdf5() {
    let dir = tempdir().unwrap();
    let mut writer = NcWriter::create(dir.path().join("classic.nc"), FileFormat::Classic).unwrap();
    writer.add_dimension("obs", 1).unwrap();
    let result = writer.add_variable("t", NcType::Int64, &["obs"]);
    assert!(matches!(result, Err(NcError::UnsupportedType { .. })));

    let path = dir.path().join("cdf5.nc");
    let mut writer = NcWriter::create(&path, FileFormat::Cdf5).unwrap();
    writer.add_dimension("obs", 1).unwrap();
    writer.add_variable("t", NcType::Int64, &["obs"]).unwrap();
    writer.end_define().unwrap();
    writer.write_variable("t", &VarData::Int64(vec![i64::MAX])).unwrap();
    writer.finish().unwrap();
    let reader = NcReader::open(&path).unwrap();
    assert_eq!(reader.read_variable("t").unwrap(), VarData::Int64(vec![i64::MAX]));
}

#[test]
fn test_write_validation() {
    let dir = tempdir().unwrap();
    let mut writer = NcWriter::create(dir.path().join("checks.nc"), FileFormat::Classic).unwrap();
    writer.add_dimension("obs", 2).unwrap();
    assert!(matches!(
        writer.add_dimension("obs", 2),
        Err(NcError::DuplicateName { .. })
    ));
    assert!(matches!(writer.add_dimension("empty", 0), Err(NcError::InvalidDimension(_))));
    assert!(matches!(
        writer.add_variable("bad/name", NcType::Int, &["obs"]),
        Err(NcError::InvalidName(_))
    ));
    assert!(matches!(
        writer.add_variable("v", NcType::Int, &["missing"]),
        Err(NcError::UnknownDimension(_))
    ));
    writer.add_variable("v", NcType::Int, &["obs"]).unwrap();
    assert!(matches!(
        writer.add_variable_attribute("v", Attribute::text("source/origin", "x")),
        Err(NcError::InvalidName(_))
    ));

    assert!(matches!(
        writer.write_variable("v", &VarData::Int(vec![1, 2])),
        Err(NcError::StillInDefineMode(_))
    ));
    writer.end_define().unwrap();
    assert!(matches!(
        writer.write_variable("v", &VarData::Double(vec![1.0, 2.0])),
        Err(NcError::TypeMismatch { .. })
    ));
    assert!(matches!(
        writer.write_variable("v", &VarData::Int(vec![1])),
        Err(NcError::LengthMismatch { expected: 2, found: 1, .. })
    ));
    writer.write_variable("v", &VarData::Int(vec![1, 2])).unwrap();
    assert!(matches!(
        writer.write_variable("v", &VarData::Int(vec![1, 2])),
        Err(NcError::AlreadyWritten(_))
    ));
}

#[test]
fn test_finish_requires_all_variables() {
    let dir = tempdir().unwrap();
    let mut writer = NcWriter::create(dir.path().join("partial.nc"), FileFormat::Classic).unwrap();
    writer.add_dimension("obs", 1).unwrap();
    writer.add_variable("a", NcType::Int, &["obs"]).unwrap();
    writer.end_define().unwrap();
    assert!(matches!(writer.finish(), Err(NcError::MissingData(name)) if name == "a"));
}

#[test]
fn test_reader_rejects_garbage() {
    assert!(matches!(
        NcReader::from_bytes(b"HDF5 not netcdf".to_vec()),
        Err(NcError::InvalidFormat(_))
    ));
    assert!(matches!(
        NcReader::from_bytes(b"CDF\x02\0\0\0\0".to_vec()),
        Err(NcError::UnsupportedFeature(_))
    ));
    assert!(matches!(
        NcReader::from_bytes(b"CD".to_vec()),
        Err(NcError::InvalidFormat(_))
    ));
    // Valid signature, truncated header
    let bytes = vec![b'C', b'D', b'F', 1, 0, 0, 0, 0, 0, 0, 0, 0x0A, 0x7F, 0xFF, 0xFF, 0xFF];
    assert!(NcReader::from_bytes(bytes).is_err());
}

#[test]
fn test_name_rules() {
    assert!(is_valid_name("sea_water_temperature"));
    assert!(is_valid_name("_private"));
    assert!(is_valid_name("2m_temp"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("a/b"));
    assert!(!is_valid_name("-x"));
    assert!(!is_valid_name("trailing "));
}
