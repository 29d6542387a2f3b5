use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::ncfile::{FileFormat, NcReader, NcResult};

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 1: the path holds a readable netCDF file
pub(crate) fn check_structure(path: &Path, report: &mut ValidationReport) -> Result<NcReader, ValidationError> {
    if !path.is_file() {
        report.add_check(ValidationCheck::failed(
            "File exists",
            format!("Not a regular file: {}", path.display()),
        ));
        return Err(ValidationError::StructureError(format!(
            "{} is not a file",
            path.display()
        )));
    }
    report.add_check(ValidationCheck::ok("File exists"));

    let mut head = Vec::with_capacity(4);
    File::open(path)?.take(4).read_to_end(&mut head)?;
    check_signature(&head, report)?;
    report_header(NcReader::open(path), report)
}

/// Step 1 for in-memory data
pub(crate) fn check_bytes(bytes: Vec<u8>, report: &mut ValidationReport) -> Result<NcReader, ValidationError> {
    check_signature(&bytes, report)?;
    report_header(NcReader::from_bytes(bytes), report)
}

fn check_signature(head: &[u8], report: &mut ValidationReport) -> Result<(), ValidationError> {
    match FileFormat::from_signature(head) {
        Ok(format) => {
            report.add_check(ValidationCheck::ok(format!("netCDF signature ({})", format)));
            Ok(())
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed("netCDF signature", e.to_string()));
            Err(ValidationError::StructureError(
                "missing netCDF signature".to_string(),
            ))
        }
    }
}

fn report_header(
    opened: NcResult<NcReader>,
    report: &mut ValidationReport,
) -> Result<NcReader, ValidationError> {
    match opened {
        Ok(reader) => {
            report.add_check(ValidationCheck::ok(format!(
                "Header parses ({} variables)",
                reader.header().variables.len()
            )));
            Ok(reader)
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed("Header parses", e.to_string()));
            Err(e.into())
        }
    }
}
