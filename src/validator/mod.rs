//! # CF-DSG Validation Module
//!
//! Conformance checks for netCDF files holding a single Discrete Sampling
//! Geometry feature, whether written by this crate or by another tool.
//!
//! ## Validation Checklist
//!
//! 1. **Structure Check**: the file exists and parses as netCDF classic or CDF-5
//! 2. **Global Metadata**: `Conventions` names CF and `featureType` is a
//!    supported feature type
//! 3. **Feature Layout**: exactly one `cf_role` variable matching the feature
//!    type, `coordinates` references that resolve, axis-tagged coordinates
//! 4. **Data Sanity**: `valid_min`/`valid_max` bracket the stored values
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dsgconvert::validator::validate_dsg_file;
//! use std::path::Path;
//!
//! match validate_dsg_file(Path::new("cruise.nc")) {
//!     Ok(report) => println!("{}", report),
//!     Err(e) => eprintln!("Validation failed: {}", e),
//! }
//! ```

use std::path::Path;

use crate::ncfile::{NcError, NcReader};

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod data;
mod metadata;
mod report;
mod schema;
mod structure;


/// Validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The file is missing or not a netCDF file
    #[error("Structure error: {0}")]
    StructureError(String),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The netCDF data could not be decoded
    #[error("netCDF error: {0}")]
    NetcdfError(#[from] NcError),
}

/// Main validation entry point.
///
/// Returns `Err` only when the file cannot be examined at all; conformance
/// problems are reported as failed checks.
pub fn validate_dsg_file(path: &Path) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(path.display().to_string());

    // 1. Structure Check
    let reader = structure::check_structure(path, &mut report)?;
    run_checks(&reader, &mut report)?;
    Ok(report)
}

/// Validate an in-memory dataset
pub fn validate_dsg_bytes(label: &str, bytes: Vec<u8>) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(label);
    let reader = structure::check_bytes(bytes, &mut report)?;
    run_checks(&reader, &mut report)?;
    Ok(report)
}

fn run_checks(reader: &NcReader, report: &mut ValidationReport) -> Result<(), ValidationError> {
    // 2. Global Metadata
    let feature_type = metadata::check_global_metadata(reader.header(), report);

    // 3. Feature Layout
    schema::check_feature_layout(reader.header(), feature_type, report);

    // 4. Data Sanity
    data::check_data_sanity(reader, report)?;

    Ok(())
}
