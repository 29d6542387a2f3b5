//! # DSG Encoder
//!
//! Orchestrates one conversion job from a [`Template`] and a [`ParsedTable`]
//! to a CF-DSG netCDF file.
//!
//! ## Phases
//!
//! 1. **Prepare**: classify the columns, resolve the time mode, check the
//!    attribute declarations, then parse the time axis and convert every
//!    column. All configuration and data errors surface here, before any
//!    output exists.
//! 2. **Define**: declare dimensions, variables and attributes. Ending define
//!    mode freezes the structure.
//! 3. **Write**: column variables in schema order, then the identifier, then
//!    the synthesized time axis, then any scalar coordinates.
//!
//! File output goes through a temporary file in the target directory that is
//! only moved into place once the dataset is complete, so a failed job never
//! leaves a file behind. In-memory encoding stages the file in the system
//! temporary directory.

mod config;
mod convert;
mod error;
mod stats;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

pub use config::EncoderConfig;
pub use error::{ConversionError, EncodingError};
pub use stats::EncodeStats;

use crate::catalog::{classify, sanitize_name, MissingRole};
use crate::ncfile::{NcWriter, VarData};
use crate::schema::{
    build, validate_declarations, AttributeError, BuildInput, ConvertedColumns, DataSource,
    EncodedSchema, FeatureType,
};
use crate::table::ParsedTable;
use crate::template::Template;
use crate::time::{synthesize, TimeAxis, TimeMode};

/// Where an encoded file goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Existing directory receiving the file
    pub directory: PathBuf,
    /// Name of the uploaded source file; its stem names the output
    pub source_filename: String,
}

impl OutputTarget {
    /// Create a target
    pub fn new(directory: impl Into<PathBuf>, source_filename: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            source_filename: source_filename.into(),
        }
    }

    /// Output file name: the sanitized source stem with a `.nc` extension
    pub fn file_name(&self) -> String {
        let stem = Path::new(self.source_filename.trim())
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}.nc", sanitize_name(&stem))
    }

    /// Full path of the output file
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(self.file_name())
    }
}

/// A job that passed every check and is ready to write
#[derive(Debug)]
struct PreparedJob {
    schema: EncodedSchema,
    columns: ConvertedColumns,
    time_axis: TimeAxis,
    rows: usize,
}

/// Converts tables into CF Discrete Sampling Geometry netCDF files
#[derive(Debug, Clone, Default)]
pub struct DsgEncoder {
    config: EncoderConfig,
}

impl DsgEncoder {
    /// Create an encoder with the default (classic format) configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with a custom configuration
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode a table into a file in `target.directory`.
    ///
    /// The directory must already exist. On any error no output file is
    /// created.
    pub fn encode(
        &self,
        template: &Template,
        table: &ParsedTable,
        feature_type: FeatureType,
        target: &OutputTarget,
    ) -> Result<EncodeStats, EncodingError> {
        if !target.directory.is_dir() {
            return Err(EncodingError::OutputDirectoryMissing(
                target.directory.clone(),
            ));
        }
        let job = self.prepare(template, table, feature_type)?;
        let path = target.output_path();

        let temp = tempfile::Builder::new()
            .prefix(".dsgconvert-")
            .suffix(".nc")
            .tempfile_in(&target.directory)?;
        self.write_dataset(&job, temp.path())?;
        let bytes_written = fs::metadata(temp.path())?.len();
        temp.persist(&path).map_err(|e| e.error)?;

        let stats = self.stats(&job, bytes_written, Some(path));
        info!("{}", stats);
        Ok(stats)
    }

    /// Encode a table into memory
    pub fn encode_to_bytes(
        &self,
        template: &Template,
        table: &ParsedTable,
        feature_type: FeatureType,
    ) -> Result<Vec<u8>, EncodingError> {
        let job = self.prepare(template, table, feature_type)?;
        let staged = tempfile::Builder::new().suffix(".nc").tempfile()?;
        self.write_dataset(&job, staged.path())?;
        let bytes = fs::read(staged.path())?;
        info!("{}", self.stats(&job, bytes.len() as u64, None));
        Ok(bytes)
    }

    /// Derive the schema a table would be encoded with, without writing
    pub fn schema(
        &self,
        template: &Template,
        table: &ParsedTable,
        feature_type: FeatureType,
    ) -> Result<EncodedSchema, EncodingError> {
        Ok(self.prepare(template, table, feature_type)?.schema)
    }

    fn stats(&self, job: &PreparedJob, bytes_written: u64, output_path: Option<PathBuf>) -> EncodeStats {
        EncodeStats {
            output_path,
            feature_type: job.schema.feature_type(),
            rows: job.rows,
            dimensions: job.schema.dimensions().len(),
            variables: job.schema.variables().len(),
            bytes_written,
        }
    }

    // ========================================================================
    // Phase 0: checks, time axis and column conversion
    // ========================================================================

    fn prepare(
        &self,
        template: &Template,
        table: &ParsedTable,
        feature_type: FeatureType,
    ) -> Result<PreparedJob, EncodingError> {
        let format = self.config.format;
        info!(
            "Encoding {} rows x {} columns as {} ({} format)",
            table.row_count(),
            table.column_count(),
            feature_type,
            format
        );

        let classification = classify(&template.variables)?;
        for missing in classification.missing_roles(feature_type) {
            match missing {
                MissingRole::Time => {}
                role => warn!("{} dataset has no {:?} column", feature_type, role),
            }
        }
        let mode = TimeMode::detect(&classification)?;
        validate_declarations(
            feature_type,
            &classification,
            &template.global_attributes,
            format,
        )?;

        if table.row_count() == 0 {
            return Err(EncodingError::EmptyTable);
        }
        let time_axis = synthesize(&mode, table, self.config.integer_width())?;
        let columns = convert::convert_columns(&classification, table, format)?;

        let schema = build(&BuildInput {
            feature_type,
            classification: &classification,
            time_axis: &time_axis,
            columns: &columns,
            row_count: table.row_count(),
            global_attributes: &template.global_attributes,
            feature_id: template.feature_id.as_deref(),
            fallback_feature_id: &self.config.fallback_feature_id,
            format,
        })?;

        Ok(PreparedJob {
            schema,
            columns,
            time_axis,
            rows: table.row_count(),
        })
    }

    // ========================================================================
    // Phases 1 and 2: define, then write
    // ========================================================================

    fn write_dataset(&self, job: &PreparedJob, path: &Path) -> Result<(), EncodingError> {
        let schema = &job.schema;
        let mut writer = NcWriter::create(path, self.config.format)?;

        for dimension in schema.dimensions() {
            writer.add_dimension(&dimension.name, dimension.len)?;
        }
        for attribute in schema.global_attributes() {
            writer.add_global_attribute(attribute.clone())?;
        }
        for variable in schema.variables() {
            let dimensions: Vec<&str> = variable.dimensions().iter().map(String::as_str).collect();
            writer.add_variable(variable.name(), variable.nc_type(), &dimensions)?;
            for attribute in variable.attributes() {
                writer.add_variable_attribute(variable.name(), attribute.clone())?;
            }
        }
        writer.end_define()?;

        for variable in schema.variables() {
            let data = match variable.source() {
                DataSource::Column { .. } => job
                    .columns
                    .get(variable.name())
                    .map(|values| values.to_var_data())
                    .ok_or_else(|| AttributeError::MissingValues(variable.name().to_string()))?,
                DataSource::Identifier(id) => VarData::Char(id.as_bytes().to_vec()),
                DataSource::SynthesizedTime => job
                    .time_axis
                    .synthesized_values()
                    .map(|values| values.to_var_data())
                    .ok_or_else(|| AttributeError::MissingValues(variable.name().to_string()))?,
                DataSource::Scalar(value) => VarData::Double(vec![*value]),
            };
            writer.write_variable(variable.name(), &data)?;
        }

        writer.finish()?;
        Ok(())
    }
}
