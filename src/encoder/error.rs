use std::path::PathBuf;

use crate::catalog::ClassificationError;
use crate::matchup::MatchupError;
use crate::ncfile::{NcError, NcType};
use crate::schema::AttributeError;
use crate::table::TableError;
use crate::template::TemplateError;
use crate::time::TimeAxisError;

/// A cell that cannot be stored as its column's type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot convert '{text}' in column '{column}' at row {row} to {expected}")]
pub struct ConversionError {
    /// User-visible column name
    pub column: String,
    /// Zero-based data row index
    pub row: usize,
    /// Offending cell text
    pub text: String,
    /// Storage type the cell was converted to
    pub expected: NcType,
}

/// Errors that abort a conversion job
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// Contradictory column roles
    #[error("Classification error: {0}")]
    ClassificationError(#[from] ClassificationError),

    /// Time axis could not be resolved or parsed
    #[error("Time axis error: {0}")]
    TimeAxisError(#[from] TimeAxisError),

    /// Invalid attribute declarations
    #[error("Attribute error: {0}")]
    AttributeError(#[from] AttributeError),

    /// A cell failed type conversion
    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),

    /// Series alignment failed
    #[error("Matchup error: {0}")]
    MatchupError(#[from] MatchupError),

    /// The netCDF writer rejected the dataset
    #[error("netCDF error: {0}")]
    NetcdfError(#[from] NcError),

    /// The input table could not be read
    #[error("Table error: {0}")]
    TableError(#[from] TableError),

    /// The template could not be loaded
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    /// I/O error on the output file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The output directory does not exist
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirectoryMissing(PathBuf),

    /// The input table has no data rows
    #[error("Input table has no data rows")]
    EmptyTable,

    /// A declared column is absent from the input table
    #[error("Column '{source_key}' for variable '{name}' not found in input")]
    MissingColumn {
        /// Variable name
        name: String,
        /// Declared source key
        source_key: String,
    },
}

impl EncodingError {
    /// Whether the failure comes from the environment rather than the data
    /// or the template, so retrying after fixing the environment can succeed
    pub fn is_resource_error(&self) -> bool {
        match self {
            EncodingError::IoError(_) | EncodingError::OutputDirectoryMissing(_) => true,
            EncodingError::NetcdfError(NcError::IoError(_) | NcError::Library(_)) => true,
            EncodingError::TableError(TableError::IoError(_)) => true,
            EncodingError::TemplateError(TemplateError::IoError(_)) => true,
            _ => false,
        }
    }
}
