use super::types::{FileFormat, NcType};

/// Errors that can occur while defining, writing or reading a netCDF file
#[derive(Debug, thiserror::Error)]
pub enum NcError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error reported by the netCDF library
    #[error("netCDF library error: {0}")]
    Library(#[from] netcdf::Error),

    /// A structural change was attempted after define mode was closed
    #[error("Cannot {0}: define mode is closed")]
    DefineModeClosed(String),

    /// Data was written before the structure was frozen
    #[error("Cannot write variable '{0}': still in define mode")]
    StillInDefineMode(String),

    /// The name is not a legal netCDF name
    #[error("Invalid netCDF name: '{0}'")]
    InvalidName(String),

    /// A dimension, variable or attribute with this name already exists
    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName {
        /// What kind of object was duplicated
        kind: &'static str,
        /// The duplicated name
        name: String,
    },

    /// A dimension length of zero was requested
    #[error("Dimension '{0}' must have a positive length")]
    InvalidDimension(String),

    /// Reference to an undefined dimension
    #[error("Unknown dimension: '{0}'")]
    UnknownDimension(String),

    /// Reference to an undefined variable
    #[error("Unknown variable: '{0}'")]
    UnknownVariable(String),

    /// The data type cannot be stored in the selected file format
    #[error("Type {nc_type} is not supported by the {format} format")]
    UnsupportedType {
        /// Requested type
        nc_type: NcType,
        /// Selected file format
        format: FileFormat,
    },

    /// Data handed to the writer does not match the declared type
    #[error("Type mismatch for variable '{variable}': declared {expected}, got {found}")]
    TypeMismatch {
        /// Variable name
        variable: String,
        /// Declared type
        expected: NcType,
        /// Type of the supplied data
        found: NcType,
    },

    /// Data handed to the writer does not match the declared shape
    #[error("Length mismatch for variable '{variable}': expected {expected} values, got {found}")]
    LengthMismatch {
        /// Variable name
        variable: String,
        /// Number of values implied by the dimensions
        expected: usize,
        /// Number of values supplied
        found: usize,
    },

    /// A variable was written twice
    #[error("Variable '{0}' has already been written")]
    AlreadyWritten(String),

    /// A variable was never written before the file was finished
    #[error("Variable '{0}' was defined but never written")]
    MissingData(String),

    /// The bytes are not a netCDF classic-family file
    #[error("Invalid netCDF data: {0}")]
    InvalidFormat(String),

    /// The file uses a format or type this crate does not handle
    #[error("Unsupported netCDF feature: {0}")]
    UnsupportedFeature(String),
}

/// Result type for netCDF operations
pub type NcResult<T> = Result<T, NcError>;
