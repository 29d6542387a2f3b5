use std::fmt;
use std::path::PathBuf;

use crate::schema::FeatureType;

/// Statistics from one conversion job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// File written, when encoding to disk
    pub output_path: Option<PathBuf>,
    /// Feature type of the dataset
    pub feature_type: FeatureType,
    /// Number of data rows
    pub rows: usize,
    /// Number of dimensions defined
    pub dimensions: usize,
    /// Number of variables defined
    pub variables: usize,
    /// Total size of the encoded dataset in bytes
    pub bytes_written: u64,
}

impl fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} rows as {} ({} variables, {} dimensions, {} bytes)",
            self.rows, self.feature_type, self.variables, self.dimensions, self.bytes_written
        )?;
        if let Some(path) = &self.output_path {
            write!(f, " to {}", path.display())?;
        }
        Ok(())
    }
}
