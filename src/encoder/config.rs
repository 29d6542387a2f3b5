use serde::{Deserialize, Serialize};

use crate::ncfile::FileFormat;
use crate::schema::DEFAULT_FEATURE_ID;
use crate::time::IntegerWidth;

/// Configuration for the DSG encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// On-disk format; decides whether integers and time are 32 or 64 bit
    pub format: FileFormat,

    /// Identifier written when the template supplies none
    pub fallback_feature_id: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            format: FileFormat::Classic,
            fallback_feature_id: DEFAULT_FEATURE_ID.to_string(),
        }
    }
}

impl EncoderConfig {
    /// Classic (CDF-1) output, readable by every netCDF tool
    pub fn classic() -> Self {
        Self::default()
    }

    /// CDF-5 output with 64-bit integers and time values
    pub fn wide() -> Self {
        Self {
            format: FileFormat::Cdf5,
            ..Self::default()
        }
    }

    /// Width of synthesized time values for this format
    pub fn integer_width(&self) -> IntegerWidth {
        if self.format.supports_int64() {
            IntegerWidth::I64
        } else {
            IntegerWidth::I32
        }
    }
}
