//! # Dataset Schema
//!
//! Derives the complete structure of a CF Discrete Sampling Geometry file from
//! the classified columns, the time axis and the user's global attributes:
//! dimensions, variables with their types and attributes, and the global
//! attribute table.
//!
//! ## Layout
//!
//! A file holds a single feature. Every column variable lies along one sample
//! dimension whose length is the number of rows:
//!
//! | Feature type | Sample dimension | Identifier | `cf_role` |
//! |--------------|------------------|------------|-----------|
//! | Trajectory | time variable | `trajectory` | `trajectory_id` |
//! | TimeSeries | time variable | `station_name` | `timeseries_id` |
//! | Profile | first vertical variable, else `obs` | `profile` | `profile_id` |
//!
//! Text columns become character arrays with an extra `<name>_strlen`
//! dimension. Profiles without latitude/longitude columns fall back to scalar
//! coordinates read from `geospatial_lat_start`/`geospatial_lon_start`.
//!
//! ## Attributes
//!
//! Structural attributes (`axis`, `positive`, `coordinates`, `cf_role`,
//! `valid_min`, `valid_max`, `column_id`) are always derived. Descriptive
//! attributes (`standard_name`, `long_name`, `units`) are only filled in when
//! the user did not declare them.
//!
//! An [`EncodedSchema`] has no mutators; once built it is only read.

mod builder;
mod constants;
mod error;
mod values;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use builder::{build, validate_declarations, BuildInput, ConvertedColumns};
pub use constants::*;
pub use error::AttributeError;
pub use values::{ColumnValues, Extrema};

use crate::ncfile::{Attribute, Dimension, NcType};

/// CF Discrete Sampling Geometry feature type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureType {
    /// Observations along a moving platform's path
    #[serde(alias = "Trajectory")]
    Trajectory,
    /// Observations at a fixed station over time
    #[serde(alias = "timeseries", alias = "time_series", alias = "TimeSeries")]
    TimeSeries,
    /// Observations along a vertical line
    #[serde(alias = "Profile")]
    Profile,
}

impl FeatureType {
    /// Value of the `featureType` global attribute
    pub fn cf_name(self) -> &'static str {
        match self {
            FeatureType::Trajectory => "trajectory",
            FeatureType::TimeSeries => "timeSeries",
            FeatureType::Profile => "profile",
        }
    }

    /// `cf_role` of the identifier variable
    pub fn cf_role(self) -> &'static str {
        match self {
            FeatureType::Trajectory => "trajectory_id",
            FeatureType::TimeSeries => "timeseries_id",
            FeatureType::Profile => "profile_id",
        }
    }

    /// Preferred name of the identifier variable
    pub fn identifier_name(self) -> &'static str {
        match self {
            FeatureType::Trajectory => "trajectory",
            FeatureType::TimeSeries => "station_name",
            FeatureType::Profile => "profile",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cf_name())
    }
}

impl FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(&['_', '-'][..], "").as_str() {
            "trajectory" => Ok(FeatureType::Trajectory),
            "timeseries" => Ok(FeatureType::TimeSeries),
            "profile" => Ok(FeatureType::Profile),
            other => Err(format!(
                "unknown feature type '{}' (expected trajectory, timeseries or profile)",
                other
            )),
        }
    }
}

/// Where a variable's values come from at write time
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// A converted input column
    Column {
        /// Key of the input column
        source_key: String,
    },
    /// The feature identifier text
    Identifier(String),
    /// The synthesized time axis
    SynthesizedTime,
    /// A single value (Profile coordinate fallback)
    Scalar(f64),
}

/// Definition of one output variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    name: String,
    nc_type: NcType,
    dimensions: Vec<String>,
    attributes: Vec<Attribute>,
    source: DataSource,
}

impl VariableDef {
    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage type
    pub fn nc_type(&self) -> NcType {
        self.nc_type
    }

    /// Dimension names, outermost first (empty for scalars)
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Attributes in write order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Text value of an attribute
    pub fn text_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|a| a.value.as_text())
    }

    /// Where the values come from
    pub fn source(&self) -> &DataSource {
        &self.source
    }
}

/// Complete, immutable description of an output file
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSchema {
    feature_type: FeatureType,
    sample_dimension: String,
    feature_id: String,
    dimensions: Vec<Dimension>,
    variables: Vec<VariableDef>,
    global_attributes: Vec<Attribute>,
}

impl EncodedSchema {
    /// Feature type of the dataset
    pub fn feature_type(&self) -> FeatureType {
        self.feature_type
    }

    /// Name of the dimension every column lies along
    pub fn sample_dimension(&self) -> &str {
        &self.sample_dimension
    }

    /// Identifier written to the `cf_role` variable
    pub fn feature_id(&self) -> &str {
        &self.feature_id
    }

    /// Dimensions in definition order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension by name
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Variables in definition (and write) order
    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    /// Variable by name
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Global attributes in write order
    pub fn global_attributes(&self) -> &[Attribute] {
        &self.global_attributes
    }

    /// Global attribute by name
    pub fn global_attribute(&self, name: &str) -> Option<&Attribute> {
        self.global_attributes.iter().find(|a| a.name == name)
    }
}
