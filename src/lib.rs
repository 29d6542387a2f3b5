//! # dsgconvert - Tabular Observations to CF-DSG netCDF
//!
//! `dsgconvert` turns delimited tables of oceanographic and atmospheric
//! observations into netCDF files following the CF Discrete Sampling Geometry
//! conventions. Each output file holds a single feature: a trajectory, a
//! time series at one station, or a vertical profile.
//!
//! ## Key Features
//!
//! - **Declarative templates**: a JSON [`template::Template`] assigns every
//!   column a role (coordinate, time component, data, ignored), a type and
//!   attributes. Output names are sanitized and made unique.
//!
//! - **Time synthesis**: date/time text in Java-style or strftime patterns is
//!   parsed into an integer `seconds since 1970-01-01T00:00:00Z` axis.
//!   Relative numeric time columns pass through untouched.
//!
//! - **Temporal matchup**: independent observation series can be aligned on a
//!   reference time grid by floor or nearest-neighbour lookup before encoding.
//!
//! - **netCDF output**: classic (CDF-1) files by default, CDF-5 when 64-bit
//!   integers are needed, written through the `netcdf` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dsgconvert::prelude::*;
//!
//! let template = Template::from_json_file("cruise.json")?;
//! let table = read_delimited_file("cruise.csv", &TableReadOptions::default())?;
//!
//! let encoder = DsgEncoder::new();
//! let stats = encoder.encode(
//!     &template,
//!     &table,
//!     FeatureType::Trajectory,
//!     &OutputTarget::new("out", "cruise.csv"),
//! )?;
//! println!("{}", stats);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`table`]: delimited text to a column-addressable string table
//! - [`template`]: the user's column and attribute declarations
//! - [`catalog`]: column classification and unique naming
//! - [`time`]: time mode detection and time axis synthesis
//! - [`matchup`]: alignment of independent series on a reference grid
//! - [`schema`]: dimensions, variables and attributes of the output file
//! - [`encoder`]: orchestration and atomic file output
//! - [`ncfile`]: two-phase netCDF writer and snapshot reader
//! - [`validator`]: CF-DSG conformance checks for finished files

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod encoder;
pub mod matchup;
pub mod ncfile;
pub mod schema;
pub mod table;
pub mod template;
pub mod time;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{
        classify, AttributeSpec, AxisKind, DeclaredType, Role, TimeComponentKind,
        VariableDescriptor,
    };
    pub use crate::encoder::{DsgEncoder, EncodeStats, EncoderConfig, EncodingError, OutputTarget};
    pub use crate::matchup::{align, MatchupPolicy, MatchupRequest, Observation, SeriesSet};
    pub use crate::ncfile::{FileFormat, NcReader};
    pub use crate::schema::{EncodedSchema, FeatureType};
    pub use crate::table::{read_delimited, read_delimited_file, ParsedTable, TableReadOptions};
    pub use crate::template::{AttributeGroup, Template};
    pub use crate::validator::{validate_dsg_file, ValidationReport};
}
