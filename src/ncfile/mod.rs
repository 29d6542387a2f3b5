//! # netCDF Files
//!
//! Typed access to netCDF classic (CDF-1) and 64-bit data (CDF-5) files on
//! top of the `netcdf` crate.
//!
//! The writer adds a two-phase discipline over the library's own define
//! mode: structure is declared first and frozen by [`NcWriter::end_define`],
//! after which only variable data may be written, each variable exactly once.
//! The reader takes a complete snapshot (header and data) so that checks and
//! inspection never hold the library handle.
//!
//! ```rust,no_run
//! use dsgconvert::ncfile::{Attribute, FileFormat, NcReader, NcType, NcWriter, VarData};
//!
//! let mut writer = NcWriter::create("depth.nc", FileFormat::Classic)?;
//! writer.add_dimension("obs", 2)?;
//! writer.add_variable("depth", NcType::Double, &["obs"])?;
//! writer.add_variable_attribute("depth", Attribute::text("units", "m"))?;
//! writer.end_define()?;
//! writer.write_variable("depth", &VarData::Double(vec![1.0, 2.0]))?;
//! writer.finish()?;
//!
//! let reader = NcReader::open("depth.nc")?;
//! assert_eq!(reader.read_variable("depth")?, VarData::Double(vec![1.0, 2.0]));
//! # Ok::<(), dsgconvert::ncfile::NcError>(())
//! ```

mod error;
mod reader;
mod types;
mod writer;

#[cfg(test)]
mod tests;

pub use error::{NcError, NcResult};
pub use reader::{NcHeader, NcReader, NcVariable};
pub use types::{is_valid_name, AttrValue, Attribute, Dimension, FileFormat, NcType, VarData};
pub use writer::NcWriter;

/// Leading bytes of every netCDF classic-family file
pub const MAGIC: &[u8; 3] = b"CDF";
