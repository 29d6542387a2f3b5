use std::path::Path;

use log::debug;
use netcdf::types::NcVariableType;
use netcdf::{AttributeValue, FileMut};

use super::error::{NcError, NcResult};
use super::types::{is_valid_name, Attribute, Dimension, FileFormat, NcType, VarData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Define,
    Data,
}

#[derive(Debug)]
struct VarEntry {
    name: String,
    nc_type: NcType,
    len: usize,
    attributes: Vec<String>,
    written: bool,
}

/// Two-phase writer for netCDF classic and CDF-5 files.
///
/// Dimensions, variables and attributes are declared in define mode and
/// passed straight to the library. [`NcWriter::end_define`] freezes the
/// structure; from then on only variable data may be written. Every defined
/// variable must be written exactly once before [`NcWriter::finish`].
pub struct NcWriter {
    file: FileMut,
    format: FileFormat,
    dimensions: Vec<Dimension>,
    globals: Vec<String>,
    variables: Vec<VarEntry>,
    mode: Mode,
}

impl NcWriter {
    /// Create (or truncate) the file at `path` in define mode
    pub fn create<P: AsRef<Path>>(path: P, format: FileFormat) -> NcResult<Self> {
        let file = netcdf::create_with(path.as_ref(), format.create_options())?;
        Ok(Self {
            file,
            format,
            dimensions: Vec::new(),
            globals: Vec::new(),
            variables: Vec::new(),
            mode: Mode::Define,
        })
    }

    /// The file format being written
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Whether the structure can still change
    pub fn is_define_mode(&self) -> bool {
        self.mode == Mode::Define
    }

    fn require_define(&self, operation: &str) -> NcResult<()> {
        if self.mode == Mode::Define {
            Ok(())
        } else {
            Err(NcError::DefineModeClosed(operation.to_string()))
        }
    }

    fn check_type(&self, nc_type: NcType) -> NcResult<()> {
        if nc_type == NcType::Int64 && !self.format.supports_int64() {
            return Err(NcError::UnsupportedType {
                nc_type,
                format: self.format,
            });
        }
        Ok(())
    }

    /// Declare a fixed-size dimension
    pub fn add_dimension(&mut self, name: &str, len: usize) -> NcResult<()> {
        self.require_define(&format!("add dimension '{}'", name))?;
        if !is_valid_name(name) {
            return Err(NcError::InvalidName(name.to_string()));
        }
        if len == 0 {
            return Err(NcError::InvalidDimension(name.to_string()));
        }
        if self.dimensions.iter().any(|d| d.name == name) {
            return Err(NcError::DuplicateName {
                kind: "dimension",
                name: name.to_string(),
            });
        }
        self.file.add_dimension(name, len)?;
        self.dimensions.push(Dimension::new(name, len));
        Ok(())
    }

    /// Declare a global attribute
    pub fn add_global_attribute(&mut self, attribute: Attribute) -> NcResult<()> {
        self.require_define(&format!("add global attribute '{}'", attribute.name))?;
        check_attribute(&self.globals, &attribute)?;
        self.check_type(attribute.value.nc_type())?;
        self.file
            .add_attribute(&attribute.name, AttributeValue::from(&attribute.value))?;
        self.globals.push(attribute.name);
        Ok(())
    }

    /// Declare a variable over the named dimensions (empty for a scalar)
    pub fn add_variable(&mut self, name: &str, nc_type: NcType, dims: &[&str]) -> NcResult<()> {
        self.require_define(&format!("add variable '{}'", name))?;
        if !is_valid_name(name) {
            return Err(NcError::InvalidName(name.to_string()));
        }
        self.check_type(nc_type)?;
        if self.variables.iter().any(|v| v.name == name) {
            return Err(NcError::DuplicateName {
                kind: "variable",
                name: name.to_string(),
            });
        }
        let mut len = 1;
        for dim in dims {
            let dimension = self
                .dimensions
                .iter()
                .find(|d| d.name == *dim)
                .ok_or_else(|| NcError::UnknownDimension(dim.to_string()))?;
            len *= dimension.len;
        }

        match nc_type {
            NcType::Char => self
                .file
                .add_variable_with_type(name, dims, &NcVariableType::Char)
                .map(drop)?,
            NcType::Byte => self.file.add_variable::<i8>(name, dims).map(drop)?,
            NcType::Short => self.file.add_variable::<i16>(name, dims).map(drop)?,
            NcType::Int => self.file.add_variable::<i32>(name, dims).map(drop)?,
            NcType::Int64 => self.file.add_variable::<i64>(name, dims).map(drop)?,
            NcType::Float => self.file.add_variable::<f32>(name, dims).map(drop)?,
            NcType::Double => self.file.add_variable::<f64>(name, dims).map(drop)?,
        }

        self.variables.push(VarEntry {
            name: name.to_string(),
            nc_type,
            len,
            attributes: Vec::new(),
            written: false,
        });
        Ok(())
    }

    /// Declare an attribute on a previously declared variable
    pub fn add_variable_attribute(&mut self, variable: &str, attribute: Attribute) -> NcResult<()> {
        self.require_define(&format!(
            "add attribute '{}' to variable '{}'",
            attribute.name, variable
        ))?;
        self.check_type(attribute.value.nc_type())?;
        let entry = self
            .variables
            .iter_mut()
            .find(|v| v.name == variable)
            .ok_or_else(|| NcError::UnknownVariable(variable.to_string()))?;
        check_attribute(&entry.attributes, &attribute)?;

        let mut handle = self
            .file
            .variable_mut(variable)
            .ok_or_else(|| NcError::UnknownVariable(variable.to_string()))?;
        handle.put_attribute(&attribute.name, AttributeValue::from(&attribute.value))?;
        entry.attributes.push(attribute.name);
        Ok(())
    }

    /// Leave define mode.
    ///
    /// After this call any attempt to add dimensions, variables or attributes
    /// fails with [`NcError::DefineModeClosed`].
    pub fn end_define(&mut self) -> NcResult<()> {
        self.require_define("end define mode")?;
        self.mode = Mode::Data;
        debug!(
            "netCDF structure frozen: {} dimensions, {} variables, {} global attributes",
            self.dimensions.len(),
            self.variables.len(),
            self.globals.len()
        );
        Ok(())
    }

    /// Write the complete contents of one variable
    pub fn write_variable(&mut self, name: &str, data: &VarData) -> NcResult<()> {
        if self.mode != Mode::Data {
            return Err(NcError::StillInDefineMode(name.to_string()));
        }
        let entry = self
            .variables
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| NcError::UnknownVariable(name.to_string()))?;
        if entry.written {
            return Err(NcError::AlreadyWritten(name.to_string()));
        }
        if data.nc_type() != entry.nc_type {
            return Err(NcError::TypeMismatch {
                variable: name.to_string(),
                expected: entry.nc_type,
                found: data.nc_type(),
            });
        }
        if data.len() != entry.len {
            return Err(NcError::LengthMismatch {
                variable: name.to_string(),
                expected: entry.len,
                found: data.len(),
            });
        }

        let mut variable = self
            .file
            .variable_mut(name)
            .ok_or_else(|| NcError::UnknownVariable(name.to_string()))?;
        match data {
            VarData::Char(bytes) => variable.put_raw_values(bytes.as_slice(), ..)?,
            VarData::Byte(values) => variable.put_values(values.as_slice(), ..)?,
            VarData::Short(values) => variable.put_values(values.as_slice(), ..)?,
            VarData::Int(values) => variable.put_values(values.as_slice(), ..)?,
            VarData::Int64(values) => variable.put_values(values.as_slice(), ..)?,
            VarData::Float(values) => variable.put_values(values.as_slice(), ..)?,
            VarData::Double(values) => variable.put_values(values.as_slice(), ..)?,
        }
        entry.written = true;
        Ok(())
    }

    /// Verify every variable was written and close the file
    pub fn finish(mut self) -> NcResult<()> {
        if self.mode == Mode::Define {
            self.end_define()?;
        }
        if let Some(missing) = self.variables.iter().find(|v| !v.written) {
            return Err(NcError::MissingData(missing.name.clone()));
        }
        self.file.close()?;
        Ok(())
    }
}

fn check_attribute(existing: &[String], attribute: &Attribute) -> NcResult<()> {
    if !is_valid_name(&attribute.name) {
        return Err(NcError::InvalidName(attribute.name.clone()));
    }
    if existing.iter().any(|name| *name == attribute.name) {
        return Err(NcError::DuplicateName {
            kind: "attribute",
            name: attribute.name.clone(),
        });
    }
    Ok(())
}
