use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::error::{NcError, NcResult};
use super::types::{AttrValue, Attribute, Dimension, FileFormat, NcType, VarData};

/// A variable as described by a file header
#[derive(Debug, Clone)]
pub struct NcVariable {
    /// Variable name
    pub name: String,
    /// Element type
    pub nc_type: NcType,
    /// Dimension names, outermost first
    pub dimensions: Vec<String>,
    /// Variable attributes in file order
    pub attributes: Vec<Attribute>,
}

impl NcVariable {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Whether the variable has no dimensions
    pub fn is_scalar(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Header of a netCDF classic or CDF-5 file
#[derive(Debug, Clone)]
pub struct NcHeader {
    /// File format variant
    pub format: FileFormat,
    /// Dimensions in definition order
    pub dimensions: Vec<Dimension>,
    /// Global attributes in file order
    pub global_attributes: Vec<Attribute>,
    /// Variables in definition order
    pub variables: Vec<NcVariable>,
}

impl NcHeader {
    /// Look up a global attribute by name
    pub fn global_attribute(&self, name: &str) -> Option<&AttrValue> {
        self.global_attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Look up a variable by name
    pub fn variable(&self, name: &str) -> Option<&NcVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Look up a dimension by name
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Names of a variable's dimensions
    pub fn dimension_names(&self, variable: &NcVariable) -> Vec<String> {
        variable.dimensions.clone()
    }

    /// Shape of a variable (dimension lengths)
    pub fn shape(&self, variable: &NcVariable) -> Vec<usize> {
        variable
            .dimensions
            .iter()
            .filter_map(|name| self.dimension(name).map(|d| d.len))
            .collect()
    }
}

/// Snapshot of a netCDF classic or CDF-5 file: header plus every variable's data
#[derive(Debug, Clone)]
pub struct NcReader {
    header: NcHeader,
    data: Vec<VarData>,
    file_size: u64,
}

impl NcReader {
    /// Read a file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> NcResult<Self> {
        let path = path.as_ref();
        let mut head = [0u8; 4];
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();
        file.read_exact(&mut head)
            .map_err(|_| NcError::InvalidFormat("file too short for magic number".to_string()))?;
        let format = FileFormat::from_signature(&head)?;
        drop(file);

        let dataset = netcdf::open(path)?;
        Self::snapshot(&dataset, format, file_size)
    }

    /// Read a file held in memory.
    ///
    /// The library only opens paths, so the bytes are staged in a temporary
    /// file that is removed before this returns.
    pub fn from_bytes(bytes: Vec<u8>) -> NcResult<Self> {
        FileFormat::from_signature(&bytes)?;
        let mut staged = tempfile::Builder::new().suffix(".nc").tempfile()?;
        staged.write_all(&bytes)?;
        staged.flush()?;
        Self::open(staged.path())
    }

    /// The file header
    pub fn header(&self) -> &NcHeader {
        &self.header
    }

    /// Total size of the file in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// The complete contents of a variable
    pub fn read_variable(&self, name: &str) -> NcResult<VarData> {
        self.header
            .variables
            .iter()
            .position(|v| v.name == name)
            .map(|index| self.data[index].clone())
            .ok_or_else(|| NcError::UnknownVariable(name.to_string()))
    }

    fn snapshot(dataset: &netcdf::File, format: FileFormat, file_size: u64) -> NcResult<Self> {
        let dimensions = dataset
            .dimensions()
            .map(|d| Dimension::new(d.name(), d.len()))
            .collect();
        let global_attributes = dataset
            .attributes()
            .map(|a| read_attribute(&a))
            .collect::<NcResult<Vec<_>>>()?;

        let mut variables = Vec::new();
        let mut data = Vec::new();
        for variable in dataset.variables() {
            let nc_type = NcType::from_library(&variable.vartype())?;
            let attributes = variable
                .attributes()
                .map(|a| read_attribute(&a))
                .collect::<NcResult<Vec<_>>>()?;
            data.push(read_values(&variable, nc_type)?);
            variables.push(NcVariable {
                name: variable.name(),
                nc_type,
                dimensions: variable.dimensions().iter().map(|d| d.name()).collect(),
                attributes,
            });
        }

        Ok(Self {
            header: NcHeader {
                format,
                dimensions,
                global_attributes,
                variables,
            },
            data,
            file_size,
        })
    }
}

fn read_attribute(attribute: &netcdf::Attribute<'_>) -> NcResult<Attribute> {
    let value = AttrValue::try_from(attribute.value()?)?;
    Ok(Attribute::new(attribute.name(), value))
}

fn read_values(variable: &netcdf::Variable<'_>, nc_type: NcType) -> NcResult<VarData> {
    let data = match nc_type {
        NcType::Char => VarData::Char(variable.get_raw_values(..)?),
        NcType::Byte => VarData::Byte(variable.get_values::<i8, _>(..)?),
        NcType::Short => VarData::Short(variable.get_values::<i16, _>(..)?),
        NcType::Int => VarData::Int(variable.get_values::<i32, _>(..)?),
        NcType::Int64 => VarData::Int64(variable.get_values::<i64, _>(..)?),
        NcType::Float => VarData::Float(variable.get_values::<f32, _>(..)?),
        NcType::Double => VarData::Double(variable.get_values::<f64, _>(..)?),
    };
    Ok(data)
}
