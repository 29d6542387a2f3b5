use std::fmt;

use netcdf::types::{FloatType, IntType, NcVariableType};
use netcdf::AttributeValue;
use serde::{Deserialize, Serialize};

use super::error::{NcError, NcResult};
use super::MAGIC;

/// On-disk variant of the netCDF classic family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// CDF-1, the original classic format (32-bit offsets, no 64-bit integers)
    #[default]
    Classic,
    /// CDF-5, the 64-bit data format (64-bit offsets and sizes, `int64` type)
    Cdf5,
}

impl FileFormat {
    /// Library creation mode for this format
    pub(crate) fn create_options(self) -> netcdf::Options {
        match self {
            FileFormat::Classic => netcdf::Options::empty(),
            FileFormat::Cdf5 => netcdf::Options::_64BIT_DATA,
        }
    }

    /// Identify the format from the first bytes of a file
    pub fn from_signature(head: &[u8]) -> NcResult<Self> {
        if head.len() < 4 || !head.starts_with(MAGIC) {
            return Err(NcError::InvalidFormat(
                "missing CDF magic number".to_string(),
            ));
        }
        match head[3] {
            1 => Ok(FileFormat::Classic),
            5 => Ok(FileFormat::Cdf5),
            2 => Err(NcError::UnsupportedFeature(
                "64-bit offset (CDF-2) files".to_string(),
            )),
            version => Err(NcError::InvalidFormat(format!(
                "unknown format version {}",
                version
            ))),
        }
    }

    /// Whether 64-bit integral variables can be stored
    pub fn supports_int64(self) -> bool {
        matches!(self, FileFormat::Cdf5)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Classic => write!(f, "classic"),
            FileFormat::Cdf5 => write!(f, "cdf5"),
        }
    }
}

/// External data types of the netCDF classic data model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NcType {
    /// 8-bit signed integer
    Byte,
    /// 8-bit character
    Char,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 32-bit IEEE float
    Float,
    /// 64-bit IEEE float
    Double,
    /// 64-bit signed integer (CDF-5 only)
    Int64,
}

impl NcType {
    /// Map a library variable type onto the classic data model
    pub(crate) fn from_library(vartype: &NcVariableType) -> NcResult<Self> {
        match vartype {
            NcVariableType::Char => Ok(NcType::Char),
            NcVariableType::Int(IntType::I8) => Ok(NcType::Byte),
            NcVariableType::Int(IntType::I16) => Ok(NcType::Short),
            NcVariableType::Int(IntType::I32) => Ok(NcType::Int),
            NcVariableType::Int(IntType::I64) => Ok(NcType::Int64),
            NcVariableType::Float(FloatType::F32) => Ok(NcType::Float),
            NcVariableType::Float(FloatType::F64) => Ok(NcType::Double),
            other => Err(NcError::UnsupportedFeature(format!(
                "variable type {:?}",
                other
            ))),
        }
    }

    /// Whether the type holds numbers rather than characters
    pub fn is_numeric(self) -> bool {
        !matches!(self, NcType::Char)
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NcType::Byte => "byte",
            NcType::Char => "char",
            NcType::Short => "short",
            NcType::Int => "int",
            NcType::Float => "float",
            NcType::Double => "double",
            NcType::Int64 => "int64",
        };
        f.write_str(name)
    }
}

/// A named dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension name
    pub name: String,
    /// Dimension length
    pub len: usize,
}

impl Dimension {
    /// Create a fixed-size dimension
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// Value of a global or variable attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Character string
    Text(String),
    /// 8-bit integers
    Byte(Vec<i8>),
    /// 16-bit integers
    Short(Vec<i16>),
    /// 32-bit integers
    Int(Vec<i32>),
    /// 64-bit integers
    Int64(Vec<i64>),
    /// 32-bit floats
    Float(Vec<f32>),
    /// 64-bit floats
    Double(Vec<f64>),
}

impl AttrValue {
    /// The netCDF type of this value
    pub fn nc_type(&self) -> NcType {
        match self {
            AttrValue::Text(_) => NcType::Char,
            AttrValue::Byte(_) => NcType::Byte,
            AttrValue::Short(_) => NcType::Short,
            AttrValue::Int(_) => NcType::Int,
            AttrValue::Int64(_) => NcType::Int64,
            AttrValue::Float(_) => NcType::Float,
            AttrValue::Double(_) => NcType::Double,
        }
    }

    /// Number of elements (bytes for text)
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Text(s) => s.len(),
            AttrValue::Byte(v) => v.len(),
            AttrValue::Short(v) => v.len(),
            AttrValue::Int(v) => v.len(),
            AttrValue::Int64(v) => v.len(),
            AttrValue::Float(v) => v.len(),
            AttrValue::Double(v) => v.len(),
        }
    }

    /// Whether the value has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the text of a character attribute
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// First element of a numeric attribute, widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Text(_) => None,
            AttrValue::Byte(v) => v.first().map(|&x| f64::from(x)),
            AttrValue::Short(v) => v.first().map(|&x| f64::from(x)),
            AttrValue::Int(v) => v.first().map(|&x| f64::from(x)),
            AttrValue::Int64(v) => v.first().map(|&x| x as f64),
            AttrValue::Float(v) => v.first().map(|&x| f64::from(x)),
            AttrValue::Double(v) => v.first().copied(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(values: &[T]) -> String {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
        match self {
            AttrValue::Text(s) => write!(f, "\"{}\"", s),
            AttrValue::Byte(v) => write!(f, "{}", join(v)),
            AttrValue::Short(v) => write!(f, "{}", join(v)),
            AttrValue::Int(v) => write!(f, "{}", join(v)),
            AttrValue::Int64(v) => write!(f, "{}", join(v)),
            AttrValue::Float(v) => write!(f, "{}", join(v)),
            AttrValue::Double(v) => write!(f, "{}", join(v)),
        }
    }
}

impl From<&AttrValue> for AttributeValue {
    fn from(value: &AttrValue) -> Self {
        match value {
            AttrValue::Text(s) => AttributeValue::Str(s.clone()),
            AttrValue::Byte(v) => AttributeValue::Schars(v.clone()),
            AttrValue::Short(v) => AttributeValue::Shorts(v.clone()),
            AttrValue::Int(v) => AttributeValue::Ints(v.clone()),
            AttrValue::Int64(v) => AttributeValue::Longlongs(v.clone()),
            AttrValue::Float(v) => AttributeValue::Floats(v.clone()),
            AttrValue::Double(v) => AttributeValue::Doubles(v.clone()),
        }
    }
}

impl TryFrom<AttributeValue> for AttrValue {
    type Error = NcError;

    fn try_from(value: AttributeValue) -> NcResult<Self> {
        Ok(match value {
            AttributeValue::Str(s) => AttrValue::Text(s),
            AttributeValue::Schar(x) => AttrValue::Byte(vec![x]),
            AttributeValue::Schars(v) => AttrValue::Byte(v),
            AttributeValue::Short(x) => AttrValue::Short(vec![x]),
            AttributeValue::Shorts(v) => AttrValue::Short(v),
            AttributeValue::Int(x) => AttrValue::Int(vec![x]),
            AttributeValue::Ints(v) => AttrValue::Int(v),
            AttributeValue::Longlong(x) => AttrValue::Int64(vec![x]),
            AttributeValue::Longlongs(v) => AttrValue::Int64(v),
            AttributeValue::Float(x) => AttrValue::Float(vec![x]),
            AttributeValue::Floats(v) => AttrValue::Float(v),
            AttributeValue::Double(x) => AttrValue::Double(vec![x]),
            AttributeValue::Doubles(v) => AttrValue::Double(v),
            other => {
                return Err(NcError::UnsupportedFeature(format!(
                    "attribute value {:?}",
                    other
                )))
            }
        })
    }
}

/// A named attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Attribute value
    pub value: AttrValue,
}

impl Attribute {
    /// Create an attribute from any value
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a character attribute
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Text(value.into()))
    }
}

/// Flat contents of a variable, row-major
#[derive(Debug, Clone, PartialEq)]
pub enum VarData {
    /// Characters (one byte per element)
    Char(Vec<u8>),
    /// 8-bit integers
    Byte(Vec<i8>),
    /// 16-bit integers
    Short(Vec<i16>),
    /// 32-bit integers
    Int(Vec<i32>),
    /// 64-bit integers
    Int64(Vec<i64>),
    /// 32-bit floats
    Float(Vec<f32>),
    /// 64-bit floats
    Double(Vec<f64>),
}

impl VarData {
    /// The netCDF type of these values
    pub fn nc_type(&self) -> NcType {
        match self {
            VarData::Char(_) => NcType::Char,
            VarData::Byte(_) => NcType::Byte,
            VarData::Short(_) => NcType::Short,
            VarData::Int(_) => NcType::Int,
            VarData::Int64(_) => NcType::Int64,
            VarData::Float(_) => NcType::Float,
            VarData::Double(_) => NcType::Double,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            VarData::Char(v) => v.len(),
            VarData::Byte(v) => v.len(),
            VarData::Short(v) => v.len(),
            VarData::Int(v) => v.len(),
            VarData::Int64(v) => v.len(),
            VarData::Float(v) => v.len(),
            VarData::Double(v) => v.len(),
        }
    }

    /// Whether there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values widened to f64 (None for character data)
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            VarData::Char(_) => None,
            VarData::Byte(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            VarData::Short(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            VarData::Int(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            VarData::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            VarData::Float(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
            VarData::Double(v) => Some(v.clone()),
        }
    }

    /// Split a character array into fixed-width strings, trimming trailing NULs
    pub fn to_strings(&self, width: usize) -> Option<Vec<String>> {
        match self {
            VarData::Char(bytes) if width > 0 => Some(
                bytes
                    .chunks(width)
                    .map(|chunk| {
                        let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                        String::from_utf8_lossy(&chunk[..end]).into_owned()
                    })
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// Check whether a name is legal in a netCDF classic file.
///
/// The first character must be a letter, digit or underscore (or a multi-byte
/// UTF-8 character); later characters may not be `/` or control characters,
/// and the name may not end in whitespace.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !(first.is_ascii_alphanumeric() || first == '_' || !first.is_ascii()) {
        return false;
    }
    if name.chars().any(|c| c == '/' || c.is_control()) {
        return false;
    }
    !name.ends_with(char::is_whitespace)
}
