use std::fmt;

use serde::{Deserialize, Serialize};

/// Type a column or attribute value is declared to hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    /// Free text
    #[default]
    #[serde(alias = "string", alias = "String")]
    Text,
    /// Whole numbers
    #[serde(alias = "int", alias = "Integer")]
    Integer,
    /// Real numbers
    #[serde(alias = "double", alias = "Float")]
    Float,
}

impl DeclaredType {
    /// Whether values of this type are numbers
    pub fn is_numeric(self) -> bool {
        !matches!(self, DeclaredType::Text)
    }
}

/// Coordinate axis a column can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    /// Time (T)
    Time,
    /// Latitude (Y)
    Latitude,
    /// Longitude (X)
    Longitude,
    /// Height or depth (Z)
    Vertical,
}

impl AxisKind {
    /// CF `axis` attribute value
    pub fn axis_code(self) -> &'static str {
        match self {
            AxisKind::Time => "T",
            AxisKind::Latitude => "Y",
            AxisKind::Longitude => "X",
            AxisKind::Vertical => "Z",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisKind::Time => "time",
            AxisKind::Latitude => "latitude",
            AxisKind::Longitude => "longitude",
            AxisKind::Vertical => "vertical",
        };
        f.write_str(name)
    }
}

/// Encoding of a column that carries (part of) the observation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeComponentKind {
    /// Numeric offsets from a reference time, described by a `units` attribute
    RelativeTime,
    /// Complete date and time text
    FullDateTime,
    /// Calendar date text
    DateOnly,
    /// Time-of-day text
    TimeOnly,
}

impl fmt::Display for TimeComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeComponentKind::RelativeTime => "relative time",
            TimeComponentKind::FullDateTime => "full date/time",
            TimeComponentKind::DateOnly => "date only",
            TimeComponentKind::TimeOnly => "time only",
        };
        f.write_str(name)
    }
}

/// Role a column plays in the output dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Coordinate variable along `axis`.
    ///
    /// A time coordinate is used verbatim when `time_kind` is absent or
    /// `RelativeTime`.
    Coordinate {
        /// Axis the column describes
        axis: AxisKind,
        /// Time encoding, only meaningful for the time axis
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_kind: Option<TimeComponentKind>,
    },
    /// Text piece of the time axis that must be parsed and combined
    TimeComponent {
        /// Which piece of the time this column holds
        #[serde(rename = "time_kind")]
        kind: TimeComponentKind,
        /// Declared parse pattern (Java-style or strftime)
        #[serde(default)]
        format: String,
    },
    /// Ordinary data variable
    Data,
    /// Column excluded from the output
    #[serde(alias = "Do Not Use", alias = "do_not_use")]
    Ignored,
}

impl Role {
    /// Shorthand for a plain coordinate role
    pub fn coordinate(axis: AxisKind) -> Self {
        Role::Coordinate {
            axis,
            time_kind: None,
        }
    }

    /// Shorthand for a time component role
    pub fn time_component(kind: TimeComponentKind, format: impl Into<String>) -> Self {
        Role::TimeComponent {
            kind,
            format: format.into(),
        }
    }
}

/// A `(name, value, type)` attribute as declared by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute name
    pub name: String,
    /// Attribute value as text
    pub value: String,
    /// How to interpret `value`
    #[serde(rename = "type", default)]
    pub value_type: DeclaredType,
}

impl AttributeSpec {
    /// Create an attribute specification
    pub fn new(name: impl Into<String>, value: impl Into<String>, value_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_type,
        }
    }

    /// Create a text attribute specification
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, DeclaredType::Text)
    }
}

/// User declaration for one input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Header name or zero-based column index of the source column
    #[serde(alias = "column")]
    pub source_key: String,
    /// Name the user wants in the output (sanitized before use)
    pub name: String,
    /// Declared value type of the column
    #[serde(rename = "type", default)]
    pub declared_type: DeclaredType,
    /// Role of the column
    pub role: Role,
    /// Variable attributes declared by the user
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
}

impl VariableDescriptor {
    /// Create a descriptor without attributes
    pub fn new(
        source_key: impl Into<String>,
        name: impl Into<String>,
        declared_type: DeclaredType,
        role: Role,
    ) -> Self {
        Self {
            source_key: source_key.into(),
            name: name.into(),
            declared_type,
            role,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Value of a declared attribute, by case-sensitive name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}
