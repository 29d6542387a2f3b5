//! Conversion templates: the user's global attribute groups and column
//! declarations, usually loaded from JSON.
//!
//! ```json
//! {
//!   "feature_type": "trajectory",
//!   "feature_id": "glider-42",
//!   "global_attributes": [
//!     { "group": "ACDD", "attributes": [ { "name": "title", "value": "Glider run" } ] }
//!   ],
//!   "variables": [
//!     { "source_key": "lat", "name": "latitude", "type": "float",
//!       "role": { "kind": "coordinate", "axis": "latitude" } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{AttributeSpec, VariableDescriptor};
use crate::schema::FeatureType;

/// Errors raised while loading a [`Template`]
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file could not be read
    #[error("Failed to read template: {0}")]
    IoError(#[from] std::io::Error),

    /// The template is not valid JSON or has the wrong shape
    #[error("Invalid template JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A named namespace of global attributes (e.g. `ACDD`, `CF`, `platform`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Namespace label, informational only
    #[serde(default)]
    pub group: String,
    /// Attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
}

impl AttributeGroup {
    /// Create an empty group
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute (builder style)
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Everything the user declared about one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Preferred feature type, used when the caller does not pass one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_type: Option<FeatureType>,
    /// Identifier of the single feature in the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    /// Global attribute groups, flattened in order when encoding
    #[serde(default)]
    pub global_attributes: Vec<AttributeGroup>,
    /// Column declarations in output order
    #[serde(default)]
    pub variables: Vec<VariableDescriptor>,
}

impl Template {
    /// Create a template from column declarations
    pub fn new(variables: Vec<VariableDescriptor>) -> Self {
        Self {
            variables,
            ..Default::default()
        }
    }

    /// Load a template from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TemplateError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a template from JSON text
    pub fn from_json_str(text: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// First global attribute with this name across all groups
    pub fn global_attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.global_attributes
            .iter()
            .flat_map(|g| g.attributes.iter())
            .find(|a| a.name == name)
    }
}
