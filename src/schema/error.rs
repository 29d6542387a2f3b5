use crate::catalog::DeclaredType;

/// Errors raised while deriving dimensions and attributes
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    /// A vertical coordinate does not declare `positive` as `up` or `down`
    #[error("Vertical coordinate '{name}' needs attribute positive=\"up\" or \"down\", found '{value}'")]
    InvalidVerticalSense {
        /// User-visible name of the descriptor
        name: String,
        /// The declared value (empty when missing)
        value: String,
    },

    /// The same global attribute is declared in two groups
    #[error("Global attribute '{name}' is declared in both '{first_group}' and '{second_group}'")]
    DuplicateGlobal {
        /// Attribute name
        name: String,
        /// Group of the first declaration
        first_group: String,
        /// Group of the repeated declaration
        second_group: String,
    },

    /// A user global attribute contradicts a required value
    #[error("Global attribute '{name}' is '{found}' but this dataset requires '{expected}'")]
    ConflictingGlobal {
        /// Attribute name
        name: String,
        /// Value required by the dataset
        expected: String,
        /// Value supplied by the user
        found: String,
    },

    /// A user attribute name is not a legal netCDF name
    #[error("Attribute name '{name}' of '{owner}' is not a valid netCDF name")]
    InvalidName {
        /// Variable name, or `global`
        owner: String,
        /// The rejected name
        name: String,
    },

    /// An attribute value does not parse as its declared type
    #[error("Attribute '{name}' of '{owner}' has value '{value}' which is not a valid {expected:?}")]
    InvalidValue {
        /// Variable name, or `global`
        owner: String,
        /// Attribute name
        name: String,
        /// Raw value
        value: String,
        /// Declared type
        expected: DeclaredType,
    },

    /// Converted values are missing for a column variable
    #[error("No converted values for variable '{0}'")]
    MissingValues(String),

    /// Neither the template nor the configuration supplies a feature id
    #[error("Feature identifier is empty")]
    EmptyFeatureId,
}
