/// Errors in the user's column role declarations.
///
/// These are configuration errors: they are detected before any row data is
/// parsed and always name the offending descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// A column declares contradictory time semantics
    #[error("Ambiguous time role for '{name}': {detail}")]
    AmbiguousTimeRole {
        /// User-visible name of the descriptor
        name: String,
        /// What contradicts what
        detail: String,
    },

    /// More than one column claims to be the relative time coordinate
    #[error("Only one relative time coordinate is allowed, found: {}", names.join(", "))]
    MultipleRelativeTime {
        /// User-visible names of the competing descriptors
        names: Vec<String>,
    },

    /// A descriptor does not say which column it reads
    #[error("Descriptor '{0}' has an empty source column key")]
    EmptySourceKey(String),
}
