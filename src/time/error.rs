/// Errors raised while building the time coordinate
#[derive(Debug, thiserror::Error)]
pub enum TimeAxisError {
    /// No descriptor supplies time information
    #[error("No time information supplied: declare a relative time coordinate or date/time columns")]
    NoTimeInformation,

    /// The combination of time components cannot be resolved unambiguously
    #[error("Too many time components: {}", names.join(", "))]
    TooManyTimeComponents {
        /// User-visible names of the conflicting components
        names: Vec<String>,
    },

    /// A time-of-day column was declared without a date column
    #[error("Time-only column '{0}' needs a date-only column to combine with")]
    MissingDateComponent(String),

    /// A time component has an empty format pattern
    #[error("Time component '{0}' has no format pattern")]
    MissingFormat(String),

    /// The relative time coordinate does not declare its units
    #[error("Relative time column '{0}' has no 'units' attribute")]
    MissingUnits(String),

    /// A declared pattern cannot be translated
    #[error("Invalid time format for '{column}': {reason}")]
    InvalidFormat {
        /// User-visible name of the component
        column: String,
        /// Why the pattern was rejected
        reason: String,
    },

    /// A time column is absent from the parsed table
    #[error("Time column '{0}' not found in input")]
    MissingColumn(String),

    /// A cell could not be parsed with the declared format
    #[error("Cannot parse time in column '{column}' at row {row}: '{text}' ({reason})")]
    Parse {
        /// User-visible column name
        column: String,
        /// Zero-based data row index
        row: usize,
        /// Offending cell text
        text: String,
        /// Parser diagnostic
        reason: String,
    },

    /// A timestamp does not fit in the 32-bit output type
    #[error("Time value {value} at row {row} does not fit in a 32-bit integer")]
    Overflow {
        /// Zero-based data row index
        row: usize,
        /// Seconds since the epoch
        value: i64,
    },
}
