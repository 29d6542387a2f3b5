/// Errors raised while aligning observation series
#[derive(Debug, thiserror::Error)]
pub enum MatchupError {
    /// A requested series is not in the set
    #[error("Unknown series: '{0}'")]
    UnknownSeries(String),

    /// The series that defines the reference timeline has no observations
    #[error("Reference series '{0}' has no observations")]
    EmptyReference(String),

    /// No sample of a series can be matched to a reference timestamp
    #[error("No observation of '{series}' can be matched to timestamp {timestamp}")]
    NoTemporalMatch {
        /// Series that has no usable sample
        series: String,
        /// Reference timestamp (seconds since the epoch)
        timestamp: i64,
    },

    /// The same series was requested twice
    #[error("Series '{0}' is requested more than once")]
    DuplicateRequest(String),

    /// A long-form record has an empty variable name
    #[error("Record at timestamp {0} has no variable name")]
    UnnamedRecord(i64),
}
