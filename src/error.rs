use jiff::civil::Date;

/// An error describing why a recurrence rule is structurally invalid.
///
/// These are never corrected silently. Whenever a rule fails validation, no
/// occurrences are produced at all.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The rule has no start date.
    ///
    /// An end date without a start date is rejected too, rather than
    /// guessing a start from it.
    #[error("a start date is required")]
    MissingStart,
    /// The interval is zero or negative for a stepping frequency.
    #[error("interval must be at least 1, but got {interval}")]
    InvalidInterval {
        /// The interval that was given.
        interval: i64,
    },
    /// The inclusive end date precedes the start date.
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart {
        /// The start of the rule.
        start: Date,
        /// The end of the rule.
        end: Date,
    },
    /// The frequency name isn't one of the known frequency classes.
    #[error("unrecognized frequency class `{name}`")]
    UnknownFrequency {
        /// The name that was given.
        name: String,
    },
}
