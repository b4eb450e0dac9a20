use jiff::civil::Date;

use crate::{
    error::ValidationError, frequency::FrequencyClass,
    occurrence::Occurrences,
};

/// A validated, immutable recurrence rule.
///
/// The only way to get one is through [`RecurrenceSpec::builder`] or
/// [`RecurrenceRequest::validate`], both of which check the rule's
/// invariants:
///
/// * A start date is present.
/// * The interval is at least `1` (one-off rules ignore the interval).
/// * When an end date is present, it is not before the start date.
///
/// A spec is meant to be built fresh for each calculation and thrown away
/// afterwards.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RecurrenceSpec {
    start: Date,
    end: Option<Date>,
    frequency: FrequencyClass,
    interval: i64,
}

impl RecurrenceSpec {
    /// Returns a builder for a rule with the given frequency.
    ///
    /// The start date is required. The interval defaults to `1`.
    pub fn builder(frequency: FrequencyClass) -> RecurrenceSpecBuilder {
        RecurrenceSpecBuilder::new(frequency)
    }

    /// The first date of this rule. It is always the first occurrence.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The inclusive upper bound of this rule, if any.
    pub fn end(&self) -> Option<Date> {
        self.end
    }

    pub fn frequency(&self) -> FrequencyClass {
        self.frequency
    }

    /// The number of frequency units between successive occurrences.
    ///
    /// This is always at least `1`.
    pub fn interval(&self) -> i64 {
        self.interval
    }

    /// Returns a lazy iterator over every occurrence of this rule, in
    /// ascending order.
    ///
    /// When the rule has no end date and repeats, this keeps going until
    /// calendar arithmetic leaves the range of dates Jiff supports (the end
    /// of year 9999). Use `take` to bound it.
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences::new(self)
    }

    /// Returns the first occurrence strictly after `date`, if one exists
    /// within this rule's bounds.
    ///
    /// This is what a completed recurring task uses to find when its next
    /// instance starts.
    pub fn next_after(&self, date: Date) -> Option<Date> {
        self.occurrences().find(|&occurrence| occurrence > date)
    }
}

/// A builder for a [`RecurrenceSpec`].
#[derive(Clone, Debug)]
pub struct RecurrenceSpecBuilder {
    start: Option<Date>,
    end: Option<Date>,
    frequency: FrequencyClass,
    interval: i64,
}

impl RecurrenceSpecBuilder {
    fn new(frequency: FrequencyClass) -> RecurrenceSpecBuilder {
        RecurrenceSpecBuilder { start: None, end: None, frequency, interval: 1 }
    }

    /// Validates and builds the rule.
    pub fn build(&self) -> Result<RecurrenceSpec, ValidationError> {
        let Some(start) = self.start else {
            return Err(ValidationError::MissingStart);
        };
        if self.frequency.is_repeating() && self.interval < 1 {
            return Err(ValidationError::InvalidInterval {
                interval: self.interval,
            });
        }
        if let Some(end) = self.end {
            if end < start {
                return Err(ValidationError::EndBeforeStart { start, end });
            }
        }
        Ok(RecurrenceSpec {
            start,
            end: self.end,
            frequency: self.frequency,
            interval: self.interval,
        })
    }

    pub fn start(&mut self, date: Date) -> &mut RecurrenceSpecBuilder {
        self.start = Some(date);
        self
    }

    /// Sets the inclusive end date.
    pub fn end(&mut self, date: Date) -> &mut RecurrenceSpecBuilder {
        self.end = Some(date);
        self
    }

    /// Sets the interval. Values less than `1` are rejected by `build`.
    pub fn interval(&mut self, interval: i64) -> &mut RecurrenceSpecBuilder {
        self.interval = interval;
        self
    }
}

/// The unvalidated description of a rule, as a caller submits it.
///
/// Every field is loose on purpose: the start may be missing, the frequency
/// is free text and the interval may be zero or negative. Turning this into
/// a [`RecurrenceSpec`] is where all of that gets checked.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRequest {
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub frequency: String,
    /// Defaults to `1` when absent.
    pub interval: Option<i64>,
}

impl RecurrenceRequest {
    /// Validates this request into a rule.
    pub fn validate(&self) -> Result<RecurrenceSpec, ValidationError> {
        let frequency: FrequencyClass = self.frequency.parse()?;
        let mut builder = RecurrenceSpec::builder(frequency);
        if let Some(start) = self.start {
            builder.start(start);
        }
        if let Some(end) = self.end {
            builder.end(end);
        }
        if let Some(interval) = self.interval {
            builder.interval(interval);
        }
        builder.build()
    }
}
