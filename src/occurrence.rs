use jiff::civil::Date;

use crate::{
    error::ValidationError,
    spec::{RecurrenceRequest, RecurrenceSpec},
};

/// Validates the given request and expands it into its occurrences.
///
/// Either every occurrence is returned, or a validation error is. There is
/// no partial result.
///
/// A rule whose only occurrence in range is its start date (for example,
/// because the interval is larger than the whole range) is not an error. It
/// simply produces a sequence of length one.
pub fn compute_occurrences(
    request: &RecurrenceRequest,
) -> Result<OccurrenceSequence, ValidationError> {
    let spec = request.validate()?;
    Ok(OccurrenceSequence::from_spec(&spec))
}

/// A lazy iterator over the occurrences of a [`RecurrenceSpec`].
///
/// The `n`-th occurrence is always computed directly from the start date by
/// advancing `n * interval` units. It is never derived from the previous
/// occurrence. This has two consequences. First, offset zero (the start date
/// itself) is always the first item. Second, clamping doesn't accumulate:
/// a monthly rule starting on the 31st goes from February 28th back to March
/// 31st instead of getting stuck on the 28th.
#[derive(Clone, Debug)]
pub struct Occurrences<'s> {
    spec: &'s RecurrenceSpec,
    /// The index of the next occurrence to produce.
    ///
    /// When this is `None`, iteration has ceased.
    index: Option<i64>,
}

impl<'s> Occurrences<'s> {
    pub(crate) fn new(spec: &'s RecurrenceSpec) -> Occurrences<'s> {
        Occurrences { spec, index: Some(0) }
    }
}

impl<'s> Iterator for Occurrences<'s> {
    type Item = Date;

    fn next(&mut self) -> Option<Date> {
        let index = self.index.take()?;
        let units = index.checked_mul(self.spec.interval())?;
        let date = self.spec.frequency().advance(self.spec.start(), units)?;
        if self.spec.frequency().is_repeating() {
            if self.spec.end().is_some_and(|end| date > end) {
                return None;
            }
            self.index = index.checked_add(1);
        }
        Some(date)
    }
}

impl<'s> std::iter::FusedIterator for Occurrences<'s> {}

/// The concrete, strictly ascending dates on which a rule occurs.
///
/// The first date is always the rule's start date.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize)]
pub struct OccurrenceSequence {
    dates: Vec<Date>,
    start_injected: bool,
}

impl OccurrenceSequence {
    /// Expands the given rule.
    pub fn from_spec(spec: &RecurrenceSpec) -> OccurrenceSequence {
        OccurrenceSequence::from_generated(spec.start(), spec.occurrences())
    }

    /// Builds a sequence from dates produced by a stepping loop, enforcing
    /// that `start` is the first date.
    ///
    /// The iterator in this crate always yields `start` first, so the
    /// injection below is an invariant check rather than something ordinary
    /// enumeration relies on. When it does fire, it's recorded via
    /// `start_injected` and logged.
    fn from_generated(
        start: Date,
        generated: impl IntoIterator<Item = Date>,
    ) -> OccurrenceSequence {
        let mut dates: Vec<Date> = generated
            .into_iter()
            .filter(|&date| date >= start)
            .collect();
        dates.sort();
        dates.dedup();
        let start_injected = dates.first() != Some(&start);
        if start_injected {
            log::warn!(
                "occurrences did not begin with start date {start}, \
                 inserting it",
            );
            dates.insert(0, start);
        }
        OccurrenceSequence { dates, start_injected }
    }

    /// The first occurrence, which is always the rule's start date.
    pub fn first(&self) -> Date {
        self.dates[0]
    }

    /// The last occurrence.
    pub fn last(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// The number of occurrences. This is never zero.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false, since a sequence contains at least its start date.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Whether the start date had to be inserted after generation.
    pub fn start_injected(&self) -> bool {
        self.start_injected
    }

    pub fn as_slice(&self) -> &[Date] {
        &self.dates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Date> {
        self.dates.iter()
    }

    pub fn into_vec(self) -> Vec<Date> {
        self.dates
    }
}

impl<'a> IntoIterator for &'a OccurrenceSequence {
    type IntoIter = std::slice::Iter<'a, Date>;
    type Item = &'a Date;

    fn into_iter(self) -> std::slice::Iter<'a, Date> {
        self.iter()
    }
}
