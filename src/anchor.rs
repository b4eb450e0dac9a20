/*!
Decoding of the 16:00 UTC anchor convention.

Some date pickers record a calendar-only selection as a timestamp whose UTC
time-of-day is exactly 16:00:00. The time-of-day carries no meaning in that
case: it's a sentinel saying "this is a date, not an instant". Any other
time-of-day is taken at face value.

This is a boundary concern. It should be applied to incoming timestamps right
before a `RecurrenceSpec` is built, and never inside calendar arithmetic.

The heuristic is ambiguous by nature. A timestamp that really is 16:00 UTC
for an unrelated reason will be decoded as an anchor anyway. Whenever the
heuristic fires, an `AmbiguousAnchorWarning` is attached to the result so
callers can surface it if they care.
*/

use jiff::{
    SignedDuration, Timestamp,
    civil::{self, Date},
    tz::{Offset, TimeZone},
};

/// The UTC time-of-day that marks a timestamp as an encoded calendar date.
pub const ANCHOR_TIME: civil::Time = civil::time(16, 0, 0, 0);

/// Resolves boundary timestamps into civil dates for a caller at a fixed UTC
/// offset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnchorNormalizer {
    offset: Offset,
}

impl AnchorNormalizer {
    /// Creates a normalizer for a caller at the given UTC offset.
    pub fn new(offset: Offset) -> AnchorNormalizer {
        AnchorNormalizer { offset }
    }

    /// Creates a normalizer for a caller whose local time is the given
    /// number of minutes ahead of UTC (negative when behind).
    ///
    /// This returns an error when the offset is out of the range supported
    /// by Jiff (roughly ±26 hours).
    pub fn from_minutes(
        minutes: i32,
    ) -> Result<AnchorNormalizer, jiff::Error> {
        let seconds = minutes.checked_mul(60).unwrap_or(i32::MAX);
        Ok(AnchorNormalizer::new(Offset::from_seconds(seconds)?))
    }

    /// The caller's offset from UTC.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Resolves the given timestamp into a calendar date.
    ///
    /// When the UTC time-of-day of `timestamp` is exactly [`ANCHOR_TIME`],
    /// the sentinel time-of-day is dropped and the start of that UTC date is
    /// shifted by this normalizer's offset. The date it lands on is the
    /// result. For example, `2025-06-06T16:00:00Z` at offset `-08:00`
    /// resolves to `2025-06-05`.
    ///
    /// Shifting midnight rather than `timestamp` itself means offsets of
    /// `+08:00` and above keep the UTC date. Date pickers that decode by
    /// adding the offset to `timestamp` land one day later for those offsets.
    ///
    /// Otherwise, the UTC date of `timestamp` is returned unchanged.
    pub fn normalize(&self, timestamp: Timestamp) -> Anchored {
        let utc = TimeZone::UTC.to_datetime(timestamp);
        if utc.time() != ANCHOR_TIME {
            return Anchored { date: utc.date(), warning: None };
        }
        let sentinel = SignedDuration::from_hours(16);
        let Ok(midnight) = timestamp.checked_sub(sentinel) else {
            log::debug!(
                "anchor timestamp {timestamp} is too close to the minimum \
                 supported timestamp, using its UTC date",
            );
            return Anchored { date: utc.date(), warning: None };
        };
        let date = self.offset.to_datetime(midnight).date();
        let warning =
            AmbiguousAnchorWarning { timestamp, offset: self.offset, date };
        log::debug!("{warning}");
        Anchored { date, warning: Some(warning) }
    }
}

/// The civil date resolved from a boundary timestamp.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Anchored {
    /// The resolved calendar date.
    pub date: Date,
    /// Present when the anchor heuristic was applied.
    pub warning: Option<AmbiguousAnchorWarning>,
}

/// A non-fatal note that a timestamp was decoded with the anchor heuristic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AmbiguousAnchorWarning {
    /// The timestamp as it was given.
    pub timestamp: Timestamp,
    /// The offset used to decode it.
    pub offset: Offset,
    /// The date it was decoded to.
    pub date: Date,
}

impl std::fmt::Display for AmbiguousAnchorWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "timestamp {} has the 16:00 UTC anchor time-of-day, \
             interpreted as calendar date {} at a UTC offset of {} minutes",
            self.timestamp,
            self.date,
            self.offset.seconds() / 60,
        )
    }
}
