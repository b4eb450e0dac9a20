/*!
A recurrence engine for recurring tasks.

A recurrence rule is a start date, an optional inclusive end date, a
[`FrequencyClass`] and an interval. This crate expands such a rule into the
concrete, strictly ascending sequence of dates on which it occurs, and derives
a human readable [`Summary`] from that sequence.

Everything here is a pure function of its inputs. Nothing is cached and no
I/O is performed, so every type is a plain value that can be shared freely
across threads.

# Example

```
use jiff::civil::date;
use recur::{FrequencyClass, RecurrenceSpec};

let spec = RecurrenceSpec::builder(FrequencyClass::Monthly)
    .start(date(2025, 1, 31))
    .end(date(2025, 4, 30))
    .build()
    .unwrap();
let dates: Vec<_> = spec.occurrences().collect();
assert_eq!(dates, vec![
    date(2025, 1, 31),
    date(2025, 2, 28),
    date(2025, 3, 31),
    date(2025, 4, 30),
]);
```

# Boundary timestamps

Some upstream date pickers record a calendar-only selection as 16:00 on the
UTC timeline. [`AnchorNormalizer`] decodes that convention into a civil date.
It is meant to be applied once, right before a [`RecurrenceSpec`] is built,
so the enumerator itself never sees timestamps.
*/

pub use crate::{
    anchor::{ANCHOR_TIME, AmbiguousAnchorWarning, Anchored, AnchorNormalizer},
    error::ValidationError,
    frequency::FrequencyClass,
    occurrence::{OccurrenceSequence, Occurrences, compute_occurrences},
    spec::{RecurrenceRequest, RecurrenceSpec, RecurrenceSpecBuilder},
    summary::{INVALID_RULE_DESCRIPTION, Summary, preview, summarize},
};

mod anchor;
pub mod calendar;
mod error;
mod frequency;
mod occurrence;
mod spec;
mod summary;
