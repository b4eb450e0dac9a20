use anyhow::Context;

use recur::AnchorNormalizer;

use crate::args::Usage;

/// A caller's UTC offset, given as a number of minutes.
///
/// This is what anchor timestamps are decoded against. Positive values are
/// ahead of UTC and negative values are behind it, so `-480` is Pacific
/// Standard Time and `330` is India Standard Time.
#[derive(Clone, Copy, Debug)]
pub struct UtcOffset {
    normalizer: AnchorNormalizer,
}

impl UtcOffset {
    pub const USAGE: Usage = Usage::flag(
        "--offset <minutes>",
        "The caller's UTC offset, in minutes, used to decode anchors.",
        r#"
The caller's UTC offset, in minutes, used to decode anchors.

Some date pickers submit a calendar date as a timestamp whose UTC time-of-day
is exactly 16:00:00. When a timestamp like that is given anywhere a date is
expected, the 16:00 is discarded and the start of that UTC day is shifted by
this offset. The date it lands on is the one used. For example, with
`--offset -480`, the timestamp `2025-06-06T16:00:00Z` is decoded as
`2025-06-05`. Timestamps with any other time-of-day use their UTC date as-is.

Positive values are ahead of UTC and negative values are behind it. When this
flag isn't given, the `RECUR_UTC_OFFSET` environment variable is used. If
that isn't set either, the offset of your system's time zone at the current
time is used. (The system time zone can be overridden with `TZ`.)
"#,
    );

    /// Returns the anchor normalizer for this offset.
    pub fn normalizer(&self) -> AnchorNormalizer {
        self.normalizer
    }
}

impl std::str::FromStr for UtcOffset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<UtcOffset> {
        let minutes: i32 = s.trim().parse().with_context(|| {
            format!("failed to parse `{s}` as a number of minutes")
        })?;
        let normalizer =
            AnchorNormalizer::from_minutes(minutes).with_context(|| {
                format!("UTC offset of {minutes} minutes is out of range")
            })?;
        Ok(UtcOffset { normalizer })
    }
}

/// The number of dates to emit.
#[derive(Clone, Copy, Debug)]
pub struct Count(usize);

impl Count {
    pub const USAGE: Usage = Usage::flag(
        "-c/--count <number>",
        "Emit at most this many occurrences.",
        r#"
Emit at most this many occurrences.

The value may be zero. When this isn't given and the rule has no end date,
occurrences are emitted until the last date recur supports (the end of year
9999), which is probably not what you want.
"#,
    );

    pub fn get(&self) -> usize {
        self.0
    }
}

impl std::str::FromStr for Count {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Count> {
        let count: usize = s
            .parse()
            .with_context(|| format!("failed to parse `{s}` as an integer"))?;
        Ok(Count(count))
    }
}

/// A switch for emitting JSON instead of plain text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json(bool);

impl Json {
    pub const USAGE: Usage = Usage::flag(
        "--json",
        "Print output as JSON.",
        r#"
Print output as JSON.

The JSON is pretty printed and always an object. Fields that don't apply, such
as the statistics of an invalid rule, are `null`.
"#,
    );

    pub fn enable(&mut self) {
        self.0 = true;
    }

    pub fn enabled(&self) -> bool {
        self.0
    }
}
