use {
    anyhow::Context,
    jiff::{Timestamp, civil::Date},
    recur::AnchorNormalizer,
};

use crate::{TODAY, args::Usage};

/// A date as given on the command line.
///
/// This is either a plain civil date, or an instant that still needs to be
/// resolved into a civil date. Resolution happens through an anchor
/// normalizer, since an instant might be a date picker's encoding of a
/// calendar date (see `--offset`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DateArg {
    Civil(Date),
    Instant(Timestamp),
}

impl DateArg {
    pub const START: Usage = Usage::arg(
        "<start>",
        "The first date of the rule, e.g., `2025-06-06` or `today`.",
        r#"
The first date of the rule, e.g., `2025-06-06` or `today`.

The start date is always the first occurrence of a rule.

A date may be written as `YYYY-MM-DD`, or as one of the special strings
`today`, `yesterday` or `tomorrow`. The current date is taken from your
system's time zone, or from the `RECUR_TODAY` environment variable when it's
set.

A date may also be given as an RFC 3339 timestamp, e.g.,
`2025-06-06T16:00:00Z`. The timestamp is resolved to a date as described in
the docs for `--offset`.
"#,
    );

    pub const END: Usage = Usage::flag(
        "-e/--end <date>",
        "The last date a rule may produce, inclusive.",
        r#"
The last date a rule may produce, inclusive.

This accepts the same formats as the start date. It must not be before the
start date. When this isn't given, the rule repeats without end.
"#,
    );

    pub const AFTER: Usage = Usage::flag(
        "-a/--after <date>",
        "Find the first occurrence strictly after this date.",
        r#"
Find the first occurrence strictly after this date.

This accepts the same formats as the start date. It defaults to today.
"#,
    );

    /// Parses a date argument with special strings interpreted relative to
    /// `today`.
    pub fn parse_relative(today: Date, s: &str) -> anyhow::Result<DateArg> {
        let s = s.trim();
        match s {
            "today" => return Ok(DateArg::Civil(today)),
            "yesterday" => {
                let date = today.yesterday().context("no date before today")?;
                return Ok(DateArg::Civil(date));
            }
            "tomorrow" => {
                let date = today.tomorrow().context("no date after today")?;
                return Ok(DateArg::Civil(date));
            }
            _ => {}
        }
        // A timestamp requires an offset, so try it first. Otherwise, a
        // civil date parse would happily drop the time and offset.
        let ts_err = match s.parse::<Timestamp>() {
            Ok(ts) => return Ok(DateArg::Instant(ts)),
            Err(err) => err,
        };
        match s.parse::<Date>() {
            Ok(date) => Ok(DateArg::Civil(date)),
            Err(date_err) => {
                log::debug!("failed to parse `{s}` as timestamp: {ts_err}");
                Err(anyhow::Error::from(date_err))
                    .with_context(|| format!("unrecognized date `{s}`"))
            }
        }
    }

    /// Resolves this argument to a civil date.
    ///
    /// When an instant was decoded with the anchor heuristic, a warning is
    /// logged.
    pub fn resolve(&self, normalizer: &AnchorNormalizer) -> Date {
        match *self {
            DateArg::Civil(date) => date,
            DateArg::Instant(ts) => {
                let anchored = normalizer.normalize(ts);
                if let Some(ref warning) = anchored.warning {
                    log::warn!("{warning}");
                }
                anchored.date
            }
        }
    }
}

impl std::str::FromStr for DateArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateArg> {
        DateArg::parse_relative(*TODAY, s)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn parse(s: &str) -> DateArg {
        DateArg::parse_relative(date(2025, 3, 1), s).unwrap()
    }

    #[test]
    fn special_strings() {
        assert_eq!(parse("today"), DateArg::Civil(date(2025, 3, 1)));
        assert_eq!(parse("yesterday"), DateArg::Civil(date(2025, 2, 28)));
        assert_eq!(parse("tomorrow"), DateArg::Civil(date(2025, 3, 2)));
    }

    #[test]
    fn civil_and_instant() {
        assert_eq!(parse("2025-06-06"), DateArg::Civil(date(2025, 6, 6)));
        assert_eq!(
            parse("2025-06-06T16:00:00Z"),
            DateArg::Instant("2025-06-06T16:00:00Z".parse().unwrap()),
        );
        assert_eq!(
            parse("2025-06-06T08:00:00-08:00"),
            DateArg::Instant("2025-06-06T16:00:00Z".parse().unwrap()),
        );
    }

    #[test]
    fn resolve_through_normalizer() {
        let normalizer = AnchorNormalizer::from_minutes(-480).unwrap();
        assert_eq!(
            parse("2025-06-06T16:00:00Z").resolve(&normalizer),
            date(2025, 6, 5),
        );
        assert_eq!(
            parse("2025-06-06T15:00:00Z").resolve(&normalizer),
            date(2025, 6, 6),
        );
        assert_eq!(parse("2025-06-06").resolve(&normalizer), date(2025, 6, 6));
    }

    #[test]
    fn unrecognized() {
        let err = DateArg::parse_relative(date(2025, 3, 1), "next week")
            .unwrap_err();
        insta::assert_snapshot!(err, @"unrecognized date `next week`");
    }
}
