use {
    anyhow::Context,
    recur::{AnchorNormalizer, RecurrenceRequest, RecurrenceSpec},
};

use crate::{
    ANCHOR,
    args::{self, Usage, flags::UtcOffset},
    date::DateArg,
};

const FREQUENCY: Usage = Usage::arg(
    "<frequency>",
    "One of `one-off`, `daily`, `weekly`, `monthly` or `yearly`.",
    r#"
One of `one-off`, `daily`, `weekly`, `monthly` or `yearly`.

This is the unit a rule advances by. Matching is case insensitive and a few
aliases are accepted, e.g., `once`, `week` or `annually`.

A `one-off` rule occurs exactly once, on its start date, and ignores any
interval. Monthly and yearly rules keep the day of the start date when they
can, and fall back to the last day of the month when they can't. For example,
a monthly rule starting on `2025-01-31` occurs on `2025-02-28`, then on
`2025-03-31`.
"#,
);

const INTERVAL: Usage = Usage::flag(
    "-i/--interval <number>",
    "Occur every N frequency units. Defaults to 1.",
    r#"
Occur every N frequency units. Defaults to 1.

For example, a weekly rule with an interval of 2 occurs every other week. The
interval must be at least 1, except for one-off rules, which ignore it.
"#,
);

/// The CLI configuration shared by every command that takes a rule.
///
/// The frequency and start date are positional, in that order. Everything
/// else is a flag. Nothing is validated here beyond parsing: turning this
/// into a `RecurrenceSpec` is where invalid rules are caught.
#[derive(Debug, Default)]
pub struct Rule {
    frequency: Option<String>,
    start: Option<DateArg>,
    end: Option<DateArg>,
    interval: Option<i64>,
    offset: Option<UtcOffset>,
}

impl Rule {
    /// The normalizer used to resolve any timestamps given for dates.
    pub fn normalizer(&self) -> AnchorNormalizer {
        match self.offset {
            Some(offset) => offset.normalizer(),
            None => *ANCHOR,
        }
    }

    /// Resolves this configuration into an unvalidated request.
    ///
    /// This only fails when the frequency argument is missing entirely.
    pub fn request(&self) -> anyhow::Result<RecurrenceRequest> {
        let frequency = self
            .frequency
            .clone()
            .context("missing required <frequency> argument")?;
        let normalizer = self.normalizer();
        Ok(RecurrenceRequest {
            start: self.start.map(|d| d.resolve(&normalizer)),
            end: self.end.map(|d| d.resolve(&normalizer)),
            frequency,
            interval: self.interval,
        })
    }

    /// Resolves and validates this configuration into a rule.
    pub fn spec(&self) -> anyhow::Result<RecurrenceSpec> {
        let request = self.request()?;
        let spec = request.validate().context("invalid recurrence rule")?;
        log::debug!("validated recurrence rule: {spec:?}");
        Ok(spec)
    }
}

impl args::Configurable for Rule {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Value(ref mut v) => {
                if self.frequency.is_none() {
                    let v = std::mem::take(v);
                    let freq = v.into_string().map_err(|v| {
                        anyhow::anyhow!("<frequency> `{v:?}` is not UTF-8")
                    })?;
                    self.frequency = Some(freq);
                } else if self.start.is_none() {
                    let start = v
                        .to_str()
                        .context("<start> is not valid UTF-8")?
                        .parse::<DateArg>()
                        .context("<start>")?;
                    self.start = Some(start);
                } else {
                    return Ok(false);
                }
            }
            lexopt::Arg::Short('e') | lexopt::Arg::Long("end") => {
                self.end = Some(args::parse(p, "-e/--end")?);
            }
            lexopt::Arg::Short('i') | lexopt::Arg::Long("interval") => {
                self.interval = Some(args::parse(p, "-i/--interval")?);
            }
            lexopt::Arg::Long("offset") => {
                self.offset = Some(args::parse(p, "--offset")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[FREQUENCY, DateArg::START, DateArg::END, INTERVAL, UtcOffset::USAGE]
    }
}
