use std::io::Write;

use crate::{
    ANCHOR,
    args::{self, Usage, flags::UtcOffset, positional::Timestamps},
    style::Theme,
};

const USAGE: &'static str = r#"
Decode timestamps into calendar dates.

Some date pickers submit a calendar date as a timestamp whose UTC time-of-day
is exactly 16:00:00. This command decodes such timestamps into the calendar
date they stand for, given the UTC offset of whoever picked it. Timestamps
with any other time-of-day are printed as their UTC date.

One date is printed per timestamp, in the order given.

USAGE:
    recur anchor <timestamp>...
    recur anchor < line delimited <timestamp>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Decode a date picked by someone on Pacific Standard Time:

        $ recur anchor --offset -480 2025-06-06T16:00:00Z
        2025-06-05

    %snip-start%

    Only 16:00 UTC is treated specially:

        $ recur anchor --offset -480 2025-06-06T15:00:00Z
        2025-06-06

    To see when the anchor heuristic is applied, enable logging at the WARN
    level:

        $ RECUR_LOG=warn recur anchor --offset 60 2025-06-06T16:00:00Z

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut timestamps = Timestamps::default();
    args::configure(p, USAGE, &mut [&mut config, &mut timestamps])?;

    let normalizer = match config.offset {
        Some(offset) => offset.normalizer(),
        None => *ANCHOR,
    };
    let theme = Theme::stdout();
    let mut wtr = std::io::stdout().lock();
    timestamps.try_map(|ts| {
        let anchored = normalizer.normalize(ts);
        if let Some(warning) = anchored.warning {
            log::warn!("{warning}");
        }
        writeln!(wtr, "{}", theme.date(anchored.date))?;
        Ok(true)
    })?;
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    offset: Option<UtcOffset>,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("offset") => {
                self.offset = Some(args::parse(p, "--offset")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[UtcOffset::USAGE]
    }
}
