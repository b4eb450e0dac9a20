use std::io::Write;

use crate::{
    TODAY,
    args::{self, Usage},
    cmd::rule::Rule,
    date::DateArg,
    style::Theme,
};

const USAGE: &'static str = r#"
Find the next occurrence of a recurrence rule after a date.

The occurrence printed is strictly after the reference date, which defaults to
today. When the rule has no occurrences after the reference date, for example
because of its end date, nothing is printed.

This is useful for recurring tasks: when one instance is done, the next one
starts at the next occurrence after the date it was completed.

USAGE:
    recur next <frequency> <start>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Find the next weekly occurrence after a particular date:

        $ recur next weekly 2025-06-06 -a 2025-06-20
        2025-06-27

    %snip-start%

    The reference date may be before the start date, in which case the start
    date is the next occurrence:

        $ recur next monthly 2025-01-31 -a 2024-12-25
        2025-01-31

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut rule = Rule::default();
    let mut config = Config::default();
    args::configure(p, USAGE, &mut [&mut rule, &mut config])?;

    let spec = rule.spec()?;
    let after = match config.after {
        Some(after) => after.resolve(&rule.normalizer()),
        None => *TODAY,
    };
    let Some(next) = spec.next_after(after) else {
        log::debug!("rule has no occurrences after {after}");
        return Ok(());
    };
    let mut wtr = std::io::stdout().lock();
    writeln!(wtr, "{}", Theme::stdout().date(next))?;
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    after: Option<DateArg>,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Short('a') | lexopt::Arg::Long("after") => {
                self.after = Some(args::parse(p, "-a/--after")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[DateArg::AFTER]
    }
}
