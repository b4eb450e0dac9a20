use std::io::Write;

use crate::{
    args::{self, Usage, flags::Count},
    cmd::rule::Rule,
    style::Theme,
};

const USAGE: &'static str = r#"
Print every occurrence of a recurrence rule, one date per line.

The first date printed is always the start date. Dates are printed in
ascending order and never go past the end date, when one is given.

USAGE:
    recur seq <frequency> <start>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Print every other day in a week:

        $ recur seq daily 2025-06-06 -e 2025-06-12 -i 2
        2025-06-06
        2025-06-08
        2025-06-10
        2025-06-12

    %snip-start%

    Monthly rules starting late in a month fall back to the last day of
    shorter months, but return to the original day when they can:

        $ recur seq monthly 2025-01-31 -c4
        2025-01-31
        2025-02-28
        2025-03-31
        2025-04-30

    An interval wider than the range between the start and end dates still
    produces the start date:

        $ recur seq weekly 2025-06-06 -e 2025-06-12 -i 2
        2025-06-06

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
    let count = config.count.map_or(usize::MAX, |c| c.get());
    let theme = Theme::stdout();
    let mut wtr = std::io::stdout().lock();
    for date in spec.occurrences().take(count) {
        writeln!(wtr, "{}", theme.date(date))?;
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    count: Option<Count>,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Short('c') | lexopt::Arg::Long("count") => {
                self.count = Some(args::parse(p, "-c/--count")?);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[Count::USAGE]
    }
}
