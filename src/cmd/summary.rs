use std::io::Write;

use recur::Summary;

use crate::{
    args::{self, Usage, flags::Json},
    cmd::rule::Rule,
    style::Theme,
};

const USAGE: &'static str = r#"
Describe a recurrence rule and its occurrences.

This prints a short description of the rule, along with how many times it
occurs and its first and last occurrences.

A repeating rule without an end date is enumerated up to the last date recur
supports, at the end of the year 9999. That can take a moment, and the count
runs into the millions. Use `recur seq -c` to see only the first few dates.

Unlike other commands, an invalid rule is not an error here. Instead, the
rule is described as `Invalid Recurrence Rule` along with the reason it's
invalid, and recur exits successfully. This makes it suitable for previewing
a rule while it's still being edited.

USAGE:
    recur summary <frequency> <start>

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Summarize a fortnightly rule:

        $ recur summary weekly 2025-06-06 -e 2025-08-01 -i 2
        every 2 weeks until 2025-08-01
        count: 5
        first: 2025-06-06
        last: 2025-08-01

    %snip-start%

    An invalid rule still gets a summary:

        $ recur summary weekly 2025-06-06 -i 0
        Invalid Recurrence Rule
        error: interval must be at least 1, but got 0

    The same information is available as JSON:

        $ recur summary daily 2025-06-06 -e 2025-06-12 --json
        {
          "description": "every day until 2025-06-12",
          "count": 7,
          "first": "2025-06-06",
          "last": "2025-06-12",
          "start_injected": false,
          "error": null
        }

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

    let summary = recur::preview(&rule.request()?);
    let mut wtr = std::io::stdout().lock();
    if config.json.enabled() {
        serde_json::to_writer_pretty(&mut wtr, &summary)?;
        writeln!(wtr)?;
    } else {
        write_text(&mut wtr, &summary)?;
    }
    Ok(())
}

fn write_text<W: Write>(mut wtr: W, summary: &Summary) -> anyhow::Result<()> {
    let theme = Theme::stdout();
    if let Some(ref err) = summary.error {
        writeln!(wtr, "{}", theme.highlight(&summary.description))?;
        writeln!(wtr, "{}: {err}", theme.error("error"))?;
        return Ok(());
    }
    writeln!(wtr, "{}", theme.highlight(&summary.description))?;
    if let Some(count) = summary.count {
        writeln!(wtr, "count: {count}")?;
    }
    if let Some(first) = summary.first {
        writeln!(wtr, "first: {}", theme.date(first))?;
    }
    if let Some(last) = summary.last {
        writeln!(wtr, "last: {}", theme.date(last))?;
    }
    if summary.start_injected {
        log::warn!("start date had to be inserted into the occurrences");
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Config {
    json: Json,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("json") => self.json.enable(),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        &[Json::USAGE]
    }
}
