mod anchor;
mod next;
mod rule;
mod seq;
mod summary;

const USAGE: &'static str = "\
Expand recurrence rules into calendar dates.

USAGE:
    recur <command> ...

COMMANDS:
    anchor   Decode timestamps that encode calendar dates
    next     Find the next occurrence of a rule after a date
    seq      Print every occurrence of a rule
    summary  Describe a rule and its occurrences
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "anchor" => anchor::run(p),
        "next" => next::run(p),
        "seq" => seq::run(p),
        "summary" => summary::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
