use {
    anyhow::Context,
    bstr::{BStr, BString, ByteSlice, ByteVec, io::BufReadExt},
    jiff::Timestamp,
};

use crate::args::{Configurable, Usage};

/// The CLI parsing configuration for reading timestamps.
///
/// This will greedily consume all remaining positional arguments as
/// timestamps. When there are none, timestamps are read from `stdin` instead,
/// one per line.
#[derive(Clone, Debug, Default)]
pub struct Timestamps(Arguments);

impl Timestamps {
    pub const ARG_OR_STDIN: Usage = Usage::arg(
        "<timestamp>",
        "An RFC 3339 timestamp, e.g., `2025-06-06T16:00:00Z`.",
        r#"
An RFC 3339 timestamp, e.g., `2025-06-06T16:00:00Z`.

Timestamps can either be passed as positional arguments or as line delimited
data on stdin, but not both. That is, timestamps will only be read from stdin
when there are no timestamps provided as positional arguments.

A timestamp must include a UTC offset (or `Z`), since without one it doesn't
identify a single instant.
"#,
    );

    /// Run the given function over each timestamp read from the CLI.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(Timestamp) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        self.0.try_map(|arg| f(arg.to_timestamp()?))
    }
}

impl Configurable for Timestamps {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        self.0.configure(p, arg)
    }

    fn usage(&self) -> &[Usage] {
        &[Timestamps::ARG_OR_STDIN]
    }
}

/// The parsing configuration for reading arguments either as positional
/// arguments on the CLI, or as line-delimited data on `stdin`.
///
/// When there are _zero_ positional arguments, then this will read lines from
/// stdin instead.
#[derive(Clone, Debug, Default)]
pub struct Arguments {
    positional: Vec<BString>,
}

impl Arguments {
    /// Run the given function over each argument read from the CLI.
    ///
    /// If there were no positional arguments, then this tries to read them
    /// from stdin, one per line. Blank lines are skipped. The argument given
    /// to the closure is either always `Positional` or always `StdinLine`.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(Argument<'_>) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        if !self.positional.is_empty() {
            for arg in self.positional.iter() {
                if !f(Argument::Positional(arg.as_bstr()))? {
                    break;
                }
            }
            return Ok(());
        }
        let stdin = std::io::stdin().lock();
        for (i, result) in stdin.byte_lines().enumerate() {
            let number = i + 1;
            let line = result
                .with_context(|| format!("failed to read line {number}"))?;
            if line.trim_ascii().is_empty() {
                continue;
            }
            let arg = Argument::StdinLine(line.as_bstr());
            let keep_going = f(arg)
                .with_context(|| format!("line {number} of <stdin>"))?;
            if !keep_going {
                break;
            }
        }
        Ok(())
    }
}

impl Configurable for Arguments {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Value(ref mut v) => {
                let v = std::mem::take(v);
                let bytes = Vec::from_os_string(v).map_err(|arg| {
                    anyhow::anyhow!(
                        "recur requires that positional arguments \
                         be valid UTF-8 in non-Unix environments, \
                         but `{arg:?}` is not valid UTF-8",
                    )
                })?;
                self.positional.push(BString::from(bytes));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A generic argument parsed from either positional args on the CLI, or
/// as a single line from stdin.
#[derive(Clone, Copy, Debug)]
pub enum Argument<'a> {
    Positional(&'a BStr),
    /// A line from stdin, without its line terminator.
    StdinLine(&'a BStr),
}

impl<'a> Argument<'a> {
    /// Parse this argument into a timestamp.
    pub fn to_timestamp(&self) -> anyhow::Result<Timestamp> {
        let raw = self.raw();
        let s = raw.trim_ascii().to_str().with_context(|| {
            format!("timestamp `{raw}` is not valid UTF-8")
        })?;
        s.parse::<Timestamp>()
            .with_context(|| format!("invalid timestamp `{s}`"))
    }

    /// Return the raw argument value.
    pub fn raw(&self) -> &'a BStr {
        match *self {
            Argument::Positional(arg) => arg,
            Argument::StdinLine(line) => line,
        }
    }
}
