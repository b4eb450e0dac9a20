use std::ffi::OsStr;

mod command;

/// The date every test considers to be "today."
const TODAY: &str = "2025-06-20";

/// Return a command for the `recur` binary and no argument.
///
/// The environment is pinned so that results don't depend on the machine
/// running the tests.
fn recur_bare() -> crate::command::Command {
    crate::command::bin("recur")
        .env("TZ", "America/Los_Angeles")
        .env("RECUR_TODAY", TODAY)
        .env("RECUR_UTC_OFFSET", "-480")
        .env_remove("RECUR_LOG")
}

/// Return a command for the `recur` binary with the given arguments appended
/// to it.
fn recur<T: AsRef<OsStr>>(
    args: impl IntoIterator<Item = T>,
) -> crate::command::Command {
    recur_bare().args(args)
}

/// Test that calling `recur` with no arguments prints the top-level usage.
#[test]
fn no_args() {
    crate::command::assert_cmd_snapshot!(
        recur_bare(),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    Expand recurrence rules into calendar dates.

    USAGE:
        recur <command> ...

    COMMANDS:
        anchor   Decode timestamps that encode calendar dates
        next     Find the next occurrence of a rule after a date
        seq      Print every occurrence of a rule
        summary  Describe a rule and its occurrences
    ",
    );
}

#[test]
fn unknown_command() {
    crate::command::assert_cmd_snapshot!(
        recur(["frob"]),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    unrecognized command 'frob'
    ",
    );
}

#[test]
fn version() {
    crate::command::assert_cmd_snapshot!(
        recur(["--version"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    recur 0.1.0

    ----- stderr -----
    ",
    );
}

/// An invalid log level is reported before anything else happens.
#[test]
fn bad_log_level() {
    crate::command::assert_cmd_snapshot!(
        recur(["seq", "daily", "today", "-c1"]).env("RECUR_LOG", "loud"),
        @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    unrecognized log level 'loud'
    ",
    );
}
