use std::{env, io::Write, process::ExitCode, sync::LazyLock};

use {
    anyhow::Context,
    jiff::{Timestamp, Zoned, civil, tz::TimeZone},
    recur::AnchorNormalizer,
};

mod args;
mod cmd;
mod date;
mod logger;
mod style;

static TZ: LazyLock<TimeZone> = LazyLock::new(|| TimeZone::system());

static TODAY: LazyLock<civil::Date> = LazyLock::new(|| {
    match read_env_recur_today() {
        Ok(Some(date)) => {
            log::trace!(
                "setting current date to `{date}` from `RECUR_TODAY` \
                 environment variable",
            );
            date
        }
        Ok(None) => {
            let today = Zoned::now().with_time_zone(TZ.clone()).date();
            log::trace!(
                "`RECUR_TODAY` environment variable not set, using \
                 current date `{today}`",
            );
            today
        }
        Err(err) => {
            let today = Zoned::now().with_time_zone(TZ.clone()).date();
            log::warn!(
                "reading `RECUR_TODAY` failed, using current date \
                 `{today}`: {err:#}",
            );
            today
        }
    }
});

static ANCHOR: LazyLock<AnchorNormalizer> = LazyLock::new(|| {
    match read_env_recur_utc_offset() {
        Ok(Some(normalizer)) => {
            log::trace!(
                "setting caller UTC offset to `{}` from `RECUR_UTC_OFFSET` \
                 environment variable",
                normalizer.offset(),
            );
            normalizer
        }
        Ok(None) => {
            let normalizer = system_anchor();
            log::trace!(
                "`RECUR_UTC_OFFSET` environment variable not set, using \
                 system offset `{}`",
                normalizer.offset(),
            );
            normalizer
        }
        Err(err) => {
            let normalizer = system_anchor();
            log::warn!(
                "reading `RECUR_UTC_OFFSET` failed, using system offset \
                 `{}`: {err:#}",
                normalizer.offset(),
            );
            normalizer
        }
    }
});

/// Once, then again, and then again.
fn main() -> ExitCode {
    let err = match run() {
        Ok(code) => return code,
        Err(err) => err,
    };
    if let Some(help) = err.root_cause().downcast_ref::<args::Help>() {
        writeln!(&mut std::io::stdout(), "{help}").unwrap();
        return ExitCode::SUCCESS;
    }
    if let Some(version) = err.root_cause().downcast_ref::<args::Version>() {
        writeln!(&mut std::io::stdout(), "{version}").unwrap();
        return ExitCode::SUCCESS;
    }
    // Look for a broken pipe error. In this case, we generally want
    // to exit "gracefully" with a success exit code. This matches
    // existing Unix convention. We need to handle this explicitly
    // since the Rust runtime doesn't ask for PIPE signals, and thus
    // we get an I/O error instead.
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<std::io::Error>() {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return ExitCode::from(0);
            }
        }
        // `serde_json` swallows any `std::io::Error` it hits when writing,
        // so broken pipes have to be sniffed out of its error too.
        if let Some(err) = cause.downcast_ref::<serde_json::Error>() {
            if let Some(kind) = err.io_error_kind() {
                if kind == std::io::ErrorKind::BrokenPipe {
                    return ExitCode::from(0);
                }
            }
        }
    }
    if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }
    ExitCode::from(1)
}

fn run() -> anyhow::Result<ExitCode> {
    let rustlog = env::var("RECUR_LOG").unwrap_or_else(|_| String::new());
    let level = match &*rustlog {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{}'", unk),
    };
    log::set_max_level(level);
    // The logger starts out emitting UTC timestamps, since resolving the
    // system time zone can itself log. Once that's done, switch to local.
    let logger = logger::Logger::init()?;
    logger.set_time_zone(TZ.clone());
    cmd::run(&mut lexopt::Parser::from_env())?;
    Ok(ExitCode::SUCCESS)
}

/// Returns a normalizer using the system time zone's offset right now.
fn system_anchor() -> AnchorNormalizer {
    AnchorNormalizer::new(TZ.to_offset(Timestamp::now()))
}

fn read_env_recur_today() -> anyhow::Result<Option<civil::Date>> {
    let Some(val) = std::env::var_os("RECUR_TODAY") else { return Ok(None) };
    let Some(val) = val.to_str() else {
        anyhow::bail!(
            "`RECUR_TODAY` environment variable is not valid UTF-8: {val:?}"
        )
    };
    val.parse::<civil::Date>()
        .context("`RECUR_TODAY` environment variable is not a valid date")
        .map(Some)
}

fn read_env_recur_utc_offset() -> anyhow::Result<Option<AnchorNormalizer>> {
    let Some(val) = std::env::var_os("RECUR_UTC_OFFSET") else {
        return Ok(None);
    };
    let Some(val) = val.to_str() else {
        anyhow::bail!(
            "`RECUR_UTC_OFFSET` environment variable is not valid UTF-8: \
             {val:?}"
        )
    };
    let offset: args::flags::UtcOffset = val
        .parse()
        .context("failed to parse `RECUR_UTC_OFFSET` environment variable")?;
    Ok(Some(offset.normalizer()))
}
