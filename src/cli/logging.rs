//! Stderr logging for the `outfit` binary
//!
//! Library code logs through the `log` facade; the binary routes those
//! records through `env_logger` as `[level] message` lines. `RUST_LOG`
//! directives refine the level picked by `-v`/`-q`.

use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

fn label(level: Level) -> &'static str {
    match level {
        Level::Error => "error",
        Level::Warn => "warn",
        Level::Info => "info",
        Level::Debug => "debug",
        Level::Trace => "trace",
    }
}

/// Level for the given `-v` count; `quiet` wins over any verbosity.
pub(crate) fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. Later calls are ignored.
pub(crate) fn init(verbosity: u8, quiet: bool) {
    let _ = Builder::new()
        .filter_level(level_filter(verbosity, quiet))
        .parse_default_env()
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "[{}] {}", label(record.level()), record.args()))
        .try_init();
}
