//! Installs `env_logger` as the backend of the `log` facade.
//!
//! The filter comes from `RUST_LOG` (falling back to `info`), `--log-level`
//! overrides it when given.

use std::io::Write;

use clap::ValueEnum;
use env_logger::{Builder, Env};
use log::{LevelFilter, SetLoggerError};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Severity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Severity::Off   => "OFF",
            Severity::Error => "ERROR",
            Severity::Warn  => "WARN",
            Severity::Info  => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        match *self {
            Severity::Off   => LevelFilter::Off,
            Severity::Error => LevelFilter::Error,
            Severity::Warn  => LevelFilter::Warn,
            Severity::Info  => LevelFilter::Info,
            Severity::Debug => LevelFilter::Debug,
            Severity::Trace => LevelFilter::Trace,
        }
    }
}

fn builder(level: Option<Severity>) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(sev) = level {
        builder.filter_level(sev.level_filter());
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{:5}][{}] {}",
            record.level(),
            record.module_path().unwrap_or("?"),
            record.args()
        )
    });
    builder
}

/// Initialize logger for the log facade, fails if a logger is already installed
pub fn init(level: Option<Severity>) -> Result<(), SetLoggerError> {
    builder(level).try_init()
}
