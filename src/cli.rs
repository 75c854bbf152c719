use crate::config::{Threshold, WatchConfig};
use crate::error::Result;
use clap::{ArgAction, Parser};
use std::num::IntErrorKind;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "logwatch",
    about = "Compact a log file by half whenever its filesystem runs low on space"
)]
pub struct Cli {
    /// Print diagnostics to stderr
    #[arg(short = 'd', action = ArgAction::Count)]
    pub debug: u8,

    /// Free-space threshold in percent of filesystem size (0-100, otherwise 5)
    #[arg(
        short = 't',
        value_name = "PERC",
        allow_negative_numbers = true,
        value_parser = parse_percent
    )]
    pub threshold: Option<i64>,

    /// Log file to guard
    pub logfile: PathBuf,
}

impl Cli {
    pub fn debug_enabled(&self) -> bool {
        self.debug > 0
    }

    pub fn to_config(&self) -> Result<WatchConfig> {
        let threshold = self.threshold.map(Threshold::new).unwrap_or_default();
        WatchConfig::new(&self.logfile, threshold, self.debug_enabled())
    }
}

/// Integers too large for `i64` saturate, so they land out of range and
/// fall back to the default like any other out-of-range value.
fn parse_percent(raw: &str) -> std::result::Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(e.to_string()),
        },
    }
}
