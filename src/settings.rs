use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use plum8::{Quirks, RegisterTransfer};

use crate::logger::Severity;

pub const DEFAULT_IPS: u32 = 500;
pub const DEFAULT_TIMER_HZ: u32 = 60;
pub const DEFAULT_DURATION_MS: u64 = 1000;

/// Run a CHIP-8 ROM headless and print the last frame
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Settings {
    #[arg(short, long, help = "Path to the ROM file to run")]
    pub rom: PathBuf,

    #[arg(short, long, default_value_t = DEFAULT_IPS, help = "Instructions per second")]
    pub ips: u32,

    #[arg(long, default_value_t = DEFAULT_TIMER_HZ, help = "Timer ticks per second")]
    pub timer_hz: u32,

    #[arg(short, long, default_value_t = DEFAULT_DURATION_MS, help = "How long to run, in milliseconds")]
    pub duration_ms: u64,

    #[arg(long, help = "Seed of the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, help = "Overrides RUST_LOG")]
    pub log_level: Option<Severity>,

    #[arg(long, help = "8XY6/8XYE shift VY into VX")]
    pub shift_vy: bool,

    #[arg(long, help = "FX1E leaves VF alone")]
    pub no_index_flag: bool,

    #[arg(long, help = "FX55/FX65 move V0..=VX only")]
    pub transfer_up_to_x: bool,

    #[arg(long, help = "FX55/FX65 advance I past the moved bytes")]
    pub transfer_increments_i: bool,

    #[arg(long, help = "FX0A resumes on any key")]
    pub await_any_key: bool,
}

impl Settings {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn quirks(&self) -> Quirks {
        Quirks {
            shift_uses_vy: self.shift_vy,
            index_overflow_flag: !self.no_index_flag,
            transfer: if self.transfer_up_to_x {
                RegisterTransfer::UpToX
            } else {
                RegisterTransfer::Full
            },
            transfer_increments_i: self.transfer_increments_i,
            await_any_key: self.await_any_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::try_parse_from(["plum8", "--rom", "pong.ch8"]).unwrap();
        assert_eq!(settings.rom, PathBuf::from("pong.ch8"));
        assert_eq!(settings.ips, 500);
        assert_eq!(settings.timer_hz, 60);
        assert_eq!(settings.duration(), Duration::from_secs(1));
        assert_eq!(settings.seed, None);
        assert_eq!(settings.log_level, None);
        assert_eq!(settings.quirks(), Quirks::default());
    }

    #[test]
    fn every_quirk_flag() {
        let settings = Settings::try_parse_from([
            "plum8",
            "-r",
            "pong.ch8",
            "--shift-vy",
            "--no-index-flag",
            "--transfer-up-to-x",
            "--transfer-increments-i",
            "--await-any-key",
            "--seed",
            "42",
            "--log-level",
            "trace",
        ])
        .unwrap();
        assert_eq!(settings.quirks(), Quirks::cosmac());
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.log_level, Some(Severity::Trace));
    }

    #[test]
    fn rom_is_required() {
        assert!(Settings::try_parse_from(["plum8"]).is_err());
    }
}
