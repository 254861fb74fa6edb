use std::path::PathBuf;

use clap::Parser;

use crate::timer::TIMER_HZ;

pub const DEFAULT_IPS: u32 = 700;

#[derive(Debug, Parser)]
#[command(name = "chipvm", version, about = "Runs a CHIP-8 program")]
pub struct Config {
    /// Path to the program image
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_IPS, value_parser = clap::value_parser!(u32).range((TIMER_HZ as i64)..))]
    pub ips: u32,
}

impl Config {
    pub fn steps_per_frame(&self) -> u32 {
        self.ips / TIMER_HZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_700_ips() {
        let config = Config::try_parse_from(["chipvm", "pong.ch8"]).unwrap();
        assert_eq!(config.rom, PathBuf::from("pong.ch8"));
        assert_eq!(config.ips, 700);
        assert_eq!(config.steps_per_frame(), 11);
    }

    #[test]
    fn ips_flag() {
        let config = Config::try_parse_from(["chipvm", "--ips", "1200", "pong.ch8"]).unwrap();
        assert_eq!(config.steps_per_frame(), 20);
    }

    #[test]
    fn rejects_missing_rom_and_slow_rates() {
        assert!(Config::try_parse_from(["chipvm"]).is_err());
        assert!(Config::try_parse_from(["chipvm", "--ips", "30", "pong.ch8"]).is_err());
    }
}
