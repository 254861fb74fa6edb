use chipvm::{config::Config, emulator::Emulator};
use clap::Parser;

// Separately:
// CPU: --ips times per second (700 by default)
// Display: 60 times per second
// Timer: 60 times per second

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let mut emu = Emulator::init(&config)?;
    emu.run()
}
