use std::fs;

use anyhow::Context;
use log::{info, warn};
use minifb::Key;

use crate::{
    config::Config,
    machine::{Machine, RunState},
    screen::Screen,
    sound::Sound,
};

/// Frame driver: ties the machine to the window and the speaker and runs
/// it at `steps_per_frame` instructions per 60 Hz frame.
pub struct Emulator {
    machine: Machine,
    screen: Screen,
    sound: Option<Sound>,
    steps_per_frame: u32,
}

impl Emulator {
    pub fn init(config: &Config) -> anyhow::Result<Self> {
        let rom = fs::read(&config.rom)
            .with_context(|| format!("failed to read ROM {}", config.rom.display()))?;
        let machine = Machine::new(&rom)
            .with_context(|| format!("failed to load ROM {}", config.rom.display()))?;

        let screen = Screen::new().context("failed to open window")?;
        let sound = match Sound::new() {
            Ok(sound) => Some(sound),
            Err(e) => {
                warn!("audio unavailable, running muted: {e:#}");
                None
            }
        };

        info!(
            "running {} at {} instructions per second",
            config.rom.display(),
            config.ips
        );
        Ok(Self {
            machine,
            screen,
            sound,
            steps_per_frame: config.steps_per_frame(),
        })
    }

    pub fn is_running(&self) -> bool {
        self.machine.run_state() != RunState::Halted
    }

    fn poll_input(&mut self) {
        if !self.screen.is_open() || self.screen.pressed(Key::Escape) {
            info!("quit");
            self.machine.halt();
            return;
        }
        if self.screen.pressed(Key::Space) {
            self.machine.toggle_pause();
        }
        self.machine
            .keyboard
            .update_from_host(&self.screen.held_keys());
    }

    fn sync_sound(&mut self) -> anyhow::Result<()> {
        if let Some(sound) = self.sound.as_mut() {
            sound.set_tone(self.machine.tone_on())?;
        }
        Ok(())
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        while self.is_running() {
            self.poll_input();
            if !self.is_running() {
                break;
            }
            self.machine.run_frame(self.steps_per_frame)?;
            self.screen.present(&mut self.machine.fb)?;
            self.sync_sound()?;
        }
        if let Some(sound) = self.sound.as_mut() {
            sound.set_tone(false)?;
        }
        Ok(())
    }
}
