pub const TIMER_HZ: u32 = 60;

/// Delay and sound countdowns. Instructions only ever load them; `tick`
/// is the only thing that counts them down, once per 60 Hz frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn tone_on(&self) -> bool {
        self.sound > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_stops_at_zero() {
        let mut timers = Timers { delay: 1, sound: 3 };
        for _ in 0..3 {
            assert!(timers.tone_on());
            timers.tick();
        }
        assert_eq!(timers, Timers { delay: 0, sound: 0 });
        timers.tick();
        assert_eq!(timers.sound, 0);
        assert!(!timers.tone_on());
    }
}
