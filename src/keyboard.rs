use minifb::Key;

pub const KEY_COUNT: usize = 16;

/// Layout of the hex keypad on the left-hand side of a QWERTY keyboard:
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D  <-  Q W E R
/// 7 8 9 E      A S D F
/// A 0 B F      Z X C V
/// ```
pub const KEYMAP: [(Key, u8); KEY_COUNT] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

pub fn key_to_num(key: Key) -> Option<u8> {
    KEYMAP
        .iter()
        .find(|(host, _)| *host == key)
        .map(|(_, num)| *num)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn set(&mut self, n: u8, down: bool) {
        self.keys[(n & 0xF) as usize] = down;
    }

    pub fn key_down(&mut self, n: u8) {
        self.set(n, true);
    }

    pub fn key_up(&mut self, n: u8) {
        self.set(n, false);
    }

    /// Replaces the whole state from the host keys currently held.
    pub fn update_from_host(&mut self, held: &[Key]) {
        self.reset();
        for num in held.iter().filter_map(|k| key_to_num(*k)) {
            self.key_down(num);
        }
    }

    // only the low nibble of a register selects a key
    pub fn is_down(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    pub fn first_down(&self) -> Option<u8> {
        self.keys.iter().position(|down| *down).map(|k| k as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_host_keys_to_keypad() {
        assert_eq!(key_to_num(Key::Key4), Some(0xC));
        assert_eq!(key_to_num(Key::X), Some(0x0));
        assert_eq!(key_to_num(Key::V), Some(0xF));
        assert_eq!(key_to_num(Key::Space), None);
    }

    #[test]
    fn first_down_picks_lowest_index() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.first_down(), None);
        kb.key_down(0xB);
        kb.key_down(0x5);
        assert_eq!(kb.first_down(), Some(0x5));
        kb.key_up(0x5);
        assert_eq!(kb.first_down(), Some(0xB));
        assert!(kb.is_down(0xB));
        assert!(kb.is_down(0x1B));
    }

    #[test]
    fn host_update_replaces_state() {
        let mut kb = Keyboard::new();
        kb.key_down(0x3);
        kb.update_from_host(&[Key::W, Key::Enter]);
        assert!(!kb.is_down(0x3));
        assert!(kb.is_down(0x5));
        assert_eq!(kb.first_down(), Some(0x5));
    }
}
