use crate::error::MachineError;

pub type TypeAddr = u16; // in reality u12

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_CAPACITY: usize = 64;

// each glyph is 5 rows tall
pub const GLYPH_HEIGHT: u16 = 5;

type FontBytes = [u8; 5 * 16];

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Flat 4K address space. The font lives at 0x000..0x050 and programs are
/// loaded at 0x200. Every access is masked to 12 bits, so addresses derived
/// from an overflowing index register wrap around instead of faulting.
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        bytes[..DEFAULT_FONT.len()].copy_from_slice(&DEFAULT_FONT);
        Self { bytes }
    }

    pub fn set(&mut self, addr: u16, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: u16) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    // big-endian: high byte at addr, low byte at addr + 1
    pub fn word(&self, addr: TypeAddr) -> u16 {
        let (l, r) = (self.get(addr), self.get(addr.wrapping_add(1)));
        ((l as u16) << 8) | r as u16
    }

    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), MachineError> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(MachineError::RomTooLarge {
                size: bytes.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// Return addresses for `2NNN`/`00EE`, bounded at 64 entries.
#[derive(Debug, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_CAPACITY),
        }
    }

    /// Returns `false` without pushing when the stack is already full.
    pub fn push(&mut self, addr: TypeAddr) -> bool {
        if self.addresses.len() >= STACK_CAPACITY {
            return false;
        }
        self.addresses.push(addr);
        true
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_loaded_at_zero() {
        let mem = Memory::new();
        assert_eq!(&mem.as_slice()[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // glyph F
        assert_eq!(&mem.as_slice()[75..80], &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(mem.as_slice()[0x50..].iter().all(|b| *b == 0));
    }

    #[test]
    fn rom_is_loaded_at_program_start() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x6A, 0x02, 0x00, 0xE0]).unwrap();
        assert_eq!(mem.word(0x200), 0x6A02);
        assert_eq!(mem.word(0x202), 0x00E0);
    }

    #[test]
    fn oversized_rom_is_rejected() {
        let mut mem = Memory::new();
        let rom = vec![0u8; MAX_ROM_SIZE + 1];
        assert!(matches!(
            mem.load_rom(&rom),
            Err(MachineError::RomTooLarge { size, max }) if size == MAX_ROM_SIZE + 1 && max == 3584
        ));
        assert!(mem.load_rom(&rom[..MAX_ROM_SIZE]).is_ok());
    }

    #[test]
    fn addresses_wrap_into_4k() {
        let mut mem = Memory::new();
        mem.set(0x1005, 0xAB);
        assert_eq!(mem.get(0x005), 0xAB);
        mem.set(0xFFF, 0x12);
        mem.set(0x000, 0x34);
        assert_eq!(mem.word(0xFFF), 0x1234);
    }

    #[test]
    fn stack_is_bounded() {
        let mut stack = Stack::new();
        for i in 0..STACK_CAPACITY {
            assert!(stack.push(i as u16));
        }
        assert!(!stack.push(0x300));
        assert_eq!(stack.depth(), STACK_CAPACITY);
        assert_eq!(stack.pop(), Some(63));
    }

    #[test]
    fn empty_stack_pops_nothing() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), None);
    }
}
