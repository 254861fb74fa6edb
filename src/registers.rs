use crate::memory::{TypeAddr, ADDR_MASK, PROGRAM_START};

// index of VF, doubling as carry/borrow/collision flag
pub const FLAG: u8 = 0xF;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; 16],
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    // 7XNN never touches VF
    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let idx = (reg_num & 0xF) as usize;
        self.registers[idx] = self.registers[idx].wrapping_add(value);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.set_register(FLAG, set as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG)
    }
}

// Special registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(pub TypeAddr);

impl Default for ProgramCounter {
    fn default() -> Self {
        ProgramCounter(PROGRAM_START)
    }
}

impl ProgramCounter {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(2) & ADDR_MASK;
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.wrapping_sub(2) & ADDR_MASK;
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr & ADDR_MASK;
    }

    pub fn addr(&self) -> TypeAddr {
        self.0
    }
}

/// The index register is a full 16 bits wide; overflow from `FX1E` wraps
/// and is only brought back into range when memory is addressed through it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexRegister(pub u16);

impl IndexRegister {
    pub fn set_addr(&mut self, addr: u16) {
        self.0 = addr;
    }

    pub fn add(&mut self, value: u8) {
        self.0 = self.0.wrapping_add(value as u16);
    }

    pub fn addr(&self) -> u16 {
        self.0
    }
}
