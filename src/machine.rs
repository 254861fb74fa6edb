use log::{debug, error, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    decode::{self, OpCodes},
    display::{FrameBuffer, SpriteEdge},
    error::MachineError,
    keyboard::Keyboard,
    memory::{Memory, Stack, TypeAddr, GLYPH_HEIGHT},
    registers::{IndexRegister, ProgramCounter, Registers},
    timer::Timers,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
    Halted,
}

/// Progress of an `FX0A` that spans several steps. A key has to be seen
/// going down and then coming back up before the wait completes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyWait {
    #[default]
    NotWaiting,
    AwaitingPress,
    AwaitingRelease(u8),
}

pub struct Machine {
    pub regs: Registers,
    pub mem: Memory,
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
    pub timers: Timers,
    pub fb: FrameBuffer,
    pub keyboard: Keyboard,
    run_state: RunState,
    key_wait: KeyWait,
    rng: StdRng,
}

impl Machine {
    pub fn new(rom: &[u8]) -> Result<Self, MachineError> {
        let mut mem = Memory::new();
        mem.load_rom(rom)?;
        info!("loaded {} byte program", rom.len());

        Ok(Self {
            regs: Registers::new(),
            mem,
            pc: ProgramCounter::default(),
            index: IndexRegister::default(),
            stack: Stack::new(),
            timers: Timers::new(),
            fb: FrameBuffer::default(),
            keyboard: Keyboard::new(),
            run_state: RunState::Running,
            key_wait: KeyWait::NotWaiting,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_sprite_edge(mut self, edge: SpriteEdge) -> Self {
        self.fb = FrameBuffer::new(edge);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[cfg(test)]
    pub fn key_wait(&self) -> KeyWait {
        self.key_wait
    }

    pub fn toggle_pause(&mut self) {
        self.run_state = match self.run_state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Halted => RunState::Halted,
        };
        info!("run state now {:?}", self.run_state);
    }

    pub fn halt(&mut self) {
        self.run_state = RunState::Halted;
    }

    pub fn tone_on(&self) -> bool {
        self.timers.tone_on()
    }

    /// Fetches, decodes and executes a single instruction. A stack fault
    /// halts the machine and is handed back to the caller.
    pub fn step(&mut self) -> Result<(), MachineError> {
        let at = self.pc.addr();
        let ins = decode::fetch(&self.mem, &mut self.pc);
        let operation = OpCodes::decode(&ins);
        trace!("{at:#05X}: {:04X} {operation:?}", ins.raw);

        self.execute_ins(operation, at).map_err(|e| {
            error!("halting: {e}");
            self.run_state = RunState::Halted;
            e
        })
    }

    /// One 60 Hz frame worth of timer updates.
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    /// Runs `steps` instructions followed by one timer tick, unless the
    /// machine is paused or halted.
    pub fn run_frame(&mut self, steps: u32) -> Result<(), MachineError> {
        if self.run_state != RunState::Running {
            return Ok(());
        }
        for _ in 0..steps {
            self.step()?;
        }
        self.tick();
        Ok(())
    }

    fn execute_ins(&mut self, ins: OpCodes, at: TypeAddr) -> Result<(), MachineError> {
        match ins {
            OpCodes::ClearScreen => self.fb.clear_buffer(),
            OpCodes::PopSubroutine => {
                let addr = self
                    .stack
                    .pop()
                    .ok_or(MachineError::StackUnderflow { pc: at })?;
                self.pc.set_addr(addr);
            }
            OpCodes::Jump(addr) => self.pc.set_addr(addr),
            OpCodes::PushSubroutine(addr) => {
                // return address is the instruction after the call
                if !self.stack.push(self.pc.addr()) {
                    return Err(MachineError::StackOverflow { pc: at });
                }
                self.pc.set_addr(addr);
            }
            OpCodes::SkipEqualConstant(vx, nn) => {
                if self.regs.get(vx) == nn {
                    self.pc.increment();
                }
            }
            OpCodes::SkipNotEqualConstant(vx, nn) => {
                if self.regs.get(vx) != nn {
                    self.pc.increment();
                }
            }
            OpCodes::SkipEqualRegister(vx, vy) => {
                if self.regs.get(vx) == self.regs.get(vy) {
                    self.pc.increment();
                }
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                if self.regs.get(vx) != self.regs.get(vy) {
                    self.pc.increment();
                }
            }
            OpCodes::SetRegister(vx, nn) => self.regs.set_register(vx, nn),
            OpCodes::AddToRegister(vx, nn) => self.regs.add_to_register(vx, nn),
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) | self.regs.get(vy));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) & self.regs.get(vy));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vx) ^ self.regs.get(vy));
            }
            // 8XY4-8XYE write VF after VX, so the flag wins when X = F
            OpCodes::Add(vx, vy) => {
                let (sum, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, sum);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x > y);
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y > x);
            }
            OpCodes::RightShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value >> 1);
                self.regs.set_register(0xF, vx_value & 1);
            }
            OpCodes::LeftShift(vx) => {
                let vx_value = self.regs.get(vx);
                self.regs.set_register(vx, vx_value << 1);
                self.regs.set_register(0xF, (vx_value >> 7) & 1);
            }
            OpCodes::SetIndexRegister(addr) => self.index.set_addr(addr),
            OpCodes::JumpWithOffset(addr) => {
                self.pc.set_addr(addr + self.regs.get(0) as u16);
            }
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, ransuu & nn);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let base = self.index.addr();
                let sprite: Vec<u8> = (0..height as u16)
                    .map(|row| self.mem.get(base.wrapping_add(row)))
                    .collect();
                self.regs.set_flag(false);
                if self.fb.paint(x, y, &sprite) {
                    self.regs.set_flag(true);
                }
            }
            OpCodes::SkipIfPressed(vx) => {
                if self.keyboard.is_down(self.regs.get(vx)) {
                    self.pc.increment();
                }
            }
            OpCodes::SkipIfNotPressed(vx) => {
                if !self.keyboard.is_down(self.regs.get(vx)) {
                    self.pc.increment();
                }
            }
            OpCodes::CopyDelayToRegister(vx) => self.regs.set_register(vx, self.timers.delay),
            OpCodes::GetKey(vx) => self.wait_for_key(vx),
            OpCodes::CopyRegisterToDelay(vx) => self.timers.delay = self.regs.get(vx),
            OpCodes::CopyRegisterToSound(vx) => self.timers.sound = self.regs.get(vx),
            OpCodes::AddToIndex(vx) => self.index.add(self.regs.get(vx)),
            OpCodes::PointChar(vx) => {
                self.index
                    .set_addr(self.regs.get(vx) as u16 * GLYPH_HEIGHT);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let base = self.index.addr();
                let digits = [value / 100, (value / 10) % 10, value % 10];
                for (i, digit) in digits.into_iter().enumerate() {
                    self.mem.set(base.wrapping_add(i as u16), digit);
                }
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let base = self.index.addr();
                for reg in 0..=vx {
                    self.mem.set(base.wrapping_add(reg as u16), self.regs.get(reg));
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let base = self.index.addr();
                for reg in 0..=vx {
                    let reg_val = self.mem.get(base.wrapping_add(reg as u16));
                    self.regs.set_register(reg, reg_val);
                }
            }
            OpCodes::Unimplemented(raw) => {
                warn!("unknown opcode {raw:04X} at {at:#05X}, skipping");
            }
        }
        Ok(())
    }

    // FX0A: keep re-running this instruction until a key goes down and then
    // back up; that key lands in VX.
    fn wait_for_key(&mut self, vx: u8) {
        let next = match self.key_wait {
            KeyWait::NotWaiting | KeyWait::AwaitingPress => match self.keyboard.first_down() {
                Some(key) => KeyWait::AwaitingRelease(key),
                None => KeyWait::AwaitingPress,
            },
            KeyWait::AwaitingRelease(key) if self.keyboard.is_down(key) => {
                KeyWait::AwaitingRelease(key)
            }
            KeyWait::AwaitingRelease(key) => {
                debug!("key {key:X} released, V{vx:X} = {key:X}");
                self.regs.set_register(vx, key);
                self.key_wait = KeyWait::NotWaiting;
                return;
            }
        };
        if next != self.key_wait {
            debug!("key wait {:?} -> {next:?}", self.key_wait);
        }
        self.key_wait = next;
        self.pc.decrement();
    }
}
