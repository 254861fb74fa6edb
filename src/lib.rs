// 16 8-bit data registers named V0 to VF
// I -> address register
//
// Delay timer & Sound timer: Count down at 60 times / s until 0
// Tone plays while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod machine;
pub mod memory;
pub mod registers;
pub mod screen;
pub mod sound;
pub mod timer;

pub use error::MachineError;
pub use machine::{KeyWait, Machine, RunState};
