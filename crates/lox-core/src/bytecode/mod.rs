//! Bytecode primitives: opcodes, constant pool, line table, chunk, decoders.

pub mod asm;
pub mod chunk;
pub mod disasm;
pub mod instruction;
pub mod lines;
pub mod opcode;
pub mod pool;

pub use chunk::{Chunk, Instructions};
pub use instruction::{ConstantOperand, Instruction};
pub use lines::{Line, LineRun, LineTable};
pub use opcode::Opcode;
pub use pool::{ConstantPool, MAX_CONSTANTS};
