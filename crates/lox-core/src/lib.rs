//! lox-core — in-memory bytecode chunks and their textual trace.
//!
//! Provides:
//! - `GrowableBuffer<T>`: append-only storage with a doubling growth policy
//! - `Value` and its `%g` rendering
//! - `Chunk`: instruction bytes, run-length line table, constant pool
//! - `disasm`: the fixed-width trace (`disassemble_chunk`, `disassemble_instruction`)
//! - `asm`: a one-instruction-per-line listing assembler
//!
//! Features:
//! - `serde`: `Serialize` on the decoded views

#![deny(missing_docs)]

/* ─────────────────────────── Public modules ─────────────────────────── */

pub mod buffer;
pub mod bytecode;
pub mod error;
pub mod value;

/// Shortcut to the textual disassembler.
pub use bytecode::disasm;
/// Shortcut to the listing assembler.
pub use bytecode::asm;

/* ─────────────────────────── Prelude ─────────────────────────── */

/// Common re-exports for a single glob import.
pub mod prelude {
    pub use crate::{
        buffer::GrowableBuffer,
        bytecode::{Chunk, ConstantPool, Instruction, Line, LineTable, Opcode, MAX_CONSTANTS},
        disasm::{decode_listing, disassemble_chunk, disassemble_instruction, print_chunk},
        error::{AsmError, BufferError, ChunkError, ChunkResult, DecodeError},
        value::Value,
    };
}

/// Chunk of the smoke-test program: `RETURN` on line 0, then the constant
/// `1.2` on line 1.
pub fn reference_chunk() -> error::ChunkResult<bytecode::Chunk> {
    let mut chunk = bytecode::Chunk::new();
    chunk.append_instruction(bytecode::Opcode::Return, 0)?;
    chunk.append_constant(value::Value(1.2), 1)?;
    Ok(chunk)
}

/* ─────────────────────────── Tests ─────────────────────────── */
