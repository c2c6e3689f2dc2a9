//! Error taxonomy shared by the buffer, the chunk and the decoders.

use thiserror::Error;

use crate::bytecode::Opcode;

/// Result alias for chunk operations.
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Failures of [`GrowableBuffer`](crate::buffer::GrowableBuffer) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Read past the logical end.
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Buffer length at the time of the read.
        len: usize,
    },
}

/// Failures raised while building or querying a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// `append_instruction` only takes zero-operand opcodes.
    #[error("opcode {opcode} carries operands and must be emitted through append_constant")]
    OperandRequired {
        /// Offending opcode.
        opcode: Opcode,
    },
    /// The pool has no 24-bit index left.
    #[error("constant pool is full ({len} entries, 24-bit index space exhausted)")]
    ConstantPoolFull {
        /// Pool size when the insertion was refused.
        len: usize,
    },
    /// An index cannot be written as a 24-bit operand.
    #[error("constant index {index} does not fit in 24 bits")]
    IndexTooWide {
        /// Index that was asked for.
        index: usize,
    },
    /// An index does not name a pool slot.
    #[error("constant index {index} out of range (pool holds {len})")]
    ConstantOutOfRange {
        /// Requested slot.
        index: usize,
        /// Pool size.
        len: usize,
    },
    /// Underlying buffer access failed.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Failures met while decoding the instruction stream.
///
/// The disassembler renders these inline and keeps going; other callers of
/// [`Chunk::decode_at`](crate::bytecode::Chunk::decode_at) get them as values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Tag byte outside the opcode set.
    #[error("unknown instruction {tag} at offset {offset}")]
    UnknownOpcode {
        /// Offset of the tag byte.
        offset: usize,
        /// Raw byte.
        tag: u8,
    },
    /// Operand bytes run past the end of the stream.
    #[error("truncated {opcode} at offset {offset}: needs {needed} operand bytes, {available} available")]
    Truncated {
        /// Offset of the tag byte.
        offset: usize,
        /// Opcode whose operands are missing.
        opcode: Opcode,
        /// Operand bytes the opcode requires.
        needed: usize,
        /// Operand bytes actually present.
        available: usize,
    },
    /// Cursor beyond the end of the stream.
    #[error("offset {offset} out of bounds (len {len})")]
    OffsetOutOfBounds {
        /// Requested offset.
        offset: usize,
        /// Stream length.
        len: usize,
    },
}

/// Listing assembler failure, tied to a 1-based listing line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    /// Listing line (1-based).
    pub line: usize,
    /// What went wrong.
    pub kind: AsmErrorKind,
}

/// Reasons an assembler line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    /// Mnemonic not in the opcode set.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    /// `CONSTANT` without a value.
    #[error("`{0}` expects a numeric operand")]
    MissingOperand(&'static str),
    /// Operand given to an opcode that takes none, or more than one operand.
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
    /// Operand is not a number.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    /// `<line>:` prefix that is not an unsigned integer.
    #[error("invalid source line prefix `{0}`")]
    InvalidLinePrefix(String),
    /// The chunk refused the instruction.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

impl AsmError {
    pub(crate) fn new(line: usize, kind: impl Into<AsmErrorKind>) -> Self {
        Self { line, kind: kind.into() }
    }
}
