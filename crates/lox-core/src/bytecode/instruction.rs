//! Decoded view of the byte stream.
//!
//! The chunk stores raw bytes; this module turns them into a tagged enum at
//! the point of use. Operand encoding lives here too so the writer and the
//! reader share one definition of each width.

#[cfg(feature = "serde")]
use serde::Serialize;

use super::opcode::Opcode;
use super::pool::MAX_CONSTANTS;
use crate::error::{ChunkError, DecodeError};

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Instruction {
    /// `RETURN`
    Return,
    /// `CONSTANT idx8`
    Constant {
        /// Pool index.
        index: usize,
    },
    /// `CONSTANT_LONG idx24`
    ConstantLong {
        /// Pool index.
        index: usize,
    },
}

impl Instruction {
    /// Opcode of this instruction.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Return => Opcode::Return,
            Self::Constant { .. } => Opcode::Constant,
            Self::ConstantLong { .. } => Opcode::ConstantLong,
        }
    }

    /// Encoded width in bytes.
    pub const fn width(&self) -> usize { self.opcode().width() }

    /// Pool index referenced by the instruction, if any.
    pub const fn constant_index(&self) -> Option<usize> {
        match self {
            Self::Return => None,
            Self::Constant { index } | Self::ConstantLong { index } => Some(*index),
        }
    }

    /// Decodes the instruction starting at `offset`.
    pub fn decode(code: &[u8], offset: usize) -> Result<Self, DecodeError> {
        let tag = *code
            .get(offset)
            .ok_or(DecodeError::OffsetOutOfBounds { offset, len: code.len() })?;
        let opcode = Opcode::from_tag(tag).ok_or(DecodeError::UnknownOpcode { offset, tag })?;

        let needed = opcode.operand_bytes();
        let operands = code
            .get(offset + 1..offset + 1 + needed)
            .ok_or_else(|| DecodeError::Truncated {
                offset,
                opcode,
                needed,
                available: code.len() - offset - 1,
            })?;

        Ok(match opcode {
            Opcode::Return => Self::Return,
            Opcode::Constant => Self::Constant { index: usize::from(operands[0]) },
            Opcode::ConstantLong => Self::ConstantLong { index: read_u24_be(operands) },
        })
    }
}

/// Operand bytes for a constant-loading instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantOperand {
    /// Index fits in one byte.
    Short(u8),
    /// Index needs the 24-bit big-endian form.
    Long([u8; 3]),
}

impl ConstantOperand {
    /// Narrowest encoding able to hold `index`.
    pub fn for_index(index: usize) -> Result<Self, ChunkError> {
        if let Ok(byte) = u8::try_from(index) {
            return Ok(Self::Short(byte));
        }
        if index >= MAX_CONSTANTS {
            return Err(ChunkError::IndexTooWide { index });
        }
        Ok(Self::Long(write_u24_be(index)))
    }

    /// Opcode matching the encoding.
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Short(_) => Opcode::Constant,
            Self::Long(_) => Opcode::ConstantLong,
        }
    }

    /// Operand bytes, most significant first.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Short(b) => core::slice::from_ref(b),
            Self::Long(b) => b,
        }
    }
}

fn write_u24_be(index: usize) -> [u8; 3] {
    [
        ((index >> 16) & 0xFF) as u8,
        ((index >> 8) & 0xFF) as u8,
        (index & 0xFF) as u8,
    ]
}

fn read_u24_be(b: &[u8]) -> usize {
    (usize::from(b[0]) << 16) | (usize::from(b[1]) << 8) | usize::from(b[2])
}
