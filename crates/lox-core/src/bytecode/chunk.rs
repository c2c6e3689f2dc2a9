//! Chunk: instruction bytes, their source lines, and the constant pool.

use log::debug;

use super::{
    instruction::{ConstantOperand, Instruction},
    lines::{Line, LineTable},
    opcode::Opcode,
    pool::ConstantPool,
};
use crate::{
    buffer::GrowableBuffer,
    error::{BufferError, ChunkError, ChunkResult, DecodeError},
    value::Value,
};

/// One unit of bytecode.
///
/// `code` and `lines` always have the same logical length: every append
/// records exactly one line per byte written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    code: GrowableBuffer<u8>,
    lines: LineTable,
    constants: ConstantPool,
}

impl Chunk {
    /// Empty chunk: no bytes, no capacity, empty pool.
    pub const fn new() -> Self {
        Self { code: GrowableBuffer::new(), lines: LineTable::new(), constants: ConstantPool::new() }
    }

    /// Appends a zero-operand instruction.
    pub fn append_instruction(&mut self, opcode: Opcode, line: Line) -> ChunkResult<()> {
        if opcode.operand_bytes() != 0 {
            return Err(ChunkError::OperandRequired { opcode });
        }
        self.write_byte(opcode.tag(), line);
        debug!("emit {opcode} @ line {line}");
        Ok(())
    }

    /// Adds `value` to the pool and emits the narrowest instruction loading it.
    ///
    /// Returns the pool index. All bytes of the emitted instruction carry `line`.
    pub fn append_constant(&mut self, value: Value, line: Line) -> ChunkResult<usize> {
        let index = self.constants.append(value)?;
        let operand = ConstantOperand::for_index(index)?;
        self.write_byte(operand.opcode().tag(), line);
        for &byte in operand.bytes() {
            self.write_byte(byte, line);
        }
        debug!("emit {} {index} ({value}) @ line {line}", operand.opcode());
        Ok(index)
    }

    /// Frees every owned buffer. The chunk is empty and reusable afterwards.
    pub fn release(&mut self) {
        self.code.release();
        self.lines.release();
        self.constants.release();
        debug!("chunk released");
    }

    pub(crate) fn write_byte(&mut self, byte: u8, line: Line) {
        self.code.append(byte);
        self.lines.push(line);
    }

    /// Number of instruction bytes.
    pub fn len(&self) -> usize { self.code.len() }

    /// True when no byte has been written.
    pub fn is_empty(&self) -> bool { self.code.is_empty() }

    /// Reserved instruction-byte slots.
    pub fn capacity(&self) -> usize { self.code.capacity() }

    /// Raw instruction stream.
    pub fn code(&self) -> &[u8] { self.code.as_slice() }

    /// Byte at `offset`.
    pub fn byte_at(&self, offset: usize) -> Result<u8, BufferError> { self.code.get(offset).copied() }

    /// Source line of the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> Result<Line, BufferError> {
        self.lines.line_at(offset).ok_or(BufferError::OutOfBounds { index: offset, len: self.lines.len() })
    }

    /// Line table.
    pub fn lines(&self) -> &LineTable { &self.lines }

    /// Constant pool.
    pub fn constants(&self) -> &ConstantPool { &self.constants }

    /// Constant at `index`.
    pub fn constant(&self, index: usize) -> ChunkResult<Value> { self.constants.get(index) }

    /// Decodes the instruction starting at `offset`.
    pub fn decode_at(&self, offset: usize) -> Result<Instruction, DecodeError> {
        Instruction::decode(self.code(), offset)
    }

    /// Walks the stream from offset 0.
    ///
    /// Undecodable bytes are yielded as errors and skipped one byte at a time;
    /// a truncated tail ends the walk.
    pub fn instructions(&self) -> Instructions<'_> { Instructions { chunk: self, offset: 0 } }
}

/// Iterator returned by [`Chunk::instructions`], yielding `(offset, decoded)`.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    chunk: &'a Chunk,
    offset: usize,
}

impl Iterator for Instructions<'_> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset;
        if offset >= self.chunk.len() {
            return None;
        }
        let decoded = self.chunk.decode_at(offset);
        self.offset = match &decoded {
            Ok(ins) => offset + ins.width(),
            Err(DecodeError::UnknownOpcode { .. }) => offset + 1,
            Err(_) => self.chunk.len(),
        };
        Some((offset, decoded))
    }
}
