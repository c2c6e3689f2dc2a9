//! Human readable trace of a chunk.
//!
//! Layout of one trace line:
//!
//! ```text
//! OOOO LLLL MNEMONIC         IIII 'VALUE'
//! ```
//!
//! `OOOO` is the zero-padded offset, `LLLL` the source line right-aligned in
//! four columns (or `   |` when it repeats the previous byte's line), then
//! the mnemonic padded to 16 columns, the pool index and the `%g` value.
//!
//! Decode problems never abort the trace: they are printed in place of the
//! instruction and the cursor moves on.

use core::fmt::Write;

use log::warn;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::{chunk::Chunk, instruction::Instruction, lines::Line, opcode::Opcode};
use crate::{error::DecodeError, value::Value};

/// Trace of the whole chunk, header included.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");
    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }
    out
}

/// Prints [`disassemble_chunk`] to stdout.
pub fn print_chunk(chunk: &Chunk, name: &str) {
    print!("{}", disassemble_chunk(chunk, name));
}

/// Decodes the instruction at `offset`, appends its trace line to `out` and
/// returns the offset of the next instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");

    let Some(line) = chunk.lines().line_at(offset) else {
        let _ = writeln!(out, "offset {offset} out of bounds");
        return chunk.len();
    };
    write_line_column(chunk, offset, line, out);

    match chunk.decode_at(offset) {
        Ok(Instruction::Return) => {
            let _ = writeln!(out, "{}", Opcode::Return);
            offset + 1
        }
        Ok(ins @ (Instruction::Constant { index } | Instruction::ConstantLong { index })) => {
            let _ = write!(out, "{:<16} {index:4} ", ins.opcode());
            match chunk.constant(index) {
                Ok(value) => {
                    let _ = writeln!(out, "'{value}'");
                }
                Err(e) => {
                    warn!("{e} at offset {offset}");
                    let _ = writeln!(out, "'<missing constant>'");
                }
            }
            offset + ins.width()
        }
        Err(DecodeError::UnknownOpcode { tag, .. }) => {
            warn!("unknown instruction {tag} at offset {offset}");
            let _ = writeln!(out, "unknown instruction {tag}");
            offset + 1
        }
        Err(DecodeError::Truncated { opcode, needed, available, .. }) => {
            warn!("truncated {opcode} at offset {offset}");
            let _ = writeln!(
                out,
                "truncated {opcode}: needs {needed} operand bytes, {available} available"
            );
            chunk.len()
        }
        Err(DecodeError::OffsetOutOfBounds { .. }) => {
            let _ = writeln!(out, "offset {offset} out of bounds");
            chunk.len()
        }
    }
}

fn write_line_column(chunk: &Chunk, offset: usize, line: Line, out: &mut String) {
    if offset > 0 && chunk.lines().line_at(offset - 1) == Some(line) {
        let _ = write!(out, "   | ");
    } else {
        let _ = write!(out, "{line:4} ");
    }
}

/* ─────────────────────────── Structured view ─────────────────────────── */

/// One row of the structured listing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DecodedInstruction {
    /// Offset of the tag byte.
    pub offset: usize,
    /// Source line of the tag byte.
    pub line: Option<Line>,
    /// Decoded instruction, `None` when decoding failed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub instruction: Option<Instruction>,
    /// Value loaded by a constant instruction.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub value: Option<Value>,
    /// Decode error, rendered.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

/// Structured counterpart of [`disassemble_chunk`], one row per instruction.
pub fn decode_listing(chunk: &Chunk) -> Vec<DecodedInstruction> {
    chunk
        .instructions()
        .map(|(offset, decoded)| {
            let line = chunk.line_at(offset).ok();
            match decoded {
                Ok(ins) => {
                    let value = ins.constant_index().and_then(|ix| chunk.constant(ix).ok());
                    DecodedInstruction { offset, line, instruction: Some(ins), value, error: None }
                }
                Err(e) => DecodedInstruction {
                    offset,
                    line,
                    instruction: None,
                    value: None,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reference_chunk() {
        let mut chunk = Chunk::new();
        chunk.append_instruction(Opcode::Return, 0).unwrap();
        chunk.append_constant(Value(1.2), 1).unwrap();

        assert_eq!(
            disassemble_chunk(&chunk, "test chunk"),
            "== test chunk ==\n\
             0000    0 RETURN\n\
             0001    1 CONSTANT            0 '1.2'\n"
        );
    }

    #[test]
    fn same_line_uses_continuation_marker() {
        let mut chunk = Chunk::new();
        chunk.append_constant(Value(1.0), 3).unwrap();
        chunk.append_constant(Value(2.0), 3).unwrap();
        chunk.append_instruction(Opcode::Return, 3).unwrap();
        chunk.append_instruction(Opcode::Return, 4).unwrap();

        assert_eq!(
            disassemble_chunk(&chunk, "lines"),
            "== lines ==\n\
             0000    3 CONSTANT            0 '1'\n\
             0002    | CONSTANT            1 '2'\n\
             0004    | RETURN\n\
             0005    4 RETURN\n"
        );
    }

    #[test]
    fn single_instruction_returns_next_offset() {
        let mut chunk = Chunk::new();
        chunk.append_constant(Value(0.5), 1).unwrap();
        chunk.append_instruction(Opcode::Return, 1).unwrap();

        let mut out = String::new();
        assert_eq!(disassemble_instruction(&chunk, 0, &mut out), 2);
        assert_eq!(disassemble_instruction(&chunk, 2, &mut out), 3);
        assert_eq!(out, "0000    1 CONSTANT            0 '0.5'\n0002    | RETURN\n");
    }

    #[test]
    fn unknown_tag_advances_one_byte() {
        let mut chunk = Chunk::new();
        chunk.write_byte(0xEE, 1);
        chunk.append_constant(Value(2.5), 2).unwrap();

        let mut out = String::new();
        assert_eq!(disassemble_instruction(&chunk, 0, &mut out), 1);
        assert_eq!(out, "0000    1 unknown instruction 238\n");
        assert_eq!(
            disassemble_chunk(&chunk, "corrupt"),
            "== corrupt ==\n\
             0000    1 unknown instruction 238\n\
             0001    2 CONSTANT            0 '2.5'\n"
        );
    }

    #[test]
    fn truncated_and_dangling_operands() {
        let mut chunk = Chunk::new();
        chunk.write_byte(Opcode::Constant.tag(), 1);
        chunk.write_byte(9, 1);
        chunk.write_byte(Opcode::ConstantLong.tag(), 1);
        chunk.write_byte(0, 1);

        assert_eq!(
            disassemble_chunk(&chunk, "broken"),
            "== broken ==\n\
             0000    1 CONSTANT            9 '<missing constant>'\n\
             0002    | truncated CONSTANT_LONG: needs 3 operand bytes, 1 available\n"
        );

        let mut out = String::new();
        assert_eq!(disassemble_instruction(&chunk, 10, &mut out), chunk.len());
        assert_eq!(out, "0010 offset 10 out of bounds\n");
    }

    #[test]
    fn structured_listing() {
        let mut chunk = Chunk::new();
        chunk.append_constant(Value(4.0), 1).unwrap();
        chunk.write_byte(0xEE, 2);

        let rows = decode_listing(&chunk);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].instruction, Some(Instruction::Constant { index: 0 }));
        assert_eq!(rows[0].value, Some(Value(4.0)));
        assert_eq!(rows[1].line, Some(2));
        assert_eq!(rows[1].error.as_deref(), Some("unknown instruction 238 at offset 2"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn rows_serialize_with_op_tags() {
        let mut chunk = Chunk::new();
        chunk.append_instruction(Opcode::Return, 3).unwrap();
        chunk.write_byte(7, 3);

        let json = serde_json::to_value(decode_listing(&chunk)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "offset": 0, "line": 3, "instruction": { "op": "RETURN" } },
                { "offset": 1, "line": 3, "error": "unknown instruction 7 at offset 1" }
            ])
        );
    }

    #[test]
    fn empty_chunk_prints_only_the_header() {
        assert_eq!(disassemble_chunk(&Chunk::new(), "empty"), "== empty ==\n");

        let mut out = String::new();
        assert_eq!(disassemble_instruction(&Chunk::new(), 0, &mut out), 0);
        assert_eq!(out, "0000 offset 0 out of bounds\n");
    }

    #[test]
    fn line_column_compares_with_the_previous_byte() {
        let mut chunk = Chunk::new();
        chunk.append_instruction(Opcode::Return, 5).unwrap();
        chunk.append_constant(Value(1.0), 4).unwrap();
        chunk.append_instruction(Opcode::Return, 4).unwrap();
        chunk.append_instruction(Opcode::Return, 5).unwrap();

        let mut out = String::new();
        for offset in [0, 1, 3, 4] {
            disassemble_instruction(&chunk, offset, &mut out);
        }
        assert_eq!(
            out,
            "0000    5 RETURN\n\
             0001    4 CONSTANT            0 '1'\n\
             0003    | RETURN\n\
             0004    5 RETURN\n"
        );
    }
}
