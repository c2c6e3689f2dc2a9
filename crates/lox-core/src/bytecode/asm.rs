//! Small listing assembler used by tests and the `lox` CLI to produce chunks.
//!
//! One instruction per line:
//!
//! ```text
//! ; comment
//! RETURN
//! CONSTANT 1.2        ; recorded at the listing line (2 here)
//! 7: CONSTANT -3.5e2  ; explicit source line
//! ```
//!
//! `CONSTANT_LONG` is accepted as an alias of `CONSTANT`: the chunk always
//! picks the operand width from the pool index.

use log::debug;

use super::{chunk::Chunk, lines::Line, opcode::Opcode};
use crate::{
    error::{AsmError, AsmErrorKind},
    value::Value,
};

/// Assembles `source` into a fresh chunk.
pub fn assemble(source: &str) -> Result<Chunk, AsmError> {
    let mut chunk = Chunk::new();
    assemble_into(&mut chunk, source)?;
    Ok(chunk)
}

/// Appends the instructions of `source` to an existing chunk.
///
/// Stops at the first bad line; instructions from earlier lines stay in the chunk.
pub fn assemble_into(chunk: &mut Chunk, source: &str) -> Result<(), AsmError> {
    for (idx, raw) in source.lines().enumerate() {
        let listing_line = idx + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        assemble_line(chunk, listing_line, text).map_err(|kind| AsmError::new(listing_line, kind))?;
    }
    debug!("assembled {} bytes, {} constants", chunk.len(), chunk.constants().len());
    Ok(())
}

fn assemble_line(chunk: &mut Chunk, listing_line: usize, text: &str) -> Result<(), AsmErrorKind> {
    let (line, body) = split_line_prefix(text, listing_line)?;

    let mut words = body.split_whitespace();
    let mnemonic = words.next().unwrap_or_default();
    let operand = words.next();
    if let Some(extra) = words.next() {
        return Err(AsmErrorKind::UnexpectedOperand(extra.to_owned()));
    }

    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| AsmErrorKind::UnknownMnemonic(mnemonic.to_owned()))?;

    match opcode {
        Opcode::Return => {
            if let Some(op) = operand {
                return Err(AsmErrorKind::UnexpectedOperand(op.to_owned()));
            }
            chunk.append_instruction(opcode, line)?;
        }
        Opcode::Constant | Opcode::ConstantLong => {
            let raw = operand.ok_or(AsmErrorKind::MissingOperand(opcode.mnemonic()))?;
            let value: f64 = raw.parse().map_err(|_| AsmErrorKind::InvalidNumber(raw.to_owned()))?;
            chunk.append_constant(Value(value), line)?;
        }
    }
    Ok(())
}

/// `"12: RETURN"` → `(12, "RETURN")`; without prefix the listing line is used.
fn split_line_prefix(text: &str, listing_line: usize) -> Result<(Line, &str), AsmErrorKind> {
    match text.split_once(':') {
        Some((prefix, rest)) => {
            let prefix = prefix.trim();
            let line = prefix
                .parse::<Line>()
                .map_err(|_| AsmErrorKind::InvalidLinePrefix(prefix.to_owned()))?;
            Ok((line, rest.trim()))
        }
        None => {
            let line = Line::try_from(listing_line)
                .map_err(|_| AsmErrorKind::InvalidLinePrefix(listing_line.to_string()))?;
            Ok((line, text))
        }
    }
}

fn strip_comment(raw: &str) -> &str {
    raw.split_once(';').map_or(raw, |(code, _)| code)
}
