//! Instruction tags and their fixed operand widths.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Closed set of instruction tags.
///
/// The discriminant is the byte written to the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(u8)]
pub enum Opcode {
    /// Leave the current chunk. No operand.
    Return = 0,
    /// Load a constant; one operand byte (pool index `0..=255`).
    Constant = 1,
    /// Load a constant; three operand bytes (big-endian 24-bit pool index).
    ConstantLong = 2,
}

impl Opcode {
    /// Every opcode, in tag order.
    pub const ALL: [Self; 3] = [Self::Return, Self::Constant, Self::ConstantLong];

    /// Byte written to the stream.
    pub const fn tag(self) -> u8 { self as u8 }

    /// Decodes a tag byte.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Return),
            1 => Some(Self::Constant),
            2 => Some(Self::ConstantLong),
            _ => None,
        }
    }

    /// Operand bytes following the tag. Shared by the appender and the decoder.
    pub const fn operand_bytes(self) -> usize {
        match self {
            Self::Return => 0,
            Self::Constant => 1,
            Self::ConstantLong => 3,
        }
    }

    /// Total encoded width (tag + operands).
    pub const fn width(self) -> usize { 1 + self.operand_bytes() }

    /// Name printed in traces.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Return => "RETURN",
            Self::Constant => "CONSTANT",
            Self::ConstantLong => "CONSTANT_LONG",
        }
    }

    /// Case-insensitive lookup by mnemonic.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic().eq_ignore_ascii_case(name))
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> { Self::from_tag(tag).ok_or(tag) }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self { op.tag() }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working (`{:<16}`).
        f.pad(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(Opcode::Return.width(), 1);
        assert_eq!(Opcode::Constant.width(), 2);
        assert_eq!(Opcode::ConstantLong.width(), 4);
    }

    #[test]
    fn tags_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_tag(op.tag()), Some(op));
            assert_eq!(Opcode::try_from(u8::from(op)), Ok(op));
        }
        assert_eq!(Opcode::try_from(0xFF), Err(0xFF));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(Opcode::from_mnemonic("constant_long"), Some(Opcode::ConstantLong));
        assert_eq!(Opcode::from_mnemonic("Return"), Some(Opcode::Return));
        assert_eq!(Opcode::from_mnemonic("PUSH"), None);
        assert_eq!(format!("{:<10}|", Opcode::Return), "RETURN    |");
    }
}
