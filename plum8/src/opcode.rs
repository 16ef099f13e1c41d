use core::convert::TryFrom;
use core::fmt;

use crate::error::DecodeError;

/// Decoded CHIP-8 instruction, one variant per supported opcode
///
/// Operand fields keep the nibbles of the raw word: `x`/`y` name registers,
/// `n`/`nn`/`nnn` are immediates. Machine language calls (`0NNN`) have no
/// variant and fail to decode.
///
/// Examples:
/// ```
/// use core::convert::TryFrom;
/// use plum8::opcode::OpCode;
///
/// let instruction = 0x8AB4;
/// let opcode = OpCode::try_from(instruction).unwrap();
///
/// assert_eq!(
///     opcode,
///     OpCode::_8XY4 { x: 0xA, y: 0xB },
/// );
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpCode {
    /// Clear the display
    _00E0,
    /// Return to the address on top of the stack
    _00EE,
    /// Jump to NNN
    _1NNN { nnn: u16 },
    /// Call the subroutine at NNN
    _2NNN { nnn: u16 },
    /// Skip next if VX == NN
    _3XNN { x: u8, nn: u8 },
    /// Skip next if VX != NN
    _4XNN { x: u8, nn: u8 },
    /// Skip next if VX == VY
    _5XY0 { x: u8, y: u8 },
    /// VX = NN
    _6XNN { x: u8, nn: u8 },
    /// VX += NN, no carry flag
    _7XNN { x: u8, nn: u8 },
    /// VX = VY
    _8XY0 { x: u8, y: u8 },
    /// VX |= VY
    _8XY1 { x: u8, y: u8 },
    /// VX &= VY
    _8XY2 { x: u8, y: u8 },
    /// VX ^= VY
    _8XY3 { x: u8, y: u8 },
    /// VX += VY, VF = carry
    _8XY4 { x: u8, y: u8 },
    /// VX -= VY, VF = no borrow
    _8XY5 { x: u8, y: u8 },
    /// VX = source >> 1, VF = shifted out bit
    _8XY6 { x: u8, y: u8 },
    /// VX = VY - VX, VF = no borrow
    _8XY7 { x: u8, y: u8 },
    /// VX = source << 1, VF = shifted out bit
    _8XYE { x: u8, y: u8 },
    /// Skip next if VX != VY
    _9XY0 { x: u8, y: u8 },
    /// I = NNN
    _ANNN { nnn: u16 },
    /// Jump to NNN + V0
    _BNNN { nnn: u16 },
    /// VX = random AND NN
    _CXNN { x: u8, nn: u8 },
    /// XOR an N rows tall sprite from I at (VX, VY), VF = collision
    _DXYN { x: u8, y: u8, n: u8 },
    /// Skip next if key VX is held
    _EX9E { x: u8 },
    /// Skip next if key VX is not held
    _EXA1 { x: u8 },
    /// VX = delay timer
    _FX07 { x: u8 },
    /// Block until a key is pressed, latch it into VX
    _FX0A { x: u8 },
    /// Delay timer = VX
    _FX15 { x: u8 },
    /// Sound timer = VX
    _FX18 { x: u8 },
    /// I += VX
    _FX1E { x: u8 },
    /// I = address of the font glyph for VX
    _FX29 { x: u8 },
    /// Decimal digits of VX at I, I+1, I+2
    _FX33 { x: u8 },
    /// Store registers at I
    _FX55 { x: u8 },
    /// Load registers from I
    _FX65 { x: u8 },
}

impl OpCode {
    fn read_first(raw: u16) -> u8 {
        (raw >> 12 & 0x000Fu16) as u8
    }

    fn read_last(raw: u16) -> u8 {
        (raw & 0x000Fu16) as u8
    }

    fn read_x(raw: u16) -> u8 {
        (raw >> 8 & 0x000Fu16) as u8
    }

    fn read_y(raw: u16) -> u8 {
        (raw >> 4 & 0x000Fu16) as u8
    }

    fn read_nn(raw: u16) -> u8 {
        (raw & 0x00FFu16) as u8
    }

    fn read_nnn(raw: u16) -> u16 {
        raw & 0x0FFFu16
    }

    /// Re-encode the opcode into its raw instruction word
    pub fn raw(&self) -> u16 {
        let xy = |base: u16, x: u8, y: u8, n: u16| base | (x as u16) << 8 | (y as u16) << 4 | n;
        let xnn = |base: u16, x: u8, nn: u8| base | (x as u16) << 8 | nn as u16;
        match *self {
            OpCode::_00E0 => 0x00E0,
            OpCode::_00EE => 0x00EE,
            OpCode::_1NNN { nnn } => 0x1000 | nnn,
            OpCode::_2NNN { nnn } => 0x2000 | nnn,
            OpCode::_3XNN { x, nn } => xnn(0x3000, x, nn),
            OpCode::_4XNN { x, nn } => xnn(0x4000, x, nn),
            OpCode::_5XY0 { x, y } => xy(0x5000, x, y, 0x0),
            OpCode::_6XNN { x, nn } => xnn(0x6000, x, nn),
            OpCode::_7XNN { x, nn } => xnn(0x7000, x, nn),
            OpCode::_8XY0 { x, y } => xy(0x8000, x, y, 0x0),
            OpCode::_8XY1 { x, y } => xy(0x8000, x, y, 0x1),
            OpCode::_8XY2 { x, y } => xy(0x8000, x, y, 0x2),
            OpCode::_8XY3 { x, y } => xy(0x8000, x, y, 0x3),
            OpCode::_8XY4 { x, y } => xy(0x8000, x, y, 0x4),
            OpCode::_8XY5 { x, y } => xy(0x8000, x, y, 0x5),
            OpCode::_8XY6 { x, y } => xy(0x8000, x, y, 0x6),
            OpCode::_8XY7 { x, y } => xy(0x8000, x, y, 0x7),
            OpCode::_8XYE { x, y } => xy(0x8000, x, y, 0xE),
            OpCode::_9XY0 { x, y } => xy(0x9000, x, y, 0x0),
            OpCode::_ANNN { nnn } => 0xA000 | nnn,
            OpCode::_BNNN { nnn } => 0xB000 | nnn,
            OpCode::_CXNN { x, nn } => xnn(0xC000, x, nn),
            OpCode::_DXYN { x, y, n } => xy(0xD000, x, y, n as u16),
            OpCode::_EX9E { x } => xnn(0xE000, x, 0x9E),
            OpCode::_EXA1 { x } => xnn(0xE000, x, 0xA1),
            OpCode::_FX07 { x } => xnn(0xF000, x, 0x07),
            OpCode::_FX0A { x } => xnn(0xF000, x, 0x0A),
            OpCode::_FX15 { x } => xnn(0xF000, x, 0x15),
            OpCode::_FX18 { x } => xnn(0xF000, x, 0x18),
            OpCode::_FX1E { x } => xnn(0xF000, x, 0x1E),
            OpCode::_FX29 { x } => xnn(0xF000, x, 0x29),
            OpCode::_FX33 { x } => xnn(0xF000, x, 0x33),
            OpCode::_FX55 { x } => xnn(0xF000, x, 0x55),
            OpCode::_FX65 { x } => xnn(0xF000, x, 0x65),
        }
    }
}

impl TryFrom<u16> for OpCode {
    type Error = DecodeError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        let unknown = DecodeError { opcode: raw };
        let opcode = match Self::read_first(raw) {
            0x0u8 => match raw {
                0x00E0u16 => OpCode::_00E0,
                0x00EEu16 => OpCode::_00EE,
                _ => return Err(unknown),
            },
            0x1u8 => OpCode::_1NNN {
                nnn: Self::read_nnn(raw),
            },
            0x2u8 => OpCode::_2NNN {
                nnn: Self::read_nnn(raw),
            },
            0x3u8 => OpCode::_3XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x4u8 => OpCode::_4XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x5u8 if Self::read_last(raw) == 0x0u8 => OpCode::_5XY0 {
                x: Self::read_x(raw),
                y: Self::read_y(raw),
            },
            0x6u8 => OpCode::_6XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x7u8 => OpCode::_7XNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0x8u8 => {
                let x = Self::read_x(raw);
                let y = Self::read_y(raw);
                match Self::read_last(raw) {
                    0x0u8 => OpCode::_8XY0 { x, y },
                    0x1u8 => OpCode::_8XY1 { x, y },
                    0x2u8 => OpCode::_8XY2 { x, y },
                    0x3u8 => OpCode::_8XY3 { x, y },
                    0x4u8 => OpCode::_8XY4 { x, y },
                    0x5u8 => OpCode::_8XY5 { x, y },
                    0x6u8 => OpCode::_8XY6 { x, y },
                    0x7u8 => OpCode::_8XY7 { x, y },
                    0xEu8 => OpCode::_8XYE { x, y },
                    _ => return Err(unknown),
                }
            }
            0x9u8 if Self::read_last(raw) == 0x0u8 => OpCode::_9XY0 {
                x: Self::read_x(raw),
                y: Self::read_y(raw),
            },
            0xAu8 => OpCode::_ANNN {
                nnn: Self::read_nnn(raw),
            },
            0xBu8 => OpCode::_BNNN {
                nnn: Self::read_nnn(raw),
            },
            0xCu8 => OpCode::_CXNN {
                x: Self::read_x(raw),
                nn: Self::read_nn(raw),
            },
            0xDu8 => OpCode::_DXYN {
                x: Self::read_x(raw),
                y: Self::read_y(raw),
                n: Self::read_last(raw),
            },
            0xEu8 => {
                let x = Self::read_x(raw);
                match Self::read_nn(raw) {
                    0x9Eu8 => OpCode::_EX9E { x },
                    0xA1u8 => OpCode::_EXA1 { x },
                    _ => return Err(unknown),
                }
            }
            0xFu8 => {
                let x = Self::read_x(raw);
                match Self::read_nn(raw) {
                    0x07u8 => OpCode::_FX07 { x },
                    0x0Au8 => OpCode::_FX0A { x },
                    0x15u8 => OpCode::_FX15 { x },
                    0x18u8 => OpCode::_FX18 { x },
                    0x1Eu8 => OpCode::_FX1E { x },
                    0x29u8 => OpCode::_FX29 { x },
                    0x33u8 => OpCode::_FX33 { x },
                    0x55u8 => OpCode::_FX55 { x },
                    0x65u8 => OpCode::_FX65 { x },
                    _ => return Err(unknown),
                }
            }
            _ => return Err(unknown),
        };
        Ok(opcode)
    }
}

/// Disassembly in the `opcode MNEMONIC operands` form
impl fmt::Display for OpCode {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X} ", self.raw())?;
        match *self {
            OpCode::_00E0             => write!(f, "CLS"),
            OpCode::_00EE             => write!(f, "RET"),
            OpCode::_1NNN { nnn }     => write!(f, "JP {:#05X}", nnn),
            OpCode::_2NNN { nnn }     => write!(f, "CALL {:#05X}", nnn),
            OpCode::_3XNN { x, nn }   => write!(f, "SE V{:X}, {:#04X}", x, nn),
            OpCode::_4XNN { x, nn }   => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            OpCode::_5XY0 { x, y }    => write!(f, "SE V{:X}, V{:X}", x, y),
            OpCode::_6XNN { x, nn }   => write!(f, "LD V{:X}, {:#04X}", x, nn),
            OpCode::_7XNN { x, nn }   => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            OpCode::_8XY0 { x, y }    => write!(f, "LD V{:X}, V{:X}", x, y),
            OpCode::_8XY1 { x, y }    => write!(f, "OR V{:X}, V{:X}", x, y),
            OpCode::_8XY2 { x, y }    => write!(f, "AND V{:X}, V{:X}", x, y),
            OpCode::_8XY3 { x, y }    => write!(f, "XOR V{:X}, V{:X}", x, y),
            OpCode::_8XY4 { x, y }    => write!(f, "ADD V{:X}, V{:X}", x, y),
            OpCode::_8XY5 { x, y }    => write!(f, "SUB V{:X}, V{:X}", x, y),
            OpCode::_8XY6 { x, y }    => write!(f, "SHR V{:X}, V{:X}", x, y),
            OpCode::_8XY7 { x, y }    => write!(f, "SUBN V{:X}, V{:X}", x, y),
            OpCode::_8XYE { x, y }    => write!(f, "SHL V{:X}, V{:X}", x, y),
            OpCode::_9XY0 { x, y }    => write!(f, "SNE V{:X}, V{:X}", x, y),
            OpCode::_ANNN { nnn }     => write!(f, "LD I, {:#05X}", nnn),
            OpCode::_BNNN { nnn }     => write!(f, "JP V0, {:#05X}", nnn),
            OpCode::_CXNN { x, nn }   => write!(f, "RND V{:X}, {:#04X}", x, nn),
            OpCode::_DXYN { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            OpCode::_EX9E { x }       => write!(f, "SKP V{:X}", x),
            OpCode::_EXA1 { x }       => write!(f, "SKNP V{:X}", x),
            OpCode::_FX07 { x }       => write!(f, "LD V{:X}, DT", x),
            OpCode::_FX0A { x }       => write!(f, "LD V{:X}, K", x),
            OpCode::_FX15 { x }       => write!(f, "LD DT, V{:X}", x),
            OpCode::_FX18 { x }       => write!(f, "LD ST, V{:X}", x),
            OpCode::_FX1E { x }       => write!(f, "ADD I, V{:X}", x),
            OpCode::_FX29 { x }       => write!(f, "LD F, V{:X}", x),
            OpCode::_FX33 { x }       => write!(f, "LD B, V{:X}", x),
            OpCode::_FX55 { x }       => write!(f, "LD [I], V{:X}", x),
            OpCode::_FX65 { x }       => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn nibble_fields() {
        let raw = 0xD3C5u16;
        assert_eq!(OpCode::read_first(raw), 0xD);
        assert_eq!(OpCode::read_x(raw), 0x3);
        assert_eq!(OpCode::read_y(raw), 0xC);
        assert_eq!(OpCode::read_last(raw), 0x5);
        assert_eq!(OpCode::read_nn(raw), 0xC5);
        assert_eq!(OpCode::read_nnn(raw), 0x3C5);
    }

    #[test]
    #[rustfmt::skip]
    fn decode_and_encode_every_opcode() {
        use super::OpCode::*;
        let instructions = [
            (0x00E0u16, _00E0),
            (0x00EEu16, _00EE),
            (0x13C5u16, _1NNN { nnn: 0x03C5u16 }),
            (0x23C5u16, _2NNN { nnn: 0x03C5u16 }),
            (0x33C5u16, _3XNN { x: 0x3u8, nn: 0xC5u8 }),
            (0x43C5u16, _4XNN { x: 0x3u8, nn: 0xC5u8 }),
            (0x53C0u16, _5XY0 { x: 0x3u8, y: 0xCu8 }),
            (0x63C5u16, _6XNN { x: 0x3u8, nn: 0xC5u8 }),
            (0x73C5u16, _7XNN { x: 0x3u8, nn: 0xC5u8 }),
            (0x83C0u16, _8XY0 { x: 0x3u8, y: 0xCu8 }),
            (0x83C1u16, _8XY1 { x: 0x3u8, y: 0xCu8 }),
            (0x83C2u16, _8XY2 { x: 0x3u8, y: 0xCu8 }),
            (0x83C3u16, _8XY3 { x: 0x3u8, y: 0xCu8 }),
            (0x83C4u16, _8XY4 { x: 0x3u8, y: 0xCu8 }),
            (0x83C5u16, _8XY5 { x: 0x3u8, y: 0xCu8 }),
            (0x83C6u16, _8XY6 { x: 0x3u8, y: 0xCu8 }),
            (0x83C7u16, _8XY7 { x: 0x3u8, y: 0xCu8 }),
            (0x83CEu16, _8XYE { x: 0x3u8, y: 0xCu8 }),
            (0x93C0u16, _9XY0 { x: 0x3u8, y: 0xCu8 }),
            (0xA3C5u16, _ANNN { nnn: 0x03C5u16 }),
            (0xB3C5u16, _BNNN { nnn: 0x03C5u16 }),
            (0xC3C5u16, _CXNN { x: 0x3u8, nn: 0xC5u8 }),
            (0xD3C5u16, _DXYN { x: 0x3u8, y: 0xCu8, n: 0x5u8 }),
            (0xE39Eu16, _EX9E { x: 0x3u8 }),
            (0xE3A1u16, _EXA1 { x: 0x3u8 }),
            (0xF307u16, _FX07 { x: 0x3u8 }),
            (0xF30Au16, _FX0A { x: 0x3u8 }),
            (0xF315u16, _FX15 { x: 0x3u8 }),
            (0xF318u16, _FX18 { x: 0x3u8 }),
            (0xF31Eu16, _FX1E { x: 0x3u8 }),
            (0xF329u16, _FX29 { x: 0x3u8 }),
            (0xF333u16, _FX33 { x: 0x3u8 }),
            (0xF355u16, _FX55 { x: 0x3u8 }),
            (0xF365u16, _FX65 { x: 0x3u8 }),
        ];

        for &(raw, expected) in &instructions {
            assert_eq!(
                Ok(expected),
                OpCode::try_from(raw),
            );
            assert_eq!(raw, expected.raw());
        }
    }

    #[test]
    fn unknown_opcodes_are_rejected() {
        let unknown = [
            0x0000u16, // machine language routine
            0x03C5u16, // machine language routine
            0x00E1u16,
            0x5AB1u16,
            0x8AB8u16,
            0x8ABFu16,
            0x9AB4u16,
            0xEA9Fu16,
            0xFA00u16,
            0xFAFFu16,
        ];

        for &raw in &unknown {
            assert_eq!(
                Err(DecodeError { opcode: raw }),
                OpCode::try_from(raw),
            );
        }
    }

    #[test]
    fn disassembly() {
        assert_eq!(OpCode::_8XY4 { x: 0xA, y: 0xB }.to_string(), "8AB4 ADD VA, VB");
        assert_eq!(OpCode::_2NNN { nnn: 0x2F0 }.to_string(), "22F0 CALL 0x2F0");
        assert_eq!(OpCode::_DXYN { x: 0, y: 1, n: 5 }.to_string(), "D015 DRW V0, V1, 5");
        assert_eq!(OpCode::_FX0A { x: 3 }.to_string(), "F30A LD V3, K");
    }
}
