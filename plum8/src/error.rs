//! Error taxonomy of the interpreter.
//!
//! Only [`LoadError`] and [`InputError`] are meant to be recovered from.
//! Everything wrapped by [`Error`] stops interpretation.

use thiserror::Error;

/// Failure to place a ROM image in program memory
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("ROM is too large ({size} bytes), program space holds {capacity} bytes")]
    TooLarge { size: usize, capacity: usize },
    #[cfg(feature = "std")]
    #[error("ROM could not be read")]
    IoFailure(#[source] std::io::Error),
}

/// Raw instruction word that does not name any known instruction
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
#[error("unknown opcode {opcode:#06X}")]
pub struct DecodeError {
    pub opcode: u16,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum StackError {
    #[error("call stack overflow, subroutines nested too deep")]
    Overflow,
    #[error("call stack underflow, return outside of a subroutine")]
    Underflow,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum MemoryError {
    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBounds { address: usize },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum InputError {
    #[error("key {key:#04X} is not on the 16-key keypad")]
    OutOfRange { key: u8 },
}

/// Fatal condition raised while executing a cycle
#[derive(Debug, Copy, Clone, Eq, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_keeps_opcode() {
        let err: Error = DecodeError { opcode: 0x5AB1 }.into();
        assert_eq!(err, Error::Decode(DecodeError { opcode: 0x5AB1 }));
    }

    #[test]
    fn wrapped_errors_compare_by_cause() {
        let err: Error = StackError::Underflow.into();
        assert_ne!(err, Error::Stack(StackError::Overflow));
        let err: Error = MemoryError::OutOfBounds { address: 0x1000 }.into();
        assert_eq!(err, Error::Memory(MemoryError::OutOfBounds { address: 0x1000 }));
    }
}
