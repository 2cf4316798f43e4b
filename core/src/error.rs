//! Machine errors. Every condition here is fatal to the interpreter
//! instance: the engine propagates it out of `execute()` and the host
//! prints the diagnostic line and stops.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineError {
    /// The free list was still empty after a full collection.
    OutOfMemory,

    /// An accessor was applied to a cell of the wrong tag.
    TypeMismatch {
        operation: &'static str,
        expected: &'static str,
    },

    /// CAR/CDR reached the null sentinel, or LD walked off the end of the
    /// environment.
    NullDereference { operation: &'static str },

    /// DIV or MOD with a zero divisor.
    DivideByZero,

    /// The byte at the instruction pointer is not a recognised opcode.
    OpcodeUnknown(u8),

    /// The instruction pointer left the code image.
    CodeAddressOutOfRange { pos: usize, size: usize },

    /// An installed image would not fit the configured code space.
    CodeImageTooLarge { size: usize, capacity: usize },
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of memory: cell pool exhausted after collection"),
            Self::TypeMismatch {
                operation,
                expected,
            } => write!(f, "type mismatch: {operation} expects a {expected} cell"),
            Self::NullDereference { operation } => {
                write!(f, "null dereference in {operation}")
            }
            Self::DivideByZero => write!(f, "division by zero"),
            Self::OpcodeUnknown(byte) => write!(f, "unknown opcode 0x{byte:02X}"),
            Self::CodeAddressOutOfRange { pos, size } => {
                write!(f, "code address {pos} outside image of {size} bytes")
            }
            Self::CodeImageTooLarge { size, capacity } => {
                write!(f, "code image of {size} bytes exceeds capacity of {capacity}")
            }
        }
    }
}

impl std::error::Error for MachineError {}
