use crate::opcode::Opcode;
use thiserror::Error;

/// Why a run stopped. Every variant is terminal; the stack is unspecified afterwards.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("hinting: too many instructions ({len} bytes, limit {max})")]
    TooManyInstructions { len: usize, max: usize },
    #[error("hinting: too many steps (limit {max})")]
    TooManySteps { max: u64 },
    #[error("hinting: unimplemented instruction {opcode} at pc {pc}")]
    Unimplemented { pc: usize, opcode: Opcode },
    #[error("hinting: unrecognized instruction {opcode} at pc {pc}")]
    UnrecognizedInstruction { pc: usize, opcode: Opcode },
    #[error("hinting: stack underflow at pc {pc} ({opcode})")]
    StackUnderflow { pc: usize, opcode: Opcode },
    #[error("hinting: stack overflow at pc {pc} ({opcode})")]
    StackOverflow { pc: usize, opcode: Opcode },
    #[error("hinting: invalid data at pc {pc} ({opcode})")]
    InvalidData { pc: usize, opcode: Opcode },
    #[error("hinting: insufficient data at pc {pc} ({opcode})")]
    InsufficientData { pc: usize, opcode: Opcode },
    #[error("hinting: division by zero at pc {pc}")]
    DivisionByZero { pc: usize },
    #[error("hinting: unbalanced IF or ELSE at pc {pc}")]
    UnbalancedIfElse { pc: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TooManyInstructions,
    TooManySteps,
    Unimplemented,
    UnrecognizedInstruction,
    StackUnderflow,
    StackOverflow,
    InvalidData,
    InsufficientData,
    DivisionByZero,
    UnbalancedIfElse,
}

impl HintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooManyInstructions { .. } => ErrorKind::TooManyInstructions,
            Self::TooManySteps { .. } => ErrorKind::TooManySteps,
            Self::Unimplemented { .. } => ErrorKind::Unimplemented,
            Self::UnrecognizedInstruction { .. } => ErrorKind::UnrecognizedInstruction,
            Self::StackUnderflow { .. } => ErrorKind::StackUnderflow,
            Self::StackOverflow { .. } => ErrorKind::StackOverflow,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::InsufficientData { .. } => ErrorKind::InsufficientData,
            Self::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            Self::UnbalancedIfElse { .. } => ErrorKind::UnbalancedIfElse,
        }
    }

    /// Program offset of the failing instruction, when there is one.
    pub fn pc(&self) -> Option<usize> {
        match *self {
            Self::TooManyInstructions { .. } | Self::TooManySteps { .. } => None,
            Self::Unimplemented { pc, .. }
            | Self::UnrecognizedInstruction { pc, .. }
            | Self::StackUnderflow { pc, .. }
            | Self::StackOverflow { pc, .. }
            | Self::InvalidData { pc, .. }
            | Self::InsufficientData { pc, .. }
            | Self::DivisionByZero { pc }
            | Self::UnbalancedIfElse { pc } => Some(pc),
        }
    }
}

pub type Result<T> = std::result::Result<T, HintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_guard() {
        let err = HintError::StackUnderflow { pc: 0, opcode: Opcode(0x20) };
        assert_eq!(err.to_string(), "hinting: stack underflow at pc 0 (DUP)");
        let err = HintError::UnrecognizedInstruction { pc: 3, opcode: Opcode(0x28) };
        assert_eq!(err.to_string(), "hinting: unrecognized instruction 0x28 at pc 3");
        let err = HintError::TooManySteps { max: 100_000 };
        assert!(err.to_string().contains("too many steps"));
    }

    #[test]
    fn kind_and_pc() {
        let err = HintError::UnbalancedIfElse { pc: 2 };
        assert_eq!(err.kind(), ErrorKind::UnbalancedIfElse);
        assert_eq!(err.pc(), Some(2));
        let err = HintError::TooManyInstructions { len: 50_001, max: 50_000 };
        assert_eq!(err.kind(), ErrorKind::TooManyInstructions);
        assert_eq!(err.pc(), None);
    }
}
