//! tt_hint - TrueType hinting bytecode interpreter
//!
//! Scope:
//! - Stack-only execution: no graphics state, CVT, storage or outline points
//! - Deterministic resource bounds (program length, stack capacity, step count)
//! - 26.6 fixed-point arithmetic and IF/ELSE/EIF skip resolution
//! - Opcodes outside the supported subset fail closed

pub mod decode;
pub mod error;
pub mod exec;
pub mod fixed;
pub mod opcode;
pub mod stack;

pub use decode::{decode_stream, DecodeError, Instr};
pub use error::{ErrorKind, HintError};
pub use exec::{HintConfig, HintOutcome, Hinter, MAX_PROGRAM_LEN, MAX_STEPS, STACK_CAPACITY};
pub use opcode::{OpDef, OpInfo, Opcode};
