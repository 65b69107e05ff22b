//! Linear disassembly of a hinting program. Control flow is not followed;
//! every byte is either an opcode or an operand of the push before it.

use crate::opcode::{self as op, Opcode, PushCount};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated push operands at offset {offset}")]
    Truncated { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instr {
    pub offset: usize,
    pub opcode: u8,
    /// Values pushed by NPUSHB/NPUSHW/PUSHB/PUSHW; empty for everything else.
    pub immediates: Vec<i32>,
}

impl Instr {
    pub fn op(&self) -> Opcode {
        Opcode(self.opcode)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.op();
        if !op.is_push() {
            return write!(f, "{op}");
        }
        write!(f, "{op}[{}]", self.immediates.len())?;
        for v in &self.immediates {
            write!(f, " {v}")?;
        }
        Ok(())
    }
}

/// Splits `program` into instructions.
pub fn decode_stream(program: &[u8]) -> Result<Vec<Instr>, DecodeError> {
    let mut out = Vec::new();
    let mut pc = 0;
    while pc < program.len() {
        let opcode = program[pc];
        let mut instr = Instr { offset: pc, opcode, immediates: Vec::new() };
        pc += 1;
        if let Some((width, count)) = op::push_shape(opcode) {
            let truncated = DecodeError::Truncated { offset: instr.offset };
            let count = match count {
                PushCount::Inline(n) => n,
                PushCount::Prefixed => {
                    let n = *program.get(pc).ok_or(truncated.clone())?;
                    pc += 1;
                    n as usize
                }
            };
            let end = pc + width * count;
            let data = program.get(pc..end).ok_or(truncated)?;
            instr.immediates = data.chunks_exact(width).map(op::read_immediate).collect();
            pc = end;
        }
        out.push(instr);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_pushes_with_values() {
        let prog = [op::PUSHB001, 10, 2, op::JMPR, op::NPUSHW, 1, 0xFF, 0xFE, 0x28];
        let code = decode_stream(&prog).unwrap();
        let text: Vec<String> = code.iter().map(|i| i.to_string()).collect();
        assert_eq!(text, ["PUSHB[2] 10 2", "JMPR", "NPUSHW[1] -2", "0x28"]);
        assert_eq!(code.iter().map(|i| i.offset).collect::<Vec<_>>(), [0, 3, 4, 8]);
    }

    #[test]
    fn data_bytes_are_not_opcodes() {
        let prog = [op::PUSHB001, op::IF, op::EIF, op::EIF];
        let code = decode_stream(&prog).unwrap();
        assert_eq!(code.len(), 2);
        assert_eq!(code[0].immediates, [op::IF as i32, op::EIF as i32]);
        assert_eq!(code[1].opcode, op::EIF);
    }

    #[test]
    fn truncated_push() {
        assert_eq!(
            decode_stream(&[op::DUP, op::PUSHW000, 1]),
            Err(DecodeError::Truncated { offset: 1 })
        );
        assert_eq!(decode_stream(&[op::NPUSHB]), Err(DecodeError::Truncated { offset: 0 }));
    }

    #[test]
    fn empty_program() {
        assert!(decode_stream(&[]).unwrap().is_empty());
    }
}
