use crate::error::{HintError, Result};
use crate::fixed;
use crate::opcode::{self as op, OpInfo, Opcode, PushCount};
use crate::stack::Stack;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub const MAX_PROGRAM_LEN: usize = 50_000;
pub const STACK_CAPACITY: usize = 800;
pub const MAX_STEPS: u64 = 100_000;

/// Resource limits for a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintConfig {
    pub max_program_len: usize,
    pub stack_capacity: usize,
    /// The run fails when the step counter reaches this value.
    pub max_steps: u64,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            max_program_len: MAX_PROGRAM_LEN,
            stack_capacity: STACK_CAPACITY,
            max_steps: MAX_STEPS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HintOutcome {
    /// Opcodes executed.
    pub steps: u64,
}

enum Flow {
    Next,
    Goto(i64),
}

/// The instruction being executed, for error context.
#[derive(Clone, Copy)]
struct At {
    pc: usize,
    opcode: Opcode,
}

impl At {
    fn underflow(self) -> HintError {
        HintError::StackUnderflow { pc: self.pc, opcode: self.opcode }
    }
    fn overflow(self) -> HintError {
        HintError::StackOverflow { pc: self.pc, opcode: self.opcode }
    }
    fn invalid(self) -> HintError {
        HintError::InvalidData { pc: self.pc, opcode: self.opcode }
    }
    fn insufficient(self) -> HintError {
        HintError::InsufficientData { pc: self.pc, opcode: self.opcode }
    }
    fn unrecognized(self) -> HintError {
        HintError::UnrecognizedInstruction { pc: self.pc, opcode: self.opcode }
    }
}

/// TrueType bytecode interpreter over a fixed-capacity integer stack.
///
/// The stack buffer is owned by the instance and reused; depth and counters
/// are reset by every [`Hinter::run`].
#[derive(Debug, Clone)]
pub struct Hinter {
    cfg: HintConfig,
    stack: Stack,
}

impl Default for Hinter {
    fn default() -> Self {
        Self::new(HintConfig::default())
    }
}

impl Hinter {
    pub fn new(cfg: HintConfig) -> Self {
        let stack = Stack::with_capacity(cfg.stack_capacity);
        Self { cfg, stack }
    }

    pub fn config(&self) -> &HintConfig {
        &self.cfg
    }

    /// Stack contents bottom to top. Only meaningful after a successful run.
    pub fn stack(&self) -> &[i32] {
        self.stack.as_slice()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Executes `program` until the program counter leaves it.
    pub fn run(&mut self, program: &[u8]) -> Result<HintOutcome> {
        debug!(program_len = program.len(), "hinting run start");
        let res = self.execute(program);
        match &res {
            Ok(outcome) => {
                debug!(steps = outcome.steps, depth = self.stack.len(), "hinting run finished")
            }
            Err(e) => debug!(error = %e, "hinting run failed"),
        }
        res
    }

    fn execute(&mut self, program: &[u8]) -> Result<HintOutcome> {
        self.stack.clear();
        if program.len() > self.cfg.max_program_len {
            return Err(HintError::TooManyInstructions {
                len: program.len(),
                max: self.cfg.max_program_len,
            });
        }

        let mut steps: u64 = 0;
        let mut pc: i64 = 0;
        while pc >= 0 && (pc as usize) < program.len() {
            steps += 1;
            if steps >= self.cfg.max_steps {
                return Err(HintError::TooManySteps { max: self.cfg.max_steps });
            }

            let at = At { pc: pc as usize, opcode: Opcode(program[pc as usize]) };
            let def = at.opcode.def().ok_or_else(|| at.unrecognized())?;
            let pops = match def.info {
                OpInfo::Pops(n) => n as usize,
                OpInfo::Unimplemented => {
                    return Err(HintError::Unimplemented { pc: at.pc, opcode: at.opcode })
                }
            };
            if self.stack.len() < pops {
                return Err(at.underflow());
            }
            trace!(pc = at.pc, op = def.name, depth = self.stack.len(), "step");

            pc = match self.step(program, at)? {
                Flow::Next => pc + 1,
                Flow::Goto(target) => target,
            };
        }

        Ok(HintOutcome { steps })
    }

    fn step(&mut self, program: &[u8], at: At) -> Result<Flow> {
        let pc = at.pc as i64;
        match at.opcode.byte() {
            op::ELSE => {
                let eif = skip_to_match(program, at.pc, false)?;
                return Ok(Flow::Goto(eif as i64 + 1));
            }
            op::JMPR => {
                let offset = self.pop(at)?;
                return Ok(Flow::Goto(pc + offset as i64));
            }
            op::DUP => {
                let v = self.peek(at, 0)?;
                self.push(at, v)?;
            }
            op::POP => {
                self.pop(at)?;
            }
            op::CLEAR => self.stack.clear(),
            op::SWAP => {
                let b = self.pop(at)?;
                let a = self.pop(at)?;
                self.push(at, b)?;
                self.push(at, a)?;
            }
            op::DEPTH => {
                let depth = self.stack.len() as i32;
                self.push(at, depth)?;
            }
            op::CINDEX | op::MINDEX => {
                // The index counts from 1 at the value just below it.
                let x = self.peek(at, 0)?;
                if x <= 0 || x as usize >= self.stack.len() {
                    return Err(at.invalid());
                }
                self.pop(at)?;
                let depth = x as usize - 1;
                if at.opcode.byte() == op::CINDEX {
                    let v = self.peek(at, depth)?;
                    self.push(at, v)?;
                } else {
                    self.stack.lift(depth).ok_or_else(|| at.invalid())?;
                }
            }
            op::NPUSHB | op::NPUSHW | op::PUSHB000..=op::PUSHB111 | op::PUSHW000..=op::PUSHW111 => {
                let next = self.push_immediates(program, at)?;
                return Ok(Flow::Goto(next as i64));
            }
            op::DEBUG | op::EIF => {}
            op::LT => self.binary(at, |a, b| (a < b) as i32)?,
            op::LTEQ => self.binary(at, |a, b| (a <= b) as i32)?,
            op::GT => self.binary(at, |a, b| (a > b) as i32)?,
            op::GTEQ => self.binary(at, |a, b| (a >= b) as i32)?,
            op::EQ => self.binary(at, |a, b| (a == b) as i32)?,
            op::NEQ => self.binary(at, |a, b| (a != b) as i32)?,
            op::AND => self.binary(at, |a, b| (a != 0 && b != 0) as i32)?,
            op::OR => self.binary(at, |a, b| (a != 0 || b != 0) as i32)?,
            op::NOT => self.unary(at, |a| (a == 0) as i32)?,
            op::IF => {
                let cond = self.peek(at, 0)?;
                let flow = if cond == 0 {
                    let matched = skip_to_match(program, at.pc, true)?;
                    Flow::Goto(matched as i64 + 1)
                } else {
                    Flow::Next
                };
                self.pop(at)?;
                return Ok(flow);
            }
            op::ADD => self.binary(at, i32::wrapping_add)?,
            op::SUB => self.binary(at, i32::wrapping_sub)?,
            op::DIV => {
                let b = self.peek(at, 0)?;
                let a = self.peek(at, 1)?;
                let q = fixed::div(a, b).ok_or(HintError::DivisionByZero { pc: at.pc })?;
                self.pop(at)?;
                *self.top_mut(at)? = q;
            }
            op::MUL => self.binary(at, fixed::mul)?,
            op::ABS => self.unary(at, i32::wrapping_abs)?,
            op::NEG => self.unary(at, i32::wrapping_neg)?,
            op::FLOOR => self.unary(at, fixed::floor)?,
            op::CEILING => self.unary(at, fixed::ceiling)?,
            op::JROT | op::JROF => {
                let cond = self.pop(at)?;
                let offset = self.pop(at)?;
                let jump = (cond != 0) == (at.opcode.byte() == op::JROT);
                if jump {
                    return Ok(Flow::Goto(pc + offset as i64));
                }
            }
            _ => return Err(at.unrecognized()),
        }
        Ok(Flow::Next)
    }

    /// Pushes the immediates of the push instruction at `at`, returning the
    /// offset just past its operand bytes.
    fn push_immediates(&mut self, program: &[u8], at: At) -> Result<usize> {
        let (width, count) = op::push_shape(at.opcode.byte()).ok_or_else(|| at.unrecognized())?;
        let (count, start) = match count {
            PushCount::Inline(n) => (n, at.pc + 1),
            PushCount::Prefixed => {
                let n = *program.get(at.pc + 1).ok_or_else(|| at.insufficient())?;
                (n as usize, at.pc + 2)
            }
        };
        if !self.stack.has_room(count) {
            return Err(at.overflow());
        }
        let end = start + width * count;
        let data = program.get(start..end).ok_or_else(|| at.insufficient())?;
        for chunk in data.chunks_exact(width) {
            self.push(at, op::read_immediate(chunk))?;
        }
        Ok(end)
    }

    fn pop(&mut self, at: At) -> Result<i32> {
        self.stack.pop().ok_or_else(|| at.underflow())
    }

    fn push(&mut self, at: At, v: i32) -> Result<()> {
        self.stack.push(v).ok_or_else(|| at.overflow())
    }

    fn peek(&self, at: At, depth: usize) -> Result<i32> {
        self.stack.peek(depth).ok_or_else(|| at.underflow())
    }

    fn top_mut(&mut self, at: At) -> Result<&mut i32> {
        self.stack.peek_mut(0).ok_or_else(|| at.underflow())
    }

    fn unary(&mut self, at: At, f: impl FnOnce(i32) -> i32) -> Result<()> {
        let a = self.top_mut(at)?;
        *a = f(*a);
        Ok(())
    }

    /// Pops `b`, then replaces `a` (the value beneath it) with `f(a, b)`.
    fn binary(&mut self, at: At, f: impl FnOnce(i32, i32) -> i32) -> Result<()> {
        let b = self.pop(at)?;
        let a = self.top_mut(at)?;
        *a = f(*a, b);
        Ok(())
    }
}

/// Scans forward from the IF or ELSE at `from` for its matching ELSE/EIF and
/// returns that instruction's offset. An ELSE only matches when
/// `stop_on_else` is set and it is not nested. Push operands are stepped over
/// so literal data never reads as an opcode.
pub(crate) fn skip_to_match(program: &[u8], from: usize, stop_on_else: bool) -> Result<usize> {
    let unbalanced = || HintError::UnbalancedIfElse { pc: from };
    let mut depth = 0usize;
    let mut pc = from;
    loop {
        pc += 1;
        let byte = *program.get(pc).ok_or_else(unbalanced)?;
        match byte {
            op::IF => depth += 1,
            op::ELSE if depth == 0 && stop_on_else => return Ok(pc),
            op::EIF => {
                if depth == 0 {
                    return Ok(pc);
                }
                depth -= 1;
            }
            _ => {
                if let Some((width, count)) = op::push_shape(byte) {
                    let n = match count {
                        PushCount::Inline(n) => n,
                        PushCount::Prefixed => {
                            pc += 1;
                            *program.get(pc).ok_or_else(unbalanced)? as usize
                        }
                    };
                    pc += width * n;
                }
            }
        }
    }
}
