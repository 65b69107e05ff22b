//! Opcode metadata for the TrueType instruction set.
//!
//! Every byte resolves to one of three states:
//! - `Some(OpDef { info: OpInfo::Pops(n), .. })`: implemented, needs `n` operands
//! - `Some(OpDef { info: OpInfo::Unimplemented, .. })`: defined by TrueType but not executed here
//! - `None`: not an instruction at all
//!
//! Supporting a new instruction means flipping its entry to `Pops(n)` and adding
//! a dispatch arm in `exec`; the guards around dispatch stay as they are.

use std::fmt;

// Implemented opcodes, referenced by the dispatch loop and the skip-scan.
pub const ELSE: u8 = 0x1B;
pub const JMPR: u8 = 0x1C;
pub const DUP: u8 = 0x20;
pub const POP: u8 = 0x21;
pub const CLEAR: u8 = 0x22;
pub const SWAP: u8 = 0x23;
pub const DEPTH: u8 = 0x24;
pub const CINDEX: u8 = 0x25;
pub const MINDEX: u8 = 0x26;
pub const NPUSHB: u8 = 0x40;
pub const NPUSHW: u8 = 0x41;
pub const DEBUG: u8 = 0x4F;
pub const LT: u8 = 0x50;
pub const LTEQ: u8 = 0x51;
pub const GT: u8 = 0x52;
pub const GTEQ: u8 = 0x53;
pub const EQ: u8 = 0x54;
pub const NEQ: u8 = 0x55;
pub const IF: u8 = 0x58;
pub const EIF: u8 = 0x59;
pub const AND: u8 = 0x5A;
pub const OR: u8 = 0x5B;
pub const NOT: u8 = 0x5C;
pub const ADD: u8 = 0x60;
pub const SUB: u8 = 0x61;
pub const DIV: u8 = 0x62;
pub const MUL: u8 = 0x63;
pub const ABS: u8 = 0x64;
pub const NEG: u8 = 0x65;
pub const FLOOR: u8 = 0x66;
pub const CEILING: u8 = 0x67;
pub const JROT: u8 = 0x78;
pub const JROF: u8 = 0x79;
pub const PUSHB000: u8 = 0xB0;
pub const PUSHB001: u8 = 0xB1;
pub const PUSHB010: u8 = 0xB2;
pub const PUSHB011: u8 = 0xB3;
pub const PUSHB100: u8 = 0xB4;
pub const PUSHB101: u8 = 0xB5;
pub const PUSHB110: u8 = 0xB6;
pub const PUSHB111: u8 = 0xB7;
pub const PUSHW000: u8 = 0xB8;
pub const PUSHW001: u8 = 0xB9;
pub const PUSHW010: u8 = 0xBA;
pub const PUSHW011: u8 = 0xBB;
pub const PUSHW100: u8 = 0xBC;
pub const PUSHW101: u8 = 0xBD;
pub const PUSHW110: u8 = 0xBE;
pub const PUSHW111: u8 = 0xBF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpInfo {
    /// Executable; the stack must hold at least this many values.
    Pops(u8),
    Unimplemented,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpDef {
    pub name: &'static str,
    pub info: OpInfo,
}

use OpInfo::{Pops, Unimplemented as U};

// (first, last, mnemonic, info), ascending and non-overlapping.
const DEFS: &[(u8, u8, &str, OpInfo)] = &[
    (0x00, 0x01, "SVTCA", U),
    (0x02, 0x03, "SPVTCA", U),
    (0x04, 0x05, "SFVTCA", U),
    (0x06, 0x07, "SPVTL", U),
    (0x08, 0x09, "SFVTL", U),
    (0x0A, 0x0A, "SPVFS", U),
    (0x0B, 0x0B, "SFVFS", U),
    (0x0C, 0x0C, "GPV", U),
    (0x0D, 0x0D, "GFV", U),
    (0x0E, 0x0E, "SFVTPV", U),
    (0x0F, 0x0F, "ISECT", U),
    (0x10, 0x10, "SRP0", U),
    (0x11, 0x11, "SRP1", U),
    (0x12, 0x12, "SRP2", U),
    (0x13, 0x13, "SZP0", U),
    (0x14, 0x14, "SZP1", U),
    (0x15, 0x15, "SZP2", U),
    (0x16, 0x16, "SZPS", U),
    (0x17, 0x17, "SLOOP", U),
    (0x18, 0x18, "RTG", U),
    (0x19, 0x19, "RTHG", U),
    (0x1A, 0x1A, "SMD", U),
    (ELSE, ELSE, "ELSE", Pops(0)),
    (JMPR, JMPR, "JMPR", Pops(1)),
    (0x1D, 0x1D, "SCVTCI", U),
    (0x1E, 0x1E, "SSWCI", U),
    (0x1F, 0x1F, "SSW", U),
    (DUP, DUP, "DUP", Pops(1)),
    (POP, POP, "POP", Pops(1)),
    (CLEAR, CLEAR, "CLEAR", Pops(0)),
    (SWAP, SWAP, "SWAP", Pops(2)),
    (DEPTH, DEPTH, "DEPTH", Pops(0)),
    (CINDEX, CINDEX, "CINDEX", Pops(1)),
    (MINDEX, MINDEX, "MINDEX", Pops(1)),
    (0x27, 0x27, "ALIGNPTS", U),
    (0x29, 0x29, "UTP", U),
    (0x2A, 0x2A, "LOOPCALL", U),
    (0x2B, 0x2B, "CALL", U),
    (0x2C, 0x2C, "FDEF", U),
    (0x2D, 0x2D, "ENDF", U),
    (0x2E, 0x2F, "MDAP", U),
    (0x30, 0x31, "IUP", U),
    (0x32, 0x33, "SHP", U),
    (0x34, 0x35, "SHC", U),
    (0x36, 0x37, "SHZ", U),
    (0x38, 0x38, "SHPIX", U),
    (0x39, 0x39, "IP", U),
    (0x3A, 0x3B, "MSIRP", U),
    (0x3C, 0x3C, "ALIGNRP", U),
    (0x3D, 0x3D, "RTDG", U),
    (0x3E, 0x3F, "MIAP", U),
    (NPUSHB, NPUSHB, "NPUSHB", Pops(0)),
    (NPUSHW, NPUSHW, "NPUSHW", Pops(0)),
    (0x42, 0x42, "WS", U),
    (0x43, 0x43, "RS", U),
    (0x44, 0x44, "WCVTP", U),
    (0x45, 0x45, "RCVT", U),
    (0x46, 0x47, "GC", U),
    (0x48, 0x48, "SCFS", U),
    (0x49, 0x4A, "MD", U),
    (0x4B, 0x4B, "MPPEM", U),
    (0x4C, 0x4C, "MPS", U),
    (0x4D, 0x4D, "FLIPON", U),
    (0x4E, 0x4E, "FLIPOFF", U),
    (DEBUG, DEBUG, "DEBUG", Pops(0)),
    (LT, LT, "LT", Pops(2)),
    (LTEQ, LTEQ, "LTEQ", Pops(2)),
    (GT, GT, "GT", Pops(2)),
    (GTEQ, GTEQ, "GTEQ", Pops(2)),
    (EQ, EQ, "EQ", Pops(2)),
    (NEQ, NEQ, "NEQ", Pops(2)),
    (0x56, 0x56, "ODD", U),
    (0x57, 0x57, "EVEN", U),
    (IF, IF, "IF", Pops(1)),
    (EIF, EIF, "EIF", Pops(0)),
    (AND, AND, "AND", Pops(2)),
    (OR, OR, "OR", Pops(2)),
    (NOT, NOT, "NOT", Pops(1)),
    (0x5D, 0x5D, "DELTAP1", U),
    (0x5E, 0x5E, "SDB", U),
    (0x5F, 0x5F, "SDS", U),
    (ADD, ADD, "ADD", Pops(2)),
    (SUB, SUB, "SUB", Pops(2)),
    (DIV, DIV, "DIV", Pops(2)),
    (MUL, MUL, "MUL", Pops(2)),
    (ABS, ABS, "ABS", Pops(1)),
    (NEG, NEG, "NEG", Pops(1)),
    (FLOOR, FLOOR, "FLOOR", Pops(1)),
    (CEILING, CEILING, "CEILING", Pops(1)),
    (0x68, 0x6B, "ROUND", U),
    (0x6C, 0x6F, "NROUND", U),
    (0x70, 0x70, "WCVTF", U),
    (0x71, 0x71, "DELTAP2", U),
    (0x72, 0x72, "DELTAP3", U),
    (0x73, 0x73, "DELTAC1", U),
    (0x74, 0x74, "DELTAC2", U),
    (0x75, 0x75, "DELTAC3", U),
    (0x76, 0x76, "SROUND", U),
    (0x77, 0x77, "S45ROUND", U),
    (JROT, JROT, "JROT", Pops(2)),
    (JROF, JROF, "JROF", Pops(2)),
    (0x7A, 0x7A, "ROFF", U),
    (0x7C, 0x7C, "RUTG", U),
    (0x7D, 0x7D, "RDTG", U),
    (0x7E, 0x7E, "SANGW", U),
    (0x7F, 0x7F, "AA", U),
    (0x80, 0x80, "FLIPPT", U),
    (0x81, 0x81, "FLIPRGON", U),
    (0x82, 0x82, "FLIPRGOFF", U),
    (0x85, 0x85, "SCANCTRL", U),
    (0x86, 0x87, "SDPVTL", U),
    (0x88, 0x88, "GETINFO", U),
    (0x89, 0x89, "IDEF", U),
    (0x8A, 0x8A, "ROLL", U),
    (0x8B, 0x8B, "MAX", U),
    (0x8C, 0x8C, "MIN", U),
    (0x8D, 0x8D, "SCANTYPE", U),
    (0x8E, 0x8E, "INSTCTRL", U),
    (PUSHB000, PUSHB111, "PUSHB", Pops(0)),
    (PUSHW000, PUSHW111, "PUSHW", Pops(0)),
    (0xC0, 0xDF, "MDRP", U),
    (0xE0, 0xFF, "MIRP", U),
];

const fn build_table() -> [Option<OpDef>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < DEFS.len() {
        let (first, last, name, info) = DEFS[i];
        let mut byte = first as usize;
        while byte <= last as usize {
            table[byte] = Some(OpDef { name, info });
            byte += 1;
        }
        i += 1;
    }
    table
}

static TABLE: [Option<OpDef>; 256] = build_table();

/// Resolves an opcode byte against the metadata table.
pub fn lookup(byte: u8) -> Option<OpDef> {
    TABLE[byte as usize]
}

/// An instruction byte, displayed by mnemonic when it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    pub fn byte(self) -> u8 {
        self.0
    }

    pub fn def(self) -> Option<OpDef> {
        lookup(self.0)
    }

    pub fn name(self) -> Option<&'static str> {
        self.def().map(|d| d.name)
    }

    pub fn is_push(self) -> bool {
        push_shape(self.0).is_some()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

/// Where a push instruction finds its value count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushCount {
    /// Encoded in the low 3 bits of the opcode (plus one).
    Inline(usize),
    /// Read from the byte following the opcode.
    Prefixed,
}

/// Immediate layout of a push opcode: bytes per value and how many values.
/// `None` for anything that is not a push.
pub fn push_shape(byte: u8) -> Option<(usize, PushCount)> {
    match byte {
        NPUSHB => Some((1, PushCount::Prefixed)),
        NPUSHW => Some((2, PushCount::Prefixed)),
        PUSHB000..=PUSHB111 => Some((1, PushCount::Inline((byte - PUSHB000) as usize + 1))),
        PUSHW000..=PUSHW111 => Some((2, PushCount::Inline((byte - PUSHW000) as usize + 1))),
        _ => None,
    }
}

/// Decodes one immediate. Bytes are zero-extended; words are big-endian and
/// sign-extended from the high byte.
pub fn read_immediate(bytes: &[u8]) -> i32 {
    match *bytes {
        [b] => b as i32,
        [hi, lo] => ((hi as i8 as i32) << 8) | lo as i32,
        _ => unreachable!("immediates are one or two bytes"),
    }
}
