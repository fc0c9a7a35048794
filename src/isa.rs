//! Instruction set definitions: registers, operands, conditions, opcodes.
//!
//! The ISA is ARM-flavoured three-address code over 32-bit unsigned words.
//! `OP2` positions accept a register or an immediate ([`Operand`]), including
//! the address operand of `STR`/`LDR` (programs address both fixed I/O cells
//! and stack cells held in SP). Every operation except `CMP` is flag-inert;
//! branches test the flags left by the most recent `CMP`.

use crate::program::{Label, ProcId};

/// Index into the machine's register file.
///
/// Registers are plain 32-bit integer slots. The last slot of the configured
/// file is the stack pointer by software convention only; the hardware does
/// not treat it specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

pub const R0: Reg = Reg(0);
pub const R1: Reg = Reg(1);
pub const R2: Reg = Reg(2);
pub const R3: Reg = Reg(3);
pub const R4: Reg = Reg(4);
pub const R5: Reg = Reg(5);
pub const R6: Reg = Reg(6);
pub const R7: Reg = Reg(7);
pub const R8: Reg = Reg(8);
pub const R9: Reg = Reg(9);
pub const R10: Reg = Reg(10);
pub const R11: Reg = Reg(11);
pub const R12: Reg = Reg(12);

/// Stack pointer under the default 13-register sizing.
pub const SP: Reg = R12;

/// Register-or-immediate operand (the `OP2` of the ARM convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Reg),
    Imm(u32),
}

impl From<Reg> for Operand {
    fn from(r: Reg) -> Self {
        Operand::Reg(r)
    }
}

impl From<u32> for Operand {
    fn from(v: u32) -> Self {
        Operand::Imm(v)
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Imm(v as u32)
    }
}

impl From<u8> for Operand {
    fn from(v: u8) -> Self {
        Operand::Imm(u32::from(v))
    }
}

/// Branch condition, evaluated against the flags of the last compare.
///
/// `Lt`/`Gt` are signed comparisons (N≠V disagreement encodes signed
/// less-than after a compare).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    /// Z set.
    Eq,
    /// Z clear.
    Ne,
    /// N != V.
    Lt,
    /// Z clear and N == V.
    Gt,
}

/// One machine instruction.
///
/// Field order follows the assembly convention: destination register first,
/// then sources. Arithmetic wraps at 32 bits and never touches flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Rd ← OP2
    Mov(Reg, Operand),
    /// Rd ← !OP2 (bitwise NOT)
    Mvn(Reg, Operand),
    /// Rd ← Rn + OP2 (wrapping)
    Add(Reg, Reg, Operand),
    /// Rd ← Rn − OP2 (wrapping)
    Sub(Reg, Reg, Operand),
    /// Rd ← Rn & OP2
    And(Reg, Reg, Operand),
    /// Rd ← Rn | OP2
    Orr(Reg, Reg, Operand),
    /// Rd ← Rn ^ OP2
    Eor(Reg, Reg, Operand),
    /// Rd ← Rn << OP2 (logical; 32+ bit shifts yield 0)
    Lsl(Reg, Reg, Operand),
    /// Rd ← Rn >> OP2 (logical; 32+ bit shifts yield 0)
    Lsr(Reg, Reg, Operand),
    /// Set N/Z/C/V from Rn − OP2. The only flag-setting operation.
    Cmp(Reg, Operand),
    /// Memory-mapped store of Rd at the address named by the operand.
    Str(Reg, Operand),
    /// Rd ← memory-mapped load from the address named by the operand.
    Ldr(Reg, Operand),
    /// Unconditional branch.
    B(Label),
    /// Conditional branch; falls through when the condition does not hold.
    Br(Cond, Label),
    /// Call a procedure; execution resumes at the next instruction after
    /// the procedure returns.
    Bsr(ProcId),
    /// Return from the current procedure.
    Ret,
    /// Stop the machine; control never returns to any calling frame.
    Halt,
}

impl Op {
    /// Assembly mnemonic, used by the instruction trace.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Op::Mov(..) => "MOV",
            Op::Mvn(..) => "MVN",
            Op::Add(..) => "ADD",
            Op::Sub(..) => "SUB",
            Op::And(..) => "AND",
            Op::Orr(..) => "ORR",
            Op::Eor(..) => "EOR",
            Op::Lsl(..) => "LSL",
            Op::Lsr(..) => "LSR",
            Op::Cmp(..) => "CMP",
            Op::Str(..) => "STR",
            Op::Ldr(..) => "LDR",
            Op::B(_) => "B",
            Op::Br(Cond::Eq, _) => "BEQ",
            Op::Br(Cond::Ne, _) => "BNE",
            Op::Br(Cond::Lt, _) => "BLT",
            Op::Br(Cond::Gt, _) => "BGT",
            Op::Bsr(_) => "BSR",
            Op::Ret => "RET",
            Op::Halt => "HALT",
        }
    }
}
