//! Program representation: routines, labels, procedures, and their builders.
//!
//! A program is fixed before execution starts. Each routine (the program
//! body or a procedure) is a flat instruction sequence; labels are bound to
//! positions while building and every branch target is resolved to an
//! instruction index at `build()` time, so execution never performs a name
//! lookup. Procedures are declared up front so bodies can call each other
//! (including recursively) before all of them are defined.

use crate::errors::{Result, VmError};
use crate::isa::{Cond, Op, Operand, Reg, SP};

/// Branch target within one routine.
///
/// Labels are allocated by [`RoutineBuilder::new_label`] and are only
/// meaningful inside the routine that allocated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(pub(crate) u32);

impl Label {
    #[cfg(test)]
    pub(crate) fn for_tests(id: u32) -> Self {
        Label(id)
    }
}

/// Handle to a declared procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcId(pub(crate) u32);

/// A resolved instruction sequence: the program body or one procedure.
#[derive(Debug, Clone)]
pub struct Routine {
    pub(crate) code: Vec<Op>,
    /// Label id -> instruction index, filled in by `build()`.
    targets: Vec<usize>,
}

impl Routine {
    /// Resolved index for a branch target. Errors on a label that belongs
    /// to a different routine's builder.
    pub(crate) fn target(&self, label: Label) -> Result<usize> {
        self.targets
            .get(label.0 as usize)
            .copied()
            .ok_or(VmError::UndefinedLabel(label))
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Incrementally builds one [`Routine`].
///
/// One method per mnemonic keeps program text close to the assembly it
/// stands for:
///
/// ```
/// use armlet::{RoutineBuilder, OUT, R0};
///
/// let mut asm = RoutineBuilder::new();
/// asm.mov(R0, b'*');
/// asm.str(R0, OUT);
/// asm.halt();
/// let routine = asm.build().unwrap();
/// assert_eq!(routine.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct RoutineBuilder {
    code: Vec<Op>,
    /// Label id -> bound position, `None` until `bind` is called.
    bound: Vec<Option<usize>>,
}

impl RoutineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh, unbound label.
    pub fn new_label(&mut self) -> Label {
        let id = self.bound.len() as u32;
        self.bound.push(None);
        Label(id)
    }

    /// Bind `label` to the position of the next emitted instruction.
    pub fn bind(&mut self, label: Label) -> Result<()> {
        let slot = self
            .bound
            .get_mut(label.0 as usize)
            .ok_or(VmError::UndefinedLabel(label))?;
        if slot.is_some() {
            return Err(VmError::DuplicateLabel(label));
        }
        *slot = Some(self.code.len());
        Ok(())
    }

    /// Append a raw instruction.
    pub fn op(&mut self, op: Op) -> &mut Self {
        self.code.push(op);
        self
    }

    // Mnemonic helpers. Dest register first, sources after, as in the
    // assembly convention.

    pub fn mov(&mut self, rd: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Mov(rd, op2.into()))
    }

    pub fn mvn(&mut self, rd: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Mvn(rd, op2.into()))
    }

    pub fn add(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Add(rd, rn, op2.into()))
    }

    pub fn sub(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Sub(rd, rn, op2.into()))
    }

    pub fn and(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::And(rd, rn, op2.into()))
    }

    pub fn orr(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Orr(rd, rn, op2.into()))
    }

    pub fn eor(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Eor(rd, rn, op2.into()))
    }

    pub fn lsl(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Lsl(rd, rn, op2.into()))
    }

    pub fn lsr(&mut self, rd: Reg, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Lsr(rd, rn, op2.into()))
    }

    pub fn cmp(&mut self, rn: Reg, op2: impl Into<Operand>) -> &mut Self {
        self.op(Op::Cmp(rn, op2.into()))
    }

    pub fn str(&mut self, rd: Reg, addr: impl Into<Operand>) -> &mut Self {
        self.op(Op::Str(rd, addr.into()))
    }

    pub fn ldr(&mut self, rd: Reg, addr: impl Into<Operand>) -> &mut Self {
        self.op(Op::Ldr(rd, addr.into()))
    }

    pub fn b(&mut self, target: Label) -> &mut Self {
        self.op(Op::B(target))
    }

    pub fn beq(&mut self, target: Label) -> &mut Self {
        self.op(Op::Br(Cond::Eq, target))
    }

    pub fn bne(&mut self, target: Label) -> &mut Self {
        self.op(Op::Br(Cond::Ne, target))
    }

    pub fn blt(&mut self, target: Label) -> &mut Self {
        self.op(Op::Br(Cond::Lt, target))
    }

    pub fn bgt(&mut self, target: Label) -> &mut Self {
        self.op(Op::Br(Cond::Gt, target))
    }

    pub fn bsr(&mut self, proc: ProcId) -> &mut Self {
        self.op(Op::Bsr(proc))
    }

    pub fn ret(&mut self) -> &mut Self {
        self.op(Op::Ret)
    }

    pub fn halt(&mut self) -> &mut Self {
        self.op(Op::Halt)
    }

    /// Push `r` onto the data stack: `STR r, SP; SUB SP, SP, 1`.
    ///
    /// Assumes the default register sizing where [`SP`] is the last slot.
    pub fn push(&mut self, r: Reg) -> &mut Self {
        self.str(r, SP).sub(SP, SP, 1u32)
    }

    /// Pop the data stack into `r`: `ADD SP, SP, 1; LDR r, SP`.
    pub fn pop(&mut self, r: Reg) -> &mut Self {
        self.add(SP, SP, 1u32).ldr(r, SP)
    }

    /// Resolve every label to its bound position and finish the routine.
    pub fn build(self) -> Result<Routine> {
        let mut targets = Vec::with_capacity(self.bound.len());
        for (id, slot) in self.bound.iter().enumerate() {
            match slot {
                Some(pos) => targets.push(*pos),
                None => return Err(VmError::UndefinedLabel(Label(id as u32))),
            }
        }
        Ok(Routine {
            code: self.code,
            targets,
        })
    }
}

/// A complete program: the body plus any procedures, fixed at build time.
#[derive(Debug, Clone)]
pub struct Program {
    pub(crate) body: Routine,
    procs: Vec<Routine>,
    names: Vec<String>,
}

impl Program {
    /// A program with no procedures.
    pub fn from_body(body: Routine) -> Self {
        Self {
            body,
            procs: Vec::new(),
            names: Vec::new(),
        }
    }

    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::default()
    }

    pub(crate) fn proc(&self, id: ProcId) -> &Routine {
        &self.procs[id.0 as usize]
    }

    pub(crate) fn proc_name(&self, id: ProcId) -> &str {
        &self.names[id.0 as usize]
    }
}

/// Collects procedure declarations and bodies, then assembles a [`Program`].
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    procs: Vec<(String, Option<Routine>)>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a procedure by name, reserving its handle. The body may be
    /// supplied later, which lets procedures call forward or recurse.
    pub fn declare(&mut self, name: &str) -> ProcId {
        let id = ProcId(self.procs.len() as u32);
        self.procs.push((name.to_string(), None));
        id
    }

    /// Attach the body of a previously declared procedure.
    pub fn define(&mut self, id: ProcId, body: Routine) {
        self.procs[id.0 as usize].1 = Some(body);
    }

    /// Validate that every declared procedure has a body and assemble the
    /// program around `body`.
    pub fn build(self, body: Routine) -> Result<Program> {
        let mut names = Vec::with_capacity(self.procs.len());
        let mut procs = Vec::with_capacity(self.procs.len());
        for (name, routine) in self.procs {
            match routine {
                Some(r) => {
                    names.push(name);
                    procs.push(r);
                }
                None => return Err(VmError::UndefinedProc(name)),
            }
        }
        Ok(Program { body, procs, names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{R0, R1};

    #[test]
    fn labels_resolve_to_instruction_indices() {
        let mut asm = RoutineBuilder::new();
        let skip = asm.new_label();
        asm.mov(R0, 1u32);
        asm.b(skip);
        asm.mov(R0, 2u32);
        asm.bind(skip).unwrap();
        asm.mov(R1, 3u32);
        let routine = asm.build().unwrap();
        assert_eq!(routine.target(skip).unwrap(), 3);
    }

    #[test]
    fn binding_twice_is_rejected() {
        let mut asm = RoutineBuilder::new();
        let l = asm.new_label();
        asm.bind(l).unwrap();
        assert!(matches!(asm.bind(l), Err(VmError::DuplicateLabel(_))));
    }

    #[test]
    fn unbound_label_fails_build() {
        let mut asm = RoutineBuilder::new();
        let l = asm.new_label();
        asm.b(l);
        assert!(matches!(asm.build(), Err(VmError::UndefinedLabel(_))));
    }

    #[test]
    fn label_bound_at_end_points_past_last_instruction() {
        // Branching to a label bound after the final instruction is how a
        // program jumps straight to "fall off the end and stop".
        let mut asm = RoutineBuilder::new();
        let done = asm.new_label();
        asm.b(done);
        asm.bind(done).unwrap();
        let routine = asm.build().unwrap();
        assert_eq!(routine.target(done).unwrap(), routine.len());
    }

    #[test]
    fn undefined_procedure_fails_build() {
        let mut pb = ProgramBuilder::new();
        let _ghost = pb.declare("ghost");
        let body = RoutineBuilder::new().build().unwrap();
        let err = pb.build(body).unwrap_err();
        assert!(matches!(err, VmError::UndefinedProc(name) if name == "ghost"));
    }

    #[test]
    fn push_pop_emit_the_stack_idiom() {
        let mut asm = RoutineBuilder::new();
        asm.push(R0);
        asm.pop(R1);
        let routine = asm.build().unwrap();
        assert_eq!(
            routine.code,
            vec![
                Op::Str(R0, Operand::Reg(SP)),
                Op::Sub(SP, SP, Operand::Imm(1)),
                Op::Add(SP, SP, Operand::Imm(1)),
                Op::Ldr(R1, Operand::Reg(SP)),
            ]
        );
    }
}
