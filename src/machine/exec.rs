//! Instruction dispatch and the routine interpreter loop.
//!
//! A routine runs as an index-based loop over its instruction sequence;
//! branches jump to indices resolved at program build time. `BSR` recurses
//! into the callee's routine on the host call stack; the machine keeps no
//! return-address stack of its own, so call nesting is bounded by the host
//! thread stack. `HALT` unwinds every nested frame via [`Signal::Halted`].
//!
//! Executed instructions are emitted on the `tracing` TRACE level; the
//! trace is a side channel with no effect on machine state.

use tracing::trace;

use crate::bus::Bus;
use crate::errors::Result;
use crate::isa::{Op, Operand};
use crate::machine::state::MachineState;
use crate::program::{Program, Routine};

/// Where execution goes after one instruction.
enum Flow {
    Next,
    Jump(usize),
    Return,
    Halt,
}

/// How a routine finished.
pub(crate) enum Signal {
    /// Ran off the end or executed `RET`.
    Finished,
    /// Executed `HALT` (possibly in a nested procedure).
    Halted,
}

#[inline]
fn value(state: &MachineState, operand: Operand) -> Result<u32> {
    match operand {
        Operand::Reg(r) => state.reg(r),
        Operand::Imm(v) => Ok(v),
    }
}

/// Execute `routine` to completion against `state` and `bus`.
pub(crate) fn run_routine(
    state: &mut MachineState,
    bus: &mut Bus,
    program: &Program,
    routine: &Routine,
) -> Result<Signal> {
    let mut pc = 0usize;
    while let Some(op) = routine.code.get(pc) {
        trace!(target: "armlet::exec", pc, mnemonic = op.mnemonic(), ?op);
        match step(state, bus, program, routine, op)? {
            Flow::Next => pc += 1,
            Flow::Jump(target) => pc = target,
            Flow::Return => return Ok(Signal::Finished),
            Flow::Halt => return Ok(Signal::Halted),
        }
    }
    // Falling off the end finishes the routine: the program body stops,
    // a procedure returns to its caller.
    Ok(Signal::Finished)
}

/// Apply one instruction. At most one register or one memory cell is
/// written; only `CMP` touches the flags.
fn step(
    state: &mut MachineState,
    bus: &mut Bus,
    program: &Program,
    routine: &Routine,
    op: &Op,
) -> Result<Flow> {
    match *op {
        Op::Mov(rd, op2) => {
            let v = value(state, op2)?;
            state.set_reg(rd, v)?;
        }
        Op::Mvn(rd, op2) => {
            let v = !value(state, op2)?;
            state.set_reg(rd, v)?;
        }
        Op::Add(rd, rn, op2) => {
            let v = state.reg(rn)?.wrapping_add(value(state, op2)?);
            state.set_reg(rd, v)?;
        }
        Op::Sub(rd, rn, op2) => {
            let v = state.reg(rn)?.wrapping_sub(value(state, op2)?);
            state.set_reg(rd, v)?;
        }
        Op::And(rd, rn, op2) => {
            let v = state.reg(rn)? & value(state, op2)?;
            state.set_reg(rd, v)?;
        }
        Op::Orr(rd, rn, op2) => {
            let v = state.reg(rn)? | value(state, op2)?;
            state.set_reg(rd, v)?;
        }
        Op::Eor(rd, rn, op2) => {
            let v = state.reg(rn)? ^ value(state, op2)?;
            state.set_reg(rd, v)?;
        }
        Op::Lsl(rd, rn, op2) => {
            // Shift counts of 32+ yield 0 (kept deterministic; the shift
            // amount is a full word, not a masked 5-bit field).
            let v = state
                .reg(rn)?
                .checked_shl(value(state, op2)?)
                .unwrap_or(0);
            state.set_reg(rd, v)?;
        }
        Op::Lsr(rd, rn, op2) => {
            let v = state
                .reg(rn)?
                .checked_shr(value(state, op2)?)
                .unwrap_or(0);
            state.set_reg(rd, v)?;
        }
        Op::Cmp(rn, op2) => {
            let lhs = state.reg(rn)?;
            let rhs = value(state, op2)?;
            state.flags.compare(lhs, rhs);
        }
        Op::Str(rd, addr) => {
            let v = state.reg(rd)?;
            let addr = value(state, addr)?;
            bus.store(v, addr)?;
        }
        Op::Ldr(rd, addr) => {
            let addr = value(state, addr)?;
            let v = bus.load(addr)?;
            state.set_reg(rd, v)?;
        }
        Op::B(label) => return Ok(Flow::Jump(routine.target(label)?)),
        Op::Br(cond, label) => {
            if state.flags.satisfies(cond) {
                return Ok(Flow::Jump(routine.target(label)?));
            }
        }
        Op::Bsr(id) => {
            trace!(target: "armlet::exec", procedure = program.proc_name(id), "call");
            match run_routine(state, bus, program, program.proc(id))? {
                Signal::Finished => {}
                Signal::Halted => return Ok(Flow::Halt),
            }
        }
        Op::Ret => return Ok(Flow::Return),
        Op::Halt => return Ok(Flow::Halt),
    }
    Ok(Flow::Next)
}
