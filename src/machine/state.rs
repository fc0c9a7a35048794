//! Canonical machine state: the register file and condition flags.
//!
//! `MachineState` is the single owner of everything the instruction set can
//! architecturally observe outside memory. It carries no bus, decode, or
//! I/O logic; those live in the bus and exec modules. Register access is
//! bounds-checked: an out-of-range index is a contract violation by the
//! program and fails fast rather than wrapping.

use crate::errors::{Result, VmError};
use crate::isa::Reg;
use crate::machine::flags::Flags;

#[derive(Debug, Clone)]
pub struct MachineState {
    regs: Vec<u32>,
    pub flags: Flags,
}

impl MachineState {
    /// All registers zero, flags clear, stack pointer (last slot) preset
    /// to `stack_top`.
    pub fn new(num_regs: usize, stack_top: u32) -> Self {
        let mut state = Self {
            regs: vec![0; num_regs],
            flags: Flags::default(),
        };
        *state.regs.last_mut().expect("register file is non-empty") = stack_top;
        state
    }

    pub fn num_regs(&self) -> usize {
        self.regs.len()
    }

    /// The stack pointer register for this sizing (last slot, by
    /// convention only).
    pub fn sp(&self) -> Reg {
        Reg((self.regs.len() - 1) as u8)
    }

    #[inline]
    pub fn reg(&self, r: Reg) -> Result<u32> {
        self.regs
            .get(r.0 as usize)
            .copied()
            .ok_or(VmError::RegisterOutOfRange(r.0))
    }

    #[inline]
    pub fn set_reg(&mut self, r: Reg, value: u32) -> Result<()> {
        match self.regs.get_mut(r.0 as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(VmError::RegisterOutOfRange(r.0)),
        }
    }

    /// Back to the initial state: zeroed registers, cleared flags, SP at
    /// `stack_top`.
    pub fn reset(&mut self, stack_top: u32) {
        self.regs.fill(0);
        self.flags.clear();
        let sp = self.sp();
        // Infallible: sp() is always in range.
        let _ = self.set_reg(sp, stack_top);
    }
}
