/*!
Machine facade: configuration, register file, flags, and the run loop.

[`Machine`] owns a [`MachineState`] (registers and flags) and a [`Bus`]
(memory and the reserved I/O cells) and executes a [`Program`] to
completion. The split mirrors the hardware it models: state is what a
program computes on, the bus is what it talks to.
*/

pub mod exec;
pub mod flags;
pub mod state;

use std::io::{Read, Write};

use crate::bus::Bus;
use crate::errors::{Result, VmError};
use crate::isa::{R0, Reg};
use crate::machine::flags::Flags;
use crate::machine::state::MachineState;
use crate::program::Program;

/// Machine shape knobs. The defaults match the classic configuration:
/// thirteen registers with `r12` as stack pointer, 1024 words of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Number of general-purpose registers. The last one is the stack
    /// pointer by convention.
    pub num_regs: usize,
    /// Memory size in 32-bit words, including the three reserved cells.
    pub mem_words: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            num_regs: 13,
            mem_words: crate::bus::MEM_SIZE,
        }
    }
}

impl MachineConfig {
    fn validate(self) -> Result<Self> {
        if self.num_regs < 2 {
            return Err(VmError::InvalidConfig(
                "need at least two registers (one scratch plus the stack pointer)",
            ));
        }
        if self.mem_words < 8 {
            return Err(VmError::InvalidConfig(
                "need at least eight memory words for the reserved cells and a stack",
            ));
        }
        Ok(self)
    }
}

/// A complete virtual machine instance.
pub struct Machine {
    state: MachineState,
    bus: Bus,
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}

impl Machine {
    /// Machine with the default configuration, wired to stdin/stdout.
    pub fn new() -> Self {
        let cfg = MachineConfig::default();
        let bus = Bus::new(cfg.mem_words);
        let state = MachineState::new(cfg.num_regs, bus.stack_top());
        Machine { state, bus }
    }

    /// Machine with a custom register count and memory size.
    pub fn with_config(cfg: MachineConfig) -> Result<Self> {
        let cfg = cfg.validate()?;
        let bus = Bus::new(cfg.mem_words);
        let state = MachineState::new(cfg.num_regs, bus.stack_top());
        Ok(Machine { state, bus })
    }

    /// Default-shape machine with caller-supplied I/O streams.
    pub fn with_io(input: impl Read + 'static, output: impl Write + 'static) -> Self {
        let cfg = MachineConfig::default();
        let bus = Bus::with_io(cfg.mem_words, input, output);
        let state = MachineState::new(cfg.num_regs, bus.stack_top());
        Machine { state, bus }
    }

    /// Custom-shape machine with caller-supplied I/O streams.
    pub fn with_config_io(
        cfg: MachineConfig,
        input: impl Read + 'static,
        output: impl Write + 'static,
    ) -> Result<Self> {
        let cfg = cfg.validate()?;
        let bus = Bus::with_io(cfg.mem_words, input, output);
        let state = MachineState::new(cfg.num_regs, bus.stack_top());
        Ok(Machine { state, bus })
    }

    /// Zero registers and memory and clear the flags, keeping the I/O
    /// streams. The stack pointer is re-seeded to the stack top.
    pub fn reset(&mut self) {
        self.bus.reset();
        self.state.reset(self.bus.stack_top());
    }

    #[inline]
    pub fn reg(&self, r: Reg) -> Result<u32> {
        self.state.reg(r)
    }

    #[inline]
    pub fn set_reg(&mut self, r: Reg, value: u32) -> Result<()> {
        self.state.set_reg(r, value)
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.state.flags
    }

    /// The stack pointer register for this machine's register count.
    #[inline]
    pub fn sp(&self) -> Reg {
        self.state.sp()
    }

    /// Run `program` from the top of its body until it halts, returning
    /// the exit status in `r0`.
    ///
    /// Procedure calls nest on the host call stack, so recursion depth is
    /// bounded by the host thread's stack, not by machine memory.
    pub fn run(&mut self, program: &Program) -> Result<u32> {
        exec::run_routine(&mut self.state, &mut self.bus, program, &program.body)?;
        self.bus.flush()?;
        self.state.reg(R0)
    }
}
