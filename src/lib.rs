#![doc = r#"
Armlet library crate.

A small ARM-flavoured virtual CPU: a 32-bit register file, a word-addressed
memory with reserved cells for character I/O and fault reporting, four
condition flags driven solely by `CMP`, and a branch/call instruction set
assembled in-process through builder types.

Modules:
- bus: word memory plus the reserved fault/input/output cells
- errors: crate error type and Result alias
- isa: registers, operands, conditions, and the instruction enum
- machine: configuration, register file, flags, and the run loop
- program: label/procedure resolution and the routine/program builders

In tests, shared machine-with-captured-I/O helpers are available under
`crate::test_utils`.
"#]

// Core machine modules
pub mod bus;
pub mod errors;
pub mod isa;
pub mod machine;
pub mod program;

// Re-export commonly used types at the crate root for convenience.
pub use bus::{Bus, END_OF_INPUT, FAIL, IN, MEM_SIZE, OUT, STACK_TOP};
pub use errors::{Result, VmError};
pub use isa::{
    Cond, Op, Operand, R0, R1, R2, R3, R4, R5, R6, R7, R8, R9, R10, R11, R12, Reg, SP,
};
pub use machine::flags::Flags;
pub use machine::{Machine, MachineConfig};
pub use program::{Label, ProcId, Program, ProgramBuilder, Routine, RoutineBuilder};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
