//! Error taxonomy for program construction and execution.
//!
//! Execution errors are fatal: the interpreter never retries, and the only
//! recovery mechanism available to a running program is conditional branching
//! after a compare. Construction errors ([`VmError::DuplicateLabel`],
//! [`VmError::UndefinedLabel`], [`VmError::UndefinedProc`]) are reported at
//! build time, before anything executes.

use crate::program::Label;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VmError>;

#[derive(Debug, Error)]
pub enum VmError {
    /// The reserved fault cell was read or written. Programs hit this by
    /// popping an empty stack (the cell sits directly above the stack top).
    #[error("possible stack underflow")]
    StackFault,

    /// Register index outside the configured register file. A contract
    /// violation by the program; never silently wrapped.
    #[error("register r{0} out of range")]
    RegisterOutOfRange(u8),

    /// Memory address outside the configured memory. A contract violation
    /// by the program; never silently wrapped.
    #[error("memory address {0:#x} out of range")]
    AddressOutOfRange(u32),

    /// The host input or output stream failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A label was bound to more than one position in a routine.
    #[error("duplicate label {0:?}")]
    DuplicateLabel(Label),

    /// A branch names a label that was never bound in its routine.
    #[error("undefined label {0:?}")]
    UndefinedLabel(Label),

    /// A declared procedure was never given a body.
    #[error("undefined procedure '{0}'")]
    UndefinedProc(String),

    /// Rejected machine sizing (register file or memory too small).
    #[error("invalid machine config: {0}")]
    InvalidConfig(&'static str),
}
