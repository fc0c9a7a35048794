//! Flat word memory plus the memory-mapped I/O unit.
//!
//! Address map (for a memory of `M` words):
//! - `0 .. M-4`: ordinary storage (the top of this range is the stack top,
//!   the initial stack-pointer value)
//! - `M-3`: fault cell; any access is fatal ("possible stack underflow";
//!   the cell sits directly above the stack, so an unbalanced pop lands on
//!   it)
//! - `M-2`: input cell; load blocks for one character, store pushes one
//!   character back (single-level putback for lookahead parsers)
//! - `M-1`: output cell; store emits the low byte; load falls through to
//!   ordinary storage (only the fault and input cells are special on load)
//!
//! All instruction-driven memory traffic goes through [`Bus::load`] and
//! [`Bus::store`]; registers bypass the bus entirely.

use std::io::{self, Read, Write};

use crate::errors::{Result, VmError};

/// Default memory size in 32-bit words.
pub const MEM_SIZE: usize = 1024;
/// Initial stack pointer value under the default sizing.
pub const STACK_TOP: u32 = (MEM_SIZE - 4) as u32;
/// Fault cell address under the default sizing.
pub const FAIL: u32 = (MEM_SIZE - 3) as u32;
/// Input cell address under the default sizing.
pub const IN: u32 = (MEM_SIZE - 2) as u32;
/// Output cell address under the default sizing.
pub const OUT: u32 = (MEM_SIZE - 1) as u32;

/// Sentinel returned by a load of the input cell at end of stream.
///
/// Characters are 0..=255, so the sentinel never aliases a valid one.
/// Programs detect it with `CMP Rd, END_OF_INPUT; BEQ done`.
pub const END_OF_INPUT: u32 = u32::MAX;

pub struct Bus {
    mem: Vec<u32>,
    /// Single putback character; a store to the input cell overwrites it.
    putback: Option<u8>,
    input: Box<dyn Read>,
    output: Box<dyn Write>,
}

impl Bus {
    /// Bus over `mem_words` zeroed words, wired to stdin/stdout.
    ///
    /// `mem_words` must leave room for the three reserved cells plus a
    /// usable stack; `Machine::with_config` enforces a minimum of 8.
    pub fn new(mem_words: usize) -> Self {
        Self::with_io(mem_words, io::stdin(), io::stdout())
    }

    /// Bus with caller-supplied character streams (tests use in-memory
    /// buffers here).
    pub fn with_io(
        mem_words: usize,
        input: impl Read + 'static,
        output: impl Write + 'static,
    ) -> Self {
        Self {
            mem: vec![0; mem_words],
            putback: None,
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    /// Initial stack pointer value for this memory sizing.
    pub fn stack_top(&self) -> u32 {
        (self.mem.len() - 4) as u32
    }

    fn fail_addr(&self) -> u32 {
        (self.mem.len() - 3) as u32
    }

    fn input_addr(&self) -> u32 {
        (self.mem.len() - 2) as u32
    }

    fn output_addr(&self) -> u32 {
        (self.mem.len() - 1) as u32
    }

    /// Zero memory and drop any pending putback. Streams are kept.
    pub fn reset(&mut self) {
        self.mem.fill(0);
        self.putback = None;
    }

    /// Memory-mapped load.
    pub fn load(&mut self, addr: u32) -> Result<u32> {
        if addr as usize >= self.mem.len() {
            return Err(VmError::AddressOutOfRange(addr));
        }
        if addr == self.fail_addr() {
            Err(VmError::StackFault)
        } else if addr == self.input_addr() {
            self.read_char()
        } else {
            Ok(self.mem[addr as usize])
        }
    }

    /// Memory-mapped store.
    pub fn store(&mut self, value: u32, addr: u32) -> Result<()> {
        if addr as usize >= self.mem.len() {
            return Err(VmError::AddressOutOfRange(addr));
        }
        if addr == self.fail_addr() {
            Err(VmError::StackFault)
        } else if addr == self.input_addr() {
            self.putback = Some((value & 0xFF) as u8);
            Ok(())
        } else if addr == self.output_addr() {
            self.output.write_all(&[(value & 0xFF) as u8])?;
            Ok(())
        } else {
            self.mem[addr as usize] = value;
            Ok(())
        }
    }

    /// Flush the output stream (called once on normal halt).
    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    /// Blocking single-character read: putback first, then the stream.
    fn read_char(&mut self) -> Result<u32> {
        if let Some(b) = self.putback.take() {
            return Ok(u32::from(b));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(END_OF_INPUT),
                Ok(_) => return Ok(u32::from(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
