//! Shared helpers for integration tests: machines wired to in-memory I/O.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use armlet::Machine;

/// Cloneable capture buffer that implements `Write`. One clone goes into
/// the machine, the other stays with the test for inspection.
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }

    pub fn string(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Default-shape machine reading from `input`, writing to a capture buffer.
pub fn machine_with_input(input: &[u8]) -> (Machine, SharedOutput) {
    let out = SharedOutput::default();
    let machine = Machine::with_io(Cursor::new(input.to_vec()), out.clone());
    (machine, out)
}
