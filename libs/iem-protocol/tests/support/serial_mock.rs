//! Serial Port Mock for Testing
//!
//! Blocking stand-in for the IEM serial line. Responses are queued as
//! separate read chunks so tests control exactly how a frame is split
//! across reads. A clone shares state with the handle given to the client.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct State {
    /// Chunks returned by successive reads
    reads: VecDeque<Vec<u8>>,
    /// Everything written by the client
    written: Vec<u8>,
    /// Number of read calls issued
    read_calls: usize,
}

/// Mock serial port for testing
#[derive(Debug, Clone, Default)]
pub struct MockSerialPort {
    state: Arc<Mutex<State>>,
}

#[allow(dead_code)] // Not every test binary uses every helper
impl MockSerialPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one read chunk (an empty chunk models a read that timed out)
    pub fn push_read(&self, chunk: &[u8]) {
        self.state.lock().unwrap().reads.push_back(chunk.to_vec());
    }

    /// Data written to the port so far
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().unwrap().written.clone()
    }

    pub fn read_calls(&self) -> usize {
        self.state.lock().unwrap().read_calls
    }
}

impl Read for MockSerialPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        state.read_calls += 1;

        let Some(mut chunk) = state.reads.pop_front() else {
            return Err(io::Error::new(ErrorKind::TimedOut, "Operation timed out"));
        };

        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            state.reads.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

impl Write for MockSerialPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.lock().unwrap().written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
