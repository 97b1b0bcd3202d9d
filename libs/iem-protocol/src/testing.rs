//! Scripted channel for unit tests
//!
//! `tests/support/serial_mock.rs` is compiled only into the integration test
//! crates and cannot be reached from `#[cfg(test)]` modules. This channel is
//! owned by value so unit tests can inspect it through
//! `TransportSession::channel()`; it also scripts read errors and failing
//! writes, which the shared-handle mock does not.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};

enum Step {
    Data(Vec<u8>),
    Error(ErrorKind),
}

/// Replays scripted reads in order and records everything written.
///
/// Each read returns at most one scripted chunk (split if the caller's buffer
/// is smaller). Once the script is exhausted every read fails with
/// `TimedOut`, the way a serial port behaves when the line is quiet.
#[derive(Default)]
pub struct ScriptedChannel {
    steps: VecDeque<Step>,
    written: Vec<u8>,
    read_calls: usize,
    fail_writes: bool,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read(mut self, chunk: &[u8]) -> Self {
        self.steps.push_back(Step::Data(chunk.to_vec()));
        self
    }

    pub fn with_read_error(mut self, kind: ErrorKind) -> Self {
        self.steps.push_back(Step::Error(kind));
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn read_calls(&self) -> usize {
        self.read_calls
    }
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_calls += 1;
        match self.steps.pop_front() {
            Some(Step::Data(mut chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    self.steps.push_front(Step::Data(chunk.split_off(n)));
                }
                Ok(n)
            },
            Some(Step::Error(kind)) => Err(io::Error::new(kind, "scripted failure")),
            None => Err(io::Error::new(ErrorKind::TimedOut, "Operation timed out")),
        }
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(ErrorKind::BrokenPipe, "scripted failure"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
