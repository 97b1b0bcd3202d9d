//! Shared helpers for iem-protocol integration tests

pub mod serial_mock;

pub use serial_mock::MockSerialPort;
