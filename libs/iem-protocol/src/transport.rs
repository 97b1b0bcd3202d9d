//! Transport session
//!
//! Owns the half-duplex channel and performs one blocking send and one
//! timeout-bounded receive per exchange. The channel is any `Read + Write`
//! whose reads return after a fixed per-call timeout with 0..N bytes; a
//! serial port opened with [`open_serial`] is the production channel.

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialport::SerialPort;
use tracing::{debug, info, warn};

use crate::constants::{END_DELIMITER, RESPONSE_SLACK};
use crate::error::{ProtocolError, Result};
use crate::frame::{self, Message};

/// Serial line parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialParams {
    pub device: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    /// "None", "Even" or "Odd"
    pub parity: String,
    /// Per-read timeout
    pub timeout_ms: u64,
}

impl Default for SerialParams {
    fn default() -> Self {
        Self {
            device: "/dev/ttyS0".to_string(),
            baud_rate: 9600,
            data_bits: 8,
            stop_bits: 1,
            parity: "None".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl SerialParams {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Open the serial channel described by `params`.
pub fn open_serial(params: &SerialParams) -> Result<Box<dyn SerialPort>> {
    debug!("Serial: {} @{}baud", params.device, params.baud_rate);

    let parity = match params.parity.as_str() {
        "Even" => serialport::Parity::Even,
        "Odd" => serialport::Parity::Odd,
        _ => serialport::Parity::None,
    };

    let data_bits = match params.data_bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        _ => serialport::DataBits::Eight,
    };

    let stop_bits = match params.stop_bits {
        2 => serialport::StopBits::Two,
        _ => serialport::StopBits::One,
    };

    let port = serialport::new(params.device.as_str(), params.baud_rate)
        .data_bits(data_bits)
        .parity(parity)
        .stop_bits(stop_bits)
        .timeout(params.timeout())
        .open()
        .map_err(|e| {
            ProtocolError::connection(format!(
                "Failed to open serial port {}: {e}",
                params.device
            ))
        })?;

    info!("Serial opened: {}", params.device);
    Ok(port)
}

/// Exclusive owner of the channel
#[derive(Debug)]
pub struct TransportSession<C> {
    channel: C,
}

impl<C: Read + Write> TransportSession<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Checksum `fields`, frame them and write the frame.
    pub fn send(&mut self, fields: &[u8]) -> Result<()> {
        let message = Message::new(fields);
        let bytes = message.encode();

        self.channel.write_all(&bytes).map_err(|e| {
            warn!("TX: {}", e);
            ProtocolError::transport_write(format!("Serial send error: {e}"))
        })?;
        self.channel.flush().map_err(|e| {
            warn!("TX flush: {}", e);
            ProtocolError::transport_write(format!("Serial flush error: {e}"))
        })?;

        debug!(
            "TX: {} (crc={:04X})",
            hex::encode_upper(&bytes),
            message.crc()
        );
        Ok(())
    }

    /// Read one response and return its unstuffed bytes.
    ///
    /// Reading stops only when the last byte read is the end delimiter or
    /// when `expected_len + RESPONSE_SLACK` bytes have accumulated. Empty reads
    /// after data has started are skipped. Only an empty first read is an
    /// error; comparing the result against `expected_len` is the caller's job.
    pub fn receive(&mut self, expected_len: usize) -> Result<Vec<u8>> {
        let cap = expected_len + RESPONSE_SLACK;
        let mut buf = vec![0u8; cap];

        let mut count = self.read_chunk(&mut buf)?;
        if count == 0 {
            debug!("RX: no response");
            return Err(ProtocolError::TransportTimeout);
        }

        while buf[count - 1] != END_DELIMITER && count < cap {
            let n = self.read_chunk(&mut buf[count..])?;
            if n == 0 {
                debug!("RX: waiting after {}B", count);
            }
            count += n;
        }

        debug!("RX: {}", hex::encode_upper(&buf[..count]));

        let len = frame::decode(&mut buf[..count]);
        buf.truncate(len);
        Ok(buf)
    }

    /// One channel read; a timeout counts as zero bytes
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.channel.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(0)
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!("RX: {}", e);
                    return Err(ProtocolError::transport_read(format!(
                        "Serial receive error: {e}"
                    )));
                },
            }
        }
    }
}
