//! Protocol client
//!
//! Public face of the engine: `query` for request/response exchanges and
//! `command` for fire-and-forget actuation. Requests are validated against
//! the catalog before any byte is written. Nothing is retried.

use std::io::{Read, Write};

use serialport::SerialPort;
use tracing::{debug, warn};

use crate::catalog::{self, Descriptor};
use crate::constants::{selector, subselector};
use crate::error::{ProtocolError, Result};
use crate::transport::{self, SerialParams, TransportSession};

/// Speed sensor zero-crossing reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSensorReference {
    /// Crossing at 2.5 V
    Volts2_5,
    /// Crossing at 0 V
    Volts0,
}

impl SpeedSensorReference {
    pub fn wire_value(self) -> u8 {
        match self {
            SpeedSensorReference::Volts2_5 => crate::constants::ZERO_CROSSING_2_5V,
            SpeedSensorReference::Volts0 => crate::constants::ZERO_CROSSING_0V,
        }
    }
}

/// Master side of the IEM protocol
#[derive(Debug)]
pub struct ProtocolClient<C> {
    session: TransportSession<C>,
}

impl ProtocolClient<Box<dyn SerialPort>> {
    /// Open the serial port described by `params` and wrap it.
    pub fn open(params: &SerialParams) -> Result<Self> {
        let port = transport::open_serial(params)?;
        Ok(Self::new(port))
    }
}

impl<C: Read + Write> ProtocolClient<C> {
    pub fn new(channel: C) -> Self {
        Self::from_session(TransportSession::new(channel))
    }

    pub fn from_session(session: TransportSession<C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &TransportSession<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TransportSession<C> {
        &mut self.session
    }

    pub fn into_inner(self) -> C {
        self.session.into_inner()
    }

    /// Run one request/response exchange.
    ///
    /// Returns the unstuffed response, whose length is exactly the catalog's
    /// declared length for this identity.
    pub fn query(&mut self, selector: u8, subselector: u8) -> Result<Vec<u8>> {
        let descriptor = catalog::lookup(selector, subselector)?;
        let expected = query_len(descriptor)?;

        debug!("Query {}", descriptor.name);
        self.session.send(&descriptor.query_fields())?;
        let response = self.session.receive(expected)?;

        if response.len() != expected {
            warn!(
                "{}: expected {}B, got {}B",
                descriptor.name,
                expected,
                response.len()
            );
            return Err(ProtocolError::LengthMismatch {
                expected,
                actual: response.len(),
                received: response,
            });
        }

        Ok(response)
    }

    /// Send one actuation command. Success means the frame was written.
    pub fn command(&mut self, selector: u8, subselector: u8, params: &[u8]) -> Result<()> {
        let descriptor = catalog::lookup(selector, subselector)?;
        let fields = descriptor.actuation_fields(params)?;

        debug!("Command {} {:02X?}", descriptor.name, params);
        self.session.send(&fields)
    }

    /// Clear the reset counter of `component` (COMM_PROC, ADCM or ABCM)
    pub fn reset_counter(&mut self, component: u8) -> Result<()> {
        self.command(selector::RESET_CMD, component, &[])
    }

    pub fn set_speed_sensor_reference(&mut self, reference: SpeedSensorReference) -> Result<()> {
        self.command(
            selector::SET_SPEED_SENSOR_REF,
            subselector::NONE,
            &[reference.wire_value()],
        )
    }

    /// `led_mask` is any combination of the `LED_AT_*` bits
    pub fn set_adcm_led_state(&mut self, led_mask: u8, brightness: u8) -> Result<()> {
        self.command(
            selector::SET_ADCM_LED_STATE,
            subselector::NONE,
            &[led_mask, brightness],
        )
    }

    pub fn set_adcm_sonalert_state(&mut self, enable: bool, volume: u8) -> Result<()> {
        self.command(
            selector::SET_ADCM_SONALERT_STATE,
            subselector::NONE,
            &[u8::from(enable), volume],
        )
    }

    /// `processor` is ABCM_PROC_A or ABCM_PROC_B
    pub fn set_abcm_mag_valve_drive_state(&mut self, processor: u8, enable: bool) -> Result<()> {
        self.command(
            selector::SET_ABCM_MAG_VALVE_DRIVE_STATE,
            processor,
            &[u8::from(enable)],
        )
    }
}

fn query_len(descriptor: &Descriptor) -> Result<usize> {
    descriptor
        .response_len()
        .ok_or(ProtocolError::WrongShape {
            selector: descriptor.selector,
            subselector: descriptor.subselector,
            expected: "query",
        })
}
