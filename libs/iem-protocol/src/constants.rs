//! IEM protocol constants
//!
//! Wire delimiters, command identities and declared response lengths.
//! Response lengths count the whole unstuffed frame, both delimiters included.

// ============================================================================
// Framing Constants
// ============================================================================

/// First byte of every frame
pub const START_DELIMITER: u8 = 0xF5;

/// Last byte of every frame
pub const END_DELIMITER: u8 = 0xF6;

/// Escape marker. A byte whose top nibble is 0xF travels as
/// `[ESCAPE_MARKER, low nibble]` and is rebuilt by OR-ing the two.
pub const ESCAPE_MARKER: u8 = 0xF0;

/// Extra bytes the receive loop accepts beyond the declared response length
/// before it stops reading without seeing an end delimiter.
pub const RESPONSE_SLACK: usize = 10;

// ============================================================================
// Information Selectors (request/response)
// ============================================================================

pub mod selector {
    pub const SW_VERSION: u8 = 0x01;
    pub const HW_VERSION: u8 = 0x02;
    pub const MON_VOLTAGES: u8 = 0x03;
    pub const RESET_COUNTER: u8 = 0x10;
    pub const STATUS_VECTOR: u8 = 0x12;
    pub const DIGITAL_INPUTS: u8 = 0x31;
    pub const ANALOG_INPUTS: u8 = 0x32;
    pub const PRESSURE_INPUTS: u8 = 0x33;
    pub const CUR_4_20MA_INPUTS: u8 = 0x34;
    pub const SPEED_SENSOR_INPUTS: u8 = 0x35;
    pub const NETWORK_INTERFACE_PARAMS: u8 = 0x40;
    pub const AMBIENT_LIGHT_INT: u8 = 0x60;

    // Actuation (fire-and-forget)
    pub const RESET_CMD: u8 = 0x11;
    pub const SET_SPEED_SENSOR_REF: u8 = 0x36;
    pub const SET_ADCM_LED_STATE: u8 = 0x61;
    pub const SET_ADCM_SONALERT_STATE: u8 = 0x62;
    pub const SET_ABCM_MAG_VALVE_DRIVE_STATE: u8 = 0x92;
}

// ============================================================================
// Subselectors
// ============================================================================

/// Subselector values. Several names share a value because the meaning
/// depends on the selector they accompany.
pub mod subselector {
    /// Parameterless queries and commands carry a zero in this slot
    pub const NONE: u8 = 0x00;

    pub const COMM_PROC: u8 = 0x01;
    pub const IO_PROCESSOR: u8 = 0x02;
    pub const ADCM: u8 = 0x03;
    pub const ABCM: u8 = 0x04;
    pub const ABCM_PROC_A: u8 = 0x04;
    pub const ABCM_PROC_B: u8 = 0x05;

    /// MON_VOLTAGES
    pub const IEM_CPU_BOARD: u8 = 0x01;

    /// STATUS_VECTOR
    pub const COMM_AND_IO_PROC: u8 = 0x01;

    /// ANALOG_INPUTS
    pub const ANALOG_16V: u8 = 0x01;
    pub const ANALOG_10V: u8 = 0x02;
    pub const ANALOG_80V: u8 = 0x03;
}

// ============================================================================
// Declared Response Lengths
// ============================================================================

pub const SW_VERSION_RESPONSE_LEN: usize = 22;
pub const HW_VERSION_RESPONSE_LEN: usize = 7;
pub const MON_VOLTAGES_RESPONSE_LEN: usize = 16;
pub const RESET_COUNTER_RESPONSE_LEN: usize = 8;
pub const STATUS_VECTOR_RESPONSE_LEN: usize = 7;
pub const DIGITAL_INPUTS_RESPONSE_LEN: usize = 13;
pub const ANALOG_INPUTS_RESPONSE_LEN: usize = 22;
pub const PRESSURE_INPUTS_RESPONSE_LEN: usize = 22;
pub const CUR_4_20MA_INPUTS_RESPONSE_LEN: usize = 22;
pub const SPEED_SENSOR_INPUTS_RESPONSE_LEN: usize = 8;
pub const NETWORK_INTERFACE_PARAMS_RESPONSE_LEN: usize = 18;
pub const AMBIENT_LIGHT_INT_RESPONSE_LEN: usize = 8;

// ============================================================================
// Actuation Parameter Values
// ============================================================================

/// SET_SPEED_SENSOR_REF: zero crossing at 2.5 V
pub const ZERO_CROSSING_2_5V: u8 = 0x00;
/// SET_SPEED_SENSOR_REF: zero crossing at 0 V
pub const ZERO_CROSSING_0V: u8 = 0x01;

/// SET_ADCM_LED_STATE mask bits
pub const LED_AT_12: u8 = 0x01;
pub const LED_AT_3: u8 = 0x02;
pub const LED_AT_6: u8 = 0x04;
pub const LED_AT_9: u8 = 0x08;

/// Upper bound for brightness and volume parameters
pub const MAX_LEVEL_PERCENT: u8 = 100;
