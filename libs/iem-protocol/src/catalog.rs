//! Command catalog
//!
//! Static table of every legal (selector, subselector) identity. Each entry
//! says whether the identity is a query with a fixed response length or an
//! actuation with validated parameters. Anything absent from the table is
//! rejected; there is no default descriptor.

use crate::constants::{selector as sel, subselector as sub, *};
use crate::error::{ProtocolError, Result};

/// Constraint on one actuation parameter byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRule {
    /// Inclusive range
    Range { name: &'static str, min: u8, max: u8 },
    /// One of a fixed set of values
    OneOf {
        name: &'static str,
        values: &'static [u8],
    },
    /// Only bits inside `allowed` may be set
    Mask { name: &'static str, allowed: u8 },
}

impl ParamRule {
    pub fn name(&self) -> &'static str {
        match self {
            ParamRule::Range { name, .. }
            | ParamRule::OneOf { name, .. }
            | ParamRule::Mask { name, .. } => name,
        }
    }

    /// Check `value` against this rule
    pub fn check(&self, value: u8) -> Result<()> {
        match *self {
            ParamRule::Range { name, min, max } => {
                if value < min || value > max {
                    return Err(ProtocolError::invalid_parameter(
                        name,
                        format!("{value} outside {min}..={max}"),
                    ));
                }
            },
            ParamRule::OneOf { name, values } => {
                if !values.contains(&value) {
                    return Err(ProtocolError::invalid_parameter(
                        name,
                        format!("{value} not one of {values:?}"),
                    ));
                }
            },
            ParamRule::Mask { name, allowed } => {
                if value & !allowed != 0 {
                    return Err(ProtocolError::invalid_parameter(
                        name,
                        format!("0x{value:02X} sets bits outside 0x{allowed:02X}"),
                    ));
                }
            },
        }
        Ok(())
    }
}

/// Request/response shape of one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Request/response; `response_len` is the exact unstuffed length
    Query { response_len: usize },
    /// Fire-and-forget; parameter bytes follow the subselector in order
    Actuation { params: &'static [ParamRule] },
}

/// Static metadata for one command identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    pub selector: u8,
    pub subselector: u8,
    pub kind: CommandKind,
}

impl Descriptor {
    const fn query(name: &'static str, selector: u8, subselector: u8, len: usize) -> Self {
        Self {
            name,
            selector,
            subselector,
            kind: CommandKind::Query { response_len: len },
        }
    }

    const fn actuation(
        name: &'static str,
        selector: u8,
        subselector: u8,
        params: &'static [ParamRule],
    ) -> Self {
        Self {
            name,
            selector,
            subselector,
            kind: CommandKind::Actuation { params },
        }
    }

    /// Declared response length, `None` for actuations
    pub fn response_len(&self) -> Option<usize> {
        match self.kind {
            CommandKind::Query { response_len } => Some(response_len),
            CommandKind::Actuation { .. } => None,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self.kind, CommandKind::Query { .. })
    }

    /// Request fields for a query: selector then subselector
    pub fn query_fields(&self) -> Vec<u8> {
        vec![self.selector, self.subselector]
    }

    /// Validate `params` and build the request fields for an actuation.
    pub fn actuation_fields(&self, params: &[u8]) -> Result<Vec<u8>> {
        let rules = match self.kind {
            CommandKind::Actuation { params } => params,
            CommandKind::Query { .. } => {
                return Err(ProtocolError::WrongShape {
                    selector: self.selector,
                    subselector: self.subselector,
                    expected: "command",
                })
            },
        };

        if params.len() != rules.len() {
            return Err(ProtocolError::invalid_parameter(
                "params",
                format!(
                    "{} expects {} parameter(s), got {}",
                    self.name,
                    rules.len(),
                    params.len()
                ),
            ));
        }

        for (rule, &value) in rules.iter().zip(params) {
            rule.check(value)?;
        }

        let mut fields = Vec::with_capacity(2 + params.len());
        fields.push(self.selector);
        fields.push(self.subselector);
        fields.extend_from_slice(params);
        Ok(fields)
    }
}

const ENABLE: ParamRule = ParamRule::OneOf {
    name: "enable",
    values: &[0, 1],
};

const SPEED_SENSOR_REF_PARAMS: &[ParamRule] = &[ParamRule::OneOf {
    name: "reference",
    values: &[ZERO_CROSSING_2_5V, ZERO_CROSSING_0V],
}];

const LED_STATE_PARAMS: &[ParamRule] = &[
    ParamRule::Mask {
        name: "led_mask",
        allowed: LED_AT_12 | LED_AT_3 | LED_AT_6 | LED_AT_9,
    },
    ParamRule::Range {
        name: "brightness",
        min: 0,
        max: MAX_LEVEL_PERCENT,
    },
];

const SONALERT_PARAMS: &[ParamRule] = &[
    ENABLE,
    ParamRule::Range {
        name: "volume",
        min: 0,
        max: MAX_LEVEL_PERCENT,
    },
];

const MAG_VALVE_PARAMS: &[ParamRule] = &[ENABLE];

/// Every legal command identity
#[rustfmt::skip]
pub static CATALOG: &[Descriptor] = &[
    // Software versions
    Descriptor::query("sw_version.comm_proc", sel::SW_VERSION, sub::COMM_PROC, SW_VERSION_RESPONSE_LEN),
    Descriptor::query("sw_version.io_processor", sel::SW_VERSION, sub::IO_PROCESSOR, SW_VERSION_RESPONSE_LEN),
    Descriptor::query("sw_version.adcm", sel::SW_VERSION, sub::ADCM, SW_VERSION_RESPONSE_LEN),
    Descriptor::query("sw_version.abcm_proc_a", sel::SW_VERSION, sub::ABCM_PROC_A, SW_VERSION_RESPONSE_LEN),
    Descriptor::query("sw_version.abcm_proc_b", sel::SW_VERSION, sub::ABCM_PROC_B, SW_VERSION_RESPONSE_LEN),
    // Hardware versions
    Descriptor::query("hw_version.comm_proc", sel::HW_VERSION, sub::COMM_PROC, HW_VERSION_RESPONSE_LEN),
    Descriptor::query("hw_version.io_processor", sel::HW_VERSION, sub::IO_PROCESSOR, HW_VERSION_RESPONSE_LEN),
    Descriptor::query("hw_version.adcm", sel::HW_VERSION, sub::ADCM, HW_VERSION_RESPONSE_LEN),
    Descriptor::query("hw_version.abcm", sel::HW_VERSION, sub::ABCM, HW_VERSION_RESPONSE_LEN),
    // Monitored voltages
    Descriptor::query("mon_voltages.iem_cpu_board", sel::MON_VOLTAGES, sub::IEM_CPU_BOARD, MON_VOLTAGES_RESPONSE_LEN),
    Descriptor::query("mon_voltages.adcm", sel::MON_VOLTAGES, sub::ADCM, MON_VOLTAGES_RESPONSE_LEN),
    Descriptor::query("mon_voltages.abcm", sel::MON_VOLTAGES, sub::ABCM, MON_VOLTAGES_RESPONSE_LEN),
    // Reset counters
    Descriptor::query("reset_counter.comm_proc", sel::RESET_COUNTER, sub::COMM_PROC, RESET_COUNTER_RESPONSE_LEN),
    Descriptor::query("reset_counter.adcm", sel::RESET_COUNTER, sub::ADCM, RESET_COUNTER_RESPONSE_LEN),
    Descriptor::query("reset_counter.abcm", sel::RESET_COUNTER, sub::ABCM, RESET_COUNTER_RESPONSE_LEN),
    // Status vectors
    Descriptor::query("status_vector.comm_and_io_proc", sel::STATUS_VECTOR, sub::COMM_AND_IO_PROC, STATUS_VECTOR_RESPONSE_LEN),
    Descriptor::query("status_vector.adcm", sel::STATUS_VECTOR, sub::ADCM, STATUS_VECTOR_RESPONSE_LEN),
    Descriptor::query("status_vector.abcm", sel::STATUS_VECTOR, sub::ABCM, STATUS_VECTOR_RESPONSE_LEN),
    // Inputs
    Descriptor::query("digital_inputs", sel::DIGITAL_INPUTS, sub::NONE, DIGITAL_INPUTS_RESPONSE_LEN),
    Descriptor::query("analog_inputs.16v", sel::ANALOG_INPUTS, sub::ANALOG_16V, ANALOG_INPUTS_RESPONSE_LEN),
    Descriptor::query("analog_inputs.10v", sel::ANALOG_INPUTS, sub::ANALOG_10V, ANALOG_INPUTS_RESPONSE_LEN),
    Descriptor::query("analog_inputs.80v", sel::ANALOG_INPUTS, sub::ANALOG_80V, ANALOG_INPUTS_RESPONSE_LEN),
    Descriptor::query("pressure_inputs", sel::PRESSURE_INPUTS, sub::NONE, PRESSURE_INPUTS_RESPONSE_LEN),
    Descriptor::query("cur_4_20ma_inputs", sel::CUR_4_20MA_INPUTS, sub::NONE, CUR_4_20MA_INPUTS_RESPONSE_LEN),
    Descriptor::query("speed_sensor_inputs", sel::SPEED_SENSOR_INPUTS, sub::NONE, SPEED_SENSOR_INPUTS_RESPONSE_LEN),
    Descriptor::query("network_interface_params", sel::NETWORK_INTERFACE_PARAMS, sub::NONE, NETWORK_INTERFACE_PARAMS_RESPONSE_LEN),
    Descriptor::query("ambient_light_int", sel::AMBIENT_LIGHT_INT, sub::NONE, AMBIENT_LIGHT_INT_RESPONSE_LEN),
    // Actuation
    Descriptor::actuation("reset_cmd.comm_proc", sel::RESET_CMD, sub::COMM_PROC, &[]),
    Descriptor::actuation("reset_cmd.adcm", sel::RESET_CMD, sub::ADCM, &[]),
    Descriptor::actuation("reset_cmd.abcm", sel::RESET_CMD, sub::ABCM, &[]),
    Descriptor::actuation("set_speed_sensor_ref", sel::SET_SPEED_SENSOR_REF, sub::NONE, SPEED_SENSOR_REF_PARAMS),
    Descriptor::actuation("set_adcm_led_state", sel::SET_ADCM_LED_STATE, sub::NONE, LED_STATE_PARAMS),
    Descriptor::actuation("set_adcm_sonalert_state", sel::SET_ADCM_SONALERT_STATE, sub::NONE, SONALERT_PARAMS),
    Descriptor::actuation("set_abcm_mag_valve_drive_state.proc_a", sel::SET_ABCM_MAG_VALVE_DRIVE_STATE, sub::ABCM_PROC_A, MAG_VALVE_PARAMS),
    Descriptor::actuation("set_abcm_mag_valve_drive_state.proc_b", sel::SET_ABCM_MAG_VALVE_DRIVE_STATE, sub::ABCM_PROC_B, MAG_VALVE_PARAMS),
];

/// Find the descriptor for (selector, subselector).
///
/// Fails with `UnknownSelector` when no entry uses the selector at all and
/// with `UnknownSubselector` when the selector exists but not this pair.
pub fn lookup(selector: u8, subselector: u8) -> Result<&'static Descriptor> {
    let mut selector_known = false;
    for descriptor in CATALOG {
        if descriptor.selector != selector {
            continue;
        }
        if descriptor.subselector == subselector {
            return Ok(descriptor);
        }
        selector_known = true;
    }

    if selector_known {
        Err(ProtocolError::UnknownSubselector {
            selector,
            subselector,
        })
    } else {
        Err(ProtocolError::UnknownSelector(selector))
    }
}

/// All descriptors sharing `selector`
pub fn for_selector(selector: u8) -> impl Iterator<Item = &'static Descriptor> {
    CATALOG.iter().filter(move |d| d.selector == selector)
}
