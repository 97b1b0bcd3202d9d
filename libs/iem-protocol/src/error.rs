//! Protocol Error Types
//!
//! Every failure of a single exchange is returned to the caller tagged with
//! its category. Nothing here is recovered or retried locally.

use thiserror::Error;

/// Result type for iem-protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Exchange errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No catalog entry uses this selector
    #[error("Unknown selector: 0x{0:02X}")]
    UnknownSelector(u8),

    /// Selector exists but the subselector is not legal for it
    #[error("Unknown subselector 0x{subselector:02X} for selector 0x{selector:02X}")]
    UnknownSubselector { selector: u8, subselector: u8 },

    /// Actuation parameter missing, surplus or out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A query identity was used as a command or the other way round
    #[error("Selector 0x{selector:02X}/0x{subselector:02X} is not a {expected}")]
    WrongShape {
        selector: u8,
        subselector: u8,
        expected: &'static str,
    },

    /// Writing the request frame failed
    #[error("Transport write failure: {0}")]
    TransportWrite(String),

    /// Reading from the channel failed with something other than a timeout
    #[error("Transport read failure: {0}")]
    TransportRead(String),

    /// The first read of an exchange returned nothing
    #[error("No response")]
    TransportTimeout,

    /// Unstuffed response length differs from the catalog's declaration
    #[error("Response length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        received: Vec<u8>,
    },

    /// Serial channel could not be opened
    #[error("Connection error: {0}")]
    Connection(String),
}

// Helper methods for creating errors
impl ProtocolError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ProtocolError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn transport_write(msg: impl Into<String>) -> Self {
        ProtocolError::TransportWrite(msg.into())
    }

    pub fn transport_read(msg: impl Into<String>) -> Self {
        ProtocolError::TransportRead(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        ProtocolError::Connection(msg.into())
    }

    /// True when the failure came from the channel rather than from request
    /// validation or response checking.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ProtocolError::TransportWrite(_)
                | ProtocolError::TransportRead(_)
                | ProtocolError::TransportTimeout
                | ProtocolError::Connection(_)
        )
    }

    /// True when the request was rejected before any byte was written.
    pub fn is_rejected_request(&self) -> bool {
        matches!(
            self,
            ProtocolError::UnknownSelector(_)
                | ProtocolError::UnknownSubselector { .. }
                | ProtocolError::InvalidParameter { .. }
                | ProtocolError::WrongShape { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_hex_identities() {
        assert_eq!(
            ProtocolError::UnknownSelector(0x7A).to_string(),
            "Unknown selector: 0x7A"
        );
        assert_eq!(
            ProtocolError::UnknownSubselector {
                selector: 0x02,
                subselector: 0x09
            }
            .to_string(),
            "Unknown subselector 0x09 for selector 0x02"
        );
        assert_eq!(ProtocolError::TransportTimeout.to_string(), "No response");
    }

    #[test]
    fn test_length_mismatch_display_omits_payload() {
        let err = ProtocolError::LengthMismatch {
            expected: 7,
            actual: 5,
            received: vec![0xF5, 0x02, 0x01, 0x00, 0xF6],
        };
        assert_eq!(
            err.to_string(),
            "Response length mismatch: expected 7, got 5"
        );
    }

    #[test]
    fn test_classification() {
        assert!(ProtocolError::TransportTimeout.is_transport());
        assert!(ProtocolError::transport_write("broken pipe").is_transport());
        assert!(!ProtocolError::TransportTimeout.is_rejected_request());

        let invalid = ProtocolError::invalid_parameter("volume", "150 outside 0..=100");
        assert!(invalid.is_rejected_request());
        assert!(!invalid.is_transport());

        let mismatch = ProtocolError::LengthMismatch {
            expected: 8,
            actual: 9,
            received: Vec::new(),
        };
        assert!(!mismatch.is_transport());
        assert!(!mismatch.is_rejected_request());
    }
}
