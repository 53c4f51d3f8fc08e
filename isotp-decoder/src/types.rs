//! Core types for the capture decoder library
//!
//! This module defines the records that flow through the decode pipeline:
//! raw frames produced by the frame-table parser, logical messages produced
//! by reassembly (or pass-through), and the protocol selector.

use serde::Serialize;
use std::fmt;

/// A single CAN frame as read from a capture table, before any
/// transport-protocol interpretation.
///
/// Only rows that coerce cleanly become `RawFrame` values; malformed rows
/// are skipped by the parser and never reach this type.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Capture-relative timestamp in seconds
    pub timestamp: f64,
    /// Sender identifier, opaque beyond equality comparison
    pub arbitration_id: String,
    /// Frame payload as lowercase hex (two characters per byte)
    pub payload_hex: String,
}

/// An application-layer message: either a reassembled multi-frame ISO-TP
/// transaction or a single frame passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicalMessage {
    /// Timestamp of the first physical frame of the transaction
    pub timestamp: f64,
    /// Sender identifier
    pub arbitration_id: String,
    /// Fully reassembled hex payload
    pub payload_hex: String,
}

impl LogicalMessage {
    /// Payload size in bytes (hex character pairs)
    pub fn byte_len(&self) -> usize {
        self.payload_hex.len() / 2
    }
}

impl From<RawFrame> for LogicalMessage {
    /// The pass-through mapping: a frame that carries no transport framing
    /// (or is processed with reassembly disabled) becomes a message as-is.
    fn from(frame: RawFrame) -> Self {
        Self {
            timestamp: frame.timestamp,
            arbitration_id: frame.arbitration_id,
            payload_hex: frame.payload_hex,
        }
    }
}

/// Transport protocol applied when decoding a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// No transport protocol - every frame maps 1:1 to a logical message
    #[default]
    None,
    /// ISO-TP (ISO 15765-2) multi-frame reassembly
    IsoTp,
}

impl Protocol {
    /// Map a caller-supplied selector string to a protocol.
    ///
    /// Only `"isotp"` activates reassembly; every other value (including
    /// `"none"` and selectors for unsupported protocols) means frames pass
    /// through unchanged.
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "isotp" => Protocol::IsoTp,
            _ => Protocol::None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::None => write!(f, "none"),
            Protocol::IsoTp => write!(f, "isotp"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_selector_mapping() {
        assert_eq!(Protocol::from_selector("isotp"), Protocol::IsoTp);
        assert_eq!(Protocol::from_selector("none"), Protocol::None);
        // Unsupported selectors fall back to pass-through
        assert_eq!(Protocol::from_selector("J1939"), Protocol::None);
        assert_eq!(Protocol::from_selector(""), Protocol::None);
    }

    #[test]
    fn test_byte_len() {
        let msg = LogicalMessage {
            timestamp: 0.0,
            arbitration_id: "123".to_string(),
            payload_hex: "deadbeef".to_string(),
        };
        assert_eq!(msg.byte_len(), 4);

        // Odd-length hex rounds down; empty payload is zero bytes
        let empty = LogicalMessage {
            timestamp: 0.0,
            arbitration_id: "123".to_string(),
            payload_hex: String::new(),
        };
        assert_eq!(empty.byte_len(), 0);
    }

    #[test]
    fn test_pass_through_mapping_preserves_fields() {
        let frame = RawFrame {
            timestamp: 1.25,
            arbitration_id: "7e0".to_string(),
            payload_hex: "0102".to_string(),
        };
        let msg = LogicalMessage::from(frame.clone());
        assert_eq!(msg.timestamp, frame.timestamp);
        assert_eq!(msg.arbitration_id, frame.arbitration_id);
        assert_eq!(msg.payload_hex, frame.payload_hex);
    }
}
