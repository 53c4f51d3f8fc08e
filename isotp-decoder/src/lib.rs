//! CAN Capture Decoder Library
//!
//! A stateless, reusable library for turning textual CAN capture tables into
//! application-layer messages, reassembling payloads that were fragmented
//! across multiple frames with ISO-TP (ISO 15765-2).
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Parses a header-led capture table into ordered raw frames
//! - Reassembles multi-frame ISO-TP transactions per arbitration ID
//! - Passes single-frame and non-ISO-TP traffic through unchanged
//! - Derives summary statistics from the decoded output
//!
//! The library does NOT:
//! - Serve HTTP, handle CORS, or serialize API responses
//! - Transmit flow-control frames (they are consumed and discarded)
//! - Implement multiplexing schemes such as J1939
//!
//! All of that lives in the application layer (isotp-server).
//!
//! The pipeline is total over its input: malformed rows are skipped,
//! malformed framing falls back to pass-through or drop, and an empty result
//! is a valid result. No input can make it fail.
//!
//! # Example Usage
//!
//! ```
//! use isotp_decoder::{decode_capture, CaptureStats, Protocol};
//!
//! let capture = "timestamp,arbitration_id,payload_hex\n\
//!                0.0,123,100a0102030405\n\
//!                0.01,123,21060708090a\n";
//!
//! let messages = decode_capture(capture, Protocol::from_selector("isotp"));
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].byte_len(), 10);
//!
//! let stats = CaptureStats::from_messages(&messages);
//! assert_eq!(stats.unique_arbids, 1);
//! ```

// Public modules
pub mod decoder;
pub mod parser;
pub mod reassembly;
pub mod types;

// Re-export main types for convenience
pub use decoder::{decode_capture, CaptureStats};
pub use parser::parse_frames;
pub use reassembly::IsoTpReassembler;
pub use types::{LogicalMessage, Protocol, RawFrame};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
