//! ISO-TP (ISO 15765-2) message reassembly
//!
//! Reconstructs multi-frame transport messages from individual CAN frames.
//! Each distinct arbitration ID carries at most one in-flight transaction;
//! the pending set lives on the reassembler instance, so every capture gets
//! its own isolated state.
//!
//! The state machine never fails: every frame has a defined outcome
//! (pass-through, accumulate, drop or discard), and a capture that ends with
//! an unfinished transaction simply never emits it.

use crate::types::{LogicalMessage, RawFrame};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// ISO-TP frame type, taken from the high nibble of the PCI byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameType {
    /// 0x0 - complete message in a single frame
    Single,
    /// 0x1 - starts a multi-frame transaction, declares total length
    First,
    /// 0x2 - continuation data for a pending transaction
    Consecutive,
    /// 0x3 - receiver flow control, carries no application data
    FlowControl,
    /// 0x4-0xF - not ISO-TP framing, treated as an opaque message
    Unrecognized,
}

impl FrameType {
    fn from_pci(pci: u8) -> Self {
        match pci >> 4 {
            0x0 => FrameType::Single,
            0x1 => FrameType::First,
            0x2 => FrameType::Consecutive,
            0x3 => FrameType::FlowControl,
            _ => FrameType::Unrecognized,
        }
    }
}

/// An in-flight multi-frame transaction for one arbitration ID
#[derive(Debug)]
struct PendingTransaction {
    /// Timestamp of the initiating First Frame
    timestamp: f64,
    /// Accumulated payload hex, grows with each Consecutive Frame
    data_hex: String,
    /// Total byte length declared by the First Frame
    expected_length: usize,
    /// Count of Consecutive Frames folded in (informational only - not
    /// used for gap detection)
    sequence: u32,
}

impl PendingTransaction {
    /// Accumulated payload size in bytes
    fn accumulated_len(&self) -> usize {
        self.data_hex.len() / 2
    }
}

/// Reassembles ISO-TP transactions from an ordered frame sequence.
///
/// A reassembler is single-use: [`reassemble`](Self::reassemble) consumes it,
/// which guarantees that no pending state leaks between captures. Callers
/// handling concurrent requests construct one instance per request.
#[derive(Debug, Default)]
pub struct IsoTpReassembler {
    /// In-flight transactions, keyed by arbitration ID
    pending: HashMap<String, PendingTransaction>,
}

impl IsoTpReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the frame sequence once, in order, and emit logical messages.
    ///
    /// Output order is the scan order of the frame that triggered each
    /// emission: Single Frames and pass-throughs emit at their own position,
    /// multi-frame transactions emit at the position of the Consecutive
    /// Frame that completed them. Transactions still pending when input ends
    /// are dropped silently.
    pub fn reassemble(mut self, frames: Vec<RawFrame>) -> Vec<LogicalMessage> {
        let mut messages = Vec::new();

        for frame in frames {
            self.process_frame(frame, &mut messages);
        }

        for (arbitration_id, transaction) in &self.pending {
            log::debug!(
                "Dropping incomplete transaction for {} ({}/{} bytes received)",
                arbitration_id,
                transaction.accumulated_len(),
                transaction.expected_length
            );
        }

        messages
    }

    /// Advance the state machine by one frame, appending any emitted
    /// message(s) to `messages`.
    fn process_frame(&mut self, frame: RawFrame, messages: &mut Vec<LogicalMessage>) {
        // A payload with no usable first byte cannot carry framing
        // information; pass it through untouched.
        let pci = match frame
            .payload_hex
            .get(0..2)
            .and_then(|byte| u8::from_str_radix(byte, 16).ok())
        {
            Some(pci) => pci,
            None => {
                messages.push(LogicalMessage::from(frame));
                return;
            }
        };

        match FrameType::from_pci(pci) {
            // The low nibble (conventionally a length) is neither validated
            // nor stripped; the frame is already a complete message.
            FrameType::Single | FrameType::Unrecognized => {
                messages.push(LogicalMessage::from(frame));
            }
            FrameType::First => self.start_transaction(pci, frame, messages),
            FrameType::Consecutive => self.continue_transaction(frame, messages),
            FrameType::FlowControl => {
                log::trace!(
                    "Discarding flow control frame from {} at {}",
                    frame.arbitration_id,
                    frame.timestamp
                );
            }
        }
    }

    /// Handle a First Frame: open a new transaction for this arbitration ID.
    ///
    /// The declared total length is 12 bits: the PCI low nibble holds the
    /// high 4 bits, the next payload byte holds the low 8. A frame too short
    /// to carry that second byte cannot open a transaction and passes
    /// through as an opaque message.
    fn start_transaction(
        &mut self,
        pci: u8,
        frame: RawFrame,
        messages: &mut Vec<LogicalMessage>,
    ) {
        let length_byte = match frame
            .payload_hex
            .get(2..4)
            .and_then(|byte| u8::from_str_radix(byte, 16).ok())
        {
            Some(byte) => byte,
            None => {
                log::debug!(
                    "First Frame from {} too short to declare a length, passing through",
                    frame.arbitration_id
                );
                messages.push(LogicalMessage::from(frame));
                return;
            }
        };

        let expected_length = (((pci & 0x0F) as usize) << 8) | length_byte as usize;
        let data_hex = frame.payload_hex.get(4..).unwrap_or("").to_string();

        let replaced = self.pending.insert(
            frame.arbitration_id.clone(),
            PendingTransaction {
                timestamp: frame.timestamp,
                data_hex,
                expected_length,
                sequence: 0,
            },
        );

        // An unfinished transaction for the same sender is abandoned without
        // surfacing an error; it may indicate a capture gap.
        if let Some(abandoned) = replaced {
            log::debug!(
                "New First Frame from {} abandons unfinished transaction \
                 ({}/{} bytes received)",
                frame.arbitration_id,
                abandoned.accumulated_len(),
                abandoned.expected_length
            );
        }

        // A transaction completes the instant its accumulated length reaches
        // the declared length, which can already be true at the First Frame.
        self.complete_if_satisfied(frame.arbitration_id, messages);
    }

    /// Handle a Consecutive Frame: append its data to the pending
    /// transaction for this arbitration ID, emitting the transaction once
    /// the accumulated length reaches the declared length.
    ///
    /// The PCI low nibble is a rolling sequence counter but is not used for
    /// gap detection - any Consecutive Frame for a pending ID is accepted. A
    /// Consecutive Frame with no pending transaction is dropped.
    fn continue_transaction(&mut self, frame: RawFrame, messages: &mut Vec<LogicalMessage>) {
        let Some(transaction) = self.pending.get_mut(&frame.arbitration_id) else {
            log::debug!(
                "Dropping orphan Consecutive Frame from {} at {}",
                frame.arbitration_id,
                frame.timestamp
            );
            return;
        };

        transaction
            .data_hex
            .push_str(frame.payload_hex.get(2..).unwrap_or(""));
        transaction.sequence += 1;

        self.complete_if_satisfied(frame.arbitration_id, messages);
    }

    /// Emit and remove the pending transaction for `arbitration_id` if its
    /// accumulated length has reached the declared length.
    ///
    /// The check is >=, not ==: an overshooting transaction is emitted with
    /// its trailing bytes intact, never trimmed to the declared length.
    fn complete_if_satisfied(&mut self, arbitration_id: String, messages: &mut Vec<LogicalMessage>) {
        if let Entry::Occupied(entry) = self.pending.entry(arbitration_id) {
            let transaction = entry.get();
            if transaction.accumulated_len() >= transaction.expected_length {
                let (arbitration_id, transaction) = entry.remove_entry();
                messages.push(LogicalMessage {
                    timestamp: transaction.timestamp,
                    arbitration_id,
                    payload_hex: transaction.data_hex,
                });
            }
        }
    }
}
