//! Frame-table parser
//!
//! Converts a textual capture table into an ordered sequence of [`RawFrame`]
//! records. The table is header-led CSV with at least the columns
//! `timestamp`, `arbitration_id` and `payload_hex`; column order is
//! irrelevant and extra columns are ignored. Malformed rows are skipped,
//! never surfaced as errors - an empty result is a valid result.

use crate::types::RawFrame;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Positions of the required columns within the header row
struct ColumnIndex {
    timestamp: usize,
    arbitration_id: usize,
    payload_hex: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Some(Self {
            timestamp: find("timestamp")?,
            arbitration_id: find("arbitration_id")?,
            payload_hex: find("payload_hex")?,
        })
    }
}

/// Parse a capture table into frames, preserving input row order.
///
/// Rows with a non-numeric timestamp or a missing required cell are dropped
/// silently (logged at debug level). If the header itself lacks a required
/// column, no row can coerce and the result is empty.
pub fn parse_frames(content: &str) -> Vec<RawFrame> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            log::debug!("Capture has no readable header row: {}", e);
            return Vec::new();
        }
    };

    let columns = match ColumnIndex::from_headers(&headers) {
        Some(columns) => columns,
        None => {
            log::warn!(
                "Capture header is missing a required column \
                 (need timestamp, arbitration_id, payload_hex): {:?}",
                headers
            );
            return Vec::new();
        }
    };

    let mut frames = Vec::new();
    let mut skipped = 0usize;

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {}", row, e);
                skipped += 1;
                continue;
            }
        };

        match coerce_row(&columns, &record) {
            Some(frame) => frames.push(frame),
            None => {
                log::debug!("Skipping malformed row {}: {:?}", row, record);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::debug!(
            "Parsed {} frames, skipped {} malformed rows",
            frames.len(),
            skipped
        );
    }

    frames
}

/// Coerce one data row into a frame. `None` means skip.
///
/// The timestamp must parse as a 64-bit float and both string cells must be
/// present. Payload hex is normalized to lowercase so downstream equality
/// and concatenation are case-stable.
fn coerce_row(columns: &ColumnIndex, record: &StringRecord) -> Option<RawFrame> {
    let timestamp = record.get(columns.timestamp)?.parse::<f64>().ok()?;
    let arbitration_id = record.get(columns.arbitration_id)?.to_string();
    let payload_hex = record.get(columns.payload_hex)?.to_lowercase();

    Some(RawFrame {
        timestamp,
        arbitration_id,
        payload_hex,
    })
}
