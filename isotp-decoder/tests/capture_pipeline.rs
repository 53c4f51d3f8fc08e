//! End-to-end tests for the parse-then-reassemble pipeline

use isotp_decoder::{decode_capture, CaptureStats, Protocol};

#[test]
fn diagnostic_capture_reassembles_to_one_message() {
    // First Frame declares 8 bytes, Consecutive Frame completes them
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,10086465616462656566\n\
                   0.01,123,21666667\n";

    let messages = decode_capture(capture, Protocol::from_selector("isotp"));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].byte_len(), 8);
    assert_eq!(messages[0].timestamp, 0.0);
    assert_eq!(messages[0].arbitration_id, "123");
}

#[test]
fn malformed_rows_do_not_disturb_surviving_traffic() {
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,100a0102030405\n\
                   garbage,123,21ffffffffff\n\
                   0.01,123,21060708090a\n";

    let messages = decode_capture(capture, Protocol::IsoTp);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].payload_hex, "0102030405060708090a");
}

#[test]
fn mixed_capture_preserves_trigger_order() {
    // Single frames, a flow control frame, an orphan consecutive frame and
    // one complete transaction, interleaved across three senders.
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.00,200,02abcd\n\
                   0.01,123,100a0102030405\n\
                   0.02,7e8,3000\n\
                   0.03,999,21deadbeef\n\
                   0.04,200,051122334455\n\
                   0.05,123,21060708090a\n";

    let messages = decode_capture(capture, Protocol::IsoTp);
    assert_eq!(messages.len(), 3);

    // Pass-throughs at their own positions, the reassembled transaction at
    // the position of its completing frame
    assert_eq!(messages[0].arbitration_id, "200");
    assert_eq!(messages[0].payload_hex, "02abcd");
    assert_eq!(messages[1].arbitration_id, "200");
    assert_eq!(messages[1].payload_hex, "051122334455");
    assert_eq!(messages[2].arbitration_id, "123");
    assert_eq!(messages[2].payload_hex, "0102030405060708090a");
    assert_eq!(messages[2].timestamp, 0.01);

    let stats = CaptureStats::from_messages(&messages);
    assert_eq!(stats.total_messages, 3);
    assert_eq!(stats.unique_arbids, 2);
}

#[test]
fn uppercase_capture_hex_is_accepted() {
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,100A0102030405\n\
                   0.01,123,21060708090A\n";

    let messages = decode_capture(capture, Protocol::IsoTp);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].payload_hex, "0102030405060708090a");
}

#[test]
fn single_frame_only_capture_is_idempotent() {
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,0201aa\n\
                   0.1,456,03bbccdd\n";

    let reassembled = decode_capture(capture, Protocol::IsoTp);
    let passed_through = decode_capture(capture, Protocol::None);
    assert_eq!(reassembled, passed_through);
}

#[test]
fn incomplete_transaction_yields_empty_output() {
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,1014010203040506\n\
                   0.1,123,210708090a0b\n";

    let messages = decode_capture(capture, Protocol::IsoTp);
    assert!(messages.is_empty());
}

#[test]
fn unknown_protocol_selector_passes_frames_through() {
    let capture = "timestamp,arbitration_id,payload_hex\n\
                   0.0,123,100a0102030405\n\
                   0.1,123,21060708090a\n";

    let messages = decode_capture(capture, Protocol::from_selector("J1939"));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].payload_hex, "100a0102030405");
}
