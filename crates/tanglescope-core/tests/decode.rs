use tanglescope_core::{DecodeError, Payload, PayloadKind, decode_message, payload_kind};

const NONCE: [u8; 8] = [0x99; 8];

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn envelope(network_id: u64, parents: &[[u8; 32]], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&network_id.to_le_bytes());
    buf.push(parents.len() as u8);
    for parent in parents {
        buf.extend_from_slice(parent);
    }
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&NONCE);
    buf
}

fn index_payload(index: &[u8], data: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&2u32.to_le_bytes());
    buf.extend_from_slice(&(index.len() as u16).to_le_bytes());
    buf.extend_from_slice(index);
    buf.extend_from_slice(data);
    buf
}

fn transaction_payload() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf.push(0);
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.push(0);
    buf.extend_from_slice(&[0x42; 32]);
    buf.extend_from_slice(&7u16.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.push(0);
    buf.push(0);
    buf.extend_from_slice(&[0x43; 32]);
    buf.extend_from_slice(&5_000u64.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}

fn milestone_payload(parents: &[[u8; 32]]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&1u32.to_le_bytes());
    buf.extend_from_slice(&42u32.to_le_bytes());
    buf.extend_from_slice(&1_609_459_200u64.to_le_bytes());
    buf.push(parents.len() as u8);
    for parent in parents {
        buf.extend_from_slice(parent);
    }
    buf.extend_from_slice(&[0x55; 32]);
    buf.extend_from_slice(&4000u32.to_le_bytes());
    buf.extend_from_slice(&43u32.to_le_bytes());
    buf
}

#[test]
fn index_scenario() {
    // payload_len = 4 (tag) + 2 (index len) + 3 ("ABC") + 2 ("hi") = 11
    let buf = envelope(0x1, &[], &index_payload(b"ABC", b"hi"));
    let message = decode_message("id0", &to_hex(&buf), "meta").unwrap();

    assert_eq!(message.network_id, 1);
    assert!(message.parents.is_empty());
    match &message.payload {
        Payload::Index(index) => {
            assert_eq!(index.index, b"ABC");
            assert_eq!(index.data, b"hi");
            assert_eq!(index.index_utf8(), "ABC");
        }
        other => panic!("expected index payload, got {other:?}"),
    }
}

#[test]
fn length_mismatch_scenario() {
    let mut buf = envelope(0x1, &[], &index_payload(b"ABC", b"hi"));
    buf[9..13].copy_from_slice(&10u32.to_le_bytes());
    let err = decode_message("id1", &to_hex(&buf), "").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::PayloadLengthMismatch {
            declared: 10,
            actual: 11
        }
    ));
}

#[test]
fn transaction_scenario() {
    let buf = envelope(0x1, &[[0xaa; 32]], &transaction_payload());
    let message = decode_message("id2", &to_hex(&buf), "").unwrap();
    match &message.payload {
        Payload::Transaction(txn) => {
            assert_eq!(txn.txn_type, 0);
            assert_eq!(txn.inputs.len(), 1);
            assert_eq!(txn.inputs[0].txn_index, 7);
            assert_eq!(txn.outputs.len(), 1);
            assert_eq!(txn.outputs[0].amount, 5_000);
            assert!(txn.payload.is_empty());
        }
        other => panic!("expected transaction payload, got {other:?}"),
    }
}

#[test]
fn decoding_is_idempotent() {
    let buf = envelope(0x2, &[[0x0f; 32]], &milestone_payload(&[[0x33; 32]]));
    let hex_blob = to_hex(&buf);
    let first = decode_message("id3", &hex_blob, "").unwrap();
    let second = decode_message("id3", &hex_blob, "").unwrap();
    assert_eq!(first, second);
}

#[test]
fn tag_dispatch_is_exhaustive() {
    assert_eq!(
        payload_kind(&0u32.to_le_bytes()).unwrap(),
        PayloadKind::Transaction
    );
    assert_eq!(
        payload_kind(&1u32.to_le_bytes()).unwrap(),
        PayloadKind::Milestone
    );
    assert_eq!(payload_kind(&2u32.to_le_bytes()).unwrap(), PayloadKind::Index);

    for tag in [3u32, 4, 0xff, u32::MAX] {
        let err = payload_kind(&tag.to_le_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownPayloadType { tag: t } if t == tag));
    }
}

#[test]
fn unknown_tag_fails_the_whole_message() {
    let mut payload = index_payload(b"ABC", b"hi");
    payload[..4].copy_from_slice(&3u32.to_le_bytes());
    let buf = envelope(0x1, &[], &payload);
    let err = decode_message("id4", &to_hex(&buf), "").unwrap_err();
    assert!(matches!(err, DecodeError::UnknownPayloadType { tag: 3 }));
}

#[test]
fn every_truncated_prefix_fails() {
    let buf = envelope(
        0x1,
        &[[0xaa; 32], [0xbb; 32]],
        &index_payload(b"ABC", b"hello"),
    );
    assert!(decode_message("full", &to_hex(&buf), "").is_ok());

    for cut in 0..buf.len() {
        let result = decode_message("cut", &to_hex(&buf[..cut]), "");
        assert!(result.is_err(), "prefix of {cut} bytes decoded successfully");
    }

    // Cuts up to and including the payload-length field are plain truncation.
    for cut in 0..(8 + 1 + 64 + 4) {
        let err = decode_message("cut", &to_hex(&buf[..cut]), "").unwrap_err();
        assert!(
            matches!(err, DecodeError::Truncated { .. }),
            "unexpected error at cut {cut}: {err:?}"
        );
    }
}

#[test]
fn trailing_extra_byte_is_detected() {
    // Every byte of a valid buffer is accounted for, so one extra byte
    // shows up as a payload-region size mismatch.
    let mut buf = envelope(0x1, &[], &index_payload(b"ABC", b"hi"));
    buf.push(0x00);
    let err = decode_message("id5", &to_hex(&buf), "").unwrap_err();
    assert!(matches!(
        err,
        DecodeError::PayloadLengthMismatch {
            declared: 11,
            actual: 12
        }
    ));
}

#[test]
fn parents_count_fidelity() {
    let zero = envelope(0x1, &[], &index_payload(b"A", b""));
    let message = decode_message("p0", &to_hex(&zero), "").unwrap();
    assert!(message.parents.is_empty());

    let parents = [[0x01; 32], [0x02; 32], [0x03; 32]];
    let three = envelope(0x1, &parents, &index_payload(b"A", b""));
    assert_eq!(three.len(), zero.len() + 3 * 32);
    let message = decode_message("p3", &to_hex(&three), "").unwrap();
    assert_eq!(message.parents.len(), 3);
    assert_eq!(message.parents, parents.to_vec());
}

#[test]
fn milestone_fields_are_retained() {
    let buf = envelope(0x1, &[[0x0a; 32]], &milestone_payload(&[[0x33; 32], [0x44; 32]]));
    let message = decode_message("m", &to_hex(&buf), "").unwrap();
    match &message.payload {
        Payload::Milestone(milestone) => {
            assert_eq!(milestone.index_number, 42);
            assert_eq!(milestone.timestamp, 1_609_459_200);
            assert_eq!(milestone.milestone_parents.len(), 2);
            assert_eq!(milestone.inclusion_merkle_root, [0x55; 32]);
            assert_eq!(milestone.next_pow_score, 4000);
            assert_eq!(milestone.next_pow_score_milestone_index, 43);
        }
        other => panic!("expected milestone payload, got {other:?}"),
    }
}

#[test]
fn metadata_is_ignored_by_decoding() {
    let buf = envelope(0x1, &[], &index_payload(b"A", b""));
    let with_meta = decode_message("id", &to_hex(&buf), "anything at all").unwrap();
    let without_meta = decode_message("id", &to_hex(&buf), "").unwrap();
    assert_eq!(with_meta, without_meta);
}
