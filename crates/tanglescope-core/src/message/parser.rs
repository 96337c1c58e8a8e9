use super::error::DecodeError;
use super::layout;
use super::model::{
    IndexPayload, Message, MilestonePayload, Payload, PayloadKind, TransactionPayload, TxnOutput,
    UtxoRef,
};
use super::reader::MessageReader;

/// Decode one hex-encoded ledger message into its typed representation.
///
/// `message_id` is carried through opaquely (the hash is supplied by the
/// row source, never recomputed here) and `metadata` is ignored by decoding;
/// both exist to match the shape of a dump row. `message_hex` must be a
/// 2-character radix prefix followed by hex digits.
///
/// Decoding is pure and stateless; a failure at any field aborts the whole
/// message with a `DecodeError` and produces no partial output.
pub fn decode_message(
    message_id: &str,
    message_hex: &str,
    _metadata: &str,
) -> Result<Message, DecodeError> {
    let bytes = decode_hex_blob(message_hex)?;
    let mut reader = MessageReader::new(&bytes);

    let network_id = reader.read_u64()?;
    let parents_count = reader.read_u8()?;
    let parents = reader.read_id_list(parents_count as usize)?;

    let payload_len = reader.read_u32()?;
    let rest = reader.take_remaining();
    if rest.len() < layout::NONCE_LEN {
        return Err(DecodeError::Truncated {
            needed: layout::NONCE_LEN,
            actual: rest.len(),
        });
    }
    // The payload region is everything between the length field and the
    // trailing proof-of-work nonce, and must match the declared length.
    let region = &rest[..rest.len() - layout::NONCE_LEN];
    if region.len() != payload_len as usize {
        return Err(DecodeError::PayloadLengthMismatch {
            declared: payload_len,
            actual: region.len(),
        });
    }

    let payload = decode_payload(region)?;
    Ok(Message {
        id: message_id.to_string(),
        network_id,
        parents,
        payload,
    })
}

/// Resolve the payload kind from the 4-byte tag at the front of the region.
///
/// Peeks only; the region is not advanced for the caller.
pub fn payload_kind(region: &[u8]) -> Result<PayloadKind, DecodeError> {
    let tag = MessageReader::new(region).read_u32()?;
    match tag {
        layout::PAYLOAD_TYPE_TRANSACTION => Ok(PayloadKind::Transaction),
        layout::PAYLOAD_TYPE_MILESTONE => Ok(PayloadKind::Milestone),
        layout::PAYLOAD_TYPE_INDEX => Ok(PayloadKind::Index),
        tag => Err(DecodeError::UnknownPayloadType { tag }),
    }
}

fn decode_hex_blob(message_hex: &str) -> Result<Vec<u8>, DecodeError> {
    let digits = message_hex
        .get(layout::HEX_PREFIX_LEN..)
        .ok_or_else(|| DecodeError::MalformedHex {
            reason: "missing radix prefix".to_string(),
        })?;
    hex::decode(digits).map_err(|err| DecodeError::MalformedHex {
        reason: err.to_string(),
    })
}

fn decode_payload(region: &[u8]) -> Result<Payload, DecodeError> {
    let kind = payload_kind(region)?;
    let mut reader = MessageReader::new(region);
    reader.read_bytes(layout::PAYLOAD_TYPE_LEN)?;

    match kind {
        PayloadKind::Index => decode_index_payload(&mut reader).map(Payload::Index),
        PayloadKind::Milestone => decode_milestone_payload(&mut reader).map(Payload::Milestone),
        PayloadKind::Transaction => {
            decode_transaction_payload(&mut reader).map(Payload::Transaction)
        }
    }
}

fn decode_index_payload(reader: &mut MessageReader<'_>) -> Result<IndexPayload, DecodeError> {
    let index_len = reader.read_u16()?;
    let index = reader.read_bytes(index_len as usize)?.to_vec();
    // No trailing length field: the data runs to the end of the region.
    let data = reader.take_remaining().to_vec();
    Ok(IndexPayload { index, data })
}

fn decode_milestone_payload(
    reader: &mut MessageReader<'_>,
) -> Result<MilestonePayload, DecodeError> {
    let index_number = reader.read_u32()?;
    let timestamp = reader.read_u64()?;
    let parents_count = reader.read_u8()?;
    let milestone_parents = reader.read_id_list(parents_count as usize)?;
    let inclusion_merkle_root = reader.read_id()?;
    let next_pow_score = reader.read_u32()?;
    let next_pow_score_milestone_index = reader.read_u32()?;
    Ok(MilestonePayload {
        index_number,
        timestamp,
        milestone_parents,
        inclusion_merkle_root,
        next_pow_score,
        next_pow_score_milestone_index,
    })
}

fn decode_transaction_payload(
    reader: &mut MessageReader<'_>,
) -> Result<TransactionPayload, DecodeError> {
    // Always 0 on the current network; passed through, not rejected.
    let txn_type = reader.read_u8()?;
    let inputs_count = reader.read_u16()?;
    let inputs = read_utxo_refs(reader, inputs_count as usize)?;
    let outputs_count = reader.read_u16()?;
    let outputs = read_outputs(reader, outputs_count as usize)?;
    let payload_len = reader.read_u32()?;
    let payload = reader.read_bytes(payload_len as usize)?.to_vec();
    Ok(TransactionPayload {
        txn_type,
        inputs,
        outputs,
        payload,
    })
}

fn read_utxo_refs(
    reader: &mut MessageReader<'_>,
    count: usize,
) -> Result<Vec<UtxoRef>, DecodeError> {
    let mut refs = Vec::with_capacity(count);
    for _ in 0..count {
        let input_type = reader.read_u8()?;
        let txn_id = reader.read_id()?;
        let txn_index = reader.read_u16()?;
        refs.push(UtxoRef {
            input_type,
            txn_id,
            txn_index,
        });
    }
    Ok(refs)
}

fn read_outputs(
    reader: &mut MessageReader<'_>,
    count: usize,
) -> Result<Vec<TxnOutput>, DecodeError> {
    let mut outputs = Vec::with_capacity(count);
    for _ in 0..count {
        let output_type = reader.read_u8()?;
        let address_type = reader.read_u8()?;
        let address = reader.read_id()?;
        let amount = reader.read_u64()?;
        outputs.push(TxnOutput {
            output_type,
            address_type,
            address,
            amount,
        });
    }
    Ok(outputs)
}
