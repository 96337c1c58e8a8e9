use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::layout;

/// 32-byte identifier of another message, transaction, or address.
pub type ParentId = [u8; layout::ID_LEN];

fn ser_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes.as_ref()))
}

fn ser_hex_list<S>(ids: &[ParentId], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(ids.iter().map(hex::encode))
}

/// One vertex of the tangle: envelope fields plus the type-tagged payload.
///
/// The message id is the hash of the serialized message as supplied by the
/// row source; it is carried through opaquely, never recomputed. The
/// trailing proof-of-work nonce is skipped during decoding and not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub network_id: u64,
    /// Ids of the messages this one directly approves, in wire order.
    #[serde(serialize_with = "ser_hex_list")]
    pub parents: Vec<ParentId>,
    pub payload: Payload,
}

/// The three known payload kinds, one variant per wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Transaction,
    Milestone,
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    Transaction(TransactionPayload),
    Milestone(MilestonePayload),
    Index(IndexPayload),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Transaction(_) => PayloadKind::Transaction,
            Payload::Milestone(_) => PayloadKind::Milestone,
            Payload::Index(_) => PayloadKind::Index,
        }
    }
}

/// Index payload: an index key plus arbitrary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPayload {
    #[serde(serialize_with = "ser_hex")]
    pub index: Vec<u8>,
    #[serde(serialize_with = "ser_hex")]
    pub data: Vec<u8>,
}

impl IndexPayload {
    /// Decode the index as UTF-8, replacing invalid sequences.
    pub fn index_utf8(&self) -> String {
        String::from_utf8_lossy(&self.index).into_owned()
    }

    /// Decode the data as UTF-8, replacing invalid sequences.
    pub fn data_utf8(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Guess whether this is a spam message. Nodes commonly issue spam
    /// index messages to increase the security of the tangle.
    pub fn looks_like_spam(&self) -> bool {
        self.index_utf8().to_lowercase().contains("spam")
            || self.data_utf8().to_lowercase().contains("spam")
    }
}

/// Transaction payload: UTXO inputs consumed and outputs created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPayload {
    /// Transaction essence type; 0 on the current network.
    pub txn_type: u8,
    pub inputs: Vec<UtxoRef>,
    pub outputs: Vec<TxnOutput>,
    /// Embedded payload (e.g. an index payload riding inside the
    /// transaction), carried verbatim.
    #[serde(serialize_with = "ser_hex")]
    pub payload: Vec<u8>,
}

/// Milestone payload issued by the coordinator to checkpoint consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestonePayload {
    pub index_number: u32,
    /// Unix seconds.
    pub timestamp: u64,
    #[serde(serialize_with = "ser_hex_list")]
    pub milestone_parents: Vec<ParentId>,
    #[serde(serialize_with = "ser_hex")]
    pub inclusion_merkle_root: ParentId,
    pub next_pow_score: u32,
    pub next_pow_score_milestone_index: u32,
}

impl MilestonePayload {
    /// Milestone timestamp as RFC3339, when representable.
    pub fn timestamp_rfc3339(&self) -> Option<String> {
        let seconds = i64::try_from(self.timestamp).ok()?;
        let timestamp = OffsetDateTime::from_unix_timestamp(seconds).ok()?;
        timestamp.format(&Rfc3339).ok()
    }
}

/// Reference to a prior transaction's output, spent as an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtxoRef {
    pub input_type: u8,
    #[serde(serialize_with = "ser_hex")]
    pub txn_id: ParentId,
    pub txn_index: u16,
}

/// Deposit onto a target address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxnOutput {
    pub output_type: u8,
    pub address_type: u8,
    #[serde(serialize_with = "ser_hex")]
    pub address: ParentId,
    pub amount: u64,
}
