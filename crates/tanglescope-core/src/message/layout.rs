pub const HEX_PREFIX_LEN: usize = 2;

pub const ID_LEN: usize = 32;
pub const PAYLOAD_LEN_FIELD_LEN: usize = 4;
pub const NONCE_LEN: usize = 8;

pub const PAYLOAD_TYPE_LEN: usize = 4;
pub const PAYLOAD_TYPE_TRANSACTION: u32 = 0;
pub const PAYLOAD_TYPE_MILESTONE: u32 = 1;
pub const PAYLOAD_TYPE_INDEX: u32 = 2;

pub const UTXO_REF_LEN: usize = 1 + ID_LEN + 2;
pub const TXN_OUTPUT_LEN: usize = 1 + 1 + ID_LEN + 8;

// Protocol rule for index payloads; data-quality concern, not enforced here.
pub const INDEX_MAX_LEN: usize = 64;
