mod csv;

pub use self::csv::CsvFileSource;

use thiserror::Error;

/// One raw dump row: the message hash, the hex-encoded message bytes, and
/// whatever metadata column the dump carries (opaque to decoding).
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub message_id: String,
    pub message_hex: String,
    pub metadata: String,
}

pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<MessageRow>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(String),
}
