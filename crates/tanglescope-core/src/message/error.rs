use thiserror::Error;

/// Errors returned by message decoding.
///
/// Every failure is total for the message being decoded: no partially
/// populated message is ever produced alongside one of these.
///
/// Note: this error type is re-exported at the crate root; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use tanglescope_core::DecodeError;
///
/// let err = DecodeError::UnknownPayloadType { tag: 7 };
/// assert!(err.to_string().contains("unknown payload type"));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed message hex: {reason}")]
    MalformedHex { reason: String },
    #[error("message truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    #[error("unknown payload type tag: {tag}")]
    UnknownPayloadType { tag: u32 },
    #[error("payload length mismatch: declared {declared}, actual {actual}")]
    PayloadLengthMismatch { declared: u32, actual: usize },
}
