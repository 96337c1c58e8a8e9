//! Tanglescope core library for offline analysis of tangle message dumps.
//!
//! This crate implements the pipeline used by the CLI: a row source feeds
//! hex-encoded ledger messages to the decoder, and decoded messages are
//! aggregated into a directed graph (one node per message, one edge per
//! parent reference) plus a deterministic report. Decoding is byte-oriented
//! and side-effect free; all I/O is isolated in `source` modules. Wire
//! conventions are captured in the message reader so the parser stays
//! minimal and consistent with the format.
//!
//! Invariants:
//! - Decoding a message is pure and total: one typed message or one error.
//! - Graph and report outputs are deterministic for a given input.
//! - A row that fails to decode is counted and skipped; it never aborts
//!   the rows after it.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use tanglescope_core::analyze_csv_file;
//!
//! let report = analyze_csv_file(Path::new("messages.csv"), None)?;
//! println!("report version: {}", report.report_version);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

pub mod message;
mod source;
mod tangle;

pub use message::error::DecodeError;
pub use message::model::{
    IndexPayload, Message, MilestonePayload, ParentId, Payload, PayloadKind, TransactionPayload,
    TxnOutput, UtxoRef,
};
pub use message::{decode_message, payload_kind};
pub use source::{CsvFileSource, MessageRow, RowSource, SourceError};
pub use tangle::gexf::write_gexf;
pub use tangle::{
    TangleBuild, TangleError, TangleGraph, analyze_csv_file, build_tangle, build_tangle_from_csv,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no milestone timestamp is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Aggregated analysis report with deterministic field ordering.
///
/// # Examples
/// ```
/// use tanglescope_core::make_stub_report;
///
/// let report = make_stub_report("messages.csv", 123);
/// assert_eq!(report.report_version, tanglescope_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time; taken
    /// from the latest milestone observed in the input when present.
    pub generated_at: String,

    /// Input dump metadata.
    pub input: InputInfo,

    /// Graph size after the build.
    pub graph: GraphInfo,
    /// Row and payload counters.
    pub summary: TangleSummary,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "tanglescope").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input dump metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Node and edge counts of the built graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphInfo {
    pub nodes: u64,
    pub edges: u64,
}

/// Row and payload counters for one build pass.
///
/// `rows_total` always equals `rows_decoded + rows_failed`.
///
/// # Examples
/// ```
/// use tanglescope_core::TangleSummary;
///
/// let summary = TangleSummary::default();
/// assert_eq!(summary.rows_total, 0);
/// assert!(summary.latest_milestone.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TangleSummary {
    pub rows_total: u64,
    pub rows_decoded: u64,
    pub rows_failed: u64,
    /// Decoded messages per payload kind.
    pub transaction_messages: u64,
    pub milestone_messages: u64,
    pub index_messages: u64,
    /// Failed rows per decode error kind.
    pub failures: FailureCounts,
    /// Highest-index milestone observed, when any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_milestone: Option<MilestoneInfo>,
}

/// Failed-row counters, one per decode error kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailureCounts {
    pub malformed_hex: u64,
    pub truncated: u64,
    pub unknown_payload_type: u64,
    pub payload_length_mismatch: u64,
}

/// The latest milestone checkpoint observed in the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneInfo {
    pub index_number: u32,
    /// Unix seconds, as carried on the wire.
    pub timestamp: u64,
    /// RFC3339 rendering of `timestamp`, when representable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_rfc3339: Option<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use tanglescope_core::make_stub_report;
///
/// let report = make_stub_report("messages.csv", 123);
/// assert_eq!(report.input.bytes, 123);
/// assert_eq!(report.graph.nodes, 0);
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "tanglescope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        graph: GraphInfo::default(),
        summary: TangleSummary::default(),
    }
}
