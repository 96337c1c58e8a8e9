//! Tangle graph construction from decoded messages.
//!
//! `build_tangle` drives a row source, decodes each row, and registers one
//! node per message id plus one directed edge per parent reference. Rows
//! that fail to decode are counted per error kind and skipped; decoding one
//! row never affects the next. Source errors (I/O, malformed CSV framing)
//! abort the build.
//!
//! Invariants:
//! - Node and edge order is the encounter order of the input rows.
//! - Nodes and edges are deduplicated; re-adding is a no-op.
//! - Summary counters always satisfy `rows_total = rows_decoded + rows_failed`.

pub mod gexf;

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::message::model::{Message, MilestonePayload, Payload};
use crate::message::{DecodeError, decode_message};
use crate::source::{CsvFileSource, RowSource, SourceError};
use crate::{
    DEFAULT_GENERATED_AT, FailureCounts, GraphInfo, MilestoneInfo, Report, TangleSummary,
    make_stub_report,
};

#[derive(Debug, Error)]
pub enum TangleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Directed graph over message ids, in hex string form.
///
/// Edges point from a message to each parent it approves. Adding an edge
/// registers both endpoints as nodes, so parents outside the dump window
/// still appear in the graph.
#[derive(Debug, Default)]
pub struct TangleGraph {
    nodes: Vec<String>,
    node_set: HashSet<String>,
    edges: Vec<(String, String)>,
    edge_set: HashSet<(String, String)>,
}

impl TangleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: &str) {
        if self.node_set.insert(id.to_string()) {
            self.nodes.push(id.to_string());
        }
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        self.add_node(to);
        let edge = (from.to_string(), to.to_string());
        if self.edge_set.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    pub fn add_message(&mut self, message: &Message) {
        self.add_node(&message.id);
        for parent in &message.parents {
            self.add_edge(&message.id, &hex::encode(parent));
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(String, String)] {
        &self.edges
    }
}

/// Result of one build pass: the graph plus aggregate counters.
#[derive(Debug)]
pub struct TangleBuild {
    pub graph: TangleGraph,
    pub summary: TangleSummary,
}

pub fn build_tangle_from_csv(path: &Path, limit: Option<u64>) -> Result<TangleBuild, TangleError> {
    let source = CsvFileSource::open(path)?;
    build_tangle(source, limit)
}

pub fn build_tangle<S: RowSource>(
    mut source: S,
    limit: Option<u64>,
) -> Result<TangleBuild, TangleError> {
    let mut graph = TangleGraph::new();
    let mut summary = TangleSummary::default();

    while let Some(row) = source.next_row()? {
        if limit.is_some_and(|limit| summary.rows_total >= limit) {
            break;
        }
        summary.rows_total += 1;
        match decode_message(&row.message_id, &row.message_hex, &row.metadata) {
            Ok(message) => {
                summary.rows_decoded += 1;
                record_payload(&mut summary, &message);
                graph.add_message(&message);
            }
            Err(err) => {
                summary.rows_failed += 1;
                record_failure(&mut summary.failures, &err);
                warn!(message_id = %row.message_id, error = %err, "skipping undecodable row");
            }
        }
    }

    Ok(TangleBuild { graph, summary })
}

/// Build the tangle from a CSV dump and wrap the result in a versioned report.
pub fn analyze_csv_file(path: &Path, limit: Option<u64>) -> Result<Report, TangleError> {
    let build = build_tangle_from_csv(path, limit)?;
    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.generated_at = build
        .summary
        .latest_milestone
        .as_ref()
        .and_then(|milestone| milestone.timestamp_rfc3339.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.graph = GraphInfo {
        nodes: build.graph.node_count() as u64,
        edges: build.graph.edge_count() as u64,
    };
    report.summary = build.summary;
    Ok(report)
}

fn record_payload(summary: &mut TangleSummary, message: &Message) {
    match &message.payload {
        Payload::Transaction(_) => summary.transaction_messages += 1,
        Payload::Index(_) => summary.index_messages += 1,
        Payload::Milestone(milestone) => {
            summary.milestone_messages += 1;
            record_milestone(summary, milestone);
        }
    }
}

fn record_milestone(summary: &mut TangleSummary, milestone: &MilestonePayload) {
    let newer = summary
        .latest_milestone
        .as_ref()
        .is_none_or(|current| milestone.index_number > current.index_number);
    if newer {
        summary.latest_milestone = Some(MilestoneInfo {
            index_number: milestone.index_number,
            timestamp: milestone.timestamp,
            timestamp_rfc3339: milestone.timestamp_rfc3339(),
        });
    }
}

fn record_failure(counts: &mut FailureCounts, err: &DecodeError) {
    match err {
        DecodeError::MalformedHex { .. } => counts.malformed_hex += 1,
        DecodeError::Truncated { .. } => counts.truncated += 1,
        DecodeError::UnknownPayloadType { .. } => counts.unknown_payload_type += 1,
        DecodeError::PayloadLengthMismatch { .. } => counts.payload_length_mismatch += 1,
    }
}
