use serde::{Deserialize, Serialize};

use crate::model::issue::{TraceError, TraceIssue};

/// One transaction in a trace, with its subtree already nested by the
/// backend. Timestamps are floating-point epoch seconds; upstream does not
/// guarantee `end_timestamp >= start_timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceTransaction {
    pub event_id: String,
    pub span_id: String,
    #[serde(default)]
    pub parent_span_id: Option<String>,
    pub transaction_op: String,
    pub transaction_name: String,
    pub start_timestamp: f64,
    #[serde(alias = "timestamp")]
    pub end_timestamp: f64,
    /// Depth from this record's own subtree root; 0 for the root of a
    /// subtrace.
    #[serde(default)]
    pub generation: u32,
    pub project_slug: String,
    #[serde(default)]
    pub errors: Vec<TraceIssue>,
    #[serde(default)]
    pub performance_issues: Vec<TraceIssue>,
    #[serde(default)]
    pub children: Vec<TraceTransaction>,
}

impl TraceTransaction {
    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_none()
    }

    pub fn duration_secs(&self) -> f64 {
        (self.end_timestamp - self.start_timestamp).max(0.0)
    }

    pub fn issue_count(&self) -> usize {
        self.errors.len() + self.performance_issues.len()
    }
}

/// Payload of the trace endpoint: top-level transactions (roots and orphaned
/// subtrace roots) plus errors that could not be attached to any transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TraceSplitResults {
    #[serde(default)]
    pub transactions: Vec<TraceTransaction>,
    #[serde(default)]
    pub orphan_errors: Vec<TraceError>,
}
