use serde::{Deserialize, Serialize};

/// An error or performance issue attached to a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceIssue {
    pub event_id: String,
    #[serde(default)]
    pub issue_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub project_slug: String,
}

/// A standalone error that could not be attached to any transaction in the
/// result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceError {
    pub event_id: String,
    #[serde(default)]
    pub span_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub level: String,
    pub project_slug: String,
    #[serde(default)]
    pub timestamp: Option<f64>,
}
