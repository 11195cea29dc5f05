use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Aggregate statistics over a whole trace, computed once per load.
/// Never constructed for an empty forest; `start_timestamp <= end_timestamp`
/// holds whenever at least one timestamped record was seen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceInfo {
    pub start_timestamp: f64,
    pub end_timestamp: f64,
    pub max_generation: u32,
    pub transactions: HashSet<String>,
    pub errors: HashSet<String>,
    pub projects: HashSet<String>,
}

impl TraceInfo {
    pub fn duration_secs(&self) -> f64 {
        (self.end_timestamp - self.start_timestamp).max(0.0)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
