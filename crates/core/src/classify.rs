use serde::{Deserialize, Serialize};

use crate::error::{Result, TracefallError};
use crate::model::issue::TraceError;
use crate::model::transaction::TraceTransaction;

/// Overall topology of a trace, derived from its top-level records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceType {
    OneRoot,
    NoRoot,
    MultipleRoots,
    BrokenSubtraces,
    OnlyErrors,
    EmptyTrace,
}

impl TraceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneRoot => "one_root",
            Self::NoRoot => "no_root",
            Self::MultipleRoots => "multiple_roots",
            Self::BrokenSubtraces => "broken_subtraces",
            Self::OnlyErrors => "only_errors",
            Self::EmptyTrace => "empty_trace",
        }
    }
}

/// Classify a trace from its top-level transactions and the separate
/// orphan-error list. The rules are checked in a fixed order; in particular
/// a single root with orphan fragments is a broken trace, never a
/// multi-root one.
pub fn classify(
    transactions: &[TraceTransaction],
    orphan_errors: &[TraceError],
) -> Result<TraceType> {
    let roots = transactions.iter().filter(|t| t.is_root()).count();
    let orphans = transactions.len() - roots;

    if roots == 0 && orphans > 0 {
        return Ok(TraceType::NoRoot);
    }
    if roots == 1 && orphans > 0 {
        return Ok(TraceType::BrokenSubtraces);
    }
    if roots > 1 {
        return Ok(TraceType::MultipleRoots);
    }
    if orphan_errors.len() > 1 {
        return Ok(TraceType::OnlyErrors);
    }
    if roots == 1 {
        return Ok(TraceType::OneRoot);
    }
    if roots == 0 && orphans == 0 {
        return Ok(TraceType::EmptyTrace);
    }

    // Unreachable under the table above; a hard error beats a silent default.
    Err(TracefallError::UnclassifiableTrace {
        roots,
        orphans,
        orphan_errors: orphan_errors.len(),
    })
}
