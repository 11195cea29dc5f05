use std::collections::HashSet;
use std::str::FromStr;

use glob::Pattern;
use regex::Regex;

use crate::error::{Result, TracefallError};
use crate::model::issue::TraceError;
use crate::model::transaction::TraceTransaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Op,
    Name,
    Project,
}

impl FromStr for FilterField {
    type Err = TracefallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "op" => Ok(Self::Op),
            "name" => Ok(Self::Name),
            "project" => Ok(Self::Project),
            _ => Err(TracefallError::Parse(format!("unknown filter field: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub field: FilterField,
    pub value_glob: String,
}

impl SearchFilter {
    pub fn parse(input: &str) -> Result<Self> {
        let (field, value_glob) = input
            .split_once('=')
            .ok_or_else(|| TracefallError::Parse(format!("invalid where filter: {input}")))?;

        if field.trim().is_empty() || value_glob.trim().is_empty() {
            return Err(TracefallError::Parse(format!(
                "invalid where filter: {input}"
            )));
        }

        Ok(Self {
            field: field.trim().parse()?,
            value_glob: value_glob.trim().to_string(),
        })
    }

    fn matches_value(&self, value: &str) -> bool {
        Pattern::new(&self.value_glob)
            .map(|p| p.matches(value))
            .unwrap_or(false)
    }

    pub fn matches_transaction(&self, txn: &TraceTransaction) -> bool {
        match self.field {
            FilterField::Op => self.matches_value(&txn.transaction_op),
            FilterField::Name => self.matches_value(&txn.transaction_name),
            FilterField::Project => self.matches_value(&txn.project_slug),
        }
    }

    pub fn matches_error(&self, error: &TraceError) -> bool {
        match self.field {
            // Standalone errors carry no op.
            FilterField::Op => false,
            FilterField::Name => self.matches_value(&error.title),
            FilterField::Project => self.matches_value(&error.project_slug),
        }
    }
}

/// A search over the trace: every `field=glob` filter must match, and the
/// free-text pattern (when present) must match op, name or title.
#[derive(Debug, Default)]
pub struct SearchQuery {
    pub filters: Vec<SearchFilter>,
    pub pattern: Option<Regex>,
}

impl SearchQuery {
    pub fn new(filters: Vec<SearchFilter>, pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| TracefallError::Parse(format!("invalid search pattern: {e}")))
            })
            .transpose()?;
        Ok(Self { filters, pattern })
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.pattern.is_none()
    }

    fn matches_transaction(&self, txn: &TraceTransaction) -> bool {
        self.filters.iter().all(|f| f.matches_transaction(txn))
            && self.pattern.as_ref().is_none_or(|re| {
                re.is_match(&txn.transaction_op) || re.is_match(&txn.transaction_name)
            })
    }

    fn matches_error(&self, error: &TraceError) -> bool {
        self.filters.iter().all(|f| f.matches_error(error))
            && self
                .pattern
                .as_ref()
                .is_none_or(|re| re.is_match(&error.title))
    }

    /// Event ids matching this query across the whole forest, or `None` when
    /// no search is active (everything visible).
    pub fn filtered_event_ids(
        &self,
        transactions: &[TraceTransaction],
        orphan_errors: &[TraceError],
    ) -> Option<HashSet<String>> {
        if self.is_empty() {
            return None;
        }

        let mut ids = HashSet::new();
        for txn in transactions {
            self.collect_transaction(txn, &mut ids);
        }
        for error in orphan_errors {
            if self.matches_error(error) {
                ids.insert(error.event_id.clone());
            }
        }
        Some(ids)
    }

    fn collect_transaction(&self, txn: &TraceTransaction, ids: &mut HashSet<String>) {
        if self.matches_transaction(txn) {
            ids.insert(txn.event_id.clone());
        }
        for child in &txn.children {
            self.collect_transaction(child, ids);
        }
    }
}
