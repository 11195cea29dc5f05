use tracefall_core::model::{TraceError, TraceTransaction};

/// Marks an indentation column through which a vertical connector must keep
/// running past this row, because an ancestor at that depth has more
/// siblings below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuingDepth {
    pub depth: u32,
    /// Drawn dashed: the link at this depth crosses a broken parent
    /// reference rather than a true parent-child edge.
    pub is_orphan_depth: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowEntry<'a> {
    /// Synthetic row spanning the whole trace, always at index 0.
    TraceRoot,
    Transaction(&'a TraceTransaction),
    OrphanError(&'a TraceError),
}

/// One line of the waterfall. Recomputed on every render pass; borrows the
/// forest rather than owning copies of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub entry: RowEntry<'a>,
    pub index: usize,
    /// Indentation level. The synthetic trace root sits at 0; real records
    /// render at their own generation plus one.
    pub generation: u32,
    pub continuing_depths: Vec<ContinuingDepth>,
    pub is_orphan: bool,
    pub is_last: bool,
    pub is_visible: bool,
    /// Consecutive invisible rows emitted immediately above this one.
    pub hidden_above: usize,
}

impl Row<'_> {
    pub fn event_id(&self) -> Option<&str> {
        match &self.entry {
            RowEntry::TraceRoot => None,
            RowEntry::Transaction(txn) => Some(&txn.event_id),
            RowEntry::OrphanError(error) => Some(&error.event_id),
        }
    }

    pub fn label(&self) -> String {
        match &self.entry {
            RowEntry::TraceRoot => "trace".to_string(),
            RowEntry::Transaction(txn) => {
                format!("{} {}", txn.transaction_op, txn.transaction_name)
            }
            RowEntry::OrphanError(error) => error.title.clone(),
        }
    }

    /// Time interval to draw for this row, when one exists. The trace root
    /// has no interval of its own; callers draw it across the full window.
    pub fn time_window(&self) -> Option<(f64, f64)> {
        match &self.entry {
            RowEntry::TraceRoot => None,
            RowEntry::Transaction(txn) => Some((txn.start_timestamp, txn.end_timestamp)),
            RowEntry::OrphanError(error) => error.timestamp.map(|ts| (ts, ts)),
        }
    }
}
