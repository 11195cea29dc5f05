use tracefall_core::model::{TraceError, TraceTransaction};

use crate::row::{ContinuingDepth, Row, RowEntry};
use crate::state::ViewState;

/// The ordered row list for one render pass, plus the count of invisible
/// rows accumulated after the last visible one (the trailing "N hidden"
/// summary).
#[derive(Debug)]
pub struct FlattenedTrace<'a> {
    pub rows: Vec<Row<'a>>,
    pub hidden_below: usize,
}

impl FlattenedTrace<'_> {
    pub fn visible_len(&self) -> usize {
        self.rows.iter().filter(|r| r.is_visible).count()
    }
}

/// Result of flattening one subtree; threaded back up the recursion instead
/// of mutating a shared accumulator.
struct Outcome<'a> {
    rows: Vec<Row<'a>>,
    last_index: usize,
    hidden_above: usize,
}

/// Convert the nested forest plus collapse/filter state into the ordered,
/// indexed row list. Emission order is depth-first with children in their
/// original order; indices are gap-free and start at 1, index 0 being the
/// synthetic whole-trace row. Filtered-out rows stay in the sequence with
/// `is_visible = false`; collapsed subtrees are omitted entirely and consume
/// no indices.
pub fn flatten_trace<'a>(
    transactions: &'a [TraceTransaction],
    orphan_errors: &'a [TraceError],
    view: &ViewState,
) -> FlattenedTrace<'a> {
    let mut rows = vec![Row {
        entry: RowEntry::TraceRoot,
        index: 0,
        generation: 0,
        continuing_depths: Vec::new(),
        is_orphan: false,
        is_last: transactions.is_empty() && orphan_errors.is_empty(),
        is_visible: true,
        hidden_above: 0,
    }];

    let mut last_index = 0;
    let mut hidden_above = 0;
    let count = transactions.len();

    for (i, txn) in transactions.iter().enumerate() {
        let is_last = i + 1 == count;
        // A continuing connector below this root is dashed when the next
        // top-level record hangs off a missing parent.
        let next_is_orphan = transactions
            .get(i + 1)
            .is_some_and(|next| next.parent_span_id.is_some());
        let continuing_depths = if !is_last && !txn.children.is_empty() {
            vec![ContinuingDepth {
                depth: 0,
                is_orphan_depth: next_is_orphan,
            }]
        } else {
            Vec::new()
        };

        let outcome = flatten_transaction(
            txn,
            view,
            &continuing_depths,
            // Orphaned iff the record itself points at a missing parent;
            // being a later top-level entry does not make it one.
            txn.parent_span_id.is_some(),
            is_last,
            last_index + 1,
            hidden_above,
        );
        last_index = outcome.last_index;
        hidden_above = outcome.hidden_above;
        rows.extend(outcome.rows);
    }

    let error_count = orphan_errors.len();
    for (i, error) in orphan_errors.iter().enumerate() {
        let is_visible = view.is_visible(&error.event_id);
        last_index += 1;
        rows.push(Row {
            entry: RowEntry::OrphanError(error),
            index: last_index,
            generation: 1,
            continuing_depths: Vec::new(),
            is_orphan: true,
            is_last: i + 1 == error_count,
            is_visible,
            hidden_above,
        });
        hidden_above = if is_visible { 0 } else { hidden_above + 1 };
    }

    FlattenedTrace {
        rows,
        hidden_below: hidden_above,
    }
}

fn flatten_transaction<'a>(
    txn: &'a TraceTransaction,
    view: &ViewState,
    continuing_depths: &[ContinuingDepth],
    is_orphan: bool,
    is_last: bool,
    index: usize,
    hidden_above: usize,
) -> Outcome<'a> {
    let is_visible = view.is_visible(&txn.event_id);
    let generation = txn.generation + 1;

    let mut rows = vec![Row {
        entry: RowEntry::Transaction(txn),
        index,
        generation,
        continuing_depths: continuing_depths.to_vec(),
        is_orphan,
        is_last,
        is_visible,
        hidden_above,
    }];

    let mut last_index = index;
    let mut hidden_above = if is_visible { 0 } else { hidden_above + 1 };

    if view.is_expanded(&txn.event_id) {
        let child_count = txn.children.len();
        for (i, child) in txn.children.iter().enumerate() {
            let is_last_child = i + 1 == child_count;
            // Only a non-last child with its own subtree needs a new
            // connector column; the tree line terminates naturally at a
            // last or childless child.
            let child_depths = if !is_last_child && !child.children.is_empty() {
                let mut extended = continuing_depths.to_vec();
                extended.push(ContinuingDepth {
                    depth: generation,
                    is_orphan_depth: is_orphan,
                });
                extended
            } else {
                continuing_depths.to_vec()
            };

            let outcome = flatten_transaction(
                child,
                view,
                &child_depths,
                is_orphan,
                is_last_child,
                last_index + 1,
                hidden_above,
            );
            last_index = outcome.last_index;
            hidden_above = outcome.hidden_above;
            rows.extend(outcome.rows);
        }
    }

    Outcome {
        rows,
        last_index,
        hidden_above,
    }
}
