use std::collections::HashSet;

use crate::model::info::TraceInfo;
use crate::model::issue::TraceError;
use crate::model::transaction::TraceTransaction;

/// Reduce the full nested forest into one [`TraceInfo`] in a single
/// depth-first pass. Visits every record regardless of any active filter.
/// Returns `None` for an empty forest rather than a zero-width aggregate.
pub fn trace_info(transactions: &[TraceTransaction]) -> Option<TraceInfo> {
    if transactions.is_empty() {
        return None;
    }

    let mut info = seed();
    for txn in transactions {
        visit(txn, &mut info);
    }
    Some(info)
}

/// Like [`trace_info`], but also folds the orphan-error list in, so an
/// errors-only trace still gets time bounds and project membership.
pub fn trace_info_with_orphans(
    transactions: &[TraceTransaction],
    orphan_errors: &[TraceError],
) -> Option<TraceInfo> {
    if transactions.is_empty() && orphan_errors.is_empty() {
        return None;
    }

    let mut info = seed();
    for txn in transactions {
        visit(txn, &mut info);
    }
    for error in orphan_errors {
        info.errors.insert(error.event_id.clone());
        info.projects.insert(error.project_slug.clone());
        if let Some(ts) = error.timestamp {
            info.start_timestamp = info.start_timestamp.min(ts);
            info.end_timestamp = info.end_timestamp.max(ts);
        }
    }
    Some(info)
}

// Seeded so that any real record dominates both bounds.
fn seed() -> TraceInfo {
    TraceInfo {
        start_timestamp: f64::INFINITY,
        end_timestamp: 0.0,
        max_generation: 0,
        transactions: HashSet::new(),
        errors: HashSet::new(),
        projects: HashSet::new(),
    }
}

fn visit(txn: &TraceTransaction, info: &mut TraceInfo) {
    info.start_timestamp = info.start_timestamp.min(txn.start_timestamp);
    info.end_timestamp = info.end_timestamp.max(txn.end_timestamp);
    info.max_generation = info.max_generation.max(txn.generation);
    info.transactions.insert(txn.event_id.clone());
    info.projects.insert(txn.project_slug.clone());
    for issue in txn.errors.iter().chain(&txn.performance_issues) {
        info.errors.insert(issue.event_id.clone());
    }
    for child in &txn.children {
        visit(child, info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::issue::TraceIssue;

    fn txn(event_id: &str, start: f64, end: f64, generation: u32) -> TraceTransaction {
        TraceTransaction {
            event_id: event_id.to_string(),
            span_id: format!("span-{event_id}"),
            parent_span_id: None,
            transaction_op: "http.server".to_string(),
            transaction_name: format!("/{event_id}"),
            start_timestamp: start,
            end_timestamp: end,
            generation,
            project_slug: "api".to_string(),
            errors: Vec::new(),
            performance_issues: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn empty_forest_has_no_info() {
        assert!(trace_info(&[]).is_none());
    }

    #[test]
    fn bounds_and_counts_over_nested_forest() {
        let mut root = txn("a", 10.0, 20.0, 0);
        let mut mid = txn("b", 5.0, 15.0, 1);
        mid.project_slug = "worker".to_string();
        mid.children.push(txn("c", 12.0, 30.0, 2));
        root.children.push(mid);

        let info = trace_info(std::slice::from_ref(&root)).unwrap();
        assert_eq!(info.start_timestamp, 5.0);
        assert_eq!(info.end_timestamp, 30.0);
        assert_eq!(info.max_generation, 2);
        assert_eq!(info.transaction_count(), 3);
        assert_eq!(info.projects.len(), 2);
    }

    #[test]
    fn errors_and_performance_issues_share_one_set() {
        let mut root = txn("a", 10.0, 20.0, 0);
        root.errors.push(TraceIssue {
            event_id: "e1".to_string(),
            issue_id: Some(41),
            title: "ValueError".to_string(),
            level: "error".to_string(),
            project_slug: "api".to_string(),
        });
        root.performance_issues.push(TraceIssue {
            event_id: "p1".to_string(),
            issue_id: Some(42),
            title: "N+1 Query".to_string(),
            level: "info".to_string(),
            project_slug: "api".to_string(),
        });

        let info = trace_info(std::slice::from_ref(&root)).unwrap();
        assert_eq!(info.error_count(), 2);
        assert!(info.errors.contains("e1"));
        assert!(info.errors.contains("p1"));
    }

    #[test]
    fn duplicate_event_ids_collapse() {
        let txns = vec![txn("a", 10.0, 20.0, 0), txn("a", 11.0, 19.0, 0)];
        let info = trace_info(&txns).unwrap();
        assert_eq!(info.transaction_count(), 1);
    }

    #[test]
    fn orphan_errors_extend_bounds_and_sets() {
        let txns = vec![txn("a", 10.0, 20.0, 0)];
        let errors = vec![TraceError {
            event_id: "e9".to_string(),
            span_id: None,
            title: "Panic".to_string(),
            level: "fatal".to_string(),
            project_slug: "edge".to_string(),
            timestamp: Some(25.0),
        }];

        let info = trace_info_with_orphans(&txns, &errors).unwrap();
        assert_eq!(info.end_timestamp, 25.0);
        assert!(info.errors.contains("e9"));
        assert!(info.projects.contains("edge"));
    }
}
