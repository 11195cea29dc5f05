use tracefall_core::aggregate::{trace_info, trace_info_with_orphans};
use tracefall_core::classify::{TraceType, classify};
use tracefall_core::filter::{SearchFilter, SearchQuery};
use tracefall_core::model::TraceError;
use tracefall_waterfall::{RowEntry, TimelineBounds, ViewAction, ViewState, flatten_trace};

#[test]
fn healthy_trace_end_to_end() {
    let split = testkit::sample_trace();

    let trace_type = classify(&split.transactions, &split.orphan_errors).unwrap();
    assert_eq!(trace_type, TraceType::OneRoot);

    let info = trace_info(&split.transactions).unwrap();
    assert_eq!(info.start_timestamp, 100.0);
    assert_eq!(info.end_timestamp, 101.8);
    assert_eq!(info.transaction_count(), 4);
    assert!(info.errors.contains("err-db"));
    assert!(info.projects.contains("storage"));

    let view = ViewState::new();
    let flat = flatten_trace(&split.transactions, &split.orphan_errors, &view);
    let order: Vec<_> = flat.rows[1..]
        .iter()
        .map(|r| r.event_id().unwrap())
        .collect();
    assert_eq!(order, ["txn-root", "txn-cache", "txn-db", "txn-payments"]);

    let bounds = TimelineBounds::new(&info);
    let cache = flat
        .rows
        .iter()
        .find(|r| r.event_id() == Some("txn-cache"))
        .unwrap();
    let (start, end) = cache.time_window().unwrap();
    let bar = bounds.bar(start, end);
    assert!((bar.start - (0.1 / 1.8)).abs() < 1e-9);
    assert!((bar.width - (0.8 / 1.8)).abs() < 1e-9);
}

#[test]
fn broken_trace_keeps_orphans_and_errors_in_sequence() {
    let split = testkit::broken_trace();

    let trace_type = classify(&split.transactions, &split.orphan_errors).unwrap();
    assert_eq!(trace_type, TraceType::BrokenSubtraces);

    let flat = flatten_trace(&split.transactions, &split.orphan_errors, &ViewState::new());
    let indices: Vec<_> = flat.rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, (0..flat.rows.len()).collect::<Vec<_>>());

    let frag = flat
        .rows
        .iter()
        .find(|r| r.event_id() == Some("txn-frag"))
        .unwrap();
    assert!(frag.is_orphan);

    let root_row = flat
        .rows
        .iter()
        .find(|r| r.event_id() == Some("txn-root"))
        .unwrap();
    assert!(root_row.continuing_depths[0].is_orphan_depth);

    let last = flat.rows.last().unwrap();
    assert!(matches!(last.entry, RowEntry::OrphanError(_)));
    assert!(last.is_last);
}

#[test]
fn search_drives_visibility_through_the_flattener() {
    let split = testkit::sample_trace();

    let query = SearchQuery::new(vec![SearchFilter::parse("op=db.*").unwrap()], None).unwrap();
    let ids = query
        .filtered_event_ids(&split.transactions, &split.orphan_errors)
        .unwrap();
    assert_eq!(ids.len(), 1);

    let mut view = ViewState::new();
    view.dispatch(ViewAction::SetFilter(ids));

    let flat = flatten_trace(&split.transactions, &split.orphan_errors, &view);
    // Rows keep their slots; only visibility and counters change.
    assert_eq!(flat.rows.len(), 5);
    let db = flat
        .rows
        .iter()
        .find(|r| r.event_id() == Some("txn-db"))
        .unwrap();
    assert!(db.is_visible);
    assert_eq!(db.hidden_above, 2);
    assert_eq!(flat.hidden_below, 1);
}

#[test]
fn collapse_reflows_indices_without_gaps() {
    let split = testkit::linear_chain(6);
    let mut view = ViewState::new();

    let full = flatten_trace(&split.transactions, &split.orphan_errors, &view);
    assert_eq!(full.rows.len(), 7);

    view.dispatch(ViewAction::Collapse("txn-3".to_string()));
    let collapsed = flatten_trace(&split.transactions, &split.orphan_errors, &view);
    assert_eq!(collapsed.rows.len(), 4);
    let indices: Vec<_> = collapsed.rows.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);

    view.dispatch(ViewAction::ExpandAll);
    let expanded = flatten_trace(&split.transactions, &split.orphan_errors, &view);
    assert_eq!(expanded.rows.len(), 7);
}

#[test]
fn errors_only_trace_still_gets_bounds() {
    let orphan_errors = vec![
        TraceError {
            event_id: "e1".to_string(),
            span_id: None,
            title: "TypeError".to_string(),
            level: "error".to_string(),
            project_slug: "edge".to_string(),
            timestamp: Some(50.0),
        },
        TraceError {
            event_id: "e2".to_string(),
            span_id: None,
            title: "Panic".to_string(),
            level: "fatal".to_string(),
            project_slug: "edge".to_string(),
            timestamp: Some(60.0),
        },
    ];

    let trace_type = classify(&[], &orphan_errors).unwrap();
    assert_eq!(trace_type, TraceType::OnlyErrors);

    let info = trace_info_with_orphans(&[], &orphan_errors).unwrap();
    assert_eq!(info.start_timestamp, 50.0);
    assert_eq!(info.end_timestamp, 60.0);

    let flat = flatten_trace(&[], &orphan_errors, &ViewState::new());
    assert_eq!(flat.rows.len(), 3);
    let bounds = TimelineBounds::new(&info);
    let bar = bounds.bar(60.0, 60.0);
    assert!(bar.start < 1.0);
    assert_eq!(bar.width, 0.0);
}
