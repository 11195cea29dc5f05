use tracefall_core::model::{TraceError, TraceIssue, TraceSplitResults, TraceTransaction};

pub fn transaction(
    event_id: &str,
    parent_span_id: Option<&str>,
    op: &str,
    name: &str,
    start: f64,
    end: f64,
    generation: u32,
) -> TraceTransaction {
    TraceTransaction {
        event_id: event_id.to_string(),
        span_id: format!("span-{event_id}"),
        parent_span_id: parent_span_id.map(str::to_string),
        transaction_op: op.to_string(),
        transaction_name: name.to_string(),
        start_timestamp: start,
        end_timestamp: end,
        generation,
        project_slug: "api".to_string(),
        errors: Vec::new(),
        performance_issues: Vec::new(),
        children: Vec::new(),
    }
}

/// One healthy root with a nested subtree: an http.server root covering
/// 100.0..101.8, a cache lookup with a db fallback under it, and a
/// downstream http.client call. The db.query carries an error.
pub fn sample_trace() -> TraceSplitResults {
    let mut root = transaction(
        "txn-root",
        None,
        "http.server",
        "GET /v1/orders",
        100.0,
        101.8,
        0,
    );

    let mut cache = transaction(
        "txn-cache",
        Some("span-txn-root"),
        "cache.get",
        "orders:recent",
        100.1,
        100.9,
        1,
    );
    let mut db = transaction(
        "txn-db",
        Some("span-txn-cache"),
        "db.query",
        "SELECT orders",
        100.2,
        100.8,
        2,
    );
    db.project_slug = "storage".to_string();
    db.errors.push(TraceIssue {
        event_id: "err-db".to_string(),
        issue_id: Some(101),
        title: "QueryTimeout".to_string(),
        level: "error".to_string(),
        project_slug: "storage".to_string(),
    });
    cache.children.push(db);

    let downstream = transaction(
        "txn-payments",
        Some("span-txn-root"),
        "http.client",
        "POST /charges",
        101.0,
        101.7,
        1,
    );

    root.children.push(cache);
    root.children.push(downstream);

    TraceSplitResults {
        transactions: vec![root],
        orphan_errors: Vec::new(),
    }
}

/// One real root plus an orphaned fragment whose parent span is missing
/// from the result set, and one orphan error.
pub fn broken_trace() -> TraceSplitResults {
    let mut split = sample_trace();

    let mut fragment = transaction(
        "txn-frag",
        Some("span-gone"),
        "queue.task",
        "send_receipt",
        101.9,
        102.4,
        0,
    );
    fragment.children.push(transaction(
        "txn-frag-child",
        Some("span-txn-frag"),
        "smtp.send",
        "receipt_email",
        102.0,
        102.3,
        1,
    ));
    split.transactions.push(fragment);
    split.orphan_errors = orphan_errors();
    split
}

/// A root-only chain of `n` transactions, ids `txn-1` through `txn-n`,
/// each child starting and ending inside its parent.
pub fn linear_chain(n: usize) -> TraceSplitResults {
    let mut head: Option<TraceTransaction> = None;
    for i in (1..=n).rev() {
        let parent_span = (i > 1).then(|| format!("span-txn-{}", i - 1));
        let mut txn = transaction(
            &format!("txn-{i}"),
            parent_span.as_deref(),
            "function",
            &format!("step_{i}"),
            100.0 + i as f64 * 0.1,
            102.0 - i as f64 * 0.1,
            (i - 1) as u32,
        );
        if let Some(child) = head.take() {
            txn.children.push(child);
        }
        head = Some(txn);
    }

    TraceSplitResults {
        transactions: head.into_iter().collect(),
        orphan_errors: Vec::new(),
    }
}

pub fn orphan_errors() -> Vec<TraceError> {
    vec![TraceError {
        event_id: "err-orphan".to_string(),
        span_id: Some("span-lost".to_string()),
        title: "ConnectionReset".to_string(),
        level: "error".to_string(),
        project_slug: "edge".to_string(),
        timestamp: Some(102.5),
    }]
}
