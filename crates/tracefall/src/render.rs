use std::fmt::Write as _;

use owo_colors::OwoColorize;
use serde::Serialize;
use tracefall_core::classify::TraceType;
use tracefall_core::model::TraceInfo;
use tracefall_core::time::{format_duration_secs, format_epoch};
use tracefall_waterfall::{BarPosition, FlattenedTrace, Row, RowEntry, TimelineBounds};

const LABEL_WIDTH: usize = 44;

pub struct RenderOptions {
    pub track_width: usize,
    pub color: bool,
}

pub fn render_waterfall(
    trace_id: &str,
    trace_type: TraceType,
    info: Option<&TraceInfo>,
    flat: &FlattenedTrace<'_>,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();

    let Some(info) = info else {
        let _ = writeln!(out, "trace {trace_id}: no trace data found");
        return out;
    };

    let _ = writeln!(
        out,
        "TRACE {trace_id} type={} duration={} transactions={} errors={} projects={}",
        trace_type.as_str(),
        format_duration_secs(info.duration_secs()),
        info.transaction_count(),
        info.error_count(),
        info.projects.len()
    );

    let bounds = TimelineBounds::new(info);
    for row in &flat.rows {
        if !row.is_visible {
            continue;
        }
        if row.hidden_above > 0 {
            let _ = writeln!(out, "{}", hidden_message(row.hidden_above, opts));
        }
        let _ = writeln!(out, "{}", row_line(row, info, &bounds, opts));
    }
    if flat.hidden_below > 0 {
        let _ = writeln!(out, "{}", hidden_message(flat.hidden_below, opts));
    }

    out
}

pub fn render_summary(trace_id: &str, trace_type: TraceType, info: Option<&TraceInfo>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "trace={trace_id} type={}", trace_type.as_str());

    match info {
        None => {
            let _ = writeln!(out, "no trace data found");
        }
        Some(info) => {
            let _ = writeln!(
                out,
                "start={} end={} duration={}",
                format_epoch(info.start_timestamp),
                format_epoch(info.end_timestamp),
                format_duration_secs(info.duration_secs())
            );
            let _ = writeln!(
                out,
                "transactions={} errors={} max_generation={}",
                info.transaction_count(),
                info.error_count(),
                info.max_generation
            );
            let mut projects: Vec<_> = info.projects.iter().map(String::as_str).collect();
            projects.sort_unstable();
            let _ = writeln!(out, "projects={}", projects.join(","));
        }
    }

    out
}

fn row_line(
    row: &Row<'_>,
    info: &TraceInfo,
    bounds: &TimelineBounds,
    opts: &RenderOptions,
) -> String {
    let left = pad_label(
        &format!("{}{}", connector_prefix(row), row.label()),
        LABEL_WIDTH,
    );

    let (bar, duration) = match row.time_window() {
        Some((start, end)) => (Some(bounds.bar(start, end)), (end - start).max(0.0)),
        None => match row.entry {
            // The synthetic root spans the whole window.
            RowEntry::TraceRoot => (
                Some(BarPosition {
                    start: 0.0,
                    width: 1.0,
                }),
                info.duration_secs(),
            ),
            _ => (None, 0.0),
        },
    };

    let track = match bar {
        Some(bar) => render_track(row, bar, opts),
        None => " ".repeat(opts.track_width),
    };

    let duration = if bar.is_some() {
        format_duration_secs(duration)
    } else {
        "-".to_string()
    };

    format!("{left} |{track}| {duration}")
}

fn render_track(row: &Row<'_>, bar: BarPosition, opts: &RenderOptions) -> String {
    let (start, width) = bar_cells(bar, opts.track_width);
    let fill = "\u{2588}".repeat(width);
    let fill = if opts.color {
        match &row.entry {
            RowEntry::TraceRoot => fill.blue().to_string(),
            RowEntry::Transaction(txn) if txn.issue_count() > 0 => fill.red().to_string(),
            RowEntry::Transaction(_) => fill.cyan().to_string(),
            RowEntry::OrphanError(_) => fill.red().to_string(),
        }
    } else {
        fill
    };

    format!(
        "{}{}{}",
        " ".repeat(start),
        fill,
        " ".repeat(opts.track_width - start - width)
    )
}

// One three-cell column per ancestor depth, then the branch glyph; orphan
// links are drawn dashed.
fn connector_prefix(row: &Row<'_>) -> String {
    if row.generation == 0 {
        return String::new();
    }

    let mut prefix = String::new();
    for depth in 0..row.generation - 1 {
        let marker = row.continuing_depths.iter().find(|d| d.depth == depth);
        prefix.push_str(match marker {
            Some(d) if d.is_orphan_depth => "\u{2506}  ",
            Some(_) => "\u{2502}  ",
            None => "   ",
        });
    }
    prefix.push_str(match (row.is_last, row.is_orphan) {
        (true, false) => "\u{2514}\u{2500} ",
        (false, false) => "\u{251c}\u{2500} ",
        (true, true) => "\u{2514}\u{254c} ",
        (false, true) => "\u{251c}\u{254c} ",
    });
    prefix
}

// Zero-width bars still paint a single cell; the normalized width stays 0.
fn bar_cells(bar: BarPosition, track_width: usize) -> (usize, usize) {
    let start = ((bar.start * track_width as f64).floor() as usize).min(track_width - 1);
    let width = ((bar.width * track_width as f64).round() as usize).max(1);
    (start, width.min(track_width - start))
}

fn pad_label(label: &str, width: usize) -> String {
    let count = label.chars().count();
    if count > width {
        let truncated: String = label.chars().take(width - 1).collect();
        format!("{truncated}\u{2026}")
    } else {
        format!("{label}{}", " ".repeat(width - count))
    }
}

fn hidden_message(count: usize, opts: &RenderOptions) -> String {
    let noun = if count == 1 {
        "hidden transaction"
    } else {
        "hidden transactions"
    };
    let message = format!("-- {count} {noun} --");
    if opts.color {
        message.dimmed().to_string()
    } else {
        message
    }
}

#[derive(Debug, Serialize)]
pub struct TraceReport {
    pub trace_id: String,
    pub trace_type: TraceType,
    pub info: Option<TraceInfo>,
    pub rows: Vec<RowReport>,
    pub hidden_below: usize,
}

#[derive(Debug, Serialize)]
pub struct RowReport {
    pub index: usize,
    pub kind: &'static str,
    pub event_id: Option<String>,
    pub label: String,
    pub generation: u32,
    pub is_orphan: bool,
    pub is_visible: bool,
    pub hidden_above: usize,
    pub continuing_depths: Vec<DepthReport>,
    pub bar: Option<BarReport>,
}

#[derive(Debug, Serialize)]
pub struct DepthReport {
    pub depth: u32,
    pub is_orphan_depth: bool,
}

#[derive(Debug, Serialize)]
pub struct BarReport {
    pub start: f64,
    pub width: f64,
}

pub fn trace_report(
    trace_id: &str,
    trace_type: TraceType,
    info: Option<&TraceInfo>,
    flat: &FlattenedTrace<'_>,
) -> TraceReport {
    let bounds = info.map(TimelineBounds::new);

    let rows = flat
        .rows
        .iter()
        .map(|row| {
            let kind = match row.entry {
                RowEntry::TraceRoot => "trace_root",
                RowEntry::Transaction(_) => "transaction",
                RowEntry::OrphanError(_) => "orphan_error",
            };
            let bar = bounds.as_ref().and_then(|bounds| match row.time_window() {
                Some((start, end)) => {
                    let bar = bounds.bar(start, end);
                    Some(BarReport {
                        start: bar.start,
                        width: bar.width,
                    })
                }
                None => matches!(row.entry, RowEntry::TraceRoot).then_some(BarReport {
                    start: 0.0,
                    width: 1.0,
                }),
            });

            RowReport {
                index: row.index,
                kind,
                event_id: row.event_id().map(str::to_string),
                label: row.label(),
                generation: row.generation,
                is_orphan: row.is_orphan,
                is_visible: row.is_visible,
                hidden_above: row.hidden_above,
                continuing_depths: row
                    .continuing_depths
                    .iter()
                    .map(|d| DepthReport {
                        depth: d.depth,
                        is_orphan_depth: d.is_orphan_depth,
                    })
                    .collect(),
                bar,
            }
        })
        .collect();

    TraceReport {
        trace_id: trace_id.to_string(),
        trace_type,
        info: info.cloned(),
        rows,
        hidden_below: flat.hidden_below,
    }
}
