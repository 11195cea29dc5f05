use tracefall_core::model::TraceInfo;

/// Normalized horizontal geometry for one bar: `start` in view coordinates,
/// `width` as a fraction of the view span. A width of exactly 0 is legal;
/// the minimum visible sliver is the renderer's concern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPosition {
    pub start: f64,
    pub width: f64,
}

/// Maps timestamps from the trace's global window onto a view window
/// (by default `[0, 1]`). Pure and total: degenerate windows never divide
/// by zero and no input produces NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineBounds {
    trace_start: f64,
    delta: f64,
    view_start: f64,
    view_end: f64,
}

impl TimelineBounds {
    pub fn new(info: &TraceInfo) -> Self {
        Self::with_view(info, 0.0, 1.0)
    }

    pub fn with_view(info: &TraceInfo, view_start: f64, view_end: f64) -> Self {
        // A zero-width trace maps every sub-interval to the left edge
        // instead of dividing by zero.
        let delta = info.end_timestamp - info.start_timestamp;
        let delta = if delta == 0.0 { 1.0 } else { delta };

        Self {
            trace_start: info.start_timestamp,
            delta,
            view_start,
            view_end,
        }
    }

    pub fn bar(&self, start_timestamp: f64, end_timestamp: f64) -> BarPosition {
        let span = self.view_end - self.view_start;
        // abs() tolerates records that start a hair before the trace window
        // after independent min-reductions over truncated timestamps.
        let start_fraction = (start_timestamp - self.trace_start).abs() / self.delta;
        let width_fraction = (end_timestamp - start_timestamp).abs() / self.delta;

        let start = self.view_start + start_fraction * span;
        // The left edge of a bar never begins past the right boundary of
        // its track.
        let start = start.min(self.view_end - f64::EPSILON);

        BarPosition {
            start,
            width: width_fraction * span,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn info(start: f64, end: f64) -> TraceInfo {
        TraceInfo {
            start_timestamp: start,
            end_timestamp: end,
            max_generation: 0,
            transactions: HashSet::new(),
            errors: HashSet::new(),
            projects: HashSet::new(),
        }
    }

    #[test]
    fn maps_sub_interval_onto_unit_view() {
        let bounds = TimelineBounds::new(&info(0.0, 10.0));
        let bar = bounds.bar(2.0, 5.0);
        assert!((bar.start - 0.2).abs() < 1e-9);
        assert!((bar.width - 0.3).abs() < 1e-9);
    }

    #[test]
    fn zero_width_trace_never_divides_by_zero() {
        let bounds = TimelineBounds::new(&info(100.0, 100.0));
        let bar = bounds.bar(100.0, 100.0);
        assert_eq!(bar.start, 0.0);
        assert_eq!(bar.width, 0.0);
        assert!(bar.start.is_finite() && bar.width.is_finite());
    }

    #[test]
    fn float_noise_before_the_window_is_tolerated() {
        let bounds = TimelineBounds::new(&info(100.0, 110.0));
        // Record starts a hair before the aggregated trace start.
        let bar = bounds.bar(99.999_999_9, 101.0);
        assert!(bar.start >= 0.0);
        assert!(bar.start < 1e-6);
    }

    #[test]
    fn start_is_clamped_inside_the_right_edge() {
        let bounds = TimelineBounds::new(&info(0.0, 10.0));
        let bar = bounds.bar(10.0, 10.0);
        assert!(bar.start < 1.0);
        let bar = bounds.bar(25.0, 26.0);
        assert!(bar.start < 1.0);
    }

    #[test]
    fn zero_duration_span_keeps_zero_normalized_width() {
        let bounds = TimelineBounds::new(&info(0.0, 10.0));
        let bar = bounds.bar(4.0, 4.0);
        assert!((bar.start - 0.4).abs() < 1e-9);
        assert_eq!(bar.width, 0.0);
    }

    #[test]
    fn custom_view_window_rescales() {
        let bounds = TimelineBounds::with_view(&info(0.0, 10.0), 0.0, 100.0);
        let bar = bounds.bar(2.0, 5.0);
        assert!((bar.start - 20.0).abs() < 1e-9);
        assert!((bar.width - 30.0).abs() < 1e-9);
    }
}
