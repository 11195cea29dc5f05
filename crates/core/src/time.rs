use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

pub fn to_datetime(epoch_secs: f64) -> Option<DateTime<Utc>> {
    if !epoch_secs.is_finite() {
        return None;
    }
    let millis = (epoch_secs * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

pub fn format_epoch(epoch_secs: f64) -> String {
    to_datetime(epoch_secs)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_duration_secs(secs: f64) -> String {
    let secs = secs.max(0.0);
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.2}s")
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_millis() {
        assert_eq!(format_epoch(1_700_000_000.25), "2023-11-14T22:13:20.250Z");
    }

    #[test]
    fn non_finite_epoch_is_dashed() {
        assert_eq!(format_epoch(f64::NAN), "-");
        assert_eq!(format_epoch(f64::INFINITY), "-");
    }

    #[test]
    fn formats_durations() {
        assert_eq!(format_duration_secs(0.042), "42ms");
        assert_eq!(format_duration_secs(1.5), "1.50s");
        assert_eq!(format_duration_secs(90.0), "1.5m");
        assert_eq!(format_duration_secs(-3.0), "0ms");
    }
}
