// SPDX-FileCopyrightText: 2026 Chatlink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp helpers.
//!
//! All timestamps are fixed-width RFC 3339 UTC strings with millisecond
//! precision, so lexicographic order equals chronological order and the
//! storage layer can compare them directly in SQL.

use chrono::{DateTime, Utc};

/// Storage timestamp format: `2026-01-01T00:00:00.000Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time in the storage timestamp format.
pub fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Format a `DateTime<Utc>` in the storage timestamp format.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a storage timestamp back into a `DateTime<Utc>`.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Convert a Slack event timestamp (`"1712345678.000200"`, seconds with a
/// microsecond suffix) into a storage timestamp. Returns `None` when the
/// token is not a Slack timestamp.
pub fn slack_ts_to_timestamp(ts: &str) -> Option<String> {
    let (secs, micros) = match ts.split_once('.') {
        Some((whole, frac)) => {
            let secs = whole.parse::<i64>().ok()?;
            // Slack pads to six fractional digits; tolerate fewer.
            let padded = format!("{frac:0<6}");
            let micros = padded.get(..6)?.parse::<u32>().ok()?;
            (secs, micros)
        }
        None => (ts.parse::<i64>().ok()?, 0),
    };
    let dt = DateTime::<Utc>::from_timestamp(secs, micros * 1_000)?;
    Some(format_timestamp(dt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_timestamp_has_fixed_width() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len(), "got: {ts}");
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn slack_ts_converts_to_utc() {
        // 2024-04-05T20:14:38 UTC
        let ts = slack_ts_to_timestamp("1712348078.000200").unwrap();
        assert!(ts.starts_with("2024-04-05T"), "got: {ts}");
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn slack_ts_without_fraction() {
        let ts = slack_ts_to_timestamp("1712348078").unwrap();
        assert!(ts.ends_with(".000Z"), "got: {ts}");
    }

    #[test]
    fn slack_ts_rejects_garbage() {
        assert!(slack_ts_to_timestamp("not-a-ts").is_none());
        assert!(slack_ts_to_timestamp("").is_none());
        assert!(slack_ts_to_timestamp("12.ab").is_none());
    }

    #[test]
    fn parse_round_trips_formatted_timestamps() {
        let ts = now_timestamp();
        let parsed = parse_timestamp(&ts).unwrap();
        assert_eq!(format_timestamp(parsed), ts);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn timestamps_order_lexicographically() {
        let earlier = slack_ts_to_timestamp("1712348078.000200").unwrap();
        let later = slack_ts_to_timestamp("1712348090.000100").unwrap();
        assert!(earlier < later);
    }
}
