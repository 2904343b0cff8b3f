use crate::models::common::TimestampNs;
use chrono::{NaiveDate, SecondsFormat, TimeZone, Utc};

/// Returns the current time as nanoseconds since epoch.
pub fn get_current_time_ns() -> TimestampNs {
    #[cfg(target_arch = "wasm32")]
    {
        ic_cdk::api::time()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Utc::now().timestamp_nanos_opt().unwrap_or_default().max(0) as TimestampNs
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix, e.g. `2024-01-01T09:30:00.000Z`.
pub fn to_rfc3339(ns: TimestampNs) -> String {
    Utc.timestamp_nanos(ns as i64)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_rfc3339() -> String {
    to_rfc3339(get_current_time_ns())
}

/// Calendar date (UTC) for a timestamp.
pub fn date_of(ns: TimestampNs) -> NaiveDate {
    Utc.timestamp_nanos(ns as i64).date_naive()
}
