pub mod logos;
pub mod render;

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
