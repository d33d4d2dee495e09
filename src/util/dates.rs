use chrono::{Local, LocalResult, NaiveDate, TimeZone};

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> i64 {
    Local::now().timestamp_millis()
}

/// The local calendar day an epoch-ms timestamp falls on
pub fn local_date(millis: i64) -> Option<NaiveDate> {
    match Local.timestamp_millis_opt(millis) {
        LocalResult::Single(dt) => Some(dt.date_naive()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.date_naive()),
        LocalResult::None => None,
    }
}

/// Local midnight of `date` as epoch milliseconds.
/// Falls back to the first valid instant when midnight is skipped by DST.
pub fn local_midnight_millis(date: NaiveDate) -> Option<i64> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
        LocalResult::None => {
            let one_am = date.and_hms_opt(1, 0, 0)?;
            Local
                .from_local_datetime(&one_am)
                .earliest()
                .map(|dt| dt.timestamp_millis())
        }
    }
}

/// Parse a `YYYY-MM-DD` due date into local-midnight epoch milliseconds
pub fn parse_due_date(s: &str) -> Result<i64, String> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date: {} (expected YYYY-MM-DD)", s))?;
    local_midnight_millis(date).ok_or_else(|| format!("date does not exist locally: {}", s))
}

/// `YYYY-MM-DD` in local time, empty for unrepresentable timestamps
pub fn format_day(millis: i64) -> String {
    local_date(millis)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Local `HH:MM`
pub fn format_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .earliest()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Long heading form, e.g. `Wednesday, May 14, 2025`
pub fn format_long_day(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
