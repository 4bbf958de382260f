/// Trim an ISO-8601 timestamp down to its calendar date
///
/// Keeps the first 10 characters (`2024-03-15T00:00:00Z` → `2024-03-15`).
/// Absent or empty input becomes an empty string.
pub fn truncate_date(date: Option<&str>) -> String {
    match date {
        Some(d) if !d.is_empty() => d.chars().take(10).collect(),
        _ => String::new(),
    }
}
