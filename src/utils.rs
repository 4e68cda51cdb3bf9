use chrono::{DateTime, Utc};

/// Truncate a long identifier to "0xabcd...ef12" format
pub fn truncate_id(id: &str) -> String {
    if id.len() > 14 && id.is_ascii() {
        format!("{}...{}", &id[..8], &id[id.len() - 4..])
    } else {
        id.to_string()
    }
}

/// Format a timestamp as "Xm ago", "Xh ago", etc. relative to `now`
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();
    if diff < 0 {
        return "just now".to_string();
    }
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Day part of a stacked date, e.g. "Nov 30, 2018"
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %d, %Y").to_string()
}

/// Time part of a stacked date, e.g. "09:00 UTC"
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M UTC").to_string()
}

/// Initials for a user badge
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters.to_uppercase()
    }
}
