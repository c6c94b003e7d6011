//! Display labels for numeric Google Ads enum values

/// Campaign, ad group and keyword criterion statuses share one numbering.
const STATUS_LABELS: [&str; 5] = ["UNSPECIFIED", "UNKNOWN", "ENABLED", "PAUSED", "REMOVED"];

const MATCH_TYPE_LABELS: [&str; 5] = ["Unspecified", "Unknown", "Exact", "Phrase", "Broad"];

fn lookup(table: &[&'static str], value: i64, fallback: &'static str) -> &'static str {
    usize::try_from(value).ok().and_then(|idx| table.get(idx).copied()).unwrap_or(fallback)
}

/// `"ENABLED"`, `"PAUSED"` and so on; `"UNKNOWN"` when out of range.
pub fn campaign_status_label(status: i64) -> &'static str {
    lookup(&STATUS_LABELS, status, "UNKNOWN")
}

pub fn ad_group_status_label(status: i64) -> &'static str {
    lookup(&STATUS_LABELS, status, "UNKNOWN")
}

pub fn keyword_status_label(status: i64) -> &'static str {
    lookup(&STATUS_LABELS, status, "UNKNOWN")
}

/// Accepts the numeric value or its decimal string form (`"2"`).
pub fn keyword_match_type_label(match_type: &str) -> &'static str {
    match_type
        .trim()
        .parse::<i64>()
        .map_or("Unknown", |value| lookup(&MATCH_TYPE_LABELS, value, "Unknown"))
}
