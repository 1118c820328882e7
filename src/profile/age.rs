use chrono::{Datelike, NaiveDate};

const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Parse a loosely formatted calendar date. Month names may be full or
/// abbreviated, in any case. Returns `None` rather than guessing.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim().trim_end_matches('.').trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Whole years between birth and disappearance, or `None` when either date
/// is unparseable or the disappearance precedes the birth.
pub fn age_at_disappearance(date_of_birth: &str, missing_since: &str) -> Option<u32> {
    let born = parse_date(date_of_birth)?;
    let missing = parse_date(missing_since)?;

    let mut years = missing.year() - born.year();
    if (missing.month(), missing.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
