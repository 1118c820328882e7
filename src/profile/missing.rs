use std::sync::LazyLock;

use regex::Regex;

// "March 19, 2004" at the start of the line, anything after it.
static LEADING_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+ \d{1,2}, \d{4})(.*)$").unwrap());

/// Resolved "missing since" / "missing from" pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDetails {
    pub since: String,
    pub from: Option<String>,
    /// False when the first line did not start with a recognisable date.
    pub date_matched: bool,
}

/// Split the summary's first line into date and location.
///
/// Fallback chain:
/// 1. leading "Month D, YYYY" date, location = the rest of the line
/// 2. date matched but nothing after it, location = second line
/// 3. no date match, date = first line verbatim, location = second line
///
/// Missing second line means no location (`None`).
pub fn split_date_location(first: Option<&str>, second: Option<&str>) -> MissingDetails {
    let second = second.map(str::to_string);
    let Some(first) = first else {
        return MissingDetails {
            since: String::new(),
            from: second,
            date_matched: false,
        };
    };

    match LEADING_DATE_RE.captures(first) {
        Some(caps) => {
            let rest = caps[2].trim();
            MissingDetails {
                since: caps[1].trim().to_string(),
                from: if rest.is_empty() { second } else { Some(rest.to_string()) },
                date_matched: true,
            }
        }
        None => MissingDetails {
            since: first.to_string(),
            from: second,
            date_matched: false,
        },
    }
}
