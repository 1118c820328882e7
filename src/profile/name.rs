/// Split a display name into (given, family). The first whitespace token is
/// the given name; the rest, single-spaced, is the family name. Particles and
/// suffixes are not special-cased.
pub fn split_name(name: &str) -> (String, String) {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let last = tokens.collect::<Vec<_>>().join(" ");
    (first, last)
}
