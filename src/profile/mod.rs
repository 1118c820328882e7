pub mod age;
pub mod missing;
pub mod name;

use crate::model::{MissingPersonRecord, RawScrapedBag};

pub const LABEL_DATE_OF_BIRTH: &str = "Date(s) of Birth Used";
pub const LABEL_PLACE_OF_BIRTH: &str = "Place of Birth";
pub const LABEL_HAIR: &str = "Hair";
pub const LABEL_EYES: &str = "Eyes";
pub const LABEL_HEIGHT: &str = "Height";
pub const LABEL_WEIGHT: &str = "Weight";
pub const LABEL_SEX: &str = "Sex";
pub const LABEL_RACE: &str = "Race";

const DESCRIPTION_LABELS: &[&str] = &[
    LABEL_DATE_OF_BIRTH,
    LABEL_PLACE_OF_BIRTH,
    LABEL_HAIR,
    LABEL_EYES,
    LABEL_HEIGHT,
    LABEL_WEIGHT,
    LABEL_SEX,
    LABEL_RACE,
];

/// A silent fallback applied while normalizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Description table had no row with this label; empty string used.
    MissingField(&'static str),
    /// Summary's first line had no leading date; used verbatim.
    UnparseableDateLocation(String),
}

/// Bag → record. Never fails: anything missing degrades to an empty string
/// or `None`.
pub fn normalize(bag: &RawScrapedBag) -> MissingPersonRecord {
    let lines = summary_lines(&bag.summary);
    let first_line = lines.first().copied();
    let second_line = lines.get(1).copied();

    let (first_name, last_name) = name::split_name(&bag.name);
    let missing = missing::split_date_location(first_line, second_line);

    let field = |label: &str| bag.description.get(label).cloned().unwrap_or_default();
    let place_of_birth = match bag.description.get(LABEL_PLACE_OF_BIRTH) {
        Some(place) => place.clone(),
        None => second_line.unwrap_or_default().to_string(),
    };

    MissingPersonRecord {
        first_name,
        last_name,
        date_of_birth: field(LABEL_DATE_OF_BIRTH),
        place_of_birth,
        hair: field(LABEL_HAIR),
        eyes: field(LABEL_EYES),
        height: field(LABEL_HEIGHT),
        weight: field(LABEL_WEIGHT),
        sex: field(LABEL_SEX),
        race: field(LABEL_RACE),
        missing_since: missing.since,
        missing_from: missing.from,
        image1: bag.images.first().cloned(),
        image2: bag.images.get(1).cloned(),
    }
}

/// Fallbacks `normalize` would apply to this bag, for logging.
pub fn diagnostics(bag: &RawScrapedBag) -> Vec<Degradation> {
    let mut out: Vec<Degradation> = DESCRIPTION_LABELS
        .iter()
        .filter(|label| !bag.description.contains_key(**label))
        .map(|label| Degradation::MissingField(*label))
        .collect();

    let lines = summary_lines(&bag.summary);
    if let Some(&first) = lines.first() {
        if !missing::split_date_location(Some(first), None).date_matched {
            out.push(Degradation::UnparseableDateLocation(first.to_string()));
        }
    }
    out
}

/// Trimmed, non-blank summary lines.
fn summary_lines(summary: &str) -> Vec<&str> {
    summary
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn bag(name: &str, summary: &str) -> RawScrapedBag {
        RawScrapedBag {
            name: name.into(),
            summary: summary.into(),
            ..Default::default()
        }
    }

    fn full_description() -> BTreeMap<String, String> {
        [
            (LABEL_DATE_OF_BIRTH, "February 22, 1990"),
            (LABEL_PLACE_OF_BIRTH, "Joplin, Missouri"),
            (LABEL_HAIR, "Light brown"),
            (LABEL_EYES, "Blue"),
            (LABEL_HEIGHT, "5'7\""),
            (LABEL_WEIGHT, "170 pounds"),
            (LABEL_SEX, "Female"),
            (LABEL_RACE, "White"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn names() {
        let r = normalize(&bag("Sarah Johnson", ""));
        assert_eq!((r.first_name.as_str(), r.last_name.as_str()), ("Sarah", "Johnson"));

        let r = normalize(&bag("Mary Anne Smith", ""));
        assert_eq!((r.first_name.as_str(), r.last_name.as_str()), ("Mary", "Anne Smith"));
    }

    #[test]
    fn glued_date_and_location() {
        let r = normalize(&bag("A B", "March 19, 2004Montgomery, Vermont"));
        assert_eq!(r.missing_since, "March 19, 2004");
        assert_eq!(r.missing_from.as_deref(), Some("Montgomery, Vermont"));
    }

    #[test]
    fn second_line_location_fallback() {
        let r = normalize(&bag("A B", "July 16, 2018\nJoplin, Missouri"));
        assert_eq!(r.missing_since, "July 16, 2018");
        assert_eq!(r.missing_from.as_deref(), Some("Joplin, Missouri"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let r = normalize(&bag("A B", "\n  July 16, 2018  \n\n   \n Joplin, Missouri \n"));
        assert_eq!(r.missing_since, "July 16, 2018");
        assert_eq!(r.missing_from.as_deref(), Some("Joplin, Missouri"));
    }

    #[test]
    fn unmatched_first_line() {
        let r = normalize(&bag("A B", "Unknown date\nTulsa, Oklahoma"));
        assert_eq!(r.missing_since, "Unknown date");
        assert_eq!(r.missing_from.as_deref(), Some("Tulsa, Oklahoma"));

        let r = normalize(&bag("A B", "Unknown date"));
        assert_eq!(r.missing_since, "Unknown date");
        assert_eq!(r.missing_from, None);
    }

    #[test]
    fn description_fields_mapped() {
        let mut b = bag("Sarah Johnson", "July 16, 2018\nJoplin, Missouri");
        b.description = full_description();
        let r = normalize(&b);
        assert_eq!(r.date_of_birth, "February 22, 1990");
        assert_eq!(r.hair, "Light brown");
        assert_eq!(r.eyes, "Blue");
        assert_eq!(r.height, "5'7\"");
        assert_eq!(r.weight, "170 pounds");
        assert_eq!(r.sex, "Female");
        assert_eq!(r.race, "White");
        assert!(diagnostics(&b).is_empty());
    }

    #[test]
    fn labels_are_case_sensitive() {
        let mut b = bag("A B", "");
        b.description.insert("hair".into(), "Brown".into());
        let r = normalize(&b);
        assert_eq!(r.hair, "");
        assert!(diagnostics(&b).contains(&Degradation::MissingField(LABEL_HAIR)));
    }

    #[test]
    fn place_of_birth_falls_back_to_second_line() {
        let r = normalize(&bag("A B", "Unknown date\nTulsa, Oklahoma"));
        assert_eq!(r.place_of_birth, "Tulsa, Oklahoma");

        let r = normalize(&bag("A B", "Unknown date"));
        assert_eq!(r.place_of_birth, "");

        let mut b = bag("A B", "Unknown date\nTulsa, Oklahoma");
        b.description.insert(LABEL_PLACE_OF_BIRTH.into(), String::new());
        assert_eq!(normalize(&b).place_of_birth, "");
    }

    #[test]
    fn images() {
        let mut b = bag("A B", "");
        assert_eq!(normalize(&b).image1, None);

        b.images = vec!["https://x/1.jpg".into()];
        let r = normalize(&b);
        assert_eq!(r.image1.as_deref(), Some("https://x/1.jpg"));
        assert_eq!(r.image2, None);

        b.images.push("https://x/2.jpg".into());
        b.images.push("https://x/3.jpg".into());
        let r = normalize(&b);
        assert_eq!(r.image2.as_deref(), Some("https://x/2.jpg"));
    }

    #[test]
    fn empty_bag_degrades() {
        let b = RawScrapedBag::default();
        let r = normalize(&b);
        assert_eq!(r, MissingPersonRecord::default());
        assert_eq!(diagnostics(&b).len(), DESCRIPTION_LABELS.len());
    }

    #[test]
    fn unparsed_line_reported() {
        let b = bag("A B", "Sometime in spring\nTulsa");
        assert!(diagnostics(&b)
            .contains(&Degradation::UnparseableDateLocation("Sometime in spring".into())));
    }

    #[test]
    fn idempotent() {
        let mut b = bag("Mary Anne Smith", "March 19, 2004Montgomery, Vermont\nBurlington");
        b.description = full_description();
        b.images = vec!["https://x/1.jpg".into()];
        assert_eq!(normalize(&b), normalize(&b));
    }

    #[test]
    fn age_from_normalized_record() {
        let mut b = bag("Sarah Johnson", "March 19, 2004Montgomery, Vermont");
        b.description = full_description();
        let r = normalize(&b);
        assert_eq!(age::age_at_disappearance(&r.date_of_birth, &r.missing_since), Some(14));
    }
}
