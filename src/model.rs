use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field set scraped from a single wanted-person page, before any cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawScrapedBag {
    pub name: String,
    pub summary: String,
    pub description: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub details: String,
    pub url: String,
}

/// Canonical profile. Empty string means "looked up, not found";
/// `None` means "not applicable".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingPersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub hair: String,
    pub eyes: String,
    pub height: String,
    pub weight: String,
    pub sex: String,
    pub race: String,
    pub missing_since: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image2: Option<String>,
}

impl MissingPersonRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Labelled detail rows in display order.
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Date(s) of Birth Used", self.date_of_birth.as_str()),
            ("Place of Birth", self.place_of_birth.as_str()),
            ("Hair", self.hair.as_str()),
            ("Eyes", self.eyes.as_str()),
            ("Height", self.height.as_str()),
            ("Weight", self.weight.as_str()),
            ("Sex", self.sex.as_str()),
            ("Race", self.race.as_str()),
            ("Missing Since", self.missing_since.as_str()),
        ]
    }

    /// Built-in demo profile shown before anything has been extracted.
    pub fn sample() -> Self {
        Self {
            first_name: "Sarah".into(),
            last_name: "Johnson".into(),
            date_of_birth: "February 22, 1990".into(),
            place_of_birth: "Joplin, Missouri".into(),
            hair: "Light brown".into(),
            eyes: "Blue".into(),
            height: "5'7\" (at the time of her disappearance)".into(),
            weight: "170 pounds (at the time of her disappearance)".into(),
            sex: "Female".into(),
            race: "White".into(),
            missing_since: "July 16, 2018".into(),
            missing_from: Some("Joplin, Missouri".into()),
            image1: None,
            image2: None,
        }
    }
}

/// Age estimate returned by the aged-image service: a number, free text,
/// or the literal `"unknown"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EstimatedAge {
    Years(f64),
    Text(String),
}

impl EstimatedAge {
    pub fn is_known(&self) -> bool {
        match self {
            EstimatedAge::Years(_) => true,
            EstimatedAge::Text(t) => {
                let t = t.trim();
                !t.is_empty() && t != "unknown"
            }
        }
    }
}

impl fmt::Display for EstimatedAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatedAge::Years(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            EstimatedAge::Years(n) => write!(f, "{n}"),
            EstimatedAge::Text(t) => f.write_str(t.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgedImageDescriptor {
    pub image_url: String,
    pub years_progressed: f64,
    #[serde(default)]
    pub estimated_current_age: Option<EstimatedAge>,
}

impl AgedImageDescriptor {
    /// Caption line, e.g. "21 years later (Age 35)".
    pub fn caption(&self) -> String {
        let years = EstimatedAge::Years(self.years_progressed);
        match &self.estimated_current_age {
            Some(age) if age.is_known() => format!("{years} years later (Age {age})"),
            _ => format!("{years} years later"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_camel_case_and_omits_absent() {
        let json = serde_json::to_value(MissingPersonRecord::sample()).unwrap();
        assert_eq!(json["firstName"], "Sarah");
        assert_eq!(json["missingSince"], "July 16, 2018");
        assert_eq!(json["missingFrom"], "Joplin, Missouri");
        assert!(json.get("image1").is_none());
    }

    #[test]
    fn bag_tolerates_missing_keys() {
        let bag: RawScrapedBag = serde_json::from_str(r#"{"name":"Jane Doe"}"#).unwrap();
        assert_eq!(bag.name, "Jane Doe");
        assert!(bag.summary.is_empty());
        assert!(bag.images.is_empty());
    }

    #[test]
    fn descriptor_numeric_age() {
        let d: AgedImageDescriptor = serde_json::from_str(
            r#"{"imageUrl":"https://img/x.png","yearsProgressed":21,"estimatedCurrentAge":35}"#,
        )
        .unwrap();
        assert_eq!(d.caption(), "21 years later (Age 35)");
    }

    #[test]
    fn descriptor_unknown_age_hidden() {
        let d: AgedImageDescriptor = serde_json::from_str(
            r#"{"imageUrl":"https://img/x.png","yearsProgressed":10,"estimatedCurrentAge":"unknown"}"#,
        )
        .unwrap();
        assert_eq!(d.caption(), "10 years later");

        let d: AgedImageDescriptor = serde_json::from_str(
            r#"{"imageUrl":"https://img/x.png","yearsProgressed":10,"estimatedCurrentAge":null}"#,
        )
        .unwrap();
        assert_eq!(d.caption(), "10 years later");
    }

    #[test]
    fn descriptor_text_age() {
        let d: AgedImageDescriptor = serde_json::from_str(
            r#"{"imageUrl":"https://img/x.png","yearsProgressed":5,"estimatedCurrentAge":"mid 30s"}"#,
        )
        .unwrap();
        assert_eq!(d.caption(), "5 years later (Age mid 30s)");
    }
}
