//! Event record types - the corpus this crate answers questions about.

use serde::{Deserialize, Serialize};

/// Era flag for an event's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Era {
    /// Common Era
    #[default]
    #[serde(rename = "CE")]
    Ce,

    /// Before Common Era
    #[serde(rename = "BCE")]
    Bce,
}

/// A historical event record.
///
/// Owned by the external corpus; read-only from this crate's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Store identifier, matched exactly against citation markers
    pub id: String,

    /// Short event title
    pub title: String,

    /// Longer prose description
    pub description: String,

    /// Occurrence year
    pub year: i32,

    /// Full date string if known (e.g. "1066-10-14")
    pub date: Option<String>,

    /// Era the year falls in
    #[serde(default)]
    pub era: Era,

    /// Source book reference if the event came from one
    pub book_reference: Option<String>,

    /// Topic tags, ordered as entered
    #[serde(default)]
    pub tags: Vec<String>,

    /// Region names, ordered as entered
    #[serde(default)]
    pub regions: Vec<String>,

    /// Country names, ordered as entered
    #[serde(default)]
    pub countries: Vec<String>,
}

impl EventRecord {
    /// Create a new event record.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            year,
            date: None,
            era: Era::Ce,
            book_reference: None,
            tags: Vec::new(),
            regions: Vec::new(),
            countries: Vec::new(),
        }
    }

    /// Set the era.
    pub fn with_era(mut self, era: Era) -> Self {
        self.era = era;
        self
    }

    /// Set the full date string.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Add topic tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Add region names.
    pub fn with_regions(mut self, regions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.regions.extend(regions.into_iter().map(|r| r.into()));
        self
    }

    /// Add country names.
    pub fn with_countries(
        mut self,
        countries: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.countries.extend(countries.into_iter().map(|c| c.into()));
        self
    }

    /// Case-insensitive check for a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_fields() {
        let event = EventRecord::new("ev-1", "Battle of Hastings", "Norman conquest", 1066)
            .with_date("1066-10-14")
            .with_tags(["battle", "conquest"])
            .with_regions(["Europe"])
            .with_countries(["England"]);

        assert_eq!(event.year, 1066);
        assert_eq!(event.era, Era::Ce);
        assert_eq!(event.tags, vec!["battle", "conquest"]);
        assert_eq!(event.date.as_deref(), Some("1066-10-14"));
    }

    #[test]
    fn test_has_tag_is_case_insensitive() {
        let event = EventRecord::new("ev-1", "t", "d", 0).with_tags(["Empire"]);
        assert!(event.has_tag("empire"));
        assert!(event.has_tag("EMPIRE"));
        assert!(!event.has_tag("republic"));
    }

    #[test]
    fn test_era_serializes_as_ce_bce() {
        let json = serde_json::to_string(&Era::Bce).unwrap();
        assert_eq!(json, "\"BCE\"");
        let back: Era = serde_json::from_str("\"CE\"").unwrap();
        assert_eq!(back, Era::Ce);
    }
}
