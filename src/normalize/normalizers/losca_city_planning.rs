use chrono::NaiveDateTime;

use super::base::{NormalizerUtils, SourceAdapter};
use crate::config::Config;
use crate::constants::{
    CITY_PLANNING_AGENCY, CITY_PLANNING_API, CITY_PLANNING_CATEGORIES, CITY_PLANNING_TIMEZONE,
    LOSCA_CITY_PLANNING,
};
use crate::error::{Result, ScraperError};
use crate::types::{Classification, Extracted, Link, Location, RawRecord, StartPolicy};

const REQUIRED_FIELDS: &[&str] = &["Type", "Date"];

const CLASSIFICATIONS: &[(&str, Classification)] = &[
    ("board", Classification::Board),
    ("commission", Classification::Commission),
];

/// Adapter for the Department of City Planning meetings API.
///
/// Payloads look like `{"Entries": [...]}`, one request per meeting
/// category. Venue addresses are buried in a free-text `Address` field.
pub struct LoscaCityPlanningAdapter;

impl LoscaCityPlanningAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoscaCityPlanningAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for LoscaCityPlanningAdapter {
    fn spider_name(&self) -> &'static str {
        LOSCA_CITY_PLANNING
    }

    fn agency(&self) -> &'static str {
        CITY_PLANNING_AGENCY
    }

    fn timezone(&self) -> &'static str {
        CITY_PLANNING_TIMEZONE
    }

    fn start_urls(&self, config: &Config) -> Vec<String> {
        let year = config.losca_city_planning.year;
        CITY_PLANNING_CATEGORIES
            .iter()
            .map(|category| format!("{}/{}/{}", CITY_PLANNING_API, category, year))
            .collect()
    }

    fn records<'a>(&self, payload: &'a serde_json::Value) -> Result<&'a [RawRecord]> {
        let entries = payload.get("Entries").ok_or_else(|| {
            ScraperError::MalformedPayload(format!(
                "expected an object with 'Entries', got {}",
                NormalizerUtils::json_kind(payload)
            ))
        })?;

        entries.as_array().map(|items| items.as_slice()).ok_or_else(|| {
            ScraperError::MalformedPayload(format!(
                "expected 'Entries' to be a list, got {}",
                NormalizerUtils::json_kind(entries)
            ))
        })
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn start_policy(&self) -> StartPolicy {
        StartPolicy::Skip
    }

    fn extract_title(&self, item: &RawRecord) -> String {
        NormalizerUtils::extract_str(item, "Type")
    }

    fn extract_description(&self, item: &RawRecord) -> String {
        NormalizerUtils::extract_str(item, "Note")
    }

    fn extract_classification(&self, item: &RawRecord) -> Extracted<Classification> {
        NormalizerUtils::classify_title(&self.extract_title(item), CLASSIFICATIONS)
    }

    fn extract_start(&self, item: &RawRecord) -> Result<NaiveDateTime> {
        NormalizerUtils::parse_datetime(item.get("Date").and_then(|v| v.as_str()))
    }

    fn extract_location(&self, item: &RawRecord) -> Extracted<Location> {
        let name = NormalizerUtils::extract_str(item, "BoardName");
        NormalizerUtils::extract_address(&NormalizerUtils::extract_str(item, "Address"))
            .map(|address| Location { name, address })
    }

    fn extract_links(&self, item: &RawRecord) -> Vec<Link> {
        [("AgendaLink", "Agenda"), ("AddDocsLink", "AddDocs")]
            .iter()
            .filter_map(|(href_key, title_key)| NormalizerUtils::link_pair(item, href_key, title_key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_start_urls_cover_each_category() {
        let adapter = LoscaCityPlanningAdapter::new();
        let urls = adapter.start_urls(&Config::default());
        assert_eq!(
            urls,
            vec![
                "https://planning.lacity.gov/dcpapi/meetings/api/all/commissions/2024",
                "https://planning.lacity.gov/dcpapi/meetings/api/all/boards/2024",
                "https://planning.lacity.gov/dcpapi/meetings/api/all/hearings/2024",
            ]
        );
    }

    #[test]
    fn test_records_requires_entries_list() {
        let adapter = LoscaCityPlanningAdapter::new();
        assert!(adapter.records(&json!({"Entries": []})).unwrap().is_empty());
        assert!(matches!(
            adapter.records(&json!([])),
            Err(ScraperError::MalformedPayload(_))
        ));
        assert!(matches!(
            adapter.records(&json!({"Entries": "none"})),
            Err(ScraperError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_start_accepts_basic_utc_offset() {
        let adapter = LoscaCityPlanningAdapter::new();
        let item = json!({"Type": "City Planning Commission", "Date": "2024-01-08T18:00:00-0800"});

        let start = adapter.extract_start(&item).unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M").to_string(), "2024-01-08 18:00");
    }

    #[test]
    fn test_location_extracts_street_address() {
        let adapter = LoscaCityPlanningAdapter::new();
        let item = json!({
            "BoardName": "South Valley Area Planning Commission",
            "Address": "Marvin Braude Constituent Service Center, 6262 Van Nuys Boulevard, Van Nuys, CA 91401"
        });

        let location = adapter.extract_location(&item);
        assert!(!location.is_fallback());
        assert_eq!(
            location.into_inner(),
            Location {
                name: "South Valley Area Planning Commission".to_string(),
                address: "6262 Van Nuys Boulevard".to_string(),
            }
        );
    }

    #[test]
    fn test_location_falls_back_to_raw_address() {
        let adapter = LoscaCityPlanningAdapter::new();
        let item = json!({"BoardName": "Cultural Heritage Commission", "Address": "Online via Zoom"});

        let location = adapter.extract_location(&item);
        assert!(location.is_fallback());
        assert_eq!(location.value().address, "Online via Zoom");
    }

    #[test]
    fn test_links_omit_missing_pairs() {
        let adapter = LoscaCityPlanningAdapter::new();
        let item = json!({
            "AgendaLink": null,
            "Agenda": "Agenda",
            "AddDocsLink": "https://planning.lacity.gov/docs/123.pdf",
            "AddDocs": "Additional Documents"
        });

        let links = adapter.extract_links(&item);
        assert_eq!(
            links,
            vec![Link {
                href: "https://planning.lacity.gov/docs/123.pdf".to_string(),
                title: "Additional Documents".to_string(),
            }]
        );
    }
}
