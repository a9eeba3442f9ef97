use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::error::{Result, ScraperError};
use crate::types::{Classification, Extracted, Link, Location, RawRecord, StartPolicy};

/// Street addresses: a 3-4 digit house number, optionally a range
/// ("123 – 456"), an "and" conjunction or a comma separated second number,
/// then words ending in a street suffix.
static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{3,4}(?:\s?–\s?\d{3,4})?(?:\s?and\s?\d{3,4})?(?:\s?,?\s?\d{3,4})?\s[\w\s]+\b(?:Road|Drive|Boulevard|Avenue))",
    )
    .expect("address pattern is valid")
});

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("slug pattern is valid"));

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];

/// One upstream agency API. Implementations only describe how fields are
/// found in their payload; the shared pipeline does the rest.
pub trait SourceAdapter: Send + Sync {
    /// Spider name, also used as the id prefix
    fn spider_name(&self) -> &'static str;

    fn agency(&self) -> &'static str;

    fn timezone(&self) -> &'static str;

    /// URLs to fetch for one crawl
    fn start_urls(&self, config: &Config) -> Vec<String>;

    /// Locate the list of meeting records inside a response payload.
    /// Fails with `MalformedPayload` when the payload does not have the expected shape.
    fn records<'a>(&self, payload: &'a serde_json::Value) -> Result<&'a [RawRecord]>;

    /// Keys every record must carry to be normalized
    fn required_fields(&self) -> &'static [&'static str];

    fn start_policy(&self) -> StartPolicy;

    fn extract_title(&self, item: &RawRecord) -> String;

    fn extract_description(&self, _item: &RawRecord) -> String {
        String::new()
    }

    fn extract_classification(&self, item: &RawRecord) -> Extracted<Classification>;

    fn extract_start(&self, item: &RawRecord) -> Result<NaiveDateTime>;

    fn extract_end(&self, _item: &RawRecord) -> Option<NaiveDateTime> {
        None
    }

    fn extract_all_day(&self, _item: &RawRecord) -> bool {
        false
    }

    fn extract_time_notes(&self, _item: &RawRecord) -> String {
        String::new()
    }

    fn extract_location(&self, item: &RawRecord) -> Extracted<Location>;

    fn extract_links(&self, item: &RawRecord) -> Vec<Link>;
}

/// Shared field helpers for adapters
pub struct NormalizerUtils;

impl NormalizerUtils {
    /// String value of `key`, or "" when absent, null or not a string
    pub fn extract_str(data: &RawRecord, key: &str) -> String {
        data.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }

    /// Short description of a JSON value's type, for error messages
    pub fn json_kind(value: &serde_json::Value) -> &'static str {
        match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "a list",
            serde_json::Value::Object(_) => "an object",
        }
    }

    /// Keys from `required` that the record does not carry
    pub fn missing_fields(data: &RawRecord, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|key| data.get(**key).is_none())
            .map(|key| key.to_string())
            .collect()
    }

    /// Parse a free-form date/time string into a naive timestamp.
    ///
    /// Offsets in ISO-8601 input are dropped rather than applied. Date-only
    /// input resolves to midnight.
    pub fn parse_datetime(value: Option<&str>) -> Result<NaiveDateTime> {
        let raw = value.map(str::trim).filter(|s| !s.is_empty()).ok_or(ScraperError::DateParse {
            value: value.map(|s| s.to_string()),
        })?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.naive_local());
        }

        // Basic offset form, e.g. "-0800"
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Ok(dt.naive_local());
        }

        if let Some(dt) = DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        {
            return Ok(dt);
        }

        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(ScraperError::DateParse {
                value: Some(raw.to_string()),
            })
    }

    /// Pull street addresses out of free text. Several matches are joined
    /// with ", "; with no match the text comes back unchanged.
    pub fn extract_address(text: &str) -> Extracted<String> {
        let addresses: Vec<&str> = ADDRESS_PATTERN
            .find_iter(text)
            .map(|m| m.as_str())
            .collect();

        if addresses.is_empty() {
            Extracted::Fallback(text.to_string())
        } else {
            Extracted::Matched(addresses.join(", "))
        }
    }

    /// First table entry whose key occurs in the lower-cased title wins
    pub fn classify_title(
        title: &str,
        table: &[(&str, Classification)],
    ) -> Extracted<Classification> {
        let lower = title.to_lowercase();
        table
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, classification)| Extracted::Matched(*classification))
            .unwrap_or(Extracted::Fallback(Classification::NotClassified))
    }

    /// Lowercase, underscore-joined slug of a title
    pub fn slugify_title(title: &str) -> String {
        NON_ALPHANUMERIC
            .replace_all(title, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }

    /// Link from an optional (href, label) pair; None when the href is missing or empty
    pub fn link_pair(data: &RawRecord, href_key: &str, title_key: &str) -> Option<Link> {
        let href = data
            .get(href_key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(Link {
            href: href.to_string(),
            title: Self::extract_str(data, title_key),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = at(2024, 1, 8, 18, 0);
        assert_eq!(NormalizerUtils::parse_datetime(Some("2024-01-08T18:00:00")).unwrap(), expected);
        assert_eq!(NormalizerUtils::parse_datetime(Some("2024-01-08T18:00:00.000")).unwrap(), expected);
        assert_eq!(NormalizerUtils::parse_datetime(Some("2024-01-08 18:00")).unwrap(), expected);
        assert_eq!(NormalizerUtils::parse_datetime(Some("01/08/2024 6:00 PM")).unwrap(), expected);
        assert_eq!(NormalizerUtils::parse_datetime(Some("January 8, 2024 6:00 PM")).unwrap(), expected);
        assert_eq!(
            NormalizerUtils::parse_datetime(Some("01/08/2024")).unwrap(),
            at(2024, 1, 8, 0, 0)
        );
    }

    #[test]
    fn test_parse_datetime_ignores_offset() {
        let parsed = NormalizerUtils::parse_datetime(Some("2024-01-08T18:00:00-08:00")).unwrap();
        assert_eq!(parsed, at(2024, 1, 8, 18, 0));

        let parsed = NormalizerUtils::parse_datetime(Some("2024-01-08T18:00:00-0800")).unwrap();
        assert_eq!(parsed, at(2024, 1, 8, 18, 0));

        let parsed = NormalizerUtils::parse_datetime(Some("2024-01-08T18:00:00.000+0100")).unwrap();
        assert_eq!(parsed, at(2024, 1, 8, 18, 0));
    }

    #[test]
    fn test_parse_datetime_failures() {
        assert!(matches!(
            NormalizerUtils::parse_datetime(None),
            Err(ScraperError::DateParse { value: None })
        ));
        assert!(matches!(
            NormalizerUtils::parse_datetime(Some("next tuesday")),
            Err(ScraperError::DateParse { .. })
        ));
        assert!(NormalizerUtils::parse_datetime(Some("   ")).is_err());
    }

    #[test]
    fn test_extract_address_single_match() {
        let extracted = NormalizerUtils::extract_address("123 Main Boulevard");
        assert_eq!(extracted, Extracted::Matched("123 Main Boulevard".to_string()));
    }

    #[test]
    fn test_extract_address_without_suffix_falls_back() {
        let raw = "City Hall, Room 340";
        let extracted = NormalizerUtils::extract_address(raw);
        assert!(extracted.is_fallback());
        assert_eq!(extracted.into_inner(), raw);
    }

    #[test]
    fn test_extract_address_joins_multiple_matches() {
        let raw = "Meet at 6262 Van Nuys Boulevard; overflow at 1645 Corinth Avenue";
        let extracted = NormalizerUtils::extract_address(raw);
        assert_eq!(
            extracted.into_inner(),
            "6262 Van Nuys Boulevard, 1645 Corinth Avenue"
        );
    }

    #[test]
    fn test_extract_address_range() {
        let extracted = NormalizerUtils::extract_address("1200 – 1250 Sunset Boulevard, Los Angeles");
        assert_eq!(extracted.into_inner(), "1200 – 1250 Sunset Boulevard");
    }

    #[test]
    fn test_classify_title_first_match_wins() {
        let table = [("board", Classification::Board), ("commission", Classification::Commission)];
        assert_eq!(
            NormalizerUtils::classify_title("Board of Public Works", &table),
            Extracted::Matched(Classification::Board)
        );
        assert_eq!(
            NormalizerUtils::classify_title("City Planning Commission", &table),
            Extracted::Matched(Classification::Commission)
        );
        assert_eq!(
            NormalizerUtils::classify_title("Board of Police Commissioners", &table),
            Extracted::Matched(Classification::Board)
        );
        assert_eq!(
            NormalizerUtils::classify_title("Random Meeting", &table),
            Extracted::Fallback(Classification::NotClassified)
        );
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(
            NormalizerUtils::slugify_title("Los Angeles City Health Commission"),
            "los_angeles_city_health_commission"
        );
        assert_eq!(
            NormalizerUtils::slugify_title("  Area Planning Commission - South/Valley! "),
            "area_planning_commission_south_valley"
        );
        assert_eq!(NormalizerUtils::slugify_title(""), "");
    }

    #[test]
    fn test_link_pair_skips_empty_href() {
        let data = json!({
            "AgendaLink": "https://example.com/agenda.pdf",
            "Agenda": "Agenda",
            "AddDocsLink": "",
            "AddDocs": "Additional Documents"
        });
        assert_eq!(
            NormalizerUtils::link_pair(&data, "AgendaLink", "Agenda"),
            Some(Link {
                href: "https://example.com/agenda.pdf".to_string(),
                title: "Agenda".to_string()
            })
        );
        assert_eq!(NormalizerUtils::link_pair(&data, "AddDocsLink", "AddDocs"), None);
        assert_eq!(NormalizerUtils::link_pair(&data, "VideoLink", "Video"), None);
    }

    #[test]
    fn test_missing_fields() {
        let data = json!({"title": "x", "dateTime": null});
        assert_eq!(
            NormalizerUtils::missing_fields(&data, &["title", "dateTime", "videoUrl"]),
            vec!["videoUrl".to_string()]
        );
    }
}
