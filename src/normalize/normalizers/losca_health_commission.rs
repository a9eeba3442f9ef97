use chrono::NaiveDateTime;

use super::base::{NormalizerUtils, SourceAdapter};
use crate::config::Config;
use crate::constants::{
    HEALTH_COMMISSION_ADDRESS, HEALTH_COMMISSION_AGENCY, HEALTH_COMMISSION_API,
    HEALTH_COMMISSION_NAME, HEALTH_COMMISSION_TIMEZONE, LOSCA_HEALTH_COMMISSION,
    PRIMEGOV_COMPILED_DOCUMENT_URL, PRIMEGOV_MEETING_URL, VIDEO_LINK_TITLE,
};
use crate::error::{Result, ScraperError};
use crate::types::{Classification, Extracted, Link, Location, RawRecord, StartPolicy};

const REQUIRED_FIELDS: &[&str] = &["title", "dateTime", "videoUrl", "documentList"];

/// Adapter for the Health Commission's archived meetings on the PrimeGov portal.
///
/// The API answers with a bare array of meetings. Every meeting is held at
/// City Hall, so the location is fixed.
pub struct LoscaHealthCommissionAdapter;

impl LoscaHealthCommissionAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Portal URL for a compiled document, by `compileOutputType`.
    /// 3 is the HTML meeting page, 1 the compiled agenda.
    fn document_url(output_type: i64, template_id: &str) -> Option<String> {
        match output_type {
            3 => Some(format!("{}{}", PRIMEGOV_MEETING_URL, template_id)),
            1 => Some(format!(
                "{}{}&compileOutputType=1",
                PRIMEGOV_COMPILED_DOCUMENT_URL, template_id
            )),
            _ => None,
        }
    }
}

impl Default for LoscaHealthCommissionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for LoscaHealthCommissionAdapter {
    fn spider_name(&self) -> &'static str {
        LOSCA_HEALTH_COMMISSION
    }

    fn agency(&self) -> &'static str {
        HEALTH_COMMISSION_AGENCY
    }

    fn timezone(&self) -> &'static str {
        HEALTH_COMMISSION_TIMEZONE
    }

    fn start_urls(&self, config: &Config) -> Vec<String> {
        let settings = &config.losca_health_commission;
        vec![format!(
            "{}?year={}&committeeId={}",
            HEALTH_COMMISSION_API, settings.year, settings.committee_id
        )]
    }

    fn records<'a>(&self, payload: &'a serde_json::Value) -> Result<&'a [RawRecord]> {
        payload.as_array().map(|items| items.as_slice()).ok_or_else(|| {
            ScraperError::MalformedPayload(format!(
                "expected a list of meetings, got {}",
                NormalizerUtils::json_kind(payload)
            ))
        })
    }

    fn required_fields(&self) -> &'static [&'static str] {
        REQUIRED_FIELDS
    }

    fn start_policy(&self) -> StartPolicy {
        StartPolicy::Null
    }

    fn extract_title(&self, item: &RawRecord) -> String {
        NormalizerUtils::extract_str(item, "title")
    }

    fn extract_classification(&self, _item: &RawRecord) -> Extracted<Classification> {
        Extracted::Matched(Classification::Commission)
    }

    fn extract_start(&self, item: &RawRecord) -> Result<NaiveDateTime> {
        NormalizerUtils::parse_datetime(item.get("dateTime").and_then(|v| v.as_str()))
    }

    fn extract_location(&self, _item: &RawRecord) -> Extracted<Location> {
        Extracted::Matched(Location {
            name: HEALTH_COMMISSION_NAME.to_string(),
            address: HEALTH_COMMISSION_ADDRESS.to_string(),
        })
    }

    fn extract_links(&self, item: &RawRecord) -> Vec<Link> {
        let mut links = Vec::new();

        let video = NormalizerUtils::extract_str(item, "videoUrl");
        if !video.trim().is_empty() {
            links.push(Link {
                href: video,
                title: VIDEO_LINK_TITLE.to_string(),
            });
        }

        let documents = item
            .get("documentList")
            .and_then(|v| v.as_array())
            .map(|docs| docs.as_slice())
            .unwrap_or_default();

        for document in documents {
            let Some(output_type) = document.get("compileOutputType").and_then(|v| v.as_i64()) else {
                continue;
            };
            // templateId arrives as a number, occasionally as a string
            let template_id = match document.get("templateId") {
                Some(serde_json::Value::Number(n)) => n.to_string(),
                Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
                _ => continue,
            };
            if let Some(href) = Self::document_url(output_type, &template_id) {
                links.push(Link {
                    href,
                    title: NormalizerUtils::extract_str(document, "templateName"),
                });
            }
        }

        links
    }
}
