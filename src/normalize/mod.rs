use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub mod normalizers;
pub mod registry;

pub use normalizers::{NormalizerUtils, SourceAdapter};
pub use registry::SpiderRegistry;

use crate::constants::ID_PLACEHOLDER;
use crate::error::{Result, ScraperError};
use crate::metrics;
use crate::types::{Meeting, MeetingStatus, RawRecord, StartPolicy};

/// Time segment used in ids of meetings without a start
const MISSING_START_SEGMENT: &str = "000000000000";

/// Turns raw agency records into canonical meetings.
///
/// `now` is the evaluation time used for status; it is fixed when the
/// normalizer is built so a whole batch is judged against the same instant.
pub struct MeetingNormalizer {
    adapter: Arc<dyn SourceAdapter>,
    now: NaiveDateTime,
}

impl MeetingNormalizer {
    pub fn new(adapter: Arc<dyn SourceAdapter>, now: NaiveDateTime) -> Self {
        Self { adapter, now }
    }

    /// Normalize every record of one response payload.
    ///
    /// A payload of the wrong shape fails the whole batch before anything is
    /// yielded. Individual records that cannot be normalized are logged and
    /// skipped. Meetings come out lazily in document order.
    pub fn normalize_payload<'p>(
        &'p self,
        payload: &'p serde_json::Value,
        source_url: &'p str,
    ) -> Result<impl Iterator<Item = Meeting> + 'p> {
        let spider = self.adapter.spider_name();
        let records = match self.adapter.records(payload) {
            Ok(records) => records,
            Err(e) => {
                error!(spider, source_url, "Aborting batch: {}", e);
                metrics::normalize::batch_aborted(spider);
                return Err(e);
            }
        };

        info!(spider, source_url, records = records.len(), "Normalizing batch");
        metrics::normalize::batch_processed(spider);

        Ok(records
            .iter()
            .enumerate()
            .filter_map(move |(index, item)| match self.normalize_record(item, source_url) {
                Ok(meeting) => {
                    metrics::normalize::record_normalized(spider);
                    Some(meeting)
                }
                Err(ScraperError::MissingField(fields)) => {
                    warn!(spider, index, "Skipping record missing required fields: {}", fields);
                    metrics::normalize::record_skipped(spider, "missing_fields");
                    None
                }
                Err(e) => {
                    warn!(spider, index, "Skipping record: {}", e);
                    metrics::normalize::record_skipped(spider, "unparseable_start");
                    None
                }
            }))
    }

    /// Normalize a single record.
    ///
    /// Fails with `MissingField` when required keys are absent, and with
    /// `DateParse` when the start cannot be parsed and the adapter's policy
    /// is to skip such records.
    pub fn normalize_record(&self, item: &RawRecord, source_url: &str) -> Result<Meeting> {
        let adapter = self.adapter.as_ref();
        let spider = adapter.spider_name();

        let missing = NormalizerUtils::missing_fields(item, adapter.required_fields());
        if !missing.is_empty() {
            return Err(ScraperError::MissingField(missing.join(", ")));
        }

        let start = match adapter.extract_start(item) {
            Ok(start) => Some(start),
            Err(e) => match adapter.start_policy() {
                StartPolicy::Skip => return Err(e),
                StartPolicy::Null => {
                    error!(spider, "Keeping record without a start: {}", e);
                    None
                }
            },
        };

        let title = adapter.extract_title(item);
        let description = adapter.extract_description(item);

        let classification = adapter.extract_classification(item);
        if classification.is_fallback() {
            debug!(spider, title = %title, "No classification matched title");
            metrics::normalize::fallback_used(spider, "classification");
        }

        let location = adapter.extract_location(item);
        if location.is_fallback() {
            debug!(spider, address = %location.value().address, "No street address matched; keeping raw text");
            metrics::normalize::fallback_used(spider, "location");
        }

        let status = compute_status(&title, &description, start, self.now);
        let id = compute_id(spider, start, &title);

        Ok(Meeting {
            id,
            title,
            description,
            classification: classification.into_inner(),
            start,
            end: adapter.extract_end(item),
            all_day: adapter.extract_all_day(item),
            time_notes: adapter.extract_time_notes(item),
            location: location.into_inner(),
            links: adapter.extract_links(item),
            source: source_url.to_string(),
            status,
        })
    }
}

/// Status of a meeting as of `now`.
///
/// Cancellation wording in the title or description wins; otherwise a
/// meeting that started strictly before `now` has passed.
pub fn compute_status(
    title: &str,
    description: &str,
    start: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> MeetingStatus {
    let text = format!("{} {}", title, description).to_lowercase();
    if text.contains("cancel") || text.contains("rescheduled") {
        return MeetingStatus::Cancelled;
    }

    match start {
        Some(start) if start < now => MeetingStatus::Passed,
        _ => MeetingStatus::Tentative,
    }
}

/// `{spider}/{YYYYMMDDHHmm}/x/{title_slug}`
pub fn compute_id(spider: &str, start: Option<NaiveDateTime>, title: &str) -> String {
    let start_segment = start
        .map(|s| s.format("%Y%m%d%H%M").to_string())
        .unwrap_or_else(|| MISSING_START_SEGMENT.to_string());

    format!(
        "{}/{}/{}/{}",
        spider,
        start_segment,
        ID_PLACEHOLDER,
        NormalizerUtils::slugify_title(title)
    )
}
