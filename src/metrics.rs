//! Counters for normalization outcomes.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! these calls are no-ops.

/// All metric names used by the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    NormalizeRecordsProcessed,
    NormalizeRecordsSkipped,
    NormalizeFallbacks,
    NormalizeBatchesProcessed,
    NormalizeBatchesAborted,
    SourcesRequestsSuccess,
    SourcesRequestsError,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::NormalizeRecordsProcessed => "city_scrapers_normalize_records_processed_total",
            MetricName::NormalizeRecordsSkipped => "city_scrapers_normalize_records_skipped_total",
            MetricName::NormalizeFallbacks => "city_scrapers_normalize_fallbacks_total",
            MetricName::NormalizeBatchesProcessed => "city_scrapers_normalize_batches_processed_total",
            MetricName::NormalizeBatchesAborted => "city_scrapers_normalize_batches_aborted_total",
            MetricName::SourcesRequestsSuccess => "city_scrapers_sources_requests_success_total",
            MetricName::SourcesRequestsError => "city_scrapers_sources_requests_error_total",
        }
    }
}

pub mod normalize {
    use super::MetricName;

    pub fn record_normalized(spider: &'static str) {
        ::metrics::counter!(MetricName::NormalizeRecordsProcessed.as_str(), "spider" => spider).increment(1);
    }

    /// `reason` is one of `missing_fields` or `unparseable_start`
    pub fn record_skipped(spider: &'static str, reason: &'static str) {
        ::metrics::counter!(
            MetricName::NormalizeRecordsSkipped.as_str(),
            "spider" => spider,
            "reason" => reason
        )
        .increment(1);
    }

    pub fn fallback_used(spider: &'static str, field: &'static str) {
        ::metrics::counter!(
            MetricName::NormalizeFallbacks.as_str(),
            "spider" => spider,
            "field" => field
        )
        .increment(1);
    }

    pub fn batch_processed(spider: &'static str) {
        ::metrics::counter!(MetricName::NormalizeBatchesProcessed.as_str(), "spider" => spider).increment(1);
    }

    pub fn batch_aborted(spider: &'static str) {
        ::metrics::counter!(MetricName::NormalizeBatchesAborted.as_str(), "spider" => spider).increment(1);
    }
}

pub mod sources {
    use super::MetricName;

    pub fn request_success() {
        ::metrics::counter!(MetricName::SourcesRequestsSuccess.as_str()).increment(1);
    }

    pub fn request_error() {
        ::metrics::counter!(MetricName::SourcesRequestsError.as_str()).increment(1);
    }
}
