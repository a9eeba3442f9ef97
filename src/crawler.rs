use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::config::{Config, HttpConfig};
use crate::error::Result;
use crate::metrics;
use crate::normalize::{MeetingNormalizer, SourceAdapter};
use crate::types::Meeting;

/// Source of parsed JSON payloads
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let payload = response.json::<serde_json::Value>().await?;
        Ok(payload)
    }
}

/// Summary of one crawl over all start URLs of a spider
#[derive(Debug, Default)]
pub struct CrawlResult {
    pub meetings: Vec<Meeting>,
    pub errors: Vec<String>,
}

/// Fetch every start URL of `adapter` and normalize the responses.
///
/// A URL that cannot be fetched or whose payload is malformed is recorded in
/// `errors`; the remaining URLs are still crawled.
#[instrument(skip_all, fields(spider = adapter.spider_name()))]
pub async fn crawl(
    adapter: Arc<dyn SourceAdapter>,
    config: &Config,
    fetcher: &dyn Fetcher,
    now: NaiveDateTime,
) -> CrawlResult {
    let normalizer = MeetingNormalizer::new(adapter.clone(), now);
    let mut result = CrawlResult::default();

    for url in adapter.start_urls(config) {
        let payload = match fetcher.fetch_json(&url).await {
            Ok(payload) => {
                metrics::sources::request_success();
                payload
            }
            Err(e) => {
                metrics::sources::request_error();
                error!(url = %url, "Fetch failed: {}", e);
                result.errors.push(format!("{}: {}", url, e));
                continue;
            }
        };

        let normalized = normalizer.normalize_payload(&payload, &url);
        match normalized {
            Ok(meetings) => {
                let before = result.meetings.len();
                result.meetings.extend(meetings);
                info!(url = %url, meetings = result.meetings.len() - before, "Normalized response");
            }
            Err(e) => result.errors.push(format!("{}: {}", url, e)),
        };
    }

    result
}
