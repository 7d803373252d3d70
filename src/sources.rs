//! sources.rs - Acquisition sources tried by the fallback pipeline
//!
//! Each source is one way of obtaining the fundraising total: the push
//! channel, the direct JSON endpoint, or scraping the public page. All three
//! sit behind the `TotalSource` trait so the pipeline (and the tests) can
//! treat them uniformly.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;
use crate::push::PushListener;
use crate::strategies::StrategySet;

/// A validated total together with the tag of whatever produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub total: u64,
    pub source: String,
}

/// One way of acquiring the total.
///
/// `Ok(None)` means the source ran cleanly but saw nothing usable; errors
/// are downgraded to the same outcome by the pipeline.
#[async_trait]
pub trait TotalSource: Send + Sync {
    fn name(&self) -> &str;

    async fn acquire(&self) -> Result<Option<Acquired>, ScrapeError>;
}

/// Pull `progress.total` (or a bare `total`) out of a payload.
fn total_from_payload(payload: &Value) -> Option<u64> {
    payload
        .get("progress")
        .and_then(|p| p.get("total"))
        .or_else(|| payload.get("total"))
        .and_then(Value::as_u64)
}

// ============================================================================
// Push channel
// ============================================================================

pub struct PushChannelSource {
    listener: PushListener,
}

impl PushChannelSource {
    pub fn new(config: &ScraperConfig) -> Self {
        PushChannelSource {
            listener: PushListener::new(
                &config.push_endpoint,
                &config.event_name,
                config.push_timeout,
            ),
        }
    }
}

#[async_trait]
impl TotalSource for PushChannelSource {
    fn name(&self) -> &str {
        "push_channel"
    }

    async fn acquire(&self) -> Result<Option<Acquired>, ScrapeError> {
        let Some(payload) = self.listener.listen().await else {
            return Ok(None);
        };

        match total_from_payload(&payload) {
            Some(total) if total > 0 => Ok(Some(Acquired {
                total,
                source: self.name().to_string(),
            })),
            _ => {
                warn!("push payload had no positive total: {}", payload);
                Ok(None)
            }
        }
    }
}

// ============================================================================
// Direct API
// ============================================================================

pub struct DirectApiSource {
    client: Client,
    url: String,
}

impl DirectApiSource {
    pub fn new(config: &ScraperConfig) -> Self {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .expect("Failed to create HTTP client");

        DirectApiSource {
            client,
            url: config.api_url.clone(),
        }
    }
}

#[async_trait]
impl TotalSource for DirectApiSource {
    fn name(&self) -> &str {
        "direct_api"
    }

    async fn acquire(&self) -> Result<Option<Acquired>, ScrapeError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Network {
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response.json().await?;

        match total_from_payload(&payload) {
            Some(total) if total > 0 => Ok(Some(Acquired {
                total,
                source: self.name().to_string(),
            })),
            _ => Ok(None),
        }
    }
}

// ============================================================================
// Page scrape
// ============================================================================

pub struct PageScrapeSource {
    fetcher: PageFetcher,
    strategies: StrategySet,
    url: String,
}

impl PageScrapeSource {
    pub fn new(config: &ScraperConfig) -> Self {
        let mut fetcher = PageFetcher::new(config.fetch_timeout, config.max_redirects);
        if config.debug_dump {
            fetcher = fetcher.with_debug_dump(config.debug_dump_file());
        }

        PageScrapeSource {
            fetcher,
            strategies: StrategySet::standard(),
            url: config.page_url.clone(),
        }
    }
}

#[async_trait]
impl TotalSource for PageScrapeSource {
    fn name(&self) -> &str {
        "page_scrape"
    }

    async fn acquire(&self) -> Result<Option<Acquired>, ScrapeError> {
        let text = self.fetcher.fetch(&self.url).await?;

        // the winning strategy's id becomes the source tag
        Ok(self.strategies.extract(&text).map(|(total, id)| Acquired {
            total,
            source: id.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_from_nested_payload() {
        let payload = json!({"progress": {"total": 5000000}});
        assert_eq!(total_from_payload(&payload), Some(5_000_000));
    }

    #[test]
    fn test_total_from_flat_payload() {
        let payload = json!({"total": 42});
        assert_eq!(total_from_payload(&payload), Some(42));
    }

    #[test]
    fn test_total_from_junk_payload() {
        assert_eq!(total_from_payload(&json!({"donors": 10})), None);
        assert_eq!(total_from_payload(&json!(null)), None);
        assert_eq!(total_from_payload(&json!({"total": "lots"})), None);
    }
}
