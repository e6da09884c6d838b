//! HTTP JSON feed source.
//!
//! `GET <url>?keyword=<kw>` must return a JSON array of raw post records.
//! Records are decoded one by one; malformed records are dropped and counted.

use std::time::Duration;

use pulse_core::{AppConfig, FeedSourceConfig};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::breaker::CircuitBreaker;
use crate::error::IngestionError;
use crate::records::decode_records;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::SignalBatch;

/// Network policy shared by every feed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub breaker_threshold: u32,
    pub breaker_cooldown: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff_base_ms: 250,
            breaker_threshold: 3,
            breaker_cooldown: Duration::from_secs(60),
        }
    }
}

impl FeedSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.source_timeout_secs),
            max_retries: config.source_max_retries,
            backoff_base_ms: config.source_backoff_ms,
            breaker_threshold: config.breaker_threshold,
            breaker_cooldown: Duration::from_secs(config.breaker_cooldown_secs),
        }
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_base_ms: self.backoff_base_ms,
        }
    }
}

#[derive(Debug)]
pub struct FeedSource {
    name: String,
    url: Url,
    client: Client,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
}

impl FeedSource {
    /// # Errors
    ///
    /// Returns [`IngestionError::InvalidSource`] if the URL does not parse or
    /// is not http(s), or [`IngestionError::Http`] if the client cannot be built.
    pub fn new(config: &FeedSourceConfig, settings: &FeedSettings) -> Result<Self, IngestionError> {
        let url = Url::parse(&config.url).map_err(|e| {
            IngestionError::InvalidSource(format!("source '{}' url '{}': {e}", config.name, config.url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(IngestionError::InvalidSource(format!(
                "source '{}' url must be http(s), got '{}'",
                config.name,
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .user_agent("foodpulse/0.1 (trend-signals)")
            .build()?;

        Ok(Self {
            name: config.name.clone(),
            url,
            client,
            retry: settings.retry_policy(),
            breaker: CircuitBreaker::new(settings.breaker_threshold, settings.breaker_cooldown),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// # Errors
    ///
    /// Returns [`IngestionError::CircuitOpen`] without touching the network
    /// while the breaker is open; otherwise the last error after retries.
    pub async fn fetch_recent_signals(&self, keyword: &str) -> Result<SignalBatch, IngestionError> {
        if !self.breaker.allow().await {
            return Err(IngestionError::CircuitOpen {
                source_name: self.name.clone(),
            });
        }

        let result = retry_with_backoff(&self.name, self.retry, || {
            self.fetch_once(keyword)
        })
        .await;

        match &result {
            Ok(_) => self.breaker.record_success().await,
            Err(e) => {
                if self.breaker.record_failure().await {
                    tracing::warn!(
                        source = %self.name,
                        error = %e,
                        "circuit opened after repeated failures"
                    );
                }
            }
        }

        result
    }

    fn build_url(&self, keyword: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("keyword", keyword);
        url
    }

    async fn fetch_once(&self, keyword: &str) -> Result<SignalBatch, IngestionError> {
        let response = self.client.get(self.build_url(keyword)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::UnexpectedStatus {
                source_name: self.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let records: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| IngestionError::Decode {
                source_name: self.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(decode_records(&self.name, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> FeedSourceConfig {
        FeedSourceConfig {
            name: "partner".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn build_url_appends_encoded_keyword() {
        let source =
            FeedSource::new(&config("https://signals.example.com/v1/posts?lang=en"), &FeedSettings::default())
                .unwrap();
        assert_eq!(
            source.build_url("avocado toast").as_str(),
            "https://signals.example.com/v1/posts?lang=en&keyword=avocado+toast"
        );
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = FeedSource::new(&config("file:///etc/passwd"), &FeedSettings::default()).unwrap_err();
        assert!(matches!(err, IngestionError::InvalidSource(_)));
    }

    #[test]
    fn unparseable_url_is_rejected() {
        let err = FeedSource::new(&config("not a url"), &FeedSettings::default()).unwrap_err();
        assert!(matches!(err, IngestionError::InvalidSource(_)));
    }
}
