//! Signal sources and the name-keyed registry the pipeline pulls from.

mod feed;
mod mock;

pub use feed::{FeedSettings, FeedSource};
pub use mock::MockSource;

use std::collections::{BTreeMap, HashSet};

use futures::future::join_all;
use pulse_core::{FeedSourceConfig, RESERVED_SOURCE_NAME};

use crate::error::IngestionError;
use crate::types::{SignalBatch, SocialPlatform, SocialSignal};

/// A configured ingestion adapter.
#[derive(Debug)]
pub enum SignalSource {
    /// Seeded dummy social posts.
    Mock(MockSource),
    /// Remote JSON feed over HTTP.
    Feed(FeedSource),
}

impl SignalSource {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SignalSource::Mock(_) => RESERVED_SOURCE_NAME,
            SignalSource::Feed(feed) => feed.name(),
        }
    }

    /// Fetch recent posts mentioning `keyword`.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError`] when the source cannot be reached, responds
    /// with a non-success status, returns an undecodable payload, or has its
    /// circuit open.
    pub async fn fetch_recent_signals(&self, keyword: &str) -> Result<SignalBatch, IngestionError> {
        match self {
            SignalSource::Mock(mock) => Ok(mock.fetch_recent_signals(keyword)),
            SignalSource::Feed(feed) => feed.fetch_recent_signals(keyword).await,
        }
    }
}

/// Name to source lookup table, selected by configuration.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, SignalSource>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from the pulse file's feed list.
    ///
    /// When no feeds are configured the seeded mock source is registered
    /// instead, so social mode always has something to read.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::InvalidSource`] for a bad feed URL or a
    /// duplicate name, or [`IngestionError::Http`] if a client cannot be built.
    pub fn from_config(
        feeds: &[FeedSourceConfig],
        settings: &FeedSettings,
        mock_seed: u64,
    ) -> Result<Self, IngestionError> {
        let mut registry = Self::new();
        if feeds.is_empty() {
            registry.register(SignalSource::Mock(MockSource::new(mock_seed)))?;
            return Ok(registry);
        }
        for feed in feeds {
            registry.register(SignalSource::Feed(FeedSource::new(feed, settings)?))?;
        }
        Ok(registry)
    }

    /// # Errors
    ///
    /// Returns [`IngestionError::InvalidSource`] if the name is already taken.
    pub fn register(&mut self, source: SignalSource) -> Result<(), IngestionError> {
        let name = source.name().to_string();
        if self.sources.contains_key(&name) {
            return Err(IngestionError::InvalidSource(format!(
                "source '{name}' registered twice"
            )));
        }
        self.sources.insert(name, source);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SignalSource> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Signals gathered from every registered source for one keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedSignals {
    pub signals: Vec<SocialSignal>,
    pub rejected: usize,
    /// One entry per source that failed.
    pub warnings: Vec<String>,
}

/// Fetch `keyword` from all sources concurrently.
///
/// Continues past individual source failures, recording a warning for each.
/// Posts seen from more than one source are kept once, keyed by
/// `(platform, post_id)`.
pub async fn collect_signals(registry: &SourceRegistry, keyword: &str) -> CollectedSignals {
    let fetches = registry
        .sources
        .values()
        .map(|source| async move { (source.name(), source.fetch_recent_signals(keyword).await) });
    let results = join_all(fetches).await;

    let mut collected = CollectedSignals::default();
    let mut seen: HashSet<(SocialPlatform, String)> = HashSet::new();

    for (name, result) in results {
        match result {
            Ok(batch) => {
                tracing::debug!(
                    source = name,
                    keyword,
                    count = batch.signals.len(),
                    rejected = batch.rejected,
                    "collected signals"
                );
                collected.rejected += batch.rejected;
                for signal in batch.signals {
                    if seen.insert((signal.platform, signal.post_id.clone())) {
                        collected.signals.push(signal);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    source = name,
                    keyword,
                    error = %e,
                    "signal source failed, continuing without it"
                );
                collected
                    .warnings
                    .push(format!("source '{name}' unavailable: {e}"));
            }
        }
    }

    collected
}
