//! Pulse runs: assemble observations from the selected source, then score them.
//!
//! Two source modes are supported. `mock` scores the synthetic trend catalogue
//! with a seeded generator. `social` pulls posts for each configured entity
//! from the source registry and scores them against stored history or a
//! series derived from the posts.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::{Duration, Instant};

use futures::future::join_all;
use pulse_core::{AppConfig, PlatformProfiles, PulseFile};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::aggregator::{entity_totals, platform_totals, signals_to_series};
use crate::agreement::{agreement, leader, normalize};
use crate::error::PulseError;
use crate::orchestrator::{self, EntityObservation};
use crate::sources::{collect_signals, CollectedSignals, FeedSettings, SourceRegistry};
use crate::synthetic::{dummy_signals, generate_mock_series, mock_trends, MOCK_BASE_LEVEL};
use crate::types::{InsightReport, SignalDiagnostics, SocialPlatform, SocialSignal, TrackedEntity};

/// Where a run's observations come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    #[default]
    Mock,
    Social,
}

impl InsightSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InsightSource::Mock => "mock",
            InsightSource::Social => "social",
        }
    }

    /// A seed only drives the mock catalogue; social runs read whatever the
    /// registry returns.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Validation`] when a seed accompanies `social`.
    pub fn check_seed(self, seed: Option<u64>) -> Result<Option<u64>, PulseError> {
        match (self, seed) {
            (InsightSource::Social, Some(_)) => Err(PulseError::Validation {
                field: "seed".to_string(),
                reason: "only applies to the mock source".to_string(),
            }),
            _ => Ok(seed),
        }
    }
}

impl std::fmt::Display for InsightSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsightSource {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(InsightSource::Mock),
            "social" => Ok(InsightSource::Social),
            _ => Err(PulseError::UnknownSource(s.to_string())),
        }
    }
}

/// Validated, shareable state for pulse runs.
#[derive(Debug)]
pub struct PulseContext {
    pub profiles: PlatformProfiles,
    /// Entities scored in social mode, in configured order.
    pub entities: Vec<TrackedEntity>,
    pub registry: SourceRegistry,
    pub series_days: usize,
    /// Overall budget for one run; `None` disables the deadline.
    pub deadline: Option<Duration>,
    /// Seed for mock runs when the caller does not pass one.
    pub default_seed: u64,
}

impl PulseContext {
    /// Build the context from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Ingestion`] if a feed source cannot be constructed.
    pub fn from_config(file: PulseFile, config: &AppConfig) -> Result<Self, PulseError> {
        let registry = SourceRegistry::from_config(
            &file.sources,
            &FeedSettings::from_app_config(config),
            config.mock_seed,
        )?;

        Ok(Self {
            profiles: file.platforms,
            entities: file.entities.into_iter().map(TrackedEntity::from).collect(),
            registry,
            series_days: config.series_days,
            deadline: (config.deadline_ms > 0).then(|| Duration::from_millis(config.deadline_ms)),
            default_seed: config.mock_seed,
        })
    }
}

/// Seeded observations for the mock catalogue.
///
/// Each trend draws its series and then its posts from the same RNG, so a
/// seed fixes the whole run.
#[must_use]
pub fn mock_observations(seed: u64, days: usize) -> Vec<EntityObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    mock_trends()
        .into_iter()
        .map(|trend| {
            let series = generate_mock_series(&mut rng, days, MOCK_BASE_LEVEL, trend.spike);
            let signals = dummy_signals(&mut rng, &trend.entity.name);
            EntityObservation {
                entity: trend.entity,
                series,
                signals,
            }
        })
        .collect()
}

/// Score every entity for `source`.
///
/// # Errors
///
/// Returns [`PulseError::Validation`] when an entity carries an out-of-range
/// context score. Source failures never error; they are reported in
/// [`InsightReport::warnings`].
pub async fn compute_insights(
    ctx: &PulseContext,
    source: InsightSource,
    seed: Option<u64>,
) -> Result<InsightReport, PulseError> {
    let started = Instant::now();
    let deadline = ctx.deadline.map(|budget| started + budget);

    let report = match source {
        InsightSource::Mock => {
            let observations = mock_observations(seed.unwrap_or(ctx.default_seed), ctx.series_days);
            orchestrator::run(&observations, &ctx.profiles, deadline)?
        }
        InsightSource::Social => {
            let gathered = gather_social(ctx, deadline).await;
            let mut report = orchestrator::run(&gathered.observations, &ctx.profiles, deadline)?;
            report.skipped.extend(gathered.timed_out);
            report.warnings = gathered.warnings;
            report.rejected_records = gathered.rejected;
            report
        }
    };

    tracing::info!(
        source = %source,
        insights = report.insights.len(),
        skipped = report.skipped.len(),
        warnings = report.warnings.len(),
        rejected = report.rejected_records,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "pulse run complete"
    );

    Ok(report)
}

/// Per-platform aggregates for the signals a run would see.
pub async fn diagnose(
    ctx: &PulseContext,
    source: InsightSource,
    seed: Option<u64>,
) -> SignalDiagnostics {
    let diagnostics = match source {
        InsightSource::Mock => {
            let signals: Vec<SocialSignal> =
                mock_observations(seed.unwrap_or(ctx.default_seed), ctx.series_days)
                    .into_iter()
                    .flat_map(|o| o.signals)
                    .collect();
            diagnose_batch(&signals, 0, Vec::new())
        }
        InsightSource::Social => {
            let deadline = ctx.deadline.map(|budget| Instant::now() + budget);
            let collected = collect_per_entity(ctx, deadline).await;

            let mut seen: HashSet<(SocialPlatform, String)> = HashSet::new();
            let mut signals = Vec::new();
            let mut rejected = 0;
            let mut warnings = Vec::new();
            let mut timed_out = 0usize;
            for (entity, batch) in ctx.entities.iter().zip(collected) {
                let Some(batch) = batch else {
                    tracing::warn!(entity = %entity.name, "signal collection exceeded deadline");
                    timed_out += 1;
                    continue;
                };
                rejected += batch.rejected;
                push_unique(&mut warnings, batch.warnings);
                for signal in batch.signals {
                    if seen.insert((signal.platform, signal.post_id.clone())) {
                        signals.push(signal);
                    }
                }
            }
            if timed_out > 0 {
                warnings.push(timeout_warning(timed_out));
            }
            diagnose_batch(&signals, rejected, warnings)
        }
    };

    tracing::debug!(
        source = %source,
        signals = diagnostics.signal_count,
        leader = %diagnostics.leader,
        "diagnostics computed"
    );
    diagnostics
}

/// Aggregates for an already-fetched batch.
#[must_use]
pub fn diagnose_batch(
    signals: &[SocialSignal],
    rejected_records: usize,
    warnings: Vec<String>,
) -> SignalDiagnostics {
    let totals = platform_totals(signals);
    let momentum = normalize(&totals);

    SignalDiagnostics {
        signal_count: signals.len(),
        rejected_records,
        agreement: agreement(&momentum),
        leader: leader(&momentum),
        platform_totals: totals,
        platform_momentum: momentum,
        entity_totals: entity_totals(signals),
        warnings,
    }
}

struct SocialGathering {
    observations: Vec<EntityObservation>,
    timed_out: Vec<String>,
    warnings: Vec<String>,
    rejected: usize,
}

/// Collects signals for every entity concurrently, in entity order.
/// `None` marks an entity whose collection did not finish by `deadline`.
async fn collect_per_entity(
    ctx: &PulseContext,
    deadline: Option<Instant>,
) -> Vec<Option<CollectedSignals>> {
    let fetches = ctx.entities.iter().map(|entity| async move {
        let fetch = collect_signals(&ctx.registry, &entity.name);
        match deadline {
            Some(d) => tokio::time::timeout_at(tokio::time::Instant::from_std(d), fetch)
                .await
                .ok(),
            None => Some(fetch.await),
        }
    });
    join_all(fetches).await
}

fn timeout_warning(count: usize) -> String {
    format!("signal collection timed out for {count} entities")
}

async fn gather_social(ctx: &PulseContext, deadline: Option<Instant>) -> SocialGathering {
    let results = collect_per_entity(ctx, deadline).await;

    let mut gathering = SocialGathering {
        observations: Vec::with_capacity(ctx.entities.len()),
        timed_out: Vec::new(),
        warnings: Vec::new(),
        rejected: 0,
    };

    for (entity, result) in ctx.entities.iter().zip(results) {
        let Some(CollectedSignals {
            signals,
            rejected,
            warnings,
        }) = result
        else {
            tracing::warn!(entity = %entity.name, "signal collection exceeded deadline");
            gathering.timed_out.push(entity.name.clone());
            continue;
        };

        gathering.rejected += rejected;
        push_unique(&mut gathering.warnings, warnings);

        let signals: Vec<SocialSignal> = signals
            .into_iter()
            .filter(|s| s.mentions(&entity.name))
            .collect();
        let series = entity
            .history
            .clone()
            .unwrap_or_else(|| signals_to_series(&signals, ctx.series_days));

        gathering.observations.push(EntityObservation {
            entity: entity.clone(),
            series,
            signals,
        });
    }

    if !gathering.timed_out.is_empty() {
        gathering
            .warnings
            .push(timeout_warning(gathering.timed_out.len()));
    }

    gathering
}

fn push_unique(into: &mut Vec<String>, warnings: Vec<String>) {
    for warning in warnings {
        if !into.contains(&warning) {
            into.push(warning);
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
