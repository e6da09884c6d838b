use super::*;
use crate::types::{Engagement, PlatformLeader};

fn context(entities: Vec<TrackedEntity>) -> PulseContext {
    PulseContext {
        profiles: PlatformProfiles::standard(),
        entities,
        registry: SourceRegistry::from_config(&[], &FeedSettings::default(), 42)
            .expect("mock registry"),
        series_days: 14,
        deadline: None,
        default_seed: 42,
    }
}

#[test]
fn insight_source_parses_case_insensitively() {
    assert_eq!("MOCK".parse::<InsightSource>().unwrap(), InsightSource::Mock);
    assert_eq!(" social ".parse::<InsightSource>().unwrap(), InsightSource::Social);
    assert!(matches!(
        "twitter".parse::<InsightSource>(),
        Err(PulseError::UnknownSource(ref s)) if s == "twitter"
    ));
}

#[test]
fn seed_is_only_accepted_for_mock() {
    assert_eq!(InsightSource::Mock.check_seed(Some(7)).unwrap(), Some(7));
    assert_eq!(InsightSource::Social.check_seed(None).unwrap(), None);
    assert!(matches!(
        InsightSource::Social.check_seed(Some(7)),
        Err(PulseError::Validation { ref field, .. }) if field == "seed"
    ));
}

#[tokio::test]
async fn mock_run_scores_catalogue_in_order() {
    let ctx = context(Vec::new());
    let report = compute_insights(&ctx, InsightSource::Mock, None).await.unwrap();

    let names: Vec<&str> = report.insights.iter().map(|i| i.entity.as_str()).collect();
    assert_eq!(
        names,
        vec!["National Potato Chip Day", "Avocado Toast", "Bubble Tea"]
    );
    for insight in &report.insights {
        assert_eq!(insight.series.len(), 14);
        assert_eq!(insight.current_value, insight.series[13]);
        assert!((0.0..=1.0).contains(&insight.confidence_score));
        assert!(insight.action_window_hours >= 6);
        assert_eq!(insight.platform_bias.len(), 3);
    }
    assert!(!report.is_degraded());
}

#[tokio::test]
async fn mock_run_is_deterministic_per_seed() {
    let ctx = context(Vec::new());
    let a = compute_insights(&ctx, InsightSource::Mock, Some(7)).await.unwrap();
    let b = compute_insights(&ctx, InsightSource::Mock, Some(7)).await.unwrap();
    assert_eq!(a, b);

    let c = compute_insights(&ctx, InsightSource::Mock, Some(8)).await.unwrap();
    assert_ne!(a.insights[0].series, c.insights[0].series);
}

#[tokio::test]
async fn default_seed_is_used_without_override() {
    let ctx = context(Vec::new());
    let implicit = compute_insights(&ctx, InsightSource::Mock, None).await.unwrap();
    let explicit = compute_insights(&ctx, InsightSource::Mock, Some(42)).await.unwrap();
    assert_eq!(implicit, explicit);
}

#[tokio::test]
async fn social_run_uses_configured_entities() {
    let mut ramen = TrackedEntity::new("ramen", "Mains");
    ramen.history = Some(vec![100.0, 110.0, 105.0, 120.0, 160.0]);
    let ctx = context(vec![TrackedEntity::new("nachos", "Snacks"), ramen]);

    let report = compute_insights(&ctx, InsightSource::Social, None).await.unwrap();
    assert_eq!(report.insights.len(), 2);

    let nachos = &report.insights[0];
    assert_eq!(nachos.entity, "nachos");
    assert_eq!(nachos.series.len(), 14);
    assert!(nachos.series.windows(2).all(|w| w[1] >= w[0]), "derived series rises");

    let ramen = &report.insights[1];
    assert_eq!(ramen.series, vec![100.0, 110.0, 105.0, 120.0, 160.0]);
    assert_eq!(ramen.current_value, 160.0);
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn social_run_without_entities_is_empty() {
    let report = compute_insights(&context(Vec::new()), InsightSource::Social, None)
        .await
        .unwrap();
    assert!(report.insights.is_empty());
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn zero_deadline_returns_partial_report() {
    let mut ctx = context(Vec::new());
    ctx.deadline = Some(Duration::ZERO);
    let report = compute_insights(&ctx, InsightSource::Mock, None).await.unwrap();
    assert!(report.insights.is_empty());
    assert_eq!(report.skipped.len(), 3);
    assert!(report.is_degraded());
}

#[tokio::test]
async fn invalid_context_override_is_validation_error() {
    let mut nachos = TrackedEntity::new("nachos", "Snacks");
    nachos.context_confirmation = Some(2.0);
    let ctx = context(vec![nachos]);
    let result = compute_insights(&ctx, InsightSource::Social, None).await;
    assert!(matches!(result, Err(PulseError::Validation { .. })));
}

#[tokio::test]
async fn mock_diagnostics_cover_all_dummy_posts() {
    let diagnostics = diagnose(&context(Vec::new()), InsightSource::Mock, Some(3)).await;
    assert_eq!(diagnostics.signal_count, 9);
    assert_eq!(diagnostics.platform_totals.len(), 3);
    assert!(diagnostics.platform_momentum.values().any(|m| *m == 1.0));
    assert!([0.85, 0.65, 0.4].contains(&diagnostics.agreement));
    assert_eq!(diagnostics.entity_totals["bubble tea"].mention_count, 3);
}

#[tokio::test]
async fn social_diagnostics_merge_entity_batches() {
    let ctx = context(vec![
        TrackedEntity::new("nachos", "Snacks"),
        TrackedEntity::new("boba", "Beverages"),
    ]);
    let diagnostics = diagnose(&ctx, InsightSource::Social, None).await;
    assert_eq!(diagnostics.signal_count, 6);
    assert_eq!(diagnostics.rejected_records, 0);
    assert!(diagnostics.warnings.is_empty());
}

#[test]
fn diagnose_batch_reports_tie_as_both() {
    let signal = |platform: SocialPlatform, likes: u64| SocialSignal {
        platform,
        post_id: format!("{platform}-post"),
        timestamp: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        text: None,
        hashtags: std::collections::BTreeSet::new(),
        food_entities: vec!["nachos".to_string()],
        engagement: Engagement {
            likes,
            ..Engagement::default()
        },
        creator_followers: 1,
        geo: None,
    };
    let batch = vec![
        signal(SocialPlatform::Tiktok, 100),
        signal(SocialPlatform::Instagram, 95),
    ];

    let diagnostics = diagnose_batch(&batch, 2, vec!["source 'x' unavailable".to_string()]);
    assert_eq!(diagnostics.platform_momentum[&SocialPlatform::Instagram], 0.95);
    assert_eq!(diagnostics.agreement, 0.85);
    assert_eq!(diagnostics.leader, PlatformLeader::Both);
    assert_eq!(diagnostics.rejected_records, 2);
    assert_eq!(diagnostics.warnings.len(), 1);
}

#[test]
fn context_from_config_builds_mock_registry_when_no_feeds() {
    let file = pulse_core::parse_pulse_file(
        r"
platforms:
  doordash: { trend_latency_hours: 6, impulse_factor: 0.9, promo_sensitivity: 0.8, data_maturity: 0.85 }
entities:
  - { name: nachos, category: Snacks, holiday_soon: true }
",
    )
    .unwrap();
    let config = AppConfig {
        env: pulse_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "info".to_string(),
        pulse_file_path: "config/pulse.yaml".into(),
        mock_seed: 42,
        series_days: 14,
        deadline_ms: 2000,
        source_timeout_secs: 10,
        source_max_retries: 2,
        source_backoff_ms: 250,
        breaker_threshold: 3,
        breaker_cooldown_secs: 60,
    };

    let ctx = PulseContext::from_config(file, &config).unwrap();
    assert_eq!(ctx.entities.len(), 1);
    assert!(ctx.entities[0].holiday_soon);
    assert_eq!(ctx.registry.names().collect::<Vec<_>>(), vec!["mock"]);
    assert_eq!(ctx.series_days, 14);
    assert_eq!(ctx.deadline, Some(Duration::from_millis(2000)));
}
