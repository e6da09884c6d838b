use super::*;
use pulse_core::PlatformProfiles;
use pulse_engine::{FeedSettings, PulseContext, SourceRegistry};

#[test]
fn trends_defaults_to_mock_source() {
    let cli = Cli::try_parse_from(["pulse-cli", "trends"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Trends {
            source: InsightSource::Mock,
            seed: None,
            table: false
        }
    ));
}

#[test]
fn trends_accepts_source_seed_and_table() {
    let cli = Cli::try_parse_from([
        "pulse-cli", "trends", "--source", "social", "--seed", "7", "--table",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Trends {
            source: InsightSource::Social,
            seed: Some(7),
            table: true
        }
    ));
}

#[test]
fn unknown_source_is_rejected() {
    let err = Cli::try_parse_from(["pulse-cli", "trends", "--source", "rss"]).unwrap_err();
    assert!(err.to_string().contains("rss"));
}

#[test]
fn negative_seed_is_rejected() {
    assert!(Cli::try_parse_from(["pulse-cli", "debug", "--seed", "-3"]).is_err());
}

#[test]
fn parses_debug_command() {
    let cli = Cli::try_parse_from(["pulse-cli", "debug", "--seed", "9"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Debug {
            source: InsightSource::Mock,
            seed: Some(9)
        }
    ));
}

#[test]
fn parses_check_config_command() {
    let cli =
        Cli::try_parse_from(["pulse-cli", "check-config"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::CheckConfig));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["pulse-cli"]).is_err());
}

#[tokio::test]
async fn table_has_header_and_one_row_per_insight() {
    let ctx = PulseContext {
        profiles: PlatformProfiles::standard(),
        entities: Vec::new(),
        registry: SourceRegistry::from_config(&[], &FeedSettings::default(), 42)
            .expect("mock registry"),
        series_days: 14,
        deadline: None,
        default_seed: 42,
    };
    let report = pulse_engine::compute_insights(&ctx, InsightSource::Mock, Some(42))
        .await
        .expect("mock run");

    let table = pulse::render_table(&report.insights);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), report.insights.len() + 1);
    assert!(lines[0].starts_with("ENTITY"));
    assert!(lines[1].starts_with(&report.insights[0].entity));
}
