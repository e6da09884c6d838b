//! Pulse command handlers for the CLI.
//!
//! Insights and diagnostics go to stdout as JSON; logs and degraded-data
//! warnings go to stderr.

use pulse_core::AppConfig;
use pulse_engine::{compute_insights, diagnose, Insight, InsightSource, PulseContext};

fn load_context(config: &AppConfig) -> anyhow::Result<PulseContext> {
    let file = pulse_core::load_pulse_file(&config.pulse_file_path)?;
    Ok(PulseContext::from_config(file, config)?)
}

/// Score every tracked entity and print the result.
///
/// # Errors
///
/// Returns an error if a seed is paired with the social source, the pulse
/// file is invalid, or an entity carries an out-of-range context override.
/// Source failures only produce warnings.
pub(crate) async fn run_trends(
    config: &AppConfig,
    source: InsightSource,
    seed: Option<u64>,
    table: bool,
) -> anyhow::Result<()> {
    let seed = source.check_seed(seed)?;
    let ctx = load_context(config)?;
    let report = compute_insights(&ctx, source, seed).await?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if !report.skipped.is_empty() {
        eprintln!(
            "warning: deadline passed, skipped: {}",
            report.skipped.join(", ")
        );
    }
    if report.rejected_records > 0 {
        eprintln!(
            "warning: {} malformed records were dropped",
            report.rejected_records
        );
    }

    if table {
        print!("{}", render_table(&report.insights));
    } else {
        println!("{}", serde_json::to_string_pretty(&report.insights)?);
    }
    Ok(())
}

/// Print per-platform aggregates for the signals a run would see.
///
/// # Errors
///
/// Returns an error if a seed is paired with the social source or the pulse
/// file is invalid.
pub(crate) async fn run_debug(
    config: &AppConfig,
    source: InsightSource,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let seed = source.check_seed(seed)?;
    let ctx = load_context(config)?;
    let diagnostics = diagnose(&ctx, source, seed).await;
    println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    Ok(())
}

/// Validate the pulse file against the loaded environment.
///
/// # Errors
///
/// Returns the first configuration error found.
pub(crate) fn run_check_config(config: &AppConfig) -> anyhow::Result<()> {
    let ctx = load_context(config)?;
    let sources: Vec<&str> = ctx.registry.names().collect();

    println!("environment: {:?}", config.env);
    println!("pulse file:  {}", config.pulse_file_path.display());
    println!("platforms:   {}", ctx.profiles.len());
    println!("entities:    {}", ctx.entities.len());
    println!("sources:     {} [{}]", sources.len(), sources.join(", "));
    match ctx.deadline {
        Some(deadline) => println!("deadline:    {}ms", deadline.as_millis()),
        None => println!("deadline:    none"),
    }
    println!("config ok");
    Ok(())
}

pub(crate) fn render_table(insights: &[Insight]) -> String {
    use std::fmt::Write as _;

    let mut out = format!(
        "{:<32}{:<11}{:<8}{:<10}{:<8}URGENCY\n",
        "ENTITY", "STATE", "CONF", "RISK", "HOURS"
    );
    for insight in insights {
        let _ = writeln!(
            out,
            "{:<32}{:<11}{:<8.3}{:<10}{:<8}{}",
            insight.entity,
            insight.momentum_state.to_string(),
            insight.confidence_score,
            insight.risk_level.to_string(),
            insight.action_window_hours,
            insight.urgency
        );
    }
    out
}
