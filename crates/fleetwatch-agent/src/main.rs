mod config;
mod dashboard;
mod feed;

use anyhow::{Context, Result};
use config::{AgentConfig, FeedConfig};
use dashboard::{batch_policy, Dashboard};
use feed::{FileFeed, SimulatedFeed, SnapshotProvider};
use fleetwatch_alert::engine::RuleEngine;
use fleetwatch_alert::profiles::build_rules;
use fleetwatch_common::types::MetricsSnapshot;
use fleetwatch_store::{JsonFileMirror, NotificationStore};
use std::path::Path;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config/fleetwatch.toml";

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  fleetwatch [config.toml]                                   Run the notification loop");
    eprintln!("  fleetwatch check <config.toml> <current.json> [prev.json]  Evaluate one snapshot and print the notifications");
}

fn load_config(path: Option<&str>) -> Result<AgentConfig> {
    match path {
        Some(path) => AgentConfig::load(path).with_context(|| format!("failed to load {path}")),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => AgentConfig::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("failed to load {DEFAULT_CONFIG_PATH}")),
        None => {
            tracing::info!("No config file found, using defaults");
            Ok(AgentConfig::default())
        }
    }
}

fn build_dashboard(config: &AgentConfig, persist: bool) -> Dashboard {
    let rules = build_rules(config.profile, &config.profile_settings());
    tracing::info!(profile = %config.profile, count = rules.len(), "Loaded rules");

    let store = if persist {
        NotificationStore::with_mirror(
            config.retention,
            Box::new(JsonFileMirror::new(&config.store_path)),
        )
    } else {
        NotificationStore::new(config.retention)
    };

    Dashboard::new(RuleEngine::new(rules), batch_policy(config.profile), store)
}

fn build_provider(config: &AgentConfig) -> Box<dyn SnapshotProvider> {
    match &config.feed {
        FeedConfig::Simulated { seed } => Box::new(SimulatedFeed::new(*seed)),
        FeedConfig::File { snapshot_path } => Box::new(FileFeed::new(snapshot_path)),
    }
}

fn read_snapshot(path: &str) -> Result<MetricsSnapshot> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {path}"))
}

#[allow(clippy::print_stdout)]
fn run_check(args: &[String]) -> Result<()> {
    let (Some(config_path), Some(current_path)) = (args.get(2), args.get(3)) else {
        print_usage();
        anyhow::bail!("check requires <config.toml> and <current.json> arguments");
    };
    let config = load_config(Some(config_path.as_str()))?;
    let current = read_snapshot(current_path)?;
    let previous = args.get(4).map(|p| read_snapshot(p)).transpose()?;

    let mut dashboard = build_dashboard(&config, false);
    if let Some(previous) = previous {
        dashboard.on_snapshot(previous);
    }
    let kept = dashboard.on_snapshot(current);
    println!("{}", serde_json::to_string_pretty(&kept)?);
    Ok(())
}

async fn run(config: AgentConfig) -> Result<()> {
    let mut dashboard = build_dashboard(&config, config.persist);
    let mut provider = build_provider(&config);
    let mut tick = interval(Duration::from_secs(config.tick_secs));

    tracing::info!(
        profile = %config.profile,
        provider = provider.name(),
        tick_secs = config.tick_secs,
        rules = dashboard.engine().rules().len(),
        stored = dashboard.store().len(),
        unread = dashboard.store().unread_count(),
        "Starting evaluation loop"
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {
                match provider.fetch().await {
                    Ok(snapshot) => {
                        let kept = dashboard.on_snapshot(snapshot);
                        for n in &kept {
                            tracing::info!(
                                rule_id = %n.rule_id,
                                severity = %n.severity,
                                category = %n.category,
                                "{}", n.message
                            );
                        }
                    }
                    Err(e) => {
                        dashboard.on_fetch_failure(&e);
                    }
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutting down gracefully");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fleetwatch_common::id::init(1, 1);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fleetwatch=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("-h" | "--help") => {
            print_usage();
            Ok(())
        }
        Some("check") => run_check(&args),
        path => {
            let config = load_config(path)?;
            run(config).await
        }
    }
}
