use anyhow::bail;
use chrono::Duration;
use fleetwatch_alert::cooldown::{
    CooldownPolicy, ANALYTICS_COOLDOWN_SECS, OPERATIONAL_COOLDOWN_SECS,
};
use fleetwatch_alert::profiles::{Profile, ProfileSettings, Targets};
use fleetwatch_store::DEFAULT_RETENTION;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_profile")]
    pub profile: Profile,
    /// Seconds between evaluation passes.
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
    #[serde(default)]
    pub feed: FeedConfig,
    /// JSON file the notification feed is mirrored to.
    #[serde(default = "default_store_path")]
    pub store_path: String,
    /// Set to false to keep the feed in memory only.
    #[serde(default = "default_persist")]
    pub persist: bool,
    #[serde(default = "default_retention")]
    pub retention: usize,
    #[serde(default)]
    pub cooldown: CooldownConfig,
    /// Glob patterns of rule ids to switch off, e.g. `"revenue-*"`.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    #[serde(default)]
    pub targets: Targets,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedConfig {
    /// Random-walk demo data. A fixed `seed` makes runs repeatable.
    Simulated {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Re-reads a JSON `MetricsSnapshot` file on every tick.
    File { snapshot_path: String },
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::Simulated { seed: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CooldownConfig {
    #[serde(default = "default_analytics_secs")]
    pub analytics_secs: i64,
    #[serde(default = "default_operational_secs")]
    pub operational_secs: i64,
    /// Per-rule windows in seconds, keyed by rule id.
    #[serde(default)]
    pub overrides: HashMap<String, i64>,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            analytics_secs: default_analytics_secs(),
            operational_secs: default_operational_secs(),
            overrides: HashMap::new(),
        }
    }
}

impl CooldownConfig {
    pub fn policy(&self) -> CooldownPolicy {
        CooldownPolicy {
            analytics: Duration::seconds(self.analytics_secs),
            operational: Duration::seconds(self.operational_secs),
            overrides: self
                .overrides
                .iter()
                .map(|(id, secs)| (id.clone(), Duration::seconds(*secs)))
                .collect(),
        }
    }
}

fn default_profile() -> Profile {
    Profile::Admin
}

fn default_tick_secs() -> u64 {
    8
}

fn default_store_path() -> String {
    "data/notifications.json".to_string()
}

fn default_persist() -> bool {
    true
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_analytics_secs() -> i64 {
    ANALYTICS_COOLDOWN_SECS
}

fn default_operational_secs() -> i64 {
    OPERATIONAL_COOLDOWN_SECS
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            tick_secs: default_tick_secs(),
            feed: FeedConfig::default(),
            store_path: default_store_path(),
            persist: default_persist(),
            retention: default_retention(),
            cooldown: CooldownConfig::default(),
            disabled_rules: Vec::new(),
            targets: Targets::default(),
        }
    }
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.tick_secs == 0 {
            bail!("tick_secs must be greater than 0");
        }
        if self.retention == 0 {
            bail!("retention must be greater than 0");
        }
        if self.cooldown.analytics_secs < 0 || self.cooldown.operational_secs < 0 {
            bail!("cooldown windows must not be negative");
        }
        if let Some((id, _)) = self.cooldown.overrides.iter().find(|(_, secs)| **secs < 0) {
            bail!("cooldown override for {id} must not be negative");
        }
        if self.targets.billing_days <= 0.0 {
            bail!("targets.billing_days must be greater than 0");
        }
        Ok(())
    }

    pub fn profile_settings(&self) -> ProfileSettings {
        ProfileSettings {
            cooldowns: self.cooldown.policy(),
            targets: self.targets,
            disabled_rules: self.disabled_rules.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetwatch_alert::cooldown::CooldownClass;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AgentConfig::parse("").unwrap();
        assert_eq!(config.profile, Profile::Admin);
        assert_eq!(config.tick_secs, 8);
        assert_eq!(config.feed, FeedConfig::Simulated { seed: None });
        assert_eq!(config.store_path, "data/notifications.json");
        assert!(config.persist);
        assert_eq!(config.retention, 30);
        assert_eq!(config.targets, Targets::default());

        let settings = config.profile_settings();
        assert_eq!(
            settings.cooldowns.window("revenue-target", CooldownClass::Operational),
            Duration::hours(8)
        );
    }

    #[test]
    fn full_config_parses() {
        let config = AgentConfig::parse(
            r#"
            profile = "super_admin"
            tick_secs = 15
            persist = false
            retention = 50
            disabled_rules = ["revenue-*"]

            [feed]
            kind = "file"
            snapshot_path = "data/snapshot.json"

            [cooldown]
            analytics_secs = 60
            overrides = { "market-concentration" = 600 }

            [targets]
            daily_revenue = 20000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.profile, Profile::SuperAdmin);
        assert_eq!(config.tick_secs, 15);
        assert!(!config.persist);
        assert_eq!(
            config.feed,
            FeedConfig::File {
                snapshot_path: "data/snapshot.json".into()
            }
        );
        assert_eq!(config.targets.daily_revenue, 20000.0);
        assert_eq!(config.targets.daily_tickets, 350.0);

        let settings = config.profile_settings();
        assert_eq!(settings.disabled_rules, vec!["revenue-*".to_string()]);
        assert_eq!(
            settings.cooldowns.window("daily-ticket-goal", CooldownClass::Analytics),
            Duration::seconds(60)
        );
        assert_eq!(
            settings.cooldowns.window("market-concentration", CooldownClass::Operational),
            Duration::minutes(10)
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AgentConfig::parse("tick_secs = 0").is_err());
        assert!(AgentConfig::parse("retention = 0").is_err());
        assert!(AgentConfig::parse("[cooldown]\nanalytics_secs = -1").is_err());
        assert!(AgentConfig::parse("profile = \"root\"").is_err());
    }
}
