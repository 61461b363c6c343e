//! Rule registries for each dashboard role.
//!
//! Every profile is a plain list of rule values in registration order. The
//! cooldown window of each rule is resolved through [`CooldownPolicy`], so a
//! deployment can retune a class or a single rule without touching code.

mod admin;
mod driver;
mod live;
mod super_admin;

use crate::cooldown::{CooldownClass, CooldownPolicy};
use crate::Rule;
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub use admin::{admin_rules, ANALYTICS_CATEGORY};
pub use driver::driver_rules;
pub use live::live_rules;
pub use super_admin::super_admin_rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Admin,
    SuperAdmin,
    Driver,
    /// Simulated feed with snapshot-to-snapshot change alerts.
    Live,
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Driver => write!(f, "driver"),
            Self::Live => write!(f, "live"),
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "super_admin" | "super-admin" | "superadmin" => Ok(Self::SuperAdmin),
            "driver" => Ok(Self::Driver),
            "live" | "demo" => Ok(Self::Live),
            _ => Err(format!("unknown profile: {s}")),
        }
    }
}

/// Business targets the admin profile measures against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "default_daily_revenue")]
    pub daily_revenue: f64,
    #[serde(default = "default_daily_tickets")]
    pub daily_tickets: f64,
    /// Days the cumulative ticket total is averaged over.
    #[serde(default = "default_billing_days")]
    pub billing_days: f64,
}

fn default_daily_revenue() -> f64 {
    10_000.0
}

fn default_daily_tickets() -> f64 {
    350.0
}

fn default_billing_days() -> f64 {
    30.0
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            daily_revenue: default_daily_revenue(),
            daily_tickets: default_daily_tickets(),
            billing_days: default_billing_days(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileSettings {
    pub cooldowns: CooldownPolicy,
    pub targets: Targets,
    /// Glob patterns of rule ids to leave out of the registry.
    pub disabled_rules: Vec<String>,
}

impl ProfileSettings {
    pub(crate) fn window(&self, rule_id: &str, class: CooldownClass) -> Duration {
        self.cooldowns.window(rule_id, class)
    }

    pub fn is_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rules
            .iter()
            .any(|pattern| rule_matches(pattern, rule_id))
    }
}

/// Builds the registry for `profile`, minus any disabled rules.
pub fn build_rules(profile: Profile, settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let rules = match profile {
        Profile::Admin => admin_rules(settings),
        Profile::SuperAdmin => super_admin_rules(settings),
        Profile::Driver => driver_rules(settings),
        Profile::Live => live_rules(settings),
    };

    rules
        .into_iter()
        .filter(|rule| {
            let disabled = settings.is_disabled(rule.id());
            if disabled {
                tracing::debug!(rule_id = rule.id(), "Rule disabled by configuration");
            }
            !disabled
        })
        .collect()
}

fn rule_matches(pattern: &str, rule_id: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    glob_match::glob_match(pattern, rule_id)
}
