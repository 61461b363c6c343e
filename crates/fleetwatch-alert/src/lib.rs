//! Notification rule engine for the fleet dashboards.
//!
//! The engine evaluates an ordered registry of [`Rule`]s against each
//! incoming [`MetricsSnapshot`] (and the one before it), gating every rule
//! through a per-rule cooldown. Built-in rule kinds cover thresholds,
//! banded ratios, snapshot-to-snapshot deltas, milestones, company revenue
//! distributions and driver trip counts. [`profiles`] assembles the
//! registries used by each dashboard role.

pub mod clock;
pub mod cooldown;
pub mod engine;
pub mod expr;
pub mod profiles;
pub mod rules;
pub mod template;


use chrono::{DateTime, Duration, Utc};
use fleetwatch_common::types::{MetricsSnapshot, Severity};

/// Inputs available to a rule during one evaluation pass.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub current: &'a MetricsSnapshot,
    /// The snapshot evaluated in the previous pass, if any.
    pub previous: Option<&'a MetricsSnapshot>,
    pub now: DateTime<Utc>,
    /// Highest [`Firing::level`] this rule has reported so far.
    pub reported: Option<f64>,
}

/// What a rule produces when its condition holds. The engine turns it into a
/// [`fleetwatch_common::types::Notification`].
#[derive(Debug, Clone, PartialEq)]
pub struct Firing {
    pub severity: Severity,
    pub message: String,
    /// Level reached by this firing (e.g. a milestone amount). The engine
    /// keeps the highest one per rule and hands it back in
    /// [`EvalContext::reported`].
    pub level: Option<f64>,
}

/// A named condition/template pair evaluated once per pass.
///
/// Implementations must be pure: the same context always yields the same
/// result. Cooldown and reported-level bookkeeping is done by
/// [`engine::RuleEngine`], never by the rule itself.
pub trait Rule: Send + Sync {
    /// Stable identity used as the cooldown key (e.g. `"revenue-health-check"`).
    fn id(&self) -> &str;

    /// Category tag copied onto every notification this rule produces.
    fn category(&self) -> &str;

    /// Minimum time between two firings of this rule.
    fn cooldown(&self) -> Duration;

    /// Returns a firing if the rule's condition holds, `None` otherwise.
    /// Missing inputs and zero denominators must yield `None`.
    fn evaluate(&self, ctx: &EvalContext<'_>) -> Option<Firing>;
}
