use crate::clock::{Clock, SystemClock};
use crate::cooldown::CooldownTracker;
use crate::{EvalContext, Rule};
use fleetwatch_common::types::{MetricsSnapshot, Notification};
use std::collections::HashMap;

/// Evaluates a registry of rules against incoming snapshots.
///
/// A pass runs to completion under `&mut self`, so the cooldown tracker is
/// never observed half-updated. The engine produces notifications only; the
/// caller decides what to keep and where to store them.
pub struct RuleEngine<C: Clock = SystemClock> {
    rules: Vec<Box<dyn Rule>>,
    cooldowns: CooldownTracker,
    /// Highest level each rule has reported, keyed by rule id.
    reported: HashMap<String, f64>,
    clock: C,
}

impl RuleEngine<SystemClock> {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self::with_clock(rules, SystemClock)
    }
}

impl<C: Clock> RuleEngine<C> {
    pub fn with_clock(rules: Vec<Box<dyn Rule>>, clock: C) -> Self {
        Self {
            rules,
            cooldowns: CooldownTracker::new(),
            reported: HashMap::new(),
            clock,
        }
    }

    /// Rules in registration order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Get a rule by its ID.
    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    /// Add a new rule at the end of the registry.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Remove a rule by ID. Returns true if found and removed.
    pub fn remove_rule(&mut self, id: &str) -> bool {
        let len_before = self.rules.len();
        self.rules.retain(|r| r.id() != id);
        self.rules.len() < len_before
    }

    /// Replace all rules with a new set. Cooldown history and reported
    /// levels are discarded.
    pub fn replace_rules(&mut self, rules: Vec<Box<dyn Rule>>) {
        self.rules = rules;
        self.cooldowns.clear();
        self.reported.clear();
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Highest level the rule has reported, if it ever fired with one.
    pub fn reported_level(&self, rule_id: &str) -> Option<f64> {
        self.reported.get(rule_id).copied()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs one pass and returns the notifications fired, in registration
    /// order. Each firing consumes its rule's cooldown before the next rule
    /// is looked at.
    pub fn evaluate(
        &mut self,
        current: &MetricsSnapshot,
        previous: Option<&MetricsSnapshot>,
    ) -> Vec<Notification> {
        let now = self.clock.now();
        let mut fired = Vec::new();

        for rule in &self.rules {
            let rule_id = rule.id();

            if !self.cooldowns.can_fire(rule_id, rule.cooldown(), now) {
                tracing::debug!(rule_id, "Rule suppressed (cooldown active)");
                continue;
            }

            let ctx = EvalContext {
                current,
                previous,
                now,
                reported: self.reported.get(rule_id).copied(),
            };
            let Some(firing) = rule.evaluate(&ctx) else {
                continue;
            };

            self.cooldowns.record_fired(rule_id, now);
            if let Some(level) = firing.level {
                let entry = self.reported.entry(rule_id.to_string()).or_insert(level);
                *entry = entry.max(level);
            }
            tracing::info!(
                rule_id,
                category = rule.category(),
                severity = %firing.severity,
                "Rule fired"
            );
            fired.push(Notification::new(
                rule_id,
                firing.severity,
                rule.category(),
                firing.message,
                now,
            ));
        }

        fired
    }
}
