use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default window for continuously recomputed analytics rules.
pub const ANALYTICS_COOLDOWN_SECS: i64 = 30;

/// Default window for discrete operational rules (8 hours).
pub const OPERATIONAL_COOLDOWN_SECS: i64 = 8 * 60 * 60;

/// Last-fired bookkeeping keyed by rule identity.
///
/// Timestamps are kept as milliseconds since the Unix epoch. Entries are
/// overwritten on every firing and never removed; the key space is the
/// fixed set of registered rule ids.
#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    last_fired: HashMap<String, i64>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `rule_id` has never fired or at least `window` has elapsed
    /// since it last did.
    pub fn can_fire(&self, rule_id: &str, window: Duration, now: DateTime<Utc>) -> bool {
        match self.last_fired.get(rule_id) {
            None => true,
            Some(last) => now.timestamp_millis() - last >= window.num_milliseconds(),
        }
    }

    pub fn record_fired(&mut self, rule_id: &str, now: DateTime<Utc>) {
        self.last_fired
            .insert(rule_id.to_string(), now.timestamp_millis());
    }

    pub fn last_fired(&self, rule_id: &str) -> Option<DateTime<Utc>> {
        self.last_fired
            .get(rule_id)
            .and_then(|ms| DateTime::from_timestamp_millis(*ms))
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.last_fired.clear();
    }
}

/// The two cooldown classes the dashboards use. The boundary between them is
/// policy; each rule's window can still be overridden individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownClass {
    Analytics,
    Operational,
}

impl std::fmt::Display for CooldownClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analytics => write!(f, "analytics"),
            Self::Operational => write!(f, "operational"),
        }
    }
}

impl std::str::FromStr for CooldownClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analytics" | "short" => Ok(Self::Analytics),
            "operational" | "long" => Ok(Self::Operational),
            _ => Err(format!("unknown cooldown class: {s}")),
        }
    }
}

/// Resolves the cooldown window for a rule from its class and any per-rule
/// override.
#[derive(Debug, Clone)]
pub struct CooldownPolicy {
    pub analytics: Duration,
    pub operational: Duration,
    pub overrides: HashMap<String, Duration>,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            analytics: Duration::seconds(ANALYTICS_COOLDOWN_SECS),
            operational: Duration::seconds(OPERATIONAL_COOLDOWN_SECS),
            overrides: HashMap::new(),
        }
    }
}

impl CooldownPolicy {
    pub fn window(&self, rule_id: &str, class: CooldownClass) -> Duration {
        if let Some(window) = self.overrides.get(rule_id) {
            return *window;
        }
        match class {
            CooldownClass::Analytics => self.analytics,
            CooldownClass::Operational => self.operational,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn unknown_rule_may_fire() {
        let tracker = CooldownTracker::new();
        assert!(tracker.can_fire("revenue-target", Duration::hours(8), t0()));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut tracker = CooldownTracker::new();
        tracker.record_fired("revenue-target", t0());

        let window = Duration::seconds(30);
        assert!(!tracker.can_fire("revenue-target", window, t0() + Duration::milliseconds(29_999)));
        assert!(tracker.can_fire("revenue-target", window, t0() + window));
    }

    #[test]
    fn rules_are_tracked_independently() {
        let mut tracker = CooldownTracker::new();
        tracker.record_fired("revenue-target", t0());
        assert!(tracker.can_fire("revenue-low", Duration::hours(8), t0()));
        assert_eq!(tracker.last_fired("revenue-target"), Some(t0()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn override_beats_class_window() {
        let mut policy = CooldownPolicy::default();
        policy
            .overrides
            .insert("vehicle-shortage".into(), Duration::minutes(5));

        assert_eq!(
            policy.window("vehicle-shortage", CooldownClass::Operational),
            Duration::minutes(5)
        );
        assert_eq!(
            policy.window("unused-vehicles", CooldownClass::Operational),
            Duration::hours(8)
        );
        assert_eq!(
            policy.window("daily-ticket-goal", CooldownClass::Analytics),
            Duration::seconds(30)
        );
    }
}
