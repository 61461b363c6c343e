use fleetwatch_alert::clock::{Clock, SystemClock};
use fleetwatch_alert::engine::RuleEngine;
use fleetwatch_alert::profiles::{Profile, ANALYTICS_CATEGORY};
use fleetwatch_common::types::{MetricsSnapshot, Notification, Severity};
use fleetwatch_store::{BatchPolicy, NotificationStore};

/// Rule id stamped on the synthetic notification raised when a snapshot
/// cannot be fetched.
pub const FETCH_FAILURE_RULE_ID: &str = "dashboard-fetch";

pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch dashboard data";

/// Per-pass batch policy each profile uses.
pub fn batch_policy(profile: Profile) -> BatchPolicy {
    match profile {
        Profile::Admin => BatchPolicy::prioritize(ANALYTICS_CATEGORY, 2),
        Profile::SuperAdmin | Profile::Driver => BatchPolicy::Limit(3),
        Profile::Live => BatchPolicy::Unlimited,
    }
}

/// One dashboard's notification pipeline: engine, batch policy and feed.
///
/// Each snapshot is evaluated against the one before it; the result is
/// trimmed by the batch policy and prepended to the store.
pub struct Dashboard<C: Clock = SystemClock> {
    engine: RuleEngine<C>,
    policy: BatchPolicy,
    store: NotificationStore,
    previous: Option<MetricsSnapshot>,
}

impl<C: Clock> Dashboard<C> {
    pub fn new(engine: RuleEngine<C>, policy: BatchPolicy, store: NotificationStore) -> Self {
        Self {
            engine,
            policy,
            store,
            previous: None,
        }
    }

    pub fn engine(&self) -> &RuleEngine<C> {
        &self.engine
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// Runs one evaluation pass and returns the notifications that were
    /// stored.
    pub fn on_snapshot(&mut self, snapshot: MetricsSnapshot) -> Vec<Notification> {
        let fired = self.engine.evaluate(&snapshot, self.previous.as_ref());
        let fired_count = fired.len();
        let kept = self.policy.apply(fired);

        if !kept.is_empty() {
            self.store.append(kept.clone());
            tracing::info!(
                fired = fired_count,
                kept = kept.len(),
                unread = self.store.unread_count(),
                "Notifications generated"
            );
        }

        self.previous = Some(snapshot);
        kept
    }

    /// Records a failed fetch as a single error notification. Rules are not
    /// evaluated and the previous snapshot is kept.
    pub fn on_fetch_failure(&mut self, error: &anyhow::Error) -> Notification {
        tracing::warn!(error = %error, "Failed to fetch dashboard data");
        let notification = Notification::new(
            FETCH_FAILURE_RULE_ID,
            Severity::Error,
            "system",
            FETCH_FAILURE_MESSAGE.to_string(),
            self.engine.clock().now(),
        );
        self.store.append(vec![notification.clone()]);
        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use fleetwatch_alert::clock::ManualClock;
    use fleetwatch_alert::profiles::{build_rules, ProfileSettings};
    use fleetwatch_common::types::{counters, CompanyRevenue};
    use fleetwatch_store::{MemoryMirror, DEFAULT_RETENTION};

    fn dashboard(profile: Profile) -> (Dashboard<ManualClock>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        let engine = RuleEngine::with_clock(
            build_rules(profile, &ProfileSettings::default()),
            clock.clone(),
        );
        let store = NotificationStore::new(DEFAULT_RETENTION);
        (Dashboard::new(engine, batch_policy(profile), store), clock)
    }

    fn admin_snapshot(clock: &ManualClock) -> MetricsSnapshot {
        MetricsSnapshot::new(clock.now())
            .with_counter(counters::TODAYS_REVENUE, 12_000.0)
            .with_counter(counters::TODAYS_TICKETS, 300.0)
            .with_counter(counters::TOTAL_REVENUE, 260_000.0)
            .with_counter(counters::TOTAL_TICKETS, 6_000.0)
            .with_counter(counters::DRIVERS_REGISTERED, 120.0)
            .with_counter(counters::ASSIGNED_DRIVERS, 70.0)
            .with_counter(counters::TOTAL_VEHICLES, 100.0)
    }

    #[test]
    fn admin_keeps_all_analytics_and_two_others() {
        let (mut dash, clock) = dashboard(Profile::Admin);
        let kept = dash.on_snapshot(admin_snapshot(&clock));

        let analytics = kept
            .iter()
            .filter(|n| n.category == ANALYTICS_CATEGORY)
            .count();
        let others: Vec<&str> = kept
            .iter()
            .filter(|n| n.category != ANALYTICS_CATEGORY)
            .map(|n| n.rule_id.as_str())
            .collect();
        assert_eq!(analytics, 6);
        assert_eq!(others, vec!["revenue-target", "tickets-high"]);
        assert_eq!(dash.store().len(), 8);
        assert_eq!(dash.store().unread_count(), 8);
    }

    #[test]
    fn operational_rules_dropped_by_policy_still_consume_cooldown() {
        let (mut dash, clock) = dashboard(Profile::Admin);
        dash.on_snapshot(admin_snapshot(&clock));

        clock.advance(Duration::seconds(30));
        let kept = dash.on_snapshot(admin_snapshot(&clock));
        assert!(kept.iter().all(|n| n.category == ANALYTICS_CATEGORY));
        assert!(dash
            .engine()
            .cooldowns()
            .last_fired("driver-utilization-low")
            .is_some());
    }

    #[test]
    fn super_admin_is_limited_to_three() {
        let (mut dash, clock) = dashboard(Profile::SuperAdmin);
        let snap = MetricsSnapshot::new(clock.now()).with_companies(vec![
            CompanyRevenue::new("A", 50_000.0),
            CompanyRevenue::new("B", 30_000.0),
            CompanyRevenue::new("C", 5_000.0),
            CompanyRevenue::new("D", 5_000.0),
            CompanyRevenue::new("E", 0.0),
        ]);
        let kept = dash.on_snapshot(snap);
        let ids: Vec<&str> = kept.iter().map(|n| n.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["top-performer", "low-performers", "market-concentration"]);
    }

    #[test]
    fn live_profile_compares_with_previous_pass() {
        let (mut dash, clock) = dashboard(Profile::Live);
        let first = MetricsSnapshot::new(clock.now())
            .with_counter(counters::TODAYS_REVENUE, 110_000.0);
        assert!(dash.on_snapshot(first).is_empty());

        clock.advance(Duration::seconds(8));
        let second = MetricsSnapshot::new(clock.now())
            .with_counter(counters::TODAYS_REVENUE, 125_000.0);
        let kept = dash.on_snapshot(second);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].message, "Revenue increased by Rs. 15,000 (13.6%).");
    }

    #[test]
    fn fetch_failure_adds_one_error() {
        let (mut dash, _clock) = dashboard(Profile::Driver);
        let n = dash.on_fetch_failure(&anyhow::anyhow!("connection refused"));
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(n.message, FETCH_FAILURE_MESSAGE);
        assert_eq!(dash.store().len(), 1);
        assert_eq!(dash.store().unread_count(), 1);
        assert!(dash.engine().cooldowns().is_empty());
    }

    #[test]
    fn pipeline_writes_through_mirror() {
        let mirror = MemoryMirror::new();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
        let engine = RuleEngine::with_clock(
            build_rules(Profile::Admin, &ProfileSettings::default()),
            clock.clone(),
        );
        let store = NotificationStore::with_mirror(DEFAULT_RETENTION, Box::new(mirror.clone()));
        let mut dash = Dashboard::new(engine, batch_policy(Profile::Admin), store);

        dash.on_snapshot(admin_snapshot(&clock));
        dash.on_fetch_failure(&anyhow::anyhow!("timeout"));
        let persisted = mirror.snapshot();
        assert_eq!(persisted.as_slice(), dash.store().notifications());
        assert_eq!(persisted[0].rule_id, FETCH_FAILURE_RULE_ID);
    }
}
