use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counter names shared by the dashboard feeds and the rule profiles.
pub mod counters {
    pub const TODAYS_REVENUE: &str = "todays_revenue";
    pub const TODAYS_TICKETS: &str = "todays_tickets";
    pub const TOTAL_REVENUE: &str = "total_revenue";
    pub const TOTAL_TICKETS: &str = "total_tickets";
    pub const DRIVERS_REGISTERED: &str = "drivers_registered";
    pub const ASSIGNED_DRIVERS: &str = "assigned_drivers";
    pub const TOTAL_VEHICLES: &str = "total_vehicles";
    pub const REVENUE_PER_TICKET: &str = "revenue_per_ticket";
}

/// Notification severity.
///
/// # Examples
///
/// ```
/// use fleetwatch_common::types::Severity;
///
/// let sev: Severity = "warning".parse().unwrap();
/// assert_eq!(sev, Severity::Warning);
/// assert_eq!(sev.to_string(), "warning");
/// assert!(Severity::Error > Severity::Info);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Severity::Success),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// A user-facing notification produced by a fired rule, or synthesized by
/// the feed when a snapshot could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    /// Identity of the rule that fired (e.g. `"revenue-health-check"`).
    pub rule_id: String,
    pub severity: Severity,
    /// Free-form grouping tag such as `"analytics"`, `"revenue"` or `"drivers"`.
    pub category: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notification {
    pub fn new(
        rule_id: &str,
        severity: Severity,
        category: &str,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: crate::id::notification_id(rule_id),
            rule_id: rule_id.to_string(),
            severity,
            category: category.to_string(),
            message,
            created_at,
            read: false,
        }
    }
}

/// Revenue figure for one tenant company on the multi-tenant dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRevenue {
    pub name: String,
    /// Missing revenue is reported as zero.
    #[serde(default)]
    pub revenue: f64,
}

impl CompanyRevenue {
    pub fn new(name: impl Into<String>, revenue: f64) -> Self {
        Self {
            name: name.into(),
            revenue,
        }
    }

    /// Revenue with non-finite values treated as zero.
    pub fn revenue_value(&self) -> f64 {
        if self.revenue.is_finite() {
            self.revenue
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    InTransit,
    Completed,
    Cancelled,
}

/// One bus trip assigned to the signed-in driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub departure_time: Option<NaiveTime>,
    pub status: TripStatus,
}

/// A point-in-time read of dashboard metrics.
///
/// Counters are looked up by name; a counter that is missing or not a finite
/// number reads as absent, which makes every rule depending on it skip.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use fleetwatch_common::types::{counters, MetricsSnapshot};
///
/// let snap = MetricsSnapshot::new(Utc::now())
///     .with_counter(counters::TODAYS_REVENUE, 12000.0)
///     .with_counter(counters::TODAYS_TICKETS, f64::NAN);
/// assert_eq!(snap.counter(counters::TODAYS_REVENUE), Some(12000.0));
/// assert_eq!(snap.counter(counters::TODAYS_TICKETS), None);
/// assert_eq!(snap.counter(counters::TOTAL_REVENUE), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub counters: HashMap<String, f64>,
    #[serde(default)]
    pub companies: Vec<CompanyRevenue>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

impl MetricsSnapshot {
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            counters: HashMap::new(),
            companies: Vec::new(),
            trips: Vec::new(),
        }
    }

    pub fn with_counter(mut self, name: &str, value: f64) -> Self {
        self.counters.insert(name.to_string(), value);
        self
    }

    pub fn with_companies(mut self, companies: Vec<CompanyRevenue>) -> Self {
        self.companies = companies;
        self
    }

    pub fn with_trips(mut self, trips: Vec<TripRecord>) -> Self {
        self.trips = trips;
        self
    }

    pub fn counter(&self, name: &str) -> Option<f64> {
        self.counters.get(name).copied().filter(|v| v.is_finite())
    }

    pub fn set_counter(&mut self, name: &str, value: f64) {
        self.counters.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_deserializes_with_missing_sections() {
        let json = r#"{
            "captured_at": "2024-05-01T08:00:00Z",
            "counters": { "todays_revenue": 12000 }
        }"#;
        let snap: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.counter(counters::TODAYS_REVENUE), Some(12000.0));
        assert!(snap.companies.is_empty());
        assert!(snap.trips.is_empty());
    }

    #[test]
    fn company_without_revenue_reads_as_zero() {
        let company: CompanyRevenue = serde_json::from_str(r#"{"name":"Metro Lines"}"#).unwrap();
        assert_eq!(company.revenue_value(), 0.0);
    }

    #[test]
    fn notification_roundtrips_through_json_with_read_flag() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let n = Notification::new(
            "revenue-target",
            Severity::Success,
            "revenue",
            "Daily revenue target achieved! Rs. 12000".into(),
            created,
        );
        assert!(!n.read);
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["severity"], "success");
        assert_eq!(value["read"], false);
    }

    #[test]
    fn trip_status_uses_snake_case() {
        let trip: TripRecord = serde_json::from_str(
            r#"{"date":"2024-05-01","departure_time":"14:30:00","status":"in_transit"}"#,
        )
        .unwrap();
        assert_eq!(trip.status, TripStatus::InTransit);
        assert!(trip.departure_time.is_some());
    }
}
