use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use fleetwatch_common::types::{
    counters, CompanyRevenue, MetricsSnapshot, TripRecord, TripStatus,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Source of metrics snapshots, polled once per tick.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Provider name used in logs (e.g. `"simulated"`).
    fn name(&self) -> &str;

    /// Produces the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the data cannot be obtained or parsed. The
    /// caller reports it as a single fetch-failure notification.
    async fn fetch(&mut self) -> Result<MetricsSnapshot>;
}

/// Random-walk demo data.
///
/// Today's figures move by bounded random steps with floors, the way the
/// live notification demo drifts: revenue by -3000..12000 (floor 100000),
/// tickets by -5..20 (floor 400), assigned drivers by -1..=1 within
/// [70, registered], registered drivers by 0..=1 (floor 100) and vehicles
/// by -1..=0 (floor 90). Cumulative totals, per-company revenue and a small
/// trip roster are synthesized alongside so every profile has input.
pub struct SimulatedFeed {
    rng: StdRng,
    state: DemoState,
}

#[derive(Debug, Clone)]
struct DemoState {
    todays_revenue: i64,
    todays_tickets: i64,
    assigned_drivers: i64,
    drivers_registered: i64,
    total_vehicles: i64,
    total_revenue: i64,
    total_tickets: i64,
    companies: Vec<(String, i64)>,
}

impl Default for DemoState {
    fn default() -> Self {
        Self {
            todays_revenue: 125_000,
            todays_tickets: 450,
            assigned_drivers: 85,
            drivers_registered: 120,
            total_vehicles: 100,
            total_revenue: 950_000,
            total_tickets: 9_000,
            companies: vec![
                ("Northline Express".to_string(), 52_000),
                ("Coastal Coaches".to_string(), 31_000),
                ("Hillside Transit".to_string(), 12_500),
                ("Lakeview Lines".to_string(), 6_000),
                ("Metro Shuttle".to_string(), 4_500),
                ("Valley Rider".to_string(), 0),
            ],
        }
    }
}

impl SimulatedFeed {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            state: DemoState::default(),
        }
    }

    fn step(&mut self) {
        let s = &mut self.state;
        let rng = &mut self.rng;

        let revenue_change = rng.gen_range(-3_000..12_000);
        let new_revenue = (s.todays_revenue + revenue_change).max(100_000);
        s.total_revenue += (new_revenue - s.todays_revenue).max(0);
        s.todays_revenue = new_revenue;

        let ticket_change = rng.gen_range(-5..20);
        let new_tickets = (s.todays_tickets + ticket_change).max(400);
        s.total_tickets += (new_tickets - s.todays_tickets).max(0);
        s.todays_tickets = new_tickets;

        let driver_change = rng.gen_range(-1..=1);
        s.assigned_drivers = (s.assigned_drivers + driver_change)
            .max(70)
            .min(s.drivers_registered);

        s.drivers_registered = (s.drivers_registered + rng.gen_range(0..=1)).max(100);
        s.total_vehicles = (s.total_vehicles + rng.gen_range(-1..=0)).max(90);

        for (_, revenue) in s.companies.iter_mut() {
            if *revenue > 0 {
                *revenue = (*revenue + rng.gen_range(-1_500..2_500)).max(0);
            }
        }
    }

    fn snapshot(&self) -> MetricsSnapshot {
        let s = &self.state;
        let now = Utc::now();
        let today = now.date_naive();

        let trips = vec![
            TripRecord {
                date: today,
                departure_time: Some((now + Duration::minutes(90)).time()),
                status: TripStatus::Scheduled,
            },
            TripRecord {
                date: today,
                departure_time: Some((now - Duration::minutes(30)).time()),
                status: TripStatus::InTransit,
            },
            TripRecord {
                date: today,
                departure_time: Some((now - Duration::hours(4)).time()),
                status: TripStatus::Completed,
            },
        ];

        MetricsSnapshot::new(now)
            .with_counter(counters::TODAYS_REVENUE, s.todays_revenue as f64)
            .with_counter(counters::TODAYS_TICKETS, s.todays_tickets as f64)
            .with_counter(counters::TOTAL_REVENUE, s.total_revenue as f64)
            .with_counter(counters::TOTAL_TICKETS, s.total_tickets as f64)
            .with_counter(counters::DRIVERS_REGISTERED, s.drivers_registered as f64)
            .with_counter(counters::ASSIGNED_DRIVERS, s.assigned_drivers as f64)
            .with_counter(counters::TOTAL_VEHICLES, s.total_vehicles as f64)
            .with_counter(
                counters::REVENUE_PER_TICKET,
                (s.todays_revenue as f64 / s.todays_tickets as f64).round(),
            )
            .with_companies(
                s.companies
                    .iter()
                    .map(|(name, revenue)| CompanyRevenue::new(name.clone(), *revenue as f64))
                    .collect(),
            )
            .with_trips(trips)
    }
}

#[async_trait]
impl SnapshotProvider for SimulatedFeed {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch(&mut self) -> Result<MetricsSnapshot> {
        self.step();
        Ok(self.snapshot())
    }
}

/// Reads a JSON-encoded [`MetricsSnapshot`] from disk on every fetch, so an
/// external process can update the file between ticks.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotProvider for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&mut self) -> Result<MetricsSnapshot> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn simulated_feed_stays_within_floors() {
        let mut feed = SimulatedFeed::new(Some(7));
        for _ in 0..200 {
            let snap = feed.fetch().await.unwrap();
            let registered = snap.counter(counters::DRIVERS_REGISTERED).unwrap();
            let assigned = snap.counter(counters::ASSIGNED_DRIVERS).unwrap();
            assert!(snap.counter(counters::TODAYS_REVENUE).unwrap() >= 100_000.0);
            assert!(snap.counter(counters::TODAYS_TICKETS).unwrap() >= 400.0);
            assert!(registered >= 100.0);
            assert!(assigned >= 70.0 && assigned <= registered);
            assert!(snap.counter(counters::TOTAL_VEHICLES).unwrap() >= 90.0);
            assert!(snap.companies.iter().all(|c| c.revenue >= 0.0));
        }
    }

    #[tokio::test]
    async fn seeded_feeds_repeat() {
        let mut a = SimulatedFeed::new(Some(42));
        let mut b = SimulatedFeed::new(Some(42));
        for _ in 0..5 {
            let (sa, sb) = (a.fetch().await.unwrap(), b.fetch().await.unwrap());
            assert_eq!(sa.counters, sb.counters);
            assert_eq!(sa.companies, sb.companies);
        }
    }

    #[tokio::test]
    async fn file_feed_reads_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{"captured_at":"2024-05-01T08:00:00Z","counters":{"todays_revenue":12000}}"#,
        )
        .unwrap();

        let mut feed = FileFeed::new(&path);
        let snap = feed.fetch().await.unwrap();
        assert_eq!(snap.counter(counters::TODAYS_REVENUE), Some(12000.0));
    }

    #[tokio::test]
    async fn file_feed_reports_missing_and_malformed_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut feed = FileFeed::new(&path);
        assert!(feed.fetch().await.is_err());

        std::fs::write(&path, "not json").unwrap();
        assert!(feed.fetch().await.is_err());
    }
}
