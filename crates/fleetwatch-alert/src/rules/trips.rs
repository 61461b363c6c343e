use crate::rules::threshold::CompareOp;
use crate::template::{Template, Vars};
use crate::{EvalContext, Firing, Rule};
use chrono::{DateTime, Duration, Utc};
use fleetwatch_common::types::{Severity, TripRecord, TripStatus};

/// Counts over the signed-in driver's trips. Dates are compared in UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TripStat {
    ScheduledToday,
    /// Trips today whose departure is in the future but no more than this
    /// many minutes away.
    DepartingWithin(i64),
    InTransit,
    CompletedToday,
    /// Fractional days between `now` and the start of the latest trip date.
    DaysSinceLastTrip,
}

impl TripStat {
    pub fn measure(&self, trips: &[TripRecord], now: DateTime<Utc>) -> Option<f64> {
        let today = now.date_naive();

        match *self {
            Self::ScheduledToday => Some(count(trips, |t| t.date == today)),
            Self::DepartingWithin(minutes) => Some(count(trips, |t| {
                if t.date != today {
                    return false;
                }
                let Some(time) = t.departure_time else {
                    return false;
                };
                let until = t.date.and_time(time).and_utc() - now;
                until > Duration::zero() && until <= Duration::minutes(minutes)
            })),
            Self::InTransit => Some(count(trips, |t| t.status == TripStatus::InTransit)),
            Self::CompletedToday => Some(count(trips, |t| {
                t.status == TripStatus::Completed && t.date == today
            })),
            Self::DaysSinceLastTrip => {
                let last = trips.iter().map(|t| t.date).max()?;
                let start = last.and_hms_opt(0, 0, 0)?.and_utc();
                Some((now - start).num_seconds() as f64 / 86_400.0)
            }
        }
    }
}

fn count(trips: &[TripRecord], pred: impl Fn(&TripRecord) -> bool) -> f64 {
    trips.iter().filter(|t| pred(t)).count() as f64
}

/// Compares one trip statistic against a bound.
///
/// Template values: `{value}`; `{s}` pluralizes on it.
pub struct TripRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub statistic: TripStat,
    pub operator: CompareOp,
    pub bound: f64,
    pub severity: Severity,
    pub template: Template,
}

impl Rule for TripRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn cooldown(&self) -> Duration {
        self.cooldown
    }

    fn evaluate(&self, ctx: &EvalContext<'_>) -> Option<Firing> {
        let value = self.statistic.measure(&ctx.current.trips, ctx.now)?;
        if !self.operator.check(value, self.bound) {
            return None;
        }
        let vars = Vars::new(ctx.current)
            .number("value", value)
            .plural_on(value);
        Some(Firing {
            severity: self.severity,
            message: self.template.render(&vars),
            level: None,
        })
    }
}
