use super::ProfileSettings;
use crate::cooldown::CooldownClass;
use crate::rules::threshold::CompareOp;
use crate::rules::trips::{TripRule, TripStat};
use crate::template::Template;
use crate::Rule;
use fleetwatch_common::types::Severity;

const CATEGORY: &str = "trips";

/// Departures closer than this raise the upcoming-trip warning.
const UPCOMING_WINDOW_MINUTES: i64 = 120;

/// Rules over the signed-in driver's own trips.
pub fn driver_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let rule = |id: &str,
                statistic: TripStat,
                bound: f64,
                severity: Severity,
                template: &str|
     -> Box<dyn Rule> {
        Box::new(TripRule {
            id: id.to_string(),
            category: CATEGORY.to_string(),
            cooldown: settings.window(id, CooldownClass::Operational),
            statistic,
            operator: CompareOp::GreaterThan,
            bound,
            severity,
            template: Template::new(template),
        })
    };

    vec![
        rule(
            "today-trips",
            TripStat::ScheduledToday,
            0.0,
            Severity::Info,
            "You have {value} trip{s} scheduled for today!",
        ),
        rule(
            "upcoming-trips",
            TripStat::DepartingWithin(UPCOMING_WINDOW_MINUTES),
            0.0,
            Severity::Warning,
            "{value} trip{s} starting within 2 hours!",
        ),
        rule(
            "in-transit",
            TripStat::InTransit,
            0.0,
            Severity::Info,
            "You have {value} trip{s} currently in transit.",
        ),
        rule(
            "daily-summary",
            TripStat::CompletedToday,
            0.0,
            Severity::Success,
            "Great job! You've completed {value} trip{s} today.",
        ),
        rule(
            "maintenance-reminder",
            TripStat::DaysSinceLastTrip,
            3.0,
            Severity::Info,
            "Consider scheduling vehicle maintenance during your free time.",
        ),
    ]
}
