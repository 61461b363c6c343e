use super::ProfileSettings;
use crate::cooldown::CooldownClass;
use crate::expr::ValueExpr;
use crate::rules::delta::DeltaRule;
use crate::rules::threshold::{CompareOp, Condition, ThresholdRule};
use crate::rules::{Extra, Outcome};
use crate::template::Template;
use crate::Rule;
use fleetwatch_common::types::{counters, Severity};

fn delta(
    settings: &ProfileSettings,
    id: &str,
    category: &str,
    counter: &str,
    materiality: f64,
    increase: Outcome,
    decrease: Option<Outcome>,
) -> Box<dyn Rule> {
    Box::new(DeltaRule {
        id: id.to_string(),
        category: category.to_string(),
        cooldown: settings.window(id, CooldownClass::Analytics),
        value: ValueExpr::counter(counter),
        materiality,
        increase,
        decrease,
    })
}

fn ratio_alert(
    settings: &ProfileSettings,
    id: &str,
    category: &str,
    severity: Severity,
    condition: Condition,
    template: &str,
) -> Box<dyn Rule> {
    let pct = condition.expr.clone().percent();
    Box::new(ThresholdRule {
        id: id.to_string(),
        category: category.to_string(),
        cooldown: settings.window(id, CooldownClass::Analytics),
        severity,
        conditions: vec![
            condition,
            Condition::positive(counters::ASSIGNED_DRIVERS),
        ],
        template: Template::new(template),
        extras: vec![Extra::new("pct", pct)],
    })
}

/// Change alerts for the live feed. Every rule compares against the
/// previous snapshot or a driver/vehicle ratio, and all use the short
/// cooldown class.
pub fn live_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let assigned_per_vehicle = || {
        ValueExpr::ratio(
            ValueExpr::counter(counters::ASSIGNED_DRIVERS),
            ValueExpr::counter(counters::TOTAL_VEHICLES),
        )
    };

    vec![
        delta(
            settings,
            "revenue-change",
            "revenue",
            counters::TODAYS_REVENUE,
            5_000.0,
            Outcome::new(
                Severity::Success,
                "Revenue increased by Rs. {delta:grouped} ({percent:.1}%).",
            ),
            Some(Outcome::new(
                Severity::Warning,
                "Revenue decreased by Rs. {delta:grouped} ({percent:.1}%).",
            )),
        ),
        delta(
            settings,
            "new-tickets",
            "tickets",
            counters::TODAYS_TICKETS,
            0.0,
            Outcome::new(
                Severity::Info,
                "{delta} new ticket{s} purchased in the last update.",
            ),
            None,
        ),
        delta(
            settings,
            "drivers-assigned",
            "drivers",
            counters::ASSIGNED_DRIVERS,
            0.0,
            Outcome::new(Severity::Info, "{delta} new driver{s} assigned."),
            None,
        ),
        delta(
            settings,
            "drivers-registered",
            "drivers",
            counters::DRIVERS_REGISTERED,
            0.0,
            Outcome::new(
                Severity::Success,
                "{delta} new driver{s} registered in the system.",
            ),
            None,
        ),
        ratio_alert(
            settings,
            "low-utilization",
            "utilization",
            Severity::Warning,
            Condition::new(
                ValueExpr::ratio(
                    ValueExpr::counter(counters::ASSIGNED_DRIVERS),
                    ValueExpr::counter(counters::DRIVERS_REGISTERED),
                ),
                CompareOp::LessThan,
                0.7,
            ),
            "Only {pct:int}% of registered drivers are assigned. Consider optimizing schedules.",
        ),
        delta(
            settings,
            "revenue-per-ticket-change",
            "revenue",
            counters::REVENUE_PER_TICKET,
            10.0,
            Outcome::new(
                Severity::Success,
                "Average revenue per ticket has increased by Rs. {delta}. New average: Rs. {value}",
            ),
            Some(Outcome::new(
                Severity::Warning,
                "Average revenue per ticket has decreased by Rs. {delta}. New average: Rs. {value}",
            )),
        ),
        ratio_alert(
            settings,
            "driver-shortage",
            "drivers",
            Severity::Warning,
            Condition::new(assigned_per_vehicle(), CompareOp::LessThan, 0.9),
            "Not enough drivers ({assigned_drivers}) for your total vehicles ({total_vehicles}). Consider assigning more drivers.",
        ),
        ratio_alert(
            settings,
            "excess-drivers",
            "vehicles",
            Severity::Info,
            Condition::new(assigned_per_vehicle(), CompareOp::GreaterThan, 1.2),
            "You have more assigned drivers ({assigned_drivers}) than needed for your vehicles ({total_vehicles}). Consider fleet expansion.",
        ),
    ]
}
