use super::ProfileSettings;
use crate::cooldown::CooldownClass;
use crate::expr::ValueExpr;
use crate::rules::banded::{Band, BandedRule, Bound};
use crate::rules::milestone::{Milestone, MilestoneRule};
use crate::rules::threshold::{CompareOp, Condition, ThresholdRule};
use crate::rules::{Extra, Outcome};
use crate::template::Template;
use crate::Rule;
use fleetwatch_common::types::{counters, Severity};

/// Category of the continuously recomputed admin insights. The admin batch
/// policy keeps every notification in it.
pub const ANALYTICS_CATEGORY: &str = "analytics";

fn counter(name: &str) -> ValueExpr {
    ValueExpr::counter(name)
}

fn overall_avg_ticket_price() -> ValueExpr {
    ValueExpr::ratio(counter(counters::TOTAL_REVENUE), counter(counters::TOTAL_TICKETS))
}

fn todays_avg_ticket_price() -> ValueExpr {
    ValueExpr::ratio(counter(counters::TODAYS_REVENUE), counter(counters::TODAYS_TICKETS))
}

fn driver_utilization_pct() -> ValueExpr {
    ValueExpr::ratio(
        counter(counters::ASSIGNED_DRIVERS),
        counter(counters::DRIVERS_REGISTERED),
    )
    .percent()
}

/// Admin dashboard rules: six analytics insights followed by the
/// operational revenue, ticket, driver and vehicle alerts.
pub fn admin_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let mut rules = analytics_rules(settings);
    rules.extend(operational_rules(settings));
    rules
}

fn analytics_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let window = |id: &str| settings.window(id, CooldownClass::Analytics);
    let goal = settings.targets.daily_tickets;

    vec![
        Box::new(BandedRule {
            id: "high-revenue-efficiency".into(),
            category: ANALYTICS_CATEGORY.into(),
            cooldown: window("high-revenue-efficiency"),
            value: overall_avg_ticket_price(),
            guards: Vec::new(),
            bands: vec![
                Band::new(
                    Bound::AtLeast(50.0),
                    Severity::Success,
                    "Your current avg. revenue per ticket is Rs. {value:.2}, indicating strong pricing or upsell effectiveness.",
                ),
                Band::new(
                    Bound::AtLeast(40.0),
                    Severity::Success,
                    "Your current avg. revenue per ticket is Rs. {value:.2}, showing good market positioning.",
                ),
                Band::new(
                    Bound::AtLeast(30.0),
                    Severity::Info,
                    "Your current avg. revenue per ticket is Rs. {value:.2}, showing good market positioning.",
                ),
                Band::new(
                    Bound::AtLeast(20.0),
                    Severity::Info,
                    "Your current avg. revenue per ticket is Rs. {value:.2}, there's room for pricing optimization.",
                ),
                Band::new(
                    Bound::Above(0.0),
                    Severity::Info,
                    "Your current avg. revenue per ticket is Rs. {value:.2}, consider reviewing pricing strategy.",
                ),
            ],
            extras: Vec::new(),
        }),
        Box::new(BandedRule {
            id: "daily-ticket-goal".into(),
            category: ANALYTICS_CATEGORY.into(),
            cooldown: window("daily-ticket-goal"),
            value: counter(counters::TODAYS_TICKETS),
            guards: Vec::new(),
            bands: vec![
                Band::new(
                    Bound::AtLeast(goal),
                    Severity::Success,
                    "Daily goal achieved! You've sold {value} tickets today (Goal: {goal})",
                ),
                Band::new(
                    Bound::AtLeast(goal - 50.0),
                    Severity::Success,
                    "You've sold {value} tickets today, only {remaining} away from your daily goal!",
                ),
                Band::new(
                    Bound::AtLeast(goal * 0.75),
                    Severity::Info,
                    "Great progress! {value} tickets sold today, {goal_pct:.1}% of daily goal completed.",
                ),
                Band::new(
                    Bound::AtLeast(0.0),
                    Severity::Info,
                    "Current ticket sales: {value} tickets today ({goal_pct:.1}% of {goal} daily goal)",
                ),
            ],
            extras: vec![
                Extra::new("goal", ValueExpr::constant(goal)),
                Extra::new(
                    "remaining",
                    ValueExpr::difference(ValueExpr::constant(goal), counter(counters::TODAYS_TICKETS)),
                ),
                Extra::new(
                    "goal_pct",
                    ValueExpr::ratio(counter(counters::TODAYS_TICKETS), ValueExpr::constant(goal))
                        .percent(),
                ),
            ],
        }),
        Box::new(BandedRule {
            id: "revenue-health-check".into(),
            category: ANALYTICS_CATEGORY.into(),
            cooldown: window("revenue-health-check"),
            value: counter(counters::TODAYS_REVENUE),
            guards: Vec::new(),
            bands: vec![
                Band::new(
                    Bound::AtLeast(15_000.0),
                    Severity::Success,
                    "Total revenue has reached Rs. {value:grouped} so far today. That's exceptional daily performance!",
                ),
                Band::new(
                    Bound::AtLeast(10_000.0),
                    Severity::Success,
                    "Total revenue has reached Rs. {value:grouped} so far today. That's strong daily performance!",
                ),
                Band::new(
                    Bound::AtLeast(5_000.0),
                    Severity::Info,
                    "Total revenue is Rs. {value:grouped} today. Moderate performance with room to grow.",
                ),
                Band::new(
                    Bound::AtLeast(2_000.0),
                    Severity::Warning,
                    "Today's revenue is Rs. {value:grouped}. Consider strategies to boost sales.",
                ),
                Band::new(
                    Bound::Above(0.0),
                    Severity::Info,
                    "Today's revenue is Rs. {value:grouped}. Early in the day - tracking progress.",
                ),
                Band::new(
                    Bound::AtLeast(0.0),
                    Severity::Info,
                    "Revenue tracking started for today. Current: Rs. {value:grouped}",
                ),
            ],
            extras: Vec::new(),
        }),
        Box::new(BandedRule {
            id: "revenue-ticket-comparison".into(),
            category: ANALYTICS_CATEGORY.into(),
            cooldown: window("revenue-ticket-comparison"),
            value: ValueExpr::percent_change(overall_avg_ticket_price(), todays_avg_ticket_price()),
            guards: vec![
                Condition::positive(counters::TODAYS_TICKETS),
                Condition::new(overall_avg_ticket_price(), CompareOp::GreaterThan, 0.0),
                Condition::new(todays_avg_ticket_price(), CompareOp::GreaterThan, 0.0),
            ],
            bands: vec![
                Band::new(
                    Bound::Above(15.0),
                    Severity::Success,
                    "Today's revenue per ticket (Rs. {today_avg:.2}) is {value:.1}% above your overall average of Rs. {overall_avg:.2}",
                ),
                Band::new(
                    Bound::AtLeast(-15.0),
                    Severity::Info,
                    "Today's revenue per ticket (Rs. {today_avg:.2}) is close to your overall average of Rs. {overall_avg:.2} ({value:.1}% difference)",
                ),
                Band::new(
                    Bound::Any,
                    Severity::Warning,
                    "Today's revenue per ticket (Rs. {today_avg:.2}) is {abs_diff:.1}% below your overall average of Rs. {overall_avg:.2}",
                ),
            ],
            extras: vec![
                Extra::new("today_avg", todays_avg_ticket_price()),
                Extra::new("overall_avg", overall_avg_ticket_price()),
                Extra::new(
                    "abs_diff",
                    ValueExpr::percent_change(overall_avg_ticket_price(), todays_avg_ticket_price())
                        .abs(),
                ),
            ],
        }),
        Box::new(MilestoneRule::new(
            "total-revenue-milestone",
            ANALYTICS_CATEGORY,
            window("total-revenue-milestone"),
            counter(counters::TOTAL_REVENUE),
            vec![
                Milestone::new(1_000_000.0, "1 Million"),
                Milestone::new(500_000.0, "500K"),
                Milestone::new(250_000.0, "250K"),
                Milestone::new(100_000.0, "100K"),
                Milestone::new(50_000.0, "50K"),
                Milestone::new(25_000.0, "25K"),
                Milestone::new(10_000.0, "10K"),
            ],
            Outcome::new(
                Severity::Success,
                "Milestone Achievement! Total revenue has reached Rs. {value:grouped} ({label} milestone crossed!)",
            ),
            Some(Outcome::new(
                Severity::Info,
                "Total revenue: Rs. {value:grouped}. Next milestone: Rs. {amount:grouped} ({label})",
            )),
        )),
        Box::new(BandedRule {
            id: "ticket-volume-analysis".into(),
            category: ANALYTICS_CATEGORY.into(),
            cooldown: window("ticket-volume-analysis"),
            value: counter(counters::TOTAL_TICKETS),
            guards: Vec::new(),
            bands: vec![
                Band::new(
                    Bound::AtLeast(1_000.0),
                    Severity::Info,
                    "Total tickets sold: {value:grouped} - High volume operation!",
                ),
                Band::new(
                    Bound::AtLeast(500.0),
                    Severity::Info,
                    "Total tickets sold: {value:grouped} - Growing customer base",
                ),
                Band::new(
                    Bound::AtLeast(100.0),
                    Severity::Info,
                    "Total tickets sold: {value:grouped} - Building momentum",
                ),
                Band::new(
                    Bound::Above(0.0),
                    Severity::Info,
                    "Total tickets sold: {value:grouped} - Early stage operations",
                ),
            ],
            extras: Vec::new(),
        }),
    ]
}

fn operational(
    settings: &ProfileSettings,
    id: &str,
    category: &str,
    severity: Severity,
    conditions: Vec<Condition>,
    template: &str,
) -> Box<dyn Rule> {
    Box::new(ThresholdRule {
        id: id.to_string(),
        category: category.to_string(),
        cooldown: settings.window(id, CooldownClass::Operational),
        severity,
        conditions,
        template: Template::new(template),
        extras: Vec::new(),
    })
}

fn operational_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let targets = settings.targets;
    let daily_avg_tickets =
        || counter(counters::TOTAL_TICKETS).scaled(1.0 / targets.billing_days);
    let registered_and_assigned = || {
        vec![
            Condition::positive(counters::DRIVERS_REGISTERED),
            Condition::positive(counters::ASSIGNED_DRIVERS),
        ]
    };

    vec![
        operational(
            settings,
            "revenue-target",
            "revenue",
            Severity::Success,
            vec![
                Condition::new(
                    counter(counters::TODAYS_REVENUE),
                    CompareOp::GreaterEqual,
                    targets.daily_revenue,
                ),
                Condition::positive(counters::TODAYS_REVENUE),
            ],
            "Daily revenue target achieved! Rs. {value}",
        ),
        operational(
            settings,
            "revenue-low",
            "revenue",
            Severity::Warning,
            vec![
                Condition::new(
                    counter(counters::TODAYS_REVENUE),
                    CompareOp::LessThan,
                    targets.daily_revenue * 0.5,
                ),
                Condition::positive(counters::TODAYS_REVENUE),
            ],
            "Today's revenue (Rs. {value}) is below 50% of target",
        ),
        operational(
            settings,
            "tickets-high",
            "tickets",
            Severity::Success,
            vec![Condition::new(
                ValueExpr::difference(
                    counter(counters::TODAYS_TICKETS),
                    daily_avg_tickets().scaled(1.2),
                ),
                CompareOp::GreaterThan,
                0.0,
            )],
            "Ticket sales today ({todays_tickets}) are above average",
        ),
        operational(
            settings,
            "tickets-low",
            "tickets",
            Severity::Warning,
            vec![
                Condition::new(
                    ValueExpr::difference(
                        counter(counters::TODAYS_TICKETS),
                        daily_avg_tickets().scaled(0.8),
                    ),
                    CompareOp::LessThan,
                    0.0,
                ),
                Condition::positive(counters::TODAYS_TICKETS),
            ],
            "Ticket sales today ({todays_tickets}) are below average",
        ),
        operational(
            settings,
            "unassigned-drivers",
            "drivers",
            Severity::Info,
            [
                vec![Condition::new(
                    ValueExpr::difference(
                        counter(counters::DRIVERS_REGISTERED),
                        counter(counters::ASSIGNED_DRIVERS),
                    ),
                    CompareOp::GreaterThan,
                    3.0,
                )],
                registered_and_assigned(),
            ]
            .concat(),
            "{value} registered drivers are currently unassigned",
        ),
        operational(
            settings,
            "driver-utilization-low",
            "drivers",
            Severity::Warning,
            vec![
                Condition::new(driver_utilization_pct(), CompareOp::LessThan, 70.0),
                Condition::new(
                    counter(counters::DRIVERS_REGISTERED),
                    CompareOp::GreaterThan,
                    5.0,
                ),
                Condition::positive(counters::ASSIGNED_DRIVERS),
            ],
            "Driver utilization rate is only {value:.1}%",
        ),
        operational(
            settings,
            "driver-shortage",
            "drivers",
            Severity::Warning,
            vec![
                Condition::new(driver_utilization_pct(), CompareOp::GreaterThan, 95.0),
                Condition::new(
                    counter(counters::DRIVERS_REGISTERED),
                    CompareOp::GreaterThan,
                    5.0,
                ),
                Condition::positive(counters::ASSIGNED_DRIVERS),
            ],
            "High driver utilization ({value:.1}%) - consider recruiting",
        ),
        operational(
            settings,
            "unused-vehicles",
            "vehicles",
            Severity::Info,
            vec![
                Condition::new(
                    ValueExpr::difference(
                        counter(counters::TOTAL_VEHICLES),
                        counter(counters::ASSIGNED_DRIVERS),
                    ),
                    CompareOp::GreaterThan,
                    0.0,
                ),
                Condition::positive(counters::TOTAL_VEHICLES),
                Condition::positive(counters::ASSIGNED_DRIVERS),
            ],
            "{value} vehicles are currently without assigned drivers",
        ),
        operational(
            settings,
            "vehicle-shortage",
            "vehicles",
            Severity::Error,
            vec![
                Condition::new(
                    ValueExpr::difference(
                        counter(counters::ASSIGNED_DRIVERS),
                        counter(counters::TOTAL_VEHICLES),
                    ),
                    CompareOp::GreaterThan,
                    0.0,
                ),
                Condition::positive(counters::TOTAL_VEHICLES),
                Condition::positive(counters::ASSIGNED_DRIVERS),
            ],
            "Vehicle shortage: {value} drivers without vehicles",
        ),
    ]
}
