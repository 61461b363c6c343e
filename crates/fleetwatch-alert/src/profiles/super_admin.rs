use super::ProfileSettings;
use crate::cooldown::CooldownClass;
use crate::rules::distribution::{CompanyStat, DistributionRule};
use crate::rules::threshold::CompareOp;
use crate::template::Template;
use crate::Rule;
use fleetwatch_common::types::Severity;

const CATEGORY: &str = "companies";

/// Platform-wide rules over per-company revenue.
pub fn super_admin_rules(settings: &ProfileSettings) -> Vec<Box<dyn Rule>> {
    let rule = |id: &str,
                statistic: CompanyStat,
                operator: CompareOp,
                bound: f64,
                severity: Severity,
                template: &str|
     -> Box<dyn Rule> {
        Box::new(DistributionRule {
            id: id.to_string(),
            category: CATEGORY.to_string(),
            cooldown: settings.window(id, CooldownClass::Operational),
            statistic,
            operator,
            bound,
            severity,
            template: Template::new(template),
        })
    };

    vec![
        rule(
            "top-performer",
            CompanyStat::TopToMean,
            CompareOp::GreaterThan,
            1.5,
            Severity::Success,
            "{top_name} is the top performing company with Rs. {top_revenue}",
        ),
        rule(
            "low-performers",
            CompanyStat::BelowMeanFraction(0.5),
            CompareOp::GreaterThan,
            0.0,
            Severity::Warning,
            "{value} companies are performing below 50% of average revenue",
        ),
        rule(
            "company-growth",
            CompanyStat::CompanyCount,
            CompareOp::GreaterThan,
            5.0,
            Severity::Info,
            "Platform growth: {value} companies now registered",
        ),
        rule(
            "revenue-milestone",
            CompanyStat::TotalRevenue,
            CompareOp::GreaterThan,
            100_000.0,
            Severity::Success,
            "Platform revenue milestone reached: Rs. {value:.2}",
        ),
        rule(
            "market-concentration",
            CompanyStat::TopShare(3),
            CompareOp::GreaterThan,
            80.0,
            Severity::Warning,
            "High market concentration: Top 3 companies control {value:.1}% of revenue",
        ),
        rule(
            "inactive-companies",
            CompanyStat::InactiveCount,
            CompareOp::GreaterThan,
            0.0,
            Severity::Info,
            "{value} companies have no revenue recorded",
        ),
        rule(
            "revenue-disparity",
            CompanyStat::StdDevToMean,
            CompareOp::GreaterThan,
            1.0,
            Severity::Info,
            "High revenue disparity detected across companies",
        ),
    ]
}
