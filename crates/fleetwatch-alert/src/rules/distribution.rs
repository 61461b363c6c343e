use crate::rules::threshold::CompareOp;
use crate::template::{Template, Vars};
use crate::{EvalContext, Firing, Rule};
use chrono::Duration;
use fleetwatch_common::types::{CompanyRevenue, Severity};

/// Aggregate statistics over per-company revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyStats {
    /// Revenues sorted highest first, paired with company names.
    ranked: Vec<(String, f64)>,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl CompanyStats {
    /// `None` for an empty company list.
    pub fn compute(companies: &[CompanyRevenue]) -> Option<Self> {
        if companies.is_empty() {
            return None;
        }
        let mut ranked: Vec<(String, f64)> = companies
            .iter()
            .map(|c| (c.name.clone(), c.revenue_value()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let count = ranked.len();
        let total: f64 = ranked.iter().map(|(_, r)| r).sum();
        let mean = total / count as f64;
        let variance = ranked.iter().map(|(_, r)| (r - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            ranked,
            count,
            total,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn top(&self) -> Option<(&str, f64)> {
        self.ranked.first().map(|(name, r)| (name.as_str(), *r))
    }

    /// Share of total revenue held by the top `n` companies, 0 to 100.
    pub fn top_share(&self, n: usize) -> Option<f64> {
        if self.total == 0.0 {
            return None;
        }
        let top: f64 = self.ranked.iter().take(n).map(|(_, r)| r).sum();
        Some(top / self.total * 100.0)
    }

    pub fn count_below(&self, revenue: f64) -> usize {
        self.ranked.iter().filter(|(_, r)| *r < revenue).count()
    }

    pub fn inactive(&self) -> usize {
        self.ranked.iter().filter(|(_, r)| *r == 0.0).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompanyStat {
    /// Percent of total revenue held by the top N companies.
    TopShare(usize),
    /// Top company revenue divided by the mean.
    TopToMean,
    /// Standard deviation divided by the mean.
    StdDevToMean,
    /// Number of companies under `fraction * mean`.
    BelowMeanFraction(f64),
    /// Number of companies with zero revenue.
    InactiveCount,
    CompanyCount,
    TotalRevenue,
}

impl CompanyStat {
    pub fn measure(&self, stats: &CompanyStats) -> Option<f64> {
        match *self {
            Self::TopShare(n) => stats.top_share(n),
            Self::TopToMean => {
                if stats.mean == 0.0 {
                    return None;
                }
                Some(stats.top()?.1 / stats.mean)
            }
            Self::StdDevToMean => {
                if stats.mean == 0.0 {
                    return None;
                }
                Some(stats.std_dev / stats.mean)
            }
            Self::BelowMeanFraction(fraction) => {
                Some(stats.count_below(stats.mean * fraction) as f64)
            }
            Self::InactiveCount => Some(stats.inactive() as f64),
            Self::CompanyCount => Some(stats.count as f64),
            Self::TotalRevenue => Some(stats.total),
        }
    }
}

/// Compares one company-revenue statistic against a bound.
///
/// Template values: `{value}`, `{total}`, `{mean}`, `{count}`,
/// `{top_revenue}`, `{top_name}`.
pub struct DistributionRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub statistic: CompanyStat,
    pub operator: CompareOp,
    pub bound: f64,
    pub severity: Severity,
    pub template: Template,
}

impl Rule for DistributionRule {
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
        let stats = CompanyStats::compute(&ctx.current.companies)?;
        let value = self.statistic.measure(&stats)?;
        if !value.is_finite() || !self.operator.check(value, self.bound) {
            return None;
        }

        let (top_name, top_revenue) = stats.top()?;
        let vars = Vars::new(ctx.current)
            .number("value", value)
            .number("total", stats.total)
            .number("mean", stats.mean)
            .number("count", stats.count as f64)
            .number("top_revenue", top_revenue)
            .text("top_name", top_name)
            .plural_on(value);

        Some(Firing {
            severity: self.severity,
            message: self.template.render(&vars),
            level: None,
        })
    }
}
