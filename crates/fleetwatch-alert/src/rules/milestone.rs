use crate::expr::ValueExpr;
use crate::rules::Outcome;
use crate::template::Vars;
use crate::{EvalContext, Firing, Rule};
use chrono::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub amount: f64,
    pub label: String,
}

impl Milestone {
    pub fn new(amount: f64, label: &str) -> Self {
        Self {
            amount,
            label: label.to_string(),
        }
    }
}

/// Reports the highest milestone a cumulative counter has reached.
///
/// Only one notification is produced per pass, naming the single highest
/// crossed milestone. A milestone at or below the highest one this rule has
/// already reported is not reported again, even if the crossing happened
/// while the rule was cooling down. When no milestone has been reached yet and a
/// `progress` outcome is configured, it reports the distance to the next
/// one instead. Nothing fires while the counter is zero or missing.
///
/// Template values: `{value}`, `{amount}`, `{label}`.
pub struct MilestoneRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub value: ValueExpr,
    milestones: Vec<Milestone>,
    pub reached: Outcome,
    pub progress: Option<Outcome>,
}

impl MilestoneRule {
    pub fn new(
        id: &str,
        category: &str,
        cooldown: Duration,
        value: ValueExpr,
        mut milestones: Vec<Milestone>,
        reached: Outcome,
        progress: Option<Outcome>,
    ) -> Self {
        milestones.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        Self {
            id: id.to_string(),
            category: category.to_string(),
            cooldown,
            value,
            milestones,
            reached,
            progress,
        }
    }

    /// Milestones, highest first.
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn highest_crossed(&self, value: f64) -> Option<&Milestone> {
        self.milestones.iter().find(|m| value >= m.amount)
    }

    fn next_above(&self, value: f64) -> Option<&Milestone> {
        self.milestones.iter().rev().find(|m| m.amount > value)
    }
}

impl Rule for MilestoneRule {
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
        let value = self.value.eval(ctx.current)?;
        if value <= 0.0 {
            return None;
        }

        let (outcome, milestone, level) = match self.highest_crossed(value) {
            Some(crossed) => {
                if ctx.reported.is_some_and(|level| level >= crossed.amount) {
                    return None;
                }
                (&self.reached, crossed, Some(crossed.amount))
            }
            None => (self.progress.as_ref()?, self.next_above(value)?, None),
        };

        let vars = Vars::new(ctx.current)
            .number("value", value)
            .number("amount", milestone.amount)
            .text("label", milestone.label.clone());

        Some(Firing {
            severity: outcome.severity,
            message: outcome.template.render(&vars),
            level,
        })
    }
}
