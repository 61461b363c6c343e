use crate::expr::ValueExpr;
use crate::rules::{with_extras, Extra};
use crate::template::{Template, Vars};
use crate::{EvalContext, Firing, Rule};
use chrono::Duration;
use fleetwatch_common::types::{MetricsSnapshot, Severity};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greater_than" | "gt" | ">" => Ok(Self::GreaterThan),
            "less_than" | "lt" | "<" => Ok(Self::LessThan),
            "greater_equal" | "gte" | ">=" => Ok(Self::GreaterEqual),
            "less_equal" | "lte" | "<=" => Ok(Self::LessEqual),
            _ => Err(format!("unknown compare operator: {s}")),
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreaterThan => write!(f, "greater_than"),
            Self::LessThan => write!(f, "less_than"),
            Self::GreaterEqual => write!(f, "greater_equal"),
            Self::LessEqual => write!(f, "less_equal"),
        }
    }
}

impl CompareOp {
    pub fn check(&self, value: f64, bound: f64) -> bool {
        match self {
            Self::GreaterThan => value > bound,
            Self::LessThan => value < bound,
            Self::GreaterEqual => value >= bound,
            Self::LessEqual => value <= bound,
        }
    }
}

/// `expr <op> bound`
#[derive(Debug, Clone)]
pub struct Condition {
    pub expr: ValueExpr,
    pub operator: CompareOp,
    pub bound: f64,
}

impl Condition {
    pub fn new(expr: ValueExpr, operator: CompareOp, bound: f64) -> Self {
        Self {
            expr,
            operator,
            bound,
        }
    }

    /// Shorthand for `counter > 0`, the "field is present and non-zero" guard.
    pub fn positive(counter: &str) -> Self {
        Self::new(ValueExpr::counter(counter), CompareOp::GreaterThan, 0.0)
    }

    /// Returns the evaluated value when the condition holds.
    /// `None` means it does not hold or could not be evaluated.
    pub fn holds(&self, snapshot: &MetricsSnapshot) -> Option<f64> {
        let value = self.expr.eval(snapshot)?;
        self.operator.check(value, self.bound).then_some(value)
    }
}

/// Fires with a fixed severity when every condition holds.
///
/// The first condition is the primary one: its value and bound are exposed
/// to the template as `{value}` and `{threshold}`, and `{s}` pluralizes on it.
pub struct ThresholdRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub severity: Severity,
    pub conditions: Vec<Condition>,
    pub template: Template,
    pub extras: Vec<Extra>,
}

impl Rule for ThresholdRule {
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
        let (primary, guards) = self.conditions.split_first()?;
        let value = primary.holds(ctx.current)?;
        if !guards.iter().all(|c| c.holds(ctx.current).is_some()) {
            return None;
        }

        let vars = Vars::new(ctx.current)
            .number("value", value)
            .number("threshold", primary.bound)
            .plural_on(value);
        let vars = with_extras(&self.extras, ctx.current, vars)?;

        Some(Firing {
            severity: self.severity,
            message: self.template.render(&vars),
            level: None,
        })
    }
}
