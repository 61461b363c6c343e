use crate::expr::ValueExpr;
use crate::rules::threshold::Condition;
use crate::rules::{with_extras, Extra, Outcome};
use crate::template::Vars;
use crate::{EvalContext, Firing, Rule};
use chrono::Duration;
use fleetwatch_common::types::Severity;

/// Lower edge of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    Above(f64),
    Any,
}

impl Bound {
    pub fn admits(&self, value: f64) -> bool {
        match self {
            Self::AtLeast(edge) => value >= *edge,
            Self::Above(edge) => value > *edge,
            Self::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Band {
    pub lower: Bound,
    pub outcome: Outcome,
}

impl Band {
    pub fn new(lower: Bound, severity: Severity, template: &str) -> Self {
        Self {
            lower,
            outcome: Outcome::new(severity, template),
        }
    }
}

/// Partitions one value into bands and reports the first band that admits it.
///
/// Bands are checked in order, so they must be listed from the highest lower
/// edge down. A value no band admits produces nothing.
pub struct BandedRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub value: ValueExpr,
    pub guards: Vec<Condition>,
    pub bands: Vec<Band>,
    pub extras: Vec<Extra>,
}

impl BandedRule {
    fn select(&self, value: f64) -> Option<&Band> {
        self.bands.iter().find(|band| band.lower.admits(value))
    }
}

impl Rule for BandedRule {
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
        if !self.guards.iter().all(|g| g.holds(ctx.current).is_some()) {
            return None;
        }
        let value = self.value.eval(ctx.current)?;
        let band = self.select(value)?;

        let vars = Vars::new(ctx.current)
            .number("value", value)
            .plural_on(value);
        let vars = with_extras(&self.extras, ctx.current, vars)?;

        Some(Firing {
            severity: band.outcome.severity,
            message: band.outcome.template.render(&vars),
            level: None,
        })
    }
}
