pub mod banded;
pub mod delta;
pub mod distribution;
pub mod milestone;
pub mod threshold;
pub mod trips;

use crate::expr::ValueExpr;
use crate::template::{Template, Vars};
use fleetwatch_common::types::{MetricsSnapshot, Severity};

/// Severity and message chosen for one outcome of a rule.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub severity: Severity,
    pub template: Template,
}

impl Outcome {
    pub fn new(severity: Severity, template: &str) -> Self {
        Self {
            severity,
            template: Template::new(template),
        }
    }
}

/// A named value computed from the snapshot for use in a template.
#[derive(Debug, Clone)]
pub struct Extra {
    pub name: String,
    pub expr: ValueExpr,
}

impl Extra {
    pub fn new(name: &str, expr: ValueExpr) -> Self {
        Self {
            name: name.to_string(),
            expr,
        }
    }
}

/// Adds every extra to `vars`. Returns `None` if any of them cannot be
/// computed, which makes the rule skip.
pub(crate) fn with_extras<'a>(
    extras: &[Extra],
    snapshot: &MetricsSnapshot,
    mut vars: Vars<'a>,
) -> Option<Vars<'a>> {
    for extra in extras {
        let value = extra.expr.eval(snapshot)?;
        vars = vars.number(&extra.name, value);
    }
    Some(vars)
}
