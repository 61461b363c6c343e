use crate::expr::ValueExpr;
use crate::rules::Outcome;
use crate::template::Vars;
use crate::{EvalContext, Firing, Rule};
use chrono::Duration;

/// Compares a value between the previous and the current snapshot.
///
/// Fires the `increase` outcome when the value grew by more than
/// `materiality`, the `decrease` outcome (if any) when it shrank by more than
/// `materiality`. Skipped when there is no previous snapshot, or when the
/// previous value is missing or zero.
///
/// Template values: `{value}` (current), `{previous}`, `{delta}` (absolute
/// change), `{percent}` (absolute change relative to previous, 0 to 100).
/// `{s}` pluralizes on `{delta}`.
pub struct DeltaRule {
    pub id: String,
    pub category: String,
    pub cooldown: Duration,
    pub value: ValueExpr,
    pub materiality: f64,
    pub increase: Outcome,
    pub decrease: Option<Outcome>,
}

impl Rule for DeltaRule {
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
        let previous = self.value.eval(ctx.previous?)?;
        if previous == 0.0 {
            return None;
        }
        let current = self.value.eval(ctx.current)?;
        let delta = current - previous;

        let outcome = if delta > self.materiality {
            &self.increase
        } else if delta < -self.materiality {
            self.decrease.as_ref()?
        } else {
            return None;
        };

        let change = delta.abs();
        let vars = Vars::new(ctx.current)
            .number("value", current)
            .number("previous", previous)
            .number("delta", change)
            .number("percent", change / previous.abs() * 100.0)
            .plural_on(change);

        Some(Firing {
            severity: outcome.severity,
            message: outcome.template.render(&vars),
            level: None,
        })
    }
}
