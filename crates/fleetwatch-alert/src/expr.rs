use fleetwatch_common::types::MetricsSnapshot;

/// A numeric expression over snapshot counters.
///
/// Evaluation yields `None` when a referenced counter is missing, when a
/// ratio's denominator is zero, or when the result is not finite. Rules treat
/// `None` as "condition does not hold".
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    Counter(String),
    Constant(f64),
    Ratio(Box<ValueExpr>, Box<ValueExpr>),
    Difference(Box<ValueExpr>, Box<ValueExpr>),
    Scaled(Box<ValueExpr>, f64),
    /// `(current - base) / base * 100`
    PercentChange {
        base: Box<ValueExpr>,
        current: Box<ValueExpr>,
    },
    Abs(Box<ValueExpr>),
}

impl ValueExpr {
    pub fn counter(name: &str) -> Self {
        Self::Counter(name.to_string())
    }

    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    pub fn ratio(numerator: ValueExpr, denominator: ValueExpr) -> Self {
        Self::Ratio(Box::new(numerator), Box::new(denominator))
    }

    pub fn difference(minuend: ValueExpr, subtrahend: ValueExpr) -> Self {
        Self::Difference(Box::new(minuend), Box::new(subtrahend))
    }

    pub fn percent_change(base: ValueExpr, current: ValueExpr) -> Self {
        Self::PercentChange {
            base: Box::new(base),
            current: Box::new(current),
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::Scaled(Box::new(self), factor)
    }

    /// Shorthand for `self * 100`.
    pub fn percent(self) -> Self {
        self.scaled(100.0)
    }

    pub fn abs(self) -> Self {
        Self::Abs(Box::new(self))
    }

    pub fn eval(&self, snapshot: &MetricsSnapshot) -> Option<f64> {
        let value = match self {
            Self::Counter(name) => snapshot.counter(name)?,
            Self::Constant(v) => *v,
            Self::Ratio(num, den) => {
                let den = den.eval(snapshot)?;
                if den == 0.0 {
                    return None;
                }
                num.eval(snapshot)? / den
            }
            Self::Difference(a, b) => a.eval(snapshot)? - b.eval(snapshot)?,
            Self::Scaled(inner, factor) => inner.eval(snapshot)? * factor,
            Self::PercentChange { base, current } => {
                let base = base.eval(snapshot)?;
                if base == 0.0 {
                    return None;
                }
                (current.eval(snapshot)? - base) / base * 100.0
            }
            Self::Abs(inner) => inner.eval(snapshot)?.abs(),
        };
        value.is_finite().then_some(value)
    }
}
