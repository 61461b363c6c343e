use fleetwatch_common::types::Notification;

/// Per-pass filter applied to freshly fired notifications before they are
/// appended to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Keep every notification in `category`, followed by at most `others`
    /// from the remaining categories.
    PrioritizeCategory { category: String, others: usize },
    /// Keep the first `n` notifications.
    Limit(usize),
    Unlimited,
}

impl BatchPolicy {
    pub fn prioritize(category: &str, others: usize) -> Self {
        Self::PrioritizeCategory {
            category: category.to_string(),
            others,
        }
    }

    /// Applies the policy. Relative order within each group is kept.
    pub fn apply(&self, batch: Vec<Notification>) -> Vec<Notification> {
        match self {
            Self::PrioritizeCategory { category, others } => {
                let (mut kept, rest): (Vec<_>, Vec<_>) =
                    batch.into_iter().partition(|n| &n.category == category);
                kept.extend(rest.into_iter().take(*others));
                kept
            }
            Self::Limit(n) => batch.into_iter().take(*n).collect(),
            Self::Unlimited => batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fleetwatch_common::types::Severity;

    fn note(rule_id: &str, category: &str) -> Notification {
        Notification::new(
            rule_id,
            Severity::Info,
            category,
            format!("{rule_id} fired"),
            Utc::now(),
        )
    }

    fn rule_ids(batch: &[Notification]) -> Vec<&str> {
        batch.iter().map(|n| n.rule_id.as_str()).collect()
    }

    #[test]
    fn prioritized_category_is_never_truncated() {
        let batch = vec![
            note("revenue-target", "revenue"),
            note("daily-ticket-goal", "analytics"),
            note("tickets-high", "tickets"),
            note("unused-vehicles", "vehicles"),
            note("revenue-health-check", "analytics"),
        ];
        let kept = BatchPolicy::prioritize("analytics", 2).apply(batch);
        assert_eq!(
            rule_ids(&kept),
            vec![
                "daily-ticket-goal",
                "revenue-health-check",
                "revenue-target",
                "tickets-high"
            ]
        );
    }

    #[test]
    fn limit_keeps_leading_notifications() {
        let batch = vec![
            note("top-performer", "companies"),
            note("low-performers", "companies"),
            note("company-growth", "companies"),
            note("inactive-companies", "companies"),
        ];
        let kept = BatchPolicy::Limit(3).apply(batch);
        assert_eq!(
            rule_ids(&kept),
            vec!["top-performer", "low-performers", "company-growth"]
        );
        assert!(BatchPolicy::Limit(3).apply(Vec::new()).is_empty());
    }
}
