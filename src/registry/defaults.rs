use crate::registry::{
    Direction, MetricId, MetricRegistryEntry, StatusLabels, ThresholdConfig, ToneActions,
};

fn entry(
    metric: MetricId,
    label: &str,
    unit: &str,
    warning: f64,
    critical: f64,
    direction: Direction,
    status_labels: (&str, &str, &str),
    good_actions: &[&str],
    warning_actions: &[&str],
    critical_actions: &[&str],
) -> MetricRegistryEntry {
    MetricRegistryEntry {
        metric,
        label: label.to_string(),
        unit: unit.to_string(),
        thresholds: ThresholdConfig {
            warning,
            critical,
            direction,
        },
        status_labels: StatusLabels {
            good: status_labels.0.to_string(),
            warning: status_labels.1.to_string(),
            critical: status_labels.2.to_string(),
        },
        actions: ToneActions {
            good: good_actions.iter().map(|s| s.to_string()).collect(),
            warning: warning_actions.iter().map(|s| s.to_string()).collect(),
            critical: critical_actions.iter().map(|s| s.to_string()).collect(),
        },
    }
}

pub fn default_entries() -> Vec<MetricRegistryEntry> {
    vec![
        entry(
            MetricId::LiquidityMonths,
            "Emergency Runway",
            "months",
            6.0,
            3.0,
            Direction::HigherIsBetter,
            ("Fully funded", "Underfunded", "Critically low"),
            &["Keep contributing to stay ahead of expense growth"],
            &[
                "Set up an automatic transfer into your emergency fund",
                "Review discretionary spending for quick wins",
            ],
            &[
                "Redirect all surplus into liquid savings until you reach 3 months",
                "Pause non-essential subscriptions and large purchases",
            ],
        ),
        entry(
            MetricId::SavingsRate,
            "Savings Rate",
            "%",
            10.0,
            0.0,
            Direction::HigherIsBetter,
            ("On track", "Below target", "Spending exceeds income"),
            &["Consider raising retirement contributions"],
            &[
                "Increase your savings rate by 1-2% of income",
                "Automate savings on payday before spending",
            ],
            &[
                "Build a budget to bring spending back under income",
                "Review recurring charges and cancel what you do not use",
            ],
        ),
        entry(
            MetricId::Dscr,
            "Debt Service Coverage",
            "x",
            1.25,
            1.0,
            Direction::HigherIsBetter,
            ("Comfortable", "Tight", "Not covered"),
            &["Keep debt payments stable while income grows"],
            &[
                "Avoid taking on new debt until coverage improves",
                "Look for refinancing options at lower rates",
            ],
            &[
                "Contact lenders about hardship or restructuring options",
                "Prioritize minimum payments on secured debt first",
            ],
        ),
        entry(
            MetricId::DtiRatio,
            "Debt-to-Income",
            "%",
            36.0,
            43.0,
            Direction::LowerIsBetter,
            ("Healthy", "Elevated", "Overextended"),
            &["Maintain current payoff pace"],
            &[
                "Target the highest-rate balance with extra payments",
                "Hold off on new credit applications",
            ],
            &[
                "Consolidate high-interest debt if a lower rate is available",
                "Consider credit counseling before balances grow further",
            ],
        ),
        entry(
            MetricId::MonthlySurplus,
            "Monthly Surplus",
            "USD",
            500.0,
            0.0,
            Direction::HigherIsBetter,
            ("Positive cash flow", "Thin margin", "Running a deficit"),
            &["Direct surplus toward goals with the longest horizon"],
            &[
                "Trim one recurring expense to widen your buffer",
                "Review variable spending categories for drift",
            ],
            &[
                "Cut discretionary spending until cash flow turns positive",
                "Check for unused subscriptions and duplicate services",
            ],
        ),
        entry(
            MetricId::NetWorthMarket,
            "Net Worth",
            "USD",
            0.0,
            -25_000.0,
            Direction::HigherIsBetter,
            ("Growing", "Near zero", "Deeply negative"),
            &["Rebalance annually to keep allocation on plan"],
            &[
                "Grow assets faster than liabilities with automatic investing",
            ],
            &[
                "Focus on paying down liabilities before building positions",
            ],
        ),
        entry(
            MetricId::FixedExpenseRatio,
            "Fixed Expense Ratio",
            "%",
            50.0,
            70.0,
            Direction::LowerIsBetter,
            ("Flexible", "Committed", "Locked in"),
            &["Keep fixed commitments below half of income"],
            &[
                "Renegotiate insurance, phone, and utility contracts",
            ],
            &[
                "Restructure housing or transport costs, the two largest fixed lines",
                "Avoid new fixed commitments until the ratio falls below 70%",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MetricRegistry;

    #[test]
    fn defaults_cover_every_builtin_metric() {
        let registry = MetricRegistry::with_defaults();
        for metric in MetricId::ALL {
            assert!(registry.get(&metric).is_some(), "missing entry: {metric}");
        }
    }

    #[test]
    fn every_entry_has_warning_and_critical_actions() {
        for entry in default_entries() {
            assert!(!entry.actions.warning.is_empty(), "{}", entry.metric);
            assert!(!entry.actions.critical.is_empty(), "{}", entry.metric);
        }
    }
}
