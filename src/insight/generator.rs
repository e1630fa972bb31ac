use std::collections::BTreeSet;
use std::str::FromStr;

use uuid::Uuid;

use crate::expr::{self, EvalContext, Value};
use crate::insight::interpolate::{format_variable, interpolate};
use crate::insight::{ContextualInsight, InsightCategory, RuleRegistry, SupportingMetric};
use crate::registry::{MetricId, MetricRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// When set, only the highest-priority matching rule per category is
    /// emitted. Default is multi-emission: overlapping rules in one
    /// category all fire.
    pub dedupe_categories: bool,
}

/// Evaluate every rule against the context, highest priority first, and
/// emit an insight for each match. Content is a pure function of the rule
/// and the context; only the generated id differs between calls.
pub fn generate_insights(
    rules: &RuleRegistry,
    metrics: &MetricRegistry,
    ctx: &EvalContext,
    options: &GenerateOptions,
) -> Vec<ContextualInsight> {
    let mut insights = Vec::new();
    let mut matched_categories: BTreeSet<InsightCategory> = BTreeSet::new();

    for rule in rules.by_priority() {
        if options.dedupe_categories && matched_categories.contains(&rule.category) {
            continue;
        }
        if !expr::evaluate(&rule.condition, ctx) {
            continue;
        }
        matched_categories.insert(rule.category);
        insights.push(ContextualInsight {
            id: Uuid::new_v4(),
            rule_id: rule.id.clone(),
            severity: rule.template.severity,
            category: rule.category,
            title: interpolate(&rule.template.title, ctx),
            explanation: interpolate(&rule.template.explanation, ctx),
            deep_link: rule.template.deep_link.clone(),
            actions: rule.template.actions.clone(),
            supporting_metrics: supporting_metrics(rule.category, metrics, ctx),
        });
    }

    insights
}

/// Which context variables a category surfaces alongside its insight text.
fn category_metric_names(category: InsightCategory) -> &'static [&'static str] {
    match category {
        InsightCategory::Runway => &["liquidityMonths", "liquidAssets"],
        InsightCategory::Savings => &["savingsRate", "monthlySurplus"],
        InsightCategory::Debt => &["dscr", "dtiRatio"],
        InsightCategory::CashFlow => &["monthlySurplus"],
        InsightCategory::Spending => &["fixedExpenseRatio"],
        InsightCategory::NetWorth => &["netWorthMarket"],
        InsightCategory::DataQuality => &["confidenceScore", "staleSourceCount"],
    }
}

fn supporting_metrics(
    category: InsightCategory,
    metrics: &MetricRegistry,
    ctx: &EvalContext,
) -> Vec<SupportingMetric> {
    let mut supporting = Vec::new();
    for name in category_metric_names(category) {
        let Some(value) = ctx.get(name) else {
            continue;
        };
        let label = MetricId::from_str(name)
            .ok()
            .and_then(|id| metrics.get(&id).map(|entry| entry.label.clone()))
            .unwrap_or_else(|| (*name).to_string());
        supporting.push(SupportingMetric {
            id: (*name).to_string(),
            label,
            value: match value {
                Value::Num(v) => *v,
                Value::Bool(b) => {
                    if *b {
                        1.0
                    } else {
                        0.0
                    }
                }
            },
            formatted: format_variable(name, value),
        });
    }
    supporting
}
