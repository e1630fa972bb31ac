pub mod generator;
pub mod interpolate;
pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

pub use generator::{generate_insights, GenerateOptions};
pub use interpolate::interpolate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Positive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    Runway,
    Savings,
    Debt,
    CashFlow,
    Spending,
    NetWorth,
    DataQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightTemplate {
    pub severity: Severity,
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// A declarative rule: evaluated many times, never mutated. The condition
/// may only reference variable names the evaluation context provides;
/// unknown names read as zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightRule {
    pub id: String,
    pub category: InsightCategory,
    /// Higher fires first. Ties keep declaration order.
    pub priority: i32,
    pub condition: String,
    pub template: InsightTemplate,
}

/// Immutable, injectable set of rules. Duplicate ids keep the first
/// declaration and drop the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleRegistry {
    rules: Vec<InsightRule>,
}

impl RuleRegistry {
    pub fn with_defaults() -> Self {
        Self::from_rules(rules::default_rules())
    }

    pub fn from_rules(rules: Vec<InsightRule>) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        let mut unique = Vec::with_capacity(rules.len());
        for rule in rules {
            if !seen.insert(rule.id.clone()) {
                warn!("dropping duplicate rule id: {}", rule.id);
                continue;
            }
            unique.push(rule);
        }
        Self { rules: unique }
    }

    pub fn rules(&self) -> &[InsightRule] {
        &self.rules
    }

    /// Rules ordered by priority descending. The sort is stable so equal
    /// priorities keep declaration order, which makes generation
    /// deterministic.
    pub fn by_priority(&self) -> Vec<&InsightRule> {
        let mut ordered: Vec<&InsightRule> = self.rules.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
        ordered
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportingMetric {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub formatted: String,
}

/// Generated output. Fresh id per generation; content depends only on the
/// rule and the context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextualInsight {
    pub id: Uuid,
    pub rule_id: String,
    pub severity: Severity,
    pub category: InsightCategory,
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub supporting_metrics: Vec<SupportingMetric>,
}
