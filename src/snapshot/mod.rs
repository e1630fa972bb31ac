use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expr::EvalContext;

/// Flat metric id -> decimal-as-text mapping produced by the backend.
/// Treated as immutable input; absent or unparsable values read as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MetricSnapshot {
    pub values: BTreeMap<String, String>,
}

impl MetricSnapshot {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut values = BTreeMap::new();
        for (key, value) in pairs {
            values.insert(key.to_string(), value.to_string());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn numeric(&self, key: &str) -> f64 {
        self.values
            .get(key)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataQualityReport {
    /// Backend confidence in the snapshot, 0-100.
    pub confidence_score: f64,
    #[serde(default)]
    pub issues: Vec<FreshnessIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreshnessIssue {
    pub source: String,
    pub message: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Flatten a snapshot and optional data-quality report into the variable
/// context rules evaluate against. Every snapshot key becomes a numeric
/// variable; `monthlySurplusAbs` is derived so templates can show deficit
/// magnitudes without arithmetic in the rule text.
pub fn build_eval_context(
    snapshot: &MetricSnapshot,
    quality: Option<&DataQualityReport>,
) -> EvalContext {
    let mut ctx = EvalContext::new();
    for key in snapshot.values.keys() {
        ctx.set_num(key.clone(), snapshot.numeric(key));
    }
    if snapshot.contains("monthlySurplus") {
        ctx.set_num("monthlySurplusAbs", snapshot.numeric("monthlySurplus").abs());
    }

    ctx.set_bool("hasDataQuality", quality.is_some());
    if let Some(report) = quality {
        ctx.set_num("confidenceScore", report.confidence_score);
        ctx.set_num("staleSourceCount", report.issues.len() as f64);
    }
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Value;

    #[test]
    fn missing_and_unparsable_values_read_as_zero() {
        let snapshot = MetricSnapshot::from_pairs(&[("savingsRate", "not-a-number")]);
        assert_eq!(snapshot.numeric("savingsRate"), 0.0);
        assert_eq!(snapshot.numeric("liquidityMonths"), 0.0);
    }

    #[test]
    fn context_exposes_snapshot_values_and_derived_surplus_magnitude() {
        let snapshot =
            MetricSnapshot::from_pairs(&[("monthlySurplus", "-250.5"), ("savingsRate", "12")]);
        let ctx = build_eval_context(&snapshot, None);
        assert_eq!(ctx.resolve("savingsRate"), Value::Num(12.0));
        assert_eq!(ctx.resolve("monthlySurplusAbs"), Value::Num(250.5));
        assert_eq!(ctx.resolve("hasDataQuality"), Value::Bool(false));
    }

    #[test]
    fn data_quality_report_adds_confidence_variables() {
        let snapshot = MetricSnapshot::default();
        let report = DataQualityReport {
            confidence_score: 42.0,
            issues: vec![FreshnessIssue {
                source: "plaid".to_string(),
                message: "account last synced 9 days ago".to_string(),
                last_updated: None,
            }],
        };
        let ctx = build_eval_context(&snapshot, Some(&report));
        assert_eq!(ctx.resolve("confidenceScore"), Value::Num(42.0));
        assert_eq!(ctx.resolve("staleSourceCount"), Value::Num(1.0));
        assert_eq!(ctx.resolve("hasDataQuality"), Value::Bool(true));
    }
}
