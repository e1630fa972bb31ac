pub mod defaults;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Good,
    Warning,
    Critical,
    Neutral,
    Info,
}

impl StatusTone {
    /// Fixed human label used wherever a metric-specific label is not configured.
    pub fn status_label(self) -> &'static str {
        match self {
            Self::Good => "Healthy",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::Neutral => "Neutral",
            Self::Info => "Info",
        }
    }
}

impl Display for StatusTone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tone = match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Neutral => "neutral",
            Self::Info => "info",
        };
        write!(f, "{tone}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Warning/critical boundaries for one metric. `direction` decides whether
/// the boundaries are floors or ceilings; `critical` is always the more
/// extreme (worse) of the two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    pub warning: f64,
    pub critical: f64,
    pub direction: Direction,
}

impl ThresholdConfig {
    pub fn merged(&self, overrides: &ThresholdOverride) -> ThresholdConfig {
        ThresholdConfig {
            warning: overrides.warning.unwrap_or(self.warning),
            critical: overrides.critical.unwrap_or(self.critical),
            direction: overrides.direction.unwrap_or(self.direction),
        }
    }
}

/// Partial threshold record merged over a registry default without mutating it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct ThresholdOverride {
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum MetricId {
    LiquidityMonths,
    SavingsRate,
    Dscr,
    DtiRatio,
    MonthlySurplus,
    NetWorthMarket,
    FixedExpenseRatio,
    Custom(String),
}

impl MetricId {
    pub const ALL: [MetricId; 7] = [
        MetricId::LiquidityMonths,
        MetricId::SavingsRate,
        MetricId::Dscr,
        MetricId::DtiRatio,
        MetricId::MonthlySurplus,
        MetricId::NetWorthMarket,
        MetricId::FixedExpenseRatio,
    ];
}

impl Display for MetricId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LiquidityMonths => write!(f, "liquidityMonths"),
            Self::SavingsRate => write!(f, "savingsRate"),
            Self::Dscr => write!(f, "dscr"),
            Self::DtiRatio => write!(f, "dtiRatio"),
            Self::MonthlySurplus => write!(f, "monthlySurplus"),
            Self::NetWorthMarket => write!(f, "netWorthMarket"),
            Self::FixedExpenseRatio => write!(f, "fixedExpenseRatio"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown metric id: {0}")]
pub struct MetricIdParseError(pub String);

impl FromStr for MetricId {
    type Err = MetricIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_ascii_lowercase().replace(['-', '_'], "");
        let id = match normalized.as_str() {
            "liquiditymonths" | "runwaymonths" => MetricId::LiquidityMonths,
            "savingsrate" => MetricId::SavingsRate,
            "dscr" | "debtservicecoverage" => MetricId::Dscr,
            "dtiratio" | "dti" => MetricId::DtiRatio,
            "monthlysurplus" | "surplus" => MetricId::MonthlySurplus,
            "networthmarket" | "networth" => MetricId::NetWorthMarket,
            "fixedexpenseratio" => MetricId::FixedExpenseRatio,
            _ => {
                if trimmed.is_empty() {
                    return Err(MetricIdParseError(s.to_string()));
                }
                MetricId::Custom(trimmed.to_string())
            }
        };
        Ok(id)
    }
}

/// Per-tone status labels for one metric. Neutral and info fall back to the
/// generic tone label since no metric configures text for them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusLabels {
    pub good: String,
    pub warning: String,
    pub critical: String,
}

impl StatusLabels {
    pub fn for_tone(&self, tone: StatusTone) -> &str {
        match tone {
            StatusTone::Good => &self.good,
            StatusTone::Warning => &self.warning,
            StatusTone::Critical => &self.critical,
            StatusTone::Neutral | StatusTone::Info => tone.status_label(),
        }
    }
}

/// Per-tone recommended actions for one metric.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ToneActions {
    pub good: Vec<String>,
    pub warning: Vec<String>,
    pub critical: Vec<String>,
}

impl ToneActions {
    pub fn for_tone(&self, tone: StatusTone) -> &[String] {
        match tone {
            StatusTone::Good => &self.good,
            StatusTone::Warning => &self.warning,
            StatusTone::Critical => &self.critical,
            StatusTone::Neutral | StatusTone::Info => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRegistryEntry {
    pub metric: MetricId,
    pub label: String,
    pub unit: String,
    pub thresholds: ThresholdConfig,
    pub status_labels: StatusLabels,
    pub actions: ToneActions,
}

/// Read-only threshold table built once at startup and injected into the
/// insight generator and instrument factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricRegistry {
    entries: BTreeMap<MetricId, MetricRegistryEntry>,
}

impl MetricRegistry {
    pub fn with_defaults() -> Self {
        Self::from_entries(defaults::default_entries())
    }

    pub fn from_entries(entries: Vec<MetricRegistryEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.insert(entry.metric.clone(), entry);
        }
        Self { entries: map }
    }

    pub fn with_overrides(mut self, overrides: &BTreeMap<MetricId, ThresholdOverride>) -> Self {
        for (metric, partial) in overrides {
            if let Some(entry) = self.entries.get_mut(metric) {
                entry.thresholds = entry.thresholds.merged(partial);
            }
        }
        self
    }

    pub fn get(&self, metric: &MetricId) -> Option<&MetricRegistryEntry> {
        self.entries.get(metric)
    }

    /// Clone of an entry with a partial override merged in. The stored
    /// default entry is left untouched.
    pub fn entry_with_overrides(
        &self,
        metric: &MetricId,
        overrides: &ThresholdOverride,
    ) -> Option<MetricRegistryEntry> {
        let entry = self.entries.get(metric)?;
        let mut merged = entry.clone();
        merged.thresholds = merged.thresholds.merged(overrides);
        Some(merged)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricRegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
