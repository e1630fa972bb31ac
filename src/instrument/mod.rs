pub mod factory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::{StatusTone, ThresholdConfig};
use crate::status::{DeltaReading, FreshnessReading};

pub use factory::{build_instrument_spec, build_instrument_spec_now, instrument_for_metric};

/// A click target the UI wires up; the engine never invokes these itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentAction {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub deep_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeltaInput {
    pub value: f64,
    pub formatted: String,
    #[serde(default)]
    pub basis: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentConfig {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub value_formatted: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub delta: Option<DeltaInput>,
    #[serde(default)]
    pub freshness_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub goal_value: Option<f64>,
    #[serde(default)]
    pub goal_formatted: Option<String>,
    #[serde(default)]
    pub actions: Vec<InstrumentAction>,
    /// Recommended actions for the derived tone, if the caller has them
    /// (typically from the metric registry). Folded into the explain block.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Emitted only when the value misses its target; a healthy metric has no
/// explain block at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplainBlock {
    pub summary: String,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// The uniform per-metric record every metric-displaying surface consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentSpec {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub value_formatted: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub tone: StatusTone,
    pub status_label: String,
    #[serde(default)]
    pub delta: Option<DeltaReading>,
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,
    #[serde(default)]
    pub goal_value: Option<f64>,
    #[serde(default)]
    pub goal_formatted: Option<String>,
    #[serde(default)]
    pub actions: Vec<InstrumentAction>,
    #[serde(default)]
    pub explain: Option<ExplainBlock>,
    #[serde(default)]
    pub freshness: Option<FreshnessReading>,
}
