use chrono::{DateTime, Utc};

use crate::expr::Value;
use crate::insight::interpolate::format_variable;
use crate::instrument::{DeltaInput, ExplainBlock, InstrumentConfig, InstrumentSpec};
use crate::registry::{Direction, MetricId, MetricRegistry, StatusTone};
use crate::status::{delta_direction, delta_tone, derive_freshness, derive_status, DeltaReading};

/// Assemble the uniform per-metric record: tone, status label, optional
/// delta and freshness readings, and an explain block when the value misses
/// its target. Pure in `config` and `now`.
pub fn build_instrument_spec(config: InstrumentConfig, now: DateTime<Utc>) -> InstrumentSpec {
    let tone = derive_status(config.value, &config.thresholds);

    let delta = config
        .delta
        .as_ref()
        .map(|input| delta_reading(input, config.thresholds.direction));
    let freshness = config
        .freshness_timestamp
        .map(|timestamp| derive_freshness(timestamp, now));
    let explain = build_explain(&config, tone);

    InstrumentSpec {
        id: config.id,
        label: config.label,
        value: config.value,
        value_formatted: config.value_formatted,
        unit: config.unit,
        tone,
        status_label: tone.status_label().to_string(),
        delta,
        thresholds: Some(config.thresholds),
        goal_value: config.goal_value,
        goal_formatted: config.goal_formatted,
        actions: config.actions,
        explain,
        freshness,
    }
}

pub fn build_instrument_spec_now(config: InstrumentConfig) -> InstrumentSpec {
    build_instrument_spec(config, Utc::now())
}

fn delta_reading(input: &DeltaInput, metric_direction: Direction) -> DeltaReading {
    let direction = delta_direction(input.value);
    DeltaReading {
        value: input.value,
        formatted: input.formatted.clone(),
        direction,
        tone: delta_tone(direction, metric_direction),
        basis: input.basis.clone(),
    }
}

fn build_explain(config: &InstrumentConfig, tone: StatusTone) -> Option<ExplainBlock> {
    let thresholds = &config.thresholds;
    let target = config.goal_value.unwrap_or(thresholds.warning);
    let target_formatted = config
        .goal_formatted
        .clone()
        .unwrap_or_else(|| format_value(&config.id, target));

    match tone {
        StatusTone::Critical => {
            let (relation, magnitude) = match thresholds.direction {
                Direction::HigherIsBetter => ("below", thresholds.critical - config.value),
                Direction::LowerIsBetter => ("above", config.value - thresholds.critical),
            };
            Some(ExplainBlock {
                summary: format!(
                    "{} is {relation} critical threshold by {}",
                    config.label,
                    format_value(&config.id, magnitude)
                ),
                details: Some(format!(
                    "Current {}; target {target_formatted}.",
                    config.value_formatted
                )),
                recommendations: recommendations_or(config, || {
                    format!(
                        "Getting {} back past {} should be the first priority",
                        config.label,
                        format_value(&config.id, thresholds.critical)
                    )
                }),
            })
        }
        StatusTone::Warning => {
            let (relation, gap) = match thresholds.direction {
                Direction::HigherIsBetter => ("short of", target - config.value),
                Direction::LowerIsBetter => ("over", config.value - target),
            };
            Some(ExplainBlock {
                summary: format!(
                    "{} is {relation} target by {}",
                    config.label,
                    format_value(&config.id, gap)
                ),
                details: Some(format!(
                    "Current {}; target {target_formatted}.",
                    config.value_formatted
                )),
                recommendations: recommendations_or(config, || {
                    format!("Close the gap to {target_formatted} over the coming months")
                }),
            })
        }
        StatusTone::Good | StatusTone::Neutral | StatusTone::Info => None,
    }
}

fn recommendations_or(config: &InstrumentConfig, fallback: impl Fn() -> String) -> Vec<String> {
    if config.recommendations.is_empty() {
        vec![fallback()]
    } else {
        config.recommendations.clone()
    }
}

fn format_value(id: &str, value: f64) -> String {
    format_variable(id, &Value::Num(value))
}

/// Convenience wrapper: build an instrument for a registry metric, pulling
/// label, unit, thresholds, and tone-matched recommended actions from the
/// registry entry. Returns `None` for metrics the registry does not know.
pub fn instrument_for_metric(
    registry: &MetricRegistry,
    metric: &MetricId,
    value: f64,
    baseline: Option<f64>,
    freshness_timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<InstrumentSpec> {
    let entry = registry.get(metric)?;
    let id = metric.to_string();
    let tone = derive_status(value, &entry.thresholds);

    let delta = baseline.map(|base| {
        let change = value - base;
        DeltaInput {
            value: change,
            formatted: format_signed(&id, change),
            basis: Some("previous snapshot".to_string()),
        }
    });

    let config = InstrumentConfig {
        id: id.clone(),
        label: entry.label.clone(),
        value,
        value_formatted: format_value(&id, value),
        unit: Some(entry.unit.clone()),
        thresholds: entry.thresholds,
        delta,
        freshness_timestamp,
        goal_value: None,
        goal_formatted: None,
        actions: Vec::new(),
        recommendations: entry.actions.for_tone(tone).to_vec(),
    };
    Some(build_instrument_spec(config, now))
}

fn format_signed(id: &str, value: f64) -> String {
    let formatted = format_value(id, value.abs());
    if value < 0.0 {
        format!("-{formatted}")
    } else {
        format!("+{formatted}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ThresholdConfig;
    use crate::status::{DeltaDirection, FreshnessBucket};
    use chrono::Duration;

    fn higher(warning: f64, critical: f64) -> ThresholdConfig {
        ThresholdConfig {
            warning,
            critical,
            direction: Direction::HigherIsBetter,
        }
    }

    fn base_config(value: f64, thresholds: ThresholdConfig) -> InstrumentConfig {
        InstrumentConfig {
            id: "liquidityMonths".to_string(),
            label: "Emergency Runway".to_string(),
            value,
            value_formatted: format!("{value:.1}"),
            unit: Some("months".to_string()),
            thresholds,
            delta: None,
            freshness_timestamp: None,
            goal_value: None,
            goal_formatted: None,
            actions: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn critical_value_explains_the_breach_magnitude() {
        let spec = build_instrument_spec(base_config(2.0, higher(6.0, 3.0)), Utc::now());
        assert_eq!(spec.tone, StatusTone::Critical);
        assert_eq!(spec.status_label, "Critical");
        let explain = spec.explain.expect("critical values must explain");
        assert!(explain.summary.contains("below critical threshold"));
        assert!(explain.summary.contains("1.0"));
        assert!(!explain.recommendations.is_empty());
    }

    #[test]
    fn warning_value_gets_a_milder_summary() {
        let spec = build_instrument_spec(base_config(4.0, higher(6.0, 3.0)), Utc::now());
        assert_eq!(spec.tone, StatusTone::Warning);
        let explain = spec.explain.expect("warning values must explain");
        assert!(explain.summary.contains("short of target"));
        assert!(!explain.summary.contains("critical"));
    }

    #[test]
    fn healthy_value_has_no_explain_block() {
        let spec = build_instrument_spec(base_config(7.0, higher(6.0, 3.0)), Utc::now());
        assert_eq!(spec.tone, StatusTone::Good);
        assert_eq!(spec.status_label, "Healthy");
        assert!(spec.explain.is_none());
    }

    #[test]
    fn goal_overrides_warning_as_the_explain_target() {
        let mut config = base_config(4.0, higher(6.0, 3.0));
        config.goal_value = Some(8.0);
        config.goal_formatted = Some("8.0 months".to_string());
        let spec = build_instrument_spec(config, Utc::now());
        let explain = spec.explain.unwrap();
        assert!(explain.summary.contains("4.0"));
        assert!(explain.details.unwrap().contains("8.0 months"));
    }

    #[test]
    fn delta_and_freshness_are_attached_when_supplied() {
        let now = Utc::now();
        let mut config = base_config(7.0, higher(6.0, 3.0));
        config.delta = Some(DeltaInput {
            value: -0.5,
            formatted: "-0.5".to_string(),
            basis: Some("last month".to_string()),
        });
        config.freshness_timestamp = Some(now - Duration::days(2));

        let spec = build_instrument_spec(config, now);
        let delta = spec.delta.unwrap();
        assert_eq!(delta.direction, DeltaDirection::Down);
        assert_eq!(delta.tone, StatusTone::Critical);
        let freshness = spec.freshness.unwrap();
        assert_eq!(freshness.bucket, FreshnessBucket::Aging);
    }

    #[test]
    fn factory_is_pure_for_identical_inputs() {
        let now = Utc::now();
        let config = base_config(2.0, higher(6.0, 3.0));
        let first = build_instrument_spec(config.clone(), now);
        let second = build_instrument_spec(config, now);
        assert_eq!(first, second);
    }

    #[test]
    fn registry_wrapper_pulls_labels_and_tone_actions() {
        let registry = MetricRegistry::with_defaults();
        let spec = instrument_for_metric(
            &registry,
            &MetricId::LiquidityMonths,
            2.0,
            Some(2.5),
            None,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(spec.label, "Emergency Runway");
        assert_eq!(spec.tone, StatusTone::Critical);
        let explain = spec.explain.unwrap();
        let registry_actions = registry
            .get(&MetricId::LiquidityMonths)
            .unwrap()
            .actions
            .critical
            .clone();
        assert_eq!(explain.recommendations, registry_actions);
        assert_eq!(spec.delta.unwrap().formatted, "-0.5");

        assert!(instrument_for_metric(
            &registry,
            &MetricId::Custom("nope".to_string()),
            1.0,
            None,
            None,
            Utc::now(),
        )
        .is_none());
    }
}
