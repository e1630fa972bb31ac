use chrono::{Duration, Utc};
use finsight::insight::{
    generate_insights, GenerateOptions, InsightCategory, RuleRegistry, Severity,
};
use finsight::instrument::{build_instrument_spec, instrument_for_metric, InstrumentConfig};
use finsight::registry::{Direction, MetricId, MetricRegistry, StatusTone, ThresholdConfig};
use finsight::snapshot::{build_eval_context, DataQualityReport, MetricSnapshot};
use finsight::status::derive_status;

fn engine() -> (RuleRegistry, MetricRegistry) {
    (RuleRegistry::with_defaults(), MetricRegistry::with_defaults())
}

#[test]
fn boundary_values_resolve_to_the_favorable_tone_for_every_default_metric() {
    let registry = MetricRegistry::with_defaults();
    for entry in registry.iter() {
        assert_eq!(
            derive_status(entry.thresholds.warning, &entry.thresholds),
            StatusTone::Good,
            "warning boundary of {} should be good",
            entry.metric
        );
        assert_eq!(
            derive_status(entry.thresholds.critical, &entry.thresholds),
            StatusTone::Warning,
            "critical boundary of {} should be warning",
            entry.metric
        );
    }
}

#[test]
fn a_struggling_household_gets_prioritized_critical_insights() {
    let (rules, registry) = engine();
    let snapshot = MetricSnapshot::from_pairs(&[
        ("liquidityMonths", "0.5"),
        ("liquidAssets", "1500"),
        ("savingsRate", "-5"),
        ("monthlySurplus", "-320"),
        ("dscr", "0.9"),
        ("dtiRatio", "47"),
        ("fixedExpenseRatio", "74"),
    ]);
    let ctx = build_eval_context(&snapshot, None);
    let insights = generate_insights(&rules, &registry, &ctx, &GenerateOptions::default());

    assert_eq!(insights[0].rule_id, "critical-runway");
    assert_eq!(insights[0].severity, Severity::Critical);
    assert!(insights
        .iter()
        .any(|i| i.rule_id == "negative-surplus" && i.title.contains("320")));
    assert!(insights.iter().any(|i| i.rule_id == "dscr-breach"));
    assert!(insights.iter().any(|i| i.rule_id == "high-dti"));
    assert!(insights.iter().any(|i| i.rule_id == "high-fixed-expenses"));
}

#[test]
fn a_healthy_household_gets_only_positive_insights() {
    let (rules, registry) = engine();
    let snapshot = MetricSnapshot::from_pairs(&[
        ("liquidityMonths", "8"),
        ("savingsRate", "25"),
        ("monthlySurplus", "1500"),
        ("dscr", "2.1"),
        ("dtiRatio", "18"),
        ("fixedExpenseRatio", "40"),
        ("netWorthMarket", "120000"),
    ]);
    let ctx = build_eval_context(&snapshot, None);
    let insights = generate_insights(&rules, &registry, &ctx, &GenerateOptions::default());

    assert!(!insights.is_empty());
    assert!(insights.iter().all(|i| i.severity == Severity::Positive));
    let solid = insights.iter().find(|i| i.rule_id == "solid-savings").unwrap();
    assert!(solid.title.contains("25"));
}

#[test]
fn missing_metrics_still_generate_without_panicking() {
    let (rules, registry) = engine();
    let ctx = build_eval_context(&MetricSnapshot::default(), None);
    // Everything reads as zero: runway is critically low, savings rate is
    // exactly zero which lands in the low-savings band.
    let insights = generate_insights(&rules, &registry, &ctx, &GenerateOptions::default());
    assert!(insights.iter().any(|i| i.rule_id == "critical-runway"));
    assert!(insights.iter().any(|i| i.rule_id == "low-savings"));
}

#[test]
fn data_quality_report_surfaces_a_confidence_insight() {
    let (rules, registry) = engine();
    let snapshot = MetricSnapshot::from_pairs(&[("liquidityMonths", "4")]);
    let report = DataQualityReport {
        confidence_score: 35.0,
        issues: vec![],
    };
    let ctx = build_eval_context(&snapshot, Some(&report));
    let insights = generate_insights(&rules, &registry, &ctx, &GenerateOptions::default());
    let quality = insights
        .iter()
        .find(|i| i.category == InsightCategory::DataQuality)
        .expect("low confidence should surface");
    assert!(quality.explanation.contains("35"));
}

#[test]
fn instrument_scenario_from_the_contract() {
    let config = InstrumentConfig {
        id: "metric".to_string(),
        label: "Metric".to_string(),
        value: 2.0,
        value_formatted: "2".to_string(),
        unit: None,
        thresholds: ThresholdConfig {
            warning: 6.0,
            critical: 3.0,
            direction: Direction::HigherIsBetter,
        },
        delta: None,
        freshness_timestamp: None,
        goal_value: None,
        goal_formatted: None,
        actions: Vec::new(),
        recommendations: Vec::new(),
    };
    let spec = build_instrument_spec(config, Utc::now());
    assert_eq!(spec.tone, StatusTone::Critical);
    let explain = spec.explain.unwrap();
    assert!(explain.summary.contains("below critical threshold"));
    assert!(explain.summary.contains('1'));
}

#[test]
fn instruments_carry_freshness_derived_from_the_snapshot_age() {
    let registry = MetricRegistry::with_defaults();
    let now = Utc::now();
    let spec = instrument_for_metric(
        &registry,
        &MetricId::SavingsRate,
        12.0,
        None,
        Some(now - Duration::minutes(30)),
        now,
    )
    .unwrap();
    let freshness = spec.freshness.unwrap();
    assert_eq!(freshness.label, "fresh");
    assert_eq!(freshness.tone, StatusTone::Good);
}
