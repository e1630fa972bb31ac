use anyhow::Result;

use crate::insight::ContextualInsight;
use crate::instrument::InstrumentSpec;

pub fn insights_to_csv(insights: &[ContextualInsight]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rule_id",
        "severity",
        "category",
        "title",
        "explanation",
        "deep_link",
    ])?;
    for insight in insights {
        writer.write_record([
            insight.rule_id.clone(),
            format!("{:?}", insight.severity).to_lowercase(),
            format!("{:?}", insight.category).to_lowercase(),
            insight.title.clone(),
            insight.explanation.clone(),
            insight.deep_link.clone().unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn instruments_to_csv(instruments: &[InstrumentSpec]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "label", "value", "tone", "status_label", "explain"])?;
    for spec in instruments {
        writer.write_record([
            spec.id.clone(),
            spec.label.clone(),
            spec.value_formatted.clone(),
            spec.tone.to_string(),
            spec.status_label.clone(),
            spec.explain
                .as_ref()
                .map(|e| e.summary.clone())
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
