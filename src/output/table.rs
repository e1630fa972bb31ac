use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::insight::{ContextualInsight, Severity};
use crate::instrument::InstrumentSpec;
use crate::registry::{Direction, MetricRegistry, StatusTone};

fn tone_cell(tone: StatusTone, text: &str) -> Cell {
    match tone {
        StatusTone::Good => Cell::new(text).fg(Color::Green),
        StatusTone::Warning => Cell::new(text).fg(Color::Yellow),
        StatusTone::Critical => Cell::new(text).fg(Color::Red),
        StatusTone::Neutral | StatusTone::Info => Cell::new(text),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let text = format!("{severity:?}").to_uppercase();
    match severity {
        Severity::Critical => Cell::new(text).fg(Color::Red),
        Severity::Warning => Cell::new(text).fg(Color::Yellow),
        Severity::Info => Cell::new(text),
        Severity::Positive => Cell::new(text).fg(Color::Green),
    }
}

pub fn render_insights_table(insights: &[ContextualInsight]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Severity", "Category", "Title", "Explanation", "Rule"]);

    for insight in insights {
        table.add_row(Row::from(vec![
            severity_cell(insight.severity),
            Cell::new(format!("{:?}", insight.category)),
            Cell::new(&insight.title),
            Cell::new(&insight.explanation),
            Cell::new(&insight.rule_id),
        ]));
    }
    table.to_string()
}

pub fn render_instruments_table(instruments: &[InstrumentSpec]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value", "Status", "Delta", "Explain"]);

    for spec in instruments {
        let value = match &spec.unit {
            Some(unit) => format!("{} {unit}", spec.value_formatted),
            None => spec.value_formatted.clone(),
        };
        let delta = spec
            .delta
            .as_ref()
            .map(|d| d.formatted.clone())
            .unwrap_or_else(|| "-".to_string());
        let explain = spec
            .explain
            .as_ref()
            .map(|e| e.summary.clone())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(Row::from(vec![
            Cell::new(&spec.label),
            Cell::new(value),
            tone_cell(spec.tone, &spec.status_label),
            Cell::new(delta),
            Cell::new(explain),
        ]));
    }
    table.to_string()
}

pub fn render_registry_table(registry: &MetricRegistry) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Label", "Unit", "Warning", "Critical", "Direction"]);

    for entry in registry.iter() {
        let direction = match entry.thresholds.direction {
            Direction::HigherIsBetter => "higher is better",
            Direction::LowerIsBetter => "lower is better",
        };
        table.add_row(Row::from(vec![
            Cell::new(entry.metric.to_string()),
            Cell::new(&entry.label),
            Cell::new(&entry.unit),
            Cell::new(format!("{}", entry.thresholds.warning)),
            Cell::new(format!("{}", entry.thresholds.critical)),
            Cell::new(direction),
        ]));
    }
    table.to_string()
}
