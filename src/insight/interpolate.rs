use crate::expr::{EvalContext, Value};

/// Metric names rendered as whole-percent figures.
const PERCENT_NAMES: [&str; 4] = [
    "savingsRate",
    "dtiRatio",
    "fixedExpenseRatio",
    "confidenceScore",
];

/// Metric names rendered as whole currency amounts, no cents.
const CURRENCY_NAMES: [&str; 7] = [
    "monthlySurplus",
    "monthlySurplusAbs",
    "netWorthMarket",
    "liquidAssets",
    "monthlyIncome",
    "monthlyExpenses",
    "totalDebt",
];

/// Replace each `{name}` placeholder with the formatted context value.
/// Placeholders with no matching variable are left verbatim so a partially
/// populated context degrades to odd-looking text instead of an error.
pub fn interpolate(template: &str, ctx: &EvalContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after_open[..close];
        match ctx.get(name) {
            Some(value) => out.push_str(&format_variable(name, value)),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Fixed formatting policy per well-known metric name: months to one
/// decimal, percentages and currency to integers, coverage ratios to two
/// decimals.
pub fn format_variable(name: &str, value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Num(v) => format_numeric(name, *v),
    }
}

fn format_numeric(name: &str, value: f64) -> String {
    if name == "liquidityMonths" || name.ends_with("Months") {
        return format!("{value:.1}");
    }
    if PERCENT_NAMES.contains(&name) {
        return format!("{value:.0}");
    }
    if CURRENCY_NAMES.contains(&name) {
        return format!("{value:.0}");
    }
    if name == "dscr" {
        return format!("{value:.2}");
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_with_per_metric_formatting() {
        let mut ctx = EvalContext::new();
        ctx.set_num("liquidityMonths", 4.25);
        ctx.set_num("savingsRate", 25.4);
        ctx.set_num("monthlySurplusAbs", 812.7);
        ctx.set_num("dscr", 1.5);

        assert_eq!(
            interpolate("{liquidityMonths} months saved", &ctx),
            "4.2 months saved"
        );
        assert_eq!(interpolate("rate is {savingsRate}%", &ctx), "rate is 25%");
        assert_eq!(
            interpolate("deficit of ${monthlySurplusAbs}", &ctx),
            "deficit of $813"
        );
        assert_eq!(interpolate("coverage {dscr}x", &ctx), "coverage 1.50x");
    }

    #[test]
    fn unknown_placeholders_are_left_verbatim() {
        let ctx = EvalContext::new();
        assert_eq!(
            interpolate("value is {notThere}", &ctx),
            "value is {notThere}"
        );
    }

    #[test]
    fn unterminated_placeholder_passes_through() {
        let mut ctx = EvalContext::new();
        ctx.set_num("a", 1.0);
        assert_eq!(interpolate("broken {a", &ctx), "broken {a");
    }

    #[test]
    fn adjacent_placeholders_and_literal_text() {
        let mut ctx = EvalContext::new();
        ctx.set_num("a", 1.0);
        ctx.set_num("b", 2.0);
        assert_eq!(interpolate("{a}{b}", &ctx), "12");
        assert_eq!(interpolate("no placeholders", &ctx), "no placeholders");
    }
}
