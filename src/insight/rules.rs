use crate::insight::{InsightCategory, InsightRule, InsightTemplate, Severity};

#[allow(clippy::too_many_arguments)]
fn rule(
    id: &str,
    category: InsightCategory,
    priority: i32,
    condition: &str,
    severity: Severity,
    title: &str,
    explanation: &str,
    deep_link: Option<&str>,
    actions: &[&str],
) -> InsightRule {
    InsightRule {
        id: id.to_string(),
        category,
        priority,
        condition: condition.to_string(),
        template: InsightTemplate {
            severity,
            title: title.to_string(),
            explanation: explanation.to_string(),
            deep_link: deep_link.map(|s| s.to_string()),
            actions: actions.iter().map(|s| s.to_string()).collect(),
        },
    }
}

/// The built-in rule content. Runway conditions deliberately leave the
/// 3-6 month band silent: a partially funded emergency fund is neither
/// alarming nor praiseworthy.
pub fn default_rules() -> Vec<InsightRule> {
    vec![
        rule(
            "critical-runway",
            InsightCategory::Runway,
            100,
            "liquidityMonths < 1",
            Severity::Critical,
            "Emergency fund critically low",
            "You have {liquidityMonths} months of expenses in liquid savings. \
             A single missed paycheck could force you into debt.",
            Some("savings-goals"),
            &[
                "Move any idle cash into your emergency fund",
                "Set a starter goal of one month of expenses",
            ],
        ),
        rule(
            "negative-savings",
            InsightCategory::Savings,
            95,
            "savingsRate < 0",
            Severity::Critical,
            "You're spending more than you earn",
            "Your savings rate is {savingsRate}%. Every month at this pace \
             shrinks your safety net or grows your debt.",
            Some("budget"),
            &[
                "List your five largest expenses and cut one this month",
                "Check for recurring charges you no longer use",
            ],
        ),
        rule(
            "negative-surplus",
            InsightCategory::CashFlow,
            92,
            "monthlySurplus < 0",
            Severity::Critical,
            "Monthly deficit of {monthlySurplusAbs}",
            "Your expenses exceed income by {monthlySurplusAbs} per month. \
             The gap compounds quickly once savings run out.",
            Some("cash-flow"),
            &["Cut discretionary spending until cash flow turns positive"],
        ),
        rule(
            "dscr-breach",
            InsightCategory::Debt,
            90,
            "dscr < 1",
            Severity::Critical,
            "Debt payments exceed available income",
            "Your debt service coverage is {dscr}. Income after essentials \
             does not fully cover required debt payments.",
            Some("debt-planner"),
            &[
                "Contact lenders about hardship options before missing a payment",
                "Prioritize minimums on secured debt first",
            ],
        ),
        rule(
            "high-dti",
            InsightCategory::Debt,
            85,
            "dtiRatio > 43",
            Severity::Critical,
            "Debt load is over the lending ceiling",
            "Your debt-to-income ratio is {dtiRatio}%, above the 43% ceiling \
             most lenders apply. New credit will be expensive or unavailable.",
            Some("debt-planner"),
            &["Consolidate high-interest balances if a lower rate is available"],
        ),
        rule(
            "low-runway",
            InsightCategory::Runway,
            80,
            "liquidityMonths >= 1 && liquidityMonths < 3",
            Severity::Warning,
            "Emergency fund below 3 months",
            "You have {liquidityMonths} months of expenses saved. Three \
             months is the usual floor for a single-income household.",
            Some("savings-goals"),
            &["Automate a transfer into savings on payday"],
        ),
        rule(
            "high-fixed-expenses",
            InsightCategory::Spending,
            75,
            "fixedExpenseRatio > 70",
            Severity::Critical,
            "Fixed costs leave almost no room to adjust",
            "Fixed expenses take {fixedExpenseRatio}% of your income. With \
             so little flexible spending, any income shock hits immediately.",
            Some("spending"),
            &["Restructure housing or transport costs, the two largest fixed lines"],
        ),
        rule(
            "low-savings",
            InsightCategory::Savings,
            70,
            "savingsRate >= 0 && savingsRate < 5",
            Severity::Warning,
            "Savings rate under 5%",
            "You're saving {savingsRate}% of income. At this rate, a year of \
             saving covers less than one month of expenses.",
            Some("budget"),
            &["Raise your automatic savings by 1% of income"],
        ),
        rule(
            "dscr-tight",
            InsightCategory::Debt,
            65,
            "dscr >= 1 && dscr < 1.25",
            Severity::Warning,
            "Debt coverage is tight",
            "Your debt service coverage is {dscr}. A small income dip would \
             push debt payments underwater.",
            Some("debt-planner"),
            &["Avoid new debt until coverage clears 1.25"],
        ),
        rule(
            "elevated-dti",
            InsightCategory::Debt,
            60,
            "dtiRatio > 36 && dtiRatio <= 43",
            Severity::Warning,
            "Debt-to-income is elevated",
            "Your debt-to-income ratio is {dtiRatio}%, above the 36% level \
             considered healthy.",
            Some("debt-planner"),
            &["Target the highest-rate balance with extra payments"],
        ),
        rule(
            "thin-surplus",
            InsightCategory::CashFlow,
            55,
            "monthlySurplus >= 0 && monthlySurplus < 200",
            Severity::Warning,
            "Monthly margin is thin",
            "You end the month with {monthlySurplus} to spare. One irregular \
             bill would put you in deficit.",
            Some("cash-flow"),
            &["Trim one recurring expense to widen the buffer"],
        ),
        rule(
            "elevated-fixed-expenses",
            InsightCategory::Spending,
            50,
            "fixedExpenseRatio > 50 && fixedExpenseRatio <= 70",
            Severity::Warning,
            "Over half your income is committed",
            "Fixed expenses take {fixedExpenseRatio}% of income, limiting how \
             fast you can react to a change in circumstances.",
            Some("spending"),
            &["Renegotiate insurance, phone, and utility contracts"],
        ),
        rule(
            "negative-net-worth",
            InsightCategory::NetWorth,
            45,
            "netWorthMarket < 0",
            Severity::Warning,
            "Liabilities outweigh assets",
            "Your net worth is {netWorthMarket}. Common early in a career; \
             the trend matters more than the level.",
            Some("net-worth"),
            &["Pay down the highest-rate liability first"],
        ),
        rule(
            "low-confidence-data",
            InsightCategory::DataQuality,
            40,
            "hasDataQuality && confidenceScore < 60",
            Severity::Info,
            "These numbers may be out of date",
            "Data confidence is {confidenceScore}% with {staleSourceCount} \
             stale sources. Reconnect accounts to sharpen the picture.",
            Some("accounts"),
            &["Re-sync linked accounts"],
        ),
        rule(
            "strong-runway",
            InsightCategory::Runway,
            30,
            "liquidityMonths >= 6",
            Severity::Positive,
            "Emergency fund fully funded",
            "You have {liquidityMonths} months of expenses saved. Extra cash \
             beyond this could be working harder elsewhere.",
            Some("investments"),
            &["Consider moving savings beyond 6 months into investments"],
        ),
        rule(
            "solid-savings",
            InsightCategory::Savings,
            25,
            "savingsRate >= 15",
            Severity::Positive,
            "Solid {savingsRate}% savings rate",
            "You're saving {savingsRate}% of income, ahead of the common 15% \
             guideline. Keep the automation in place.",
            None,
            &["Review whether the surplus should go to tax-advantaged accounts"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    #[test]
    fn every_default_condition_parses() {
        for rule in default_rules() {
            assert!(
                parse(&rule.condition).is_ok(),
                "condition for '{}' failed to parse: {}",
                rule.id,
                rule.condition
            );
        }
    }

    #[test]
    fn runway_rules_leave_the_three_to_six_band_silent() {
        let runway: Vec<InsightRule> = default_rules()
            .into_iter()
            .filter(|r| r.category == InsightCategory::Runway)
            .collect();
        let mut ctx = crate::expr::EvalContext::new();
        ctx.set_num("liquidityMonths", 4.0);
        for rule in &runway {
            assert!(
                !crate::expr::evaluate(&rule.condition, &ctx),
                "rule '{}' unexpectedly fired at 4 months",
                rule.id
            );
        }
    }
}
