pub mod eval;
pub mod parser;
pub mod token;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

pub use eval::Value;
pub use parser::{parse, BinaryOp, Expr, UnaryOp};

#[derive(Debug, Error, PartialEq)]
pub enum ExprError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("trailing input after expression: '{0}'")]
    TrailingTokens(String),
}

/// Named values a condition may reference. Unknown names resolve to zero,
/// which is falsy, so a rule over missing data fails closed instead of
/// crashing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalContext {
    vars: BTreeMap<String, Value>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_num(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), Value::Num(value));
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.vars.insert(name.into(), Value::Bool(value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn resolve(&self, name: &str) -> Value {
        self.vars.get(name).copied().unwrap_or(Value::Num(0.0))
    }
}

/// Evaluate a condition against a context. Malformed conditions evaluate to
/// false rather than propagating an error, so one bad rule cannot block the
/// rest of the registry.
pub fn evaluate(condition: &str, ctx: &EvalContext) -> bool {
    match parse(condition) {
        Ok(expr) => eval::eval(&expr, ctx).truthy(),
        Err(error) => {
            warn!("skipping malformed condition '{condition}': {error}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, f64)]) -> EvalContext {
        let mut ctx = EvalContext::new();
        for (name, value) in pairs {
            ctx.set_num(*name, *value);
        }
        ctx
    }

    #[test]
    fn evaluates_comparisons_and_boolean_combinations() {
        let ctx = ctx(&[("liquidityMonths", 0.5), ("savingsRate", 4.0)]);
        assert!(evaluate("liquidityMonths < 1", &ctx));
        assert!(evaluate("savingsRate >= 0 && savingsRate < 5", &ctx));
        assert!(!evaluate("savingsRate < 0 || liquidityMonths >= 1", &ctx));
    }

    #[test]
    fn arithmetic_and_parentheses() {
        let ctx = ctx(&[("income", 5000.0), ("expenses", 4200.0)]);
        assert!(evaluate("(income - expenses) / income * 100 >= 15", &ctx));
        assert!(evaluate("income - expenses == 800", &ctx));
    }

    #[test]
    fn unknown_variables_default_to_zero() {
        let ctx = EvalContext::new();
        assert!(evaluate("missingMetric <= 0", &ctx));
        assert!(!evaluate("missingMetric > 0", &ctx));
        assert!(!evaluate("missingFlag", &ctx));
    }

    #[test]
    fn malformed_conditions_fail_closed() {
        let ctx = ctx(&[("savingsRate", 25.0)]);
        assert!(!evaluate("savingsRate >==< 5", &ctx));
        assert!(!evaluate("savingsRate > ", &ctx));
        assert!(!evaluate("(savingsRate > 5", &ctx));
        assert!(!evaluate("", &ctx));
    }

    #[test]
    fn boolean_variables_participate_directly() {
        let mut ctx = EvalContext::new();
        ctx.set_bool("hasDataQuality", true);
        ctx.set_num("confidenceScore", 40.0);
        assert!(evaluate("hasDataQuality && confidenceScore < 60", &ctx));
        assert!(!evaluate("!hasDataQuality", &ctx));
    }
}
