use serde::{Deserialize, Serialize};

use crate::expr::parser::{BinaryOp, Expr, UnaryOp};
use crate::expr::EvalContext;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Num(f64),
    Bool(bool),
}

impl Value {
    pub fn truthy(self) -> bool {
        match self {
            Value::Num(v) => v != 0.0,
            Value::Bool(b) => b,
        }
    }

    pub fn numeric(self) -> f64 {
        match self {
            Value::Num(v) => v,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
        }
    }
}

/// Tree-walking interpreter over the variable context. Total: every input
/// tree produces a value, with division by zero defaulting to zero.
pub fn eval(expr: &Expr, ctx: &EvalContext) -> Value {
    match expr {
        Expr::Number(value) => Value::Num(*value),
        Expr::Bool(value) => Value::Bool(*value),
        Expr::Variable(name) => ctx.resolve(name),
        Expr::Unary { op, operand } => {
            let value = eval(operand, ctx);
            match op {
                UnaryOp::Neg => Value::Num(-value.numeric()),
                UnaryOp::Not => Value::Bool(!value.truthy()),
            }
        }
        Expr::Binary { op, left, right } => {
            let lhs = eval(left, ctx);
            let rhs = eval(right, ctx);
            match op {
                BinaryOp::And => Value::Bool(lhs.truthy() && rhs.truthy()),
                BinaryOp::Or => Value::Bool(lhs.truthy() || rhs.truthy()),
                BinaryOp::Lt => Value::Bool(lhs.numeric() < rhs.numeric()),
                BinaryOp::Le => Value::Bool(lhs.numeric() <= rhs.numeric()),
                BinaryOp::Gt => Value::Bool(lhs.numeric() > rhs.numeric()),
                BinaryOp::Ge => Value::Bool(lhs.numeric() >= rhs.numeric()),
                BinaryOp::Eq => Value::Bool(equals(lhs, rhs)),
                BinaryOp::Ne => Value::Bool(!equals(lhs, rhs)),
                BinaryOp::Add => Value::Num(lhs.numeric() + rhs.numeric()),
                BinaryOp::Sub => Value::Num(lhs.numeric() - rhs.numeric()),
                BinaryOp::Mul => Value::Num(lhs.numeric() * rhs.numeric()),
                BinaryOp::Div => {
                    let divisor = rhs.numeric();
                    if divisor == 0.0 {
                        Value::Num(0.0)
                    } else {
                        Value::Num(lhs.numeric() / divisor)
                    }
                }
            }
        }
    }
}

fn equals(lhs: Value, rhs: Value) -> bool {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => lhs.numeric() == rhs.numeric(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse;

    fn eval_str(input: &str, ctx: &EvalContext) -> Value {
        eval(&parse(input).unwrap(), ctx)
    }

    #[test]
    fn arithmetic_with_variables() {
        let mut ctx = EvalContext::new();
        ctx.set_num("a", 10.0);
        ctx.set_num("b", 4.0);
        assert_eq!(eval_str("a - b * 2", &ctx), Value::Num(2.0));
        assert_eq!(eval_str("(a - b) * 2", &ctx), Value::Num(12.0));
        assert_eq!(eval_str("-a + b", &ctx), Value::Num(-6.0));
    }

    #[test]
    fn division_by_zero_defaults_to_zero() {
        let ctx = EvalContext::new();
        assert_eq!(eval_str("10 / 0", &ctx), Value::Num(0.0));
        assert_eq!(eval_str("10 / missing", &ctx), Value::Num(0.0));
    }

    #[test]
    fn booleans_coerce_in_numeric_position() {
        let mut ctx = EvalContext::new();
        ctx.set_bool("flag", true);
        assert_eq!(eval_str("flag + 1", &ctx), Value::Num(2.0));
        assert_eq!(eval_str("flag == true", &ctx), Value::Bool(true));
        assert_eq!(eval_str("flag != false", &ctx), Value::Bool(true));
    }
}
