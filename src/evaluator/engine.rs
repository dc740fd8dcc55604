use crate::ast::Expression;
use crate::error::EvalError;

/// The recursive engine for evaluating a single parsed AST.
pub(super) struct AstEngine<'a> {
    expression: &'a Expression,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(expression: &'a Expression) -> Self {
        Self { expression }
    }

    pub(super) fn evaluate(&self) -> Result<f64, EvalError> {
        self.evaluate_recursive(self.expression)
    }

    fn evaluate_recursive(&self, expr: &Expression) -> Result<f64, EvalError> {
        match expr {
            Expression::Sum(l, r) => self.eval_binary(l, r, "+", |a, b| a + b),
            Expression::Subtract(l, r) => self.eval_binary(l, r, "-", |a, b| a - b),
            Expression::Multiply(l, r) => self.eval_binary(l, r, "*", |a, b| a * b),
            Expression::Divide(l, r) => {
                let numerator = self.evaluate_recursive(l)?;
                let denominator = self.evaluate_recursive(r)?;
                // Matches -0.0 as well.
                if denominator == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                finite("/", numerator / denominator)
            }
            Expression::Negate(v) => Ok(-self.evaluate_recursive(v)?),
            Expression::Literal(n) => finite("literal", *n),
        }
    }

    fn eval_binary<F>(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        f: F,
    ) -> Result<f64, EvalError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let lv = self.evaluate_recursive(l)?;
        let rv = self.evaluate_recursive(r)?;
        finite(op, f(lv, rv))
    }
}

fn finite(operation: &'static str, value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Overflow { operation })
    }
}
