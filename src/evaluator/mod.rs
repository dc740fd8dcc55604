use crate::ast::Expression;
use crate::config::ExpressionLimits;
use crate::error::{EvalError, ExprError, ParseError};
use crate::parser;

mod engine;

use engine::AstEngine;

/// Turns expression text into numbers.
///
/// An `Evaluator` only holds the input limits, so it is cheap to copy and can be
/// shared by every numeric field of a graph. Evaluation is a pure function of the
/// input string: `/` is always floating-point division, dividing by zero is an
/// [`EvalError`], and malformed syntax is a [`ParseError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    limits: ExpressionLimits,
}

impl Evaluator {
    /// Limits above [`MAX_EXPRESSION_LENGTH`](crate::config::MAX_EXPRESSION_LENGTH)
    /// or [`MAX_NESTING_DEPTH`](crate::config::MAX_NESTING_DEPTH) are lowered to them.
    pub fn new(limits: ExpressionLimits) -> Self {
        Self {
            limits: limits.clamped(),
        }
    }

    pub fn limits(&self) -> &ExpressionLimits {
        &self.limits
    }

    /// Parses `source` without evaluating it.
    pub fn parse(&self, source: &str) -> Result<Expression, ParseError> {
        let expr = parser::parse(source, &self.limits)?;
        log::trace!("parsed '{}' as {}", source, expr);
        Ok(expr)
    }

    /// Parses and evaluates `source`.
    pub fn evaluate(&self, source: &str) -> Result<f64, ExprError> {
        let expr = self.parse(source)?;
        Ok(eval_ast(&expr)?)
    }
}

/// Evaluates an already parsed expression.
pub fn eval_ast(expr: &Expression) -> Result<f64, EvalError> {
    AstEngine::new(expr).evaluate()
}

/// Evaluates `source` with the default [`ExpressionLimits`].
///
/// ```
/// use factor::evaluate;
///
/// assert_eq!(evaluate("2+3*4").unwrap(), 14.0);
/// assert!(evaluate("1/0").is_err());
/// ```
pub fn evaluate(source: &str) -> Result<f64, ExprError> {
    Evaluator::default().evaluate(source)
}
