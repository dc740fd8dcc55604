//! Tunables for a [`Graph`](crate::graph::Graph).
//!
//! Settings can be built in code or loaded from JSON. Every field has a default,
//! so a partial document such as `{"balance_tolerance": 1e-6}` is valid.

use crate::error::ConfigError;
use crate::evaluator::Evaluator;
use serde::{Deserialize, Serialize};

/// Longest expression any graph accepts, in bytes.
///
/// Evaluation, printing and dropping an [`Expression`](crate::ast::Expression)
/// recurse once per tree level, and an operator chain adds one level per
/// operator. At this length the tree stays a few thousand levels deep.
pub const MAX_EXPRESSION_LENGTH: usize = 4096;

/// Deepest parenthesis nesting any graph accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Bounds applied to every expression before it is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionLimits {
    /// Longest accepted expression, in bytes.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Deepest accepted parenthesis nesting.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl ExpressionLimits {
    /// These limits with each bound lowered to its hard ceiling.
    pub fn clamped(self) -> Self {
        Self {
            max_length: self.max_length.min(MAX_EXPRESSION_LENGTH),
            max_depth: self.max_depth.min(MAX_NESTING_DEPTH),
        }
    }
}

impl Default for ExpressionLimits {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            max_depth: default_max_depth(),
        }
    }
}

/// Graph-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub expression: ExpressionLimits,

    /// Net rates with a smaller magnitude are reported as nearly balanced.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: f64,

    /// Capacity expression given to newly added processes.
    #[serde(default = "default_one")]
    pub default_capacity: String,

    /// Speed expression given to newly added processes.
    #[serde(default = "default_one")]
    pub default_speed: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expression: ExpressionLimits::default(),
            balance_tolerance: default_balance_tolerance(),
            default_capacity: default_one(),
            default_speed: default_one(),
        }
    }
}

impl Settings {
    /// Parses settings from a JSON document and validates them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the values a graph relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = self.expression;
        if limits.max_length == 0 || limits.max_length > MAX_EXPRESSION_LENGTH {
            return Err(invalid(
                "expression.max_length",
                format!("must be between 1 and {}, got {}", MAX_EXPRESSION_LENGTH, limits.max_length),
            ));
        }
        if limits.max_depth == 0 || limits.max_depth > MAX_NESTING_DEPTH {
            return Err(invalid(
                "expression.max_depth",
                format!("must be between 1 and {}, got {}", MAX_NESTING_DEPTH, limits.max_depth),
            ));
        }
        if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
            return Err(invalid(
                "balance_tolerance",
                format!("must be a finite, non-negative number, got {}", self.balance_tolerance),
            ));
        }

        let evaluator = Evaluator::new(self.expression);
        let capacity = evaluator
            .evaluate(&self.default_capacity)
            .map_err(|e| invalid("default_capacity", e.to_string()))?;
        if capacity < 0.0 {
            return Err(invalid("default_capacity", "must not be negative"));
        }
        evaluator
            .evaluate(&self.default_speed)
            .map_err(|e| invalid("default_speed", e.to_string()))?;
        Ok(())
    }
}

fn invalid(name: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        message: message.into(),
    }
}

fn default_max_length() -> usize {
    MAX_EXPRESSION_LENGTH
}

fn default_max_depth() -> usize {
    64
}

fn default_balance_tolerance() -> f64 {
    1e-9
}

fn default_one() -> String {
    "1".to_string()
}
