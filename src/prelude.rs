//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the factor crate, so an
//! editor can drive the engine with a single `use factor::prelude::*;`.

// Expression evaluation
pub use crate::ast::Expression;
pub use crate::evaluator::{Evaluator, evaluate};

// Graph model and edits
pub use crate::graph::{
    Direction, EntityRef, Field, FieldRef, Flow, FlowId, Graph, GraphBuilder, Process,
    ProcessField, ProcessId, Resource, ResourceId,
};

// Queries
pub use crate::balance::{BalanceReport, RateStatus, ResourceBalance};
pub use crate::solver::{Clamp, Solution};

// Configuration
pub use crate::config::{ExpressionLimits, MAX_EXPRESSION_LENGTH, MAX_NESTING_DEPTH, Settings};

// Error types
pub use crate::error::{
    ConfigError, EvalError, ExprError, GraphError, ParseError, SolveError, UnsolvableReason,
};

// Display
pub use crate::format::{format_rate, format_si};
