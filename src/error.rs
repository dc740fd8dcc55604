use crate::graph::{FieldRef, FlowId, ProcessId, ResourceId};
use thiserror::Error;

/// Errors raised while turning expression text into an AST.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expression is empty")]
    Empty,

    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },

    #[error("Unexpected token '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },

    #[error("Expression ended where an operand was expected")]
    UnexpectedEnd,

    #[error("Parenthesis opened at position {opened_at} is never closed")]
    UnclosedParenthesis { opened_at: usize },

    #[error("Closing parenthesis at position {position} has no matching '('")]
    UnmatchedParenthesis { position: usize },

    #[error("Invalid number literal '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("Expression is {length} bytes long, the limit is {limit}")]
    TooLong { length: usize, limit: usize },

    #[error("Parentheses are nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Errors raised while evaluating a syntactically valid expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Operation '{operation}' produced a non-finite result")]
    Overflow { operation: &'static str },
}

/// Any failure of the expression evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Errors produced by graph mutators and rate queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Process {0} does not exist")]
    UnknownProcess(ProcessId),

    #[error("Resource {0} does not exist")]
    UnknownResource(ResourceId),

    #[error("Flow {0} does not exist")]
    UnknownFlow(FlowId),

    #[error("Expression for {field} was rejected: {source}")]
    Expression {
        field: FieldRef,
        #[source]
        source: ExprError,
    },

    #[error("Base rate for a flow from {process} to {resource} was rejected: {source}")]
    InvalidBaseRate {
        process: ProcessId,
        resource: ResourceId,
        #[source]
        source: ExprError,
    },

    #[error("Capacity of process {process} cannot be negative (got {value})")]
    NegativeCapacity { process: ProcessId, value: f64 },
}

/// Why the solver could not produce an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsolvableReason {
    /// The flow's own speed times base rate is zero.
    ZeroGain,
    /// The owner's flows on the resource cancel each other out.
    CancellingFlows,
    /// The inversion produced an infinite or NaN activity.
    NonFinite,
}

impl std::fmt::Display for UnsolvableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsolvableReason::ZeroGain => write!(f, "speed times base rate is zero"),
            UnsolvableReason::CancellingFlows => {
                write!(f, "the owner's flows on this resource cancel out")
            }
            UnsolvableReason::NonFinite => write!(f, "the required activity is not finite"),
        }
    }
}

/// Errors produced by the auto-balance solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Flow {flow} cannot balance its resource: {reason}")]
    Unsolvable {
        flow: FlowId,
        reason: UnsolvableReason,
    },
}

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting '{name}': {message}")]
    Invalid { name: &'static str, message: String },
}
