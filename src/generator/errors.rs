//! Error types of the generator.
//!
//! `TaskGenError` covers everything that stops the pipeline and is reported back to the user
//! (malformed equations, bad numbers, a broken task document). `SolverFailure` is recorded
//! inside a single generated instance and never aborts a batch.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskGenError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskGenError {
    #[error("equation '{line}' must contain exactly one '=', found {found}")]
    EquationFormat { line: String, found: usize },
    #[error("cannot parse expression '{text}': {cause}")]
    ExpressionParse { text: String, cause: String },
    #[error("'{text}' given for '{name}' is not a number")]
    InvalidNumericInput { name: String, text: String },
    #[error("invalid range '{text}' for '{name}': {reason}")]
    InvalidRange {
        name: String,
        text: String,
        reason: String,
    },
    #[error("'{0}' is not a variable of the equation system")]
    UnknownVariable(String),
    #[error("variable '{0}' is declared both known and target")]
    ConflictingClassification(String),
    #[error("the equation system is empty")]
    EmptySystem,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TaskGenError {
    fn from(e: std::io::Error) -> Self {
        TaskGenError::Io(e.to_string())
    }
}

impl From<csv::Error> for TaskGenError {
    fn from(e: csv::Error) -> Self {
        TaskGenError::Io(e.to_string())
    }
}

/// why an instance has no (complete) solution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverFailure {
    #[error("solver gave up after {0} ms")]
    Timeout(u128),
    #[error("solver did not converge: {0}")]
    NotConverged(String),
    #[error("the same variable is fixed to different values")]
    Inconsistent,
    #[error("unsupported system: {0}")]
    Unsupported(String),
    #[error("variables without a value: {}", .0.join(", "))]
    UnresolvedVariables(Vec<String>),
}
