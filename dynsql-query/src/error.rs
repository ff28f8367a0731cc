//! Error types for condition construction and rendering.
//!
//! Every error carries an [`ErrorCode`] for programmatic handling plus a
//! human-readable message and optional context.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: D{category}{number}
//! - 1xxx: Condition construction errors (empty operand lists)
//! - 7xxx: Configuration errors
//! - 9xxx: Internal faults (parameter key collisions, worker panics)
//!
//! ```rust
//! use dynsql_query::{ErrorCode, RenderError};
//!
//! let err = RenderError::empty_operand("in");
//! assert_eq!(err.code, ErrorCode::EmptyOperand);
//! assert_eq!(err.code.code(), "D1001");
//! assert!(!err.is_programming_error());
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Construction errors (1xxx)
    /// A list-valued condition was built with zero operands (D1001).
    EmptyOperand = 1001,

    // Configuration errors (7xxx)
    /// Invalid configuration value (D7001).
    InvalidConfiguration = 7001,
    /// Configuration file could not be read (D7002).
    ConfigIo = 7002,

    // Internal errors (9xxx)
    /// Two parameters were generated for the same key (D9001).
    ParameterKeyCollision = 9001,
    /// A parallel render worker panicked (D9002).
    WorkerPanicked = 9002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "D1001").
    pub fn code(&self) -> String {
        format!("D{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptyOperand => "Empty operand list",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::ConfigIo => "Configuration file unreadable",
            Self::ParameterKeyCollision => "Parameter key collision",
            Self::WorkerPanicked => "Render worker panicked",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operator involved.
    pub operator: Option<String>,
    /// The rendered column involved.
    pub column: Option<String>,
    /// The parameter key involved.
    pub parameter_key: Option<String>,
    /// A suggestion for fixing the error.
    pub suggestion: Option<String>,
}

/// Errors raised while building conditions or rendering criteria.
#[derive(Error, Debug)]
pub struct RenderError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl RenderError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Set the operator.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.context.operator = Some(operator.into());
        self
    }

    /// Set the column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.context.column = Some(column.into());
        self
    }

    /// Set the parameter key.
    pub fn with_parameter_key(mut self, key: impl Into<String>) -> Self {
        self.context.parameter_key = Some(key.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestion = Some(suggestion.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an empty operand error for a list-valued operator.
    pub fn empty_operand(operator: impl Into<String>) -> Self {
        let operator = operator.into();
        Self::new(
            ErrorCode::EmptyOperand,
            format!("'{}' condition requires at least one value", operator),
        )
        .with_operator(operator)
        .with_suggestion("Skip the criterion entirely when the value list is empty")
    }

    /// Create a parameter key collision error.
    pub fn key_collision(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::ParameterKeyCollision,
            format!("Parameter key '{}' was generated more than once", key),
        )
        .with_parameter_key(key)
        .with_suggestion("Use distinct parameter tags for independent sequences")
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfiguration,
            format!("Invalid configuration: {}", message.into()),
        )
    }

    /// Create a configuration I/O error.
    pub fn config_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(
            ErrorCode::ConfigIo,
            format!("Failed to read configuration file {}", path.into()),
        )
        .with_source(source)
    }

    /// Create a worker panic error.
    pub fn worker_panicked(worker: usize) -> Self {
        Self::new(
            ErrorCode::WorkerPanicked,
            format!("Render worker {} panicked", worker),
        )
    }

    // ============== Error Checks ==============

    /// Check if this is an empty operand error.
    pub fn is_empty_operand(&self) -> bool {
        self.code == ErrorCode::EmptyOperand
    }

    /// Check if this error signals a logic bug rather than bad input.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ParameterKeyCollision | ErrorCode::WorkerPanicked
        )
    }

    /// Display the full error with context.
    pub fn display_full(&self) -> String {
        let mut output = format!("Error [{}]: {}\n", self.code.code(), self.message);

        if let Some(ref op) = self.context.operator {
            output.push_str(&format!("  → Operator: {}\n", op));
        }
        if let Some(ref column) = self.context.column {
            output.push_str(&format!("  → Column: {}\n", column));
        }
        if let Some(ref key) = self.context.parameter_key {
            output.push_str(&format!("  → Parameter: {}\n", key));
        }
        if let Some(ref suggestion) = self.context.suggestion {
            output.push_str(&format!("\nSuggestion: {}\n", suggestion));
        }

        output
    }
}

impl From<toml::de::Error> for RenderError {
    fn from(err: toml::de::Error) -> Self {
        RenderError::invalid_config(err.message().to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::EmptyOperand.code(), "D1001");
        assert_eq!(ErrorCode::InvalidConfiguration.code(), "D7001");
        assert_eq!(ErrorCode::ParameterKeyCollision.code(), "D9001");
    }

    #[test]
    fn test_empty_operand_error() {
        let err = RenderError::empty_operand("not in");
        assert!(err.is_empty_operand());
        assert!(!err.is_programming_error());
        assert_eq!(err.context.operator, Some("not in".to_string()));
        assert!(err.to_string().starts_with("[D1001]"));
    }

    #[test]
    fn test_key_collision_is_programming_error() {
        let err = RenderError::key_collision("p3");
        assert!(err.is_programming_error());
        assert_eq!(err.context.parameter_key, Some("p3".to_string()));
        assert!(err.message.contains("p3"));
    }

    #[test]
    fn test_display_full() {
        let err = RenderError::empty_operand("in").with_column("a.id");
        let output = err.display_full();
        assert!(output.contains("D1001"));
        assert!(output.contains("a.id"));
        assert!(output.contains("Suggestion"));
    }

    #[test]
    fn test_config_io_has_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = RenderError::config_io("dynsql.toml", io);
        assert_eq!(err.code, ErrorCode::ConfigIo);
        assert!(std::error::Error::source(&err).is_some());
    }
}
