//! Error types for filter query compilation.

use thiserror::Error;

use crate::cursor::QuoteContext;

/// Result type for query compilation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while compiling a filter query.
///
/// Every failure aborts the whole compile and carries a human-readable
/// message meant to be shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Field name absent from the active entity schema
    #[error("{field} is not supported")]
    UnsupportedField { field: String },

    /// Nested key supplied for a field that does not accept one
    #[error("{field} is not supported, only the fields [{keyed_fields}] accept a nested key")]
    UnsupportedKey { field: String, keyed_fields: String },

    /// Operator in the global vocabulary but illegal for this field
    #[error("Operator {operator} is not supported for field {field}")]
    UnsupportedOperator { operator: String, field: String },

    /// `usage.<metric>` outside the fixed metric set
    #[error("When querying usage, {metric} is not supported")]
    UnsupportedUsageMetric { metric: String },

    /// Token outside the operator vocabulary
    #[error("Unknown operator {operator:?}")]
    UnknownOperator { operator: String },

    /// Value token matching neither a quoted string nor a bare literal
    #[error("Invalid value {value:?} at position {position}")]
    InvalidValue { value: String, position: usize },

    /// Input ended before the closing `"` of a key or value
    #[error("Missing closing quote in {context}")]
    UnterminatedQuote { context: QuoteContext },

    /// `or` used as a connector between expressions
    #[error("OR is not currently supported")]
    OrNotSupported,

    /// Unconsumed input left after the last valid expression
    #[error("Invalid filter string, trailing characters {remainder}")]
    TrailingCharacters { remainder: String },

    /// Expression expected but no field name found, e.g. after a dangling
    /// connector
    #[error("Invalid filter string, expected a field but found {remainder:?}")]
    ExpectedField { remainder: String },

    /// Compiled filter list failed to serialize
    #[error("Failed to serialize filter expressions: {0}")]
    Serialize(String),
}
