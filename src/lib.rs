//! OQL: a small filter-query compiler.
//!
//! Turns a human-typed filter string such as
//! `name = "test" and duration > 100` into an ordered list of filter
//! expressions a backend search endpoint consumes as a declarative
//! predicate list. The language is a flat conjunction — `expr (AND expr)*`
//! with no OR and no grouping — and every expression is validated against
//! the field schema of the entity being queried (traces, spans, threads,
//! prompts or dataset items).
//!
//! ```
//! use oql::QueryCompiler;
//!
//! let filters = QueryCompiler::for_traces()
//!     .compile(r#"metadata.version = "1.0" and duration > 100"#)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(filters.len(), 2);
//! assert_eq!(filters[0].field, "metadata");
//! assert_eq!(filters[0].key.as_deref(), Some("version"));
//! ```

pub mod compiler;
pub mod cursor;
pub mod error;
pub mod expr;
pub mod parser;
pub mod schema;

pub use compiler::QueryCompiler;
pub use error::{QueryError, QueryResult};
pub use expr::{ColumnType, FilterExpression, Operator};
pub use schema::{Entity, FieldDef};
