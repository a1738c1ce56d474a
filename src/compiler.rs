//! Query compiler entry points.

use tracing::debug;

use crate::error::{QueryError, QueryResult};
use crate::expr::FilterExpression;
use crate::parser::Parser;
use crate::schema::Entity;

/// Compiles filter query strings against one entity's field schema.
///
/// The output is an ordered list of filter expressions the backend search
/// endpoint consumes as an implicit conjunction. Compilation is pure and
/// synchronous; a compiler instance holds no mutable state and can be
/// reused and shared freely.
#[derive(Debug, Clone, Copy)]
pub struct QueryCompiler {
    entity: Entity,
}

impl QueryCompiler {
    pub fn new(entity: Entity) -> Self {
        Self { entity }
    }

    pub fn for_traces() -> Self {
        Self::new(Entity::Traces)
    }

    pub fn for_spans() -> Self {
        Self::new(Entity::Spans)
    }

    pub fn for_threads() -> Self {
        Self::new(Entity::Threads)
    }

    pub fn for_prompts() -> Self {
        Self::new(Entity::Prompts)
    }

    pub fn for_dataset_items() -> Self {
        Self::new(Entity::DatasetItems)
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Compiles a query string into the ordered filter list.
    ///
    /// Returns `Ok(None)` for empty or blank input, signaling "no filter"
    /// to callers; a successful non-empty compile never yields an empty
    /// list.
    pub fn compile(&self, query: &str) -> QueryResult<Option<Vec<FilterExpression>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        debug!(entity = self.entity.name(), query, "compiling filter query");
        let expressions = Parser::new(query, self.entity).parse()?;
        debug!(count = expressions.len(), "compiled filter query");
        Ok(Some(expressions))
    }

    /// Compiles straight to the compact JSON array the search endpoint
    /// accepts as its filter parameter. `None` means "no filter".
    pub fn compile_json(&self, query: &str) -> QueryResult<Option<String>> {
        match self.compile(query)? {
            Some(expressions) => serde_json::to_string(&expressions)
                .map(Some)
                .map_err(|e| QueryError::Serialize(e.to_string())),
            None => Ok(None),
        }
    }
}
