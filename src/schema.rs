//! Per-entity field schemas.
//!
//! Each queryable entity has its own static table of field descriptors.
//! Lookups are case-sensitive exact matches, and a field defined for one
//! entity is categorically unsupported for every other entity. The tables
//! are compiled into the binary and shared freely across threads.

use crate::expr::{ColumnType, Operator};

/// Queryable entity, selected at compiler construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Traces,
    Spans,
    Threads,
    Prompts,
    DatasetItems,
}

/// Static descriptor for one queryable field
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    /// Whether the field addresses map entries through a nested key
    pub supports_key: bool,
}

const fn field(name: &'static str, column_type: ColumnType) -> FieldDef {
    FieldDef {
        name,
        column_type,
        supports_key: false,
    }
}

const fn keyed(name: &'static str, column_type: ColumnType) -> FieldDef {
    FieldDef {
        name,
        column_type,
        supports_key: true,
    }
}

/// Metrics addressable as `usage.<metric>` on traces and spans
pub const USAGE_METRICS: &[&str] = &["total_tokens", "prompt_tokens", "completion_tokens"];

pub const TRACE_FIELDS: &[FieldDef] = &[
    field("id", ColumnType::String),
    field("name", ColumnType::String),
    field("status", ColumnType::String),
    field("start_time", ColumnType::Date),
    field("end_time", ColumnType::Date),
    field("input", ColumnType::String),
    field("output", ColumnType::String),
    keyed("metadata", ColumnType::Map),
    keyed("feedback_scores", ColumnType::Map),
    field("tags", ColumnType::List),
    field("usage.total_tokens", ColumnType::Number),
    field("usage.prompt_tokens", ColumnType::Number),
    field("usage.completion_tokens", ColumnType::Number),
    field("duration", ColumnType::Number),
    field("total_estimated_cost", ColumnType::Number),
    field("thread_id", ColumnType::String),
];

pub const SPAN_FIELDS: &[FieldDef] = &[
    field("id", ColumnType::String),
    field("name", ColumnType::String),
    field("type", ColumnType::String),
    field("status", ColumnType::String),
    field("model", ColumnType::String),
    field("provider", ColumnType::String),
    field("start_time", ColumnType::Date),
    field("end_time", ColumnType::Date),
    field("input", ColumnType::String),
    field("output", ColumnType::String),
    keyed("metadata", ColumnType::Map),
    keyed("feedback_scores", ColumnType::Map),
    field("tags", ColumnType::List),
    field("usage.total_tokens", ColumnType::Number),
    field("usage.prompt_tokens", ColumnType::Number),
    field("usage.completion_tokens", ColumnType::Number),
    field("duration", ColumnType::Number),
    field("total_estimated_cost", ColumnType::Number),
];

pub const THREAD_FIELDS: &[FieldDef] = &[
    field("id", ColumnType::String),
    field("status", ColumnType::String),
    field("start_time", ColumnType::Date),
    field("end_time", ColumnType::Date),
    field("first_message", ColumnType::String),
    field("last_message", ColumnType::String),
    field("number_of_messages", ColumnType::Number),
    field("duration", ColumnType::Number),
    field("created_by", ColumnType::String),
    keyed("feedback_scores", ColumnType::Map),
    field("tags", ColumnType::List),
];

pub const PROMPT_FIELDS: &[FieldDef] = &[
    field("id", ColumnType::String),
    field("name", ColumnType::String),
    field("description", ColumnType::String),
    field("created_by", ColumnType::String),
    field("created_at", ColumnType::Date),
    field("last_updated_at", ColumnType::Date),
    field("tags", ColumnType::List),
];

pub const DATASET_ITEM_FIELDS: &[FieldDef] = &[
    field("id", ColumnType::String),
    field("source", ColumnType::String),
    field("trace_id", ColumnType::String),
    field("span_id", ColumnType::String),
    field("created_by", ColumnType::String),
    field("created_at", ColumnType::Date),
    field("last_updated_at", ColumnType::Date),
    keyed("data", ColumnType::Map),
];

impl Entity {
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Traces => "traces",
            Entity::Spans => "spans",
            Entity::Threads => "threads",
            Entity::Prompts => "prompts",
            Entity::DatasetItems => "dataset_items",
        }
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Entity::Traces => TRACE_FIELDS,
            Entity::Spans => SPAN_FIELDS,
            Entity::Threads => THREAD_FIELDS,
            Entity::Prompts => PROMPT_FIELDS,
            Entity::DatasetItems => DATASET_ITEM_FIELDS,
        }
    }

    /// Exact-match lookup in this entity's table
    pub fn lookup(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Fields of this entity that accept a nested key
    pub fn keyed_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.supports_key)
            .map(|f| f.name)
            .collect()
    }

    /// Whether the entity exposes the `usage.<metric>` family
    pub fn supports_usage(&self) -> bool {
        self.lookup("usage.total_tokens").is_some()
    }
}

const COMPARISON_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::NotEq,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
];

const STRING_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::NotEq,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::EndsWith,
];

const LIST_OPERATORS: &[Operator] = &[Operator::Contains, Operator::IsEmpty, Operator::IsNotEmpty];

const MAP_OPERATORS: &[Operator] = &[Operator::IsEmpty, Operator::IsNotEmpty];

impl FieldDef {
    /// Operators legal for this field.
    ///
    /// Map fields expose two sets: with a nested key the operators apply to
    /// the key's resolved value, without one only the emptiness checks on
    /// the map itself are legal.
    pub fn operators(&self, has_key: bool) -> &'static [Operator] {
        match self.column_type {
            ColumnType::String => STRING_OPERATORS,
            ColumnType::Number | ColumnType::Date => COMPARISON_OPERATORS,
            ColumnType::List => LIST_OPERATORS,
            ColumnType::Map => {
                if has_key {
                    STRING_OPERATORS
                } else {
                    MAP_OPERATORS
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_isolation() {
        assert!(Entity::Traces.lookup("thread_id").is_some());
        assert!(Entity::Spans.lookup("thread_id").is_none());

        assert!(Entity::Spans.lookup("model").is_some());
        assert!(Entity::Traces.lookup("model").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(Entity::Traces.lookup("name").is_some());
        assert!(Entity::Traces.lookup("Name").is_none());
    }

    #[test]
    fn test_keyed_fields() {
        assert_eq!(
            Entity::Traces.keyed_fields(),
            vec!["metadata", "feedback_scores"]
        );
        assert_eq!(Entity::DatasetItems.keyed_fields(), vec!["data"]);
        assert!(Entity::Prompts.keyed_fields().is_empty());
    }

    #[test]
    fn test_usage_family() {
        assert!(Entity::Traces.supports_usage());
        assert!(Entity::Spans.supports_usage());
        assert!(!Entity::Threads.supports_usage());
        assert!(!Entity::Prompts.supports_usage());
        assert!(!Entity::DatasetItems.supports_usage());
    }

    #[test]
    fn test_operator_sets_by_type() {
        let name = Entity::Traces.lookup("name").unwrap();
        assert!(name.operators(false).contains(&Operator::Contains));
        assert!(!name.operators(false).contains(&Operator::IsEmpty));

        let duration = Entity::Traces.lookup("duration").unwrap();
        assert!(duration.operators(false).contains(&Operator::Gt));
        assert!(!duration.operators(false).contains(&Operator::Contains));

        let tags = Entity::Traces.lookup("tags").unwrap();
        assert_eq!(
            tags.operators(false),
            [Operator::Contains, Operator::IsEmpty, Operator::IsNotEmpty]
        );
    }

    #[test]
    fn test_map_operators_depend_on_key() {
        let metadata = Entity::Traces.lookup("metadata").unwrap();
        assert_eq!(
            metadata.operators(false),
            [Operator::IsEmpty, Operator::IsNotEmpty]
        );
        assert!(metadata.operators(true).contains(&Operator::Eq));
        assert!(metadata.operators(true).contains(&Operator::Contains));
        assert!(!metadata.operators(true).contains(&Operator::IsEmpty));
    }

    #[test]
    fn test_usage_metrics_present_in_tables() {
        for metric in USAGE_METRICS {
            let dotted = format!("usage.{}", metric);
            assert!(Entity::Traces.lookup(&dotted).is_some());
            assert!(Entity::Spans.lookup(&dotted).is_some());
        }
    }
}
