//! Compiled filter expressions and the operator vocabulary.

use std::fmt;

use serde::Serialize;

/// Value type of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    List,
    Map,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::List => "list",
            ColumnType::Map => "map",
        })
    }
}

/// The fixed operator vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    NotEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    #[serde(rename = "is_empty")]
    IsEmpty,
    #[serde(rename = "is_not_empty")]
    IsNotEmpty,
}

impl Operator {
    /// Matches a raw token against the vocabulary
    pub fn from_token(token: &str) -> Option<Operator> {
        match token {
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::NotEq),
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Gte),
            "<=" => Some(Operator::Lte),
            "contains" => Some(Operator::Contains),
            "not_contains" => Some(Operator::NotContains),
            "starts_with" => Some(Operator::StartsWith),
            "ends_with" => Some(Operator::EndsWith),
            "is_empty" => Some(Operator::IsEmpty),
            "is_not_empty" => Some(Operator::IsNotEmpty),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
        }
    }

    /// Operators that take no value token
    pub fn is_valueless(&self) -> bool {
        matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One compiled leaf predicate.
///
/// The backend search endpoint receives the whole list and ANDs the entries
/// together. `value` is `None` exactly for the valueless operators; `key`
/// addresses one entry of a map-typed field and is omitted from the JSON
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExpression {
    pub field: String,
    pub operator: Operator,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}
