//! Three-stage expression parser.
//!
//! Each expression is parsed field → operator → value against the active
//! entity schema, with a connector check between expressions. All stages
//! advance one shared cursor; the only rollback is the saved offset the
//! connector check uses to report the raw unconsumed tail.
//!
//! ```text
//! parse()
//!   └─ loop
//!        ├─ parse_expression()
//!        │    ├─ parse_field()     field name, optional nested key,
//!        │    │                    schema resolution
//!        │    ├─ parse_operator()  vocabulary match + per-field legality
//!        │    └─ parse_value()     quoted string or bare literal,
//!        │                         skipped for valueless operators
//!        └─ expect_connector()     case-insensitive `and` only
//! ```

use crate::cursor::{Cursor, QuoteContext};
use crate::error::{QueryError, QueryResult};
use crate::expr::{FilterExpression, Operator};
use crate::schema::{Entity, FieldDef, USAGE_METRICS};

/// Transient result of field parsing, consumed by the operator check
#[derive(Debug)]
struct FieldToken {
    field: String,
    def: &'static FieldDef,
    key: Option<String>,
}

pub struct Parser<'a> {
    cursor: Cursor<'a>,
    entity: Entity,
}

impl<'a> Parser<'a> {
    pub fn new(query: &'a str, entity: Entity) -> Self {
        Self {
            cursor: Cursor::new(query),
            entity,
        }
    }

    /// Parses the whole query into an ordered conjunction list
    pub fn parse(mut self) -> QueryResult<Vec<FilterExpression>> {
        let mut expressions = Vec::new();
        loop {
            expressions.push(self.parse_expression()?);
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() {
                break;
            }
            self.expect_connector()?;
        }
        Ok(expressions)
    }

    fn parse_expression(&mut self) -> QueryResult<FilterExpression> {
        let field = self.parse_field()?;
        let operator = self.parse_operator(&field)?;
        let value = self.parse_value(operator)?;
        Ok(FilterExpression {
            field: field.field,
            operator,
            value,
            column_type: field.def.column_type,
            key: field.key,
        })
    }

    /// Consumes a field reference and resolves it against the active schema.
    ///
    /// A literal `.` splits the reference into base field and dotted key
    /// (`metadata.version`), except for the `usage.<metric>` family which
    /// stays one dotted field name. A quoted segment after a trailing dot
    /// (`feedback_scores."Answer Relevance"`) becomes the nested key with
    /// `""` unescaped to `"`.
    fn parse_field(&mut self) -> QueryResult<FieldToken> {
        self.cursor.skip_whitespace();
        let raw = self
            .cursor
            .consume_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if raw.is_empty() {
            return Err(QueryError::ExpectedField {
                remainder: self.cursor.remainder().to_string(),
            });
        }

        // field."Quoted Key"
        if self.cursor.peek() == Some('"') {
            if let Some(base) = raw.strip_suffix('.') {
                let key = self.cursor.read_quoted(QuoteContext::Key)?;
                return self.resolve(base, Some(key));
            }
        }

        if self.entity.supports_usage() {
            if let Some(metric) = raw.strip_prefix("usage.") {
                if !USAGE_METRICS.contains(&metric) {
                    return Err(QueryError::UnsupportedUsageMetric {
                        metric: metric.to_string(),
                    });
                }
                return self.resolve(raw, None);
            }
        }

        if self.entity.lookup(raw).is_some() {
            return self.resolve(raw, None);
        }

        match raw.split_once('.') {
            Some((base, key)) if !base.is_empty() && !key.is_empty() => {
                self.resolve(base, Some(key.to_string()))
            }
            _ => self.resolve(raw, None),
        }
    }

    fn resolve(&self, base: &str, key: Option<String>) -> QueryResult<FieldToken> {
        let def = self
            .entity
            .lookup(base)
            .ok_or_else(|| QueryError::UnsupportedField {
                field: base.to_string(),
            })?;
        if key.is_some() && !def.supports_key {
            return Err(QueryError::UnsupportedKey {
                field: base.to_string(),
                keyed_fields: self.entity.keyed_fields().join(", "),
            });
        }
        Ok(FieldToken {
            field: base.to_string(),
            def,
            key,
        })
    }

    /// Consumes an operator token, matches it against the vocabulary and
    /// checks legality for the resolved field
    fn parse_operator(&mut self, field: &FieldToken) -> QueryResult<Operator> {
        self.cursor.skip_whitespace();
        let raw = match self.cursor.peek() {
            Some(c) if is_operator_symbol(c) => self.cursor.consume_while(is_operator_symbol),
            _ => self
                .cursor
                .consume_while(|c| c.is_ascii_alphabetic() || c == '_'),
        };
        let operator = Operator::from_token(raw).ok_or_else(|| QueryError::UnknownOperator {
            operator: raw.to_string(),
        })?;
        if !field.def.operators(field.key.is_some()).contains(&operator) {
            return Err(QueryError::UnsupportedOperator {
                operator: operator.as_str().to_string(),
                field: field.field.clone(),
            });
        }
        Ok(operator)
    }

    /// Consumes a value token: a quoted string or a bare numeric/date
    /// literal. Valueless operators consume nothing and yield `None`.
    fn parse_value(&mut self, operator: Operator) -> QueryResult<Option<String>> {
        if operator.is_valueless() {
            return Ok(None);
        }
        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some('"') {
            return self.cursor.read_quoted(QuoteContext::Value).map(Some);
        }
        let position = self.cursor.position();
        let raw = self.cursor.consume_while(is_bare_literal_char);
        if raw.is_empty() {
            let got: String = self
                .cursor
                .remainder()
                .chars()
                .take_while(|c| !c.is_whitespace())
                .collect();
            return Err(QueryError::InvalidValue {
                value: got,
                position,
            });
        }
        if !is_bare_literal(raw) {
            return Err(QueryError::InvalidValue {
                value: raw.to_string(),
                position,
            });
        }
        Ok(Some(raw.to_string()))
    }

    /// Validates the word joining two expressions: case-insensitive `and`
    /// only. The snapshot lets the trailing-characters diagnostic carry the
    /// raw unconsumed tail.
    fn expect_connector(&mut self) -> QueryResult<()> {
        let snapshot = self.cursor.position();
        let word = self.cursor.consume_while(|c| c.is_ascii_alphabetic());
        if word.eq_ignore_ascii_case("and") {
            return Ok(());
        }
        if word.eq_ignore_ascii_case("or") {
            return Err(QueryError::OrNotSupported);
        }
        self.cursor.restore(snapshot);
        Err(QueryError::TrailingCharacters {
            remainder: self.cursor.remainder().to_string(),
        })
    }
}

fn is_operator_symbol(c: char) -> bool {
    matches!(c, '=' | '!' | '<' | '>')
}

/// Characters legal in an unquoted literal: numbers and ISO-8601 date-times
fn is_bare_literal_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | ':' | 'T' | 'Z')
}

/// A bare literal starts with a digit or a minus sign and contains at least
/// one digit. No further shape checking; range and format validation is the
/// backend's job.
fn is_bare_literal(s: &str) -> bool {
    let starts_ok = s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    starts_ok && s.chars().any(|c| c.is_ascii_digit())
}
