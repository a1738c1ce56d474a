//! Character cursor over the raw query string.

use std::fmt;

use crate::error::{QueryError, QueryResult};

/// Where a quoted segment appeared, for unterminated-quote diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteContext {
    /// A nested key, e.g. `feedback_scores."Answer Relevance"`
    Key,
    /// A value literal, e.g. `name = "test"`
    Value,
}

impl fmt::Display for QuoteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuoteContext::Key => "nested key",
            QuoteContext::Value => "value",
        })
    }
}

/// Mutable cursor shared by the parsing stages of one compilation.
pub struct Cursor<'a> {
    input: &'a str,
    /// Current position in the input string (byte index)
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, position: 0 }
    }

    /// Returns the character at the current position without advancing
    pub fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Advances the position by one character and returns it
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(c) = c {
            self.position += c.len_utf8();
        }
        c
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewinds to a previously saved position. Used only so the connector
    /// check can slice the raw unconsumed tail for its diagnostic.
    pub fn restore(&mut self, position: usize) {
        self.position = position;
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// The unconsumed tail of the input
    pub fn remainder(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Skips whitespace characters
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Advances while the predicate holds and returns the consumed slice.
    /// Never advances past the end of the input.
    pub fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.bump();
            } else {
                break;
            }
        }
        &self.input[start..self.position]
    }

    /// Reads a double-quoted segment starting at the current position and
    /// returns its unescaped contents.
    ///
    /// A doubled quote (`""`) inside the segment is a literal embedded quote,
    /// not a terminator. Fails when the input ends before an unescaped
    /// closing quote.
    pub fn read_quoted(&mut self, context: QuoteContext) -> QueryResult<String> {
        debug_assert_eq!(self.peek(), Some('"'));
        self.bump(); // opening quote
        let mut content = String::new();
        loop {
            match self.bump() {
                Some('"') => {
                    if self.peek() == Some('"') {
                        self.bump();
                        content.push('"');
                    } else {
                        return Ok(content);
                    }
                }
                Some(c) => content.push(c),
                None => return Err(QueryError::UnterminatedQuote { context }),
            }
        }
    }
}
