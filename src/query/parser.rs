// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent parser for the query language.
//!
//! # Grammar
//!
//! ```text
//! query     = or_expr EOF
//! or_expr   = and_expr { ["OR" | "||"] and_expr }     ; juxtaposition is OR
//! and_expr  = unary { ("AND" | "&&") unary }
//! unary     = ("NOT" | "!" | "-" | "+") unary | primary
//! primary   = [field ":"] ( "(" or_expr ")" | phrase | regex | range | term )
//! phrase    = '"' chars '"'
//! regex     = '/' chars '/'
//! range     = ("[" | "{") bound "TO" bound ("]" | "}")
//! bound     = "*" | token | phrase
//! ```
//!
//! Unqualified clauses target the default field (`body`). Terms and phrases
//! go through the same analysis as indexed text; wildcard patterns are only
//! normalized; regular expressions are kept verbatim because they run against
//! exact terms.

use super::{Bound, Clause, Occur};
use crate::analysis::analyze;
use crate::error::QuerySyntaxError;
use crate::types::BODY_FIELD;
use crate::utils::normalize;

/// Parse a query against the `body` default field.
pub fn parse(query: &str) -> Result<Clause, QuerySyntaxError> {
    QueryParser::new(query).parse()
}

/// A clause and the prefix operator that introduced it.
struct Item {
    occur: Option<Occur>,
    clause: Clause,
}

impl Item {
    fn plain(clause: Clause) -> Self {
        Self {
            occur: None,
            clause,
        }
    }

    /// Fold the prefix operator into the clause itself.
    fn into_clause(self) -> Clause {
        match self.occur {
            Some(occur) => Clause::Boolean(vec![(occur, self.clause)]),
            None => self.clause,
        }
    }
}

/// One raw term as typed: `text` has escapes resolved, `pattern` keeps them
/// so an escaped `*` stays literal in a wildcard.
struct RawToken {
    text: String,
    pattern: String,
    wildcard: bool,
}

/// Parser state over one query string.
pub struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
    default_field: String,
}

impl<'a> QueryParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_default_field(input, BODY_FIELD)
    }

    pub fn with_default_field(input: &'a str, default_field: &str) -> Self {
        Self {
            input,
            pos: 0,
            default_field: default_field.to_string(),
        }
    }

    /// Parse the whole input.
    ///
    /// A query whose every clause analyzes away (e.g. `"--"`) yields an empty
    /// boolean, which matches nothing.
    pub fn parse(mut self) -> Result<Clause, QuerySyntaxError> {
        self.skip_whitespace();
        if self.at_end() {
            return Err(QuerySyntaxError::new("query is empty", 0));
        }

        let field = self.default_field.clone();
        let clause = self.parse_or(&field)?;

        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(QuerySyntaxError::new(format!("unexpected '{c}'"), self.pos));
        }

        Ok(clause.unwrap_or_else(|| Clause::Boolean(Vec::new())))
    }

    // -------------------------------------------------------------------------
    // Character helpers
    // -------------------------------------------------------------------------

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peeks at the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes and returns the next character.
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Upper-case keyword at the cursor, followed by a boundary.
    fn at_keyword(&self, word: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(word) {
            return false;
        }
        match rest[word.len()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || c == '(',
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    /// Consume `word` (as a keyword) or `symbol`.
    fn eat_operator(&mut self, word: &str, symbol: &str) -> bool {
        if self.eat_keyword(word) {
            return true;
        }
        if self.rest().starts_with(symbol) {
            self.pos += symbol.len();
            return true;
        }
        false
    }

    /// A `+`/`-` directly attached to what follows.
    fn at_prefix_operator(&self) -> bool {
        let mut chars = self.rest().chars();
        matches!(chars.next(), Some('+' | '-'))
            && matches!(chars.next(), Some(c) if !c.is_whitespace())
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    /// Parses an OR expression (lowest precedence). Juxtaposed clauses are
    /// combined the same way.
    fn parse_or(&mut self, field: &str) -> Result<Option<Clause>, QuerySyntaxError> {
        let mut items: Vec<Item> = Vec::new();
        let mut first = true;

        loop {
            self.skip_whitespace();
            if self.at_end() || self.peek() == Some(')') {
                break;
            }
            if !first {
                // Explicit OR; an operand must follow.
                self.eat_operator("OR", "||");
            }
            if let Some(item) = self.parse_and(field)? {
                items.push(item);
            }
            first = false;
        }

        Ok(match items.len() {
            0 => None,
            1 => items.pop().map(Item::into_clause),
            _ => Some(Clause::Boolean(
                items
                    .into_iter()
                    .map(|item| (item.occur.unwrap_or(Occur::Should), item.clause))
                    .collect(),
            )),
        })
    }

    /// Parses an AND chain. Every operand becomes `Must`, except negated ones.
    fn parse_and(&mut self, field: &str) -> Result<Option<Item>, QuerySyntaxError> {
        let mut operands = Vec::new();
        operands.extend(self.parse_unary(field)?);

        loop {
            let save = self.pos;
            self.skip_whitespace();
            if self.eat_operator("AND", "&&") {
                operands.extend(self.parse_unary(field)?);
            } else {
                self.pos = save;
                break;
            }
        }

        if operands.len() <= 1 {
            return Ok(operands.pop());
        }

        let children = operands
            .into_iter()
            .map(|item| match item.occur {
                Some(Occur::MustNot) => (Occur::MustNot, item.clause),
                _ => (Occur::Must, item.clause),
            })
            .collect();
        Ok(Some(Item::plain(Clause::Boolean(children))))
    }

    /// Parses prefix operators: `NOT`, `!`, `-` (exclude) and `+` (require).
    fn parse_unary(&mut self, field: &str) -> Result<Option<Item>, QuerySyntaxError> {
        self.skip_whitespace();

        let occur = if self.eat_operator("NOT", "!") {
            Occur::MustNot
        } else if self.at_prefix_operator() {
            match self.consume() {
                Some('-') => Occur::MustNot,
                _ => Occur::Must,
            }
        } else {
            return Ok(self.parse_primary(field)?.map(Item::plain));
        };

        let inner = self.parse_unary(field)?;
        Ok(inner.map(|item| Item {
            occur: Some(occur),
            clause: item.into_clause(),
        }))
    }

    /// Parses a group, phrase, regexp, range, or (possibly field-qualified) term.
    fn parse_primary(&mut self, field: &str) -> Result<Option<Clause>, QuerySyntaxError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(QuerySyntaxError::new("expected a term", self.pos)),
            Some('(') => self.parse_group(field),
            Some('"') => self.parse_phrase(field),
            Some('/') => self.parse_regexp(field).map(Some),
            Some('[' | '{') => self.parse_range(field).map(Some),
            Some('^' | '~') => Err(QuerySyntaxError::new(
                "boost, fuzzy and proximity operators are not supported",
                self.pos,
            )),
            Some(c) if is_special(c) => {
                Err(QuerySyntaxError::new(format!("unexpected '{c}'"), self.pos))
            }
            Some(_) => {
                for (keyword, symbol) in [("AND", "&&"), ("OR", "||")] {
                    let operator = if self.at_keyword(keyword) {
                        keyword
                    } else if self.rest().starts_with(symbol) {
                        symbol
                    } else {
                        continue;
                    };
                    return Err(QuerySyntaxError::new(
                        format!("operator '{operator}' is missing an operand"),
                        self.pos,
                    ));
                }

                let token = self.read_token()?;
                if self.peek() == Some(':') {
                    self.consume();
                    return self.parse_field_value(&token.text);
                }
                Ok(term_clause(field, token))
            }
        }
    }

    /// Whatever follows `field:`.
    fn parse_field_value(&mut self, field: &str) -> Result<Option<Clause>, QuerySyntaxError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(QuerySyntaxError::new(
                format!("expected a value for field '{field}'"),
                self.pos,
            )),
            Some('(') => self.parse_group(field),
            Some('"') => self.parse_phrase(field),
            Some('/') => self.parse_regexp(field).map(Some),
            Some('[' | '{') => self.parse_range(field).map(Some),
            Some(c) if is_special(c) => {
                Err(QuerySyntaxError::new(format!("unexpected '{c}'"), self.pos))
            }
            Some(_) => {
                let token = self.read_token()?;
                Ok(term_clause(field, token))
            }
        }
    }

    fn parse_group(&mut self, field: &str) -> Result<Option<Clause>, QuerySyntaxError> {
        let start = self.pos;
        self.consume(); // '('
        let inner = self.parse_or(field)?;
        self.skip_whitespace();
        if self.consume() != Some(')') {
            return Err(QuerySyntaxError::new("unclosed '('", start));
        }
        Ok(inner)
    }

    fn parse_phrase(&mut self, field: &str) -> Result<Option<Clause>, QuerySyntaxError> {
        let text = self.read_quoted()?;
        let mut terms = analyze(&text);
        Ok(match terms.len() {
            0 => None,
            1 => terms.pop().map(|text| Clause::term(field, text)),
            _ => Some(Clause::Phrase {
                field: field.to_string(),
                terms,
            }),
        })
    }

    fn parse_regexp(&mut self, field: &str) -> Result<Clause, QuerySyntaxError> {
        let start = self.pos;
        self.consume(); // '/'
        let mut pattern = String::new();

        loop {
            match self.consume() {
                Some('/') => break,
                Some('\\') => match self.consume() {
                    Some('/') => pattern.push('/'),
                    Some(c) => {
                        pattern.push('\\');
                        pattern.push(c);
                    }
                    None => {
                        return Err(QuerySyntaxError::new(
                            "unterminated regular expression",
                            start,
                        ))
                    }
                },
                Some(c) => pattern.push(c),
                None => {
                    return Err(QuerySyntaxError::new(
                        "unterminated regular expression",
                        start,
                    ))
                }
            }
        }

        Ok(Clause::Regexp {
            field: field.to_string(),
            pattern,
        })
    }

    fn parse_range(&mut self, field: &str) -> Result<Clause, QuerySyntaxError> {
        let start = self.pos;
        let lower_inclusive = self.consume() == Some('[');

        self.skip_whitespace();
        let lower = self.read_bound()?;
        self.skip_whitespace();
        if !self.eat_keyword("TO") {
            return Err(QuerySyntaxError::new("expected 'TO' in range", self.pos));
        }
        self.skip_whitespace();
        let upper = self.read_bound()?;
        self.skip_whitespace();

        let upper_inclusive = match self.consume() {
            Some(']') => true,
            Some('}') => false,
            _ => return Err(QuerySyntaxError::new("unterminated range", start)),
        };

        Ok(Clause::Range {
            field: field.to_string(),
            lower: make_bound(lower, lower_inclusive),
            upper: make_bound(upper, upper_inclusive),
        })
    }

    // -------------------------------------------------------------------------
    // Tokens
    // -------------------------------------------------------------------------

    /// Reads a quoted string; backslash escapes any character.
    fn read_quoted(&mut self) -> Result<String, QuerySyntaxError> {
        let start = self.pos;
        self.consume(); // '"'
        let mut text = String::new();

        loop {
            match self.consume() {
                Some('"') => return Ok(text),
                Some('\\') => match self.consume() {
                    Some(c) => text.push(c),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }

        Err(QuerySyntaxError::new("unterminated phrase", start))
    }

    /// Reads one range bound. `*` means unbounded.
    fn read_bound(&mut self) -> Result<Option<String>, QuerySyntaxError> {
        if self.peek() == Some('"') {
            return self.read_quoted().map(|v| Some(normalize(&v)));
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ']' || c == '}' {
                break;
            }
            self.consume();
        }

        let raw = &self.input[start..self.pos];
        match raw {
            "" => Err(QuerySyntaxError::new("expected a range bound", start)),
            "*" => Ok(None),
            _ => Ok(Some(normalize(raw))),
        }
    }

    /// Reads a bare term up to whitespace or a syntax character.
    fn read_token(&mut self) -> Result<RawToken, QuerySyntaxError> {
        let start = self.pos;
        let mut token = RawToken {
            text: String::new(),
            pattern: String::new(),
            wildcard: false,
        };

        while let Some(c) = self.peek() {
            if c == '\\' {
                let escape_at = self.pos;
                self.consume();
                let Some(escaped) = self.consume() else {
                    return Err(QuerySyntaxError::new("dangling escape", escape_at));
                };
                token.text.push(escaped);
                token.pattern.push('\\');
                token.pattern.push(escaped);
                continue;
            }
            if c.is_whitespace() || is_special(c) {
                break;
            }
            if c == '*' || c == '?' {
                token.wildcard = true;
            }
            self.consume();
            token.text.push(c);
            token.pattern.push(c);
        }

        if self.pos == start {
            return Err(QuerySyntaxError::new("expected a term", start));
        }
        Ok(token)
    }
}

/// Characters that end a bare term.
fn is_special(c: char) -> bool {
    matches!(c, '(' | ')' | ':' | '"' | '[' | ']' | '{' | '}' | '^' | '~')
}

fn make_bound(value: Option<String>, inclusive: bool) -> Bound {
    match value {
        None => Bound::Unbounded,
        Some(v) if inclusive => Bound::Inclusive(v),
        Some(v) => Bound::Exclusive(v),
    }
}

/// Turn a bare term into a clause: wildcard, single term, or an OR of the
/// tokens it analyzes into.
fn term_clause(field: &str, token: RawToken) -> Option<Clause> {
    if token.wildcard {
        return Some(Clause::Wildcard {
            field: field.to_string(),
            pattern: normalize(&token.pattern),
        });
    }

    let mut terms = analyze(&token.text);
    match terms.len() {
        0 => None,
        1 => terms.pop().map(|text| Clause::term(field, text)),
        _ => Some(Clause::Boolean(
            terms
                .into_iter()
                .map(|text| (Occur::Should, Clause::term(field, text)))
                .collect(),
        )),
    }
}
