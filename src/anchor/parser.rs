//! Anchor path parser
//!
//! Parses the xpath-like anchor strings stored with footnote locations.
//!
//! Grammar (simplified):
//! ```text
//! path       = ["/"] step ("/" step)*
//! step       = name ["[" predicate "]"]
//! predicate  = number | attribute (" and " attribute)*
//! attribute  = "@" name "=" quoted
//! quoted     = "'" text "'" | '"' text '"'
//! ```

use super::types::*;
use crate::document::TagKind;
use thiserror::Error;

/// Anchor parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorParseError {
    #[error("Empty anchor path")]
    Empty,

    #[error("Expected tag name at position {0}")]
    ExpectedName(usize),

    #[error("Expected number at position {0}")]
    ExpectedNumber(usize),

    #[error("Positions are counted from 1 (position {0})")]
    ZeroPosition(usize),

    #[error("Expected '@' attribute at position {0}")]
    ExpectedAttribute(usize),

    #[error("Unterminated string at position {0}")]
    UnterminatedString(usize),

    #[error("Unclosed bracket at position {0}")]
    UnclosedBracket(usize),

    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// Parser state
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), AnchorParseError> {
        if self.skip_if(expected) {
            Ok(())
        } else {
            match self.peek() {
                Some(ch) => Err(AnchorParseError::UnexpectedChar(ch, self.pos)),
                None if expected == ']' => Err(AnchorParseError::UnclosedBracket(self.pos)),
                None => Err(AnchorParseError::UnexpectedChar('\0', self.pos)),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_str(&mut self, s: &str) -> bool {
        if self.input[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Parse a tag or attribute name
    fn parse_name(&mut self) -> Result<&'a str, AnchorParseError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(AnchorParseError::ExpectedName(start));
        }
        Ok(&self.input[start..self.pos])
    }

    /// Parse a sequence of digits
    fn parse_number(&mut self) -> Result<usize, AnchorParseError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(AnchorParseError::ExpectedNumber(start));
        }

        self.input[start..self.pos]
            .parse()
            .map_err(|_| AnchorParseError::ExpectedNumber(start))
    }

    /// Parse a single- or double-quoted string
    fn parse_quoted(&mut self) -> Result<String, AnchorParseError> {
        let start = self.pos;
        let quote = match self.advance() {
            Some(q @ ('\'' | '"')) => q,
            Some(ch) => return Err(AnchorParseError::UnexpectedChar(ch, start)),
            None => return Err(AnchorParseError::UnterminatedString(start)),
        };

        let mut value = String::new();
        while let Some(ch) = self.advance() {
            if ch == quote {
                return Ok(value);
            }
            value.push(ch);
        }
        Err(AnchorParseError::UnterminatedString(start))
    }

    /// Parse `@name='value'`
    fn parse_attribute(&mut self) -> Result<AttributePredicate, AnchorParseError> {
        self.skip_whitespace();
        if !self.skip_if('@') {
            return Err(AnchorParseError::ExpectedAttribute(self.pos));
        }
        let name = self.parse_name()?.to_string();
        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();
        let value = self.parse_quoted()?;
        self.skip_whitespace();
        Ok(AttributePredicate { name, value })
    }

    /// Parse the contents of a `[...]` predicate
    fn parse_predicate(&mut self) -> Result<StepSelector, AnchorParseError> {
        self.skip_whitespace();
        if matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            let start = self.pos;
            let position = self.parse_number()?;
            if position == 0 {
                return Err(AnchorParseError::ZeroPosition(start));
            }
            self.skip_whitespace();
            return Ok(StepSelector::Position(position));
        }

        let mut predicates = vec![self.parse_attribute()?];
        while self.skip_str("and") {
            predicates.push(self.parse_attribute()?);
        }
        Ok(StepSelector::Attributes(predicates))
    }

    /// Parse a single step
    fn parse_step(&mut self) -> Result<AnchorStep, AnchorParseError> {
        let tag: TagKind = self.parse_name()?.to_string().into();

        let selector = if self.skip_if('[') {
            let selector = self.parse_predicate()?;
            self.expect(']')?;
            selector
        } else {
            StepSelector::First
        };

        Ok(AnchorStep { tag, selector })
    }

    /// Parse a complete path
    fn parse_path(&mut self) -> Result<AnchorPath, AnchorParseError> {
        self.skip_if('/');

        let mut steps = vec![self.parse_step()?];
        while self.skip_if('/') {
            steps.push(self.parse_step()?);
        }

        Ok(AnchorPath::new(steps))
    }
}

/// Parse an anchor string into an [`AnchorPath`]
pub fn parse(input: &str) -> Result<AnchorPath, AnchorParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AnchorParseError::Empty);
    }

    let mut parser = Parser::new(input);
    let path = parser.parse_path()?;

    // Ensure we consumed all input
    if !parser.at_end() {
        return Err(AnchorParseError::UnexpectedChar(
            parser.peek().unwrap_or('\0'),
            parser.pos,
        ));
    }

    Ok(path)
}
