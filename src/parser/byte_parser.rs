//! Low-level byte-by-byte parser for ASCII tree text.
//!
//! This module provides [ByteParser] for peeking, consuming, and
//! quote-aware label parsing. It is the foundation of the Newick parser and
//! thereby of every tree reader in this crate.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text with support for peeking, consuming,
/// and case-insensitive matching.
///
/// Square-bracket blocks are treated in two ways: `[...]` is a plain comment
/// and skipped by [skip_comment](Self::skip_comment), whereas `[&...]` is an
/// annotation block (BEAST, FigTree, treesub) which is left in place for the
/// caller to parse.
///
/// # Example
/// ```
/// use phylokit::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [a comment] (A,B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.peek_is(b'('));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new [ByteParser] from a string by copying it.
    pub fn for_str(input: &str) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.as_bytes().to_vec()))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new [ByteParser] from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips all consecutive whitespace (space, tab, newline, carriage return).
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Returns whether the parser is positioned at the start of an
    /// annotation block `[&`.
    pub fn peek_is_annotation(&self) -> bool {
        self.source.peek_slice(2) == b"[&"
    }

    /// Skips a plain `[...]` comment if present.
    ///
    /// Annotation blocks starting with `[&` are not comments and are left alone.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.peek() != Some(b'[') || self.peek_is_annotation() {
            return Ok(false);
        }
        self.skip_bracket_block()?;
        Ok(true)
    }

    /// Skips a complete `[...]` block, annotation or not.
    ///
    /// Nested brackets are balanced and brackets inside double quotes are
    /// ignored, as treesub writes values like `NONSYNSUBS="[A123T]"`.
    pub fn skip_bracket_block(&mut self) -> Result<(), ParsingError> {
        if !self.consume_if(b'[') {
            return Ok(());
        }

        let mut depth = 1usize;
        let mut in_quotes = false;
        while let Some(b) = self.next_byte() {
            match b {
                b'"' => in_quotes = !in_quotes,
                b'[' if !in_quotes => depth += 1,
                b']' if !in_quotes => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(ParsingError::unclosed_comment(self))
    }

    /// Skips all consecutive whitespace and plain comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches `ch` (case-insensitive for ASCII).
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek()
            .is_some_and(|b| b.eq_ignore_ascii_case(&ch))
    }

    /// Checks if the following bytes match `sequence` (case-insensitive).
    #[inline]
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        let context = self.source.peek_slice(sequence.len());
        context.len() == sequence.len() && context.eq_ignore_ascii_case(sequence)
    }

    /// Consumes the current byte if it matches `ch` (case-insensitive).
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes the next bytes if they match `sequence` (case-insensitive).
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }

        for _ in 0..sequence.len() {
            self.next_byte();
        }

        true
    }

    /// Returns whether the end of data has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns up to `k` bytes from the current position as (lossy) string,
    /// used as error context.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) ending at any of `delimiters`.
    ///
    /// Leading whitespace and plain comments are skipped first.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a label enclosed in single quotes.
    ///
    /// Assumes the opening quote has not been consumed yet. Doubled single
    /// quotes inside the label are unescaped (`'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next_byte(); // opening '

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    if self.peek() == Some(b'\'') {
                        bytes.push(b'\'');
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => bytes.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parses an unquoted label until any of `delimiters` (or EOF) is reached.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut bytes = Vec::new();

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
