//! Low-level byte-by-byte parser for ASCII text.
//!
//! This module provides [ByteParser] for parsing Newick input with support
//! for peeking, consuming, comment skipping and quote-aware label parsing.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text over an in-memory buffer.
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, doubled to escape)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use acgtree::parser::byte_parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [sampled 2019] 'Kea':0.5");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert_eq!(parser.parse_label(b",:;)").unwrap(), "Kea");
/// assert!(parser.consume_if(b':'));
/// ```
#[derive(Debug, Clone)]
pub struct ByteParser {
    bytes: Vec<u8>,
    position: usize,
}

impl ByteParser {
    /// Creates a new `ByteParser` taking ownership of the given bytes.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes, position: 0 }
    }

    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    pub fn for_bytes(input: &[u8]) -> Self {
        Self::from_vec(input.to_vec())
    }

    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.position += 1;
        }
    }

    /// Skips (consumes) a comment `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a closing `]`.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte is `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it is `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consumes bytes until the target byte is found.
    ///
    /// # Arguments
    /// * `target` - The byte to search for
    /// * `mode` - Whether to consume the target byte (`Inclusive`) or stop before it (`Exclusive`)
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        let remaining = &self.bytes[self.position.min(self.bytes.len())..];
        match remaining.iter().position(|&b| b == target) {
            Some(offset) => {
                self.position += offset;
                if mode == ConsumeMode::Inclusive {
                    self.position += 1;
                }
                true
            }
            None => {
                self.position = self.bytes.len();
                false
            }
        }
    }

    /// Consumes bytes while `accept` holds and returns them as a string.
    pub fn consume_while<F>(&mut self, accept: F) -> String
    where
        F: Fn(u8) -> bool,
    {
        let start = self.position;
        while self.peek().is_some_and(&accept) {
            self.position += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.position]).into_owned()
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let start = self.position.min(self.bytes.len());
        let end = (start + k).min(self.bytes.len());
        String::from_utf8_lossy(&self.bytes[start..end]).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Detects whether the label is quoted (single quotes) or unquoted and
    /// calls the appropriate parser method.
    ///
    /// # Arguments
    /// * `delimiters` - Byte array of characters that end an unquoted label
    ///
    /// # Errors
    /// Returns an error if a comment or a quoted label is not closed
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes.
    ///
    /// Expects the parser at the opening quote. Single quotes within the
    /// label are escaped by doubling them (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start = self.position;
        self.position += 1; // opening '

        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') if self.peek_is(b'\'') => {
                    label.push(b'\'');
                    self.position += 1;
                }
                Some(b'\'') => break,
                Some(b) => label.push(b),
                None => {
                    self.position = start;
                    return Err(ParsingError::unclosed_quote(self));
                }
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters (or EOF) is encountered.
    /// Underscores are kept as they are.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        self.consume_while(|b| !delimiters.contains(&b))
    }
}

/// Specifies whether to consume or leave the target when using [ByteParser::consume_until].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target byte along with everything before it.
    Inclusive,
    /// Stop before the target byte without consuming it.
    Exclusive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parsing_error::ParsingErrorType;

    #[test]
    fn test_skip_whitespace() {
        let mut parser = ByteParser::for_str(" \r  \t\n \t x y");
        parser.skip_whitespace();
        assert_eq!(parser.peek(), Some(b'x'));

        parser.next_byte();
        parser.skip_whitespace();
        assert_eq!(parser.peek(), Some(b'y'));
    }

    #[test]
    fn test_skip_comment_and_whitespace() {
        let mut parser = ByteParser::for_str("[Go] \n[Keep going]   \t ['...']\n  (A");
        parser.skip_comment_and_whitespace().unwrap();
        assert_eq!(parser.next_byte(), Some(b'('));
    }

    #[test]
    fn test_unclosed_comment() {
        let mut parser = ByteParser::for_str("(A,B) [never closed");
        parser.consume_until(b'[', ConsumeMode::Exclusive);
        let err = parser.skip_comment().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
    }

    #[test]
    fn test_consume_until_modes() {
        let mut parser = ByteParser::for_str("abc:def");
        assert!(parser.consume_until(b':', ConsumeMode::Exclusive));
        assert_eq!(parser.position(), 3);
        assert!(parser.consume_until(b':', ConsumeMode::Inclusive));
        assert_eq!(parser.peek(), Some(b'd'));
        assert!(!parser.consume_until(b':', ConsumeMode::Inclusive));
        assert!(parser.is_eof());
    }

    #[test]
    fn test_parse_labels() {
        let mut parser = ByteParser::for_str("Great_Kiwi,'Wilson''s Storm-petrel':1");
        assert_eq!(parser.parse_label(b",:;)").unwrap(), "Great_Kiwi");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_label(b",:;)").unwrap(), "Wilson's Storm-petrel");
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn test_unclosed_quote() {
        let mut parser = ByteParser::for_str("('Kakapo:1,B:1);");
        parser.next_byte();
        let err = parser.parse_label(b",:;)").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn test_consume_while_and_context() {
        let mut parser = ByteParser::for_str("1.5e-3,C");
        let number = parser.consume_while(|b| b.is_ascii_digit() || b"+-.eE".contains(&b));
        assert_eq!(number, "1.5e-3");
        assert_eq!(parser.get_context_as_string(10), ",C");
    }
}
