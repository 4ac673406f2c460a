//! Phase 1: Tokenizer
//!
//! Scans raw dump text into a flat token stream. Every rule in a fixed
//! table is tried anchored at the current cursor offset; the longest
//! match wins and equal lengths go to the rule declared first. When no
//! rule matches, the stream ends: trailing unrecognized bytes are
//! silently dropped rather than rejected. That is a documented
//! limitation of the dump format, not an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Token kind in the tokenizer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `Array (` header.
    ArrayOpen,
    /// `stdClass Object (` header.
    ObjectOpen,
    /// `class@anonymous... Object (` header.
    AnonymousOpen,
    /// `Closure Object (` header.
    ClosureOpen,
    /// Bracketed key, `[name]`.
    Key,
    /// The ` => ` between a key and its value.
    MapSeparator,
    /// Closing `)` of a container.
    ArrayClose,
    /// Scalar value text, up to end of line.
    Value,
    /// Whitespace at the start of a line.
    LeadingWhitespace,
}

impl TokenKind {
    /// Hyphenated token name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::ArrayOpen => "array-open",
            TokenKind::ObjectOpen => "object-open",
            TokenKind::AnonymousOpen => "anonymous-open",
            TokenKind::ClosureOpen => "closure-open",
            TokenKind::Key => "key",
            TokenKind::MapSeparator => "map-separator",
            TokenKind::ArrayClose => "array-close",
            TokenKind::Value => "value",
            TokenKind::LeadingWhitespace => "leading-whitespace",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single token cut from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte offset of the token in the input.
    pub offset: usize,
    /// The matched text.
    pub text: &'a str,
}

impl Token<'_> {
    /// Byte length of the matched text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

struct TokenRule {
    kind: TokenKind,
    /// Literal that must end right before the cursor. Stands in for
    /// the lookbehind of the original `value` pattern, which the
    /// `regex` crate does not support; rules are anchored at the
    /// cursor, so the two are equivalent.
    preceded_by: Option<&'static str>,
    pattern: Regex,
}

impl TokenRule {
    /// Length of this rule's match anchored exactly at `at`, or 0.
    /// Zero-length matches never count.
    fn match_len(&self, buffer: &str, at: usize) -> usize {
        if let Some(literal) = self.preceded_by {
            if !buffer[..at].ends_with(literal) {
                return 0;
            }
        }
        match self.pattern.find_at(buffer, at) {
            Some(m) if m.start() == at => m.len(),
            _ => 0,
        }
    }
}

/// The rule table. Declaration order is part of the contract: when two
/// rules match the same maximal length, the earlier one wins.
static RULES: Lazy<Vec<TokenRule>> = Lazy::new(|| {
    let rule = |kind, preceded_by, pattern: &str| TokenRule {
        kind,
        preceded_by,
        pattern: Regex::new(&format!("(?im){}", pattern)).expect("token pattern compiles"),
    };
    vec![
        rule(TokenKind::ArrayOpen, None, r"Array\s*\(\s?$"),
        rule(TokenKind::ObjectOpen, None, r"stdClass Object\s*\($"),
        rule(TokenKind::AnonymousOpen, None, r"class@anonymous\S* Object\s*\($"),
        rule(TokenKind::ClosureOpen, None, r"Closure Object\s*\($"),
        rule(TokenKind::Key, None, r"\s*\[[^\]]+\]"),
        rule(TokenKind::MapSeparator, None, r" => "),
        rule(TokenKind::ArrayClose, None, r"\s*\)\s?$"),
        rule(TokenKind::Value, Some(" => "), r"[^\n]*$"),
        rule(TokenKind::LeadingWhitespace, None, r"^\s+"),
    ]
});

/// Lazy tokenizer over a dump buffer.
///
/// Finite and forward-only: once the cursor passes an offset there is
/// no way back, and a fresh tokenizer must be constructed to scan the
/// buffer again.
pub struct Tokenizer<'a> {
    buffer: &'a str,
    offset: usize,
}

impl<'a> Tokenizer<'a> {
    /// Tokenizer positioned at offset zero of `buffer`.
    pub fn new(buffer: &'a str) -> Self {
        Self { buffer, offset: 0 }
    }

    /// The longest match anchored at the current offset, together with
    /// the rule that produced it.
    fn match_largest(&self) -> Option<(TokenKind, usize)> {
        let mut best: Option<(TokenKind, usize)> = None;
        for rule in RULES.iter() {
            let len = rule.match_len(self.buffer, self.offset);
            if len > best.map_or(0, |(_, best_len)| best_len) {
                best = Some((rule.kind, len));
            }
        }
        best
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let (kind, len) = self.match_largest()?;
        let token = Token {
            kind,
            offset: self.offset,
            text: &self.buffer[self.offset..self.offset + len],
        };
        self.offset += len;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_dump() {
        let input = "Array\n(\n    [0] => 1\n)\n";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::ArrayOpen,
                TokenKind::Key,
                TokenKind::MapSeparator,
                TokenKind::Value,
                TokenKind::ArrayClose,
            ]
        );
    }

    #[test]
    fn test_object_headers() {
        assert_eq!(kinds("stdClass Object\n(\n)")[0], TokenKind::ObjectOpen);
        assert_eq!(kinds("Closure Object\n(\n)")[0], TokenKind::ClosureOpen);
        assert_eq!(
            kinds("class@anonymous/src/Service.php:12$3e Object\n(\n)")[0],
            TokenKind::AnonymousOpen
        );
    }

    #[test]
    fn test_longest_match_prefers_array_open_over_value() {
        // After ` => `, both the value rule (5 bytes, "Array") and the
        // array-open rule (through the paren) match; the longer open
        // must win.
        let input = "[x] => Array\n    (";
        assert_eq!(
            kinds(input),
            vec![TokenKind::Key, TokenKind::MapSeparator, TokenKind::ArrayOpen]
        );
    }

    #[test]
    fn test_tie_break_prefers_array_close_over_value() {
        // At ` )` after a separator, array-close and value both match
        // two bytes; array-close is declared earlier and wins.
        let input = "[a] =>  )";
        assert_eq!(
            kinds(input),
            vec![TokenKind::Key, TokenKind::MapSeparator, TokenKind::ArrayClose]
        );
    }

    #[test]
    fn test_unmatched_input_ends_stream() {
        assert!(kinds("hello world").is_empty());
    }

    #[test]
    fn test_trailing_garbage_is_dropped() {
        let input = "Array\n(\n    [0] => 1\n)\nleftover junk";
        let tokens: Vec<_> = Tokenizer::new(input).collect();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::ArrayClose));
    }

    #[test]
    fn test_leading_whitespace_token() {
        let tokens: Vec<_> = Tokenizer::new("  \nArray\n(\n)").collect();
        assert_eq!(tokens[0].kind, TokenKind::LeadingWhitespace);
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].kind, TokenKind::ArrayOpen);
    }

    #[test]
    fn test_offsets_are_contiguous() {
        let input = "Array\n(\n    [a] => foo\n    [b] => 2\n)\n";
        let mut end = 0;
        for token in Tokenizer::new(input) {
            assert_eq!(token.offset, end);
            end = token.offset + token.len();
        }
        assert!(end > 0);
    }

    #[test]
    fn test_value_requires_separator_before_it() {
        // Bare text with no ` => ` in front never becomes a value.
        assert!(kinds("just some text").is_empty());
    }

    #[test]
    fn test_empty_value_does_not_match() {
        // `[a] => ` followed by a newline: the value rule would match
        // zero bytes, which does not count; the next key is matched
        // instead.
        let input = "Array\n(\n    [a] => \n    [b] => x\n)";
        let tokens = kinds(input);
        assert_eq!(
            tokens,
            vec![
                TokenKind::ArrayOpen,
                TokenKind::Key,
                TokenKind::MapSeparator,
                TokenKind::Key,
                TokenKind::MapSeparator,
                TokenKind::Value,
                TokenKind::ArrayClose,
            ]
        );
    }
}
