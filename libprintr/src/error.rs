//! Error types for dump parsing.

use crate::parser::State;
use crate::tokenizer::TokenKind;
use thiserror::Error;

/// Result type for dump parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Fatal parse failure.
///
/// The tokenizer itself never fails: input it cannot match simply ends
/// the token stream. Errors arise only in the parser, when a token
/// shows up in a state the transition table does not cover, or when
/// the input ends with containers still open.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token kind arrived in a state it is not legal in.
    #[error("Unexpected token {kind} in state {state} at index {index}")]
    UnexpectedToken {
        /// Kind of the offending token.
        kind: TokenKind,
        /// Parser state when the token arrived.
        state: State,
        /// Zero-based index of the token in the stream.
        index: usize,
    },

    /// The token stream ended while containers were still open.
    #[error("Unexpected end of input with {depth} unclosed container(s)")]
    UnexpectedEnd {
        /// Number of back-references left on the cursor stack.
        depth: usize,
    },
}
