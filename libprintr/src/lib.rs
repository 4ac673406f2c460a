//! print_r dump to PHP literal converter.
//!
//! Takes the text PHP's `print_r()` prints for nested data and
//! reconstructs an equivalent `array(...)` literal that can be pasted
//! straight back into source code.
//!
//! # Pipeline
//!
//! The conversion runs in three phases:
//!
//! 1. **Tokenizer**: scans the dump into a flat token stream using an
//!    ordered table of patterns, longest match at each offset.
//!
//! 2. **Parser**: replays the token stream through a state machine,
//!    rebuilding the nested value tree.
//!
//! 3. **Exporter**: walks the tree and emits deterministic literal
//!    source, compact or expanded per container.
//!
//! Callers must normalize line endings to `\n` before handing text in;
//! bounding input size is also the caller's business.

mod error;
mod export;
mod lines;
mod parser;
mod tokenizer;
mod value;

pub use error::{ParseError, Result};
pub use export::export;
pub use lines::StringLines;
pub use parser::{parse, State};
pub use tokenizer::{Token, TokenKind, Tokenizer};
pub use value::{format_float, Key, ObjectKind, Scalar, Value};

/// Convert dump text to a PHP literal expression.
///
/// Input with no recognizable dump in it converts to `NULL`, the
/// literal for the absent value.
///
/// # Example
///
/// ```
/// let literal = libprintr::convert("Array\n(\n    [0] => 1\n)\n").unwrap();
/// assert_eq!(literal, "array(1)");
/// ```
pub fn convert(input: &str) -> Result<String> {
    Ok(match parse(input)? {
        Some(value) => export(&value),
        None => "NULL".to_string(),
    })
}
