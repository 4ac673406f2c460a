//! Line buffer used by the exporter to assemble indented output.
//!
//! Purely a text utility: an ordered list of stored lines plus a
//! separator. A stored line may itself contain embedded separators;
//! `indent` prefixes stored lines, not physical lines, which is what
//! lets the exporter splice a pre-rendered child block into a parent
//! while only re-indenting the block's first line.

use std::fmt;

/// Ordered text lines with indent/wrap/join helpers.
#[derive(Debug, Clone, Default)]
pub struct StringLines {
    lines: Vec<String>,
    separator: String,
}

impl StringLines {
    /// Empty buffer with the `"\n"` separator.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            separator: "\n".to_string(),
        }
    }

    /// Split `text` on `separator` into stored lines.
    pub fn from_string(text: &str, separator: &str) -> Self {
        Self {
            lines: text.split(separator).map(String::from).collect(),
            separator: separator.to_string(),
        }
    }

    /// Append a line.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Prefix every stored line with `by`. Returns `self` for chaining.
    pub fn indent(&mut self, by: &str) -> &mut Self {
        for line in &mut self.lines {
            line.insert_str(0, by);
        }
        self
    }

    /// Insert `first` before all lines and append `last` after them.
    pub fn wrap_lines(&mut self, first: impl Into<String>, last: impl Into<String>) {
        self.lines.insert(0, first.into());
        self.lines.push(last.into());
    }

    /// All stored lines joined by the separator.
    pub fn render(&self) -> String {
        self.lines.join(&self.separator)
    }

    /// The stored lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for StringLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
