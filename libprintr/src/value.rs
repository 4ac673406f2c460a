//! Reconstructed value representation.
//!
//! A dump parses into a tree of these values. Containers keep their
//! pairs in dump order; whether an integer-keyed container is a
//! `Sequence` or a `Mapping` is decided once, when the parser
//! finalizes it.

use std::fmt;

/// A scalar leaf of the value tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// UTF-8 string.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating-point number.
    Float(f64),
}

/// A container key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// String key.
    String(String),
    /// Integer key.
    Integer(i64),
}

/// Which object shape the dump declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// `stdClass Object`.
    Std,
    /// `class@anonymous... Object`.
    Anonymous,
    /// `Closure Object`.
    Closure,
}

/// A reconstructed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar leaf.
    Scalar(Scalar),
    /// Container whose keys were exactly 0..n-1 in order.
    Sequence(Vec<Value>),
    /// Container with any other key shape; insertion order preserved.
    Mapping(Vec<(Key, Value)>),
    /// Object placeholder: a kind tag plus its properties.
    Object(ObjectKind, Vec<(Key, Value)>),
}

impl Scalar {
    /// Coerce raw dump text to the narrowest scalar that reproduces it
    /// exactly: integer first, then float, otherwise string.
    pub fn coerce(text: &str) -> Scalar {
        if let Ok(n) = text.parse::<i64>() {
            if n.to_string() == text {
                return Scalar::Integer(n);
            }
        }
        if let Ok(f) = text.parse::<f64>() {
            if format_float(f) == text {
                return Scalar::Float(f);
            }
        }
        Scalar::String(text.to_string())
    }
}

impl Key {
    /// Coerce a normalized key to an integer when the text round-trips
    /// exactly, otherwise keep it as a string.
    pub fn coerce(text: &str) -> Key {
        if let Ok(n) = text.parse::<i64>() {
            if n.to_string() == text {
                return Key::Integer(n);
            }
        }
        Key::String(text.to_string())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(s) => write!(f, "{}", s),
            Key::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// Canonical float rendering: shortest decimal form, with a forced
/// `.0` suffix so a float never reads back as an integer. The parser
/// uses the same rendering for its round-trip coercion check.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "INF".to_string()
        } else {
            "-INF".to_string()
        }
    } else {
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

impl Value {
    /// Returns `true` for the container variants.
    pub fn is_container(&self) -> bool {
        !matches!(self, Value::Scalar(_))
    }

    /// Returns the scalar if this is a leaf.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the pairs if this is a `Mapping`.
    pub fn as_mapping(&self) -> Option<&[(Key, Value)]> {
        match self {
            Value::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// The container's pairs with explicit keys; a `Sequence` yields
    /// its positions as integer keys. Scalars have no entries.
    pub fn entries(&self) -> Vec<(Key, &Value)> {
        match self {
            Value::Scalar(_) => Vec::new(),
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Key::Integer(i as i64), v))
                .collect(),
            Value::Mapping(pairs) | Value::Object(_, pairs) => {
                pairs.iter().map(|(k, v)| (k.clone(), v)).collect()
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Integer(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}
