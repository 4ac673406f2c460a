//! Phase 3: Exporter
//!
//! Walks a value tree and produces PHP literal source. A container at
//! the top of an export renders compact, on one line, when none of its
//! direct children are containers; otherwise it renders expanded, one
//! element per line with a four-space indent and a trailing comma on
//! every line. Containers nested inside an expanded rendering are
//! always expanded. Export is a pure read-only traversal and cannot
//! fail.

use crate::lines::StringLines;
use crate::value::{format_float, Key, Scalar, Value};

const INDENT: &str = "    ";

/// Render a value tree as a PHP literal expression.
///
/// The output carries no statement syntax; wrapping it in an
/// assignment is the caller's business.
pub fn export(value: &Value) -> String {
    match value {
        Value::Scalar(scalar) => scalar_literal(scalar),
        container => export_container(container, false),
    }
}

fn export_container(value: &Value, force_expanded: bool) -> String {
    let entries = value.entries();
    let expanded = force_expanded || entries.iter().any(|(_, child)| child.is_container());
    if expanded {
        export_expanded(value, &entries)
    } else {
        export_compact(value, &entries)
    }
}

/// `array(a, b, c)` on one line, no trailing comma.
fn export_compact(value: &Value, entries: &[(Key, &Value)]) -> String {
    let mut out = String::from(opener(value));
    let mut virtual_key: i64 = 0;
    for (i, (key, child)) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&key_prefix(key, &mut virtual_key));
        match child {
            Value::Scalar(scalar) => out.push_str(&scalar_literal(scalar)),
            // compact mode is only selected when every child is a scalar
            _ => unreachable!("container child in compact rendering"),
        }
    }
    out.push(')');
    out
}

/// One element per line, each line comma-terminated, wrapped in
/// `array(` and `)`.
fn export_expanded(value: &Value, entries: &[(Key, &Value)]) -> String {
    let mut buffer = StringLines::new();
    let mut virtual_key: i64 = 0;
    for (key, child) in entries {
        let prefix = key_prefix(key, &mut virtual_key);
        let rendered = if child.is_container() {
            // Splice the child block: indent the whole block one
            // step, then strip the indent off its first line so
            // `key => array(` share a line.
            let mut block = StringLines::from_string(&export_container(child, true), "\n");
            block.indent(INDENT);
            block.render().trim_start().to_string()
        } else {
            match child {
                Value::Scalar(scalar) => scalar_literal(scalar),
                _ => unreachable!(),
            }
        };
        buffer.add_line(format!("{}{},", prefix, rendered));
    }
    buffer.indent(INDENT);
    buffer.wrap_lines(opener(value), ")");
    buffer.render()
}

fn opener(value: &Value) -> &'static str {
    match value {
        // object-from-map construction
        Value::Object(..) => "(object) array(",
        _ => "array(",
    }
}

/// Virtual-key elision: an integer key equal to the running counter is
/// implicit and bumps the counter; any other key renders explicitly
/// and leaves the counter alone.
fn key_prefix(key: &Key, virtual_key: &mut i64) -> String {
    if let Key::Integer(n) = key {
        if *n == *virtual_key {
            *virtual_key += 1;
            return String::new();
        }
    }
    format!("{} => ", key_literal(key))
}

fn key_literal(key: &Key) -> String {
    match key {
        Key::Integer(n) => n.to_string(),
        Key::String(s) => string_literal(s),
    }
}

fn scalar_literal(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(s) => string_literal(s),
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(f) => format_float(*f),
    }
}

/// Single-quoted PHP string: backslash and the quote itself are the
/// only characters that take an escape.
fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectKind;

    #[test]
    fn test_compact_sequence_elides_all_keys() {
        let value = Value::Sequence(vec![10.into(), 20.into(), 30.into()]);
        assert_eq!(export(&value), "array(10, 20, 30)");
    }

    #[test]
    fn test_mixed_keys_elide_until_broken() {
        let value = Value::Mapping(vec![
            (Key::Integer(0), "a".into()),
            (Key::Integer(2), "b".into()),
        ]);
        assert_eq!(export(&value), "array('a', 2 => 'b')");
    }

    #[test]
    fn test_counter_does_not_advance_on_explicit_keys() {
        // After the break at key 2, key 1 matches the unchanged
        // counter and is elided again.
        let value = Value::Mapping(vec![
            (Key::Integer(0), "a".into()),
            (Key::Integer(2), "b".into()),
            (Key::Integer(1), "c".into()),
        ]);
        assert_eq!(export(&value), "array('a', 2 => 'b', 'c')");
    }

    #[test]
    fn test_string_keys_always_explicit() {
        let value = Value::Mapping(vec![
            (Key::String("name".to_string()), "widget".into()),
            (Key::String("count".to_string()), 2.into()),
        ]);
        assert_eq!(export(&value), "array('name' => 'widget', 'count' => 2)");
    }

    #[test]
    fn test_nested_expansion() {
        let value = Value::Sequence(vec![
            1.into(),
            Value::Mapping(vec![(Key::String("a".to_string()), "foo".into())]),
        ]);
        assert_eq!(
            export(&value),
            "array(\n    1,\n    array(\n        'a' => 'foo',\n    ),\n)"
        );
    }

    #[test]
    fn test_deep_nesting_indents_per_level() {
        let value = Value::Sequence(vec![Value::Sequence(vec![Value::Mapping(vec![(
            Key::String("k".to_string()),
            "v".into(),
        )])])]);
        assert_eq!(
            export(&value),
            "array(\n    array(\n        array(\n            'k' => 'v',\n        ),\n    ),\n)"
        );
    }

    #[test]
    fn test_empty_containers_are_compact() {
        assert_eq!(export(&Value::Sequence(vec![])), "array()");
        assert_eq!(export(&Value::Mapping(vec![])), "array()");
        assert_eq!(
            export(&Value::Object(ObjectKind::Closure, vec![])),
            "(object) array()"
        );
    }

    #[test]
    fn test_object_rendering() {
        let value = Value::Object(
            ObjectKind::Std,
            vec![
                (Key::String("name".to_string()), "widget".into()),
                (Key::String("count".to_string()), 2.into()),
            ],
        );
        assert_eq!(
            export(&value),
            "(object) array('name' => 'widget', 'count' => 2)"
        );
    }

    #[test]
    fn test_object_with_nested_container_expands() {
        let value = Value::Object(
            ObjectKind::Std,
            vec![(
                Key::String("items".to_string()),
                Value::Sequence(vec![1.into(), 2.into()]),
            )],
        );
        assert_eq!(
            export(&value),
            "(object) array(\n    'items' => array(\n        1,\n        2,\n    ),\n)"
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = Value::Mapping(vec![
            (Key::String("path".to_string()), "C:\\temp".into()),
            (Key::String("quote".to_string()), "it's".into()),
        ]);
        assert_eq!(
            export(&value),
            "array('path' => 'C:\\\\temp', 'quote' => 'it\\'s')"
        );
    }

    #[test]
    fn test_float_rendering_keeps_decimal_point() {
        let value = Value::Sequence(vec![1.0.into(), 3.14.into()]);
        assert_eq!(export(&value), "array(1.0, 3.14)");
    }

    #[test]
    fn test_export_is_deterministic() {
        let value = Value::Sequence(vec![
            1.into(),
            Value::Mapping(vec![(Key::String("a".to_string()), "foo".into())]),
        ]);
        assert_eq!(export(&value), export(&value));
    }

    #[test]
    fn test_scalar_at_top_level() {
        assert_eq!(export(&Value::from(42)), "42");
        assert_eq!(export(&Value::from("hi")), "'hi'");
    }
}
