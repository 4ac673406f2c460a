//! Phase 2: Parser
//!
//! Replays the token stream through a small state machine, rebuilding
//! the nested value tree. The cursor is the path of keys from the root
//! down to the slot the next assignment lands in: entering a nested
//! value pushes its key, a scalar assignment or a close pops. The path
//! is empty only at the top level and exactly when the input runs out;
//! anything still on it at end of input means an unclosed container.

use crate::error::{ParseError, Result};
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use crate::value::{Key, ObjectKind, Scalar, Value};
use std::fmt;

/// Parser state between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Default state.
    Neutral,
    /// Entered after a key/separator pair, before its value arrives.
    AwaitingValue,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Neutral => write!(f, "neutral"),
            State::AwaitingValue => write!(f, "awaiting-value"),
        }
    }
}

/// Tree under construction. Slots are created by key tokens and filled
/// in later; containers keep insertion order.
#[derive(Debug)]
enum Node {
    /// Slot allocated, value not yet arrived.
    Empty,
    Scalar(Scalar),
    /// Sequence-or-mapping placeholder; the kind is resolved from the
    /// accumulated keys at finalization.
    Array(Vec<(Key, Node)>),
    Object(ObjectKind, Vec<(Key, Node)>),
}

/// Parse dump text into a value tree.
///
/// Returns `Ok(None)` when the input contains nothing the tokenizer
/// recognizes as a dump.
pub fn parse(input: &str) -> Result<Option<Value>> {
    parse_tokens(Tokenizer::new(input))
}

pub(crate) fn parse_tokens<'a>(tokens: impl Iterator<Item = Token<'a>>) -> Result<Option<Value>> {
    let mut root = Node::Empty;
    // Once the root container has closed, later tokens write into a
    // detached scratch slot and cannot touch the result.
    let mut scratch = Node::Empty;
    let mut root_closed = false;
    let mut path: Vec<Key> = Vec::new();
    let mut current_key: Option<Key> = None;
    let mut state = State::Neutral;

    for (index, token) in tokens.enumerate() {
        let target = if root_closed { &mut scratch } else { &mut root };
        match token.kind {
            TokenKind::ArrayOpen => {
                open(target, &path, Node::Array(Vec::new()), &token, state, index)?;
                state = State::Neutral;
            }
            TokenKind::ObjectOpen | TokenKind::AnonymousOpen | TokenKind::ClosureOpen => {
                let kind = match token.kind {
                    TokenKind::ObjectOpen => ObjectKind::Std,
                    TokenKind::AnonymousOpen => ObjectKind::Anonymous,
                    _ => ObjectKind::Closure,
                };
                open(target, &path, Node::Object(kind, Vec::new()), &token, state, index)?;
                state = State::Neutral;
            }
            TokenKind::Key => {
                if state == State::AwaitingValue {
                    // Two keys with no value between them: the first
                    // key's value is the empty string.
                    *slot_mut(target, &path) = Node::Scalar(Scalar::String(String::new()));
                    path.pop();
                    state = State::Neutral;
                }
                let key = Key::coerce(normalize_key(token.text));
                insert_key(target, &path, key.clone(), &token, state, index)?;
                current_key = Some(key);
            }
            TokenKind::MapSeparator => {
                if state != State::Neutral {
                    return Err(unexpected(&token, state, index));
                }
                let key = match current_key.clone() {
                    Some(key) => key,
                    // A separator with no key before it.
                    None => return Err(unexpected(&token, state, index)),
                };
                match slot_mut(target, &path) {
                    Node::Array(pairs) | Node::Object(_, pairs) => {
                        // A stale key from an already-closed sibling
                        // may not exist here yet.
                        if !pairs.iter().any(|(k, _)| *k == key) {
                            pairs.push((key.clone(), Node::Empty));
                        }
                    }
                    _ => return Err(unexpected(&token, state, index)),
                }
                path.push(key);
                state = State::AwaitingValue;
            }
            TokenKind::Value => {
                if state != State::AwaitingValue {
                    return Err(unexpected(&token, state, index));
                }
                debug_assert!(!path.is_empty());
                *slot_mut(target, &path) = Node::Scalar(coerce_value(token.text));
                // Same pop as array-close, fallthrough intended.
                path.pop();
                state = State::Neutral;
            }
            TokenKind::ArrayClose => {
                if path.pop().is_none() {
                    // The root's own closing paren.
                    root_closed = true;
                    scratch = Node::Empty;
                }
                state = State::Neutral;
            }
            TokenKind::LeadingWhitespace => {}
        }
    }

    if !path.is_empty() {
        return Err(ParseError::UnexpectedEnd { depth: path.len() });
    }
    match root {
        Node::Empty => Ok(None),
        node => Ok(Some(finalize(node))),
    }
}

fn unexpected(token: &Token<'_>, state: State, index: usize) -> ParseError {
    ParseError::UnexpectedToken {
        kind: token.kind,
        state,
        index,
    }
}

/// Strip the surrounding bracket markers from a key token and trim.
fn normalize_key(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(trimmed)
}

/// Trim trailing whitespace, drop one trailing comma, then coerce.
fn coerce_value(text: &str) -> Scalar {
    let mut text = text.trim_end();
    if let Some(stripped) = text.strip_suffix(',') {
        text = stripped;
    }
    Scalar::coerce(text)
}

/// Place a freshly opened container into the current slot. The slot
/// must still be unassigned; two opens with no separator between them
/// are a structural error.
fn open(
    target: &mut Node,
    path: &[Key],
    node: Node,
    token: &Token<'_>,
    state: State,
    index: usize,
) -> Result<()> {
    let slot = slot_mut(target, path);
    if !matches!(slot, Node::Empty) {
        return Err(unexpected(token, state, index));
    }
    *slot = node;
    Ok(())
}

/// Record a key in the current container, allocating its slot. A key
/// over a still-unassigned slot turns it into an array container, the
/// way the dump format's producer autovivifies; re-using an existing
/// key resets that slot in place.
fn insert_key(
    target: &mut Node,
    path: &[Key],
    key: Key,
    token: &Token<'_>,
    state: State,
    index: usize,
) -> Result<()> {
    let slot = slot_mut(target, path);
    if matches!(slot, Node::Empty) {
        *slot = Node::Array(Vec::new());
    }
    match slot {
        Node::Array(pairs) | Node::Object(_, pairs) => {
            if let Some(pair) = pairs.iter_mut().find(|(k, _)| *k == key) {
                pair.1 = Node::Empty;
            } else {
                pairs.push((key, Node::Empty));
            }
            Ok(())
        }
        _ => Err(unexpected(token, state, index)),
    }
}

/// Resolve the slot a path addresses. The path only ever holds keys
/// this parser inserted itself, so every step lands in a container.
fn slot_mut<'a>(mut node: &'a mut Node, path: &[Key]) -> &'a mut Node {
    for key in path {
        node = match node {
            Node::Array(pairs) | Node::Object(_, pairs) => {
                match pairs.iter_mut().find(|(k, _)| k == key) {
                    Some(pair) => &mut pair.1,
                    None => unreachable!("cursor path addresses a missing key"),
                }
            }
            _ => unreachable!("cursor path descends into a non-container"),
        };
    }
    node
}

/// Resolve placeholder containers into their final shape: keys that
/// are exactly 0..n-1 in order make a `Sequence`, anything else a
/// `Mapping`. Objects stay property mappings regardless of key shape.
/// A slot that never received a value is the empty string.
fn finalize(node: Node) -> Value {
    match node {
        Node::Empty => Value::Scalar(Scalar::String(String::new())),
        Node::Scalar(scalar) => Value::Scalar(scalar),
        Node::Array(pairs) => {
            if is_list(&pairs) {
                Value::Sequence(pairs.into_iter().map(|(_, node)| finalize(node)).collect())
            } else {
                Value::Mapping(
                    pairs
                        .into_iter()
                        .map(|(key, node)| (key, finalize(node)))
                        .collect(),
                )
            }
        }
        Node::Object(kind, pairs) => Value::Object(
            kind,
            pairs
                .into_iter()
                .map(|(key, node)| (key, finalize(node)))
                .collect(),
        ),
    }
}

fn is_list(pairs: &[(Key, Node)]) -> bool {
    pairs
        .iter()
        .enumerate()
        .all(|(i, (key, _))| matches!(key, Key::Integer(n) if *n == i as i64))
}
