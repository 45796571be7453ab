//! Turning parsed values back into a command-line string.

use indexmap::IndexMap;
use thiserror::Error;

use crate::option::dasherize;
use crate::value::{Value, format_float};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("unterminated quote starting at byte {0}")]
    UnterminatedQuote(usize),
    #[error("trailing backslash at end of input")]
    DanglingEscape,
}

/// Render values as switches that parse back to the same values.
///
/// `true` becomes a bare switch and `false` is left out, as are empty
/// arrays and hashes. Strings and array items are double-quoted; a string
/// starting with `-` is attached with `=` so it is not read as a switch.
///
/// Array items and hash pairs starting with `-` (other than negative
/// numbers) cannot be expressed and stop collection when parsed back.
pub fn to_switches(values: &IndexMap<String, Value>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (key, value) in values {
        let switch = dasherize(key);
        let rendered = match value {
            Value::Bool(true) => Some(switch),
            Value::Bool(false) => None,
            Value::Integer(n) => Some(format!("{switch} {n}")),
            Value::Float(f) => Some(format!("{switch} {}", format_float(*f))),
            Value::String(s) if s.starts_with('-') => Some(format!("{switch}={}", quote(s))),
            Value::String(s) => Some(format!("{switch} {}", quote(s))),
            Value::Array(items) if items.is_empty() => None,
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(|item| quote(item)).collect();
                Some(format!("{switch} {}", items.join(" ")))
            }
            Value::Hash(map) if map.is_empty() => None,
            Value::Hash(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(k, v)| quote_if_needed(&format!("{k}:{v}")))
                    .collect();
                Some(format!("{switch} {}", pairs.join(" ")))
            }
        };
        parts.extend(rendered);
    }
    parts.join(" ")
}

/// Split a switch string into tokens.
///
/// Whitespace separates tokens; double quotes group, and inside or outside
/// quotes `\"` and `\\` escape.
pub fn split_switches(input: &str) -> Result<Vec<String>, SplitError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote_start: Option<usize> = None;
    let mut chars = input.char_indices();

    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next().ok_or(SplitError::DanglingEscape)?;
                current.push(escaped);
                in_token = true;
            }
            '"' => {
                quote_start = match quote_start {
                    Some(_) => None,
                    None => Some(at),
                };
                in_token = true;
            }
            c if c.is_whitespace() && quote_start.is_none() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(at) = quote_start {
        return Err(SplitError::UnterminatedQuote(at));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn quote_if_needed(s: &str) -> String {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        quote(s)
    } else {
        s.to_string()
    }
}
