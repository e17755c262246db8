use std::env;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde_json::Value;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\$\{([A-Za-z0-9_.]+)\}").expect("valid token regex");
}

const MAX_PASSES: usize = 8;

/// Replaces every `${dotted.path}` inside string values with the value found
/// at that path in `root`, falling back to the environment variable of the
/// same name. Unresolved tokens are left as they are.
///
/// Tokens may refer to values that contain tokens themselves; expansion
/// repeats until nothing changes or `MAX_PASSES` is reached, which also stops
/// self-referencing values.
pub fn expand_tokens(root: &Value) -> Value {
    let mut current = root.clone();
    for _ in 0..MAX_PASSES {
        let next = expand_value(&current, &current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn expand_value(value: &Value, root: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(expand_str(s, root)),
        Value::Array(items) => Value::Array(items.iter().map(|v| expand_value(v, root)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), expand_value(v, root)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn expand_str(s: &str, root: &Value) -> String {
    TOKEN
        .replace_all(s, |caps: &Captures| {
            let path = &caps[1];
            lookup(root, path)
                .or_else(|| env::var(path).ok())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn lookup(root: &Value, path: &str) -> Option<String> {
    let found = path
        .split('.')
        .try_fold(root, |node, key| node.as_object()?.get(key))?;

    match found {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
