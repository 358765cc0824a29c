//! Placeholder expansion for raw view contents

use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Expand `{{path}}` placeholders in raw JSON view contents.
///
/// Paths are dot-separated lookups into the context object. String values
/// are JSON-escaped so placeholders inside string literals keep the
/// document well-formed; other values are written as JSON. Placeholders
/// that do not resolve are left as-is.
pub fn expand_placeholders(contents: &str, context: &Value) -> String {
    if !context.is_object() || !contents.contains(OPEN) {
        return contents.to_string();
    }

    let mut result = String::with_capacity(contents.len());
    let mut rest = contents;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };

        result.push_str(&rest[..start]);
        let path = after_open[..end].trim();
        match lookup(context, path) {
            Some(value) => result.push_str(&render_value(value)),
            None => result.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    result.push_str(rest);
    result
}

fn lookup<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(context, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let quoted = Value::String(s.clone()).to_string();
            quoted[1..quoted.len() - 1].to_string()
        }
        Value::Null => String::new(),
        // Numbers, booleans, arrays and objects are inlined as JSON
        other => other.to_string(),
    }
}
