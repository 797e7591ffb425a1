//! Tera filters that emit literals for generated source code.
//!
//! Auto-escaping is off for script templates, so any value interpolated into
//! code must go through one of these.

use std::collections::HashMap;

use tera::{Result as TeraResult, Value};

/// Render a value as a Python literal (`None`, `True`, lists, dicts, strings)
pub fn py_literal(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    Ok(Value::String(python_repr(value)))
}

fn python_repr(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        // JSON string escapes are valid Python string escapes
        Value::String(_) => value.to_string(),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(python_repr).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::String(k.clone()), python_repr(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Quote a value for POSIX shells using single quotes
pub fn shell_quote(value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(Value::String(format!("'{}'", text.replace('\'', r"'\''"))))
}
