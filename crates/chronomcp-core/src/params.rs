//! Typed extraction of tool arguments.
//!
//! MCP tool arguments arrive as a JSON object. Each extractor looks up one
//! key and either returns the typed value, the supplied default when the
//! key is absent (or `null`) and not required, or an
//! [`Error::InvalidArgument`] naming the parameter.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Raw tool arguments as received from the client.
pub type ToolArgs = Map<String, Value>;

fn lookup<'a>(args: &'a ToolArgs, name: &str) -> Option<&'a Value> {
    args.get(name).filter(|v| !v.is_null())
}

fn missing<T>(name: &str, required: bool, default: T) -> Result<T> {
    if required {
        Err(Error::invalid_argument(name, "is required"))
    } else {
        Ok(default)
    }
}

fn wrong_type(name: &str, expected: &str, got: &Value) -> Error {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Error::invalid_argument(name, format!("expected {expected}, got {kind}"))
}

pub fn string(args: &ToolArgs, name: &str, required: bool, default: &str) -> Result<String> {
    match lookup(args, name) {
        None => missing(name, required, default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(wrong_type(name, "a string", other)),
    }
}

/// Optional string that treats an empty value the same as an absent one.
pub fn optional_string(args: &ToolArgs, name: &str) -> Result<Option<String>> {
    let value = string(args, name, false, "")?;
    Ok(Some(value).filter(|s| !s.is_empty()))
}

pub fn boolean(args: &ToolArgs, name: &str, required: bool, default: bool) -> Result<bool> {
    match lookup(args, name) {
        None => missing(name, required, default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(wrong_type(name, "a boolean", other)),
    }
}

/// Integer argument. JSON clients often send integers as floats, so an
/// integral float such as `10.0` is accepted.
pub fn integer(args: &ToolArgs, name: &str, required: bool, default: i64) -> Result<i64> {
    match lookup(args, name) {
        None => missing(name, required, default),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(Error::invalid_argument(
                    name,
                    format!("expected an integer, got {n}"),
                )),
            }
        }
        Some(other) => Err(wrong_type(name, "an integer", other)),
    }
}

pub fn float(args: &ToolArgs, name: &str, required: bool, default: f64) -> Result<f64> {
    match lookup(args, name) {
        None => missing(name, required, default),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::invalid_argument(name, format!("expected a number, got {n}"))),
        Some(other) => Err(wrong_type(name, "a number", other)),
    }
}

pub fn string_array(
    args: &ToolArgs,
    name: &str,
    required: bool,
    default: &[&str],
) -> Result<Vec<String>> {
    match lookup(args, name) {
        None => missing(
            name,
            required,
            default.iter().map(|s| s.to_string()).collect(),
        ),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(wrong_type(&format!("{name}[{i}]"), "a string", other)),
            })
            .collect(),
        Some(other) => Err(wrong_type(name, "an array of strings", other)),
    }
}

pub fn object<'a>(args: &'a ToolArgs, name: &str, required: bool) -> Result<Option<&'a ToolArgs>> {
    match lookup(args, name) {
        None => missing(name, required, None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(wrong_type(name, "an object", other)),
    }
}

/// Array of objects; absent or `null` yields an empty list.
pub fn object_array<'a>(args: &'a ToolArgs, name: &str) -> Result<Vec<&'a ToolArgs>> {
    match lookup(args, name) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(wrong_type(&format!("{name}[{i}]"), "an object", other)),
            })
            .collect(),
        Some(other) => Err(wrong_type(name, "an array of objects", other)),
    }
}
