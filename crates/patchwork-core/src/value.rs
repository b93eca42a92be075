// SPDX-License-Identifier: MIT OR Apache-2.0
//! Helpers over the canonical value tree.

use serde_json::Value;

/// Human-readable name of a value's variant, used in error messages.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
