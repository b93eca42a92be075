// SPDX-License-Identifier: MIT OR Apache-2.0
//! Leaf equality used to decide whether a diff emits an operation.
//!
//! Two comparators are provided. [`Equality::Structural`] is the default.
//! [`Equality::Rendered`] compares the default textual rendering of both
//! values, which reproduces output of older tool revisions at the cost of
//! conflating values such as `1` and `"1"`.

use std::fmt::Write as _;

use serde_json::{Number, Value};

/// Decides whether two values are the same for diffing purposes.
pub trait ValueComparator {
    /// Returns `true` when no operation is needed to turn `original` into `derived`.
    fn values_equal(&self, original: &Value, derived: &Value) -> bool;
}

impl<F> ValueComparator for F
where
    F: Fn(&Value, &Value) -> bool,
{
    fn values_equal(&self, original: &Value, derived: &Value) -> bool {
        self(original, derived)
    }
}

/// Built-in comparators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Equality {
    /// Deep structural equality with numeric comparison of numbers
    #[default]
    Structural,
    /// Equality of the default textual rendering
    Rendered,
}

impl ValueComparator for Equality {
    fn values_equal(&self, original: &Value, derived: &Value) -> bool {
        match self {
            Self::Structural => structural_eq(original, derived),
            Self::Rendered => rendered_eq(original, derived),
        }
    }
}

/// Deep equality. Object key order is ignored and `1 == 1.0`.
#[must_use]
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| structural_eq(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, l)| y.get(key).is_some_and(|r| structural_eq(l, r)))
        }
        _ => false,
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    if !a.is_f64() && !b.is_f64() {
        return false;
    }
    matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y)
}

/// Rendering equality. A null on exactly one side is never equal.
#[must_use]
pub fn rendered_eq(a: &Value, b: &Value) -> bool {
    if a.is_null() || b.is_null() {
        return a.is_null() && b.is_null();
    }
    render(a) == render(b)
}

/// Default textual rendering of a value.
///
/// Strings are unquoted, numbers use the shortest float form, arrays are
/// space separated and objects render as `map[k:v ...]` with sorted keys.
#[must_use]
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    render_into(value, &mut out);
    out
}

fn render_into(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("<nil>"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => out.push_str(&render_number(n)),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                render_into(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            out.push_str("map[");
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                render_into(item, out);
            }
            out.push(']');
        }
    }
}

/// Numbers render as 64-bit floats in shortest form, switching to exponent
/// notation below `1e-4` and from `1e6` up, with a signed two-digit exponent.
fn render_number(n: &Number) -> String {
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    if f == 0.0 || !f.is_finite() {
        return format!("{f}");
    }
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..6).contains(&exponent) {
        format!("{f}")
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_numbers() {
        assert!(structural_eq(&json!(1), &json!(1.0)));
        assert!(structural_eq(&json!(-3), &json!(-3)));
        assert!(!structural_eq(&json!(1), &json!(2)));
        assert!(!structural_eq(&json!(1), &json!("1")));
    }

    #[test]
    fn test_structural_containers() {
        assert!(structural_eq(&json!({"a": 1, "b": [1, 2]}), &json!({"b": [1, 2], "a": 1})));
        assert!(!structural_eq(&json!([1, 2]), &json!([2, 1])));
        assert!(!structural_eq(&json!({"a": 1}), &json!({"a": 1, "b": null})));
        assert!(!structural_eq(&json!(null), &json!(false)));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&json!(null)), "<nil>");
        assert_eq!(render(&json!("x y")), "x y");
        assert_eq!(render(&json!(1)), "1");
        assert_eq!(render(&json!(1.5)), "1.5");
        assert_eq!(render(&json!(1e21)), "1e+21");
        assert_eq!(render(&json!(999_999)), "999999");
        assert_eq!(render(&json!(1_000_000)), "1e+06");
        assert_eq!(render(&json!(1_234_567.5)), "1.2345675e+06");
        assert_eq!(render(&json!(0.00001)), "1e-05");
        assert_eq!(render(&json!(0.0001)), "0.0001");
        assert_eq!(render(&json!([1, "a", true])), "[1 a true]");
        assert_eq!(render(&json!({"b": 2, "a": [1]})), "map[a:[1] b:2]");
    }

    #[test]
    fn test_rendered_conflates_types() {
        assert!(rendered_eq(&json!(1), &json!("1")));
        assert!(rendered_eq(&json!(1), &json!(1.0)));
        assert!(rendered_eq(&json!(1_000_000), &json!("1e+06")));
        assert!(!rendered_eq(&json!(1_000_000), &json!("1000000")));
        assert!(!rendered_eq(&json!(null), &json!("<nil>")));
        assert!(rendered_eq(&json!(null), &json!(null)));
    }

    #[test]
    fn test_comparator_trait() {
        assert!(Equality::Structural.values_equal(&json!("a"), &json!("a")));
        assert!(!Equality::Structural.values_equal(&json!(1), &json!("1")));
        assert!(Equality::Rendered.values_equal(&json!(1), &json!("1")));
        let never = |_: &Value, _: &Value| false;
        assert!(!never.values_equal(&json!(1), &json!(1)));
    }
}
