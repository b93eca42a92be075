// SPDX-License-Identifier: MIT OR Apache-2.0
//! Concrete syntax tree that keeps every byte of the source.
//!
//! Each value is wrapped in an [`Element`] holding the whitespace and
//! comments ("extra") before and after it. Objects and arrays share one
//! container shape, [`Delimited`], which also remembers the extra before the
//! closing delimiter and whether a trailing comma was written.
//!
//! The extra after the last entry of a container is always stored in
//! [`Delimited::trailing`], never in the entry itself, so that appending an
//! entry does not strand whitespace between a value and its new comma.

use serde_json::{Map, Value};

/// A value with its surrounding whitespace and comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub before: String,
    pub node: Node,
    pub after: String,
}

/// The value itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// String, number, boolean or null
    Literal(Literal),
    /// `{ ... }`
    Object(Delimited<Member>),
    /// `[ ... ]`
    Array(Delimited<Element>),
}

/// A scalar with its source text and decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    raw: String,
    value: Value,
}

/// An object member. `key` is the decoded name.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub key: String,
    pub name: Element,
    pub value: Element,
}

/// Entries between a pair of delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct Delimited<T> {
    pub items: Vec<T>,
    pub trailing: String,
    pub trailing_comma: bool,
}

impl<T> Default for Delimited<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            trailing: String::new(),
            trailing_comma: false,
        }
    }
}

/// An entry of a [`Delimited`] container.
pub trait Entry {
    /// Empty containers of this kind open onto their own lines when filled.
    const EXPANDS_WHEN_EMPTY: bool;

    /// Extra before the entry, after the previous comma or opening delimiter.
    fn lead(&self) -> &str;

    fn lead_mut(&mut self) -> &mut String;

    /// Whether any extra owned by the entry spans a line break.
    fn breaks_line(&self) -> bool;

    fn write_to(&self, out: &mut String);
}

impl Entry for Member {
    const EXPANDS_WHEN_EMPTY: bool = true;

    fn lead(&self) -> &str {
        &self.name.before
    }

    fn lead_mut(&mut self) -> &mut String {
        &mut self.name.before
    }

    fn breaks_line(&self) -> bool {
        [
            &self.name.before,
            &self.name.after,
            &self.value.before,
            &self.value.after,
        ]
        .iter()
        .any(|extra| extra.contains('\n'))
    }

    fn write_to(&self, out: &mut String) {
        self.name.write_to(out);
        out.push(':');
        self.value.write_to(out);
    }
}

impl Entry for Element {
    const EXPANDS_WHEN_EMPTY: bool = false;

    fn lead(&self) -> &str {
        &self.before
    }

    fn lead_mut(&mut self) -> &mut String {
        &mut self.before
    }

    fn breaks_line(&self) -> bool {
        self.before.contains('\n') || self.after.contains('\n')
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.before);
        match &self.node {
            Node::Literal(literal) => out.push_str(&literal.raw),
            Node::Object(object) => object.write_to(out, '{', '}'),
            Node::Array(array) => array.write_to(out, '[', ']'),
        }
        out.push_str(&self.after);
    }
}

impl<T: Entry> Delimited<T> {
    /// A container is laid out one entry per line when any of its own
    /// extras contains a line break.
    pub fn is_multiline(&self) -> bool {
        self.trailing.contains('\n') || self.items.iter().any(Entry::breaks_line)
    }

    fn write_to(&self, out: &mut String, open: char, close: char) {
        out.push(open);
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            item.write_to(out);
        }
        if self.trailing_comma && !self.items.is_empty() {
            out.push(',');
        }
        out.push_str(&self.trailing);
        out.push(close);
    }
}

impl Literal {
    pub const fn parsed(raw: String, value: Value) -> Self {
        Self { raw, value }
    }

    /// A literal rendered in canonical JSON form.
    pub fn from_value(value: Value) -> Self {
        Self {
            raw: value.to_string(),
            value,
        }
    }
}

impl Member {
    pub fn new(key: &str, lead: String, value: Element) -> Self {
        Self {
            key: key.to_string(),
            name: Element::bare(Node::Literal(Literal::from_value(Value::String(
                key.to_string(),
            )))),
            value,
        }
        .with_lead(lead)
    }

    fn with_lead(mut self, lead: String) -> Self {
        self.name.before = lead;
        self
    }
}

impl Node {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Literal(Literal { value: Value::Null, .. }))
    }

    /// Builds a node for `value` placed at nesting `depth`.
    ///
    /// Non-empty objects, and arrays holding non-empty containers, are laid
    /// out one entry per line; other arrays stay on one line.
    pub fn build(value: &Value, depth: usize, indent: &str) -> Self {
        match value {
            Value::Object(map) if !map.is_empty() => Self::Object(Delimited {
                items: map
                    .iter()
                    .map(|(key, child)| {
                        let mut value = Element::bare(Self::build(child, depth + 1, indent));
                        value.before.push(' ');
                        Member::new(key, line_break(depth + 1, indent), value)
                    })
                    .collect(),
                trailing: line_break(depth, indent),
                trailing_comma: false,
            }),
            Value::Array(items) if items.iter().any(is_filled_container) => {
                Self::Array(Delimited {
                    items: items
                        .iter()
                        .map(|item| {
                            let mut element = Element::bare(Self::build(item, depth + 1, indent));
                            element.before = line_break(depth + 1, indent);
                            element
                        })
                        .collect(),
                    trailing: line_break(depth, indent),
                    trailing_comma: false,
                })
            }
            Value::Array(items) => Self::Array(Delimited {
                items: items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let mut element = Element::bare(Self::build(item, depth + 1, indent));
                        if i > 0 {
                            element.before.push(' ');
                        }
                        element
                    })
                    .collect(),
                ..Delimited::default()
            }),
            Value::Object(_) => Self::Object(Delimited::default()),
            scalar => Self::Literal(Literal::from_value(scalar.clone())),
        }
    }

    /// The canonical value with comments and layout dropped.
    ///
    /// When a name repeats, the last member wins.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(literal) => literal.value.clone(),
            Self::Object(object) => Value::Object(
                object
                    .items
                    .iter()
                    .map(|member| (member.key.clone(), member.value.node.to_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Array(array) => Value::Array(
                array
                    .items
                    .iter()
                    .map(|element| element.node.to_value())
                    .collect(),
            ),
        }
    }
}

impl Element {
    pub const fn bare(node: Node) -> Self {
        Self {
            before: String::new(),
            node,
            after: String::new(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

fn is_filled_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

/// A newline followed by `depth` indent units.
pub fn line_break(depth: usize, indent: &str) -> String {
    let mut out = String::with_capacity(1 + depth * indent.len());
    out.push('\n');
    for _ in 0..depth {
        out.push_str(indent);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_scalar() {
        let element = Element::bare(Node::build(&json!("a\"b"), 0, "  "));
        assert_eq!(element.render(), r#""a\"b""#);
    }

    #[test]
    fn test_build_object_layout() {
        let element = Element::bare(Node::build(&json!({"a": 1, "b": {"c": [1, 2]}}), 1, "  "));
        assert_eq!(
            element.render(),
            "{\n    \"a\": 1,\n    \"b\": {\n      \"c\": [1, 2]\n    }\n  }"
        );
    }

    #[test]
    fn test_build_nested_array_layout() {
        let element = Element::bare(Node::build(&json!([{"a": 1}, []]), 0, "\t"));
        assert_eq!(element.render(), "[\n\t{\n\t\t\"a\": 1\n\t},\n\t[]\n]");
    }

    #[test]
    fn test_build_empty_containers() {
        assert_eq!(Element::bare(Node::build(&json!({}), 3, "  ")).render(), "{}");
        assert_eq!(Element::bare(Node::build(&json!([]), 3, "  ")).render(), "[]");
    }

    #[test]
    fn test_to_value_last_duplicate_wins() {
        let object = Node::Object(Delimited {
            items: vec![
                Member::new("a", String::new(), Element::bare(Node::build(&json!(1), 1, ""))),
                Member::new("a", String::new(), Element::bare(Node::build(&json!(2), 1, ""))),
            ],
            ..Delimited::default()
        });
        assert_eq!(object.to_value(), json!({"a": 2}));
    }

    #[test]
    fn test_line_break() {
        assert_eq!(line_break(0, "  "), "\n");
        assert_eq!(line_break(2, "\t"), "\n\t\t");
    }
}
