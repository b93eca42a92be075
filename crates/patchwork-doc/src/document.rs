// SPDX-License-Identifier: MIT OR Apache-2.0
//! The live, format-preserving document.

use std::fmt;
use std::str::FromStr;

use patchwork_core::{PatchOperation, unmarshal_operations};
use serde_json::Value;

use crate::edit::apply_operation;
use crate::error::{ApplyError, ParseError, ParseErrorKind};
use crate::layout::{detect_indent, format};
use crate::node::Element;
use crate::parse::parse;

/// A parsed JSON or JSONC document that remembers its comments and layout.
///
/// # Examples
///
/// ```
/// use patchwork_core::PatchOperation;
/// use patchwork_doc::Document;
/// use serde_json::json;
///
/// let mut doc = Document::parse(b"{\n  // listen port\n  \"port\": 80\n}\n").unwrap();
/// assert_eq!(doc.standardize(), json!({"port": 80}));
///
/// doc.apply(&[PatchOperation::replace("/port", json!(8080))]).unwrap();
/// assert_eq!(doc.render(), "{\n  // listen port\n  \"port\": 8080\n}\n");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Element,
    indent: String,
}

impl Document {
    /// Parses UTF-8 JSON or JSONC.
    ///
    /// # Errors
    ///
    /// Returns the position and kind of the first syntax error.
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let source = std::str::from_utf8(bytes).map_err(|e| {
            let valid = String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned();
            ParseError::at(&valid, valid.len(), ParseErrorKind::InvalidUtf8)
        })?;
        Self::parse_str(source)
    }

    /// Parses JSON or JSONC text.
    ///
    /// # Errors
    ///
    /// Returns the position and kind of the first syntax error.
    pub fn parse_str(source: &str) -> Result<Self, ParseError> {
        let root = parse(source)?;
        Ok(Self {
            root,
            indent: detect_indent(source),
        })
    }

    /// The indent unit used for new and re-indented lines.
    #[must_use]
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// The canonical value, without comments or layout.
    #[must_use]
    pub fn standardize(&self) -> Value {
        self.root.node.to_value()
    }

    /// Compact canonical JSON bytes of [`Self::standardize`].
    #[must_use]
    pub fn pack(&self) -> Vec<u8> {
        self.standardize().to_string().into_bytes()
    }

    /// Applies operations in order.
    ///
    /// Either every operation applies or the document is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the failure of the first operation that cannot be applied.
    pub fn apply(&mut self, operations: &[PatchOperation]) -> Result<(), ApplyError> {
        let mut root = self.root.clone();
        for op in operations {
            apply_operation(&mut root, op, &self.indent)?;
        }
        self.root = root;
        Ok(())
    }

    /// Applies a JSON Patch given as JSON text.
    ///
    /// # Errors
    ///
    /// Fails when the text is not a patch array or an operation cannot be
    /// applied.
    pub fn apply_patch(&mut self, operations: &[u8]) -> Result<(), ApplyError> {
        let operations =
            unmarshal_operations(operations).map_err(|e| ApplyError::Malformed(e.to_string()))?;
        self.apply(&operations)
    }

    /// Re-indents multi-line objects and arrays with the document's indent
    /// unit, keeping every comment.
    pub fn format(&mut self) {
        format(&mut self.root, &self.indent);
    }

    /// The document text.
    #[must_use]
    pub fn render(&self) -> String {
        self.root.render()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_core::marshal_operations;
    use patchwork_diff::{deep_diff, json_diff, merge};
    use proptest::prelude::*;
    use serde_json::json;

    const CONFIG: &str = r#"// service settings
{
    "name": "api", // shown in logs
    /* network */
    "net": {
        "port": 80,
        "hosts": ["a", "b",],
    },
    "debug": false
}
"#;

    #[test]
    fn test_render_is_exact() {
        let doc = Document::parse(CONFIG.as_bytes()).unwrap();
        assert_eq!(doc.render(), CONFIG);
        assert_eq!(doc.to_string(), CONFIG);
        assert_eq!(doc.indent(), "    ");
    }

    #[test]
    fn test_standardize_and_pack() {
        let doc: Document = CONFIG.parse().unwrap();
        let expected = json!({"name": "api", "net": {"port": 80, "hosts": ["a", "b"]}, "debug": false});
        assert_eq!(doc.standardize(), expected);
        assert_eq!(
            doc.pack(),
            br#"{"name":"api","net":{"port":80,"hosts":["a","b"]},"debug":false}"#
        );
    }

    #[test]
    fn test_merge_pipeline_keeps_comments() {
        let mut doc = Document::parse(CONFIG.as_bytes()).unwrap();
        let original = doc.standardize();
        let merged = merge(&original, &json!({"net": {"port": 8080}, "debug": null})).unwrap();
        let ops = marshal_operations(&json_diff(&original, &merged)).unwrap();
        doc.apply_patch(&ops).unwrap();
        doc.format();
        assert_eq!(
            doc.render(),
            r#"// service settings
{
    "name": "api", // shown in logs
    /* network */
    "net": {
        "port": 8080,
        "hosts": ["a", "b"],
    },
    "debug": null
}"#
        );
    }

    #[test]
    fn test_deep_diff_pipeline() {
        let mut doc = Document::parse(CONFIG.as_bytes()).unwrap();
        let patch = json!({"debug": null, "net": {"tls": {"cert": "c.pem"}}});
        let ops = deep_diff(&doc.standardize(), &patch);
        doc.apply(&ops).unwrap();
        assert_eq!(
            doc.standardize(),
            json!({"name": "api", "net": {"port": 80, "hosts": ["a", "b"], "tls": {"cert": "c.pem"}}})
        );
        assert!(doc.render().contains("// shown in logs"));
        assert!(doc.render().contains("\"tls\": {\n            \"cert\": \"c.pem\"\n        }"));
    }

    #[test]
    fn test_apply_is_all_or_nothing() {
        let mut doc = Document::parse(br#"{"a": 1}"#).unwrap();
        let before = doc.clone();
        let err = doc
            .apply(&[
                PatchOperation::replace("/a", json!(2)),
                PatchOperation::remove("/missing"),
            ])
            .unwrap_err();
        assert_eq!(err, ApplyError::NotFound { path: "/missing".into() });
        assert_eq!(doc, before);
    }

    #[test]
    fn test_malformed_operations() {
        let mut doc = Document::parse(b"{}").unwrap();
        assert!(matches!(
            doc.apply_patch(br#"{"op": "add"}"#),
            Err(ApplyError::Malformed(_))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = Document::parse(b"{\"a\":\n \"\xff\"}").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUtf8);
        assert_eq!((err.line, err.column), (2, 3));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z\\\\\"/ ]{0,6}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 5, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(("[a-z~/]{1,4}", inner), 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_parse_standardize_matches_serde(value in arb_json()) {
            let compact = Document::parse_str(&value.to_string()).unwrap();
            prop_assert_eq!(compact.standardize(), value.clone());
            let pretty = serde_json::to_string_pretty(&value).unwrap();
            let doc = Document::parse_str(&pretty).unwrap();
            prop_assert_eq!(doc.render(), pretty);
            prop_assert_eq!(doc.standardize(), value);
        }

        #[test]
        fn prop_structural_ops_apply_to_document(a in arb_json(), b in arb_json()) {
            let pretty = serde_json::to_string_pretty(&a).unwrap();
            let mut doc = Document::parse_str(&pretty).unwrap();
            doc.apply(&json_diff(&a, &b)).unwrap();
            prop_assert_eq!(doc.standardize(), b.clone());
            doc.format();
            prop_assert_eq!(doc.standardize(), b);
        }
    }
}
