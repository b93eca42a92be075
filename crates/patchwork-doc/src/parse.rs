// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lossless JSONC parser.
//!
//! Accepts standard JSON plus `//` and `/* */` comments and a trailing comma
//! in objects and arrays. Scalars keep their source text; strings and numbers
//! are validated by decoding that text with `serde_json`.

use memchr::{memchr, memmem};
use serde_json::Value;

use crate::error::{ParseError, ParseErrorKind};
use crate::node::{Delimited, Element, Literal, Member, Node};

/// Maximum container nesting.
pub const MAX_DEPTH: usize = 128;

/// Parses `source` into an element tree that renders back byte for byte.
pub fn parse(source: &str) -> Result<Element, ParseError> {
    let mut parser = Parser {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let root = parser.element()?;
    if parser.pos < parser.bytes.len() {
        return Err(parser.error(ParseErrorKind::TrailingContent));
    }
    Ok(root)
}

struct Parser<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.source, self.pos, kind)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn unexpected(&self) -> ParseError {
        match self.source[self.pos..].chars().next() {
            Some(c) => self.error(ParseErrorKind::UnexpectedChar(c)),
            None => self.error(ParseErrorKind::UnexpectedEof),
        }
    }

    /// Consumes whitespace and comments.
    fn extra(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\n' | b'\r') => self.pos += 1,
                Some(b'/') => match self.bytes.get(self.pos + 1) {
                    // The newline ending a line comment belongs to the whitespace.
                    Some(b'/') => {
                        self.pos = memchr(b'\n', &self.bytes[self.pos..])
                            .map_or(self.bytes.len(), |i| self.pos + i);
                    }
                    Some(b'*') => match memmem::find(&self.bytes[self.pos + 2..], b"*/") {
                        Some(i) => self.pos += i + 4,
                        None => return Err(self.error(ParseErrorKind::UnterminatedComment)),
                    },
                    _ => return Err(self.unexpected()),
                },
                _ => break,
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn element(&mut self) -> Result<Element, ParseError> {
        let before = self.extra()?;
        let node = self.node()?;
        let after = self.extra()?;
        Ok(Element {
            before,
            node,
            after,
        })
    }

    fn node(&mut self) -> Result<Node, ParseError> {
        match self.peek() {
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => {
                let (raw, decoded) = self.string()?;
                Ok(Node::Literal(Literal::parsed(raw, Value::String(decoded))))
            }
            Some(b'-' | b'0'..=b'9') => self.number(),
            Some(b't') => self.keyword("true", Value::Bool(true)),
            Some(b'f') => self.keyword("false", Value::Bool(false)),
            Some(b'n') => self.keyword("null", Value::Null),
            _ => Err(self.unexpected()),
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.pos += 1;
        Ok(())
    }

    fn object(&mut self) -> Result<Node, ParseError> {
        self.enter()?;
        let mut object = Delimited::default();
        let mut pending = self.extra()?;
        loop {
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    object.trailing = pending;
                    break;
                }
                Some(b'"') => {}
                None => return Err(self.error(ParseErrorKind::UnexpectedEof)),
                Some(_) => return Err(self.error(ParseErrorKind::ExpectedName)),
            }

            let (raw, key) = self.string()?;
            let name = Element {
                before: pending,
                node: Node::Literal(Literal::parsed(raw, Value::String(key.clone()))),
                after: self.extra()?,
            };
            if self.peek() != Some(b':') {
                return Err(self.unexpected());
            }
            self.pos += 1;
            let mut value = self.element()?;

            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    object.items.push(Member { key, name, value });
                    pending = self.extra()?;
                    object.trailing_comma = self.peek() == Some(b'}');
                }
                Some(b'}') => {
                    self.pos += 1;
                    object.trailing = std::mem::take(&mut value.after);
                    object.items.push(Member { key, name, value });
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        self.depth -= 1;
        Ok(Node::Object(object))
    }

    fn array(&mut self) -> Result<Node, ParseError> {
        self.enter()?;
        let mut array = Delimited::default();
        let mut pending = self.extra()?;
        loop {
            if self.peek() == Some(b']') {
                self.pos += 1;
                array.trailing = pending;
                break;
            }

            let node = self.node()?;
            let mut element = Element {
                before: pending,
                node,
                after: self.extra()?,
            };

            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    array.items.push(element);
                    pending = self.extra()?;
                    array.trailing_comma = self.peek() == Some(b']');
                }
                Some(b']') => {
                    self.pos += 1;
                    array.trailing = std::mem::take(&mut element.after);
                    array.items.push(element);
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        self.depth -= 1;
        Ok(Node::Array(array))
    }

    /// Returns the raw literal and its decoded text.
    fn string(&mut self) -> Result<(String, String), ParseError> {
        let start = self.pos;
        let mut end = start + 1;
        loop {
            match self.bytes.get(end) {
                None => {
                    return Err(ParseError::at(
                        self.source,
                        end,
                        ParseErrorKind::UnexpectedEof,
                    ));
                }
                Some(b'"') => break,
                Some(b'\\') => end += 2,
                Some(b'\n') => {
                    return Err(ParseError::at(
                        self.source,
                        end,
                        ParseErrorKind::InvalidString("unescaped line break".into()),
                    ));
                }
                Some(_) => end += 1,
            }
        }
        let raw = &self.source[start..=end];
        let decoded: String = serde_json::from_str(raw).map_err(|e| {
            ParseError::at(
                self.source,
                start,
                ParseErrorKind::InvalidString(e.to_string()),
            )
        })?;
        self.pos = end + 1;
        Ok((raw.to_string(), decoded))
    }

    fn number(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        let digits = |bytes: &[u8], mut i: usize| {
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            i
        };

        let mut end = start;
        if self.bytes[end] == b'-' {
            end += 1;
        }
        let mut valid = match self.bytes.get(end) {
            Some(b'0') => {
                end += 1;
                true
            }
            Some(b'1'..=b'9') => {
                end = digits(self.bytes, end);
                true
            }
            _ => false,
        };
        if valid && self.bytes.get(end) == Some(&b'.') {
            let fraction = digits(self.bytes, end + 1);
            valid = fraction > end + 1;
            end = fraction;
        }
        if valid && matches!(self.bytes.get(end), Some(b'e' | b'E')) {
            end += 1;
            if matches!(self.bytes.get(end), Some(b'+' | b'-')) {
                end += 1;
            }
            let exponent = digits(self.bytes, end);
            valid = exponent > end;
            end = exponent;
        }

        let raw = &self.source[start..end];
        let invalid = || ParseError::at(self.source, start, ParseErrorKind::InvalidNumber(raw.into()));
        if !valid {
            return Err(invalid());
        }
        let value: Value = serde_json::from_str(raw).map_err(|_| invalid())?;
        self.pos = end;
        Ok(Node::Literal(Literal::parsed(raw.to_string(), value)))
    }

    fn keyword(&mut self, word: &str, value: Value) -> Result<Node, ParseError> {
        if !self.source[self.pos..].starts_with(word) {
            return Err(self.unexpected());
        }
        self.pos += word.len();
        Ok(Node::Literal(Literal::parsed(word.to_string(), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(source: &str) {
        let root = parse(source).unwrap();
        assert_eq!(root.render(), source);
    }

    #[test]
    fn test_round_trip_plain() {
        round_trip("{}");
        round_trip("[]");
        round_trip(" 42 ");
        round_trip(r#"{"a": 1, "b": [true, false, null], "c": "s"}"#);
        round_trip("{\n  \"a\": {\n    \"b\": -1.5e+3\n  }\n}\n");
    }

    #[test]
    fn test_round_trip_comments_and_commas() {
        round_trip(
            "// header\n{\n  /* lead */ \"a\" /* n */ : /* v */ 1, // tail\n  \"b\": [1, 2,],\n}\n// footer\n",
        );
        round_trip("[ // open\n  1,\n  2 // last\n]");
    }

    #[test]
    fn test_trailing_extra_moves_to_container() {
        let root = parse("[1 , 2 ]").unwrap();
        let Node::Array(array) = &root.node else {
            panic!("expected array");
        };
        assert_eq!(array.items[0].after, " ");
        assert_eq!(array.items[1].after, "");
        assert_eq!(array.trailing, " ");
        assert!(!array.trailing_comma);
    }

    #[test]
    fn test_trailing_comma_flag() {
        let root = parse("{\"a\": 1, }").unwrap();
        let Node::Object(object) = &root.node else {
            panic!("expected object");
        };
        assert!(object.trailing_comma);
        assert_eq!(object.trailing, " ");
        assert_eq!(root.node.to_value(), json!({"a": 1}));
    }

    #[test]
    fn test_values_decoded() {
        let root = parse(r#"{"A": "\n", "n": 1.0, "big": 12345678901234567890}"#).unwrap();
        let value = root.node.to_value();
        assert_eq!(value["A"], json!("\n"));
        assert_eq!(value["n"], json!(1.0));
        assert!(value["big"].is_number());
    }

    #[test]
    fn test_errors() {
        let cases = [
            ("", ParseErrorKind::UnexpectedEof),
            ("{", ParseErrorKind::UnexpectedEof),
            ("{a: 1}", ParseErrorKind::ExpectedName),
            ("{,}", ParseErrorKind::ExpectedName),
            ("[1,,2]", ParseErrorKind::UnexpectedChar(',')),
            ("[1 2]", ParseErrorKind::UnexpectedChar('2')),
            ("tru", ParseErrorKind::UnexpectedChar('t')),
            ("01", ParseErrorKind::TrailingContent),
            ("1.", ParseErrorKind::InvalidNumber("1.".into())),
            ("-", ParseErrorKind::InvalidNumber("-".into())),
            ("/* open", ParseErrorKind::UnterminatedComment),
            ("1 / 2", ParseErrorKind::UnexpectedChar('/')),
            ("{} {}", ParseErrorKind::TrailingContent),
        ];
        for (source, kind) in cases {
            assert_eq!(parse(source).unwrap_err().kind, kind, "{source:?}");
        }
    }

    #[test]
    fn test_invalid_string() {
        let err = parse("[\"a\\q\"]").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidString(_)));
        assert_eq!((err.line, err.column), (1, 2));

        let err = parse("\"a\nb\"").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1);
        assert_eq!(
            parse(&deep).unwrap_err().kind,
            ParseErrorKind::TooDeep(MAX_DEPTH)
        );
        let ok = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        round_trip(&ok);
    }
}
