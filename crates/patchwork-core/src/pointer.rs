// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON Pointer (RFC 6901) helpers.
//!
//! Paths are built top-down while walking a tree, one escaped segment at a
//! time, so the hot path is [`child_path`]. Parsing is only needed when an
//! operation is applied.

use std::borrow::Cow;

use crate::error::{PointerError, Result};

/// Escapes a single reference token.
///
/// `~` is escaped before `/` so a literal `~1` in a key becomes `~01`
/// rather than being read back as `/`.
#[must_use]
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if !segment.contains(['~', '/']) {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
}

/// Unescapes a single reference token.
///
/// # Errors
///
/// Returns [`PointerError::InvalidEscape`] when `~` is followed by anything
/// other than `0` or `1`.
pub fn unescape_segment(segment: &str) -> Result<Cow<'_, str>> {
    if !segment.contains('~') {
        return Ok(Cow::Borrowed(segment));
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '0')) => out.push('~'),
            Some((_, '1')) => out.push('/'),
            _ => {
                return Err(PointerError::InvalidEscape {
                    pointer: segment.to_string(),
                    offset,
                });
            }
        }
    }
    Ok(Cow::Owned(out))
}

/// Appends an escaped key to an already-escaped parent path.
#[must_use]
pub fn child_path(parent: &str, key: &str) -> String {
    let escaped = escape_segment(key);
    let mut path = String::with_capacity(parent.len() + escaped.len() + 1);
    path.push_str(parent);
    path.push('/');
    path.push_str(&escaped);
    path
}

/// Splits a pointer into unescaped reference tokens.
///
/// The empty pointer addresses the root and yields no tokens.
///
/// # Errors
///
/// Returns an error if the pointer is non-empty and lacks the leading `/`,
/// or contains an invalid escape.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PointerError::MissingLeadingSlash {
            pointer: pointer.to_string(),
        });
    };
    let mut tokens = Vec::new();
    let mut start = 1;
    for token in rest.split('/') {
        let unescaped = unescape_segment(token).map_err(|err| match err {
            PointerError::InvalidEscape { offset, .. } => PointerError::InvalidEscape {
                pointer: pointer.to_string(),
                offset: start + offset,
            },
            other => other,
        })?;
        tokens.push(unescaped.into_owned());
        start += token.len() + 1;
    }
    Ok(tokens)
}

/// Joins unescaped reference tokens into a pointer.
#[must_use]
pub fn format_pointer<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .fold(String::new(), |path, segment| child_path(&path, segment.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_escape_segment() {
        assert_eq!(escape_segment("plain"), "plain");
        assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
        assert_eq!(escape_segment("~1"), "~01");
        assert!(matches!(escape_segment("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("", "a"), "/a");
        assert_eq!(child_path("/a", "b/c"), "/a/b~1c");
        assert_eq!(child_path("", ""), "/");
    }

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("").unwrap(), Vec::<String>::new());
        assert_eq!(parse_pointer("/").unwrap(), vec![String::new()]);
        assert_eq!(parse_pointer("/a~1b/c~0d").unwrap(), vec!["a/b", "c~d"]);
        assert_eq!(parse_pointer("/~01").unwrap(), vec!["~1"]);
    }

    #[test]
    fn test_parse_pointer_errors() {
        assert!(matches!(
            parse_pointer("a/b"),
            Err(PointerError::MissingLeadingSlash { .. })
        ));
        assert!(matches!(
            parse_pointer("/a~2"),
            Err(PointerError::InvalidEscape { .. })
        ));
        assert!(matches!(
            parse_pointer("/trailing~"),
            Err(PointerError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn test_format_pointer() {
        assert_eq!(format_pointer(Vec::<String>::new()), "");
        assert_eq!(format_pointer(["a/b", "c"]), "/a~1b/c");
    }

    proptest! {
        #[test]
        fn escaped_keys_survive_parsing(keys in prop::collection::vec(".*", 0..6)) {
            let pointer = format_pointer(&keys);
            prop_assert_eq!(parse_pointer(&pointer).unwrap(), keys);
        }
    }
}
