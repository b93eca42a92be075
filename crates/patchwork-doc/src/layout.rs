// SPDX-License-Identifier: MIT OR Apache-2.0
//! Whitespace and comment handling: indentation detection, the gaps left or
//! needed by edits, and the canonical re-indentation pass.

use memchr::memchr;

use crate::node::{Delimited, Element, Entry, Member, Node, line_break};

/// Indent unit used when the source has no indented lines.
pub const DEFAULT_INDENT: &str = "  ";

/// Returns the first run of spaces or tabs that starts a non-blank line.
pub fn detect_indent(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut pos = 0;
    while let Some(offset) = memchr(b'\n', &bytes[pos..]) {
        let start = pos + offset + 1;
        let end = start
            + bytes[start..]
                .iter()
                .take_while(|&&b| b == b' ' || b == b'\t')
                .count();
        if end > start && !matches!(bytes.get(end), None | Some(b'\n' | b'\r')) {
            return source[start..end].to_string();
        }
        pos = start;
    }
    DEFAULT_INDENT.to_string()
}

pub fn is_blank(extra: &str) -> bool {
    extra.bytes().all(|b| b.is_ascii_whitespace())
}

/// A comment found in an extra.
struct Comment<'a> {
    text: &'a str,
    /// A line break separates the comment from what precedes it.
    own_line: bool,
    /// Byte offset just past the comment.
    end: usize,
}

/// Splits an extra into its comments, also reporting whether a line break
/// follows the last comment (or, with no comments, appears at all).
fn comments(extra: &str) -> (Vec<Comment<'_>>, bool) {
    let mut found = Vec::new();
    let mut line_break = false;
    let mut rest = extra;
    loop {
        let trimmed = rest.trim_start();
        line_break |= rest[..rest.len() - trimmed.len()].contains('\n');
        rest = trimmed;
        let len = if rest.starts_with("//") {
            memchr(b'\n', rest.as_bytes()).unwrap_or(rest.len())
        } else if rest.starts_with("/*") {
            rest[2..].find("*/").map_or(rest.len(), |i| i + 4)
        } else {
            break;
        };
        rest = &rest[len..];
        found.push(Comment {
            text: &trimmed[..len],
            own_line: line_break,
            end: extra.len() - rest.len(),
        });
        line_break = false;
    }
    (found, line_break)
}

/// The whitespace after the last comment of an extra.
fn layout_tail(extra: &str) -> &str {
    let (found, _) = comments(extra);
    found.last().map_or(extra, |last| &extra[last.end..])
}

/// Comments on the same line as the preceding token, which stay with that
/// token when the entry owning the extra is removed.
fn hanging_comment(extra: &str) -> &str {
    match extra.find('\n') {
        Some(nl) if !is_blank(&extra[..nl]) => &extra[..nl],
        _ => "",
    }
}

/// `"\n"` plus the indentation of the line an entry starts on.
fn indentation_of(lead: &str) -> Option<String> {
    lead.rfind('\n').map(|nl| {
        let tail = &lead[nl..];
        let width = tail[1..]
            .bytes()
            .take_while(|&b| b == b' ' || b == b'\t')
            .count();
        tail[..=width].to_string()
    })
}

impl<T: Entry> Delimited<T> {
    /// Inserts an entry at `index`, giving it a lead that fits the
    /// container's layout. `depth` is the container's nesting depth.
    pub fn insert_with(
        &mut self,
        index: usize,
        depth: usize,
        indent: &str,
        build: impl FnOnce(String) -> T,
    ) {
        let len = self.items.len();
        let lead = if len == 0 {
            if T::EXPANDS_WHEN_EMPTY {
                if is_blank(&self.trailing) {
                    self.trailing = line_break(depth, indent);
                }
                line_break(depth + 1, indent)
            } else {
                String::new()
            }
        } else if self.is_multiline() {
            let neighbour = self.items[index.min(len - 1)].lead();
            let indentation =
                indentation_of(neighbour).unwrap_or_else(|| line_break(depth + 1, indent));
            if index == len {
                match self.trailing.find('\n') {
                    Some(nl) => {
                        let hanging = self.trailing[..nl].trim_end().to_string();
                        self.trailing.replace_range(..nl, "");
                        hanging + &indentation
                    }
                    None => indentation,
                }
            } else {
                indentation
            }
        } else if index == 0 {
            let first = self.items[0].lead_mut();
            let lead = std::mem::take(first);
            first.push(' ');
            lead
        } else {
            " ".to_string()
        };
        self.items.insert(index, build(lead));
    }

    /// Removes the entry at `index` together with the comment on its own
    /// line, keeping comments that hang off the previous line and collapsing
    /// a container left empty.
    pub fn remove_at(&mut self, index: usize) -> T {
        let removed = self.items.remove(index);
        let lead = removed.lead();
        let hanging = hanging_comment(lead);
        let has_next = index < self.items.len();
        let following = match self.items.get_mut(index) {
            Some(next) => next.lead_mut(),
            None => &mut self.trailing,
        };
        let own = hanging_comment(following).len();
        following.replace_range(..own, "");
        if has_next && index == 0 && is_blank(following) {
            *following = format!("{hanging}{}", layout_tail(lead));
        } else {
            following.insert_str(0, hanging);
        }
        if self.items.is_empty() && is_blank(&self.trailing) {
            self.trailing.clear();
            self.trailing_comma = false;
        }
        removed
    }
}

/// Re-indents `root` with `indent`, keeping every comment.
///
/// Multi-line containers get one entry per line at `depth + 1` units and
/// their closing delimiter at `depth`. Single-line containers get one space
/// after each comma.
pub fn format(root: &mut Element, indent: &str) {
    if is_blank(&root.before) {
        root.before.clear();
    }
    if is_blank(&root.after) {
        root.after.clear();
    } else {
        root.after.truncate(root.after.trim_end().len());
    }
    format_node(&mut root.node, 0, indent);
}

/// Normalizes the extras inside an entry and descends into its value.
trait Tidy {
    fn tidy(&mut self, depth: usize, indent: &str);
}

impl Tidy for Member {
    fn tidy(&mut self, depth: usize, indent: &str) {
        inline_gap(&mut self.name.after, "");
        inline_gap(&mut self.value.before, " ");
        inline_gap(&mut self.value.after, "");
        format_node(&mut self.value.node, depth, indent);
    }
}

impl Tidy for Element {
    fn tidy(&mut self, depth: usize, indent: &str) {
        inline_gap(&mut self.after, "");
        format_node(&mut self.node, depth, indent);
    }
}

fn format_node(node: &mut Node, depth: usize, indent: &str) {
    match node {
        Node::Literal(_) => {}
        Node::Object(object) => format_delimited(object, depth, indent),
        Node::Array(array) => format_delimited(array, depth, indent),
    }
}

fn format_delimited<T: Entry + Tidy>(seq: &mut Delimited<T>, depth: usize, indent: &str) {
    let multiline = seq.is_multiline();
    for (i, item) in seq.items.iter_mut().enumerate() {
        let lead = item.lead_mut();
        if multiline {
            *lead = reindent(lead, depth + 1, depth + 1, indent);
        } else {
            inline_gap(lead, if i == 0 { "" } else { " " });
        }
        item.tidy(depth + 1, indent);
    }
    if multiline {
        seq.trailing = if seq.items.is_empty() && is_blank(&seq.trailing) {
            String::new()
        } else {
            reindent(&seq.trailing, depth + 1, depth, indent)
        };
    } else {
        inline_gap(&mut seq.trailing, "");
        seq.trailing_comma = false;
    }
}

fn inline_gap(extra: &mut String, replacement: &str) {
    if is_blank(extra) {
        replacement.clone_into(extra);
    }
}

/// Rewrites an extra so each comment that started a line starts a line at
/// `comment_depth`, and the extra ends with a line break to `final_depth`.
fn reindent(extra: &str, comment_depth: usize, final_depth: usize, indent: &str) -> String {
    let (found, _) = comments(extra);
    let mut out = String::new();
    for comment in &found {
        if comment.own_line {
            out.push_str(&line_break(comment_depth, indent));
        } else {
            out.push(' ');
        }
        out.push_str(comment.text);
    }
    out.push_str(&line_break(final_depth, indent));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn formatted(source: &str, indent: &str) -> String {
        let mut root = parse(source).unwrap();
        format(&mut root, indent);
        root.render()
    }

    #[test]
    fn test_detect_indent() {
        assert_eq!(detect_indent("{\n    \"a\": 1\n}"), "    ");
        assert_eq!(detect_indent("{\n\t\"a\": 1\n}"), "\t");
        assert_eq!(detect_indent("{\n   \n  \"a\": 1\n}"), "  ");
        assert_eq!(detect_indent("{\"a\": 1}"), DEFAULT_INDENT);
    }

    #[test]
    fn test_comments_scan() {
        let (found, line_break) = comments(" // a\n  /* b */ ");
        let texts: Vec<_> = found.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["// a", "/* b */"]);
        assert!(!found[0].own_line);
        assert!(found[1].own_line);
        assert!(!line_break);
        assert!(comments("/* a */\n").1);
    }

    #[test]
    fn test_layout_tail_and_hanging() {
        assert_eq!(layout_tail(" // a\n  "), "\n  ");
        assert_eq!(layout_tail("\n  "), "\n  ");
        assert_eq!(hanging_comment(" // a\n  "), " // a");
        assert_eq!(hanging_comment("  \n  "), "");
        assert_eq!(hanging_comment(" /* a */ "), "");
    }

    #[test]
    fn test_indentation_of() {
        assert_eq!(indentation_of("\n    "), Some("\n    ".to_string()));
        assert_eq!(indentation_of(" // c\n\t"), Some("\n\t".to_string()));
        assert_eq!(indentation_of(" "), None);
    }

    #[test]
    fn test_format_reindents() {
        let source = "{\n\"a\":1,\n      \"b\":   {\n \"c\" : [1,2]\n}\n   }";
        assert_eq!(
            formatted(source, "  "),
            "{\n  \"a\": 1,\n  \"b\": {\n    \"c\": [1, 2]\n  }\n}"
        );
    }

    #[test]
    fn test_format_keeps_comments() {
        let source = "// top\n{\n      // lead\n  \"a\": 1, // same line\n        \"b\": 2\n  // end\n}\n";
        assert_eq!(
            formatted(source, "    "),
            "// top\n{\n    // lead\n    \"a\": 1, // same line\n    \"b\": 2\n    // end\n}"
        );
    }

    #[test]
    fn test_format_single_line() {
        assert_eq!(formatted("[1,2 ,  3,]", "  "), "[1, 2, 3]");
        assert_eq!(formatted("{ \"a\":1 }", "  "), "{\"a\": 1}");
    }

    #[test]
    fn test_format_is_stable() {
        let once = formatted("{\n \"a\": [\n1,\n 2\n],\n\"b\": {} // x\n}", "  ");
        assert_eq!(formatted(&once, "  "), once);
    }
}
