// SPDX-License-Identifier: MIT OR Apache-2.0
//! Applying patch operations to an element tree in place.
//!
//! Replaced values keep the extras around them. Inserted entries copy the
//! layout of their siblings, and `add` creates missing intermediate objects
//! the same way the canonical applier does.

use patchwork_core::{PatchOperation, parse_pointer};
use serde_json::{Map, Value};

use crate::error::ApplyError;
use crate::layout::is_blank;
use crate::node::{Delimited, Element, Member, Node};

pub fn apply_operation(
    root: &mut Element,
    op: &PatchOperation,
    indent: &str,
) -> Result<(), ApplyError> {
    let path = op.path();
    let mut tokens = parse_pointer(path)?;
    let Some(last) = tokens.pop() else {
        root.node = Node::build(op.value().unwrap_or(&Value::Null), 0, indent);
        return Ok(());
    };

    let create = matches!(op, PatchOperation::Add { .. });
    let depth = tokens.len();
    let parent = resolve(root, &tokens, path, create, indent)?;
    let not_found = || ApplyError::NotFound { path: path.into() };

    match (&mut parent.node, op) {
        (Node::Object(object), PatchOperation::Add { value, .. }) => {
            match object.items.iter_mut().rev().find(|m| m.key == last) {
                Some(member) => member.value.node = Node::build(value, depth + 1, indent),
                None => append_member(object, &last, value, depth, indent),
            }
        }
        (Node::Object(object), PatchOperation::Replace { value, .. }) => {
            let member = object
                .items
                .iter_mut()
                .rev()
                .find(|m| m.key == last)
                .ok_or_else(not_found)?;
            member.value.node = Node::build(value, depth + 1, indent);
        }
        (Node::Object(object), PatchOperation::Remove { .. }) => {
            let mut removed = false;
            // Earlier duplicates would resurface, so every member with the name goes.
            while let Some(index) = object.items.iter().rposition(|m| m.key == last) {
                object.remove_at(index);
                removed = true;
            }
            if !removed {
                return Err(not_found());
            }
        }
        (Node::Array(array), PatchOperation::Add { value, .. }) => {
            let index = if last == "-" {
                array.items.len()
            } else {
                array_index(&last, array.items.len() + 1, path)?
            };
            array.insert_with(index, depth, indent, |lead| {
                let mut element = Element::bare(Node::build(value, depth + 1, indent));
                element.before = lead;
                element
            });
        }
        (Node::Array(array), PatchOperation::Replace { value, .. }) => {
            let index = array_index(&last, array.items.len(), path)?;
            array.items[index].node = Node::build(value, depth + 1, indent);
        }
        (Node::Array(array), PatchOperation::Remove { .. }) => {
            let index = array_index(&last, array.items.len(), path)?;
            array.remove_at(index);
        }
        (Node::Literal(_), _) => {
            return Err(ApplyError::NotAContainer {
                path: path.into(),
                segment: last,
            });
        }
    }
    Ok(())
}

fn append_member(
    object: &mut Delimited<Member>,
    key: &str,
    value: &Value,
    depth: usize,
    indent: &str,
) {
    // A comment between a sibling's name and value belongs to that sibling.
    let separator = match object.items.last() {
        Some(member) if is_blank(&member.value.before) => member.value.before.clone(),
        _ => " ".to_string(),
    };
    let index = object.items.len();
    object.insert_with(index, depth, indent, |lead| {
        let mut element = Element::bare(Node::build(value, depth + 1, indent));
        element.before = separator;
        Member::new(key, lead, element)
    });
}

fn resolve<'e>(
    root: &'e mut Element,
    tokens: &[String],
    path: &str,
    create: bool,
    indent: &str,
) -> Result<&'e mut Element, ApplyError> {
    let mut current = root;
    for (depth, token) in tokens.iter().enumerate() {
        if create && current.node.is_null() {
            current.node = Node::Object(Delimited::default());
        }
        current = match &mut current.node {
            Node::Object(object) => match object.items.iter().rposition(|m| m.key == *token) {
                Some(index) => &mut object.items[index].value,
                None if create => {
                    append_member(object, token, &Value::Object(Map::new()), depth, indent);
                    let index = object.items.len() - 1;
                    &mut object.items[index].value
                }
                None => return Err(ApplyError::NotFound { path: path.into() }),
            },
            Node::Array(array) => {
                let index = array_index(token, array.items.len(), path)?;
                &mut array.items[index]
            }
            Node::Literal(_) => {
                return Err(ApplyError::NotAContainer {
                    path: path.into(),
                    segment: token.clone(),
                });
            }
        };
    }
    if create && current.node.is_null() {
        current.node = Node::Object(Delimited::default());
    }
    Ok(current)
}

fn array_index(token: &str, bound: usize, path: &str) -> Result<usize, ApplyError> {
    let invalid = || ApplyError::InvalidIndex {
        path: path.into(),
        segment: token.into(),
    };
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return Err(invalid());
    }
    let index: usize = token.parse().map_err(|_| invalid())?;
    if index < bound { Ok(index) } else { Err(invalid()) }
}
