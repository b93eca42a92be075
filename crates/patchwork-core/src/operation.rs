// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON Patch operation values.
//!
//! Only the three structural operations are modelled. Anything else in an
//! incoming patch (`move`, `copy`, `test`) fails to deserialize.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single RFC 6902 operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    /// Insert a value at a path, replacing any existing object member
    Add {
        /// Target location
        path: String,
        /// Value to insert
        value: Value,
    },
    /// Delete the value at a path
    Remove {
        /// Target location
        path: String,
    },
    /// Overwrite the existing value at a path
    Replace {
        /// Target location
        path: String,
        /// Replacement value
        value: Value,
    },
}

/// Discriminant of a [`PatchOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `add`
    Add,
    /// `remove`
    Remove,
    /// `replace`
    Replace,
}

impl OpKind {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PatchOperation {
    /// Builds an `add` operation.
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self::Add {
            path: path.into(),
            value,
        }
    }

    /// Builds a `remove` operation.
    pub fn remove(path: impl Into<String>) -> Self {
        Self::Remove { path: path.into() }
    }

    /// Builds a `replace` operation.
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self::Replace {
            path: path.into(),
            value,
        }
    }

    /// The operation kind.
    #[must_use]
    pub const fn kind(&self) -> OpKind {
        match self {
            Self::Add { .. } => OpKind::Add,
            Self::Remove { .. } => OpKind::Remove,
            Self::Replace { .. } => OpKind::Replace,
        }
    }

    /// The target pointer.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. } | Self::Remove { path } | Self::Replace { path, .. } => path,
        }
    }

    /// The carried value, absent for `remove`.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Add { value, .. } | Self::Replace { value, .. } => Some(value),
            Self::Remove { .. } => None,
        }
    }
}

/// Serializes operations as an indented JSON Patch array.
///
/// # Errors
///
/// Returns the serializer error; with `serde_json::Value` payloads this only
/// happens on writer failure, which cannot occur for an in-memory buffer.
pub fn marshal_operations(operations: &[PatchOperation]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    operations.serialize(&mut ser)?;
    Ok(buf)
}

/// Parses a JSON Patch array.
///
/// # Errors
///
/// Fails on malformed JSON or on any operation other than add/remove/replace.
pub fn unmarshal_operations(bytes: &[u8]) -> serde_json::Result<Vec<PatchOperation>> {
    serde_json::from_slice(bytes)
}
