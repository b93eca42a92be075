// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deep merge, source wins.
//!
//! Every key of the source overrides or extends the destination. Nested
//! objects merge recursively; any other value in the source (scalars, arrays,
//! and explicit `null`) replaces the destination value outright. Keys present
//! only in the destination are kept.
//!
//! This is not RFC 7396: `null` in the source is stored, not treated as a
//! deletion. The merge is neither commutative nor associative across inputs
//! whose types disagree at a path.

use std::fmt;

use patchwork_core::kind_name;
use serde_json::{Map, Value};
use thiserror::Error;

/// Which input of a merge an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The base document being merged into
    Destination,
    /// The overlay whose keys win
    Source,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Destination => "destination",
            Self::Source => "source",
        })
    }
}

/// Merge failures.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A top-level document was not an object.
    #[error("{side} document must be an object, found {found}")]
    InvalidDocumentShape {
        /// Offending input
        side: Side,
        /// Kind of value found instead
        found: &'static str,
    },

    /// Raw input bytes were not valid JSON.
    #[error("failed to unmarshal {side} JSON: {source}")]
    Unmarshal {
        /// Offending input
        side: Side,
        /// Decoder error
        source: serde_json::Error,
    },

    /// The merged tree could not be encoded.
    #[error("failed to marshal merged JSON: {0}")]
    Marshal(#[source] serde_json::Error),
}

/// Merges `source` onto a copy of `destination`.
///
/// # Errors
///
/// Returns [`MergeError::InvalidDocumentShape`] unless both inputs are objects.
pub fn merge(destination: &Value, source: &Value) -> Result<Value, MergeError> {
    let Value::Object(source_map) = source else {
        return Err(MergeError::InvalidDocumentShape {
            side: Side::Source,
            found: kind_name(source),
        });
    };
    let Value::Object(destination_map) = destination else {
        return Err(MergeError::InvalidDocumentShape {
            side: Side::Destination,
            found: kind_name(destination),
        });
    };
    let mut merged = destination_map.clone();
    merge_into(&mut merged, source_map);
    Ok(Value::Object(merged))
}

fn merge_into(destination: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, source_value) in source {
        match (destination.get_mut(key), source_value) {
            (Some(Value::Object(dest_child)), Value::Object(source_child)) => {
                merge_into(dest_child, source_child);
            }
            (Some(slot), _) => *slot = source_value.clone(),
            (None, _) => {
                destination.insert(key.clone(), source_value.clone());
            }
        }
    }
}

/// Merges raw JSON documents and returns the encoded result.
///
/// # Errors
///
/// Fails if either input does not decode to an object, or on encode failure.
pub fn merge_json(destination: &[u8], source: &[u8]) -> Result<Vec<u8>, MergeError> {
    let destination: Value =
        serde_json::from_slice(destination).map_err(|source| MergeError::Unmarshal {
            side: Side::Destination,
            source,
        })?;
    let source: Value = serde_json::from_slice(source).map_err(|source| MergeError::Unmarshal {
        side: Side::Source,
        source,
    })?;
    let merged = merge(&destination, &source)?;
    serde_json::to_vec(&merged).map_err(MergeError::Marshal)
}

/// Folds several overlays onto a base, left to right.
///
/// # Errors
///
/// Fails on the first overlay that is not an object, or if the base is not one.
pub fn merge_many<'a, I>(base: &Value, overlays: I) -> Result<Value, MergeError>
where
    I: IntoIterator<Item = &'a Value>,
{
    overlays
        .into_iter()
        .try_fold(base.clone(), |acc, overlay| merge(&acc, overlay))
}
