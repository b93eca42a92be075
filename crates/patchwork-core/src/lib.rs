// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and foundational types for patchwork
//!
//! This crate provides the foundational types shared by the diff engine, the
//! document model, and the CLI:
//!
//! - [`error`] - Error types and Result alias
//! - [`pointer`] - JSON Pointer (RFC 6901) escaping, parsing, and formatting
//! - [`operation`] - JSON Patch (RFC 6902) operation values
//! - [`value`] - Helpers over `serde_json::Value`

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

/// Error types for patchwork operations
pub mod error;
/// JSON Patch operation values
pub mod operation;
/// JSON Pointer parsing and escaping
pub mod pointer;
/// Canonical value helpers
pub mod value;

pub use error::{PointerError, Result};
pub use operation::{OpKind, PatchOperation, marshal_operations, unmarshal_operations};
pub use pointer::{child_path, escape_segment, format_pointer, parse_pointer, unescape_segment};
pub use value::kind_name;
