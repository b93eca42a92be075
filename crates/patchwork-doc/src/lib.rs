// SPDX-License-Identifier: MIT OR Apache-2.0
//! # Format-preserving JSON/JSONC documents
//!
//! [`Document`] parses JSON with `//` and `/* */` comments and trailing
//! commas, and keeps every byte of whitespace and every comment so that an
//! untouched document renders back exactly as it was read.
//!
//! Edits arrive as JSON Patch operations. Replaced values keep the comments
//! around them, new members copy the indentation of their siblings, and
//! [`Document::format`] re-indents the result with the indent unit detected
//! from the source.
//!
//! [`Document::standardize`] drops the layout and yields the canonical
//! `serde_json::Value` that diffing and merging operate on.

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]

mod document;
mod edit;
/// Parse and apply errors
pub mod error;
mod layout;
mod node;
mod parse;

pub use document::Document;
pub use error::{ApplyError, ParseError, ParseErrorKind};
pub use layout::DEFAULT_INDENT;
pub use parse::MAX_DEPTH;
