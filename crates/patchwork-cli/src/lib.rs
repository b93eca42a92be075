// SPDX-License-Identifier: MIT OR Apache-2.0
//! # patchwork-cli
//!
//! Applies a JSON patch document to a JSON or JSONC file while keeping the
//! file's comments and layout.
//!
//! ## Usage
//!
//! ```bash
//! # Merge overrides.json onto config.jsonc and print the result
//! patchwork config.jsonc overrides.json
//!
//! # Patch in place of a pipe, writing to a file
//! cat overrides.json | patchwork config.jsonc - -o config.new.jsonc
//!
//! # Null deletes a key
//! echo '{"debug": null}' | patchwork --mode deep config.jsonc -
//!
//! # Show the generated JSON Patch instead of applying it
//! patchwork --emit operations config.jsonc overrides.json
//! ```
//!
//! ## Modes
//!
//! | Mode | Operations generated |
//! |------|----------------------|
//! | `merge` | diff of the input against the input deep-merged with the patch |
//! | `deep` | walk of the patch: `null` removes, other values add or replace |
//! | `flat` | an `add` for every non-null leaf of the patch |
//!
//! ## Library Usage
//!
//! [`pipeline::run`] runs the whole pipeline over byte buffers; the
//! constituent crates are re-exported for direct access.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod telemetry;

/// Re-export of patchwork-core for pointers and operations.
pub use patchwork_core as core;

/// Re-export of patchwork-diff for merge and diff.
pub use patchwork_diff as diff;

/// Re-export of patchwork-doc for the document model.
pub use patchwork_doc as doc;

pub use config::{Comparison, Emit, Mode, PipelineConfig};
pub use error::{InputRole, PipelineError};
pub use io::{InputSource, OutputTarget, read_inputs};
