// SPDX-License-Identifier: MIT OR Apache-2.0
//! The patch pipeline: parse, diff (after merging, in merge mode), apply,
//! format, render.

use patchwork_core::{PatchOperation, marshal_operations};
use patchwork_diff::{json_diff_with_options, merge};
use patchwork_doc::Document;
use serde_json::Value;
use tracing::{debug, debug_span, info, info_span};

use crate::config::{Emit, Mode, PipelineConfig};
use crate::error::{InputRole, PipelineError, Result};

/// Runs the pipeline over the raw input and patch bytes and returns the text
/// to write, ending in exactly one newline.
///
/// # Errors
///
/// Returns the first failing stage. The input document is dropped unchanged
/// on every error path.
pub fn run(config: &PipelineConfig, input: &[u8], patch: &[u8]) -> Result<String> {
    let _span = info_span!("pipeline", mode = %config.mode).entered();

    let mut document = parse(InputRole::Input, input)?;
    let patch = parse(InputRole::Patch, patch)?.standardize();
    let original = document.standardize();

    let operations = diff(config, &original, &patch)?;
    info!(operations = operations.len(), "diff computed");

    let operations_json = {
        let _span = debug_span!("marshal").entered();
        marshal_operations(&operations).map_err(PipelineError::DiffConstruction)?
    };
    if config.emit == Emit::Operations {
        return Ok(finish(String::from_utf8_lossy(&operations_json).into_owned()));
    }

    if operations.is_empty() {
        debug!("no changes to apply");
    } else {
        let _span = debug_span!("apply").entered();
        document.apply_patch(&operations_json)?;
    }

    if config.reformat {
        let _span = debug_span!("format", indent = ?document.indent()).entered();
        document.format();
    }
    Ok(finish(document.render()))
}

fn parse(role: InputRole, bytes: &[u8]) -> Result<Document> {
    let _span = debug_span!("parse", %role, bytes = bytes.len()).entered();
    Document::parse(bytes).map_err(|source| PipelineError::Parse { role, source })
}

/// Operations that turn `original` into the configured target.
///
/// # Errors
///
/// Merge mode fails when either document is not an object.
pub fn diff(config: &PipelineConfig, original: &Value, patch: &Value) -> Result<Vec<PatchOperation>> {
    let options = config.diff_options();
    let operations = match config.mode {
        Mode::Merge => {
            let merged = {
                let _span = debug_span!("merge").entered();
                merge(original, patch)?
            };
            let _span = debug_span!("diff", strategy = ?options.strategy).entered();
            json_diff_with_options(original, &merged, &options)
        }
        Mode::Deep | Mode::Flat => {
            let _span = debug_span!("diff", strategy = ?options.strategy).entered();
            json_diff_with_options(original, patch, &options)
        }
    };
    for op in &operations {
        debug!(op = %op.kind(), path = op.path(), "operation");
    }
    Ok(operations)
}

fn finish(mut text: String) -> String {
    text.truncate(text.trim_end_matches(['\n', '\r']).len());
    text.push('\n');
    text
}
