// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pipeline configuration, built once from the command line and passed down.

use std::fmt;

use clap::ValueEnum;
use patchwork_diff::{DiffOptions, DiffStrategy, Equality};

/// How the patch document is turned into operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Merge the patch onto the input, then diff the input against the result
    #[default]
    Merge,
    /// Diff the patch document against the input; `null` deletes
    Deep,
    /// Add every non-null leaf of the patch document, ignoring the input
    Flat,
}

impl Mode {
    /// The tree walk used by the diff step.
    #[must_use]
    pub const fn strategy(self) -> DiffStrategy {
        match self {
            Self::Merge => DiffStrategy::Structural,
            Self::Deep => DiffStrategy::Deep,
            Self::Flat => DiffStrategy::Flat,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Merge => "merge",
            Self::Deep => "deep",
            Self::Flat => "flat",
        })
    }
}

/// Command-line names for the value comparators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Comparison {
    /// Deep equality; `1` equals `1.0`
    #[default]
    Structural,
    /// Equal when the textual renderings match; `1` equals `"1"`
    Rendered,
}

impl From<Comparison> for Equality {
    fn from(comparison: Comparison) -> Self {
        match comparison {
            Comparison::Structural => Self::Structural,
            Comparison::Rendered => Self::Rendered,
        }
    }
}

/// What the pipeline writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The patched input document
    #[default]
    Document,
    /// The generated JSON Patch operations
    Operations,
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Diff mode
    pub mode: Mode,
    /// Comparator for leaf values
    pub equality: Equality,
    /// Re-indent the document after patching
    pub reformat: bool,
    /// Output selection
    pub emit: Emit,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Merge,
            equality: Equality::Structural,
            reformat: true,
            emit: Emit::Document,
        }
    }
}

impl PipelineConfig {
    /// Diff options for the configured mode and comparator.
    #[must_use]
    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions::default()
            .with_strategy(self.mode.strategy())
            .with_equality(self.equality)
    }
}
