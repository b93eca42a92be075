// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pipeline failures and their process exit codes.

use std::fmt;
use std::io;

use patchwork_diff::MergeError;
use patchwork_doc::{ApplyError, ParseError};
use thiserror::Error;

/// Which of the two inputs a failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The document being patched
    Input,
    /// The patch document
    Patch,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Patch => "patch",
        })
    }
}

/// A failed pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid combination of arguments
    #[error("{0}")]
    Usage(String),

    /// An input could not be read
    #[error("failed to read {role} {path}: {source}")]
    Io {
        /// Which input
        role: InputRole,
        /// Path, or `-` for stdin
        path: String,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// An input is not valid JSON or JSONC
    #[error("failed to parse {role}: {source}")]
    Parse {
        /// Which input
        role: InputRole,
        /// Syntax error with position
        #[source]
        source: ParseError,
    },

    /// The merge step rejected its inputs
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    /// Operations could not be serialized
    #[error("failed to serialize patch operations: {0}")]
    DiffConstruction(#[source] serde_json::Error),

    /// The document rejected the generated operations
    #[error("failed to apply patch operations: {0}")]
    Apply(#[from] ApplyError),

    /// The result could not be written
    #[error("failed to write {target}: {source}")]
    Output {
        /// Path, or `stdout`
        target: String,
        /// Underlying failure
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Parse { .. } | Self::Merge(_) | Self::DiffConstruction(_) | Self::Apply(_) => 1,
            Self::Usage(_) => 2,
            Self::Output { .. } => 3,
            Self::Io { .. } => 4,
        }
    }
}

/// Result alias for pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;
