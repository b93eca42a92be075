// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types shared across patchwork crates.

use thiserror::Error;

/// Errors raised while parsing a JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// A non-empty pointer did not start with `/`.
    #[error("JSON pointer {pointer:?} must be empty or start with '/'")]
    MissingLeadingSlash {
        /// The offending pointer text
        pointer: String,
    },

    /// A `~` was not followed by `0` or `1`.
    #[error("invalid escape sequence in JSON pointer {pointer:?} at byte {offset}")]
    InvalidEscape {
        /// The offending pointer text
        pointer: String,
        /// Byte offset of the `~`
        offset: usize,
    },
}

/// Result alias for pointer handling.
pub type Result<T> = std::result::Result<T, PointerError>;
