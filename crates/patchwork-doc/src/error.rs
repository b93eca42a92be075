// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for the document model.

use patchwork_core::PointerError;
use thiserror::Error;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Input ended inside a value
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A character that cannot start or continue the current construct
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    /// A malformed or out of range number
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    /// A malformed string literal
    #[error("invalid string literal: {0}")]
    InvalidString(String),
    /// Object member names must be strings
    #[error("object member name must be a string")]
    ExpectedName,
    /// A `/* */` comment with no end
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// Content after the top-level value
    #[error("trailing content after the document value")]
    TrailingContent,
    /// Nesting deeper than the parser allows
    #[error("nesting exceeds {0} levels")]
    TooDeep(usize),
    /// Input is not UTF-8
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

/// A parse failure with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct ParseError {
    /// Line of the failure
    pub line: usize,
    /// Column of the failure, in characters
    pub column: usize,
    /// Failure kind
    pub kind: ParseErrorKind,
}

impl ParseError {
    /// Builds an error for the byte `offset` of `source`, counting lines and
    /// character columns from 1.
    pub fn at(source: &str, offset: usize, kind: ParseErrorKind) -> Self {
        let mut end = offset.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        let consumed = &source[..end];
        let line = consumed.bytes().filter(|&b| b == b'\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        Self { line, column, kind }
    }
}

/// Failures while applying operations to a live document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The operation list was not a valid JSON Patch array.
    #[error("malformed patch operations: {0}")]
    Malformed(String),

    /// The operation path is not a valid pointer.
    #[error(transparent)]
    Pointer(#[from] PointerError),

    /// Nothing exists at the target of a remove or replace.
    #[error("path {path:?} does not exist")]
    NotFound {
        /// Operation path
        path: String,
    },

    /// The path descends into a scalar.
    #[error("cannot address {segment:?} inside a literal at {path:?}")]
    NotAContainer {
        /// Operation path
        path: String,
        /// The token that could not be resolved
        segment: String,
    },

    /// An array token is not a valid index.
    #[error("invalid array index {segment:?} at {path:?}")]
    InvalidIndex {
        /// Operation path
        path: String,
        /// The offending token
        segment: String,
    },
}
