// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reading the two inputs and writing the result.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{InputRole, PipelineError, Result};

/// Where an input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Standard input, spelled `-`
    Stdin,
    /// A file
    File(PathBuf),
}

impl InputSource {
    /// Interprets a command-line operand.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Stdin => "-".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn read(&self, role: InputRole) -> Result<Vec<u8>> {
        let read = match self {
            Self::Stdin => {
                let mut buf = Vec::new();
                io::stdin().lock().read_to_end(&mut buf).map(|_| buf)
            }
            Self::File(path) => fs::read(path),
        };
        let bytes = read.map_err(|source| PipelineError::Io {
            role,
            path: self.describe(),
            source,
        })?;
        debug!(%role, source = %self.describe(), bytes = bytes.len(), "read");
        Ok(bytes)
    }
}

/// Reads the input and the patch.
///
/// # Errors
///
/// Fails with [`PipelineError::Usage`] before reading anything when both
/// come from standard input, and with [`PipelineError::Io`] when either
/// cannot be read.
pub fn read_inputs(input: &InputSource, patch: &InputSource) -> Result<(Vec<u8>, Vec<u8>)> {
    if *input == InputSource::Stdin && *patch == InputSource::Stdin {
        return Err(PipelineError::Usage(
            "input and patch cannot both be read from stdin".into(),
        ));
    }
    Ok((input.read(InputRole::Input)?, patch.read(InputRole::Patch)?))
}

/// Where the result goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output
    #[default]
    Stdout,
    /// A file, replaced atomically
    File(PathBuf),
}

impl OutputTarget {
    /// Writes `text`. A file target is written to a temporary file in the
    /// same directory and renamed over the destination, so a failed run
    /// never leaves partial output.
    ///
    /// # Errors
    ///
    /// Fails with [`PipelineError::Output`].
    pub fn write(&self, text: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(text.as_bytes())
                    .and_then(|()| out.flush())
                    .map_err(|source| PipelineError::Output {
                        target: "stdout".into(),
                        source,
                    })
            }
            Self::File(path) => {
                write_atomic(path, text).map_err(|source| PipelineError::Output {
                    target: path.display().to_string(),
                    source,
                })?;
                debug!(path = %path.display(), bytes = text.len(), "wrote output");
                Ok(())
            }
        }
    }
}

fn write_atomic(path: &Path, text: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
