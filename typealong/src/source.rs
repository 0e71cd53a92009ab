use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use derive_more::From;
use quill::Buffer;
use thiserror::Error;
use tracing::info;

/// Name shown for standard input
pub const STDIN_NAME: &str = "(stdin)";

#[derive(Debug, From, Error)]
pub enum SourceError {
    #[error("Failed to open '{}': {error}", path.display())]
    #[from(skip)]
    Open { path: PathBuf, error: io::Error },

    #[error("Failed to read input: {0}")]
    Read(io::Error),

    #[error("'{0}' has nothing to type")]
    #[from(skip)]
    Empty(String),
}

/// Where a buffer comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

/// A loaded, normalised buffer and where it came from
#[derive(Debug, Clone)]
pub struct Source {
    /// Shown in the border, and used to resolve the comment syntax
    pub name: String,
    /// Path of the file, `None` for standard input
    pub path: Option<PathBuf>,
    pub buffer: Buffer,
}

impl Input {
    /// Read the whole input into memory
    pub fn load(&self) -> Result<Source, SourceError> {
        match self {
            Self::Stdin => from_reader(STDIN_NAME, None, io::stdin().lock()),
            Self::File(path) => {
                let file = File::open(path).map_err(|error| SourceError::Open {
                    path: path.clone(),
                    error,
                })?;
                from_reader(&path.display().to_string(), Some(path.clone()), file)
            }
        }
    }
}

fn from_reader(
    name: &str,
    path: Option<PathBuf>,
    mut reader: impl Read,
) -> Result<Source, SourceError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let buffer = Buffer::from_bytes(&bytes);
    if buffer.is_empty() {
        return Err(SourceError::Empty(name.to_string()));
    }

    info!(name, raw = bytes.len(), typeable = buffer.len(), "loaded source");

    Ok(Source {
        name: name.to_string(),
        path,
        buffer,
    })
}
