//! Loader error types.

use thiserror::Error;

/// Errors produced while turning a mesh location into a dataset.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to fetch '{location}': {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is malformed.
    #[error("failed to parse '{location}' (line {line}): {message}")]
    Parse {
        location: String,
        line: usize,
        message: String,
    },

    /// The file parsed but describes a dataset kind or encoding we do not read.
    #[error("unsupported content in '{location}': {what}")]
    Unsupported { location: String, what: String },

    /// The file parsed but produced no dataset.
    #[error("'{location}' produced no dataset")]
    Empty { location: String },
}

impl LoadError {
    /// Returns true for [`LoadError::Empty`], the only outcome that the
    /// pipeline answers with placeholder geometry.
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Returns the location the error refers to.
    pub fn location(&self) -> &str {
        match self {
            Self::Fetch { location, .. }
            | Self::Parse { location, .. }
            | Self::Unsupported { location, .. }
            | Self::Empty { location } => location,
        }
    }
}

/// Format-level failure, before a location is attached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("{0}")]
    Unsupported(String),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// Attaches the location being loaded.
    pub fn at(self, location: &str) -> LoadError {
        match self {
            Self::Syntax { line, message } => LoadError::Parse {
                location: location.to_string(),
                line,
                message,
            },
            Self::Unsupported(what) => LoadError::Unsupported {
                location: location.to_string(),
                what,
            },
        }
    }
}

/// A specialized Result type for loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
