use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::types::TagFormat;

/// Everything that can go wrong between a record and a saved file.
///
/// A field without a mapping in the target format is not an error and has no
/// variant here; the encoder just returns `None` for it.
#[derive(Error, Debug)]
pub enum TagError {
    /// Malformed value shape, out-of-set code, or unknown field name.
    #[error("invalid value for `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("cannot open {format} container {}: {reason}", path.display())]
    ContainerOpen {
        format: TagFormat,
        path: PathBuf,
        reason: String,
    },

    #[error("cannot read album art {}: {source}", path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image was read and embedded, but the source file is still there.
    #[error("album art {} was embedded but could not be removed: {source}", path.display())]
    ResourceCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save {format} tags to {}: {reason}", path.display())]
    Persist {
        format: TagFormat,
        path: PathBuf,
        reason: String,
    },
}

impl TagError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TagError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TagError>;
