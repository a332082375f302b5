use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML.
    #[error("Malformed document: {0}")]
    Parse(#[from] xml::reader::Error),

    #[error("Failed to serialize document: {0}")]
    Emit(#[from] xml::writer::Error),

    #[error("Serialized document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// An element whose filtering policy depends on an attribute lacks it.
    #[error("Element \"{id}\" is missing required attribute \"{missing}\"")]
    MissingAttribute { id: String, missing: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist {path:?}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}
