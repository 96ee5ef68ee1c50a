use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoPersonError {
    #[error("unmarshaling error: {0}")]
    Decode(String),
    #[error("marshaling error: {0}")]
    Encode(String),
    #[error("file creation error: {}: {source}", path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file write error: {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed wire data at offset {offset}: {reason}")]
    MalformedWire { offset: usize, reason: String },
}

impl ProtoPersonError {
    /// Pipeline stage the error was raised in.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::FileCreate { .. } => "create",
            Self::FileWrite { .. } => "write",
            Self::MalformedWire { .. } => "inspect",
        }
    }
}
