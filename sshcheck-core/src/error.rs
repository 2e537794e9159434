use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("Malformed credential on line {line}: expected user:password")]
    InvalidCredentialLine { line: usize, content: String },

    #[error("Credential on line {line} is not valid UTF-8")]
    UndecodableCredentialLine { line: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} responded with {status}: {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Probe error: {0}")]
    Probe(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::MissingInput(path)
        } else {
            Self::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
