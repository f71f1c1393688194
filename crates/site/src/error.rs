use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,
    #[error("invalid major part `{0}`")]
    InvalidMajor(String),
    #[error("invalid minor part `{0}`")]
    InvalidMinor(String),
    #[error("price does not fit in minor units")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid header {found:?}, expected {expected:?}")]
    Header {
        found: Vec<String>,
        expected: &'static [&'static str],
    },
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: invalid price `{value}`")]
    Price {
        line: usize,
        value: String,
        #[source]
        source: PriceError,
    },
    #[error("line {line}: unsupported currency `{value}`")]
    Currency { line: usize, value: String },
    #[error("line {line}: invalid path `{value}`")]
    Path { line: usize, value: String },
    #[error("line {line}: duplicate path `{path}`")]
    DuplicatePath { line: usize, path: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no content for `{0}`")]
    NotFound(String),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
