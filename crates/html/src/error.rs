//! Errors for tokenization and tree mutation.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorCode {
    UnterminatedComment,
    UnterminatedDoctype,
    UnterminatedTag,
}

impl ParseErrorCode {
    fn describe(self) -> &'static str {
        match self {
            ParseErrorCode::UnterminatedComment => "comment is never closed",
            ParseErrorCode::UnterminatedDoctype => "doctype is never closed",
            ParseErrorCode::UnterminatedTag => "tag is never closed",
        }
    }
}

/// Markup that cannot be tokenized. `position` is a byte offset into the input, counted after
/// NUL bytes are replaced with U+FFFD.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{} at byte {position}", code.describe())]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(code: ParseErrorCode, position: usize) -> Self {
        Self { code, position }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("no node at path {0}")]
    InvalidPath(String),
    #[error("node at path {0} cannot have children")]
    NotAContainer(String),
    #[error("the root node cannot be detached")]
    RootNotDetachable,
    #[error("a document node cannot be appended as a child")]
    DocumentNotAppendable,
}
