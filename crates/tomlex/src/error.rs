use alloc::{string::String, sync::Arc};
use core::fmt;

use thiserror::Error;

use crate::codepoint::SourcePosition;

/// A failure to produce the next codepoint.
///
/// Read errors are terminal: the reader that reported one keeps reporting it
/// and never decodes again. The position is that of the last codepoint read
/// successfully, since the offending bytes have no position of their own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {position}{}", PathSuffix(.source_path.as_deref()))]
pub struct ReadError {
    pub(crate) kind: ReadErrorKind,
    pub(crate) position: SourcePosition,
    pub(crate) source_path: Option<Arc<str>>,
}

impl ReadError {
    pub(crate) fn new(
        kind: ReadErrorKind,
        position: SourcePosition,
        source_path: Option<Arc<str>>,
    ) -> Self {
        Self {
            kind,
            position,
            source_path,
        }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ReadErrorKind {
        &self.kind
    }

    /// Position of the last codepoint read before the failure.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// The label of the source being read, if one was given.
    #[must_use]
    pub fn source_path(&self) -> Option<&Arc<str>> {
        self.source_path.as_ref()
    }
}

/// The cause of a [`ReadError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadErrorKind {
    /// The byte source failed before reaching a clean end.
    #[error("error reading from the underlying stream: {0}")]
    SourceIo(String),
    /// The bytes are not valid UTF-8.
    #[error("invalid utf-8 sequence")]
    InvalidSequence,
    /// The input ended in the middle of a multi-byte sequence.
    #[error("unexpected end of input in an incomplete utf-8 sequence")]
    TruncatedSequence,
}

struct PathSuffix<'a>(Option<&'a str>);

impl fmt::Display for PathSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(path) => write!(f, " of {path}"),
            None => Ok(()),
        }
    }
}
