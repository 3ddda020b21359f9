//! How a reader surfaces failures to its caller.
//!
//! Every reader records its first error internally and keeps reporting it;
//! that is the primitive behaviour of [`CodepointReader::advance`]. The
//! error mode is a type parameter that decides what
//! [`CodepointReader::read_next`] returns on top of it:
//!
//! - [`Raise`] propagates the error as an `Err`, ready for `?`.
//! - [`Collect`] returns `None` and leaves the error pending; the caller
//!   polls [`CodepointReader::error`] after every read.
//!
//! [`CodepointReader::advance`]: crate::CodepointReader::advance
//! [`CodepointReader::read_next`]: crate::CodepointReader::read_next
//! [`CodepointReader::error`]: crate::CodepointReader::error

use crate::{Codepoint, ReadError};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Raise {}
    impl Sealed for super::Collect {}
}

/// Failure-reporting mode, chosen once per reader type.
pub trait ErrorMode: sealed::Sealed {
    /// What a read returns in this mode.
    type Output<'a>;

    /// Converts the primitive read result into this mode's output.
    fn deliver(result: Result<Option<&Codepoint>, ReadError>) -> Self::Output<'_>;
}

/// Errors are returned immediately as `Err`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Raise;

impl ErrorMode for Raise {
    type Output<'a> = Result<Option<&'a Codepoint>, ReadError>;

    #[inline]
    fn deliver(result: Result<Option<&Codepoint>, ReadError>) -> Self::Output<'_> {
        result
    }
}

/// Errors are stored and must be polled; reads report `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collect;

impl ErrorMode for Collect {
    type Output<'a> = Option<&'a Codepoint>;

    #[inline]
    fn deliver(result: Result<Option<&Codepoint>, ReadError>) -> Self::Output<'_> {
        result.ok().flatten()
    }
}
