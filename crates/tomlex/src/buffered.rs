//! Bounded backtracking over a [`CodepointReader`].
//!
//! A grammar that must try one production and fall back to another reads
//! ahead through a [`BufferedReader`], then calls
//! [`step_back`](BufferedReader::step_back) to un-consume what it read. The
//! reader remembers the last `N` codepoints behind the current one, so at
//! most `N + 1` codepoints are in reach at any time.

use alloc::sync::Arc;

use crate::{
    codepoint::Codepoint,
    error::ReadError,
    history::History,
    mode::ErrorMode,
    reader::CodepointReader,
};

/// History capacity used when none is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 63;

/// A codepoint reader that can step back over recently read codepoints.
///
/// The reader borrows the reader it wraps and reports errors in the wrapped
/// reader's mode.
///
/// # Examples
///
/// ```rust
/// use tomlex::{BufferedReader, CodepointReader, Utf8Reader};
///
/// let mut inner = Utf8Reader::from_str("true");
/// let mut reader: BufferedReader<'_, _> = BufferedReader::new(&mut inner);
/// for expected in "tru".chars() {
///     assert_eq!(reader.read_next()?.unwrap().value(), expected);
/// }
/// // Not the keyword we hoped for; rewind to the first codepoint.
/// assert_eq!(reader.step_back(2)?.unwrap().value(), 't');
/// assert_eq!(reader.read_next()?.unwrap().value(), 'r');
/// # Ok::<(), tomlex::ReadError>(())
/// ```
pub struct BufferedReader<
    'r,
    R: CodepointReader + ?Sized,
    const N: usize = DEFAULT_HISTORY_CAPACITY,
> {
    reader: &'r mut R,
    history: History<N>,
    /// The newest codepoint pulled from `reader`; `None` before the first
    /// read and at end-of-input.
    head: Option<Codepoint>,
    started: bool,
    /// Steps back from `head`; 0 means reads go forward.
    offset: usize,
}

impl<'r, R: CodepointReader + ?Sized, const N: usize> BufferedReader<'r, R, N> {
    /// Largest number of codepoints in reach: the history plus the head.
    pub const MAX_HISTORY: usize = N + 1;

    /// Wraps `reader`.
    pub fn new(reader: &'r mut R) -> Self {
        Self {
            reader,
            history: History::new(),
            head: None,
            started: false,
            offset: 0,
        }
    }

    /// Moves `count` codepoints backwards and returns the codepoint now
    /// current. `step_back(0)` returns the current codepoint again.
    ///
    /// # Panics
    ///
    /// Panics if `count` plus the current [`offset`](Self::offset) exceeds
    /// the number of remembered codepoints, [`history_len`](Self::history_len).
    pub fn step_back(&mut self, count: usize) -> <R::Mode as ErrorMode>::Output<'_> {
        <R::Mode as ErrorMode>::deliver(self.rewind(count))
    }

    /// Number of codepoints remembered behind the newest one read.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// How many codepoints the reader currently sits behind the newest one.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> &'r mut R {
        self.reader
    }

    fn rewind(&mut self, count: usize) -> Result<Option<&Codepoint>, ReadError> {
        if let Some(err) = self.reader.error() {
            return Err(err.clone());
        }
        assert!(
            self.offset
                .checked_add(count)
                .is_some_and(|offset| offset <= self.history.len()),
            "cannot step back {count} codepoint(s) from offset {}: only {} remembered",
            self.offset,
            self.history.len(),
        );
        self.offset += count;
        Ok(self.current())
    }

    fn current(&self) -> Option<&Codepoint> {
        if self.offset == 0 {
            self.head.as_ref()
        } else {
            self.history.get_back(self.offset)
        }
    }

    fn pull(&mut self) -> Result<(), ReadError> {
        match self.reader.advance() {
            Ok(next) => {
                self.head = next.copied();
                Ok(())
            }
            Err(err) => {
                self.head = None;
                Err(err)
            }
        }
    }
}

impl<R: CodepointReader + ?Sized, const N: usize> CodepointReader for BufferedReader<'_, R, N> {
    type Mode = R::Mode;

    fn source_path(&self) -> Option<&Arc<str>> {
        self.reader.source_path()
    }

    fn advance(&mut self) -> Result<Option<&Codepoint>, ReadError> {
        if let Some(err) = self.reader.error() {
            return Err(err.clone());
        }

        if self.offset > 0 {
            self.offset -= 1;
        } else if !self.started {
            self.started = true;
            self.pull()?;
        } else if let Some(head) = self.head {
            self.history.push(head);
            self.pull()?;
        }
        // A `None` head after the first read is a cached end-of-input.

        Ok(self.current())
    }

    fn error(&self) -> Option<&ReadError> {
        self.reader.error()
    }
}

impl<R: CodepointReader + ?Sized, const N: usize> core::fmt::Debug for BufferedReader<'_, R, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferedReader")
            .field("head", &self.head)
            .field("history", &self.history)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use super::*;
    use crate::{ReaderOptions, SliceSource, Utf8Reader, mode::Raise};

    /// Reader that counts how often it is advanced.
    struct Counting<R> {
        inner: R,
        calls: usize,
    }

    impl<R: CodepointReader> CodepointReader for Counting<R> {
        type Mode = R::Mode;

        fn source_path(&self) -> Option<&Arc<str>> {
            self.inner.source_path()
        }

        fn advance(&mut self) -> Result<Option<&Codepoint>, ReadError> {
            self.calls += 1;
            self.inner.advance()
        }

        fn error(&self) -> Option<&ReadError> {
            self.inner.error()
        }
    }

    fn read_all<R: CodepointReader<Mode = Raise>>(reader: &mut R) -> String {
        let mut out = String::new();
        while let Some(cp) = reader.read_next().unwrap() {
            out.push(cp.value());
        }
        out
    }

    #[test]
    fn passes_through_without_stepping_back() {
        let mut inner = Utf8Reader::from_str("héllo");
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        assert_eq!(read_all(&mut reader), "héllo");
        assert_eq!(reader.history_len(), 4);
        assert_eq!(reader.read_next().unwrap(), None);
    }

    #[test]
    fn step_back_then_replay() {
        let mut inner = Utf8Reader::from_str("abcdef");
        let mut reader = BufferedReader::<_, 8>::new(&mut inner);
        for _ in 0..4 {
            reader.read_next().unwrap();
        }
        assert_eq!(reader.step_back(3).unwrap().map(Codepoint::value), Some('a'));
        assert_eq!(reader.offset(), 3);
        assert_eq!(read_all(&mut reader), "bcdef");
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn step_back_zero_repeats_current() {
        let mut inner = Utf8Reader::from_str("xy");
        let mut reader = BufferedReader::<_, 2>::new(&mut inner);
        assert_eq!(reader.read_next().unwrap().map(Codepoint::value), Some('x'));
        assert_eq!(reader.step_back(0).unwrap().map(Codepoint::value), Some('x'));
        assert_eq!(reader.read_next().unwrap().map(Codepoint::value), Some('y'));
    }

    #[test]
    fn repeated_step_backs_accumulate() {
        let mut inner = Utf8Reader::from_str("0123456");
        let mut reader = BufferedReader::<_, 8>::new(&mut inner);
        for _ in 0..6 {
            reader.read_next().unwrap();
        }
        assert_eq!(reader.step_back(2).unwrap().map(Codepoint::value), Some('3'));
        assert_eq!(reader.step_back(2).unwrap().map(Codepoint::value), Some('1'));
        assert_eq!(reader.read_next().unwrap().map(Codepoint::value), Some('2'));
        assert_eq!(read_all(&mut reader), "3456");
    }

    #[test]
    fn end_of_input_survives_step_back() {
        let mut inner = Utf8Reader::from_str("ab");
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        assert_eq!(read_all(&mut reader), "ab");
        assert_eq!(reader.history_len(), 2);
        assert_eq!(reader.step_back(1).unwrap().map(Codepoint::value), Some('b'));
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.read_next().unwrap(), None);
    }

    #[test]
    fn empty_input_reads_none() {
        let mut inner = Utf8Reader::from_slice(b"");
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.read_next().unwrap(), None);
        assert_eq!(reader.history_len(), 0);
    }

    #[test]
    #[should_panic(expected = "cannot step back")]
    fn step_back_past_history_panics() {
        let mut inner = Utf8Reader::from_str("abc");
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        reader.read_next().unwrap();
        reader.read_next().unwrap();
        let _ = reader.step_back(2);
    }

    #[test]
    #[should_panic(expected = "cannot step back")]
    fn step_back_does_not_wrap_around() {
        let mut inner = Utf8Reader::from_str("abc");
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        read_all(&mut reader);
        reader.step_back(1).unwrap();
        let _ = reader.step_back(usize::MAX);
    }

    #[test]
    fn end_of_input_is_not_requested_twice() {
        let mut counting = Counting {
            inner: Utf8Reader::from_str("xy"),
            calls: 0,
        };
        let mut reader = BufferedReader::<_, 4>::new(&mut counting);
        assert_eq!(read_all(&mut reader), "xy");
        for _ in 0..3 {
            assert_eq!(reader.read_next().unwrap(), None);
        }
        assert_eq!(reader.step_back(2).unwrap().map(Codepoint::value), Some('x'));
        assert_eq!(read_all(&mut reader), "y");
        // 'x', 'y' and the single end-of-input.
        assert_eq!(counting.calls, 3);
    }

    #[test]
    fn errors_come_from_the_wrapped_reader() {
        let options = ReaderOptions::with_source_path("in.toml");
        let mut inner = Utf8Reader::collecting(SliceSource::new(b"a\xFF"), &options);
        let mut reader = BufferedReader::<_, 4>::new(&mut inner);
        assert_eq!(reader.read_next().map(Codepoint::value), Some('a'));
        assert!(reader.read_next().is_none());
        assert!(reader.error().is_some());
        assert!(reader.step_back(1).is_none());
        assert_eq!(reader.source_path().map(|p| &**p), Some("in.toml"));
    }

    #[test]
    fn wraps_a_trait_object() {
        let mut inner = Utf8Reader::from_str("ok");
        let dyn_reader: &mut dyn CodepointReader<Mode = Raise> = &mut inner;
        let mut reader = BufferedReader::<_, 2>::new(dyn_reader);
        let seen: Vec<char> =
            core::iter::from_fn(|| reader.read_next().unwrap().map(Codepoint::value)).collect();
        assert_eq!(seen, ['o', 'k']);
    }
}
