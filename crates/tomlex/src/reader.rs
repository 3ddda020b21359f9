//! Decoding byte sources into positioned codepoints.
//!
//! [`Utf8Reader`] pulls bytes from a [`ByteSource`], runs them through the
//! [`Utf8Decoder`] and attaches a [`SourcePosition`] to every codepoint it
//! produces. The first failure is recorded and reported again on every later
//! read; the reader never resynchronises.

use alloc::sync::Arc;
use core::{fmt, marker::PhantomData};

use crate::{
    codepoint::{Codepoint, SourcePosition},
    decoder::{Step, Utf8Decoder},
    error::{ReadError, ReadErrorKind},
    mode::{Collect, ErrorMode, Raise},
    options::ReaderOptions,
    source::{ByteSource, SliceSource},
};

/// A pull-based producer of codepoints.
///
/// Implemented by [`Utf8Reader`] and [`BufferedReader`](crate::BufferedReader),
/// so grammar code can be written once over either.
pub trait CodepointReader {
    /// How [`read_next`](Self::read_next) reports failures.
    type Mode: ErrorMode;

    /// The label errors from this reader are attributed to.
    fn source_path(&self) -> Option<&Arc<str>>;

    /// Reads the next codepoint.
    ///
    /// Returns `Ok(None)` at the end of the input, repeatedly. Once an error
    /// has been returned, every later call returns the same error.
    ///
    /// # Errors
    ///
    /// Fails when the input is not valid UTF-8, ends inside a multi-byte
    /// sequence, or the underlying byte source fails.
    fn advance(&mut self) -> Result<Option<&Codepoint>, ReadError>;

    /// The error recorded by a failed read, if any.
    fn error(&self) -> Option<&ReadError>;

    /// Reads the next codepoint, reporting failures according to
    /// [`Mode`](Self::Mode).
    #[inline]
    fn read_next(&mut self) -> <Self::Mode as ErrorMode>::Output<'_> {
        <Self::Mode as ErrorMode>::deliver(self.advance())
    }
}

impl<R: CodepointReader + ?Sized> CodepointReader for &mut R {
    type Mode = R::Mode;

    fn source_path(&self) -> Option<&Arc<str>> {
        (**self).source_path()
    }

    #[inline]
    fn advance(&mut self) -> Result<Option<&Codepoint>, ReadError> {
        (**self).advance()
    }

    fn error(&self) -> Option<&ReadError> {
        (**self).error()
    }
}

/// Reads codepoints from a [`ByteSource`], tracking where each one starts.
///
/// The error mode `M` decides what [`read_next`](CodepointReader::read_next)
/// returns; see [`crate::mode`].
///
/// # Examples
///
/// ```rust
/// use tomlex::{CodepointReader, SourcePosition, Utf8Reader};
///
/// let mut reader = Utf8Reader::from_slice(b"a\nb");
/// let mut seen = Vec::new();
/// while let Some(cp) = reader.read_next()? {
///     seen.push((cp.value(), cp.position()));
/// }
/// assert_eq!(seen[2], ('b', SourcePosition::new(2, 1)));
/// # Ok::<(), tomlex::ReadError>(())
/// ```
pub struct Utf8Reader<S, M = Raise> {
    source: S,
    decoder: Utf8Decoder,
    /// Bytes of the sequence currently being decoded.
    pending: [u8; 4],
    pending_len: u8,
    /// Position the next codepoint will get.
    position: SourcePosition,
    current: Option<Codepoint>,
    source_path: Option<Arc<str>>,
    error: Option<ReadError>,
    mode: PhantomData<M>,
}

impl<S: ByteSource> Utf8Reader<S, Raise> {
    /// Reads from `source` with default options.
    pub fn new(source: S) -> Self {
        Self::with_mode(source, &ReaderOptions::default())
    }

    /// Reads from `source` with the given options.
    pub fn with_options(source: S, options: &ReaderOptions) -> Self {
        Self::with_mode(source, options)
    }
}

impl<S: ByteSource> Utf8Reader<S, Collect> {
    /// Reads from `source` in [`Collect`] mode: reads return `None` on
    /// failure and the error must be polled with
    /// [`error`](CodepointReader::error).
    pub fn collecting(source: S, options: &ReaderOptions) -> Self {
        Self::with_mode(source, options)
    }
}

impl<'a> Utf8Reader<SliceSource<'a>, Raise> {
    /// Reads an in-memory buffer.
    #[must_use]
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(SliceSource::new(data))
    }

    /// Reads the bytes of a string.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(text: &'a str) -> Self {
        Self::from_slice(text.as_bytes())
    }
}

impl<'a> Utf8Reader<SliceSource<'a>, Collect> {
    /// Reads an in-memory buffer in [`Collect`] mode.
    #[must_use]
    pub fn collecting_slice(data: &'a [u8], options: &ReaderOptions) -> Self {
        Self::collecting(SliceSource::new(data), options)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Utf8Reader<crate::source::StreamSource<R>, Raise> {
    /// Reads from a blocking stream with default options.
    pub fn from_reader(reader: R) -> Self {
        Self::from_reader_with_options(reader, &ReaderOptions::default())
    }

    /// Reads from a blocking stream, using the configured chunk size.
    pub fn from_reader_with_options(reader: R, options: &ReaderOptions) -> Self {
        let source = crate::source::StreamSource::with_chunk_size(reader, options.stream_chunk_size);
        Self::with_options(source, options)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Utf8Reader<crate::source::StreamSource<R>, Collect> {
    /// Reads from a blocking stream in [`Collect`] mode.
    pub fn collecting_reader(reader: R, options: &ReaderOptions) -> Self {
        let source = crate::source::StreamSource::with_chunk_size(reader, options.stream_chunk_size);
        Self::collecting(source, options)
    }
}

impl<S: ByteSource, M: ErrorMode> Utf8Reader<S, M> {
    /// Reads from `source` in an explicitly chosen error mode.
    pub fn with_mode(source: S, options: &ReaderOptions) -> Self {
        Self {
            source,
            decoder: Utf8Decoder::new(),
            pending: [0; 4],
            pending_len: 0,
            position: SourcePosition::START,
            current: None,
            source_path: options.source_path.clone(),
            error: None,
            mode: PhantomData,
        }
    }

    /// The position the next codepoint will be given.
    #[must_use]
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// The most recently produced codepoint.
    #[must_use]
    pub fn last(&self) -> Option<&Codepoint> {
        self.current.as_ref()
    }

    /// Consumes the reader, returning its byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Turns the reader into an iterator of owned codepoints.
    ///
    /// The iterator yields the first error once and then stops.
    pub fn into_codepoints(self) -> Codepoints<S, M> {
        Codepoints {
            reader: self,
            done: false,
        }
    }

    /// Records `kind` as the terminal error and returns it.
    fn fail(&mut self, kind: ReadErrorKind) -> ReadError {
        let position = self
            .current
            .map_or(SourcePosition::START, |cp| cp.position());
        let err = ReadError::new(kind, position, self.source_path.clone());
        log::debug!("read error: {err}");
        self.error = Some(err.clone());
        err
    }

    fn source_failure(&mut self) -> ReadError {
        let message = self
            .source
            .failure()
            .unwrap_or("the byte source failed")
            .into();
        self.fail(ReadErrorKind::SourceIo(message))
    }
}

impl<S: ByteSource, M: ErrorMode> CodepointReader for Utf8Reader<S, M> {
    type Mode = M;

    fn source_path(&self) -> Option<&Arc<str>> {
        self.source_path.as_ref()
    }

    fn advance(&mut self) -> Result<Option<&Codepoint>, ReadError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.source.at_end() && !self.decoder.is_pending() {
            return Ok(None);
        }
        if self.source.has_errored() {
            return Err(self.source_failure());
        }
        if self.decoder.is_error() {
            return Err(self.fail(ReadErrorKind::InvalidSequence));
        }

        loop {
            let Some(byte) = self.source.next_byte() else {
                if self.source.has_errored() {
                    return Err(self.source_failure());
                }
                if self.decoder.is_pending() {
                    return Err(self.fail(ReadErrorKind::TruncatedSequence));
                }
                return Ok(None);
            };

            // The automaton settles within four bytes.
            self.pending[usize::from(self.pending_len)] = byte;
            self.pending_len += 1;

            match self.decoder.step(byte) {
                Step::Pending => {}
                Step::Reject => return Err(self.fail(ReadErrorKind::InvalidSequence)),
                Step::Ready(value) => {
                    let bytes = &self.pending[..usize::from(self.pending_len)];
                    let cp = Codepoint::from_parts(value, bytes, self.position);
                    self.pending_len = 0;
                    self.position = self.position.next_after(value);
                    let cp: &Codepoint = self.current.insert(cp);
                    return Ok(Some(cp));
                }
            }
        }
    }

    fn error(&self) -> Option<&ReadError> {
        self.error.as_ref()
    }
}

impl<S: fmt::Debug, M> fmt::Debug for Utf8Reader<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utf8Reader")
            .field("source", &self.source)
            .field("position", &self.position)
            .field("source_path", &self.source_path)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Iterator over the codepoints of a [`Utf8Reader`].
///
/// Created by [`Utf8Reader::into_codepoints`].
#[derive(Debug)]
pub struct Codepoints<S, M = Raise> {
    reader: Utf8Reader<S, M>,
    done: bool,
}

impl<S, M> Codepoints<S, M> {
    /// Returns the underlying reader, which keeps any recorded error.
    pub fn into_reader(self) -> Utf8Reader<S, M> {
        self.reader
    }
}

impl<S: ByteSource, M: ErrorMode> Iterator for Codepoints<S, M> {
    type Item = Result<Codepoint, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.advance() {
            Ok(Some(cp)) => Some(Ok(*cp)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: ByteSource, M: ErrorMode> core::iter::FusedIterator for Codepoints<S, M> {}
