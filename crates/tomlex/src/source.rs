//! Byte sources feeding the UTF-8 decoder.
//!
//! A [`ByteSource`] hands out one byte at a time and reports whether it has
//! reached a clean end or failed. Both implementations skip a leading UTF-8
//! byte-order mark (`EF BB BF`) exactly once, while being constructed, so the
//! decoder never sees it.

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Forward-only producer of bytes.
pub trait ByteSource {
    /// Returns the next byte, or `None` at end-of-input or after a failure.
    fn next_byte(&mut self) -> Option<u8>;

    /// `true` once the source is exhausted without error.
    fn at_end(&self) -> bool;

    /// `true` once the source has failed to produce a byte.
    fn has_errored(&self) -> bool;

    /// Describes the failure reported by [`has_errored`](Self::has_errored).
    fn failure(&self) -> Option<&str> {
        None
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }

    #[inline]
    fn at_end(&self) -> bool {
        (**self).at_end()
    }

    #[inline]
    fn has_errored(&self) -> bool {
        (**self).has_errored()
    }

    fn failure(&self) -> Option<&str> {
        (**self).failure()
    }
}

/// Bytes from an in-memory buffer.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Wraps `data`, skipping a leading byte-order mark.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        let pos = if data.starts_with(&BOM) {
            log::trace!("skipping utf-8 byte-order mark");
            BOM.len()
        } else {
            0
        };
        Self { data, pos }
    }

    /// Bytes not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    #[inline]
    fn next_byte(&mut self) -> Option<u8> {
        let b = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn has_errored(&self) -> bool {
        false
    }
}

#[cfg(feature = "std")]
pub use self::stream::StreamSource;

#[cfg(feature = "std")]
mod stream {
    use alloc::{
        string::{String, ToString},
        vec,
        vec::Vec,
    };
    use std::io::{ErrorKind, Read};

    use super::{BOM, ByteSource};
    use crate::options::DEFAULT_STREAM_CHUNK_SIZE;

    /// Bytes pulled from an [`std::io::Read`] implementation.
    ///
    /// Reads go through a fixed-size chunk buffer allocated once at
    /// construction. Bytes peeked while looking for a byte-order mark stay in
    /// that buffer, so a stream that merely starts like a BOM loses nothing.
    pub struct StreamSource<R> {
        inner: R,
        buf: Vec<u8>,
        pos: usize,
        filled: usize,
        eof: bool,
        failure: Option<String>,
    }

    impl<R: Read> StreamSource<R> {
        /// Wraps `inner` with the default chunk size
        /// ([`DEFAULT_STREAM_CHUNK_SIZE`]).
        pub fn new(inner: R) -> Self {
            Self::with_chunk_size(inner, DEFAULT_STREAM_CHUNK_SIZE)
        }

        /// Wraps `inner`, reading at most `chunk_size` bytes per call
        /// (clamped to at least the length of a byte-order mark).
        pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
            let mut source = Self {
                inner,
                buf: vec![0; chunk_size.max(BOM.len())],
                pos: 0,
                filled: 0,
                eof: false,
                failure: None,
            };
            source.skip_bom();
            source
        }

        /// Returns the wrapped reader. Buffered bytes that were not handed
        /// out are lost.
        pub fn into_inner(self) -> R {
            self.inner
        }

        fn skip_bom(&mut self) {
            while self.filled < BOM.len() && self.read_more() {}
            if self.buf[..self.filled].starts_with(&BOM) {
                log::trace!("skipping utf-8 byte-order mark");
                self.pos = BOM.len();
            }
        }

        /// Appends one read's worth of bytes after `filled`. Returns `false`
        /// at end-of-input or on failure.
        fn read_more(&mut self) -> bool {
            if self.eof || self.failure.is_some() {
                return false;
            }
            loop {
                match self.inner.read(&mut self.buf[self.filled..]) {
                    Ok(0) => {
                        self.eof = true;
                        return false;
                    }
                    Ok(n) => {
                        self.filled += n;
                        return true;
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => {
                        log::debug!("byte stream failed: {e}");
                        self.failure = Some(e.to_string());
                        return false;
                    }
                }
            }
        }

        fn refill(&mut self) -> bool {
            self.pos = 0;
            self.filled = 0;
            let more = self.read_more();
            if more {
                log::trace!("stream refill: {} bytes", self.filled);
            }
            more
        }
    }

    impl<R: Read> ByteSource for StreamSource<R> {
        #[inline]
        fn next_byte(&mut self) -> Option<u8> {
            if self.pos == self.filled && !self.refill() {
                return None;
            }
            let b = self.buf[self.pos];
            self.pos += 1;
            Some(b)
        }

        fn at_end(&self) -> bool {
            self.eof && self.pos == self.filled
        }

        // A failure hit while prefetching only counts once the bytes read
        // before it have been handed out.
        fn has_errored(&self) -> bool {
            self.failure.is_some() && self.pos == self.filled
        }

        fn failure(&self) -> Option<&str> {
            self.failure.as_deref()
        }
    }

    impl<R> core::fmt::Debug for StreamSource<R> {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("StreamSource")
                .field("buffered", &(self.filled - self.pos))
                .field("eof", &self.eof)
                .field("failure", &self.failure)
                .finish_non_exhaustive()
        }
    }
}
