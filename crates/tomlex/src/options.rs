use alloc::sync::Arc;

/// Chunk size used by streaming sources unless configured otherwise.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 4096;

/// Configuration for a [`Utf8Reader`](crate::Utf8Reader).
///
/// # Examples
///
/// ```rust
/// use tomlex::{CodepointReader, ReaderOptions, Utf8Reader};
///
/// let options = ReaderOptions {
///     source_path: Some("config.toml".into()),
///     ..Default::default()
/// };
/// let mut reader = Utf8Reader::with_options(tomlex::SliceSource::new(b"x = 1"), &options);
/// assert_eq!(reader.source_path().map(|p| &**p), Some("config.toml"));
/// assert_eq!(reader.read_next().unwrap().unwrap().value(), 'x');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Human-readable label for the input, usually a file path.
    ///
    /// Only used to attribute errors. The label is shared, not copied, by
    /// every error the reader produces.
    ///
    /// # Default
    ///
    /// `None`
    pub source_path: Option<Arc<str>>,

    /// Number of bytes a streaming source requests from its reader at once.
    ///
    /// Values below 3 are raised to 3. Ignored for in-memory sources.
    ///
    /// # Default
    ///
    /// [`DEFAULT_STREAM_CHUNK_SIZE`]
    pub stream_chunk_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            source_path: None,
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
        }
    }
}

impl ReaderOptions {
    /// Options with only the source label set.
    #[must_use]
    pub fn with_source_path(path: impl Into<Arc<str>>) -> Self {
        Self {
            source_path: Some(path.into()),
            ..Self::default()
        }
    }
}
