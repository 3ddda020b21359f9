//! Lexical front-end for TOML parsers.
//!
//! `tomlex` turns raw bytes into validated Unicode codepoints, each tagged
//! with the 1-based line and column it starts at, and lets a grammar read
//! ahead and back up over a bounded window of recent codepoints.
//!
//! The layers, bottom up:
//!
//! - a [`ByteSource`] over a slice ([`SliceSource`]) or a blocking
//!   [`std::io::Read`] (`StreamSource`, behind the `std` feature), which
//!   drops a leading byte-order mark;
//! - the table-driven [`Utf8Decoder`];
//! - [`Utf8Reader`], producing [`Codepoint`] records with positions;
//! - [`BufferedReader`], adding [`step_back`](BufferedReader::step_back).
//!
//! The [`chars`] predicates classify codepoints for the grammar layer.
//!
//! ```rust
//! use tomlex::{BufferedReader, CodepointReader, Utf8Reader, chars};
//!
//! let mut inner = Utf8Reader::from_str("key = 1");
//! let mut reader: BufferedReader<'_, _> = BufferedReader::new(&mut inner);
//! let mut key = String::new();
//! while let Some(cp) = reader.read_next()? {
//!     if !chars::is_bare_key_character(cp.value()) {
//!         break;
//!     }
//!     key.push(cp.value());
//! }
//! assert_eq!(key, "key");
//! // The space that ended the key is still current; un-read it.
//! let last = reader.step_back(1)?.unwrap();
//! assert_eq!((last.value(), last.position().column), ('y', 3));
//! # Ok::<(), tomlex::ReadError>(())
//! ```
//!
//! Failures are terminal. Pick the reporting style with the reader's
//! [`ErrorMode`]: [`Raise`] returns `Err` from every read, [`Collect`]
//! returns `None` and leaves the error to be polled with
//! [`CodepointReader::error`].

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod chars;
pub mod decoder;
pub mod mode;
pub mod unicode;

mod buffered;
mod codepoint;
mod error;
mod history;
mod options;
mod reader;
mod source;

pub use buffered::{BufferedReader, DEFAULT_HISTORY_CAPACITY};
pub use codepoint::{Codepoint, Escaped, SourcePosition};
pub use decoder::{Step, Utf8Decoder};
pub use error::{ReadError, ReadErrorKind};
pub use history::History;
pub use mode::{Collect, ErrorMode, Raise};
pub use options::{DEFAULT_STREAM_CHUNK_SIZE, ReaderOptions};
pub use reader::{CodepointReader, Codepoints, Utf8Reader};
#[cfg(feature = "std")]
pub use source::StreamSource;
pub use source::{ByteSource, SliceSource};
pub use unicode::{DefaultProperties, UnicodeProperties};
