use core::fmt;

use bstr::{BStr, ByteSlice};

/// A 1-based (line, column) location in the decoded text.
///
/// Columns count codepoints, not bytes or grapheme clusters. Positions order
/// lexicographically, line first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourcePosition {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: u32,
}

impl SourcePosition {
    /// The first codepoint of a document.
    pub const START: Self = Self { line: 1, column: 1 };

    /// Creates a position from its parts.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position of the codepoint following one at `self` that has value
    /// `c`.
    #[must_use]
    pub(crate) fn next_after(self, c: char) -> Self {
        if crate::chars::is_line_break_no_cr(c) {
            Self {
                line: self.line.saturating_add(1),
                column: 1,
            }
        } else {
            Self {
                line: self.line,
                column: self.column.saturating_add(1),
            }
        }
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// One decoded Unicode scalar value together with the bytes it was decoded
/// from and where it started.
///
/// Records are plain values: the readers hand out references that stay valid
/// until the next read, and callers copy them when they need to keep one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Codepoint {
    value: char,
    bytes: [u8; 4],
    len: u8,
    position: SourcePosition,
}

impl Codepoint {
    /// U+0000 at the start of the input; fills unused history slots.
    pub(crate) const NUL: Self = Self {
        value: '\0',
        bytes: [0; 4],
        len: 1,
        position: SourcePosition::START,
    };

    /// Builds a record from the raw bytes the decoder accepted.
    ///
    /// `bytes` must be the complete UTF-8 encoding of `value`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_parts(value: char, bytes: &[u8], position: SourcePosition) -> Self {
        debug_assert_eq!(bytes.len(), value.len_utf8());
        let mut buf = [0u8; 4];
        buf[..bytes.len()].copy_from_slice(bytes);
        Self {
            value,
            bytes: buf,
            // at most four bytes
            len: bytes.len() as u8,
            position,
        }
    }

    /// Encodes `value` and places it at `position`.
    #[must_use]
    pub fn new(value: char, position: SourcePosition) -> Self {
        let mut buf = [0u8; 4];
        let encoded = value.encode_utf8(&mut buf);
        Self::from_parts(value, encoded.as_bytes(), position)
    }

    /// The decoded scalar value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> char {
        self.value
    }

    /// Where the first byte of this codepoint appeared.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> SourcePosition {
        self.position
    }

    /// Number of bytes in the original encoding (1-4).
    #[inline]
    #[must_use]
    pub const fn len_utf8(&self) -> usize {
        self.len as usize
    }

    /// The original encoded bytes, exactly as they appeared in the source.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len_utf8()]
    }

    /// The original encoded bytes as a byte string.
    #[inline]
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.as_bytes().as_bstr()
    }

    /// The original encoding as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `bytes[..len]` is always the UTF-8 encoding of `value`; both
        // constructors go through `from_parts`, which receives either the
        // bytes the DFA accepted or `char::encode_utf8` output.
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// Returns a [`Display`](fmt::Display) adapter suited to error messages,
    /// which renders control characters as escape sequences.
    #[must_use]
    pub const fn escaped(&self) -> Escaped {
        Escaped(self.value)
    }
}

impl PartialEq<char> for Codepoint {
    fn eq(&self, other: &char) -> bool {
        self.value == *other
    }
}

impl From<Codepoint> for char {
    fn from(cp: Codepoint) -> Self {
        cp.value
    }
}

impl fmt::Debug for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:02X?} @ {}:{}",
            self.value,
            self.as_bytes(),
            self.position.line,
            self.position.column
        )
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display adapter returned by [`Codepoint::escaped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escaped(char);

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            '\u{8}' => f.write_str("\\b"),
            '\t' => f.write_str("\\t"),
            '\n' => f.write_str("\\n"),
            '\u{C}' => f.write_str("\\f"),
            '\r' => f.write_str("\\r"),
            c @ ('\0'..='\u{1F}' | '\u{7F}') => write!(f, "\\u{:04X}", c as u32),
            c => fmt::Display::fmt(&c, f),
        }
    }
}
