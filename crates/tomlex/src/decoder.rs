//! Table-driven UTF-8 validation and decoding, one byte at a time.
//!
//! This is Björn Höhrmann's DFA decoder
//! (<http://bjoern.hoehrmann.de/utf-8/decoder/dfa/>):
//!
//! > Copyright (c) 2008-2009 Bjoern Hoehrmann <bjoern@hoehrmann.de>
//! >
//! > Permission is hereby granted, free of charge, to any person obtaining a
//! > copy of this software and associated documentation files (the
//! > "Software"), to deal in the Software without restriction, including
//! > without limitation the rights to use, copy, modify, merge, publish,
//! > distribute, sublicense, and/or sell copies of the Software, and to permit
//! > persons to whom the Software is furnished to do so, subject to the
//! > following conditions:
//! >
//! > The above copyright notice and this permission notice shall be included
//! > in all copies or substantial portions of the Software.
//! >
//! > THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
//! > OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
//! > MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN
//! > NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
//! > DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR
//! > OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE
//! > USE OR OTHER DEALINGS IN THE SOFTWARE.
//!
//! Each input byte maps to one of twelve byte classes. The class selects how
//! many low bits of a lead byte carry payload, and together with the current
//! state picks the next state. States are pre-multiplied by twelve so the
//! transition lookup is a single add.
//!
//! Invariants
//! - Overlong forms, surrogates (U+D800..=U+DFFF) and anything above U+10FFFF
//!   lead to [`REJECT`] through the tables alone.
//! - The accumulator holds a valid scalar value whenever the state is
//!   [`ACCEPT`] after at least one byte.
//! - Once in [`REJECT`], the decoder must not be stepped again.

/// State value meaning "a complete codepoint is in the accumulator".
pub const ACCEPT: u8 = 0;

/// State value meaning "the bytes so far are not valid UTF-8".
pub const REJECT: u8 = 12;

#[rustfmt::skip]
static UTF8D: [u8; 364] = [
    // byte -> class
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 00..1F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 20..3F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 40..5F
    0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, 0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0, // 60..7F
    1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1, 9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9, // 80..9F
    7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7, 7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7, // A0..BF
    8,8,2,2,2,2,2,2,2,2,2,2,2,2,2,2, 2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2, // C0..DF
    10,3,3,3,3,3,3,3,3,3,3,3,3,4,3,3, 11,6,6,6,5,8,8,8,8,8,8,8,8,8,8,8, // E0..FF

    // (state + class) -> state
    0,12,24,36,60,96,84,12,12,12,48,72, 12,12,12,12,12,12,12,12,12,12,12,12,
    12, 0,12,12,12,12,12, 0,12, 0,12,12, 12,24,12,12,12,12,12,24,12,24,12,12,
    12,12,12,12,12,12,12,24,12,12,12,12, 12,24,12,12,12,12,12,12,12,24,12,12,
    12,12,12,12,12,12,12,36,12,36,12,12, 12,36,12,12,12,12,12,36,12,36,12,12,
    12,36,12,12,12,12,12,12,12,12,12,12,
];

/// Outcome of feeding one byte to a [`Utf8Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A complete codepoint is available.
    Ready(char),
    /// The sequence so far is a valid prefix; feed more bytes.
    Pending,
    /// The sequence is not valid UTF-8.
    Reject,
}

/// Incremental UTF-8 decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf8Decoder {
    state: u8,
    codepoint: u32,
}

impl Utf8Decoder {
    /// A decoder in the ready state with an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ACCEPT,
            codepoint: 0,
        }
    }

    /// The raw automaton state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> u8 {
        self.state
    }

    /// `true` when the bytes fed so far form complete codepoints.
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.state == ACCEPT
    }

    /// `true` in the middle of a multi-byte sequence.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.state != ACCEPT && self.state != REJECT
    }

    /// `true` once an invalid sequence has been seen.
    #[inline]
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.state == REJECT
    }

    /// The accumulated codepoint bits. Only meaningful when
    /// [`is_ready`](Self::is_ready).
    #[inline]
    #[must_use]
    pub const fn codepoint(&self) -> u32 {
        self.codepoint
    }

    /// Advances the automaton by one byte.
    ///
    /// Must not be called once [`is_error`](Self::is_error) is `true`.
    #[inline]
    pub fn feed(&mut self, byte: u8) {
        debug_assert!(!self.is_error(), "utf-8 decoder stepped after rejecting");

        let class = UTF8D[byte as usize];
        self.codepoint = if self.is_ready() {
            (0xFF_u32 >> class) & u32::from(byte)
        } else {
            u32::from(byte & 0x3F) | (self.codepoint << 6)
        };
        self.state = UTF8D[256 + self.state as usize + class as usize];
    }

    /// Feeds `byte` and reports what the automaton now holds.
    #[inline]
    pub fn step(&mut self, byte: u8) -> Step {
        self.feed(byte);
        match self.state {
            ACCEPT => match char::from_u32(self.codepoint) {
                Some(c) => Step::Ready(c),
                // Unreachable: the tables never accept a non-scalar value.
                None => Step::Reject,
            },
            REJECT => Step::Reject,
            _ => Step::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use quickcheck::QuickCheck;
    use rstest::rstest;

    use super::*;

    /// Decodes `bytes` completely, returning `None` on rejection or on a
    /// dangling partial sequence.
    fn decode_all(bytes: &[u8]) -> Option<Vec<char>> {
        let mut d = Utf8Decoder::new();
        let mut out = Vec::new();
        for &b in bytes {
            match d.step(b) {
                Step::Ready(c) => out.push(c),
                Step::Pending => {}
                Step::Reject => return None,
            }
        }
        d.is_ready().then_some(out)
    }

    #[rstest]
    #[case(b"A", 'A')]
    #[case(b"\x7F", '\u{7F}')]
    #[case(b"\xC2\x80", '\u{80}')]
    #[case(b"\xDF\xBF", '\u{7FF}')]
    #[case(b"\xE0\xA0\x80", '\u{800}')]
    #[case(b"\xED\x9F\xBF", '\u{D7FF}')]
    #[case(b"\xEE\x80\x80", '\u{E000}')]
    #[case(b"\xEF\xBF\xBF", '\u{FFFF}')]
    #[case(b"\xF0\x90\x80\x80", '\u{10000}')]
    #[case(b"\xF4\x8F\xBF\xBF", '\u{10FFFF}')]
    fn accepts_boundary_scalars(#[case] bytes: &[u8], #[case] expected: char) {
        assert_eq!(decode_all(bytes), Some(alloc::vec![expected]));
    }

    #[rstest]
    #[case::overlong_nul(b"\xC0\x80")]
    #[case::overlong_two_byte(b"\xC1\xBF")]
    #[case::overlong_three_byte(b"\xE0\x9F\xBF")]
    #[case::overlong_four_byte(b"\xF0\x8F\xBF\xBF")]
    #[case::surrogate_low(b"\xED\xA0\x80")]
    #[case::surrogate_high(b"\xED\xBF\xBF")]
    #[case::above_max(b"\xF4\x90\x80\x80")]
    #[case::f5_lead(b"\xF5\x80\x80\x80")]
    #[case::ff_byte(b"\xFF")]
    #[case::lone_continuation(b"\x80")]
    #[case::lead_then_ascii(b"\xE2\x41")]
    fn rejects_malformed(#[case] bytes: &[u8]) {
        assert_eq!(decode_all(bytes), None);
    }

    #[test]
    fn pending_between_bytes() {
        let mut d = Utf8Decoder::new();
        assert!(d.is_ready());
        assert_eq!(d.step(0xF0), Step::Pending);
        assert!(d.is_pending());
        assert_eq!(d.step(0x9F), Step::Pending);
        assert_eq!(d.step(0x98), Step::Pending);
        assert_eq!(d.step(0x80), Step::Ready('😀'));
        assert!(d.is_ready() && !d.is_pending() && !d.is_error());
    }

    #[test]
    fn reject_is_observable() {
        let mut d = Utf8Decoder::new();
        assert_eq!(d.step(0xC0), Step::Reject);
        assert!(d.is_error());
        assert_eq!(d.state(), REJECT);
    }

    /// Property: the DFA accepts exactly the byte strings the standard library
    /// considers valid UTF-8, and yields the same scalars.
    #[test]
    fn agrees_with_core_str() {
        #[allow(clippy::needless_pass_by_value)]
        fn prop(bytes: Vec<u8>) -> bool {
            let ours = decode_all(&bytes);
            match core::str::from_utf8(&bytes) {
                Ok(s) => ours == Some(s.chars().collect()),
                Err(_) => ours.is_none(),
            }
        }

        #[cfg(not(miri))]
        let tests = if is_ci::cached() { 20_000 } else { 2_000 };
        #[cfg(miri)]
        let tests = 10;

        QuickCheck::new()
            .tests(tests)
            .quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    /// Random bytes mostly fail on the first byte; build inputs from encoded
    /// scalars instead so multi-byte paths are covered.
    #[test]
    fn decodes_arbitrary_strings() {
        #[allow(clippy::needless_pass_by_value)]
        fn prop(s: alloc::string::String) -> bool {
            decode_all(s.as_bytes()) == Some(s.chars().collect())
        }

        QuickCheck::new()
            .tests(1_000)
            .quickcheck(prop as fn(alloc::string::String) -> bool);
    }
}
