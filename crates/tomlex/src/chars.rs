//! Codepoint classification for the TOML grammar.
//!
//! Every predicate takes a single Unicode scalar value and answers a yes/no
//! question about it. None of them allocate or touch global state; values
//! outside the ranges a predicate names simply return `false`.
//!
//! The bare-key predicates additionally consult Unicode letter, number and
//! combining-mark properties through [`UnicodeProperties`]. The unsuffixed
//! forms use [`DefaultProperties`]; the `_with` forms accept any other
//! implementation.

use crate::unicode::{DefaultProperties, UnicodeProperties};

/// Returns `true` for horizontal whitespace.
///
/// These are the Unicode whitespace characters that are *not* line breaks:
/// tab, space, no-break space (U+00A0), ogham space mark (U+1680), the
/// U+2000..=U+200A block of typographic spaces, narrow no-break space
/// (U+202F), medium mathematical space (U+205F) and ideographic space
/// (U+3000).
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | ' ' | '\u{A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
    )
}

/// Returns `true` for vertical whitespace.
///
/// Line feed, vertical tab and form feed always count, as do next line
/// (U+0085), line separator (U+2028) and paragraph separator (U+2029).
/// Carriage return is included only when `CR` is `true`: a grammar looking
/// for the *start* of a line ending wants it, position tracking (which must
/// count CRLF once) does not.
#[must_use]
pub const fn is_line_break<const CR: bool>(c: char) -> bool {
    let low_range_end = if CR { '\r' } else { '\u{C}' };
    (c >= '\n' && c <= low_range_end) || matches!(c, '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// [`is_line_break`] with carriage return counted as a line break.
#[must_use]
pub const fn is_line_break_cr(c: char) -> bool {
    is_line_break::<true>(c)
}

/// [`is_line_break`] with carriage return *not* counted as a line break.
#[must_use]
pub const fn is_line_break_no_cr(c: char) -> bool {
    is_line_break::<false>(c)
}

/// Returns `true` for the two string delimiters, `"` and `'`.
#[must_use]
pub const fn is_string_delimiter(c: char) -> bool {
    matches!(c, '"' | '\'')
}

/// Returns `true` for `a..=z` and `A..=Z`.
#[must_use]
pub const fn is_ascii_letter(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z')
}

/// Returns `true` for `0` and `1`.
#[must_use]
pub const fn is_binary_digit(c: char) -> bool {
    matches!(c, '0' | '1')
}

/// Returns `true` for `0..=7`.
#[must_use]
pub const fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

/// Returns `true` for `0..=9`.
#[must_use]
pub const fn is_decimal_digit(c: char) -> bool {
    matches!(c, '0'..='9')
}

/// Returns `true` for `0..=9`, `a..=f` and `A..=F`.
#[must_use]
pub const fn is_hex_digit(c: char) -> bool {
    matches!(c, 'a'..='f' | 'A'..='F') || is_decimal_digit(c)
}

/// Returns `true` if `c` may begin an unquoted key.
#[must_use]
pub fn is_bare_key_start_character(c: char) -> bool {
    is_bare_key_start_character_with::<DefaultProperties>(c)
}

/// Returns `true` if `c` may appear anywhere in an unquoted key.
#[must_use]
pub fn is_bare_key_character(c: char) -> bool {
    is_bare_key_character_with::<DefaultProperties>(c)
}

/// [`is_bare_key_start_character`] backed by a caller-supplied property
/// table.
#[must_use]
pub fn is_bare_key_start_character_with<P: UnicodeProperties>(c: char) -> bool {
    is_ascii_letter(c)
        || is_decimal_digit(c)
        || matches!(c, '-' | '_' | '+')
        || P::is_letter(c)
        || P::is_number(c)
}

/// [`is_bare_key_character`] backed by a caller-supplied property table.
#[must_use]
pub fn is_bare_key_character_with<P: UnicodeProperties>(c: char) -> bool {
    is_bare_key_start_character_with::<P>(c) || P::is_combining_mark(c)
}

/// Returns `true` if `c` ends a bare value such as a number, boolean or
/// date: any line break or whitespace, or one of `]`, `}`, `,` and `#`.
#[must_use]
pub const fn is_value_terminator(c: char) -> bool {
    is_line_break_cr(c) || is_whitespace(c) || matches!(c, ']' | '}' | ',' | '#')
}
