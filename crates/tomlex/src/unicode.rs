//! Unicode property queries consumed by the bare-key predicates.
//!
//! The grammar only needs three yes/no questions answered about non-ASCII
//! codepoints. [`DefaultProperties`] answers them from the general category
//! tables of `unicode-properties`:
//!
//! - letter: `Lu`, `Ll`, `Lt`, `Lm` and `Lo`;
//! - number: `Nd`, `Nl` and `No`;
//! - combining mark: `Mn` and `Mc`. Enclosing marks (`Me`) do not count.
//!
//! Parsers pinned to a different Unicode version can plug in their own
//! tables through the `_with` predicates in [`crate::chars`].

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

/// Query contract for the Unicode properties used by bare-key classification.
pub trait UnicodeProperties {
    /// Returns `true` for Unicode letters.
    fn is_letter(c: char) -> bool;

    /// Returns `true` for Unicode numbers.
    fn is_number(c: char) -> bool;

    /// Returns `true` for combining marks (spacing and non-spacing).
    fn is_combining_mark(c: char) -> bool;
}

/// Property queries backed by the `unicode-properties` general categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProperties;

impl UnicodeProperties for DefaultProperties {
    #[inline]
    fn is_letter(c: char) -> bool {
        c.general_category_group() == GeneralCategoryGroup::Letter
    }

    #[inline]
    fn is_number(c: char) -> bool {
        c.general_category_group() == GeneralCategoryGroup::Number
    }

    #[inline]
    fn is_combining_mark(c: char) -> bool {
        matches!(
            c.general_category(),
            GeneralCategory::NonspacingMark | GeneralCategory::SpacingMark
        )
    }
}
