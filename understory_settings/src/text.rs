// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers and translatable display text.
//!
//! Groups and sections are keyed by plain byte strings. Display titles are
//! separate: by default a title is the identifier decoded as UTF-8, and a
//! [`TextId`] can be passed instead to have the title resolved through a
//! [`Translator`].

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;

/// Returns `true` if `identifier` may name a group or a section.
///
/// An identifier must be non-empty and must contain at least one byte that is
/// not C-locale whitespace (space, `\t`, `\n`, `\v`, `\f`, `\r`).
///
/// ```rust
/// use understory_settings::is_valid_identifier;
///
/// assert!(is_valid_identifier(b"application"));
/// assert!(!is_valid_identifier(b""));
/// assert!(!is_valid_identifier(b" \t\r\n"));
/// ```
#[must_use]
pub fn is_valid_identifier(identifier: &[u8]) -> bool {
    identifier.iter().any(|&b| !is_space(b))
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Decodes an identifier into a display string, replacing invalid UTF-8.
pub(crate) fn decode(identifier: &[u8]) -> String {
    String::from_utf8_lossy(identifier).into_owned()
}

/// A translatable piece of text: a lookup key scoped by a context.
///
/// The `key` doubles as the storage identifier when a `TextId` is used to
/// create a group or section.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextId {
    /// Translation context, usually the name of the owning component.
    pub context: &'static str,
    /// Source text, also used as the identifier.
    pub key: &'static str,
}

impl TextId {
    /// Creates a text identifier.
    #[must_use]
    pub const fn new(context: &'static str, key: &'static str) -> Self {
        Self { context, key }
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.context, self.key)
    }
}

/// Resolves a [`TextId`] to display text.
///
/// Any `Fn(TextId) -> String` closure is a translator:
///
/// ```rust
/// use understory_settings::{TextId, Translator};
///
/// let shout = |text: TextId| text.key.to_uppercase();
/// assert_eq!(shout.translate(TextId::new("Demo", "units")), "UNITS");
/// ```
pub trait Translator {
    /// Returns the display text for `text`.
    fn translate(&self, text: TextId) -> String;
}

impl<F> Translator for F
where
    F: Fn(TextId) -> String,
{
    fn translate(&self, text: TextId) -> String {
        self(text)
    }
}

/// A [`Translator`] that returns the source text unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, text: TextId) -> String {
        text.key.to_owned()
    }
}
