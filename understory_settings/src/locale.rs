// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display locale carried by a registry.

use alloc::string::String;
use core::fmt;

/// A locale tag such as `"en-US"`, used by consumers that format values.
///
/// The registry stores the tag as given; no validation is performed.
///
/// ```rust
/// use understory_settings::Locale;
///
/// let locale = Locale::new("fr-CA");
/// assert_eq!(locale.as_str(), "fr-CA");
/// assert_eq!(Locale::from_posix("pt_BR.UTF-8"), Locale::new("pt-BR"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Locale(String);

impl Locale {
    /// The tag of the portable `"C"` locale.
    pub const C: &'static str = "C";

    /// Creates a locale from a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Creates the portable `"C"` locale.
    #[must_use]
    pub fn c() -> Self {
        Self::new(Self::C)
    }

    /// Converts a POSIX locale name (`language[_territory][.codeset][@modifier]`)
    /// into a tag, e.g. `de_DE.UTF-8@euro` becomes `de-DE`.
    ///
    /// Empty names and `POSIX` map to the `"C"` locale.
    #[must_use]
    pub fn from_posix(name: &str) -> Self {
        let name = name.split(['.', '@']).next().unwrap_or_default();
        if name.is_empty() || name == "POSIX" {
            return Self::c();
        }
        Self(name.replace('_', "-"))
    }

    /// Reads the locale of the current process from `LC_ALL`, `LC_MESSAGES`
    /// and `LANG`, in that order. Falls back to the `"C"` locale.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn system() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .map_or_else(Self::c, |value| Self::from_posix(&value))
    }

    /// Returns the locale tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The system locale with `std`, otherwise the `"C"` locale.
impl Default for Locale {
    fn default() -> Self {
        #[cfg(feature = "std")]
        {
            Self::system()
        }
        #[cfg(not(feature = "std"))]
        {
            Self::c()
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}
