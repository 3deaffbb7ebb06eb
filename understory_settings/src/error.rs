// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recoverable errors for the fallible registry entry points.

use alloc::string::String;

/// Error returned by [`Settings::try_add_group`](crate::Settings::try_add_group)
/// and [`Settings::try_add_section`](crate::Settings::try_add_section).
///
/// The panicking counterparts treat the same conditions as contract violations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The identifier was empty or contained only whitespace.
    #[error("invalid identifier {identifier:?}: must not be empty or blank")]
    InvalidIdentifier {
        /// The rejected identifier, decoded lossily as UTF-8.
        identifier: String,
    },
}
