// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Settings: a hierarchical catalog of application settings.
//!
//! This crate organizes an application's configurable properties into
//! **groups**, **sections** and **settings**, the shape most preference
//! dialogs present. It is bookkeeping only:
//!
//! - It does not own property values. A setting is a weak reference to a
//!   [`Property`] owned by the application.
//! - It does not load or save values; persistence is left to the caller.
//! - It does not translate text itself. Titles are plain strings, optionally
//!   resolved from a [`TextId`] through a caller-supplied [`Translator`].
//!
//! ## Concepts
//!
//! - A [`Settings`] registry holds groups, keyed by unique byte-string
//!   identifiers. Adding an existing identifier returns the existing group.
//! - A group holds sections. Section identifiers are *not* checked for
//!   uniqueness.
//! - A group may have one **default section**, always at position `0`, which
//!   receives settings added without naming a section.
//! - Each group may carry a reset callback, run by [`Settings::reset_group`]
//!   and [`Settings::reset_all`].
//! - A [`ChangeRelay`] forwards "property changed" notifications from
//!   properties to observers such as a UI.
//!
//! All navigation uses positional handles ([`GroupIndex`], [`SectionIndex`],
//! [`SettingIndex`]). Nothing is ever removed, so handles stay valid, with one
//! documented exception: [`Settings::add_setting`] may insert a default
//! section in front of a group's existing sections.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_settings::{Property, Settings};
//!
//! struct Toggle {
//!     name: &'static str,
//!     value: Cell<bool>,
//! }
//!
//! impl Property for Toggle {
//!     fn name(&self) -> &str {
//!         self.name
//!     }
//! }
//!
//! let antialiasing = Rc::new(Toggle { name: "antialiasing", value: Cell::new(true) });
//!
//! let mut settings = Settings::new();
//! let graphics = settings.add_group("graphics");
//! let quality = settings.add_section(graphics, "quality");
//! settings.add_setting_to_section(&antialiasing, quality);
//!
//! // Reset restores the value the application considers default.
//! let target = Rc::clone(&antialiasing);
//! settings.set_group_reset_function(graphics, move || target.value.set(true));
//!
//! antialiasing.value.set(false);
//! settings.reset_all();
//! assert!(antialiasing.value.get());
//! ```
//!
//! ## Failure model
//!
//! Empty or blank identifiers and out-of-range handles are programming
//! errors and panic. [`Settings::try_add_group`] and
//! [`Settings::try_add_section`] return [`SettingsError`] instead.
//!
//! ## Logging
//!
//! Structural changes, resets and relayed notifications are reported through
//! [`tracing`] at `debug` and `trace` level. No subscriber is installed.
//!
//! ## Threading
//!
//! A registry is meant to live on one thread, typically the UI thread that
//! also owns the properties. It is neither `Send` nor `Sync`.
//!
//! This crate is `no_std` and uses `alloc`. The default `std` feature adds
//! [`Locale::system`].

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
mod index;
mod locale;
mod property;
mod settings;
mod text;

pub use error::SettingsError;
pub use index::{GroupIndex, SectionIndex, SettingIndex};
pub use locale::Locale;
pub use property::{ChangeRelay, ObserverId, Property, PropertyChanged, PropertyKey, PropertyRef};
pub use settings::{
    DEFAULT_SECTION_IDENTIFIER, DEFAULT_SECTION_TEXT, ResetFn, Settings, SettingsBuilder,
};
pub use text::{TextId, Translator, Untranslated, is_valid_identifier};
