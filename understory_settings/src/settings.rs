// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The settings registry: groups of sections of settings.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::error::SettingsError;
use crate::index::{GroupIndex, SectionIndex, SettingIndex};
use crate::locale::Locale;
use crate::property::{ChangeRelay, ObserverId, Property, PropertyChanged, PropertyRef};
use crate::text::{self, TextId, Translator, Untranslated};

/// Callback run by [`Settings::reset_group`].
pub type ResetFn = Box<dyn FnMut()>;

/// Identifier given to the default section created for an empty group.
pub const DEFAULT_SECTION_IDENTIFIER: &str = "DEFAULT";

/// Text used for the title of the default section created for an empty group.
pub const DEFAULT_SECTION_TEXT: TextId = TextId::new("Settings", DEFAULT_SECTION_IDENTIFIER);

struct Setting {
    property: PropertyRef,
}

struct Section {
    identifier: Box<[u8]>,
    title: String,
    is_default: bool,
    settings: Vec<Setting>,
}

impl Section {
    fn new(identifier: Box<[u8]>, title: String) -> Self {
        Self {
            identifier,
            title,
            is_default: false,
            settings: Vec::new(),
        }
    }
}

struct Group {
    identifier: Box<[u8]>,
    title: String,
    sections: Vec<Section>,
    reset: Option<ResetFn>,
}

/// An in-memory catalog of an application's settings.
///
/// Settings are organized as groups containing sections containing settings.
/// Each setting is a weak reference to an application-owned [`Property`].
/// The hierarchy only grows: nothing is ever removed, and every mutation
/// returns a positional handle ([`GroupIndex`], [`SectionIndex`],
/// [`SettingIndex`]) used for later queries.
///
/// # Failure model
///
/// Passing an empty or blank identifier, or an index beyond the current
/// count, is a programming error and panics. The `try_add_*` methods are the
/// fallible alternative for identifiers coming from outside the program.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use understory_settings::{Property, Settings};
///
/// struct Units;
/// impl Property for Units {
///     fn name(&self) -> &str { "units" }
/// }
///
/// let units = Rc::new(Units);
/// let mut settings = Settings::new();
///
/// let app = settings.add_group("application");
/// let setting = settings.add_setting(&units, app);
///
/// let section = setting.section();
/// assert!(settings.is_default_group_section(section));
/// assert_eq!(settings.setting_count(section), 1);
/// assert_eq!(settings.property(setting).unwrap().name(), "units");
/// ```
pub struct Settings {
    groups: Vec<Group>,
    by_identifier: HashMap<Box<[u8]>, GroupIndex>,
    locale: Locale,
    translator: Box<dyn Translator>,
    default_section_text: TextId,
    relay: Rc<ChangeRelay>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Creates an empty registry using the default locale and no translation.
    #[must_use]
    pub fn new() -> Self {
        SettingsBuilder::new().build()
    }

    /// Returns a builder for configuring a registry before use.
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    // ---------------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------------

    /// Returns the number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the handles of all groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = GroupIndex> + use<> {
        (0..self.groups.len()).map(GroupIndex::new)
    }

    /// Returns the group with the given identifier, if any.
    #[must_use]
    pub fn find_group(&self, identifier: impl AsRef<[u8]>) -> Option<GroupIndex> {
        self.by_identifier.get(identifier.as_ref()).copied()
    }

    /// Returns the identifier of a group.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn group_identifier(&self, index: GroupIndex) -> &[u8] {
        &self.group(index).identifier
    }

    /// Returns the display title of a group.
    ///
    /// Unless set explicitly, this is the identifier decoded as UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn group_title(&self, index: GroupIndex) -> &str {
        &self.group(index).title
    }

    /// Adds a group, or returns the existing group with the same identifier.
    ///
    /// A new group's title is its identifier decoded as UTF-8.
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is empty or only whitespace.
    pub fn add_group(&mut self, identifier: impl AsRef<[u8]>) -> GroupIndex {
        let identifier = identifier.as_ref();
        assert!(
            text::is_valid_identifier(identifier),
            "invalid identifier {:?}: group identifiers must not be empty or blank",
            text::decode(identifier)
        );
        self.insert_group(identifier)
    }

    /// Fallible form of [`add_group`](Self::add_group).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidIdentifier`] if `identifier` is empty
    /// or only whitespace.
    pub fn try_add_group(
        &mut self,
        identifier: impl AsRef<[u8]>,
    ) -> Result<GroupIndex, SettingsError> {
        let identifier = identifier.as_ref();
        if !text::is_valid_identifier(identifier) {
            return Err(invalid_identifier(identifier));
        }
        Ok(self.insert_group(identifier))
    }

    /// Adds a group keyed by `text.key` and titles it with the translation of
    /// `text`.
    ///
    /// If the group already exists, only its title is updated.
    ///
    /// # Panics
    ///
    /// Panics if `text.key` is empty or only whitespace.
    pub fn add_group_text(&mut self, text: TextId) -> GroupIndex {
        let index = self.add_group(text.key);
        let title = self.translator.translate(text);
        self.set_group_title(index, title);
        index
    }

    /// Replaces the display title of a group.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_group_title(&mut self, index: GroupIndex, title: impl Into<String>) {
        self.group_mut(index).title = title.into();
    }

    /// Sets the callback run by [`reset_group`](Self::reset_group), replacing
    /// any previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_group_reset_function(&mut self, index: GroupIndex, reset: impl FnMut() + 'static) {
        self.group_mut(index).reset = Some(Box::new(reset));
    }

    /// Returns `true` if a reset callback is set for the group.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn has_reset_function(&self, index: GroupIndex) -> bool {
        self.group(index).reset.is_some()
    }

    // ---------------------------------------------------------------------
    // Sections
    // ---------------------------------------------------------------------

    /// Returns the number of sections in a group.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn section_count(&self, index: GroupIndex) -> usize {
        self.group(index).sections.len()
    }

    /// Returns the handles of a group's sections in order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn sections(&self, index: GroupIndex) -> impl Iterator<Item = SectionIndex> + use<> {
        (0..self.section_count(index)).map(move |i| SectionIndex::new(index, i))
    }

    /// Returns the first section of `group` with the given identifier.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    #[must_use]
    pub fn find_section(
        &self,
        group: GroupIndex,
        identifier: impl AsRef<[u8]>,
    ) -> Option<SectionIndex> {
        let identifier = identifier.as_ref();
        self.group(group)
            .sections
            .iter()
            .position(|section| &*section.identifier == identifier)
            .map(|i| SectionIndex::new(group, i))
    }

    /// Returns the identifier of a section.
    ///
    /// The default section inserted in front of existing sections has an
    /// empty identifier.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn section_identifier(&self, index: SectionIndex) -> &[u8] {
        &self.section(index).identifier
    }

    /// Returns the display title of a section.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn section_title(&self, index: SectionIndex) -> &str {
        &self.section(index).title
    }

    /// Returns `true` if the section is its group's default section.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn is_default_group_section(&self, index: SectionIndex) -> bool {
        self.section(index).is_default
    }

    /// Appends a section to a group.
    ///
    /// Section identifiers are not checked for uniqueness: adding the same
    /// identifier twice creates two sections.
    ///
    /// # Panics
    ///
    /// Panics if `identifier` is empty or only whitespace, or if `group` is
    /// out of range.
    pub fn add_section(&mut self, group: GroupIndex, identifier: impl AsRef<[u8]>) -> SectionIndex {
        let identifier = identifier.as_ref();
        assert!(
            text::is_valid_identifier(identifier),
            "invalid identifier {:?}: section identifiers must not be empty or blank",
            text::decode(identifier)
        );
        self.push_section(group, identifier)
    }

    /// Fallible form of [`add_section`](Self::add_section).
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidIdentifier`] if `identifier` is empty
    /// or only whitespace.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    pub fn try_add_section(
        &mut self,
        group: GroupIndex,
        identifier: impl AsRef<[u8]>,
    ) -> Result<SectionIndex, SettingsError> {
        let identifier = identifier.as_ref();
        if !text::is_valid_identifier(identifier) {
            return Err(invalid_identifier(identifier));
        }
        Ok(self.push_section(group, identifier))
    }

    /// Appends a section keyed by `text.key` and titles it with the
    /// translation of `text`.
    ///
    /// # Panics
    ///
    /// Panics if `text.key` is empty or only whitespace, or if `group` is
    /// out of range.
    pub fn add_section_text(&mut self, group: GroupIndex, text: TextId) -> SectionIndex {
        let index = self.add_section(group, text.key);
        let title = self.translator.translate(text);
        self.set_section_title(index, title);
        index
    }

    /// Replaces the display title of a section.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_section_title(&mut self, index: SectionIndex, title: impl Into<String>) {
        self.section_mut(index).title = title.into();
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Returns the number of settings in a section.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn setting_count(&self, index: SectionIndex) -> usize {
        self.section(index).settings.len()
    }

    /// Returns the handles of a section's settings in order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn settings(&self, index: SectionIndex) -> impl Iterator<Item = SettingIndex> + use<> {
        (0..self.setting_count(index)).map(move |i| SettingIndex::new(index, i))
    }

    /// Returns the property of a setting, or `None` if its owner dropped it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn property(&self, index: SettingIndex) -> Option<Rc<dyn Property>> {
        self.setting(index).property.upgrade()
    }

    /// Adds a setting to the default section of `group`.
    ///
    /// The default section is resolved as follows:
    ///
    /// 1. A group without sections gets a new section with identifier
    ///    [`DEFAULT_SECTION_IDENTIFIER`], titled with the translation of the
    ///    configured default section text, marked default.
    /// 2. If the first section is already the default section, it is reused.
    /// 3. Otherwise a blank section (empty identifier and title) is inserted
    ///    at position `0` and marked default.
    ///
    /// In the third case every existing section of the group moves one
    /// position up. Handles obtained earlier for this group's sections (and
    /// their settings) now point one section before their original target;
    /// re-fetch them after this call.
    ///
    /// # Panics
    ///
    /// Panics if `group` is out of range.
    pub fn add_setting(
        &mut self,
        property: impl Into<PropertyRef>,
        group: GroupIndex,
    ) -> SettingIndex {
        let section = self.default_section(group);
        self.add_setting_to_section(property, section)
    }

    /// Appends a setting to the given section.
    ///
    /// The same property may be added more than once.
    ///
    /// # Panics
    ///
    /// Panics if `section` is out of range.
    pub fn add_setting_to_section(
        &mut self,
        property: impl Into<PropertyRef>,
        section: SectionIndex,
    ) -> SettingIndex {
        let settings = &mut self.section_mut(section).settings;
        settings.push(Setting {
            property: property.into(),
        });
        SettingIndex::new(section, settings.len() - 1)
    }

    // ---------------------------------------------------------------------
    // Reset
    // ---------------------------------------------------------------------

    /// Runs the reset callback of a group. Does nothing if none is set.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn reset_group(&mut self, index: GroupIndex) {
        match self.group_mut(index).reset.as_mut() {
            Some(reset) => {
                tracing::trace!(group = index.get(), "resetting group");
                reset();
            }
            None => tracing::trace!(group = index.get(), "group has no reset function"),
        }
    }

    /// Resets every group in ascending index order.
    pub fn reset_all(&mut self) {
        for index in self.groups() {
            self.reset_group(index);
        }
    }

    // ---------------------------------------------------------------------
    // Locale and translation
    // ---------------------------------------------------------------------

    /// Returns the display locale.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Replaces the display locale.
    ///
    /// Titles already stored are left unchanged.
    pub fn set_locale(&mut self, locale: impl Into<Locale>) {
        self.locale = locale.into();
        tracing::debug!(locale = %self.locale, "settings locale changed");
    }

    /// Replaces the translator used by the `*_text` methods.
    pub fn set_translator(&mut self, translator: impl Translator + 'static) {
        self.translator = Box::new(translator);
    }

    // ---------------------------------------------------------------------
    // Change notification
    // ---------------------------------------------------------------------

    /// Returns the relay that carries change notifications.
    ///
    /// Hand a clone to properties (or reset callbacks) so they can report
    /// changes without borrowing the registry.
    #[must_use]
    pub fn relay(&self) -> Rc<ChangeRelay> {
        Rc::clone(&self.relay)
    }

    /// Registers an observer of property changes.
    pub fn subscribe(&self, observer: impl Fn(&PropertyChanged<'_>) + 'static) -> ObserverId {
        self.relay.subscribe(observer)
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.relay.unsubscribe(id)
    }

    /// Reports that `property` changed, notifying every observer.
    ///
    /// No lookup is made to find the settings bound to `property`.
    pub fn on_property_changed(&self, property: &dyn Property) {
        self.relay.notify(property);
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn insert_group(&mut self, identifier: &[u8]) -> GroupIndex {
        if let Some(&index) = self.by_identifier.get(identifier) {
            return index;
        }
        let index = GroupIndex::new(self.groups.len());
        self.groups.push(Group {
            identifier: identifier.into(),
            title: text::decode(identifier),
            sections: Vec::new(),
            reset: None,
        });
        self.by_identifier.insert(identifier.into(), index);
        tracing::debug!(
            group = index.get(),
            identifier = %text::decode(identifier),
            "added settings group"
        );
        index
    }

    fn push_section(&mut self, group: GroupIndex, identifier: &[u8]) -> SectionIndex {
        let sections = &mut self.group_mut(group).sections;
        sections.push(Section::new(identifier.into(), text::decode(identifier)));
        let index = SectionIndex::new(group, sections.len() - 1);
        tracing::debug!(
            group = group.get(),
            section = index.get(),
            identifier = %text::decode(identifier),
            "added settings section"
        );
        index
    }

    fn default_section(&mut self, group: GroupIndex) -> SectionIndex {
        let first_is_default = self
            .group(group)
            .sections
            .first()
            .map(|section| section.is_default);
        match first_is_default {
            Some(true) => {}
            Some(false) => {
                let sections = &mut self.group_mut(group).sections;
                sections.insert(0, Section::new(Box::default(), String::new()));
                sections[0].is_default = true;
                tracing::debug!(
                    group = group.get(),
                    shifted = sections.len() - 1,
                    "inserted default section at position 0"
                );
            }
            None => {
                let title = self.translator.translate(self.default_section_text);
                let section = self.push_section(group, DEFAULT_SECTION_IDENTIFIER.as_bytes());
                let section = self.section_mut(section);
                section.title = title;
                section.is_default = true;
                tracing::debug!(group = group.get(), "created default section");
            }
        }
        SectionIndex::new(group, 0)
    }

    fn group(&self, index: GroupIndex) -> &Group {
        let count = self.groups.len();
        self.groups
            .get(index.get())
            .unwrap_or_else(|| out_of_range("group", index.get(), count))
    }

    fn group_mut(&mut self, index: GroupIndex) -> &mut Group {
        let count = self.groups.len();
        self.groups
            .get_mut(index.get())
            .unwrap_or_else(|| out_of_range("group", index.get(), count))
    }

    fn section(&self, index: SectionIndex) -> &Section {
        let sections = &self.group(index.group()).sections;
        sections
            .get(index.get())
            .unwrap_or_else(|| out_of_range("section", index.get(), sections.len()))
    }

    fn section_mut(&mut self, index: SectionIndex) -> &mut Section {
        let sections = &mut self.group_mut(index.group()).sections;
        let count = sections.len();
        sections
            .get_mut(index.get())
            .unwrap_or_else(|| out_of_range("section", index.get(), count))
    }

    fn setting(&self, index: SettingIndex) -> &Setting {
        let settings = &self.section(index.section()).settings;
        settings
            .get(index.get())
            .unwrap_or_else(|| out_of_range("setting", index.get(), settings.len()))
    }
}

#[cold]
#[track_caller]
fn out_of_range(kind: &str, index: usize, count: usize) -> ! {
    panic!("{kind} index {index} out of range (count is {count})")
}

fn invalid_identifier(identifier: &[u8]) -> SettingsError {
    SettingsError::InvalidIdentifier {
        identifier: text::decode(identifier),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("groups", &self.groups.len())
            .field("locale", &self.locale)
            .field("default_section_text", &self.default_section_text)
            .field("relay", &self.relay)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Settings`].
///
/// # Example
///
/// ```rust
/// use understory_settings::{Locale, Settings, TextId};
///
/// let settings = Settings::builder()
///     .locale(Locale::new("de-DE"))
///     .translator(|text: TextId| match text.key {
///         "DEFAULT" => "Allgemein".to_owned(),
///         other => other.to_owned(),
///     })
///     .build();
///
/// assert_eq!(settings.locale().as_str(), "de-DE");
/// ```
pub struct SettingsBuilder {
    locale: Option<Locale>,
    translator: Box<dyn Translator>,
    default_section_text: TextId,
}

impl SettingsBuilder {
    /// Creates a builder with the default locale and no translation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locale: None,
            translator: Box::new(Untranslated),
            default_section_text: DEFAULT_SECTION_TEXT,
        }
    }

    /// Sets the initial locale. Defaults to [`Locale::default`].
    #[must_use]
    pub fn locale(mut self, locale: impl Into<Locale>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the translator used for [`TextId`] titles.
    #[must_use]
    pub fn translator(mut self, translator: impl Translator + 'static) -> Self {
        self.translator = Box::new(translator);
        self
    }

    /// Sets the text translated for the title of implicitly created default
    /// sections. Defaults to [`DEFAULT_SECTION_TEXT`].
    #[must_use]
    pub fn default_section_text(mut self, text: TextId) -> Self {
        self.default_section_text = text;
        self
    }

    /// Builds the registry.
    #[must_use]
    pub fn build(self) -> Settings {
        Settings {
            groups: Vec::new(),
            by_identifier: HashMap::new(),
            locale: self.locale.unwrap_or_default(),
            translator: self.translator,
            default_section_text: self.default_section_text,
            relay: Rc::new(ChangeRelay::new()),
        }
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SettingsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsBuilder")
            .field("locale", &self.locale)
            .field("default_section_text", &self.default_section_text)
            .finish_non_exhaustive()
    }
}
