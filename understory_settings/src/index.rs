// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional handles into a [`Settings`](crate::Settings) hierarchy.
//!
//! Each handle is a plain offset plus the handle of its parent:
//! a [`SectionIndex`] embeds its [`GroupIndex`], and a [`SettingIndex`]
//! embeds its [`SectionIndex`].
//!
//! ## Stability
//!
//! Nothing is ever removed from a registry, so a handle stays valid for the
//! lifetime of the registry with one exception: adding a setting to a group
//! whose first section is not the default section inserts a new default
//! section at position `0`. Every [`SectionIndex`] (and [`SettingIndex`])
//! previously obtained for that group now points one section earlier than
//! intended. See [`Settings::add_setting`](crate::Settings::add_setting).

use core::fmt;

/// Position of a group within a [`Settings`](crate::Settings) registry.
///
/// ```rust
/// use understory_settings::GroupIndex;
///
/// let index = GroupIndex::new(3);
/// assert_eq!(index.get(), 3);
/// assert!(GroupIndex::new(1) < index);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupIndex(usize);

impl GroupIndex {
    /// Creates a handle for the group at `index`.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the group.
    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Debug for GroupIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupIndex").field(&self.0).finish()
    }
}

impl fmt::Display for GroupIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a section within its group.
///
/// Ordering compares the owning group first, then the position.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionIndex {
    group: GroupIndex,
    index: usize,
}

impl SectionIndex {
    /// Creates a handle for the section at `index` inside `group`.
    #[must_use]
    #[inline]
    pub const fn new(group: GroupIndex, index: usize) -> Self {
        Self { group, index }
    }

    /// Returns the owning group.
    #[must_use]
    #[inline]
    pub const fn group(self) -> GroupIndex {
        self.group
    }

    /// Returns the position of the section within its group.
    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.index
    }
}

impl fmt::Debug for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionIndex")
            .field("group", &self.group.0)
            .field("index", &self.index)
            .finish()
    }
}

impl fmt::Display for SectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.index)
    }
}

/// Position of a setting within its section.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettingIndex {
    section: SectionIndex,
    index: usize,
}

impl SettingIndex {
    /// Creates a handle for the setting at `index` inside `section`.
    #[must_use]
    #[inline]
    pub const fn new(section: SectionIndex, index: usize) -> Self {
        Self { section, index }
    }

    /// Returns the owning section.
    #[must_use]
    #[inline]
    pub const fn section(self) -> SectionIndex {
        self.section
    }

    /// Returns the group owning this setting's section.
    #[must_use]
    #[inline]
    pub const fn group(self) -> GroupIndex {
        self.section.group
    }

    /// Returns the position of the setting within its section.
    #[must_use]
    #[inline]
    pub const fn get(self) -> usize {
        self.index
    }
}

impl fmt::Debug for SettingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingIndex")
            .field("group", &self.section.group.0)
            .field("section", &self.section.index)
            .field("index", &self.index)
            .finish()
    }
}

impl fmt::Display for SettingIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn handles_embed_their_parents() {
        let group = GroupIndex::new(2);
        let section = SectionIndex::new(group, 1);
        let setting = SettingIndex::new(section, 5);

        assert_eq!(section.group(), group);
        assert_eq!(setting.section(), section);
        assert_eq!(setting.group(), group);
        assert_eq!(setting.get(), 5);
    }

    #[test]
    fn ordering_is_parent_first() {
        let a = SectionIndex::new(GroupIndex::new(0), 9);
        let b = SectionIndex::new(GroupIndex::new(1), 0);
        assert!(a < b);

        let c = SettingIndex::new(a, 3);
        let d = SettingIndex::new(b, 0);
        assert!(c < d);
    }

    #[test]
    fn debug_and_display() {
        let setting = SettingIndex::new(SectionIndex::new(GroupIndex::new(1), 2), 3);
        assert_eq!(format!("{}", setting), "1.2.3");
        assert_eq!(
            format!("{:?}", setting),
            "SettingIndex { group: 1, section: 2, index: 3 }"
        );
        assert_eq!(format!("{:?}", GroupIndex::new(4)), "GroupIndex(4)");
    }

    #[test]
    fn handle_size() {
        use core::mem::size_of;
        assert_eq!(size_of::<GroupIndex>(), size_of::<usize>());
        assert_eq!(size_of::<SettingIndex>(), 3 * size_of::<usize>());
    }
}
