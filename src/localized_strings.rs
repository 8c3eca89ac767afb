// font-collection/src/localized_strings.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tables of strings keyed by locale name, as used for family, face, and informational names.

/// The locale that canonical names are read from and written back to.
pub const EN_US: &str = "en-us";

/// One string with the locale it is written in.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalizedString {
    /// A BCP 47 locale name, or the empty string for locale-neutral entries.
    pub locale: String,
    /// The string itself.
    pub string: String,
}

/// An ordered table of strings keyed by locale name.
///
/// Locale lookups are case-insensitive. Insertion order is preserved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalizedStrings {
    entries: Vec<LocalizedString>,
}

impl LocalizedStrings {
    #[inline]
    pub fn new() -> LocalizedStrings {
        LocalizedStrings::default()
    }

    /// Builds a table holding one string.
    pub fn with_string(locale: &str, string: &str) -> LocalizedStrings {
        let mut strings = LocalizedStrings::new();
        strings.add(locale, string);
        strings
    }

    /// Adds a string for `locale`. Returns false and leaves the table untouched if the locale is
    /// already present.
    pub fn add(&mut self, locale: &str, string: &str) -> bool {
        if self.find_locale_name(locale).is_some() {
            return false;
        }
        self.entries.push(LocalizedString {
            locale: locale.to_owned(),
            string: string.to_owned(),
        });
        true
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the index of the entry for `locale`, compared case-insensitively.
    pub fn find_locale_name(&self, locale: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.locale.eq_ignore_ascii_case(locale))
    }

    #[inline]
    pub fn locale_name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| &*entry.locale)
    }

    #[inline]
    pub fn string(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| &*entry.string)
    }

    /// Returns the string for `locale`, if present.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.find_locale_name(locale).and_then(|index| self.string(index))
    }

    /// Returns the `en-us` string, or the empty string when there is none.
    pub fn en_string(&self) -> &str {
        self.get(EN_US).unwrap_or("")
    }

    /// Replaces the `en-us` string. Does nothing if there is no `en-us` entry.
    pub fn set_en_string(&mut self, string: &str) {
        if let Some(index) = self.find_locale_name(EN_US) {
            self.entries[index].string = string.to_owned();
        }
    }

    /// Whether any string in the table equals `string`, ignoring case.
    pub fn contains_string_ignore_case(&self, string: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| eq_ignore_case(&entry.string, string))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalizedString> {
        self.entries.iter()
    }
}

/// Full Unicode case-insensitive comparison.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
