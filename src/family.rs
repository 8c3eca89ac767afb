// font-collection/src/family.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Defines a set of faces that vary in weight, width or slope.

use std::sync::Arc;

use crate::error::SelectionError;
use crate::font::Font;
use crate::font_data::FontData;
use crate::localized_strings::LocalizedStrings;
use crate::matching::{self, StyleFilter};
use crate::properties::{Properties, Style};

/// The faces of one family plus the styles they cover.
#[derive(Clone, Debug)]
pub struct FontFamilyData {
    pub(crate) fonts: Vec<Arc<FontData>>,
    family_names: Arc<LocalizedStrings>,
    has_normal_face: bool,
    has_oblique_face: bool,
    has_italic_face: bool,
}

impl FontFamilyData {
    pub fn new(family_names: Arc<LocalizedStrings>) -> FontFamilyData {
        FontFamilyData {
            fonts: vec![],
            family_names,
            has_normal_face: false,
            has_oblique_face: false,
            has_italic_face: false,
        }
    }

    /// Appends a face and records its style.
    pub fn add_font(&mut self, font: Arc<FontData>) {
        match font.style() {
            Style::Normal => self.has_normal_face = true,
            Style::Oblique => self.has_oblique_face = true,
            Style::Italic => self.has_italic_face = true,
        }
        self.fonts.push(font);
    }

    #[inline]
    pub fn family_names(&self) -> &Arc<LocalizedStrings> {
        &self.family_names
    }

    #[inline]
    pub fn fonts(&self) -> &[Arc<FontData>] {
        &self.fonts
    }

    #[inline]
    pub fn has_normal_face(&self) -> bool {
        self.has_normal_face
    }

    #[inline]
    pub fn has_oblique_face(&self) -> bool {
        self.has_oblique_face
    }

    #[inline]
    pub fn has_italic_face(&self) -> bool {
        self.has_italic_face
    }

    /// The face closest to `properties`. The earliest face wins a full tie.
    pub fn first_matching_font(
        &self,
        properties: &Properties,
    ) -> Result<&Arc<FontData>, SelectionError> {
        let vectors: Vec<_> = self.fonts.iter().map(|font| *font.property_vector()).collect();
        let index = matching::find_first_match(&vectors, properties)?;
        Ok(&self.fonts[index])
    }

    /// The faces admitted by the style filter for `properties.style`, best match first.
    pub fn matching_fonts(&self, properties: &Properties) -> Vec<Arc<FontData>> {
        let filter = StyleFilter::new(
            properties.style,
            self.has_normal_face,
            self.has_oblique_face,
            self.has_italic_face,
        );
        let mut fonts: Vec<_> = self
            .fonts
            .iter()
            .filter(|font| filter.accepts(font.style()))
            .cloned()
            .collect();
        matching::sort_by_match(&mut fonts, properties, |font| *font.property_vector());
        fonts
    }
}

/// A family in a collection.
#[derive(Clone, Debug)]
pub struct FontFamily {
    data: Arc<FontFamilyData>,
}

impl FontFamily {
    #[inline]
    pub(crate) fn new(data: Arc<FontFamilyData>) -> FontFamily {
        FontFamily { data }
    }

    #[inline]
    pub fn data(&self) -> &Arc<FontFamilyData> {
        &self.data
    }

    /// Returns the localized names of this family.
    #[inline]
    pub fn family_names(&self) -> &Arc<LocalizedStrings> {
        self.data.family_names()
    }

    /// Returns the number of faces, simulations included.
    #[inline]
    pub fn font_count(&self) -> usize {
        self.data.fonts.len()
    }

    /// Returns true if and only if this family is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.fonts.is_empty()
    }

    pub fn font(&self, index: usize) -> Result<Font, SelectionError> {
        match self.data.fonts.get(index) {
            Some(font) => Ok(Font::new(font.clone(), self.data.clone())),
            None => Err(SelectionError::OutOfRange {
                index,
                count: self.data.fonts.len(),
            }),
        }
    }

    /// Performs face matching and returns the best face.
    pub fn first_matching_font(&self, properties: &Properties) -> Result<Font, SelectionError> {
        let font = self.data.first_matching_font(properties)?;
        Ok(Font::new(font.clone(), self.data.clone()))
    }

    /// Returns the faces compatible with the requested style, best match first.
    pub fn matching_fonts(&self, properties: &Properties) -> FontList {
        FontList {
            fonts: self.data.matching_fonts(properties),
            family: self.data.clone(),
        }
    }
}

/// An ordered selection of faces from one family.
#[derive(Clone, Debug)]
pub struct FontList {
    fonts: Vec<Arc<FontData>>,
    family: Arc<FontFamilyData>,
}

impl FontList {
    #[inline]
    pub fn count(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn font(&self, index: usize) -> Result<Font, SelectionError> {
        match self.fonts.get(index) {
            Some(font) => Ok(Font::new(font.clone(), self.family.clone())),
            None => Err(SelectionError::OutOfRange {
                index,
                count: self.fonts.len(),
            }),
        }
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = Font> + 'a {
        self.fonts
            .iter()
            .map(move |font| Font::new(font.clone(), self.family.clone()))
    }
}
