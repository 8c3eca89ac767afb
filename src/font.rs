// font-collection/src/font.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A face as a member of a family.

use std::sync::Arc;

use crate::analyzer::InformationalStringId;
use crate::error::{AnalysisError, FontLoadingError};
use crate::factory::Factory;
use crate::family::{FontFamily, FontFamilyData};
use crate::font_data::{FontAxisValue, FontData};
use crate::font_face::FontFace;
use crate::localized_strings::LocalizedStrings;
use crate::metrics::{FontMetrics, Panose};
use crate::properties::{Properties, Stretch, Style, Weight};
use crate::simulation::Simulations;

/// A face of a collection, with its family.
#[derive(Clone, Debug)]
pub struct Font {
    data: Arc<FontData>,
    family: Arc<FontFamilyData>,
}

impl Font {
    #[inline]
    pub(crate) fn new(data: Arc<FontData>, family: Arc<FontFamilyData>) -> Font {
        Font { data, family }
    }

    #[inline]
    pub fn data(&self) -> &Arc<FontData> {
        &self.data
    }

    /// Returns the family this face belongs to.
    #[inline]
    pub fn family(&self) -> FontFamily {
        FontFamily::new(self.family.clone())
    }

    #[inline]
    pub fn properties(&self) -> Properties {
        self.data.properties()
    }

    #[inline]
    pub fn weight(&self) -> Weight {
        self.data.weight()
    }

    #[inline]
    pub fn stretch(&self) -> Stretch {
        self.data.properties().stretch
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.data.style()
    }

    #[inline]
    pub fn simulations(&self) -> Simulations {
        self.data.simulations()
    }

    /// Face names, e.g. "Bold Italic".
    #[inline]
    pub fn face_names(&self) -> &Arc<LocalizedStrings> {
        self.data.face_names()
    }

    #[inline]
    pub fn family_names(&self) -> &Arc<LocalizedStrings> {
        self.data.family_names()
    }

    #[inline]
    pub fn metrics(&self) -> &FontMetrics {
        self.data.metrics()
    }

    #[inline]
    pub fn panose(&self) -> Panose {
        self.data.panose()
    }

    #[inline]
    pub fn is_symbol_font(&self) -> bool {
        self.data.is_symbol_font()
    }

    #[inline]
    pub fn is_monospaced(&self) -> bool {
        self.data.is_monospaced()
    }

    /// Whether the face carries `COLR` and `CPAL` tables.
    #[inline]
    pub fn is_color_font(&self) -> bool {
        self.data.is_color_font()
    }

    pub fn has_character(&self, character: char) -> Result<bool, FontLoadingError> {
        self.data.has_character(character)
    }

    pub fn informational_strings(
        &self,
        id: InformationalStringId,
    ) -> Option<Arc<LocalizedStrings>> {
        self.data.informational_strings(id)
    }

    /// Weight, width, and italic values implied by the face's properties.
    #[inline]
    pub fn axis_values(&self) -> [FontAxisValue; 3] {
        self.data.axis_values()
    }

    /// Ranges of the variation axes. Variable fonts are not supported.
    pub fn axis_ranges(&self) -> Result<Vec<(FontAxisValue, FontAxisValue)>, AnalysisError> {
        Err(AnalysisError::NotImplemented("font axis ranges"))
    }

    /// Whether the glyph data for `character` is available locally.
    pub fn is_character_local(&self, _character: char) -> Result<bool, AnalysisError> {
        Err(AnalysisError::NotImplemented("character locality"))
    }

    /// Returns the face for this font, shared with any other live face of the same file, index,
    /// and simulations.
    pub fn create_font_face(&self, factory: &Factory) -> Result<FontFace, FontLoadingError> {
        factory.create_font_face(
            self.data.file().clone(),
            self.data.face_index(),
            self.data.simulations(),
        )
    }
}
