// font-collection/src/font_data.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-face data shared by fonts, families, and collections.

use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::analyzer::{CharacterMap, FontAnalyzer, InformationalStringId};
use crate::error::FontLoadingError;
use crate::file::{FontFile, FontFileStream};
use crate::file_type::FaceType;
use crate::localized_strings::{LocalizedStrings, EN_US};
use crate::metrics::{CaretMetrics, FontMetrics, FontSignature, Panose};
use crate::names;
use crate::properties::{Properties, PropertyVector, Style, Weight};
use crate::simulation::Simulations;

pub const AXIS_WEIGHT: u32 = u32::from_be_bytes(*b"wght");
pub const AXIS_WIDTH: u32 = u32::from_be_bytes(*b"wdth");
pub const AXIS_ITALIC: u32 = u32::from_be_bytes(*b"ital");

/// The value of one design axis of a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontAxisValue {
    pub tag: u32,
    pub value: f32,
}

/// Everything known about one face of one file, before any `FontFace` is created.
///
/// Simulated faces are separate `FontData` values that share the file and family names of the
/// face they were derived from.
pub struct FontData {
    file: FontFile,
    face_index: u32,
    face_type: FaceType,
    simulations: Simulations,
    properties: Properties,
    property_vector: PropertyVector,
    panose: Panose,
    signature: FontSignature,
    metrics: FontMetrics,
    caret: CaretMetrics,
    glyph_count: u16,
    is_symbol_font: bool,
    is_monospaced: bool,
    is_color_font: bool,
    pub(crate) gdi_weight: i32,
    pub(crate) gdi_italic: bool,
    family_names: Arc<LocalizedStrings>,
    face_names: Arc<LocalizedStrings>,
    analyzer: Arc<dyn FontAnalyzer>,
    info_strings: [OnceLock<Option<Arc<LocalizedStrings>>>; 21],
    character_map: OnceLock<Arc<CharacterMap>>,
    bold_tested: AtomicBool,
    oblique_tested: AtomicBool,
}

impl FontData {
    /// Reads face `face_index` of `stream` and resolves its canonical family and face names.
    pub fn new(
        file: FontFile,
        stream: &Arc<dyn FontFileStream>,
        face_index: u32,
        face_type: FaceType,
        analyzer: Arc<dyn FontAnalyzer>,
    ) -> Result<FontData, FontLoadingError> {
        let description = analyzer.face_description(stream.bytes(), face_index)?;
        if description.family_names.is_empty() {
            return Err(FontLoadingError::MissingFamilyName);
        }

        let mut family_names = description.family_names;
        let mut face_names = description.face_names;
        let mut properties = description.properties;
        let declared_style = properties.style;

        let family = family_names.en_string().to_owned();
        let face = face_names.en_string().to_owned();
        if let Some(resolved) = names::apply_differentiation_rules(&family, &face, &mut properties)
        {
            family_names.set_en_string(&resolved.family);
            face_names.set_en_string(&resolved.face);
        }

        Ok(FontData {
            file,
            face_index,
            face_type,
            simulations: Simulations::empty(),
            property_vector: PropertyVector::new(&properties),
            gdi_weight: description.properties.weight.0 as i32,
            gdi_italic: declared_style == Style::Italic,
            properties,
            panose: description.panose,
            signature: description.signature,
            metrics: description.metrics,
            caret: description.caret,
            glyph_count: description.glyph_count,
            is_symbol_font: description.is_symbol_font,
            is_monospaced: description.is_monospaced,
            is_color_font: description.has_color_tables,
            family_names: Arc::new(family_names),
            face_names: Arc::new(face_names),
            analyzer,
            info_strings: Default::default(),
            character_map: OnceLock::new(),
            bold_tested: AtomicBool::new(false),
            oblique_tested: AtomicBool::new(false),
        })
    }

    /// Derives a simulated face named `face_name` with `simulation` added.
    ///
    /// The clone keeps the file, family names, and test marks of `self`. Informational strings
    /// are read again on demand.
    pub fn simulated(&self, simulation: Simulations, face_name: &str) -> FontData {
        let mut properties = self.properties;
        if simulation == Simulations::BOLD {
            properties.weight = Weight::BOLD;
        } else if simulation == Simulations::OBLIQUE {
            properties.style = Style::Oblique;
        }

        FontData {
            file: self.file.clone(),
            face_index: self.face_index,
            face_type: self.face_type,
            simulations: self.simulations | simulation,
            properties,
            property_vector: PropertyVector::new(&properties),
            panose: self.panose,
            signature: self.signature,
            metrics: self.metrics,
            caret: self.caret,
            glyph_count: self.glyph_count,
            is_symbol_font: self.is_symbol_font,
            is_monospaced: self.is_monospaced,
            is_color_font: self.is_color_font,
            gdi_weight: self.gdi_weight,
            gdi_italic: self.gdi_italic,
            family_names: self.family_names.clone(),
            face_names: Arc::new(LocalizedStrings::with_string(EN_US, face_name)),
            analyzer: self.analyzer.clone(),
            info_strings: Default::default(),
            character_map: OnceLock::new(),
            bold_tested: AtomicBool::new(self.is_bold_tested()),
            oblique_tested: AtomicBool::new(self.is_oblique_tested()),
        }
    }

    #[inline]
    pub fn file(&self) -> &FontFile {
        &self.file
    }

    #[inline]
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    #[inline]
    pub fn face_type(&self) -> FaceType {
        self.face_type
    }

    #[inline]
    pub fn simulations(&self) -> Simulations {
        self.simulations
    }

    #[inline]
    pub fn properties(&self) -> Properties {
        self.properties
    }

    #[inline]
    pub fn property_vector(&self) -> &PropertyVector {
        &self.property_vector
    }

    #[inline]
    pub fn weight(&self) -> Weight {
        self.properties.weight
    }

    #[inline]
    pub fn style(&self) -> Style {
        self.properties.style
    }

    #[inline]
    pub fn panose(&self) -> Panose {
        self.panose
    }

    #[inline]
    pub fn signature(&self) -> FontSignature {
        self.signature
    }

    #[inline]
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    #[inline]
    pub fn caret(&self) -> CaretMetrics {
        self.caret
    }

    #[inline]
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    #[inline]
    pub fn is_symbol_font(&self) -> bool {
        self.is_symbol_font
    }

    #[inline]
    pub fn is_monospaced(&self) -> bool {
        self.is_monospaced
    }

    #[inline]
    pub fn is_color_font(&self) -> bool {
        self.is_color_font
    }

    /// The weight reported to GDI-style consumers. Bold simulations add 151.
    #[inline]
    pub fn gdi_weight(&self) -> i32 {
        self.gdi_weight
    }

    #[inline]
    pub fn gdi_italic(&self) -> bool {
        self.gdi_italic
    }

    #[inline]
    pub fn family_names(&self) -> &Arc<LocalizedStrings> {
        &self.family_names
    }

    #[inline]
    pub fn face_names(&self) -> &Arc<LocalizedStrings> {
        &self.face_names
    }

    #[inline]
    pub fn analyzer(&self) -> &Arc<dyn FontAnalyzer> {
        &self.analyzer
    }

    /// Weight, width, and italic axis values derived from the properties.
    pub fn axis_values(&self) -> [FontAxisValue; 3] {
        [
            FontAxisValue {
                tag: AXIS_WEIGHT,
                value: self.properties.weight.0 as f32,
            },
            FontAxisValue {
                tag: AXIS_WIDTH,
                value: self.properties.stretch.width_percent(),
            },
            FontAxisValue {
                tag: AXIS_ITALIC,
                value: if self.properties.style == Style::Italic {
                    1.0
                } else {
                    0.0
                },
            },
        ]
    }

    /// Reads the strings for `id` on first request. Returns `None` when the face has none.
    ///
    /// Read failures are logged and not cached.
    pub fn informational_strings(
        &self,
        id: InformationalStringId,
    ) -> Option<Arc<LocalizedStrings>> {
        let slot = &self.info_strings[id.slot()];
        if let Some(strings) = slot.get() {
            return strings.clone();
        }

        let strings = self.file.stream().and_then(|stream| {
            self.analyzer
                .informational_strings(stream.bytes(), self.face_index, id)
        });
        match strings {
            Ok(strings) => {
                let strings = if strings.is_empty() {
                    None
                } else {
                    Some(Arc::new(strings))
                };
                slot.get_or_init(|| strings).clone()
            }
            Err(error) => {
                warn!("failed to read {:?} strings: {}", id, error);
                None
            }
        }
    }

    /// The face's character map, built on first request.
    pub fn character_map(&self) -> Result<Arc<CharacterMap>, FontLoadingError> {
        if let Some(map) = self.character_map.get() {
            return Ok(map.clone());
        }
        let stream = self.file.stream()?;
        let map = Arc::new(
            self.analyzer
                .character_map(stream.bytes(), self.face_index)?,
        );
        Ok(self.character_map.get_or_init(|| map).clone())
    }

    pub fn has_character(&self, character: char) -> Result<bool, FontLoadingError> {
        Ok(self.character_map()?.contains(character as u32))
    }

    /// Whether this is face `face_index` of `file` with exactly `simulations`.
    pub fn is_same_face(&self, file: &FontFile, face_index: u32, simulations: Simulations) -> bool {
        self.face_index == face_index && self.simulations == simulations && self.file.is_same(file)
    }

    /// Marks this face as examined for bold synthesis. Returns whether it already was.
    #[inline]
    pub(crate) fn mark_bold_tested(&self) -> bool {
        self.bold_tested.swap(true, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn is_bold_tested(&self) -> bool {
        self.bold_tested.load(Ordering::Relaxed)
    }

    /// Marks this face as examined for oblique synthesis. Returns whether it already was.
    #[inline]
    pub(crate) fn mark_oblique_tested(&self) -> bool {
        self.oblique_tested.swap(true, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn is_oblique_tested(&self) -> bool {
        self.oblique_tested.load(Ordering::Relaxed)
    }
}

impl Debug for FontData {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family_names.en_string())
            .field("face", &self.face_names.en_string())
            .field("face_index", &self.face_index)
            .field("simulations", &self.simulations)
            .field("properties", &self.properties)
            .finish()
    }
}
