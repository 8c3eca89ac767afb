// font-collection/src/analyzer.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reads face descriptions, names, character maps, and glyph metrics out of font data.
//!
//! The collection machinery only talks to the [`FontAnalyzer`] trait. [`OpenTypeAnalyzer`] is
//! the default implementation, built on `ttf-parser` plus direct reads of the `OS/2` and `hhea`
//! tables.

use std::collections::BTreeMap;
use ttf_parser::{Face, GlyphId, PlatformId};

use crate::error::FontLoadingError;
use crate::file_type::{FaceType, FileAnalysis, FileType};
use crate::localized_strings::{LocalizedStrings, EN_US};
use crate::metrics::{CaretMetrics, FontMetrics, FontSignature, GlyphMetrics, Panose};
use crate::properties::{Properties, Stretch, Style, Weight};
use crate::table::{self, SfntTableReader};

/// Everything the collection needs to know about one face.
#[derive(Clone, Debug, Default)]
pub struct FaceDescription {
    pub family_names: LocalizedStrings,
    pub face_names: LocalizedStrings,
    /// Style, weight, and stretch as declared by the font's metrics.
    pub properties: Properties,
    pub panose: Panose,
    pub signature: FontSignature,
    pub metrics: FontMetrics,
    pub caret: CaretMetrics,
    pub glyph_count: u16,
    pub is_symbol_font: bool,
    pub is_monospaced: bool,
    /// Both `COLR` and `CPAL` are present.
    pub has_color_tables: bool,
}

/// A Unicode-to-glyph mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterMap(pub BTreeMap<u32, u16>);

impl CharacterMap {
    #[inline]
    pub fn glyph_index(&self, codepoint: u32) -> Option<u16> {
        self.0.get(&codepoint).cloned()
    }

    #[inline]
    pub fn contains(&self, codepoint: u32) -> bool {
        self.0.contains_key(&codepoint)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Identifies an informational string table of a face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InformationalStringId {
    CopyrightNotice,
    VersionStrings,
    Trademark,
    Manufacturer,
    Designer,
    DesignerUrl,
    Description,
    VendorUrl,
    LicenseDescription,
    LicenseInfoUrl,
    Win32FamilyNames,
    Win32SubfamilyNames,
    PreferredFamilyNames,
    PreferredSubfamilyNames,
    SampleText,
    FullName,
    PostscriptName,
    PostscriptCidName,
    WwsFamilyName,
    DesignScriptLanguageTag,
    SupportedScriptLanguageTag,
}

impl InformationalStringId {
    /// Every id, in slot order.
    pub const ALL: [InformationalStringId; 21] = [
        InformationalStringId::CopyrightNotice,
        InformationalStringId::VersionStrings,
        InformationalStringId::Trademark,
        InformationalStringId::Manufacturer,
        InformationalStringId::Designer,
        InformationalStringId::DesignerUrl,
        InformationalStringId::Description,
        InformationalStringId::VendorUrl,
        InformationalStringId::LicenseDescription,
        InformationalStringId::LicenseInfoUrl,
        InformationalStringId::Win32FamilyNames,
        InformationalStringId::Win32SubfamilyNames,
        InformationalStringId::PreferredFamilyNames,
        InformationalStringId::PreferredSubfamilyNames,
        InformationalStringId::SampleText,
        InformationalStringId::FullName,
        InformationalStringId::PostscriptName,
        InformationalStringId::PostscriptCidName,
        InformationalStringId::WwsFamilyName,
        InformationalStringId::DesignScriptLanguageTag,
        InformationalStringId::SupportedScriptLanguageTag,
    ];

    /// Position of this id in [`InformationalStringId::ALL`].
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// The `name` table record id, for ids that are stored there.
    pub fn name_id(self) -> Option<u16> {
        let id = match self {
            InformationalStringId::CopyrightNotice => 0,
            InformationalStringId::VersionStrings => 5,
            InformationalStringId::Trademark => 7,
            InformationalStringId::Manufacturer => 8,
            InformationalStringId::Designer => 9,
            InformationalStringId::DesignerUrl => 12,
            InformationalStringId::Description => 10,
            InformationalStringId::VendorUrl => 11,
            InformationalStringId::LicenseDescription => 13,
            InformationalStringId::LicenseInfoUrl => 14,
            InformationalStringId::Win32FamilyNames => 1,
            InformationalStringId::Win32SubfamilyNames => 2,
            InformationalStringId::PreferredFamilyNames => 16,
            InformationalStringId::PreferredSubfamilyNames => 17,
            InformationalStringId::SampleText => 19,
            InformationalStringId::FullName => 4,
            InformationalStringId::PostscriptName => 6,
            InformationalStringId::PostscriptCidName => 20,
            InformationalStringId::WwsFamilyName => 21,
            // These live in the `meta` table.
            InformationalStringId::DesignScriptLanguageTag
            | InformationalStringId::SupportedScriptLanguageTag => return None,
        };
        Some(id)
    }
}

/// Parses font data on behalf of the collection.
pub trait FontAnalyzer: Send + Sync {
    /// Classifies a whole file.
    fn analyze(&self, data: &[u8]) -> FileAnalysis;

    /// Describes face `index`. Fails with `MissingFamilyName` if the face has no family name.
    fn face_description(&self, data: &[u8], index: u32)
        -> Result<FaceDescription, FontLoadingError>;

    /// Returns the strings for `id`. An empty table means the face has none.
    fn informational_strings(
        &self,
        data: &[u8],
        index: u32,
        id: InformationalStringId,
    ) -> Result<LocalizedStrings, FontLoadingError>;

    fn character_map(&self, data: &[u8], index: u32) -> Result<CharacterMap, FontLoadingError>;

    fn design_glyph_metrics(
        &self,
        data: &[u8],
        index: u32,
        glyph: u16,
    ) -> Result<GlyphMetrics, FontLoadingError>;
}

const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_TYPOGRAPHIC_FAMILY: u16 = 16;
const NAME_ID_TYPOGRAPHIC_SUBFAMILY: u16 = 17;
const NAME_ID_WWS_FAMILY: u16 = 21;
const NAME_ID_WWS_SUBFAMILY: u16 = 22;

const WINDOWS_ENCODING_SYMBOL: u16 = 0;

// Windows language ids with a locale name. Sorted by id.
const WINDOWS_LOCALES: [(u16, &str); 24] = [
    (0x0401, "ar-sa"),
    (0x0404, "zh-tw"),
    (0x0405, "cs-cz"),
    (0x0406, "da-dk"),
    (0x0407, "de-de"),
    (0x0408, "el-gr"),
    (0x0409, EN_US),
    (0x040b, "fi-fi"),
    (0x040c, "fr-fr"),
    (0x040d, "he-il"),
    (0x040e, "hu-hu"),
    (0x0410, "it-it"),
    (0x0411, "ja-jp"),
    (0x0412, "ko-kr"),
    (0x0413, "nl-nl"),
    (0x0414, "nb-no"),
    (0x0415, "pl-pl"),
    (0x0416, "pt-br"),
    (0x0419, "ru-ru"),
    (0x041d, "sv-se"),
    (0x041f, "tr-tr"),
    (0x0804, "zh-cn"),
    (0x0809, "en-gb"),
    (0x0816, "pt-pt"),
];

/// The default analyzer for TrueType and OpenType data.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenTypeAnalyzer;

impl OpenTypeAnalyzer {
    fn parse(data: &[u8], index: u32) -> Result<Face, FontLoadingError> {
        if let Some(count) = ttf_parser::fonts_in_collection(data) {
            if index >= count {
                return Err(FontLoadingError::NoSuchFontInCollection);
            }
        }
        Face::parse(data, index).map_err(|_| FontLoadingError::Parse)
    }
}

impl FontAnalyzer for OpenTypeAnalyzer {
    fn analyze(&self, data: &[u8]) -> FileAnalysis {
        if let Some(count) = ttf_parser::fonts_in_collection(data) {
            return FileAnalysis {
                is_supported: count > 0,
                file_type: FileType::Collection(count),
                face_type: FaceType::OpenTypeCollection,
                face_count: count,
            };
        }

        let face_type = match data.get(0..4) {
            Some(b"OTTO") => FaceType::Cff,
            Some(&[0, 1, 0, 0]) | Some(b"true") => FaceType::TrueType,
            _ => return FileAnalysis::unsupported(),
        };
        if Face::parse(data, 0).is_err() {
            return FileAnalysis::unsupported();
        }
        FileAnalysis {
            is_supported: true,
            file_type: FileType::Single,
            face_type,
            face_count: 1,
        }
    }

    fn face_description(
        &self,
        data: &[u8],
        index: u32,
    ) -> Result<FaceDescription, FontLoadingError> {
        let face = OpenTypeAnalyzer::parse(data, index)?;

        let family_names = preferred_names(
            &face,
            &[NAME_ID_WWS_FAMILY, NAME_ID_TYPOGRAPHIC_FAMILY, NAME_ID_FAMILY],
        );
        if family_names.is_empty() {
            return Err(FontLoadingError::MissingFamilyName);
        }
        let face_names = preferred_names(
            &face,
            &[NAME_ID_WWS_SUBFAMILY, NAME_ID_TYPOGRAPHIC_SUBFAMILY, NAME_ID_SUBFAMILY],
        );

        let style = match face.style() {
            ttf_parser::Style::Normal => Style::Normal,
            ttf_parser::Style::Italic => Style::Italic,
            ttf_parser::Style::Oblique => Style::Oblique,
        };
        let properties = Properties {
            style,
            weight: Weight::from_weight_class(face.weight().to_number()),
            stretch: Stretch::from_width_class(face.width().to_number()),
        };

        let (panose, signature) = read_os2(data, index)?;
        let caret = read_caret(data, index)?;

        let ascent = face.ascender().max(0) as u16;
        let descent = face.descender().min(0).unsigned_abs();
        let (underline_position, underline_thickness) = face
            .underline_metrics()
            .map(|metrics| (metrics.position, metrics.thickness.max(0) as u16))
            .unwrap_or((0, 0));
        let (strikethrough_position, strikethrough_thickness) = face
            .strikeout_metrics()
            .map(|metrics| (metrics.position, metrics.thickness.max(0) as u16))
            .unwrap_or((0, 0));
        let metrics = FontMetrics {
            design_units_per_em: face.units_per_em(),
            ascent,
            descent,
            line_gap: face.line_gap(),
            cap_height: face.capital_height().unwrap_or(0).max(0) as u16,
            x_height: face.x_height().unwrap_or(0).max(0) as u16,
            underline_position,
            underline_thickness,
            strikethrough_position,
            strikethrough_thickness,
        };

        let has_symbol_cmap = face
            .tables()
            .cmap
            .map(|cmap| {
                cmap.subtables.into_iter().any(|subtable| {
                    subtable.platform_id == PlatformId::Windows
                        && subtable.encoding_id == WINDOWS_ENCODING_SYMBOL
                })
            })
            .unwrap_or(false);

        let has_color_tables = SfntTableReader::table_range(data, index, table::COLR)?.is_some()
            && SfntTableReader::table_range(data, index, table::CPAL)?.is_some();

        Ok(FaceDescription {
            family_names,
            face_names,
            properties,
            panose,
            signature,
            metrics,
            caret,
            glyph_count: face.number_of_glyphs(),
            is_symbol_font: has_symbol_cmap || panose.family_kind() == Panose::FAMILY_PICTORIAL,
            is_monospaced: face.is_monospaced(),
            has_color_tables,
        })
    }

    fn informational_strings(
        &self,
        data: &[u8],
        index: u32,
        id: InformationalStringId,
    ) -> Result<LocalizedStrings, FontLoadingError> {
        let face = OpenTypeAnalyzer::parse(data, index)?;
        Ok(match id.name_id() {
            Some(name_id) => preferred_names(&face, &[name_id]),
            None => LocalizedStrings::new(),
        })
    }

    fn character_map(&self, data: &[u8], index: u32) -> Result<CharacterMap, FontLoadingError> {
        let face = OpenTypeAnalyzer::parse(data, index)?;
        let mut map = BTreeMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|codepoint| {
                    if let Some(glyph) = subtable.glyph_index(codepoint) {
                        map.entry(codepoint).or_insert(glyph.0);
                    }
                });
            }
        }
        Ok(CharacterMap(map))
    }

    fn design_glyph_metrics(
        &self,
        data: &[u8],
        index: u32,
        glyph: u16,
    ) -> Result<GlyphMetrics, FontLoadingError> {
        let face = OpenTypeAnalyzer::parse(data, index)?;
        let glyph = GlyphId(glyph);

        let advance_width = face.glyph_hor_advance(glyph).unwrap_or(0) as i32;
        let advance_height = face
            .glyph_ver_advance(glyph)
            .map(|advance| advance as i32)
            .unwrap_or((face.ascender() as i32) - (face.descender() as i32));
        let vertical_origin_y = face
            .glyph_y_origin(glyph)
            .map(|origin| origin as i32)
            .unwrap_or(face.ascender() as i32);

        Ok(match face.glyph_bounding_box(glyph) {
            Some(rect) => {
                let (x_min, x_max) = (rect.x_min as i32, rect.x_max as i32);
                let (y_min, y_max) = (rect.y_min as i32, rect.y_max as i32);
                GlyphMetrics {
                    left_side_bearing: x_min,
                    advance_width: advance_width as u32,
                    right_side_bearing: advance_width - x_max,
                    top_side_bearing: vertical_origin_y - y_max,
                    advance_height: advance_height.max(0) as u32,
                    bottom_side_bearing: advance_height - (vertical_origin_y - y_min),
                    vertical_origin_y,
                }
            }
            // Blank glyphs have no ink: all of the advance is bearing.
            None => GlyphMetrics {
                left_side_bearing: 0,
                advance_width: advance_width as u32,
                right_side_bearing: advance_width,
                top_side_bearing: 0,
                advance_height: advance_height.max(0) as u32,
                bottom_side_bearing: advance_height,
                vertical_origin_y,
            },
        })
    }
}

/// Collects `name` records for the first id in `name_ids` that has any. Windows records are
/// taken before other platforms; the first string seen for a locale wins.
fn preferred_names(face: &Face, name_ids: &[u16]) -> LocalizedStrings {
    for &name_id in name_ids {
        let mut strings = LocalizedStrings::new();
        for pass_windows in [true, false].iter().cloned() {
            for name in face.names() {
                if name.name_id != name_id || (name.platform_id == PlatformId::Windows) != pass_windows
                {
                    continue;
                }
                let locale = match name_locale(name.platform_id, name.language_id) {
                    Some(locale) => locale,
                    None => continue,
                };
                let string = match name.platform_id {
                    PlatformId::Macintosh => decode_mac_roman(name.name),
                    _ => match name.to_string() {
                        Some(string) => string,
                        None => continue,
                    },
                };
                if !string.is_empty() {
                    strings.add(locale, &string);
                }
            }
        }
        if !strings.is_empty() {
            return strings;
        }
    }
    LocalizedStrings::new()
}

fn name_locale(platform: PlatformId, language_id: u16) -> Option<&'static str> {
    match platform {
        PlatformId::Unicode => Some(EN_US),
        PlatformId::Macintosh if language_id == 0 => Some(EN_US),
        PlatformId::Windows => WINDOWS_LOCALES
            .binary_search_by_key(&language_id, |&(id, _)| id)
            .ok()
            .map(|index| WINDOWS_LOCALES[index].1),
        _ => None,
    }
}

// Only the ASCII half of Mac Roman is decoded exactly; the rest maps to the replacement
// character.
fn decode_mac_roman(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&byte| {
            if byte < 0x80 {
                byte as char
            } else {
                char::REPLACEMENT_CHARACTER
            }
        })
        .collect()
}

fn read_os2(data: &[u8], index: u32) -> Result<(Panose, FontSignature), FontLoadingError> {
    let range = match SfntTableReader::table_range(data, index, table::OS_2)? {
        Some(range) => range,
        None => return Ok((Panose::default(), FontSignature::default())),
    };
    let os2 = &data[range];

    let mut panose = Panose::default();
    if let Some(bytes) = os2.get(32..42) {
        panose.0.copy_from_slice(bytes);
    }

    let mut signature = FontSignature::default();
    for (i, range) in signature.unicode_ranges.iter_mut().enumerate() {
        *range = table::read_u32(os2, 42 + i * 4).unwrap_or(0);
    }
    // Code page ranges only exist from version 1 on.
    if table::read_u16(os2, 0)? >= 1 {
        for (i, page) in signature.code_pages.iter_mut().enumerate() {
            *page = table::read_u32(os2, 78 + i * 4).unwrap_or(0);
        }
    }
    Ok((panose, signature))
}

fn read_caret(data: &[u8], index: u32) -> Result<CaretMetrics, FontLoadingError> {
    let range = match SfntTableReader::table_range(data, index, table::HHEA)? {
        Some(range) => range,
        None => return Ok(CaretMetrics::default()),
    };
    let hhea = &data[range];
    Ok(CaretMetrics {
        slope_rise: table::read_i16(hhea, 18)?,
        slope_run: table::read_i16(hhea, 20)?,
        offset: table::read_i16(hhea, 22)?,
    })
}
