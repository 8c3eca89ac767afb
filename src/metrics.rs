// font-collection/src/metrics.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Various metrics that apply to the entire face and to single glyphs.
//!
//! All values are in font units.

/// Various metrics that apply to the entire face.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// The number of font units per em.
    ///
    /// Font sizes are usually expressed in pixels per em; e.g. `12px` means 12 pixels per em.
    pub design_units_per_em: u16,

    /// The maximum amount the font rises above the baseline.
    pub ascent: u16,

    /// The maximum amount the font descends below the baseline, as a positive distance.
    pub descent: u16,

    /// Distance between baselines, in addition to ascent and descent.
    pub line_gap: i16,

    /// The approximate amount that uppercase letters rise above the baseline.
    pub cap_height: u16,

    /// The approximate amount that non-ascending lowercase letters rise above the baseline.
    pub x_height: u16,

    /// The suggested distance of the top of the underline from the baseline (negative values
    /// indicate below baseline).
    pub underline_position: i16,

    /// A suggested value for the underline thickness.
    pub underline_thickness: u16,

    /// The suggested distance of the top of the strikethrough from the baseline.
    pub strikethrough_position: i16,

    /// A suggested value for the strikethrough thickness.
    pub strikethrough_thickness: u16,
}

/// The slope of the caret, from `hhea`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaretMetrics {
    pub slope_rise: i16,
    pub slope_run: i16,
    pub offset: i16,
}

impl Default for CaretMetrics {
    /// An upright caret.
    fn default() -> CaretMetrics {
        CaretMetrics {
            slope_rise: 1,
            slope_run: 0,
            offset: 0,
        }
    }
}

/// Design metrics of one glyph.
///
/// A record that is all zero is treated as not yet computed by the face metrics cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub left_side_bearing: i32,
    pub advance_width: u32,
    pub right_side_bearing: i32,
    pub top_side_bearing: i32,
    pub advance_height: u32,
    pub bottom_side_bearing: i32,
    pub vertical_origin_y: i32,
}

impl GlyphMetrics {
    #[inline]
    pub(crate) fn is_zero(&self) -> bool {
        *self == GlyphMetrics::default()
    }

    /// Whether the glyph has any ink, judged from its horizontal bearings.
    #[inline]
    pub fn has_contours(&self) -> bool {
        self.advance_width as i32 - self.left_side_bearing - self.right_side_bearing > 0
    }
}

/// Unicode ranges and code pages from `OS/2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontSignature {
    pub unicode_ranges: [u32; 4],
    pub code_pages: [u32; 2],
}

/// The 10-byte PANOSE classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Panose(pub [u8; 10]);

impl Panose {
    /// PANOSE family kind "Latin Pictorial".
    pub const FAMILY_PICTORIAL: u8 = 5;

    #[inline]
    pub fn family_kind(&self) -> u8 {
        self.0[0]
    }
}
