// font-collection/src/properties.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Properties that specify which face in a family to use: style, weight, and stretch.

use std::fmt::{self, Debug, Display, Formatter};

/// Properties that specify which face in a family to use: style, weight, and stretch.
///
/// This object supports a method chaining style for idiomatic initialization; e.g.
///
///     # use font_collection::properties::{Properties, Style};
///     println!("{:?}", Properties::new().style(Style::Italic));
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Properties {
    /// The slant classification.
    pub style: Style,
    /// The boldness classification.
    pub weight: Weight,
    /// The width classification.
    pub stretch: Stretch,
}

impl Properties {
    /// Initializes a property set to its default values: normal style, normal weight, and normal
    /// stretch.
    #[inline]
    pub fn new() -> Properties {
        Properties::default()
    }

    /// Sets the value of the style property and returns this property set for method chaining.
    #[inline]
    pub fn style(&mut self, style: Style) -> &mut Properties {
        self.style = style;
        self
    }

    /// Sets the value of the weight property and returns this property set for method chaining.
    #[inline]
    pub fn weight(&mut self, weight: Weight) -> &mut Properties {
        self.weight = weight;
        self
    }

    /// Sets the value of the stretch property and returns this property set for method chaining.
    #[inline]
    pub fn stretch(&mut self, stretch: Stretch) -> &mut Properties {
        self.stretch = stretch;
        self
    }
}

/// Slant classification of a face.
///
/// The discriminants are significant: matching breaks ties in favor of the larger value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Style {
    /// A face that is neither italic nor obliqued.
    Normal = 0,
    /// A typically-sloped version of the regular face.
    Oblique = 1,
    /// A form that is generally cursive in nature.
    Italic = 2,
}

impl Default for Style {
    fn default() -> Style {
        Style::Normal
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// The degree of blackness or stroke thickness of a face, from 1 to 999 with 400 as normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(pub u16);

impl Default for Weight {
    #[inline]
    fn default() -> Weight {
        Weight::NORMAL
    }
}

impl Weight {
    /// Thin weight (100), the thinnest named value.
    pub const THIN: Weight = Weight(100);
    /// Extra light weight (200).
    pub const EXTRA_LIGHT: Weight = Weight(200);
    /// Light weight (300).
    pub const LIGHT: Weight = Weight(300);
    /// Semi light weight (350).
    pub const SEMI_LIGHT: Weight = Weight(350);
    /// Normal (400).
    pub const NORMAL: Weight = Weight(400);
    /// Medium weight (500, higher than normal).
    pub const MEDIUM: Weight = Weight(500);
    /// Demi bold weight (600).
    pub const DEMI_BOLD: Weight = Weight(600);
    /// Bold weight (700).
    pub const BOLD: Weight = Weight(700);
    /// Extra-bold weight (800).
    pub const EXTRA_BOLD: Weight = Weight(800);
    /// Black weight (900).
    pub const BLACK: Weight = Weight(900);
    /// Extra-black weight (950), the thickest named value.
    pub const EXTRA_BLACK: Weight = Weight(950);

    /// Clamps an OS/2 `usWeightClass` into the valid range.
    #[inline]
    pub fn from_weight_class(class: u16) -> Weight {
        Weight(class.max(1).min(999))
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Width classification of a face, a 9-point scale with `Normal` in the middle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Stretch {
    /// Ultra-condensed width (50%), the narrowest possible.
    UltraCondensed = 1,
    /// Extra-condensed width (62.5%).
    ExtraCondensed = 2,
    /// Condensed width (75%).
    Condensed = 3,
    /// Semi-condensed width (87.5%).
    SemiCondensed = 4,
    /// Normal width (100%).
    Normal = 5,
    /// Semi-expanded width (112.5%).
    SemiExpanded = 6,
    /// Expanded width (125%).
    Expanded = 7,
    /// Extra-expanded width (150%).
    ExtraExpanded = 8,
    /// Ultra-expanded width (200%), the widest possible.
    UltraExpanded = 9,
}

impl Default for Stretch {
    #[inline]
    fn default() -> Stretch {
        Stretch::Normal
    }
}

impl Stretch {
    /// All stretch values, narrowest first.
    pub const MAPPING: [Stretch; 9] = [
        Stretch::UltraCondensed,
        Stretch::ExtraCondensed,
        Stretch::Condensed,
        Stretch::SemiCondensed,
        Stretch::Normal,
        Stretch::SemiExpanded,
        Stretch::Expanded,
        Stretch::ExtraExpanded,
        Stretch::UltraExpanded,
    ];

    /// Maps an OS/2 `usWidthClass` to a stretch value. Undefined classes map to `Normal`.
    pub fn from_width_class(class: u16) -> Stretch {
        match class {
            1..=9 => Stretch::MAPPING[class as usize - 1],
            _ => Stretch::Normal,
        }
    }

    /// The numeric value of this stretch, 1 to 9.
    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    /// The nominal width as a percentage of normal.
    pub fn width_percent(self) -> f32 {
        match self {
            Stretch::UltraCondensed => 50.0,
            Stretch::ExtraCondensed => 62.5,
            Stretch::Condensed => 75.0,
            Stretch::SemiCondensed => 87.5,
            Stretch::Normal => 100.0,
            Stretch::SemiExpanded => 112.5,
            Stretch::Expanded => 125.0,
            Stretch::ExtraExpanded => 150.0,
            Stretch::UltraExpanded => 200.0,
        }
    }
}

impl Display for Stretch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// The scaled (stretch, style, weight) vector that face matching measures distances in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PropertyVector {
    /// `(stretch - Normal) * 11`
    pub stretch: f32,
    /// `style * 7`
    pub style: f32,
    /// `(weight - Normal) / 100 * 5`
    pub weight: f32,
}

impl PropertyVector {
    /// Computes the vector for a property set.
    pub fn new(properties: &Properties) -> PropertyVector {
        PropertyVector {
            stretch: (properties.stretch.value() as i32 - Stretch::Normal.value() as i32) as f32
                * 11.0,
            style: properties.style as u8 as f32 * 7.0,
            weight: (properties.weight.0 as i32 - Weight::NORMAL.0 as i32) as f32 / 100.0 * 5.0,
        }
    }

    /// Squared Euclidean distance. No square root is taken.
    #[inline]
    pub fn distance_squared(&self, other: &PropertyVector) -> f32 {
        let stretch = self.stretch - other.stretch;
        let style = self.style - other.style;
        let weight = self.weight - other.weight;
        stretch * stretch + style * style + weight * weight
    }

    #[inline]
    pub fn dot(&self, other: &PropertyVector) -> f32 {
        self.stretch * other.stretch + self.style * other.style + self.weight * other.weight
    }
}
