// font-collection/src/names.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parses style, stretch, and weight words out of free-text family and face names.
//!
//! A name such as "Arial Narrow Bold Italic" is split into words, the attribute words are
//! removed by ordered pattern groups, and what remains is the canonical family name.

use std::ops::Range;

use crate::properties::{Properties, Stretch, Style, Weight};

/// A one- or two-word attribute pattern. Two-word patterns are stored in reading order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamePattern {
    pub first: &'static str,
    pub second: Option<&'static str>,
}

const fn one(first: &'static str) -> NamePattern {
    NamePattern {
        first,
        second: None,
    }
}

const fn two(first: &'static str, second: &'static str) -> NamePattern {
    NamePattern {
        first,
        second: Some(second),
    }
}

/// Style groups. Italic spellings are tried before oblique ones.
pub const STYLE_GROUPS: &[(Style, &[NamePattern])] = &[
    (
        Style::Italic,
        &[one("ita"), one("ital"), one("italic"), one("cursive"), one("kursiv")],
    ),
    (
        Style::Oblique,
        &[
            one("inclined"),
            one("oblique"),
            one("backslanted"),
            one("backslant"),
            one("slanted"),
        ],
    ),
];

/// Stretch groups, most extreme first. No group maps to `Normal`.
pub const STRETCH_GROUPS: &[(Stretch, &[NamePattern])] = &[
    (
        Stretch::UltraCondensed,
        &[
            two("extra", "compressed"),
            two("ext", "compressed"),
            two("ultra", "compressed"),
            two("ultra", "condensed"),
            two("ultra", "cond"),
        ],
    ),
    (
        Stretch::ExtraCondensed,
        &[
            one("compressed"),
            two("extra", "condensed"),
            two("ext", "condensed"),
            two("extra", "cond"),
            two("ext", "cond"),
        ],
    ),
    (
        Stretch::SemiCondensed,
        &[
            one("narrow"),
            one("compact"),
            two("semi", "condensed"),
            two("semi", "cond"),
        ],
    ),
    (
        Stretch::SemiExpanded,
        &[one("wide"), two("semi", "expanded"), two("semi", "extended")],
    ),
    (
        Stretch::ExtraExpanded,
        &[
            two("extra", "expanded"),
            two("ext", "expanded"),
            two("extra", "extended"),
            two("ext", "extended"),
        ],
    ),
    (
        Stretch::UltraExpanded,
        &[two("ultra", "expanded"), two("ultra", "extended")],
    ),
    (Stretch::Condensed, &[one("condensed"), one("cond")]),
    (Stretch::Expanded, &[one("expanded"), one("extended")]),
];

/// Weight groups. Two-word compounds come before the single words they contain.
pub const WEIGHT_GROUPS: &[(Weight, &[NamePattern])] = &[
    (
        Weight::THIN,
        &[two("extra", "thin"), two("ext", "thin"), two("ultra", "thin")],
    ),
    (
        Weight::EXTRA_LIGHT,
        &[two("extra", "light"), two("ext", "light"), two("ultra", "light")],
    ),
    (Weight::SEMI_LIGHT, &[two("semi", "light")]),
    (Weight::DEMI_BOLD, &[two("semi", "bold"), two("demi", "bold")]),
    (
        Weight::EXTRA_BOLD,
        &[two("extra", "bold"), two("ext", "bold"), two("ultra", "bold")],
    ),
    (
        Weight::EXTRA_BLACK,
        &[two("extra", "black"), two("ext", "black"), two("ultra", "black")],
    ),
    (Weight::BOLD, &[one("bold")]),
    (Weight::THIN, &[one("thin")]),
    (Weight::LIGHT, &[one("light")]),
    (Weight::MEDIUM, &[one("medium")]),
    (Weight::BLACK, &[one("black"), one("heavy"), one("nord")]),
    (Weight::DEMI_BOLD, &[one("demi")]),
    (Weight::EXTRA_BOLD, &[one("ultra")]),
];

/// Weight words stripped from a face name before " Bold" is appended to it.
pub const WEIGHT_SIMULATION_PATTERNS: &[NamePattern] = &[
    two("extra", "light"),
    two("ext", "light"),
    two("ultra", "light"),
    two("semi", "light"),
    two("semi", "bold"),
    two("demi", "bold"),
    one("bold"),
    one("thin"),
    one("light"),
    one("medium"),
    one("demi"),
];

/// Words that mean "the regular face", searched for in this order.
pub const REGULAR_TERMS: [&str; 5] = ["Book", "Normal", "Regular", "Roman", "Upright"];

const KNOWN_WEIGHTS: [(Weight, &str); 10] = [
    (Weight::THIN, "Thin"),
    (Weight::EXTRA_LIGHT, "Extra Light"),
    (Weight::LIGHT, "Light"),
    (Weight::SEMI_LIGHT, "Semi Light"),
    (Weight::MEDIUM, "Medium"),
    (Weight::DEMI_BOLD, "Demi Bold"),
    (Weight::BOLD, "Bold"),
    (Weight::EXTRA_BOLD, "Extra Bold"),
    (Weight::BLACK, "Black"),
    (Weight::EXTRA_BLACK, "Extra Black"),
];

#[inline]
fn is_separator(byte: u8) -> bool {
    byte == b' ' || byte == b'.' || byte == b'-' || byte == b'_'
}

#[derive(Clone, Copy, Debug)]
struct Token {
    start: usize,
    len: usize,
    // Includes the separators that follow the word.
    full_len: usize,
}

/// A name split into words, with attribute words removed as they are matched.
///
/// Words are kept last word first, so that a two-word pattern finds its second word and then
/// looks at the word before it.
#[derive(Clone, Debug)]
pub struct NameTokens<'a> {
    name: &'a str,
    tokens: Vec<Token>,
    consumed: Vec<bool>,
}

impl<'a> NameTokens<'a> {
    /// Splits `name` on space, dot, hyphen, and underscore.
    pub fn new(name: &'a str) -> NameTokens<'a> {
        let bytes = name.as_bytes();
        let mut tokens = vec![];
        let mut position = 0;
        while position < bytes.len() {
            let start = position;
            while position < bytes.len() && !is_separator(bytes[position]) {
                position += 1;
            }
            let len = position - start;
            while position < bytes.len() && is_separator(bytes[position]) {
                position += 1;
            }
            tokens.push(Token {
                start,
                len,
                full_len: position - start,
            });
        }
        tokens.reverse();

        let consumed = vec![false; tokens.len()];
        NameTokens {
            name,
            tokens,
            consumed,
        }
    }

    /// The number of words not yet removed.
    pub fn len(&self) -> usize {
        self.consumed.iter().filter(|consumed| !**consumed).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The remaining words, last word first.
    pub fn words(&self) -> Vec<&'a str> {
        self.live()
            .into_iter()
            .map(|index| self.word(index))
            .collect()
    }

    /// Reassembles the remaining words in reading order. Separators between words are kept; the
    /// separators after the final word are dropped.
    pub fn to_name_string(&self) -> String {
        let live = self.live();
        let mut name = String::with_capacity(self.name.len());
        for (position, &index) in live.iter().rev().enumerate() {
            let token = &self.tokens[index];
            let len = if position + 1 == live.len() {
                token.len
            } else {
                token.full_len
            };
            name.push_str(&self.name[token.start..token.start + len]);
        }
        name
    }

    /// Tries `patterns` in order and removes the words matched by the first one that matches.
    /// Returns the matched text.
    pub fn match_patterns(&mut self, patterns: &[NamePattern]) -> Option<&'a str> {
        for pattern in patterns {
            if let Some(span) = self.match_pattern(pattern) {
                return Some(&self.name[span]);
            }
        }
        None
    }

    pub fn extract_style(&mut self, style: Style) -> (Style, Option<&'a str>) {
        self.extract(STYLE_GROUPS, style)
    }

    pub fn extract_stretch(&mut self, stretch: Stretch) -> (Stretch, Option<&'a str>) {
        self.extract(STRETCH_GROUPS, stretch)
    }

    pub fn extract_weight(&mut self, weight: Weight) -> (Weight, Option<&'a str>) {
        self.extract(WEIGHT_GROUPS, weight)
    }

    fn extract<T>(&mut self, groups: &[(T, &[NamePattern])], current: T) -> (T, Option<&'a str>)
    where
        T: Copy,
    {
        for &(value, patterns) in groups {
            if let Some(matched) = self.match_patterns(patterns) {
                return (value, Some(matched));
            }
        }
        (current, None)
    }

    fn match_pattern(&mut self, pattern: &NamePattern) -> Option<Range<usize>> {
        let first = pattern.first.as_bytes();
        let live = self.live();

        for (position, &index) in live.iter().enumerate() {
            let token = self.tokens[index];
            let text = self.text(&token);

            let second = match pattern.second {
                None => {
                    if text.len() == first.len() && text.eq_ignore_ascii_case(first) {
                        self.consumed[index] = true;
                        return Some(token.start..token.start + token.len);
                    }
                    continue;
                }
                Some(second) => second.as_bytes(),
            };

            if text.len() < second.len() {
                continue;
            }

            // Both parts fused into one word, e.g. "ExtraCondensed".
            if text.len() == first.len() + second.len() {
                let (head, tail) = text.split_at(first.len());
                if head.eq_ignore_ascii_case(first) && tail.eq_ignore_ascii_case(second) {
                    self.consumed[index] = true;
                    return Some(token.start..token.start + token.len);
                }
                continue;
            }

            if text.len() != second.len() {
                continue;
            }

            let previous_index = match live.get(position + 1) {
                Some(&previous_index) => previous_index,
                None => continue,
            };
            let previous = self.tokens[previous_index];
            let previous_text = self.text(&previous);
            if previous_text.len() != first.len()
                || !text.eq_ignore_ascii_case(second)
                || !previous_text.eq_ignore_ascii_case(first)
            {
                continue;
            }

            self.consumed[index] = true;
            self.consumed[previous_index] = true;
            return Some(previous.start..token.start + token.len);
        }
        None
    }

    fn live(&self) -> Vec<usize> {
        (0..self.tokens.len())
            .filter(|&index| !self.consumed[index])
            .collect()
    }

    #[inline]
    fn text(&self, token: &Token) -> &'a [u8] {
        &self.name.as_bytes()[token.start..token.start + token.len]
    }

    #[inline]
    fn word(&self, index: usize) -> &'a str {
        let token = &self.tokens[index];
        &self.name[token.start..token.start + token.len]
    }
}

/// Removes the rightmost occurrence of the first regular-equivalent term found in `face_name`,
/// compared case-insensitively. Returns the term that was removed.
pub fn remove_regular_term(face_name: &mut String) -> Option<&'static str> {
    for &term in REGULAR_TERMS.iter() {
        let pattern = term.as_bytes();
        let found = {
            let bytes = face_name.as_bytes();
            if pattern.len() > bytes.len() {
                continue;
            }
            (0..=bytes.len() - pattern.len())
                .rev()
                .find(|&start| bytes[start..start + pattern.len()].eq_ignore_ascii_case(pattern))
        };
        if let Some(start) = found {
            face_name.replace_range(start..start + pattern.len(), "");
            return Some(term);
        }
    }
    None
}

/// Decides whether a weight read from the name overrides the weight declared by the font's
/// metrics. The metrics value wins unless the name clearly names a different band.
pub fn reconcile_weight(extracted: Weight, metrics: Weight) -> Weight {
    if extracted == metrics {
        return metrics;
    }

    let (weight, font_weight) = (extracted.0 as i32, metrics.0 as i32);
    let normal = Weight::NORMAL.0 as i32;
    let medium = Weight::MEDIUM.0 as i32;
    let bold = Weight::BOLD.0 as i32;

    if !(weight < normal && font_weight < normal)
        && !(weight > medium && font_weight > medium)
        && !((weight == normal && font_weight == medium)
            || (weight == medium && font_weight == normal))
        && !((weight - font_weight).abs() <= 150
            && font_weight != normal
            && font_weight != medium
            && font_weight != bold)
    {
        extracted
    } else {
        metrics
    }
}

/// A stretch read from the name overrides the metrics stretch when the metrics stretch is
/// normal or leans the other way.
pub fn reconcile_stretch(extracted: Stretch, metrics: Stretch) -> Stretch {
    if extracted != metrics
        && (metrics == Stretch::Normal
            || (metrics < Stretch::Normal && extracted > Stretch::Normal)
            || (metrics > Stretch::Normal && extracted < Stretch::Normal))
    {
        extracted
    } else {
        metrics
    }
}

/// The display name of a named weight band.
pub fn known_weight_name(weight: Weight) -> Option<&'static str> {
    KNOWN_WEIGHTS
        .binary_search_by_key(&weight, |&(weight, _)| weight)
        .ok()
        .map(|index| KNOWN_WEIGHTS[index].1)
}

/// The display name of a non-normal stretch.
pub fn stretch_name(stretch: Stretch) -> Option<&'static str> {
    match stretch {
        Stretch::UltraCondensed => Some("Ultra Condensed"),
        Stretch::ExtraCondensed => Some("Extra Condensed"),
        Stretch::Condensed => Some("Condensed"),
        Stretch::SemiCondensed => Some("Semi Condensed"),
        Stretch::Normal => None,
        Stretch::SemiExpanded => Some("Semi Expanded"),
        Stretch::Expanded => Some("Expanded"),
        Stretch::ExtraExpanded => Some("Extra Expanded"),
        Stretch::UltraExpanded => Some("Ultra Expanded"),
    }
}

/// Canonical family and face names produced by [`apply_differentiation_rules`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedNames {
    pub family: String,
    pub face: String,
}

/// Moves attribute words out of the family name and into the face name.
///
/// `properties` holds the values declared by the font's metrics on entry and the reconciled
/// values on return, whether or not the names change. Returns `None` when the canonical family
/// name equals `family`.
pub fn apply_differentiation_rules(
    family: &str,
    face: &str,
    properties: &mut Properties,
) -> Option<ResolvedNames> {
    let mut face_name = face.trim().to_owned();
    let regular_term = remove_regular_term(&mut face_name);

    let mut combined = family.trim().to_owned();
    if !face_name.is_empty() {
        combined.push(' ');
        combined.push_str(&face_name);
    }

    let mut tokens = NameTokens::new(&combined);
    let (style, style_token) = tokens.extract_style(properties.style);
    properties.style = style;
    let (stretch, stretch_token) = tokens.extract_stretch(properties.stretch);
    let (weight, weight_token) = tokens.extract_weight(properties.weight);
    properties.weight = reconcile_weight(weight, properties.weight);
    properties.stretch = reconcile_stretch(stretch, properties.stretch);

    let resolved_family = tokens.to_name_string();
    if resolved_family == family {
        return None;
    }

    let weight_name = match weight_token {
        Some(token) => token.to_owned(),
        None if properties.weight == Weight::NORMAL => String::new(),
        None => match known_weight_name(properties.weight) {
            Some(name) => name.to_owned(),
            None => format!("W{}", properties.weight.0),
        },
    };
    let stretch_name = match stretch_token {
        Some(token) => token.to_owned(),
        None => stretch_name(properties.stretch).unwrap_or("").to_owned(),
    };
    let style_name = match (style_token, properties.style) {
        (Some(token), _) => token,
        (None, Style::Normal) => "",
        (None, Style::Italic) => "Italic",
        (None, Style::Oblique) => "Oblique",
    };

    let face = if weight_name.is_empty() && stretch_name.is_empty() && style_name.is_empty() {
        regular_term.unwrap_or("Regular").to_owned()
    } else {
        [&*stretch_name, &*weight_name, style_name]
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    };

    trace!("resolved family {:?}, face {:?}", resolved_family, face);
    Some(ResolvedNames {
        family: resolved_family,
        face,
    })
}

/// The face name of a bold simulation derived from a face called `face`.
pub fn simulated_bold_face_name(face: &str) -> String {
    let mut initial = face.to_owned();
    remove_regular_term(&mut initial);

    let mut tokens = NameTokens::new(&initial);
    tokens.match_patterns(WEIGHT_SIMULATION_PATTERNS);
    let mut name = tokens.to_name_string();
    if !name.is_empty() {
        name.push(' ');
    }
    name.push_str("Bold");
    name
}

/// The face name of an oblique simulation derived from a face called `face`.
pub fn simulated_oblique_face_name(face: &str) -> String {
    let mut name = face.to_owned();
    remove_regular_term(&mut name);
    if !name.is_empty() {
        name.push(' ');
    }
    name.push_str("Oblique");
    name
}
