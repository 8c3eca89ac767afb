// font-collection/src/simulation.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Synthesizes bold and oblique faces that a family lacks.

use std::sync::Arc;

use crate::family::FontFamilyData;
use crate::names;
use crate::properties::Style;

bitflags! {
    /// Algorithmic emboldening and slanting applied on top of a face's own design.
    #[derive(Default)]
    pub struct Simulations: u8 {
        const BOLD = 0x01;
        const OBLIQUE = 0x02;
    }
}

/// Heaviest weights that still get a bold simulation.
const BOLD_SIMULATION_MIN_WEIGHT: u16 = 350;
const BOLD_SIMULATION_MAX_WEIGHT: u16 = 550;

const BOLD_GDI_WEIGHT_ADJUSTMENT: i32 = 151;

/// For each group of faces sharing style and stretch, adds a bold simulation of the heaviest
/// face if that face is between Semi Light and Medium.
///
/// Every face is examined at most once, including faces added by earlier runs.
pub fn add_bold_simulations(family: &mut FontFamilyData) {
    let mut i = 0;
    while i < family.fonts.len() {
        let font = family.fonts[i].clone();
        let mut heaviest = i;
        let mut weight = font.weight();

        if font.mark_bold_tested() {
            i += 1;
            continue;
        }

        for j in i + 1..family.fonts.len() {
            let candidate = &family.fonts[j];
            if candidate.is_bold_tested() {
                continue;
            }
            let (properties, reference) = (candidate.properties(), font.properties());
            if properties.style != reference.style || properties.stretch != reference.stretch {
                continue;
            }
            if candidate.weight() > weight {
                weight = candidate.weight();
                heaviest = j;
            }
            candidate.mark_bold_tested();
        }

        if weight.0 >= BOLD_SIMULATION_MIN_WEIGHT && weight.0 <= BOLD_SIMULATION_MAX_WEIGHT {
            let source = family.fonts[heaviest].clone();
            let face_name = names::simulated_bold_face_name(source.face_names().en_string());
            let mut bold = source.simulated(Simulations::BOLD, &face_name);
            bold.mark_bold_tested();
            bold.gdi_weight += BOLD_GDI_WEIGHT_ADJUSTMENT;
            debug!(
                "adding bold simulation {:?} of {:?}",
                face_name,
                source.face_names().en_string()
            );
            family.add_font(Arc::new(bold));
        }
        i += 1;
    }
}

/// For each group of faces sharing weight and stretch, adds an oblique simulation of the
/// regular face if the group has no oblique face.
pub fn add_oblique_simulations(family: &mut FontFamilyData) {
    let mut i = 0;
    while i < family.fonts.len() {
        let font = family.fonts[i].clone();
        if font.mark_oblique_tested() {
            i += 1;
            continue;
        }

        let (mut regular, mut oblique) = (None, None);
        match font.style() {
            Style::Normal => regular = Some(i),
            Style::Oblique => oblique = Some(i),
            Style::Italic => {}
        }

        for j in i + 1..family.fonts.len() {
            let candidate = &family.fonts[j];
            if candidate.is_oblique_tested() {
                continue;
            }
            let (properties, reference) = (candidate.properties(), font.properties());
            if properties.weight != reference.weight || properties.stretch != reference.stretch {
                continue;
            }
            candidate.mark_oblique_tested();
            match candidate.style() {
                Style::Normal if regular.is_none() => regular = Some(j),
                Style::Oblique if oblique.is_none() => oblique = Some(j),
                _ => {}
            }
            if regular.is_some() && oblique.is_some() {
                break;
            }
        }

        if let (Some(regular), None) = (regular, oblique) {
            let source = family.fonts[regular].clone();
            let face_name = names::simulated_oblique_face_name(source.face_names().en_string());
            let mut slanted = source.simulated(Simulations::OBLIQUE, &face_name);
            slanted.mark_oblique_tested();
            slanted.gdi_italic = true;
            debug!(
                "adding oblique simulation {:?} of {:?}",
                face_name,
                source.face_names().en_string()
            );
            family.add_font(Arc::new(slanted));
        }
        i += 1;
    }
}
