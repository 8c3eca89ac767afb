// font-collection/src/matching.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Ranks the faces of a family against a requested weight, stretch, and style.
//!
//! Faces are compared by the squared distance between their property vectors and the requested
//! one, then by dot product, then by raw stretch, style, and weight.

use float_ord::FloatOrd;
use std::cmp::Ordering;

use crate::error::SelectionError;
use crate::properties::{Properties, PropertyVector, Style};

/// Whether `next` is a strictly better match for `requested` than `current`.
pub fn is_better_match(
    next: &PropertyVector,
    current: &PropertyVector,
    requested: &PropertyVector,
) -> bool {
    let current_distance = current.distance_squared(requested);
    let next_distance = next.distance_squared(requested);
    match FloatOrd(next_distance).cmp(&FloatOrd(current_distance)) {
        Ordering::Less => return true,
        Ordering::Greater => return false,
        Ordering::Equal => {}
    }

    let current_product = current.dot(requested);
    let next_product = next.dot(requested);
    match FloatOrd(next_product).cmp(&FloatOrd(current_product)) {
        Ordering::Greater => return true,
        Ordering::Less => return false,
        Ordering::Equal => {}
    }

    let tie_breaks = [
        (next.stretch, current.stretch),
        (next.style, current.style),
        (next.weight, current.weight),
    ];
    for &(next, current) in tie_breaks.iter() {
        match FloatOrd(next).cmp(&FloatOrd(current)) {
            Ordering::Greater => return true,
            Ordering::Less => return false,
            Ordering::Equal => {}
        }
    }

    // Full match, no reason to prefer the new candidate.
    false
}

/// Returns the index of the best candidate, scanning in order and keeping the earliest one on
/// a full tie.
pub fn find_first_match(
    candidates: &[PropertyVector],
    query: &Properties,
) -> Result<usize, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::NoFont);
    }

    let requested = PropertyVector::new(query);
    let mut best = 0;
    for index in 1..candidates.len() {
        if is_better_match(&candidates[index], &candidates[best], &requested) {
            best = index;
        }
    }
    Ok(best)
}

/// Sorts `items` best match first.
///
/// This is a bubble sort that stops scanning past the last swap of the previous pass. A pair is
/// swapped only when the later item is strictly better, so equally good items keep their order.
pub fn sort_by_match<T, F>(items: &mut [T], query: &Properties, vector: F)
where
    F: Fn(&T) -> PropertyVector,
{
    if items.len() < 2 {
        return;
    }

    let requested = PropertyVector::new(query);
    let mut bound = items.len() - 1;
    loop {
        let mut last_swap = bound;
        for index in 0..bound {
            if is_better_match(&vector(&items[index + 1]), &vector(&items[index]), &requested) {
                items.swap(index, index + 1);
                last_swap = index;
            }
        }
        if last_swap == bound {
            break;
        }
        bound = last_swap;
    }
}

/// Which faces a style request admits, given the styles a family is known to have.
///
/// A Normal request admits Normal and Italic faces; an Oblique or Italic request admits Oblique
/// and Italic faces. The filter only applies when the family has at least one face it would
/// admit, otherwise every face is a candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleFilter {
    requested: Style,
    active: bool,
}

impl StyleFilter {
    pub fn new(
        requested: Style,
        has_normal_face: bool,
        has_oblique_face: bool,
        has_italic_face: bool,
    ) -> StyleFilter {
        let active = match requested {
            Style::Normal => has_normal_face || has_italic_face,
            Style::Oblique | Style::Italic => has_oblique_face || has_italic_face,
        };
        StyleFilter { requested, active }
    }

    pub fn accepts(&self, style: Style) -> bool {
        if !self.active {
            return true;
        }
        match self.requested {
            Style::Normal => style == Style::Normal || style == Style::Italic,
            Style::Oblique | Style::Italic => style == Style::Oblique || style == Style::Italic,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::properties::{Stretch, Weight};

    fn vector(stretch: f32, style: f32, weight: f32) -> PropertyVector {
        PropertyVector {
            stretch,
            style,
            weight,
        }
    }

    #[test]
    fn nearest_weight_wins() {
        let regular = PropertyVector::new(&Properties::new());
        let bold = PropertyVector::new(Properties::new().weight(Weight::BOLD));
        let candidates = [regular, bold];

        let query = *Properties::new().weight(Weight::BOLD);
        assert_eq!(find_first_match(&candidates, &query), Ok(1));
        // 600 is 100 units from Bold and 200 from Regular.
        let query = *Properties::new().weight(Weight::DEMI_BOLD);
        assert_eq!(find_first_match(&candidates, &query), Ok(1));
        let query = *Properties::new().weight(Weight::SEMI_LIGHT);
        assert_eq!(find_first_match(&candidates, &query), Ok(0));
    }

    #[test]
    fn ties_break_on_stretch_then_style_then_weight() {
        let requested = PropertyVector::default();

        // Equal distance and a zero dot product for every pair below.
        let wide = vector(7.0, 0.0, 0.0);
        let slanted = vector(0.0, 7.0, 0.0);
        let heavy = vector(0.0, 0.0, 7.0);
        let light = vector(0.0, 0.0, -7.0);

        assert!(is_better_match(&wide, &slanted, &requested));
        assert!(!is_better_match(&slanted, &wide, &requested));
        assert!(is_better_match(&slanted, &heavy, &requested));
        assert!(!is_better_match(&heavy, &slanted, &requested));
        assert!(is_better_match(&heavy, &light, &requested));
        assert!(!is_better_match(&light, &heavy, &requested));
        assert!(!is_better_match(&heavy, &heavy, &requested));
    }

    #[test]
    fn tied_faces_resolve_the_same_in_any_order() {
        let condensed = PropertyVector::new(Properties::new().stretch(Stretch::SemiCondensed));
        let expanded = PropertyVector::new(Properties::new().stretch(Stretch::SemiExpanded));
        let query = Properties::new();
        assert_eq!(find_first_match(&[condensed, expanded], &query), Ok(1));
        assert_eq!(find_first_match(&[expanded, condensed], &query), Ok(0));

        // Full ties keep the earliest candidate.
        assert_eq!(find_first_match(&[expanded, expanded], &query), Ok(0));

        let mut items = vec![condensed, expanded, condensed];
        sort_by_match(&mut items, &query, |item| *item);
        assert_eq!(items, vec![expanded, condensed, condensed]);
    }
}
