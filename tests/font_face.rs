// font-collection/tests/font_face.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Face sharing and face queries.

mod common;

use font_collection::analyzer::InformationalStringId;
use font_collection::error::{FontLoadingError, SelectionError};
use font_collection::properties::{Properties, Weight};
use font_collection::rendering::MeasuringMode;
use font_collection::simulation::Simulations;
use font_collection::table::GASP;

use common::{
    collection_of, face_of, fake_factory, fake_font, GLYPH_ADVANCE, SPACE_ADVANCE, SPACE_GLYPH,
    UNITS_PER_EM,
};

const GLYPH_A: u16 = 65;

#[test]
pub fn faces_are_shared_while_alive() {
    let factory = fake_factory();
    let file = factory.create_in_memory_font_file_reference(fake_font(&["Arial|Regular|400|5|n"]));

    let first = factory
        .create_font_face(file.clone(), 0, Simulations::empty())
        .unwrap();
    let second = factory
        .create_font_face(file.clone(), 0, Simulations::empty())
        .unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(factory.face_cache_len(), 1);

    let bold = factory
        .create_font_face(file.clone(), 0, Simulations::BOLD)
        .unwrap();
    assert!(!bold.ptr_eq(&first));
    assert_eq!(factory.face_cache_len(), 2);

    drop(first);
    assert_eq!(factory.face_cache_len(), 2);
    drop(second);
    drop(bold);
    assert_eq!(factory.face_cache_len(), 0);

    let again = factory
        .create_font_face(file, 0, Simulations::empty())
        .unwrap();
    assert_eq!(again.index(), 0);
    assert_eq!(factory.face_cache_len(), 1);
}

#[test]
pub fn face_creation_rejects_bad_input() {
    let factory = fake_factory();
    let garbage = factory.create_in_memory_font_file_reference(b"garbage".to_vec());
    match factory.create_font_face(garbage, 0, Simulations::empty()) {
        Err(FontLoadingError::UnknownFormat) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    let file = factory.create_in_memory_font_file_reference(fake_font(&["Arial|Regular|400|5|n"]));
    match factory.create_font_face(file, 3, Simulations::empty()) {
        Err(FontLoadingError::NoSuchFontInCollection) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(factory.face_cache_len(), 0);
}

#[test]
pub fn fonts_and_faces_map_to_each_other() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![fake_font(&["Arial|Regular|400|5|n", "Arial|Bold|700|5|n"])],
    );
    let arial = collection.family(0).unwrap();
    let bold = arial
        .first_matching_font(Properties::new().weight(Weight::BOLD))
        .unwrap();

    let face = bold.create_font_face(&factory).unwrap();
    assert_eq!(face.index(), 1);
    assert_eq!(face.simulations(), Simulations::empty());
    assert!(face.files()[0].is_same(bold.data().file()));

    let found = collection.font_from_font_face(&face).unwrap();
    assert_eq!(found.face_names().en_string(), "Bold");
    assert!(std::sync::Arc::ptr_eq(found.data(), bold.data()));

    let stranger = face_of(&factory, fake_font(&["Arial|Regular|400|5|n"]), Simulations::empty());
    match collection.font_from_font_face(&stranger) {
        Err(SelectionError::NotFound) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
pub fn fonts_answer_character_and_string_queries() {
    let factory = fake_factory();
    let collection = collection_of(&factory, vec![fake_font(&["Arial|Regular|400|5|n"])]);
    let regular = collection.family(0).unwrap().font(0).unwrap();

    assert!(regular.has_character('A').unwrap());
    assert!(!regular.has_character('\u{2603}').unwrap());
    assert!(!regular.is_color_font());

    let full_name = regular
        .informational_strings(InformationalStringId::FullName)
        .unwrap();
    assert_eq!(full_name.en_string(), "Arial Regular");
    assert!(regular
        .informational_strings(InformationalStringId::Designer)
        .is_none());

    assert!(regular.axis_ranges().is_err());
    assert!(regular.is_character_local('A').is_err());
}

#[test]
pub fn design_metrics_include_bold_adjustment() {
    let factory = fake_factory();
    let font = fake_font(&["Arial|Regular|400|5|n"]);
    let regular = face_of(&factory, font.clone(), Simulations::empty());
    let bold = face_of(&factory, font, Simulations::BOLD);

    let metrics = regular
        .design_glyph_metrics(&[GLYPH_A, SPACE_GLYPH], false)
        .unwrap();
    assert_eq!(metrics[0].advance_width, GLYPH_ADVANCE);
    assert_eq!(metrics[1].advance_width, SPACE_ADVANCE);

    // (1000 + 49) / 50 extra units on inked glyphs only.
    let metrics = bold
        .design_glyph_metrics(&[GLYPH_A, SPACE_GLYPH], false)
        .unwrap();
    assert_eq!(metrics[0].advance_width, GLYPH_ADVANCE + 20);
    assert_eq!(metrics[1].advance_width, SPACE_ADVANCE);

    // Served from the cache the second time.
    let cached = bold.design_glyph_metrics(&[GLYPH_A], false).unwrap();
    assert_eq!(cached[0], metrics[0]);

    assert_eq!(
        bold.design_glyph_advances(&[GLYPH_A, SPACE_GLYPH], false)
            .unwrap(),
        vec![GLYPH_ADVANCE as i32 + 20, SPACE_ADVANCE as i32]
    );
}

#[test]
pub fn bold_advances_agree_with_cached_metrics() {
    let factory = fake_factory();
    let bold = face_of(
        &factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::BOLD,
    );

    // The first call fills the glyph metric cache; later calls must not add the adjustment twice.
    for _ in 0..2 {
        assert_eq!(
            bold.design_advance(MeasuringMode::Natural, 12.0, 1.0, None, GLYPH_A, false)
                .unwrap(),
            GLYPH_ADVANCE as i32 + 20
        );
        // 7 pixels of the plain advance, then the unrounded bold adjustment.
        assert_eq!(
            bold.design_advance(MeasuringMode::GdiClassic, 12.0, 1.0, None, GLYPH_A, false)
                .unwrap(),
            603
        );
        assert_eq!(
            bold.design_advance(MeasuringMode::Natural, 12.0, 1.0, None, SPACE_GLYPH, false)
                .unwrap(),
            SPACE_ADVANCE as i32
        );
    }
    let metrics = bold.design_glyph_metrics(&[GLYPH_A], false).unwrap();
    assert_eq!(metrics[0].advance_width, GLYPH_ADVANCE + 20);
}

#[test]
pub fn gdi_advances_round_to_pixels() {
    let factory = fake_factory();
    let face = face_of(
        &factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::empty(),
    );

    // 600 units at 12 pixels per 1000 units is 7.2 pixels, rounded to 7.
    assert_eq!(
        face.design_advance(MeasuringMode::GdiClassic, 12.0, 1.0, None, GLYPH_A, false)
            .unwrap(),
        583
    );
    assert_eq!(
        face.design_advance(MeasuringMode::Natural, 12.0, 1.0, None, GLYPH_A, false)
            .unwrap(),
        600
    );
    assert_eq!(
        face.design_advance(MeasuringMode::GdiNatural, 0.0, 1.0, None, GLYPH_A, false)
            .unwrap(),
        0
    );

    let natural = face
        .scaled_design_advance(MeasuringMode::Natural, 12.0, 1.0, None, GLYPH_A, false)
        .unwrap();
    assert!((natural - 7.2).abs() < 1e-4);
    let classic = face
        .scaled_design_advance(MeasuringMode::GdiClassic, 12.0, 1.0, None, GLYPH_A, false)
        .unwrap();
    assert_eq!(classic, 7.0);
    let no_pixels = face
        .scaled_design_advance(MeasuringMode::GdiClassic, 12.0, 0.0, None, GLYPH_A, false)
        .unwrap();
    assert_eq!(no_pixels, 0.0);

    let gdi = face
        .gdi_compatible_glyph_metrics(12.0, 1.0, None, false, &[GLYPH_A], false)
        .unwrap();
    assert_eq!(gdi[0].advance_width, 583);
    assert_eq!(gdi[0].left_side_bearing, 83);
}

#[test]
pub fn face_queries() {
    let factory = fake_factory();
    let face = face_of(
        &factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::OBLIQUE,
    );

    assert_eq!(face.metrics().design_units_per_em, UNITS_PER_EM);
    assert_eq!(face.glyph_count(), 128);
    assert_eq!(
        face.glyph_indices(&['A' as u32, 0x2603]).unwrap(),
        vec![GLYPH_A, 0]
    );

    // Oblique simulation slants the upright caret.
    let caret = face.caret_metrics();
    assert_eq!(caret.slope_rise, 1000);
    assert_eq!(caret.slope_run, 333);

    assert!(face.gasp().is_none());
    assert!(face.try_get_font_table(GASP).unwrap().is_none());
    assert!(!face.is_color_font());
    assert_eq!(face.color_palette_count(), 0);

    let shaping = face.shaping_cache().unwrap();
    assert_eq!(shaping.design_units_per_em(), UNITS_PER_EM);
    assert_eq!(shaping.glyph('B' as u32), 66);
}
