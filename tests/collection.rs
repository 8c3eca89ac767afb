// font-collection/tests/collection.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Collection building: grouping, skipping, synthesis, and replacements.

mod common;

use font_collection::analyzer::FontAnalyzer;
use font_collection::config::Replacement;
use font_collection::error::SelectionError;
use font_collection::file::FontFile;
use font_collection::properties::{Properties, Stretch, Style, Weight};
use font_collection::simulation::Simulations;
use font_collection::sources::{FileListEnumerator, MultiEnumerator};
use font_collection::FontCollection;
use std::collections::BTreeMap;
use std::sync::Arc;

use common::{collection_of, fake_factory, fake_font, memory_files, FakeAnalyzer};

fn fake_analyzer() -> Arc<dyn FontAnalyzer> {
    Arc::new(FakeAnalyzer)
}

#[test]
pub fn faces_are_grouped_by_family_name() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![
            fake_font(&["Arial|Regular|400|5|n"]),
            fake_font(&["Courier|Regular|400|5|n"]),
            fake_font(&["arial|Bold|700|5|n"]),
        ],
    );

    assert_eq!(collection.family_count(), 2);
    assert!(!collection.is_system());
    assert_eq!(collection.find_family_name("ARIAL"), Some(0));
    assert_eq!(collection.find_family_name("Courier"), Some(1));
    assert_eq!(collection.find_family_name("Helvetica"), None);

    // Regular, Bold, and oblique simulations of both.
    let arial = collection.family(0).unwrap();
    assert_eq!(arial.family_names().en_string(), "Arial");
    assert_eq!(arial.font_count(), 4);

    match collection.family(2) {
        Err(SelectionError::OutOfRange { index: 2, count: 2 }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
pub fn collection_faces_keep_file_order() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![fake_font(&["Arial|Regular|400|5|n", "Arial|Italic|400|5|i"])],
    );
    let arial = collection.family_by_name("Arial").unwrap();
    let faces: Vec<String> = (0..arial.font_count())
        .map(|index| {
            arial
                .font(index)
                .unwrap()
                .face_names()
                .en_string()
                .to_owned()
        })
        .collect();
    // Synthesized faces follow, bold ones first. Italic faces do not stop oblique simulation.
    assert_eq!(
        faces,
        vec!["Regular", "Italic", "Bold", "Italic Bold", "Oblique", "Bold Oblique"]
    );
}

#[test]
pub fn same_file_is_scanned_once() {
    let factory = fake_factory();
    let files = memory_files(&factory, vec![fake_font(&["Arial|Regular|400|5|n"])]);
    let mut enumerator = MultiEnumerator::from_enumerators(vec![
        Box::new(FileListEnumerator::new(files.clone())),
        Box::new(FileListEnumerator::new(files)),
    ]);
    let collection = factory
        .create_custom_font_collection(&mut enumerator)
        .unwrap();
    assert_eq!(collection.family_count(), 1);
    // Regular, Bold, Oblique, and Bold Oblique.
    assert_eq!(collection.family(0).unwrap().font_count(), 4);
}

#[test]
pub fn files_with_equal_keys_are_scanned_once() {
    let factory = fake_factory();
    let files = memory_files(&factory, vec![fake_font(&["Arial|Regular|400|5|n"])]);
    // A separate handle that only shares the loader and the key bytes.
    let copy = FontFile::new(files[0].loader().clone(), files[0].reference_key().to_vec());
    assert!(!copy.ptr_eq(&files[0]));

    let mut enumerator = FileListEnumerator::new(vec![files[0].clone(), copy]);
    let collection = factory
        .create_custom_font_collection(&mut enumerator)
        .unwrap();
    assert_eq!(collection.family_count(), 1);
    assert_eq!(collection.family(0).unwrap().font_count(), 4);
}

#[test]
pub fn hidden_families_are_skipped() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![
            fake_font(&[".LastResort|Regular|400|5|n"]),
            fake_font(&["Arial|Regular|400|5|n"]),
        ],
    );
    assert_eq!(collection.family_count(), 1);
    assert_eq!(collection.find_family_name(".LastResort"), None);
}

#[test]
pub fn unreadable_files_and_faces_are_skipped() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![
            b"definitely not a font".to_vec(),
            // The first face has no family name: the whole file is dropped.
            fake_font(&["|Regular|400|5|n", "Lost|Regular|400|5|n"]),
            // A malformed second face is dropped on its own.
            fake_font(&["Arial|Regular|400|5|n", "Arial|Broken|heavy|5|n"]),
        ],
    );
    assert_eq!(collection.family_count(), 1);
    assert_eq!(collection.find_family_name("Lost"), None);

    let arial = collection.family_by_name("Arial").unwrap();
    let real_faces = (0..arial.font_count())
        .filter(|&index| arial.font(index).unwrap().simulations().is_empty())
        .count();
    assert_eq!(real_faces, 1);
}

#[test]
pub fn family_names_are_canonicalized() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![
            fake_font(&["Arial|Regular|400|5|n"]),
            fake_font(&["Arial Narrow|Bold|700|5|n"]),
        ],
    );
    assert_eq!(collection.family_count(), 1);
    assert_eq!(collection.find_family_name("Arial Narrow"), None);

    let arial = collection.family_by_name("Arial").unwrap();
    let narrow = arial
        .first_matching_font(
            Properties::new()
                .weight(Weight::BOLD)
                .stretch(Stretch::SemiCondensed),
        )
        .unwrap();
    assert_eq!(narrow.face_names().en_string(), "Narrow Bold");
    assert_eq!(narrow.family_names().en_string(), "Arial");
    assert_eq!(narrow.stretch(), Stretch::SemiCondensed);
    assert_eq!(narrow.weight(), Weight::BOLD);
    assert_eq!(narrow.simulations(), Simulations::empty());
}

#[test]
pub fn simulated_faces_get_names_and_properties() {
    let factory = fake_factory();
    let collection = collection_of(&factory, vec![fake_font(&["Arial|Regular|400|5|n"])]);
    let arial = collection.family(0).unwrap();

    let bold = arial
        .first_matching_font(Properties::new().weight(Weight::BOLD))
        .unwrap();
    assert_eq!(bold.face_names().en_string(), "Bold");
    assert_eq!(bold.simulations(), Simulations::BOLD);
    assert_eq!(bold.data().gdi_weight(), 551);

    let bold_oblique = arial
        .first_matching_font(Properties::new().weight(Weight::BOLD).style(Style::Oblique))
        .unwrap();
    assert_eq!(bold_oblique.face_names().en_string(), "Bold Oblique");
    assert_eq!(
        bold_oblique.simulations(),
        Simulations::BOLD | Simulations::OBLIQUE
    );
    assert_eq!(bold_oblique.style(), Style::Oblique);
    assert!(bold_oblique.data().gdi_italic());
}

#[test]
pub fn heavy_faces_are_not_emboldened() {
    let factory = fake_factory();
    let collection = collection_of(&factory, vec![fake_font(&["Impact|Regular|600|5|n"])]);
    let impact = collection.family(0).unwrap();
    // The face itself and its oblique simulation.
    assert_eq!(impact.font_count(), 2);
    assert!((0..2).all(|index| !impact
        .font(index)
        .unwrap()
        .simulations()
        .contains(Simulations::BOLD)));
}

#[test]
pub fn oblique_faces_suppress_oblique_simulation() {
    let factory = fake_factory();
    let collection = collection_of(
        &factory,
        vec![fake_font(&[
            "Slant|Regular|400|5|n",
            "Slant|Oblique|400|5|o",
            "Slant|Bold|700|5|n",
        ])],
    );
    let slant = collection.family(0).unwrap();
    let simulated: Vec<String> = (0..slant.font_count())
        .map(|index| slant.font(index).unwrap())
        .filter(|font| !font.simulations().is_empty())
        .map(|font| font.face_names().en_string().to_owned())
        .collect();
    assert_eq!(simulated, vec!["Oblique Bold"]);
    assert!((0..slant.font_count()).all(|index| !slant
        .font(index)
        .unwrap()
        .simulations()
        .contains(Simulations::OBLIQUE)));
}

#[test]
pub fn replacements_share_the_replacement_family_faces() {
    let factory = fake_factory();
    let files = memory_files(
        &factory,
        vec![
            fake_font(&["Arial|Regular|400|5|n"]),
            fake_font(&["Courier|Regular|400|5|n"]),
        ],
    );
    let mut replacements = BTreeMap::new();
    replacements.insert("Helvetica".to_owned(), Replacement::One("Arial".to_owned()));
    replacements.insert("Arial".to_owned(), Replacement::One("Courier".to_owned()));
    replacements.insert(
        "Times".to_owned(),
        Replacement::Many(vec!["Missing".to_owned(), "courier".to_owned()]),
    );
    replacements.insert("Nowhere".to_owned(), Replacement::One("Missing".to_owned()));

    let mut enumerator = FileListEnumerator::new(files);
    let collection =
        FontCollection::system_from_enumerator(&mut enumerator, &fake_analyzer(), &replacements)
            .unwrap();
    assert!(collection.is_system());
    assert_eq!(collection.family_count(), 4);
    assert_eq!(collection.find_family_name("Nowhere"), None);

    // Arial was present, so it still holds its own faces.
    let arial = collection.family_by_name("Arial").unwrap();
    assert_eq!(
        arial.font(0).unwrap().family_names().en_string(),
        "Arial"
    );

    let helvetica = collection.family_by_name("Helvetica").unwrap();
    assert_eq!(helvetica.family_names().en_string(), "Helvetica");
    assert_eq!(helvetica.font_count(), arial.font_count());
    for index in 0..arial.font_count() {
        assert!(Arc::ptr_eq(
            helvetica.font(index).unwrap().data(),
            arial.font(index).unwrap().data()
        ));
    }

    let times = collection.family_by_name("Times").unwrap();
    let courier = collection.family_by_name("Courier").unwrap();
    assert!(Arc::ptr_eq(
        times.font(0).unwrap().data(),
        courier.font(0).unwrap().data()
    ));
}

#[test]
pub fn empty_family_list_reports_not_found() {
    let collection = FontCollection::empty();
    assert_eq!(collection.family_count(), 0);
    match collection.family_by_name("Arial") {
        Err(SelectionError::NotFound) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}
