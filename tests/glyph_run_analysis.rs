// font-collection/tests/glyph_run_analysis.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod common;

use font_collection::analysis::GlyphRunAnalysisOptions;
use font_collection::error::AnalysisError;
use font_collection::rendering::{
    GlyphRun, RenderingMode, RenderingParams, TextAntialiasMode, TextureType,
};
use font_collection::simulation::Simulations;
use font_collection::Factory;
use pathfinder_geometry::rect::RectI;
use pathfinder_geometry::vector::{Vector2F, Vector2I};

use common::{face_of, fake_factory, fake_font, GLYPH_HEIGHT, GLYPH_WIDTH, GRAY_COVERAGE, SPACE_GLYPH};

fn two_glyph_run(factory: &Factory) -> GlyphRun {
    let face = face_of(
        factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::empty(),
    );
    let mut run = GlyphRun::new(face, 10.0, vec![65, 66]);
    run.glyph_advances = Some(vec![10.0, 10.0]);
    run
}

fn run_bounds() -> RectI {
    RectI::from_points(
        Vector2I::new(0, -GLYPH_HEIGHT),
        Vector2I::new(10 + GLYPH_WIDTH, 0),
    )
}

#[test]
pub fn cleartype_texture_covers_both_glyphs() {
    let factory = fake_factory();
    let run = two_glyph_run(&factory);
    let analysis = factory
        .create_glyph_run_analysis(&run, &GlyphRunAnalysisOptions::default())
        .unwrap();

    assert_eq!(analysis.texture_type(), TextureType::ClearType3x1);
    let bounds = analysis
        .alpha_texture_bounds(TextureType::ClearType3x1)
        .unwrap();
    assert_eq!(bounds, run_bounds());
    assert_eq!(
        analysis.alpha_texture_bounds(TextureType::Aliased1x1).unwrap(),
        RectI::default()
    );
    assert_eq!(analysis.max_glyph_bitmap_size().unwrap(), 4 * 6);

    let mut buffer = vec![0xaa; 14 * 6 * 3];
    analysis
        .create_alpha_texture(TextureType::ClearType3x1, bounds, &mut buffer)
        .unwrap();
    for row in buffer.chunks(14 * 3) {
        for (x, pixel) in row.chunks(3).enumerate() {
            let expected = if x < 4 || (10..14).contains(&x) {
                GRAY_COVERAGE
            } else {
                0
            };
            assert_eq!(pixel, &[expected; 3], "pixel {}", x);
        }
    }
}

#[test]
pub fn texture_requests_are_checked() {
    let factory = fake_factory();
    let run = two_glyph_run(&factory);
    let analysis = factory
        .create_glyph_run_analysis(&run, &GlyphRunAnalysisOptions::default())
        .unwrap();
    let bounds = run_bounds();

    let mut small = vec![0; 100];
    match analysis.create_alpha_texture(TextureType::ClearType3x1, bounds, &mut small) {
        Err(AnalysisError::NotSufficientBuffer {
            required: 252,
            provided: 100,
        }) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    let mut buffer = vec![0; 252];
    match analysis.create_alpha_texture(TextureType::Aliased1x1, bounds, &mut buffer) {
        Err(AnalysisError::UnsupportedOperation) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    // Outside the run everything is cleared.
    let mut outside = vec![0xff; 4 * 4 * 3];
    let far = RectI::new(Vector2I::new(100, 100), Vector2I::new(4, 4));
    analysis
        .create_alpha_texture(TextureType::ClearType3x1, far, &mut outside)
        .unwrap();
    assert!(outside.iter().all(|&byte| byte == 0));
}

#[test]
pub fn aliased_and_grayscale_runs_use_one_byte_per_pixel() {
    let factory = fake_factory();
    let run = two_glyph_run(&factory);

    let aliased = factory
        .create_glyph_run_analysis(
            &run,
            &GlyphRunAnalysisOptions {
                rendering_mode: RenderingMode::Aliased,
                ..GlyphRunAnalysisOptions::default()
            },
        )
        .unwrap();
    assert_eq!(aliased.texture_type(), TextureType::Aliased1x1);
    let mut buffer = vec![0; 14 * 6];
    aliased
        .create_alpha_texture(TextureType::Aliased1x1, run_bounds(), &mut buffer)
        .unwrap();
    assert_eq!(&buffer[..4], &[0xff; 4]);
    assert_eq!(&buffer[4..10], &[0; 6]);
    assert_eq!(&buffer[10..14], &[0xff; 4]);

    let grayscale = factory
        .create_glyph_run_analysis(
            &run,
            &GlyphRunAnalysisOptions {
                antialias_mode: TextAntialiasMode::Grayscale,
                ..GlyphRunAnalysisOptions::default()
            },
        )
        .unwrap();
    assert_eq!(grayscale.texture_type(), TextureType::Aliased1x1);
    let mut buffer = vec![0; 14 * 6];
    grayscale
        .create_alpha_texture(TextureType::Aliased1x1, run_bounds(), &mut buffer)
        .unwrap();
    assert_eq!(&buffer[..4], &[GRAY_COVERAGE; 4]);
    assert_eq!(buffer[5], 0);
}

#[test]
pub fn unsupported_rendering_modes_are_rejected() {
    let factory = fake_factory();
    let run = two_glyph_run(&factory);
    for &mode in &[
        RenderingMode::Default,
        RenderingMode::Outline,
        RenderingMode::NaturalSymmetricDownsampled,
    ] {
        let options = GlyphRunAnalysisOptions {
            rendering_mode: mode,
            ..GlyphRunAnalysisOptions::default()
        };
        match factory.create_glyph_run_analysis(&run, &options) {
            Err(AnalysisError::InvalidArgument(_)) => {}
            other => panic!("{:?}: unexpected result: {:?}", mode, other),
        }
    }
}

#[test]
pub fn origins_follow_design_advances() {
    let factory = fake_factory();
    let face = face_of(
        &factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::empty(),
    );
    let run = GlyphRun::new(face, 10.0, vec![65, 66]);

    let analysis = factory
        .create_glyph_run_analysis(&run, &GlyphRunAnalysisOptions::default())
        .unwrap();
    assert_eq!(
        analysis.glyph_origins(),
        &[Vector2F::new(0.0, 0.0), Vector2F::new(6.0, 0.0)]
    );

    let scaled = factory
        .create_glyph_run_analysis(
            &run,
            &GlyphRunAnalysisOptions {
                pixels_per_dip: 2.0,
                ..GlyphRunAnalysisOptions::default()
            },
        )
        .unwrap();
    assert_eq!(
        scaled.glyph_origins(),
        &[Vector2F::new(0.0, 0.0), Vector2F::new(12.0, 0.0)]
    );
}

#[test]
pub fn blank_glyphs_have_no_bounds() {
    let factory = fake_factory();
    let face = face_of(
        &factory,
        fake_font(&["Arial|Regular|400|5|n"]),
        Simulations::empty(),
    );
    let run = GlyphRun::new(face, 10.0, vec![SPACE_GLYPH, SPACE_GLYPH]);
    let analysis = factory
        .create_glyph_run_analysis(&run, &GlyphRunAnalysisOptions::default())
        .unwrap();
    let bounds = analysis
        .alpha_texture_bounds(TextureType::ClearType3x1)
        .unwrap();
    assert_eq!(bounds.width(), 0);
    assert_eq!(bounds.height(), 0);
}

#[test]
pub fn blend_params_follow_texture_type() {
    let factory = fake_factory();
    let run = two_glyph_run(&factory);
    let params = RenderingParams::default();

    let cleartype = factory
        .create_glyph_run_analysis(&run, &GlyphRunAnalysisOptions::default())
        .unwrap()
        .alpha_blend_params(&params);
    assert_eq!(cleartype.gamma, 1.8);
    assert_eq!(cleartype.enhanced_contrast, 0.5);
    assert_eq!(cleartype.cleartype_level, 1.0);

    let aliased = factory
        .create_glyph_run_analysis(
            &run,
            &GlyphRunAnalysisOptions {
                rendering_mode: RenderingMode::Aliased,
                ..GlyphRunAnalysisOptions::default()
            },
        )
        .unwrap()
        .alpha_blend_params(&params);
    assert_eq!(aliased.cleartype_level, 0.0);
}
