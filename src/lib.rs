// font-collection/src/lib.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `font-collection` builds font collections out of font files and answers queries against them.
//!
//! A [`Factory`](factory::Factory) scans font files into a
//! [`FontCollection`](collection::FontCollection) of families. Faces are grouped by family name,
//! and bold and oblique faces are synthesized where a family lacks them. Families pick their
//! closest face for a requested weight, stretch, and style. The best match becomes a
//! [`FontFace`](font_face::FontFace), shared per factory, which answers glyph metric, table,
//! rasterization, and color glyph queries.
//!
//! The OpenType parser, the table reader, and the rasterizer sit behind traits, so a factory can
//! be built with other implementations of each.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod analysis;
pub mod analyzer;
pub mod canvas;
pub mod collection;
pub mod color;
pub mod config;
pub mod error;
pub mod factory;
pub mod family;
pub mod file;
pub mod file_type;
pub mod font;
pub mod font_data;
pub mod font_face;
pub mod loaders;
pub mod localized_strings;
pub mod matching;
pub mod metrics;
pub mod names;
pub mod properties;
pub mod rasterizer;
pub mod rendering;
pub mod simulation;
pub mod sources;
pub mod table;

pub use crate::collection::FontCollection;
pub use crate::factory::{Factory, FactoryBuilder};
