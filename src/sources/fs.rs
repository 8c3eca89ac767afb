// font-collection/src/sources/fs.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An enumerator that walks directories of font files.
//!
//! Walking makes a best effort to find fonts in the typical platform directories; it does not
//! know about fonts installed in unusual locations.

use std::path::PathBuf;
use std::sync::Arc;
use std::vec;
use walkdir::{self, WalkDir};

#[cfg(not(any(target_os = "android", target_family = "windows")))]
use dirs_next;
#[cfg(target_family = "windows")]
use std::env;

use crate::error::FontLoadingError;
use crate::file::FontFile;
use crate::loaders::LocalFileLoader;
use crate::sources::FontFileEnumerator;

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "ttc", "otc"];

#[allow(missing_debug_implementations)]
pub struct DirectoryEnumerator {
    loader: Arc<LocalFileLoader>,
    directories: vec::IntoIter<PathBuf>,
    walker: Option<walkdir::IntoIter>,
}

impl DirectoryEnumerator {
    /// Creates an enumerator over the font files in `directories` and their subdirectories.
    pub fn new(loader: Arc<LocalFileLoader>, directories: Vec<PathBuf>) -> DirectoryEnumerator {
        DirectoryEnumerator {
            loader,
            directories: directories.into_iter(),
            walker: None,
        }
    }

    /// Enumerates the default set of directories on this platform.
    pub fn with_default_directories(loader: Arc<LocalFileLoader>) -> DirectoryEnumerator {
        DirectoryEnumerator::new(loader, default_font_directories())
    }
}

impl FontFileEnumerator for DirectoryEnumerator {
    fn move_next(&mut self) -> Result<Option<FontFile>, FontLoadingError> {
        loop {
            if self.walker.is_none() {
                match self.directories.next() {
                    Some(directory) => {
                        trace!("walking font directory {}", directory.display());
                        self.walker = Some(WalkDir::new(directory).into_iter());
                    }
                    None => return Ok(None),
                }
            }

            let next = match self.walker {
                Some(ref mut walker) => walker.next(),
                None => continue,
            };
            let directory_entry = match next {
                Some(Ok(directory_entry)) => directory_entry,
                Some(Err(_)) => continue,
                None => {
                    self.walker = None;
                    continue;
                }
            };
            if !directory_entry.file_type().is_file() {
                continue;
            }

            let path = directory_entry.path();
            let is_font = path
                .extension()
                .and_then(|extension| extension.to_str())
                .map_or(false, |extension| {
                    FONT_EXTENSIONS
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(extension))
                });
            if !is_font {
                continue;
            }

            match LocalFileLoader::create_font_file(&self.loader, path) {
                Ok(file) => return Ok(Some(file)),
                Err(error) => {
                    debug!("skipping {}: {}", path.display(), error);
                    continue;
                }
            }
        }
    }
}

#[cfg(target_os = "android")]
pub fn default_font_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("/system/fonts")]
}

#[cfg(target_family = "windows")]
pub fn default_font_directories() -> Vec<PathBuf> {
    let windows_directory = env::var_os("WINDIR")
        .or_else(|| env::var_os("SystemRoot"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("C:\\Windows"));
    vec![windows_directory.join("Fonts")]
}

#[cfg(target_os = "macos")]
pub fn default_font_directories() -> Vec<PathBuf> {
    let mut directories = vec![
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/Network/Library/Fonts"),
    ];
    if let Some(mut path) = dirs_next::home_dir() {
        path.push("Library");
        path.push("Fonts");
        directories.push(path);
    }
    directories
}

#[cfg(not(any(target_os = "android", target_family = "windows", target_os = "macos")))]
pub fn default_font_directories() -> Vec<PathBuf> {
    let mut directories = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/var/run/host/usr/share/fonts"), // Flatpak specific
        PathBuf::from("/var/run/host/usr/local/share/fonts"),
    ];
    if let Some(path) = dirs_next::home_dir() {
        directories.push(path.join(".fonts")); // ~/.fonts is deprecated
        directories.push(path.join("local").join("share").join("fonts")); // Flatpak specific
    }
    if let Some(mut path) = dirs_next::data_dir() {
        path.push("fonts");
        directories.push(path);
    }
    directories
}

#[cfg(all(test, not(target_family = "windows")))]
mod test {
    use super::*;

    #[test]
    fn missing_directory_yields_nothing() {
        let mut enumerator = DirectoryEnumerator::new(
            Arc::new(LocalFileLoader::new()),
            vec![PathBuf::from("/nonexistent/font-collection")],
        );
        assert!(enumerator.move_next().unwrap().is_none());
    }
}
