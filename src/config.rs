// font-collection/src/config.rs
//
// Copyright © 2018 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Factory configuration, read from TOML.
//!
//!     # use font_collection::config::FactoryConfig;
//!     let config = FactoryConfig::from_toml_str(r#"
//!         font-directories = ["/usr/share/fonts"]
//!
//!         [replacements]
//!         "MS Shell Dlg" = ["Tahoma", "Arial"]
//!         "Helv" = "MS Sans Serif"
//!     "#).unwrap();
//!     assert_eq!(config.replacements.len(), 2);

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// The family name under which the default EUDC font is registered.
pub const SYSTEM_DEFAULT_EUDC_FONT: &str = "SystemDefaultEUDCFont";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct FactoryConfig {
    /// Directories searched for system fonts. Empty means the platform defaults.
    pub font_directories: Vec<PathBuf>,
    /// Missing family name to the families that stand in for it, in order of preference.
    pub replacements: BTreeMap<String, Replacement>,
    /// EUDC family name to font file.
    pub eudc_fonts: BTreeMap<String, PathBuf>,
    /// Font used for the unnamed EUDC family when `eudc_fonts` does not provide one.
    pub eudc_default: Option<PathBuf>,
}

/// One or more replacement family names.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Replacement {
    One(String),
    Many(Vec<String>),
}

impl Replacement {
    /// The candidate names, in order.
    pub fn names(&self) -> &[String] {
        match *self {
            Replacement::One(ref name) => std::slice::from_ref(name),
            Replacement::Many(ref names) => names,
        }
    }
}

impl FactoryConfig {
    pub fn from_toml_str(source: &str) -> Result<FactoryConfig, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P>(path: P) -> Result<FactoryConfig, ConfigError>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path)?;
        FactoryConfig::from_toml_str(&content)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(FactoryConfig::from_toml_str("").unwrap(), FactoryConfig::default());
    }

    #[test]
    fn replacement_forms() {
        let config = FactoryConfig::from_toml_str(
            r#"
            [replacements]
            "Helv" = "MS Sans Serif"
            "MS Shell Dlg" = ["Tahoma", "Arial"]
            "#,
        )
        .unwrap();
        assert_eq!(config.replacements["Helv"].names(), ["MS Sans Serif"]);
        assert_eq!(config.replacements["MS Shell Dlg"].names(), ["Tahoma", "Arial"]);
    }

    #[test]
    fn eudc_entries() {
        let config = FactoryConfig::from_toml_str(
            r#"
            eudc-default = "/fonts/eudc.tte"

            [eudc-fonts]
            SystemDefaultEUDCFont = "/fonts/default.tte"
            "MS Gothic" = "/fonts/gothic.tte"
            "#,
        )
        .unwrap();
        assert_eq!(config.eudc_default, Some(PathBuf::from("/fonts/eudc.tte")));
        assert_eq!(
            config.eudc_fonts[SYSTEM_DEFAULT_EUDC_FONT],
            PathBuf::from("/fonts/default.tte")
        );
        assert_eq!(config.eudc_fonts.len(), 2);
    }

    #[test]
    fn malformed_config_is_an_error() {
        match FactoryConfig::from_toml_str("replacements = 5") {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
