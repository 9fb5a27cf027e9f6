//! Engine settings file.
//!
//! ```toml
//! [automapper]
//! scope = "automapper"
//! max_depth = 8
//! allow_multiple_mappings = false
//! check_for_existing_mappings = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wb_map::{AutoMapOptions, DEFAULT_MAX_DEPTH, DEFAULT_SCOPE};

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub automapper: AutoMapperSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoMapperSettings {
    pub scope: String,
    pub max_depth: usize,
    pub allow_multiple_mappings: bool,
    pub check_for_existing_mappings: bool,
}

impl Default for AutoMapperSettings {
    fn default() -> Self {
        Self {
            scope: DEFAULT_SCOPE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            allow_multiple_mappings: false,
            check_for_existing_mappings: false,
        }
    }
}

impl AutoMapperSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ConfigError::InvalidSettings {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.scope.trim().is_empty() {
            return Err(ConfigError::InvalidSettings {
                message: "scope must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_options(&self) -> AutoMapOptions {
        AutoMapOptions::default()
            .with_scope(self.scope.clone())
            .with_max_depth(self.max_depth)
            .with_multiple_mappings(self.allow_multiple_mappings)
            .with_existing_mappings_check(self.check_for_existing_mappings)
    }
}

impl Settings {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self> {
        let settings: Self = toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        settings.automapper.validate()?;
        Ok(settings)
    }
}

/// Loads settings from a TOML file. Missing keys take their defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    Settings::from_toml_str(&text, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("", Path::new("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.automapper.to_options(), AutoMapOptions::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            "[automapper]\nallow_multiple_mappings = true\n",
            Path::new("settings.toml"),
        )
        .unwrap();
        let options = settings.automapper.to_options();
        assert!(options.allow_multiple_mappings);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(options.scope, DEFAULT_SCOPE);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = Settings::from_toml_str("[automapper]\nmax_depth = 0\n", Path::new("s.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSettings { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml_str("[automapper]\ndepth = 3\n", Path::new("s.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
