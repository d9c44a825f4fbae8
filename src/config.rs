use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::{CleaningRules, ParseOptions};
use crate::error::{Error, Result};

/// Configuration for docstruct
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default log filter when neither `-v` nor `RUST_LOG` is given
    pub log_level: Option<String>,
    pub cleaning: CleaningConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CleaningConfig {
    /// Normalize paragraph text before parsing
    pub enabled: bool,
    #[serde(flatten)]
    pub rules: CleaningRules,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    pub verify_targets: bool,
    /// Directory that image targets such as `media/image1.png` live under
    pub media_dir: Option<PathBuf>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            verify_targets: true,
            media_dir: None,
        }
    }
}

impl Config {
    /// Load config from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        // Return default config if no file found
        Ok(Config::default())
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::get_config_path() {
            self.save_to(&config_path)?;
        }

        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|err| Error::Config(err.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docstruct").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<()> {
        Config::default().save()
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            clean: self.cleaning.enabled,
            cleaning_rules: self.cleaning.rules.clone(),
            media_dir: self.images.media_dir.clone(),
            verify_image_targets: self.images.verify_targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_options() {
        let options = Config::default().parse_options();
        assert!(!options.clean);
        assert!(options.verify_image_targets);
        assert!(options.media_dir.is_none());
        assert!(options.cleaning_rules.remove_extra_spaces);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "log_level = \"debug\"\n\n[cleaning]\nenabled = true\nnormalize_punctuation = false\n\n[images]\nmedia_dir = \"/srv/manuals\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        let options = config.parse_options();
        assert!(options.clean);
        assert!(!options.cleaning_rules.normalize_punctuation);
        assert!(options.cleaning_rules.remove_empty_paragraphs);
        assert!(options.verify_image_targets);
        assert_eq!(options.media_dir, Some(PathBuf::from("/srv/manuals")));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.images.verify_targets = false;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[cleaning\nenabled = yes").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
