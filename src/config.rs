//! Configuration loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML file passed with `--config`
//! 3. Command-line flags

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::dot::IdScheme;
use crate::domain::format::{InputFormat, OutputFormat};

/// Settings as read from a config file; unset keys fall through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub ids: Option<IdScheme>,
    pub format: Option<OutputFormat>,
    pub input_format: Option<InputFormat>,
}

impl RawSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Values from `overlay` win where set.
    pub fn merge(self, overlay: RawSettings) -> RawSettings {
        RawSettings {
            ids: overlay.ids.or(self.ids),
            format: overlay.format.or(self.format),
            input_format: overlay.input_format.or(self.input_format),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ids: IdScheme,
    pub format: OutputFormat,
    /// `None` means infer from the input path.
    pub input_format: Option<InputFormat>,
}

impl Settings {
    pub fn resolve(raw: RawSettings) -> Self {
        Self {
            ids: raw.ids.unwrap_or_default(),
            format: raw.format.unwrap_or_default(),
            input_format: raw.input_format,
        }
    }

    /// Explicit format, else inferred from `path`, else tree notation.
    pub fn input_format_for(&self, path: Option<&Path>) -> InputFormat {
        self.input_format
            .or_else(|| path.and_then(InputFormat::from_path))
            .unwrap_or(InputFormat::Sexpr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_resolve() {
        let raw = RawSettings::parse("ids = \"pre-order\"\nformat = \"text\"\n").unwrap();
        let settings = Settings::resolve(raw);
        assert_eq!(settings.ids, IdScheme::PreOrder);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.input_format, None);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(RawSettings::default());
        assert_eq!(settings.ids, IdScheme::Depth);
        assert_eq!(settings.format, OutputFormat::Dot);
        assert_eq!(settings.input_format_for(None), InputFormat::Sexpr);
        assert_eq!(settings.input_format_for(Some(Path::new("main.rs"))), InputFormat::Rust);
    }

    #[test]
    fn test_overlay_wins() {
        let file = RawSettings {
            ids: Some(IdScheme::PreOrder),
            format: Some(OutputFormat::Json),
            input_format: None,
        };
        let cli = RawSettings {
            format: Some(OutputFormat::Dot),
            input_format: Some(InputFormat::Json),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.ids, Some(IdScheme::PreOrder));
        assert_eq!(merged.format, Some(OutputFormat::Dot));
        assert_eq!(merged.input_format, Some(InputFormat::Json));
        assert_eq!(
            Settings::resolve(merged).input_format_for(Some(Path::new("x.rs"))),
            InputFormat::Json
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(RawSettings::parse("color = \"red\"").is_err());
    }
}
