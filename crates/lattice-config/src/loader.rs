//! Reading and writing pricing configurations as TOML or JSON.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::pricing::PricingConfig;

/// On-disk configuration format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// TOML document.
    #[default]
    Toml,
    /// JSON document.
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(ConfigFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl PricingConfig {
    /// Parses a configuration from text.
    pub fn parse(text: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        Ok(config)
    }

    /// Renders the configuration as text.
    pub fn render(&self, format: ConfigFormat) -> ConfigResult<String> {
        let text = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        };
        Ok(text)
    }

    /// Loads a configuration file, choosing the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&text, format)?;
        tracing::info!(path = %path.display(), name = %config.name, "Loaded pricing configuration");
        Ok(config)
    }

    /// Writes the configuration to a file, choosing the format from its
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let text = self.render(ConfigFormat::from_path(path)?)?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_core::{ExerciseStyle, OptionKind};

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("b.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("b.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let text = r#"
            name = "desk"
            spot = 100.0
            strike = 95.0
            maturity = 0.5
            volatility = 25.0
            option = "put"
            exercise = "american"
        "#;
        let config = PricingConfig::parse(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.steps, 100);
        assert_eq!(config.rate, 0.0);
        assert_eq!(config.dividend_yield, 0.0);
        assert_eq!(config.option, OptionKind::Put);
        assert_eq!(config.exercise, ExerciseStyle::American);
        assert_eq!(config.up_factor, None);
    }

    #[test]
    fn test_parse_rejects_unknown_option_kind() {
        let text = r#"{"name": "x", "spot": 1.0, "strike": 1.0, "maturity": 1.0, "option": "digital"}"#;
        let err = PricingConfig::parse(text, ConfigFormat::Json).unwrap_err();

        assert!(matches!(err, ConfigError::Deserialization(_)));
        assert!(err.to_string().contains("digital"));
    }

    #[test]
    fn test_render_json_names() {
        let text = PricingConfig::template().render(ConfigFormat::Json).unwrap();
        assert!(text.contains("\"option\": \"put\""));
        assert!(text.contains("\"exercise\": \"American\""));
        assert!(!text.contains("volatility"));
    }
}
