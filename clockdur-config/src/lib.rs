use clockdur_common::{ClockdurError, ConfigError, DurationConverter, Result, StoreAs};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Options a duration field is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConverterOptions {
    #[serde(default = "default_display_seconds")]
    pub display_seconds: bool,
    #[serde(default = "default_store_as")]
    pub store_as: StoreAs,
}

/// Overrides for a single named field. Unset values fall back to `[default]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldOptions {
    pub display_seconds: Option<bool>,
    pub store_as: Option<StoreAs>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub default: ConverterOptions,
    #[serde(default)]
    pub fields: HashMap<String, FieldOptions>,
}

// Default values
fn default_display_seconds() -> bool {
    false
}

fn default_store_as() -> StoreAs {
    StoreAs::Minutes
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            display_seconds: default_display_seconds(),
            store_as: default_store_as(),
        }
    }
}

/// Builds a converter from raw option values, the way a host form framework
/// hands them over.
pub fn construct(display_seconds: bool, store_as: &str) -> Result<DurationConverter> {
    let store_as: StoreAs = store_as.parse()?;
    ConverterOptions {
        display_seconds,
        store_as,
    }
    .build()
}

impl ConverterOptions {
    pub fn new(display_seconds: bool, store_as: StoreAs) -> Self {
        Self {
            display_seconds,
            store_as,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.display_seconds && self.store_as != StoreAs::Seconds {
            return Err(ClockdurError::InvalidConfiguration(
                ConfigError::DisplaySecondsRequiresSeconds {
                    store_as: self.store_as,
                },
            ));
        }

        Ok(())
    }

    /// Validates once and hands out a converter that never re-checks.
    pub fn build(&self) -> Result<DurationConverter> {
        self.validate()?;

        log::debug!(
            "Built converter: store_as={}, display_seconds={}",
            self.store_as,
            self.display_seconds
        );
        Ok(DurationConverter::new(self.display_seconds, self.store_as))
    }

    pub fn merge(&mut self, field: &FieldOptions) {
        if let Some(display_seconds) = field.display_seconds {
            self.display_seconds = display_seconds;
        }
        if let Some(store_as) = field.store_as {
            self.store_as = store_as;
        }
    }
}

impl FieldOptions {
    pub fn is_empty(&self) -> bool {
        self.display_seconds.is_none() && self.store_as.is_none()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            log::info!("No config file at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClockdurError::InvalidConfiguration(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "File not found"),
            }));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ClockdurError::InvalidConfiguration(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }))?;

        let config = Self::from_toml(&content)?;
        log::info!("Loaded configuration from {:?} ({} fields)", path, config.fields.len());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ClockdurError::InvalidConfiguration(ConfigError::NoConfigDir))?
            .join("clockdur");

        Ok(config_dir.join("config.toml"))
    }

    /// Effective options for a field: its overrides on top of `[default]`.
    pub fn options_for(&self, field_name: &str) -> ConverterOptions {
        let mut options = self.default;

        match self.fields.get(field_name) {
            Some(field) => options.merge(field),
            None => log::warn!("No [fields.{}] section, using [default]", field_name),
        }

        options
    }

    /// Effective options for a field that must be configured.
    pub fn field_options(&self, field_name: &str) -> Result<ConverterOptions> {
        if !self.fields.contains_key(field_name) {
            return Err(ClockdurError::InvalidConfiguration(ConfigError::UnknownField {
                name: field_name.to_string(),
            }));
        }

        Ok(self.options_for(field_name))
    }

    pub fn converter_for(&self, field_name: Option<&str>) -> Result<DurationConverter> {
        match field_name {
            Some(name) => self.options_for(name).build(),
            None => self.default.build(),
        }
    }

    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn validate(&self) -> Result<()> {
        self.default.validate()?;

        for name in self.field_names() {
            if self.fields[name].is_empty() {
                log::warn!("[fields.{}] overrides nothing, it behaves like [default]", name);
            }

            self.options_for(name)
                .validate()
                .map_err(|e| ClockdurError::InvalidConfiguration(ConfigError::Validation {
                    message: format!("Field '{}': {}", name, e),
                }))?;
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = ConverterOptions::default();
        assert!(!options.display_seconds);
        assert_eq!(options.store_as, StoreAs::Minutes);

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.default, options);
        assert!(config.fields.is_empty());
    }

    #[test]
    fn test_construct_legal_combinations() {
        let converter = construct(true, "seconds").unwrap();
        assert!(converter.display_seconds());
        assert_eq!(converter.store_as(), StoreAs::Seconds);

        assert!(construct(false, "seconds").is_ok());
        assert!(construct(false, "minutes").is_ok());
    }

    #[test]
    fn test_construct_rejects_display_seconds_with_minutes() {
        match construct(true, "minutes") {
            Err(ClockdurError::InvalidConfiguration(
                ConfigError::DisplaySecondsRequiresSeconds { store_as },
            )) => assert_eq!(store_as, StoreAs::Minutes),
            other => panic!("Expected DisplaySecondsRequiresSeconds, got {:?}", other),
        }
    }

    #[test]
    fn test_construct_rejects_unknown_unit() {
        match construct(false, "hours") {
            Err(ClockdurError::InvalidConfiguration(ConfigError::InvalidValue { field, value })) => {
                assert_eq!(field, "store_as");
                assert_eq!(value, "hours");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_built_converter_round_trips() {
        let converter = construct(true, "seconds").unwrap();
        assert_eq!(converter.to_display(Some(3661)).unwrap().as_deref(), Some("01:01:01"));
        assert_eq!(converter.to_normalized(Some("01:01:01")).unwrap(), Some(3661));
    }

    #[test]
    fn test_default_section_deserialization() {
        let toml_str = r#"
            [default]
            store_as = "seconds"
            display_seconds = true
        "#;

        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.default, ConverterOptions::new(true, StoreAs::Seconds));
    }

    #[test]
    fn test_invalid_default_section_fails_validation() {
        let toml_str = r#"
            [default]
            store_as = "minutes"
            display_seconds = true
        "#;

        let result = Config::from_toml(toml_str);
        assert!(matches!(
            result,
            Err(ClockdurError::InvalidConfiguration(
                ConfigError::DisplaySecondsRequiresSeconds { .. }
            ))
        ));
    }

    #[test]
    fn test_unknown_store_as_fails_to_parse() {
        let toml_str = r#"
            [default]
            store_as = "hours"
        "#;

        match Config::from_toml(toml_str) {
            Err(ClockdurError::InvalidConfiguration(ConfigError::TomlParse { .. })) => {},
            other => panic!("Expected ConfigError::TomlParse, got {:?}", other),
        }
    }

    #[test]
    fn test_non_boolean_display_seconds_fails_to_parse() {
        let toml_str = r#"
            [default]
            display_seconds = "yes"
        "#;

        match Config::from_toml(toml_str) {
            Err(ClockdurError::InvalidConfiguration(ConfigError::TomlParse { .. })) => {},
            other => panic!("Expected ConfigError::TomlParse, got {:?}", other),
        }
    }

    #[test]
    fn test_config_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config_content = r#"
            [default]
            store_as = "seconds"

            [fields.break_time]
            store_as = "minutes"
        "#;

        fs::write(&config_path, config_content).unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.default.store_as, StoreAs::Seconds);
        assert_eq!(config.options_for("break_time").store_as, StoreAs::Minutes);
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&config_path);
        assert!(result.is_err());

        match result.unwrap_err() {
            ClockdurError::InvalidConfiguration(ConfigError::FileRead { .. }) => {},
            _ => panic!("Expected ConfigError::FileRead"),
        }
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");

        fs::write(&config_path, "[default\nstore_as = ").unwrap();

        match Config::load_from_path(&config_path).unwrap_err() {
            ClockdurError::InvalidConfiguration(ConfigError::TomlParse { .. }) => {},
            _ => panic!("Expected ConfigError::TomlParse"),
        }
    }
}
