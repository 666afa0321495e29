//! Feature flag sources.
//!
//! A properties document carries two optional tables of flag name to
//! boolean, one per codec side:
//!
//! ```toml
//! [generator]
//! WRITE_HEADER = false
//!
//! [parser]
//! REQUIRE_HEADER = false
//! ```
//!
//! Other top-level keys belong to the host and are ignored here.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smile_pack::{FlagMap, SmileConfig};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerdeProperties {
    /// Encoder-side flags.
    pub generator: Option<FlagMap>,
    /// Decoder-side flags.
    pub parser: Option<FlagMap>,
}

impl SerdeProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_generator_flag(mut self, name: impl Into<String>, state: bool) -> Self {
        self.generator
            .get_or_insert_with(FlagMap::new)
            .insert(name.into(), state);
        self
    }

    pub fn with_parser_flag(mut self, name: impl Into<String>, state: bool) -> Self {
        self.parser
            .get_or_insert_with(FlagMap::new)
            .insert(name.into(), state);
        self
    }

    /// Validates every flag name and builds the codec configuration.
    pub fn resolve(&self) -> Result<SmileConfig, ConfigError> {
        Ok(SmileConfig::from_flags(
            self.generator.as_ref(),
            self.parser.as_ref(),
        )?)
    }
}

/// Parses a `NAME=BOOL` command-line flag.
pub fn parse_flag(arg: &str) -> Result<(String, bool), ConfigError> {
    let (name, state) = arg
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidFlag(arg.to_owned()))?;
    let state = match state.trim() {
        "true" => true,
        "false" => false,
        _ => return Err(ConfigError::InvalidFlag(arg.to_owned())),
    };
    Ok((name.trim().to_owned(), state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use smile_pack::{GeneratorFeature, ParserFeature};

    #[test]
    fn toml_document_with_both_sides() {
        let props = SerdeProperties::from_toml_str(
            r#"
            topic = "ignored"

            [generator]
            WRITE_HEADER = false
            CHECK_SHARED_STRING_VALUES = true

            [parser]
            REQUIRE_HEADER = false
            "#,
        )
        .unwrap();
        let config = props.resolve().unwrap();
        assert!(!config.generator.is_enabled(GeneratorFeature::WriteHeader));
        assert!(config
            .generator
            .is_enabled(GeneratorFeature::CheckSharedStringValues));
        assert!(!config.parser.is_enabled(ParserFeature::RequireHeader));
    }

    #[test]
    fn empty_document_gives_defaults() {
        let props = SerdeProperties::from_toml_str("").unwrap();
        assert_eq!(props, SerdeProperties::default());
        assert_eq!(props.resolve().unwrap(), SmileConfig::default());
    }

    #[test]
    fn non_boolean_value_is_a_parse_error() {
        let err =
            SerdeProperties::from_toml_str("[generator]\nWRITE_HEADER = \"no\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_name_is_a_feature_error() {
        let err = SerdeProperties::new()
            .with_parser_flag("REQUIRE_HEADERZ", true)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Feature(_)));
        assert!(err.to_string().contains("REQUIRE_HEADERZ"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SerdeProperties::load("/nonexistent/smile.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn flag_arguments() {
        assert_eq!(
            parse_flag("WRITE_HEADER=false").unwrap(),
            ("WRITE_HEADER".to_owned(), false)
        );
        assert_eq!(
            parse_flag("REQUIRE_HEADER = true").unwrap(),
            ("REQUIRE_HEADER".to_owned(), true)
        );
        assert!(matches!(parse_flag("WRITE_HEADER"), Err(ConfigError::InvalidFlag(_))));
        assert!(matches!(parse_flag("WRITE_HEADER=1"), Err(ConfigError::InvalidFlag(_))));
    }
}
