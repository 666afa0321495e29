//! Generator/parser feature flags and the resolved [`SmileConfig`].
//!
//! Flag names are the Smile feature names (`WRITE_HEADER`, `REQUIRE_HEADER`,
//! ...). They are parsed into closed enums and applied to fixed structs, so
//! a typo fails at configuration time instead of being silently ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::constants::{
    HEADER_BIT_HAS_RAW_BINARY, HEADER_BIT_HAS_SHARED_NAMES, HEADER_BIT_HAS_SHARED_STRING_VALUES,
    HEADER_VERSION_0,
};
use super::error::FeatureError;

/// Flag name to state, as handed over by a configuration source.
pub type FlagMap = BTreeMap<String, bool>;

/// Which half of the codec a flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSide {
    Generator,
    Parser,
}

impl fmt::Display for FeatureSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSide::Generator => f.write_str("generator"),
            FeatureSide::Parser => f.write_str("parser"),
        }
    }
}

/// Encoder-side toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorFeature {
    /// Emit the `:)\n` signature and version/feature byte.
    WriteHeader,
    /// Append 0xFF after the root value.
    WriteEndMarker,
    /// Binary payloads use 7-bit encoding; when off, the header announces raw binary.
    EncodeBinaryAs7Bit,
    /// Back-reference repeated property names.
    CheckSharedNames,
    /// Back-reference repeated short string values.
    CheckSharedStringValues,
    /// Recognized but has no effect: `&str` cannot hold unpaired surrogates.
    LenientUtfEncoding,
}

impl GeneratorFeature {
    pub const ALL: [GeneratorFeature; 6] = [
        GeneratorFeature::WriteHeader,
        GeneratorFeature::WriteEndMarker,
        GeneratorFeature::EncodeBinaryAs7Bit,
        GeneratorFeature::CheckSharedNames,
        GeneratorFeature::CheckSharedStringValues,
        GeneratorFeature::LenientUtfEncoding,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorFeature::WriteHeader => "WRITE_HEADER",
            GeneratorFeature::WriteEndMarker => "WRITE_END_MARKER",
            GeneratorFeature::EncodeBinaryAs7Bit => "ENCODE_BINARY_AS_7BIT",
            GeneratorFeature::CheckSharedNames => "CHECK_SHARED_NAMES",
            GeneratorFeature::CheckSharedStringValues => "CHECK_SHARED_STRING_VALUES",
            GeneratorFeature::LenientUtfEncoding => "LENIENT_UTF_ENCODING",
        }
    }

    pub fn enabled_by_default(self) -> bool {
        match self {
            GeneratorFeature::WriteHeader
            | GeneratorFeature::EncodeBinaryAs7Bit
            | GeneratorFeature::CheckSharedNames => true,
            GeneratorFeature::WriteEndMarker
            | GeneratorFeature::CheckSharedStringValues
            | GeneratorFeature::LenientUtfEncoding => false,
        }
    }
}

impl FromStr for GeneratorFeature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FeatureError::UnknownFeature {
                side: FeatureSide::Generator,
                name: s.to_owned(),
            })
    }
}

/// Decoder-side toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserFeature {
    /// Reject input that does not start with the `:)\n` signature.
    RequireHeader,
}

impl ParserFeature {
    pub const ALL: [ParserFeature; 1] = [ParserFeature::RequireHeader];

    pub fn name(self) -> &'static str {
        match self {
            ParserFeature::RequireHeader => "REQUIRE_HEADER",
        }
    }

    pub fn enabled_by_default(self) -> bool {
        match self {
            ParserFeature::RequireHeader => true,
        }
    }
}

impl FromStr for ParserFeature {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FeatureError::UnknownFeature {
                side: FeatureSide::Parser,
                name: s.to_owned(),
            })
    }
}

/// Resolved encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorFeatures {
    write_header: bool,
    write_end_marker: bool,
    encode_binary_as_7bit: bool,
    check_shared_names: bool,
    check_shared_string_values: bool,
    lenient_utf_encoding: bool,
}

impl Default for GeneratorFeatures {
    fn default() -> Self {
        Self {
            write_header: GeneratorFeature::WriteHeader.enabled_by_default(),
            write_end_marker: GeneratorFeature::WriteEndMarker.enabled_by_default(),
            encode_binary_as_7bit: GeneratorFeature::EncodeBinaryAs7Bit.enabled_by_default(),
            check_shared_names: GeneratorFeature::CheckSharedNames.enabled_by_default(),
            check_shared_string_values: GeneratorFeature::CheckSharedStringValues
                .enabled_by_default(),
            lenient_utf_encoding: GeneratorFeature::LenientUtfEncoding.enabled_by_default(),
        }
    }
}

impl GeneratorFeatures {
    pub fn configure(mut self, feature: GeneratorFeature, state: bool) -> Self {
        *self.slot(feature) = state;
        self
    }

    pub fn is_enabled(&self, feature: GeneratorFeature) -> bool {
        match feature {
            GeneratorFeature::WriteHeader => self.write_header,
            GeneratorFeature::WriteEndMarker => self.write_end_marker,
            GeneratorFeature::EncodeBinaryAs7Bit => self.encode_binary_as_7bit,
            GeneratorFeature::CheckSharedNames => self.check_shared_names,
            GeneratorFeature::CheckSharedStringValues => self.check_shared_string_values,
            GeneratorFeature::LenientUtfEncoding => self.lenient_utf_encoding,
        }
    }

    fn slot(&mut self, feature: GeneratorFeature) -> &mut bool {
        match feature {
            GeneratorFeature::WriteHeader => &mut self.write_header,
            GeneratorFeature::WriteEndMarker => &mut self.write_end_marker,
            GeneratorFeature::EncodeBinaryAs7Bit => &mut self.encode_binary_as_7bit,
            GeneratorFeature::CheckSharedNames => &mut self.check_shared_names,
            GeneratorFeature::CheckSharedStringValues => &mut self.check_shared_string_values,
            GeneratorFeature::LenientUtfEncoding => &mut self.lenient_utf_encoding,
        }
    }

    /// Version/feature byte that follows the signature.
    pub fn header_byte(&self) -> u8 {
        let mut byte = HEADER_VERSION_0;
        if self.check_shared_names {
            byte |= HEADER_BIT_HAS_SHARED_NAMES;
        }
        if self.check_shared_string_values {
            byte |= HEADER_BIT_HAS_SHARED_STRING_VALUES;
        }
        if !self.encode_binary_as_7bit {
            byte |= HEADER_BIT_HAS_RAW_BINARY;
        }
        byte
    }

    /// Applies every entry of `flags`, failing on the first unknown name.
    pub fn apply(self, flags: &FlagMap) -> Result<Self, FeatureError> {
        flags.iter().try_fold(self, |acc, (name, &state)| {
            Ok(acc.configure(name.parse()?, state))
        })
    }
}

/// Resolved decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserFeatures {
    require_header: bool,
}

impl Default for ParserFeatures {
    fn default() -> Self {
        Self {
            require_header: ParserFeature::RequireHeader.enabled_by_default(),
        }
    }
}

impl ParserFeatures {
    pub fn configure(mut self, feature: ParserFeature, state: bool) -> Self {
        match feature {
            ParserFeature::RequireHeader => self.require_header = state,
        }
        self
    }

    pub fn is_enabled(&self, feature: ParserFeature) -> bool {
        match feature {
            ParserFeature::RequireHeader => self.require_header,
        }
    }

    pub fn apply(self, flags: &FlagMap) -> Result<Self, FeatureError> {
        flags.iter().try_fold(self, |acc, (name, &state)| {
            Ok(acc.configure(name.parse()?, state))
        })
    }
}

/// Immutable encoder + decoder configuration.
///
/// Built once per configure call and shared read-only afterwards; a new
/// configuration replaces an old one rather than mutating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SmileConfig {
    pub generator: GeneratorFeatures,
    pub parser: ParserFeatures,
}

impl SmileConfig {
    pub fn new(generator: GeneratorFeatures, parser: ParserFeatures) -> Self {
        Self { generator, parser }
    }

    /// Resolves named flags on top of the format defaults.
    ///
    /// An absent map keeps the defaults for that side. Any unknown name
    /// fails the whole call; nothing is half-applied.
    pub fn from_flags(
        generator: Option<&FlagMap>,
        parser: Option<&FlagMap>,
    ) -> Result<Self, FeatureError> {
        let mut config = SmileConfig::default();
        if let Some(flags) = generator {
            config.generator = config.generator.apply(flags)?;
        }
        if let Some(flags) = parser {
            config.parser = config.parser.apply(flags)?;
        }
        debug!(
            generator = ?config.generator,
            parser = ?config.parser,
            "smile features resolved"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(entries: &[(&str, bool)]) -> FlagMap {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn defaults_match_format() {
        let config = SmileConfig::default();
        assert!(config.generator.is_enabled(GeneratorFeature::WriteHeader));
        assert!(!config.generator.is_enabled(GeneratorFeature::WriteEndMarker));
        assert!(config.generator.is_enabled(GeneratorFeature::EncodeBinaryAs7Bit));
        assert!(config.generator.is_enabled(GeneratorFeature::CheckSharedNames));
        assert!(!config.generator.is_enabled(GeneratorFeature::CheckSharedStringValues));
        assert!(config.parser.is_enabled(ParserFeature::RequireHeader));
        assert_eq!(config.generator.header_byte(), 0x01);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for f in GeneratorFeature::ALL {
            assert_eq!(f.name().parse::<GeneratorFeature>(), Ok(f));
        }
        for f in ParserFeature::ALL {
            assert_eq!(f.name().parse::<ParserFeature>(), Ok(f));
        }
    }

    #[test]
    fn from_flags_applies_both_sides() {
        let config = SmileConfig::from_flags(
            Some(&flags(&[("WRITE_HEADER", false), ("CHECK_SHARED_STRING_VALUES", true)])),
            Some(&flags(&[("REQUIRE_HEADER", false)])),
        )
        .unwrap();
        assert!(!config.generator.is_enabled(GeneratorFeature::WriteHeader));
        assert!(config.generator.is_enabled(GeneratorFeature::CheckSharedStringValues));
        assert!(!config.parser.is_enabled(ParserFeature::RequireHeader));
    }

    #[test]
    fn unknown_flag_fails_fast() {
        let err = SmileConfig::from_flags(Some(&flags(&[("WRITE_HEADR", false)])), None)
            .unwrap_err();
        assert_eq!(
            err,
            FeatureError::UnknownFeature {
                side: FeatureSide::Generator,
                name: "WRITE_HEADR".into()
            }
        );

        // a generator flag is not a parser flag
        let err = SmileConfig::from_flags(None, Some(&flags(&[("WRITE_HEADER", false)])))
            .unwrap_err();
        assert!(matches!(
            err,
            FeatureError::UnknownFeature { side: FeatureSide::Parser, .. }
        ));
    }

    #[test]
    fn lenient_utf_encoding_is_accepted_and_inert() {
        let config =
            SmileConfig::from_flags(Some(&flags(&[("LENIENT_UTF_ENCODING", true)])), None).unwrap();
        assert!(config.generator.is_enabled(GeneratorFeature::LenientUtfEncoding));
        assert_eq!(config.generator.header_byte(), GeneratorFeatures::default().header_byte());
    }

    #[test]
    fn header_byte_reflects_sharing_and_binary_flags() {
        let generator = GeneratorFeatures::default()
            .configure(GeneratorFeature::CheckSharedNames, false)
            .configure(GeneratorFeature::CheckSharedStringValues, true)
            .configure(GeneratorFeature::EncodeBinaryAs7Bit, false);
        assert_eq!(generator.header_byte(), 0x06);
    }
}
