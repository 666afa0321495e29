//! Pluggable record serde backed by the Smile codec.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Serde`] | Factory a host queries per topic and target |
//! | [`Serializer`] | JSON text → record bytes |
//! | [`Deserializer`] | Record bytes → JSON text plus metadata |
//!
//! [`SmileSerde::configure`] takes `&mut self`, so it always happens-before
//! the serializers it hands out. Each serializer keeps the configuration it
//! was created with, even across a later `configure`.

use std::collections::BTreeMap;
use std::sync::Arc;

use smile_pack::{SmileCodec, SmileConfig};
use tracing::{debug, trace};

use crate::error::SerdeResult;
use crate::properties::SerdeProperties;

/// Which part of a record a serde handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Key,
    Value,
}

/// Schema text a serde may report for a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescription {
    pub schema: String,
    pub description: Option<String>,
}

/// How the host should interpret [`DeserializeResult::result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeserializeResultType {
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeserializeResult {
    pub result: String,
    pub kind: DeserializeResultType,
    pub additional_properties: BTreeMap<String, serde_json::Value>,
}

impl DeserializeResult {
    pub fn json(result: String) -> Self {
        Self {
            result,
            kind: DeserializeResultType::Json,
            additional_properties: BTreeMap::new(),
        }
    }
}

/// Record headers as delivered by the host.
pub type RecordHeaders = [(String, Vec<u8>)];

/// Turns JSON text into record bytes.
pub trait Serializer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SerdeError::Serialization`](crate::SerdeError::Serialization)
    /// if `input` is not valid JSON.
    fn serialize(&self, input: &str) -> SerdeResult<Vec<u8>>;
}

/// Turns record bytes back into JSON text.
pub trait Deserializer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SerdeError::Deserialization`](crate::SerdeError::Deserialization)
    /// if `payload` is malformed, truncated, or lacks a required header.
    fn deserialize(&self, headers: &RecordHeaders, payload: &[u8])
        -> SerdeResult<DeserializeResult>;
}

/// A serde the host can plug in per topic and target.
pub trait Serde {
    type Serializer: Serializer;
    type Deserializer: Deserializer;

    fn description(&self) -> Option<String>;

    fn schema(&self, topic: &str, target: Target) -> Option<SchemaDescription>;

    fn can_serialize(&self, topic: &str, target: Target) -> bool;

    fn can_deserialize(&self, topic: &str, target: Target) -> bool;

    fn serializer(&self, topic: &str, target: Target) -> Self::Serializer;

    fn deserializer(&self, topic: &str, target: Target) -> Self::Deserializer;
}

/// JSON ↔ Smile serde.
#[derive(Debug, Clone, Default)]
pub struct SmileSerde {
    config: Arc<SmileConfig>,
}

impl SmileSerde {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SmileConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &SmileConfig {
        &self.config
    }

    /// Applies the flags in `properties`. On failure nothing changes.
    pub fn configure(&mut self, properties: &SerdeProperties) -> SerdeResult<()> {
        let config = properties.resolve().map_err(|e| {
            debug!(error = %e, "smile serde configuration rejected");
            e
        })?;
        self.config = Arc::new(config);
        Ok(())
    }
}

impl Serde for SmileSerde {
    type Serializer = SmileSerializer;
    type Deserializer = SmileDeserializer;

    fn description(&self) -> Option<String> {
        None
    }

    fn schema(&self, _topic: &str, _target: Target) -> Option<SchemaDescription> {
        None
    }

    fn can_serialize(&self, _topic: &str, _target: Target) -> bool {
        true
    }

    fn can_deserialize(&self, _topic: &str, _target: Target) -> bool {
        true
    }

    fn serializer(&self, _topic: &str, _target: Target) -> SmileSerializer {
        SmileSerializer {
            config: Arc::clone(&self.config),
        }
    }

    fn deserializer(&self, _topic: &str, _target: Target) -> SmileDeserializer {
        SmileDeserializer {
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmileSerializer {
    config: Arc<SmileConfig>,
}

impl Serializer for SmileSerializer {
    fn serialize(&self, input: &str) -> SerdeResult<Vec<u8>> {
        SmileCodec::new(*self.config)
            .encode_json_text(input)
            .map_err(|e| {
                debug!(error = %e, input_len = input.len(), "smile serialize failed");
                e.into()
            })
    }
}

#[derive(Debug, Clone)]
pub struct SmileDeserializer {
    config: Arc<SmileConfig>,
}

impl Deserializer for SmileDeserializer {
    fn deserialize(
        &self,
        headers: &RecordHeaders,
        payload: &[u8],
    ) -> SerdeResult<DeserializeResult> {
        trace!(headers = headers.len(), payload_len = payload.len(), "smile deserialize");
        let text = SmileCodec::new(*self.config)
            .decode_json_text(payload)
            .map_err(|e| {
                debug!(error = %e, payload_len = payload.len(), "smile deserialize failed");
                e
            })?;
        Ok(DeserializeResult::json(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SerdeError;

    #[test]
    fn capabilities_ignore_topic_and_target() {
        let serde = SmileSerde::new();
        for target in [Target::Key, Target::Value] {
            assert!(serde.can_serialize("orders", target));
            assert!(serde.can_deserialize("", target));
            assert!(serde.schema("orders", target).is_none());
        }
        assert!(serde.description().is_none());
    }

    #[test]
    fn serializer_and_deserializer_pair() {
        let serde = SmileSerde::new();
        let bytes = serde
            .serializer("t", Target::Value)
            .serialize(r#"{"id":7,"tags":["a","b"]}"#)
            .unwrap();
        let out = serde
            .deserializer("t", Target::Value)
            .deserialize(&[("trace".to_owned(), b"abc".to_vec())], &bytes)
            .unwrap();
        assert_eq!(out, DeserializeResult::json(r#"{"id":7,"tags":["a","b"]}"#.to_owned()));
        assert_eq!(out.kind, DeserializeResultType::Json);
        assert!(out.additional_properties.is_empty());
    }

    #[test]
    fn failed_configure_keeps_previous_config() {
        let mut serde = SmileSerde::new();
        serde
            .configure(&SerdeProperties::new().with_generator_flag("WRITE_HEADER", false))
            .unwrap();
        let before = *serde.config();

        let err = serde
            .configure(
                &SerdeProperties::new()
                    .with_generator_flag("WRITE_HEADER", true)
                    .with_generator_flag("NOT_A_FLAG", true),
            )
            .unwrap_err();
        assert!(matches!(err, SerdeError::Configuration(_)));
        assert_eq!(*serde.config(), before);
    }
}
