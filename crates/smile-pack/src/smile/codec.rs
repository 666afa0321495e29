//! `SmileCodec` pairs an encoder and a decoder bound to one [`SmileConfig`].

use tracing::trace;

use super::decoder::SmileDecoder;
use super::encoder::SmileEncoder;
use super::error::SmileError;
use super::features::SmileConfig;
use crate::json::{self, JsonError};
use crate::SmileValue;

/// Stateless codec: every call builds its own encoder or decoder, so one
/// `SmileCodec` can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmileCodec {
    config: SmileConfig,
}

impl SmileCodec {
    pub fn new(config: SmileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SmileConfig {
        &self.config
    }

    pub fn encode(&self, value: &SmileValue) -> Vec<u8> {
        SmileEncoder::new(self.config.generator).encode(value)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<SmileValue, SmileError> {
        SmileDecoder::new(self.config.parser).decode(bytes)
    }

    /// JSON text → Smile bytes.
    pub fn encode_json_text(&self, text: &str) -> Result<Vec<u8>, JsonError> {
        let value = json::parse(text)?;
        let bytes = self.encode(&value);
        trace!(text_len = text.len(), smile_len = bytes.len(), "encoded smile document");
        Ok(bytes)
    }

    /// Smile bytes → compact JSON text.
    pub fn decode_json_text(&self, bytes: &[u8]) -> Result<String, SmileError> {
        let value = self.decode(bytes)?;
        let text = json::render(&value);
        trace!(smile_len = bytes.len(), text_len = text.len(), "decoded smile document");
        Ok(text)
    }
}
