//! Smile binary JSON: feature flags, encoder, decoder and codec.
//!
//! A document is an optional 4-byte header (`:)\n` plus a version/feature
//! byte), one root value, and an optional 0xFF end marker.

pub mod constants;
mod codec;
mod decoder;
mod encoder;
mod error;
mod features;
pub mod util;

pub use codec::SmileCodec;
pub use decoder::SmileDecoder;
pub use encoder::SmileEncoder;
pub use error::{FeatureError, SharedKind, SmileError};
pub use features::{
    FeatureSide, FlagMap, GeneratorFeature, GeneratorFeatures, ParserFeature, ParserFeatures,
    SmileConfig,
};
