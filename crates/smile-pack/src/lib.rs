//! Smile binary JSON codec.
//!
//! [`SmileCodec`] turns a [`SmileValue`] tree (or JSON text) into Smile bytes
//! and back, driven by the generator and parser flags in [`SmileConfig`].

mod smile_value;

pub mod json;
pub mod smile;

pub use smile::{
    FeatureError, FeatureSide, FlagMap, GeneratorFeature, GeneratorFeatures, ParserFeature,
    ParserFeatures, SharedKind, SmileCodec, SmileConfig, SmileDecoder, SmileEncoder, SmileError,
};
pub use num_bigint::BigInt;
pub use smile_value::SmileValue;
