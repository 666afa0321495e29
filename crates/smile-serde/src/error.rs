//! Error types for the record serde.

use std::path::PathBuf;

use smile_pack::json::JsonError;
use smile_pack::{FeatureError, SmileError};
use thiserror::Error;

/// Errors raised while resolving [`SerdeProperties`](crate::SerdeProperties).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error("invalid configuration document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command-line flag that is not `NAME=BOOL`.
    #[error("invalid feature flag '{0}', expected NAME=true or NAME=false")]
    InvalidFlag(String),
}

/// Errors surfaced by [`SmileSerde`](crate::SmileSerde) and its
/// serializer / deserializer.
#[derive(Debug, Error)]
pub enum SerdeError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] JsonError),

    #[error("deserialization error: {0}")]
    Deserialization(#[from] SmileError),
}

/// Convenience alias.
pub type SerdeResult<T> = Result<T, SerdeError>;
