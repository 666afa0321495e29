//! Smile error types.

use smile_buffers::BufferError;
use thiserror::Error;

use super::features::FeatureSide;

/// Errors raised while resolving feature flags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("unknown smile {side} feature '{name}'")]
    UnknownFeature { side: FeatureSide, name: String },
}

/// Which back-reference table a shared-string token points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedKind {
    Name,
    Value,
}

impl std::fmt::Display for SharedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SharedKind::Name => f.write_str("property name"),
            SharedKind::Value => f.write_str("string value"),
        }
    }
}

/// Errors raised while decoding a Smile document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmileError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("invalid UTF-8 in string at byte {0}")]
    InvalidUtf8(usize),
    #[error("missing smile header: input does not start with ':)\\n'")]
    MissingHeader,
    #[error("unsupported smile version {0}")]
    UnsupportedVersion(u8),
    #[error("invalid value token 0x{byte:02x} at byte {position}")]
    InvalidToken { byte: u8, position: usize },
    #[error("invalid key token 0x{byte:02x} at byte {position}")]
    InvalidKeyToken { byte: u8, position: usize },
    #[error("shared {kind} reference #{index} at byte {position} has no matching entry")]
    InvalidSharedReference {
        kind: SharedKind,
        index: usize,
        position: usize,
    },
    #[error("shared {kind} reference at byte {position}, but the header disabled them")]
    SharedReferencesDisabled { kind: SharedKind, position: usize },
    #[error("malformed variable-length integer at byte {0}")]
    InvalidVint(usize),
    #[error("invalid 7-bit encoded byte at {0}")]
    InvalidSevenBit(usize),
    #[error("empty number payload at byte {0}")]
    InvalidNumber(usize),
    #[error("unexpected data after the root value at byte {0}")]
    TrailingData(usize),
    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

impl From<BufferError> for SmileError {
    fn from(e: BufferError) -> Self {
        match e {
            BufferError::EndOfBuffer { position, .. } => SmileError::UnexpectedEof(position),
            BufferError::InvalidUtf8(position) => SmileError::InvalidUtf8(position),
            BufferError::MissingTerminator { position, .. } => SmileError::UnexpectedEof(position),
        }
    }
}
