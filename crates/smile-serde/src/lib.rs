//! JSON ↔ Smile record serde.
//!
//! [`SmileSerde`] is configured once from [`SerdeProperties`] and then hands
//! out cheap [`SmileSerializer`] / [`SmileDeserializer`] values that share
//! the resulting read-only configuration across threads.

pub mod cli;
mod codec;
mod error;
mod properties;

pub use codec::{
    DeserializeResult, DeserializeResultType, Deserializer, RecordHeaders, SchemaDescription, Serde,
    Serializer, SmileDeserializer, SmileSerde, SmileSerializer, Target,
};
pub use error::{ConfigError, SerdeError, SerdeResult};
pub use properties::{parse_flag, SerdeProperties};
