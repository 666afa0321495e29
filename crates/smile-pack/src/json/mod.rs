//! JSON text bridge: parse text into [`SmileValue`](crate::SmileValue) and
//! render it back.

mod decoder;
mod encoder;
mod error;

pub use decoder::{parse, parse_slice};
pub use encoder::{render, render_pretty, JsonEncoder};
pub use error::JsonError;
