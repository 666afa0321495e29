//! Core logic of the `smile-pack` and `smile-unpack` binaries.
//!
//! - `smile-pack`: JSON text (stdin) → Smile bytes (stdout)
//! - `smile-unpack`: Smile bytes (stdin) → JSON text (stdout)

use std::path::PathBuf;

use clap::Args;
use smile_pack::json::render_pretty;
use smile_pack::SmileCodec;
use tracing_subscriber::EnvFilter;

use crate::codec::{Deserializer, Serde, Serializer, SmileSerde, Target};
use crate::error::{ConfigError, SerdeResult};
use crate::properties::{parse_flag, SerdeProperties};

/// Feature options shared by both tools.
#[derive(Debug, Clone, Default, Args)]
pub struct FeatureArgs {
    /// TOML file with `generator` / `parser` flag tables
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Encoder flag, e.g. WRITE_HEADER=false (repeatable)
    #[arg(long = "generator", value_name = "NAME=BOOL", value_parser = parse_flag_arg)]
    pub generator: Vec<(String, bool)>,

    /// Decoder flag, e.g. REQUIRE_HEADER=false (repeatable)
    #[arg(long = "parser", value_name = "NAME=BOOL", value_parser = parse_flag_arg)]
    pub parser: Vec<(String, bool)>,
}

fn parse_flag_arg(arg: &str) -> Result<(String, bool), String> {
    parse_flag(arg).map_err(|e| e.to_string())
}

impl FeatureArgs {
    /// Config file first, then command-line flags on top.
    pub fn properties(&self) -> Result<SerdeProperties, ConfigError> {
        let mut props = match &self.config {
            Some(path) => SerdeProperties::load(path)?,
            None => SerdeProperties::new(),
        };
        for (name, state) in &self.generator {
            props = props.with_generator_flag(name.clone(), *state);
        }
        for (name, state) in &self.parser {
            props = props.with_parser_flag(name.clone(), *state);
        }
        Ok(props)
    }

    pub fn serde(&self) -> SerdeResult<SmileSerde> {
        let mut serde = SmileSerde::new();
        serde.configure(&self.properties()?)?;
        Ok(serde)
    }
}

/// Encode JSON text to Smile bytes.
pub fn pack(json: &str, features: &FeatureArgs) -> SerdeResult<Vec<u8>> {
    features.serde()?.serializer("", Target::Value).serialize(json)
}

/// Decode Smile bytes to JSON text, optionally pretty-printed.
pub fn unpack(bytes: &[u8], features: &FeatureArgs, pretty: bool) -> SerdeResult<String> {
    let serde = features.serde()?;
    if !pretty {
        let result = serde.deserializer("", Target::Value).deserialize(&[], bytes)?;
        return Ok(result.result);
    }
    let value = SmileCodec::new(*serde.config()).decode(bytes)?;
    Ok(render_pretty(&value))
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
