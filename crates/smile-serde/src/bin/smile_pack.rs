//! `smile-pack`: encode JSON (stdin) to Smile (stdout).

use std::io::{self, Read, Write};

use clap::Parser;
use smile_serde::cli::{init_tracing, pack, FeatureArgs};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "smile-pack", version, about = "Encode JSON text from stdin as Smile on stdout")]
struct Cli {
    #[command(flatten)]
    features: FeatureArgs,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match pack(buf.trim(), &cli.features) {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "packed");
            if let Err(e) = io::stdout().write_all(&bytes) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
