//! `smile-unpack`: decode Smile (stdin) to JSON (stdout).

use std::io::{self, Read, Write};

use clap::Parser;
use smile_serde::cli::{init_tracing, unpack, FeatureArgs};

#[derive(Debug, Parser)]
#[command(name = "smile-unpack", version, about = "Decode Smile from stdin as JSON text on stdout")]
struct Cli {
    #[command(flatten)]
    features: FeatureArgs,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match unpack(&buf, &cli.features, cli.pretty) {
        Ok(json) => {
            let mut stdout = io::stdout();
            if let Err(e) = stdout
                .write_all(json.as_bytes())
                .and_then(|()| stdout.write_all(b"\n"))
            {
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
