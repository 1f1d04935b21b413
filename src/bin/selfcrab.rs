//! selfcrab CLI
//!
//! Decodes SELFIES strings to SMILES, one per line. Inputs come from the
//! positional arguments, or from stdin (one per line) when none are given.
//! Set `RUST_LOG=debug` to see per-fragment decoder logs on stderr.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use selfcrab::{Decoder, DecoderConfig};

#[derive(Parser)]
#[command(name = "selfcrab")]
#[command(author, version, about = "Decode SELFIES strings to SMILES", long_about = None)]
struct Cli {
    /// SELFIES strings to decode (default: read lines from stdin)
    inputs: Vec<String>,

    /// Write aromatic atoms and bonds as derived instead of kekulizing
    #[arg(long)]
    keep_aromatic: bool,

    /// Stop at the first input that fails to decode
    #[arg(long)]
    fail_fast: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let decoder = Decoder::new(DecoderConfig {
        kekulize: !cli.keep_aromatic,
    });

    let inputs: Vec<String> = if cli.inputs.is_empty() {
        std::io::stdin().lock().lines().collect::<Result<_, _>>()?
    } else {
        cli.inputs
    };

    let mut stdout = std::io::stdout().lock();
    for (line, input) in inputs.iter().enumerate() {
        let input = input.trim();
        match decoder.decode(input) {
            Ok(smiles) => writeln!(stdout, "{smiles}")?,
            Err(e) => {
                eprintln!("line {}: {input}: {e}", line + 1);
                if cli.fail_fast {
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
