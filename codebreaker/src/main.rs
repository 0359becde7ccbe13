mod crack;
mod generate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crack::crack;
use generate::{generate, GenerateOptions};
use std::path::PathBuf;
use xorsweep::codec::{fixed_xor_hex, hex_to_base64, Charset};
use xorsweep::scan_file;

#[derive(Parser)]
#[command(name = "codebreaker")]
#[command(about = "Hex, XOR and single-byte key tools to go with xorsweep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-encode a hex string as base64
    Hex2b64 {
        hex: String,
    },

    /// XOR two equal-length hex strings
    FixedXor {
        left: String,
        right: String,
    },

    /// Try every single-byte key against one hex line
    Crack {
        hex: String,

        /// List all 256 decodings, plausible or not
        #[arg(long)]
        all: bool,

        #[arg(long, default_value = "strict", value_parser = parse_charset)]
        charset: Charset,
    },

    /// Scan a file sequentially on one thread
    Scan {
        file: PathBuf,

        #[arg(long, default_value = "strict", value_parser = parse_charset)]
        charset: Charset,
    },

    /// Write a test file with one single-byte XOR line among random ones
    Generate {
        output: PathBuf,

        /// Total number of lines
        #[arg(long, default_value_t = 327)]
        lines: usize,

        /// Random bytes per noise line
        #[arg(long, default_value_t = 30)]
        width: usize,

        /// Key for the planted line (default: random)
        #[arg(long)]
        key: Option<u8>,

        /// Text of the planted line
        #[arg(long, default_value = "Now that the party is jumping\n")]
        plaintext: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_charset(s: &str) -> Result<Charset, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Hex2b64 { hex } => {
            println!("{}", hex_to_base64(&hex)?);
        }
        Commands::FixedXor { left, right } => {
            println!("{}", fixed_xor_hex(&left, &right)?);
        }
        Commands::Crack { hex, all, charset } => {
            print!("{}", crack(&hex, charset, all)?);
        }
        Commands::Scan { file, charset } => {
            let report = scan_file(&file, charset)?;
            print!("{}", report);
        }
        Commands::Generate {
            output,
            lines,
            width,
            key,
            plaintext,
            seed,
        } => {
            let options = GenerateOptions {
                lines,
                width,
                key,
                plaintext,
                seed,
            };
            let planted = generate(&output, &options)?;
            println!(
                "Wrote {} lines to {} (key {} on line {})",
                lines,
                output.display(),
                planted.key,
                planted.line
            );
        }
    }

    Ok(())
}
