use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use xorsweep::codec::{encrypt_line, to_hex};

/// Shape of a generated detection file
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Total lines, including the planted one
    pub lines: usize,
    /// Bytes per random line before hex encoding
    pub width: usize,
    /// Planted key; random when `None`
    pub key: Option<u8>,
    pub plaintext: String,
    /// Fixed seed for reproducible files
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            lines: 327,
            width: 30,
            key: None,
            plaintext: "Now that the party is jumping\n".into(),
            seed: None,
        }
    }
}

/// Where the encrypted line ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planted {
    /// 1-based line number
    pub line: usize,
    pub key: u8,
}

/// Write random hex lines with one single-byte XOR line hidden among them
pub fn generate(output: &Path, options: &GenerateOptions) -> Result<Planted> {
    if options.lines == 0 {
        bail!("need at least one line to plant the secret in");
    }
    if options.width == 0 {
        bail!("line width must be at least one byte");
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let key = options.key.unwrap_or_else(|| rng.gen());
    let line = rng.gen_range(1..=options.lines);

    let mut writer = BufWriter::new(File::create(output)?);
    let mut noise = vec![0u8; options.width];
    for n in 1..=options.lines {
        if n == line {
            writeln!(writer, "{}", encrypt_line(options.plaintext.as_bytes(), key))?;
        } else {
            rng.fill_bytes(&mut noise);
            writeln!(writer, "{}", to_hex(&noise))?;
        }
    }
    writer.flush()?;

    Ok(Planted { line, key })
}
