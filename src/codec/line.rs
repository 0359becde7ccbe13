//! Per-line codec: hex decoding, single-byte XOR and the plaintext filter.

use crate::error::{Result, XorsweepError};
use serde::{Deserialize, Serialize};

/// A key that turned one ciphertext line into plausible plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyMatch {
    pub key: u8,
    pub plaintext: String,
}

/// Decode one hex line (two digits per byte, either case)
pub fn decode_hex(line: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(line)?)
}

/// XOR every byte with `key`
pub fn xor_with_key(bytes: &[u8], key: u8) -> Vec<u8> {
    bytes.iter().map(|b| b ^ key).collect()
}

/// True iff every byte is an ASCII letter, a space or a newline.
///
/// This is a coarse filter and accepts short coincidental matches.
pub fn is_plausible(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .all(|&b| b.is_ascii_alphabetic() || b == b' ' || b == b'\n')
}

/// Character class a decoding must fall in to be reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// ASCII letters, space and newline only
    #[default]
    Strict,
    /// Strict plus digits and common punctuation
    Prose,
}

impl Charset {
    pub fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            Self::Strict => is_plausible(bytes),
            Self::Prose => bytes
                .iter()
                .all(|&b| b.is_ascii_alphanumeric() || b" \n'\",.;:!?-".contains(&b)),
        }
    }
}

impl std::str::FromStr for Charset {
    type Err = XorsweepError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "prose" => Ok(Self::Prose),
            _ => Err(XorsweepError::InvalidConfig(format!("charset: {}", s))),
        }
    }
}

/// Strip a trailing `\n` or `\r\n`
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Try all 256 keys against one line, keeping plausible decodings in key order
pub fn crack_line(line: &str) -> Result<Vec<KeyMatch>> {
    crack_line_with(line, Charset::Strict)
}

/// [`crack_line`] with an explicit character class
pub fn crack_line_with(line: &str, charset: Charset) -> Result<Vec<KeyMatch>> {
    let ciphertext = decode_hex(line)?;
    let mut matches = Vec::new();

    for key in 0..=u8::MAX {
        let decoded = xor_with_key(&ciphertext, key);
        if charset.accepts(&decoded) {
            matches.push(KeyMatch {
                key,
                plaintext: decoded.iter().map(|&b| b as char).collect(),
            });
        }
    }

    Ok(matches)
}

/// Every key's decoding of one line, plausible or not
pub fn decode_all(line: &str) -> Result<Vec<(u8, Vec<u8>)>> {
    let ciphertext = decode_hex(line)?;
    Ok((0..=u8::MAX)
        .map(|key| (key, xor_with_key(&ciphertext, key)))
        .collect())
}

/// Encrypt `plaintext` under a single-byte key and hex-encode it
pub fn encrypt_line(plaintext: &[u8], key: u8) -> String {
    hex::encode(xor_with_key(plaintext, key))
}
