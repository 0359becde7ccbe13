use anyhow::Result;
use xorsweep::codec::{crack_line_with, decode_all, Charset};

/// Try every key against one hex line.
///
/// By default only plausible decodings are listed; `all` lists the whole
/// key space with non-printable bytes escaped.
pub fn crack(hex_line: &str, charset: Charset, all: bool) -> Result<String> {
    let mut output = String::new();
    output.push_str("Single-Byte XOR Crack\n");
    output.push_str("=====================\n\n");

    if all {
        for (key, bytes) in decode_all(hex_line)? {
            output.push_str(&format!("{:3} {:?}: {}\n", key, key as char, escape(&bytes)));
        }
        return Ok(output);
    }

    let matches = crack_line_with(hex_line, charset)?;
    if matches.is_empty() {
        output.push_str("No plausible key\n");
    }
    for m in &matches {
        output.push_str(&format!("{:3} {:?}: {:?}\n", m.key, m.key as char, m.plaintext));
    }
    Ok(output)
}

fn escape(bytes: &[u8]) -> String {
    bytes
        .iter()
        .flat_map(|&b| std::ascii::escape_default(b))
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOKING: &str = "1b37373331363f78151b7f2b783431333d78397828372d363c78373e783a393b3736";

    #[test]
    fn test_crack_prose_line() {
        let out = crack(COOKING, Charset::Prose, false).unwrap();
        assert!(out.contains(" 88 'X': \"Cooking MC's like a pound of bacon\""));
    }

    #[test]
    fn test_crack_all_lists_every_key() {
        let out = crack("00", Charset::Strict, true).unwrap();
        let rows = out.lines().filter(|l| l.contains(": ")).count();
        assert_eq!(rows, 256);
        assert!(out.contains(" 65 'A': A\n"));
    }

    #[test]
    fn test_crack_rejects_bad_hex() {
        assert!(crack("xyz", Charset::Strict, false).is_err());
    }
}
