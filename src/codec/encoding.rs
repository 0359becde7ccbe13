use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Re-encode a hex string as standard, padded base64
pub fn hex_to_base64(hex_str: &str) -> Result<String> {
    let bytes = hex::decode(hex_str.trim())?;
    Ok(STANDARD.encode(bytes))
}

/// Lowercase hex of `bytes`
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
