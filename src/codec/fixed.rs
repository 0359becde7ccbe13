use crate::error::{Result, XorsweepError};

/// XOR two equal-length buffers
pub fn fixed_xor(left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    if left.len() != right.len() {
        return Err(XorsweepError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(left.iter().zip(right).map(|(a, b)| a ^ b).collect())
}

/// Hex-in, hex-out variant of [`fixed_xor`]
pub fn fixed_xor_hex(left: &str, right: &str) -> Result<String> {
    let left = hex::decode(left.trim())?;
    let right = hex::decode(right.trim())?;
    Ok(hex::encode(fixed_xor(&left, &right)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_xor_known_vector() {
        let out = fixed_xor_hex(
            "1c0111001f010100061a024b53535009181c",
            "686974207468652062756c6c277320657965",
        )
        .unwrap();
        assert_eq!(out, "746865206b696420646f6e277420706c6179");
    }

    #[test]
    fn test_fixed_xor_self_is_zero() {
        let data = b"any buffer at all";
        assert!(fixed_xor(data, data).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fixed_xor_length_mismatch() {
        let err = fixed_xor(b"abc", b"ab").unwrap_err();
        assert!(matches!(
            err,
            XorsweepError::LengthMismatch { left: 3, right: 2 }
        ));
    }
}
