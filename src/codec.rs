//! Unpadded base64url codec shared by SSO tokens and the session cookie.

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// URL-safe alphabet, no padding on encode, padding optional on decode.
///
/// Trailing bits must be canonical, so two different strings never decode to
/// the same bytes.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Input was not valid base64url.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid base64url input: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

/// Encodes bytes as base64url without `=` padding.
#[must_use]
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ENGINE.encode(bytes)
}

/// Decodes base64url text, with or without trailing `=` padding.
///
/// # Errors
///
/// Returns [`DecodeError`] on characters outside the URL-safe alphabet,
/// impossible lengths, or non-canonical trailing bits.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(ENGINE.decode(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_url_safe_and_unpadded() {
        // 0xfb 0xff produces '+' and '/' in the standard alphabet
        let encoded = encode([0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");

        let encoded = encode(b"ab");
        assert_eq!(encoded, "YWI");
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_roundtrip_all_lengths() {
        let data: Vec<u8> = (0..=255).collect();
        for len in 0..data.len() {
            let encoded = encode(&data[..len]);
            assert!(
                !encoded.contains(['+', '/', '=']),
                "unexpected character in {encoded}"
            );
            assert_eq!(decode(&encoded).unwrap(), &data[..len]);
        }
    }

    #[test]
    fn test_decode_accepts_padding() {
        assert_eq!(decode("YWI=").unwrap(), b"ab");
        assert_eq!(decode("YWI").unwrap(), b"ab");
    }

    #[test]
    fn test_decode_rejects_invalid_input() {
        assert!(decode("a").is_err());
        assert!(decode("ab+c").is_err());
        assert!(decode("ab/c").is_err());
        assert!(decode("ab c").is_err());
        assert!(decode("!!!!").is_err());
    }

    #[test]
    fn test_decode_rejects_non_canonical_trailing_bits() {
        // "YWI" is canonical for "ab"; "YWJ" differs only in discarded bits
        assert!(decode("YWJ").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode(b""), "");
        assert!(decode("").unwrap().is_empty());
    }
}
