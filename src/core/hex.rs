//! Lowercase hex encoding with strict decoding.
//!
//! Encoding always emits two zero-padded lowercase digits per byte. Decoding
//! rejects odd-length input and non-hex digits with [`IdentityError::MalformedHex`]
//! carrying the offset of the first bad character; it never panics.

use crate::error::{constants, IdentityError, Result};

use ::hex::FromHexError;

/// Encode bytes as a lowercase hex string
pub fn encode(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Decode a hex string (either case) into bytes
pub fn decode(input: &str) -> Result<Vec<u8>> {
    ::hex::decode(input).map_err(|err| malformed(input, err))
}

fn malformed(input: &str, err: FromHexError) -> IdentityError {
    match err {
        FromHexError::InvalidHexCharacter { index, .. } => IdentityError::MalformedHex {
            position: index,
            reason: constants::ERR_NON_HEX_DIGIT,
        },
        _ => IdentityError::MalformedHex {
            position: input.len().saturating_sub(1),
            reason: constants::ERR_ODD_HEX_LENGTH,
        },
    }
}
