//! # Base-N Integer Encoding
//!
//! Renders unsigned integers in any radix from 2 to 62 over the alphabet
//! `0-9a-zA-Z`, most significant symbol first, and parses them back with
//! exact checked arithmetic.
//!
//! Zero encodes to the empty string and the empty string decodes to zero.
//!
//! ```rust
//! use connection_identity::core::base_n;
//!
//! assert_eq!(base_n::encode(4_000_000_000, 62)?, "4mHAJ2");
//! assert_eq!(base_n::decode("4mHAJ2", 62)?, 4_000_000_000);
//! assert_eq!(base_n::encode(0, 36)?, "");
//! # Ok::<(), connection_identity::IdentityError>(())
//! ```

use crate::error::{IdentityError, Result};

/// Symbol table shared by every radix; radix `r` uses the first `r` symbols
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Smallest supported radix
pub const MIN_RADIX: u32 = 2;

/// Largest supported radix (size of [`ALPHABET`])
pub const MAX_RADIX: u32 = 62;

fn check_radix(radix: u32) -> Result<u64> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(u64::from(radix))
    } else {
        Err(IdentityError::InvalidRadix(radix))
    }
}

fn symbol_index(c: u8) -> Option<u64> {
    let idx = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'z' => c - b'a' + 10,
        b'A'..=b'Z' => c - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(idx))
}

/// Encode `n` in base `radix`
pub fn encode(mut n: u64, radix: u32) -> Result<String> {
    let base = check_radix(radix)?;

    // u64::MAX in base 2 is 64 symbols
    let mut digits = Vec::with_capacity(64);
    while n != 0 {
        digits.push(ALPHABET[(n % base) as usize]);
        n /= base;
    }
    digits.reverse();

    // every byte comes from ALPHABET, which is ASCII
    Ok(digits.into_iter().map(char::from).collect())
}

/// Decode a base-`radix` string produced by [`encode`]
pub fn decode(code: &str, radix: u32) -> Result<u64> {
    let base = check_radix(radix)?;

    let mut value: u64 = 0;
    for (position, c) in code.chars().enumerate() {
        let digit = u8::try_from(c)
            .ok()
            .and_then(symbol_index)
            .filter(|&d| d < base)
            .ok_or(IdentityError::InvalidDigit {
                digit: c,
                position,
                radix,
            })?;

        value = value
            .checked_mul(base)
            .and_then(|v| v.checked_add(digit))
            .ok_or(IdentityError::Overflow { radix })?;
    }
    Ok(value)
}
