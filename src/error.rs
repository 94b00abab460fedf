//! # Error Types
//!
//! Error handling for the connection-identity codec.
//!
//! Every codec operation returns a [`Result`] instead of degrading to zero-valued
//! output, so callers decide whether to propagate, log, or substitute a default.
//! Nothing in this crate panics on malformed input.
//!
//! ## Error Categories
//! - **Layout Errors**: schema/value count mismatches, truncated records
//! - **Token Errors**: malformed hex, wrong token or record length
//! - **Base-N Errors**: unsupported radix, invalid digits, overflow
//! - **Address Errors**: unparsable dotted-quad strings
//! - **Configuration Errors**: TOML loading and validation failures
//!
//! ## Example Usage
//! ```rust
//! use connection_identity::error::{IdentityError, Result};
//! use connection_identity::ConnectionIdentity;
//!
//! fn client_port(token: &str) -> Result<u16> {
//!     let identity = ConnectionIdentity::unpack(token)?;
//!     Ok(identity.client().port())
//! }
//!
//! assert!(matches!(
//!     client_port("not-a-token"),
//!     Err(IdentityError::InvalidTokenLength { .. })
//! ));
//! ```

use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Hex decoding errors
    pub const ERR_ODD_HEX_LENGTH: &str = "odd number of hex digits";
    pub const ERR_NON_HEX_DIGIT: &str = "non-hex digit";

    /// Address parsing errors
    pub const ERR_OCTET_COUNT: &str = "expected four dot-separated octets";
    pub const ERR_OCTET_VALUE: &str = "octet is not an integer in 0..=255";

    /// Resolver errors
    pub const ERR_NO_OUTBOUND_IP: &str = "resolver returned no outbound address";
}

/// IdentityError is the error type for all codec, address and config operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Schema mismatch: schema has {expected} fields, got {actual} values")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Truncated record: schema needs {expected} bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("Invalid record length: expected {expected} bytes, got {actual}")]
    InvalidRecordLength { expected: usize, actual: usize },

    #[error("Malformed hex at offset {position}: {reason}")]
    MalformedHex {
        position: usize,
        reason: &'static str,
    },

    #[error("Invalid token length: expected {expected} characters, got {actual}")]
    InvalidTokenLength { expected: usize, actual: usize },

    #[error("Unknown field width tag: {0}")]
    UnknownFieldWidth(String),

    #[error("Unsupported radix {0} (valid range: 2-62)")]
    InvalidRadix(u32),

    #[error("Invalid digit {digit:?} at position {position} for radix {radix}")]
    InvalidDigit {
        digit: char,
        position: usize,
        radix: u32,
    },

    #[error("Numeric overflow decoding base-{radix} value")]
    Overflow { radix: u32 },

    #[error("Invalid IPv4 address '{input}': {reason}")]
    InvalidAddress {
        input: String,
        reason: &'static str,
    },

    #[error("Address resolution failed: {0}")]
    ResolverError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl IdentityError {
    /// Returns `true` when the error was caused by untrusted wire input
    /// (a token or packed record) rather than by the local caller.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::TruncatedRecord { .. }
                | Self::InvalidRecordLength { .. }
                | Self::MalformedHex { .. }
                | Self::InvalidTokenLength { .. }
                | Self::InvalidDigit { .. }
                | Self::Overflow { .. }
        )
    }
}

/// Type alias for Results using IdentityError
pub type Result<T> = std::result::Result<T, IdentityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IdentityError::SchemaMismatch {
            expected: 5,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));

        let err = IdentityError::MalformedHex {
            position: 7,
            reason: constants::ERR_NON_HEX_DIGIT,
        };
        assert!(err.to_string().contains("offset 7"));
    }

    #[test]
    fn test_decode_error_classification() {
        assert!(IdentityError::InvalidTokenLength {
            expected: 32,
            actual: 31
        }
        .is_decode_error());
        assert!(!IdentityError::InvalidRadix(99).is_decode_error());
        assert!(!IdentityError::ConfigError("bad".into()).is_decode_error());
    }
}
