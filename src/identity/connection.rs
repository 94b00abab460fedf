//! # Connection Identity Tokens
//!
//! A [`ConnectionIdentity`] names one logical connection: the server endpoint
//! that accepted it, the client endpoint that opened it, and the id the
//! server's allocator issued for it.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────┬───────────────┬──────────────┬───────────────┬──────────┐
//! │ serverIp (4) │ serverPort (2)│ clientIp (4) │ clientPort (2)│  id (4)  │
//! └──────────────┴───────────────┴──────────────┴───────────────┴──────────┘
//! ```
//! 16 bytes, big-endian, rendered as a 32-character lowercase hex token.
//!
//! ## Statelessness
//! [`ConnectionIdentity::unpack`] consults no registry and proves nothing about
//! whether the connection is still alive. Any holder of a token can recover
//! the three fields, which is what lets a handle cross process boundaries.
//! Decoded values are untrusted: check [`ConnectionIdentity::has_allocated_id`]
//! (and anything else the caller cares about) before acting on them.

use std::fmt;
use std::str::FromStr;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::core::field_codec::{self, FieldSchema, FieldWidth};
use crate::core::hex;
use crate::error::{IdentityError, Result};
use crate::identity::address::Address;
use crate::identity::allocator::{IdAllocator, ID_FLOOR};

/// Record layout shared by every connection token
pub static CONNECTION_SCHEMA: FieldSchema = FieldSchema::from_static(&[
    FieldWidth::N4,
    FieldWidth::N2,
    FieldWidth::N4,
    FieldWidth::N2,
    FieldWidth::N4,
]);

/// Size of the packed record in bytes
pub const RECORD_LEN: usize = 16;

/// Length of a hex token in characters
pub const TOKEN_LEN: usize = RECORD_LEN * 2;

/// Server endpoint, client endpoint and connection id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionIdentity {
    server: Address,
    client: Address,
    id: u32,
}

impl ConnectionIdentity {
    pub const fn new(server: Address, client: Address, id: u32) -> Self {
        Self { server, client, id }
    }

    /// Accept a new connection: allocate (and register) an id for it
    pub fn accept(server: Address, client: Address, allocator: &IdAllocator) -> Self {
        Self::new(server, client, allocator.allocate())
    }

    /// Return this connection's id to the allocator that issued it
    pub fn release(&self, allocator: &IdAllocator) -> bool {
        allocator.release(self.id)
    }

    pub const fn server(&self) -> Address {
        self.server
    }

    pub const fn client(&self) -> Address {
        self.client
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Whether the id is at or above the allocator floor
    pub const fn has_allocated_id(&self) -> bool {
        self.id >= ID_FLOOR
    }

    fn from_fields(values: &[i64]) -> Self {
        // 4-byte fields come back sign-extended; truncating recovers the u32
        Self {
            server: Address::new(values[0] as u32, values[1] as u16),
            client: Address::new(values[2] as u32, values[3] as u16),
            id: values[4] as u32,
        }
    }

    /// Encode as the 16-byte binary record
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        let mut buf = &mut out[..];
        buf.put_u32(self.server.ip());
        buf.put_u16(self.server.port());
        buf.put_u32(self.client.ip());
        buf.put_u16(self.client.port());
        buf.put_u32(self.id);
        out
    }

    /// Decode an exactly 16-byte binary record
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != RECORD_LEN {
            return Err(IdentityError::InvalidRecordLength {
                expected: RECORD_LEN,
                actual: bytes.len(),
            });
        }
        let values = field_codec::unpack(bytes, &CONNECTION_SCHEMA)?;
        Ok(Self::from_fields(&values))
    }

    /// Encode as a 32-character lowercase hex token
    pub fn pack(&self) -> String {
        hex::encode(&self.to_bytes())
    }

    /// Decode a token produced by [`pack`](Self::pack).
    ///
    /// Hex digits are accepted in either case.
    pub fn unpack(token: &str) -> Result<Self> {
        if token.len() != TOKEN_LEN {
            return Err(IdentityError::InvalidTokenLength {
                expected: TOKEN_LEN,
                actual: token.len(),
            });
        }
        let values = field_codec::unpack_hex(token, &CONNECTION_SCHEMA)?;
        Ok(Self::from_fields(&values))
    }
}

/// Formats as the hex token
impl fmt::Display for ConnectionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pack())
    }
}

impl FromStr for ConnectionIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::unpack(s)
    }
}

impl Serialize for ConnectionIdentity {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.pack())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for ConnectionIdentity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConnectionIdentity {
        ConnectionIdentity::new(
            Address::parse("127.0.0.1", 80).unwrap(),
            Address::parse("127.0.0.2", 443).unwrap(),
            1_000_000_001,
        )
    }

    #[test]
    fn test_schema_is_sixteen_bytes() {
        assert_eq!(CONNECTION_SCHEMA.len(), 5);
        assert_eq!(CONNECTION_SCHEMA.byte_len(), RECORD_LEN);
    }

    #[test]
    fn test_token_layout() {
        // 7f000001 0050 7f000002 01bb 3b9aca01
        assert_eq!(sample().pack(), "7f00000100507f00000201bb3b9aca01");
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let original = sample();
        let token = original.pack();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));

        let restored = ConnectionIdentity::unpack(&token).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.server().to_string(), "127.0.0.1:80");
        assert_eq!(restored.client().to_string(), "127.0.0.2:443");
        assert_eq!(restored.id(), 1_000_000_001);
    }

    #[test]
    fn test_high_bit_fields_survive() {
        let identity = ConnectionIdentity::new(
            Address::parse("255.255.255.255", u16::MAX).unwrap(),
            Address::parse("200.1.2.3", 32768).unwrap(),
            u32::MAX,
        );
        let restored = ConnectionIdentity::unpack(&identity.pack()).unwrap();
        assert_eq!(restored, identity);
    }

    #[test]
    fn test_record_matches_generic_codec() {
        let identity = sample();
        let fields = [
            i64::from(identity.server().ip()),
            i64::from(identity.server().port()),
            i64::from(identity.client().ip()),
            i64::from(identity.client().port()),
            i64::from(identity.id()),
        ];
        let packed = field_codec::pack(&fields, &CONNECTION_SCHEMA).unwrap();
        assert_eq!(identity.to_bytes().as_slice(), packed.as_slice());
        assert_eq!(ConnectionIdentity::from_bytes(&packed).unwrap(), identity);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let mut bytes = sample().to_bytes().to_vec();
        bytes.push(0);
        let err = ConnectionIdentity::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            IdentityError::InvalidRecordLength {
                expected: 16,
                actual: 17
            }
        );
        assert!(err.is_decode_error());
        assert_eq!(
            ConnectionIdentity::from_bytes(&bytes[..15]),
            Err(IdentityError::InvalidRecordLength {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_uppercase_token_is_accepted() {
        let token = sample().pack().to_uppercase();
        assert_eq!(ConnectionIdentity::unpack(&token).unwrap(), sample());
    }

    #[test]
    fn test_unpack_rejects_bad_length() {
        let token = sample().pack();
        assert_eq!(
            ConnectionIdentity::unpack(&token[..31]),
            Err(IdentityError::InvalidTokenLength {
                expected: 32,
                actual: 31
            })
        );
        assert!(ConnectionIdentity::unpack("").is_err());
    }

    #[test]
    fn test_unpack_rejects_non_hex() {
        let mut token = sample().pack();
        token.replace_range(10..11, "x");
        assert!(matches!(
            ConnectionIdentity::unpack(&token),
            Err(IdentityError::MalformedHex { position: 10, .. })
        ));
    }

    #[test]
    fn test_unpacked_id_is_untrusted() {
        let forged = ConnectionIdentity::new(Address::default(), Address::default(), 7);
        let restored = ConnectionIdentity::unpack(&forged.pack()).unwrap();
        assert_eq!(restored.id(), 7);
        assert!(!restored.has_allocated_id());
        assert!(sample().has_allocated_id());
    }

    #[test]
    fn test_binary_record_roundtrip() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..4], &[127, 0, 0, 1]);
        assert_eq!(ConnectionIdentity::from_bytes(&bytes).unwrap(), sample());
        assert!(ConnectionIdentity::from_bytes(&bytes[..15]).is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        let token = sample().to_string();
        assert_eq!(token, sample().pack());
        let parsed: ConnectionIdentity = token.parse().unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_json_serialization_uses_token() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, "\"7f00000100507f00000201bb3b9aca01\"");
        let restored: ConnectionIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, sample());

        assert!(serde_json::from_str::<ConnectionIdentity>("\"abc\"").is_err());
    }

    #[test]
    fn test_accept_and_release() {
        let allocator = IdAllocator::new();
        let server = Address::parse("10.0.0.1", 9000).unwrap();
        let client = Address::parse("10.0.0.2", 50000).unwrap();

        let a = ConnectionIdentity::accept(server, client, &allocator);
        let b = ConnectionIdentity::accept(server, client, &allocator);
        assert_ne!(a.id(), b.id());
        assert!(a.has_allocated_id());
        assert!(allocator.is_registered(a.id()));

        assert!(a.release(&allocator));
        assert!(!allocator.is_registered(a.id()));
        assert!(allocator.is_registered(b.id()));
    }
}
