//! # Fixed-Width Field Codec
//!
//! Packs ordered integer values into concatenated big-endian fields whose
//! widths are described by a [`FieldSchema`], and unpacks them again.
//!
//! ## Wire Format
//! ```text
//! [field 0 (2|4|8 bytes)] [field 1 (2|4|8 bytes)] ... [field n-1]
//! ```
//! No length prefix, no separators: the schema alone defines the layout.
//!
//! ## Value Semantics
//! - Packing truncates each value to its width by dropping high-order bytes.
//! - 2-byte fields unpack as `0..=65535`; a negative 16-bit value does not
//!   survive a round trip.
//! - 4-byte fields unpack through a signed 32-bit intermediate, so values
//!   with the top bit set come back negative. Cast with `as u32` to recover
//!   the unsigned quantity.
//! - 8-byte fields unpack as the original `i64`.
//!
//! ## Usage
//! ```rust
//! use connection_identity::core::field_codec::{pack_hex, unpack_hex, FieldSchema, FieldWidth};
//!
//! let schema = FieldSchema::new(vec![FieldWidth::N2, FieldWidth::N4, FieldWidth::N8]);
//! let token = pack_hex(&[100, 1_000_000_000, 100_000_000_000_000_000], &schema)?;
//! assert_eq!(token.len(), 28);
//! assert_eq!(
//!     unpack_hex(&token, &schema)?,
//!     vec![100, 1_000_000_000, 100_000_000_000_000_000]
//! );
//! # Ok::<(), connection_identity::IdentityError>(())
//! ```

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};

use crate::core::hex;
use crate::error::{IdentityError, Result};

/// Width of a single packed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    /// 2 bytes, big-endian
    N2,
    /// 4 bytes, big-endian
    N4,
    /// 8 bytes, big-endian
    N8,
}

impl FieldWidth {
    /// Number of bytes this field occupies on the wire
    pub const fn bytes(self) -> usize {
        match self {
            FieldWidth::N2 => 2,
            FieldWidth::N4 => 4,
            FieldWidth::N8 => 8,
        }
    }

    /// Format tag used in textual schema descriptions
    pub const fn tag(self) -> &'static str {
        match self {
            FieldWidth::N2 => "N2",
            FieldWidth::N4 => "N4",
            FieldWidth::N8 => "N8",
        }
    }
}

impl fmt::Display for FieldWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldWidth {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "N2" => Ok(FieldWidth::N2),
            "N4" => Ok(FieldWidth::N4),
            "N8" => Ok(FieldWidth::N8),
            other => Err(IdentityError::UnknownFieldWidth(other.to_string())),
        }
    }
}

/// Ordered list of field widths describing one packed record.
///
/// Static schemas borrow their widths so they can live in a `const`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Cow<'static, [FieldWidth]>,
}

impl FieldSchema {
    /// Build a schema from an owned list of widths
    pub fn new(fields: Vec<FieldWidth>) -> Self {
        Self {
            fields: Cow::Owned(fields),
        }
    }

    /// Build a schema over a static slice, usable in `const` items
    pub const fn from_static(fields: &'static [FieldWidth]) -> Self {
        Self {
            fields: Cow::Borrowed(fields),
        }
    }

    /// Parse a schema from format tags such as `["N4", "N2"]`
    pub fn parse<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let fields = tags
            .iter()
            .map(|t| t.as_ref().parse())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fields))
    }

    pub fn fields(&self) -> &[FieldWidth] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total encoded size of one record in bytes
    pub fn byte_len(&self) -> usize {
        self.fields.iter().map(|w| w.bytes()).sum()
    }
}

/// Pack `values` into big-endian bytes according to `schema`.
///
/// Fails with [`IdentityError::SchemaMismatch`] when the value count differs
/// from the schema length; no partial output is produced.
pub fn pack(values: &[i64], schema: &FieldSchema) -> Result<Vec<u8>> {
    if values.len() != schema.len() {
        return Err(IdentityError::SchemaMismatch {
            expected: schema.len(),
            actual: values.len(),
        });
    }

    let mut buf = Vec::with_capacity(schema.byte_len());
    for (&value, width) in values.iter().zip(schema.fields()) {
        match width {
            FieldWidth::N2 => buf.put_u16(value as u16),
            FieldWidth::N4 => buf.put_u32(value as u32),
            FieldWidth::N8 => buf.put_i64(value),
        }
    }
    Ok(buf)
}

/// Unpack one record laid out by `schema` from the front of `data`.
///
/// Bytes past `schema.byte_len()` are ignored.
pub fn unpack(data: &[u8], schema: &FieldSchema) -> Result<Vec<i64>> {
    let needed = schema.byte_len();
    if data.len() < needed {
        return Err(IdentityError::TruncatedRecord {
            expected: needed,
            actual: data.len(),
        });
    }

    let mut cursor = data;
    let values = schema
        .fields()
        .iter()
        .map(|width| match width {
            FieldWidth::N2 => i64::from(i32::from(cursor.get_u16())),
            FieldWidth::N4 => i64::from(cursor.get_u32() as i32),
            FieldWidth::N8 => cursor.get_u64() as i64,
        })
        .collect();
    Ok(values)
}

/// [`pack`] followed by lowercase hex encoding
pub fn pack_hex(values: &[i64], schema: &FieldSchema) -> Result<String> {
    pack(values, schema).map(|bytes| hex::encode(&bytes))
}

/// Hex decoding followed by [`unpack`]
pub fn unpack_hex(input: &str, schema: &FieldSchema) -> Result<Vec<i64>> {
    let bytes = hex::decode(input)?;
    unpack(&bytes, schema)
}
