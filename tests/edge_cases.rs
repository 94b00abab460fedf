#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for malformed input and boundary values

use connection_identity::core::base_n;
use connection_identity::core::field_codec::{pack, unpack, unpack_hex, FieldSchema, FieldWidth};
use connection_identity::error::IdentityError;
use connection_identity::identity::CONNECTION_SCHEMA;
use connection_identity::{Address, ConnectionIdentity, IdAllocator, ID_FLOOR};

// ============================================================================
// TOKEN DECODING
// ============================================================================

#[test]
fn test_odd_length_token_is_rejected() {
    let err = ConnectionIdentity::unpack("7f00000100507f00000201bb3b9aca0").unwrap_err();
    assert!(matches!(
        err,
        IdentityError::InvalidTokenLength {
            expected: 32,
            actual: 31
        }
    ));
    assert!(err.is_decode_error());
}

#[test]
fn test_odd_length_hex_through_generic_codec() {
    let result = unpack_hex("7f00000100507f00000201bb3b9aca0", &CONNECTION_SCHEMA);
    assert!(matches!(result, Err(IdentityError::MalformedHex { .. })));
}

#[test]
fn test_non_hex_token_is_rejected() {
    let result = ConnectionIdentity::unpack("zz00000100507f00000201bb3b9aca01");
    match result {
        Err(IdentityError::MalformedHex { position, .. }) => assert_eq!(position, 0),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_multibyte_token_is_rejected() {
    // 16 two-byte characters: 32 bytes, so only the digit check can catch it
    let token = "é".repeat(16);
    assert_eq!(token.len(), 32);
    assert!(matches!(
        ConnectionIdentity::unpack(&token),
        Err(IdentityError::MalformedHex { .. })
    ));
}

#[test]
fn test_whitespace_padded_token_is_rejected() {
    let token = format!(" {} ", ConnectionIdentity::new(Address::new(1, 1), Address::new(2, 2), ID_FLOOR).pack());
    assert!(ConnectionIdentity::unpack(&token).is_err());
    assert!(ConnectionIdentity::unpack(token.trim()).is_ok());
}

#[test]
fn test_all_zero_token_decodes_but_is_untrusted() {
    let decoded = ConnectionIdentity::unpack(&"0".repeat(32)).unwrap();
    assert_eq!(decoded.server(), Address::default());
    assert_eq!(decoded.id(), 0);
    assert!(!decoded.has_allocated_id());
}

#[test]
fn test_all_f_token_decodes_to_max_values() {
    let decoded = ConnectionIdentity::unpack(&"f".repeat(32)).unwrap();
    assert_eq!(decoded.server().to_string(), "255.255.255.255:65535");
    assert_eq!(decoded.client().port(), u16::MAX);
    assert_eq!(decoded.id(), u32::MAX);
}

// ============================================================================
// FIELD CODEC
// ============================================================================

#[test]
fn test_pack_value_count_mismatch() {
    let schema = FieldSchema::new(vec![FieldWidth::N2, FieldWidth::N4, FieldWidth::N8]);
    assert!(matches!(
        pack(&[1, 2, 3, 4], &schema),
        Err(IdentityError::SchemaMismatch {
            expected: 3,
            actual: 4
        })
    ));
    assert!(pack(&[], &schema).is_err());
}

#[test]
fn test_unpack_short_buffer() {
    assert!(matches!(
        unpack(&[0u8; 15], &CONNECTION_SCHEMA),
        Err(IdentityError::TruncatedRecord {
            expected: 16,
            actual: 15
        })
    ));
    assert!(unpack(&[], &CONNECTION_SCHEMA).is_err());
}

#[test]
fn test_mixed_width_values_roundtrip() {
    let schema = FieldSchema::parse(&["N2", "N4", "N8"]).unwrap();
    let values = [100, 1_000_000_000, 100_000_000_000_000_000];
    let bytes = pack(&values, &schema).unwrap();
    assert_eq!(unpack(&bytes, &schema).unwrap(), values);
}

#[test]
fn test_two_byte_field_cannot_hold_negative() {
    let schema = FieldSchema::new(vec![FieldWidth::N2]);
    let out = unpack(&pack(&[-2], &schema).unwrap(), &schema).unwrap();
    assert_eq!(out, vec![65534]);
}

// ============================================================================
// BASE-N
// ============================================================================

#[test]
fn test_base_n_reference_value() {
    assert_eq!(base_n::encode(4_000_000_000, 62).unwrap(), "4mHAJ2");
    assert_eq!(base_n::decode("4mHAJ2", 62).unwrap(), 4_000_000_000);
}

#[test]
fn test_base_n_empty_and_zero() {
    for radix in [16, 36, 62] {
        assert_eq!(base_n::encode(0, radix).unwrap(), "");
        assert_eq!(base_n::decode("", radix).unwrap(), 0);
    }
}

#[test]
fn test_base_n_large_values_are_exact() {
    // beyond 2^53 a float accumulator would lose the low digits
    let n = (1u64 << 62) + 1;
    for radix in [16, 36, 62] {
        let code = base_n::encode(n, radix).unwrap();
        assert_eq!(base_n::decode(&code, radix).unwrap(), n);
    }
}

// ============================================================================
// ALLOCATOR
// ============================================================================

#[test]
fn test_allocator_floor_clamp() {
    let allocator = IdAllocator::with_counter(42);
    assert_eq!(allocator.allocate(), ID_FLOOR + 1);
}

#[test]
fn test_allocator_release_unknown_id() {
    let allocator = IdAllocator::new();
    assert!(!allocator.release(ID_FLOOR + 77));
    assert_eq!(allocator.metrics().release_misses, 1);
}
