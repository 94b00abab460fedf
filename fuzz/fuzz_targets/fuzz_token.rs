#![no_main]

use connection_identity::core::field_codec::unpack_hex;
use connection_identity::identity::CONNECTION_SCHEMA;
use connection_identity::ConnectionIdentity;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Fuzz token decoding - test for panics on malformed input
    let text = String::from_utf8_lossy(data);
    if let Ok(conn) = ConnectionIdentity::unpack(&text) {
        // A token that decodes must re-encode to the same fields
        let again = ConnectionIdentity::unpack(&conn.pack());
        assert_eq!(again.ok(), Some(conn));
    }
    let _ = unpack_hex(&text, &CONNECTION_SCHEMA);
    let _ = ConnectionIdentity::from_bytes(data);
});
