#![no_main]

use connection_identity::core::base_n;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the radix, the rest is the candidate code
    let Some((&radix, rest)) = data.split_first() else {
        return;
    };
    let radix = u32::from(radix % 64);
    let code = String::from_utf8_lossy(rest);
    if let Ok(n) = base_n::decode(&code, radix) {
        let encoded = base_n::encode(n, radix);
        assert!(encoded.is_ok());
    }
});
