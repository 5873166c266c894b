#![no_main]

use libfuzzer_sys::fuzz_target;
use qr_envelope::wire;

fuzz_target!(|data: &[u8]| {
    if let Ok(env) = wire::decode_wire(data) {
        // Anything that parses must re-encode to the same bytes
        let bytes = wire::encode_wire(&env).unwrap();
        assert_eq!(bytes, data);
    }
});
