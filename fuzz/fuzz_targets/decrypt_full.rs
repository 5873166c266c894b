#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use qr_envelope::{base45, Config, KeyPair, Pipeline};

static PIPELINE: Lazy<Pipeline> = Lazy::new(|| {
    Pipeline::new(Config {
        asymmetric_strength: 2048,
        ..Config::default()
    })
    .unwrap()
});

static KEYPAIR: Lazy<KeyPair> = Lazy::new(|| PIPELINE.generate_keypair().unwrap());

fuzz_target!(|data: &[u8]| {
    // Raw bytes go through Base45 so the fuzzer reaches the envelope parser
    let text = base45::encode(data);
    let _ = PIPELINE.decrypt(&KEYPAIR.private, &text);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = PIPELINE.decrypt(&KEYPAIR.private, s);
    }
});
