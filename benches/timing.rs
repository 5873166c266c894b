//! Rough timing of decryption failure modes.
//!
//! Run with: `cargo bench --bench timing`
//!
//! Not a constant-time proof. It shows whether early rejections (bad text,
//! bad header) are distinguishable from late ones (wrong key, bad tag).

use std::hint::black_box;
use std::time::Instant;

use qr_envelope::wire::HEADER_BYTES;
use qr_envelope::{base45, Config, Pipeline};

fn time_it<F: FnMut()>(label: &str, iters: usize, mut f: F) {
    // warmup
    for _ in 0..(iters / 10).max(10) {
        f();
    }

    let start = Instant::now();
    for _ in 0..iters {
        f();
    }
    let elapsed = start.elapsed();

    let per_iter = elapsed / (iters as u32);
    println!("{:<16} total={:?}  per_iter={:?}", label, elapsed, per_iter);
}

fn flip(text: &str, offset: usize) -> String {
    let mut bytes = base45::decode(text).unwrap();
    bytes[offset] ^= 0x01;
    base45::encode(&bytes)
}

fn main() {
    let pipeline = Pipeline::new(Config::default()).unwrap();
    let pair = pipeline.generate_keypair().unwrap();
    let other = pipeline.generate_keypair().unwrap();

    let plaintext = vec![0x42u8; 1024];
    let text = pipeline.encrypt(&pair.public, &plaintext).unwrap();

    let wrapped = pair.public.size();
    let bad_version = flip(&text, 0);
    let bad_wrapped = flip(&text, HEADER_BYTES + 1);
    let bad_tag = flip(&text, HEADER_BYTES + wrapped + 12);
    let bad_text = text.to_lowercase();

    // RSA private-key operations dominate; keep iteration counts modest
    let iters = 500;

    time_it("valid", iters, || {
        let pt = pipeline.decrypt(&pair.private, black_box(&text)).unwrap();
        black_box(pt);
    });

    time_it("wrong_key", iters, || {
        let r = pipeline.decrypt(&other.private, black_box(&text));
        black_box(r.err());
    });

    time_it("bad_wrapped", iters, || {
        let r = pipeline.decrypt(&pair.private, black_box(&bad_wrapped));
        black_box(r.err());
    });

    time_it("bad_tag", iters, || {
        let r = pipeline.decrypt(&pair.private, black_box(&bad_tag));
        black_box(r.err());
    });

    time_it("bad_version", iters, || {
        let r = pipeline.decrypt(&pair.private, black_box(&bad_version));
        black_box(r.err());
    });

    time_it("bad_text", iters, || {
        let r = pipeline.decrypt(&pair.private, black_box(&bad_text));
        black_box(r.err());
    });

    println!("\nDone.");
}
