//! Base45 text encoding (RFC 9285).
//!
//! Two input bytes become three characters, a trailing single byte becomes
//! two. The alphabet is exactly the QR alphanumeric set, so encoded text fits
//! the densest QR mode and survives manual transcription.
//!
//! Decoding is strict: no case folding and no whitespace trimming. Space is a
//! legal character, so trimming would corrupt valid input.

use crate::error::{Error, Result};

pub const ALPHABET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const INVALID: u8 = 0xFF;

/// Reverse lookup: ASCII byte -> digit value, `INVALID` elsewhere.
const DECODE_TABLE: [u8; 256] = {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encoded length for `n` input bytes.
pub const fn encoded_len(n: usize) -> usize {
    (n / 2) * 3 + (n % 2) * 2
}

/// True if every character of `text` is in the Base45 alphabet.
pub fn is_alphabet(text: &str) -> bool {
    text.bytes().all(|b| DECODE_TABLE[b as usize] != INVALID)
}

pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(data.len()));

    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        let mut n = u32::from(pair[0]) * 256 + u32::from(pair[1]);
        for _ in 0..3 {
            out.push(ALPHABET[(n % 45) as usize] as char);
            n /= 45;
        }
    }
    if let [last] = chunks.remainder() {
        let n = u32::from(*last);
        out.push(ALPHABET[(n % 45) as usize] as char);
        out.push(ALPHABET[(n / 45) as usize] as char);
    }

    out
}

pub fn decode(text: &str) -> Result<Vec<u8>> {
    let input = text.as_bytes();
    if input.len() % 3 == 1 {
        return Err(Error::InvalidEncoding);
    }

    let mut out = Vec::with_capacity(input.len() / 3 * 2 + 1);
    for group in input.chunks(3) {
        let mut n: u32 = 0;
        for &c in group.iter().rev() {
            let d = DECODE_TABLE[c as usize];
            if d == INVALID {
                return Err(Error::InvalidEncoding);
            }
            n = n * 45 + u32::from(d);
        }

        match group.len() {
            3 => {
                let v = u16::try_from(n).map_err(|_| Error::InvalidEncoding)?;
                out.extend_from_slice(&v.to_be_bytes());
            }
            _ => {
                let v = u8::try_from(n).map_err(|_| Error::InvalidEncoding)?;
                out.push(v);
            }
        }
    }

    Ok(out)
}
