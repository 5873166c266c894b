//! AEAD: AES-GCM with a fresh session key and nonce per message.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes128Gcm, Aes256Gcm, Nonce, Tag,
};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

pub const NONCE_BYTES: usize = 12;
pub const TAG_BYTES: usize = 16;

/// Symmetric algorithms the envelope can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Aes128Gcm,
    Aes256Gcm,
}

impl Algorithm {
    pub const fn key_len(self) -> usize {
        match self {
            Algorithm::Aes128Gcm => 16,
            Algorithm::Aes256Gcm => 32,
        }
    }

    /// Select the algorithm for a session key length in bytes.
    pub fn for_key_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Algorithm::Aes128Gcm),
            32 => Ok(Algorithm::Aes256Gcm),
            _ => Err(Error::InvalidKeyMaterial),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Aes128Gcm => "AES-128-GCM",
            Algorithm::Aes256Gcm => "AES-256-GCM",
        }
    }
}

/// Per-message symmetric key. Zeroized on drop, never serialized in clear.
pub struct SessionKey(Zeroizing<Vec<u8>>);

impl SessionKey {
    /// Draw a fresh key for `alg` from `rng`.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, alg: Algorithm) -> Result<Self> {
        let mut key = Zeroizing::new(vec![0u8; alg.key_len()]);
        rng.try_fill_bytes(&mut key).map_err(|_| Error::RandomSource)?;
        Ok(Self(key))
    }

    /// Adopt key bytes recovered from an unwrap.
    pub fn from_bytes(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SessionKey([REDACTED; {}])", self.0.len())
    }
}

/// Generate a random 12-byte nonce.
pub fn nonce<R: RngCore + CryptoRng>(rng: &mut R) -> Result<[u8; NONCE_BYTES]> {
    let mut n = [0u8; NONCE_BYTES];
    rng.try_fill_bytes(&mut n).map_err(|_| Error::RandomSource)?;
    Ok(n)
}

/// Encrypt `plaintext`, returning `(ciphertext, tag)`.
pub fn seal(
    alg: Algorithm,
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_BYTES])> {
    check_lengths(alg, key, nonce)?;

    let n = Nonce::from_slice(nonce);
    let mut buf = plaintext.to_vec();
    let tag = match alg {
        Algorithm::Aes128Gcm => Aes128Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidKeyMaterial)?
            .encrypt_in_place_detached(n, b"", &mut buf),
        Algorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidKeyMaterial)?
            .encrypt_in_place_detached(n, b"", &mut buf),
    }
    .map_err(|_| Error::LimitExceeded)?;

    let mut out = [0u8; TAG_BYTES];
    out.copy_from_slice(&tag);
    Ok((buf, out))
}

/// Verify `tag` and decrypt. No plaintext is released on failure.
pub fn open(
    alg: Algorithm,
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>> {
    check_lengths(alg, key, nonce)?;
    if tag.len() != TAG_BYTES {
        return Err(Error::AuthFailure);
    }

    let n = Nonce::from_slice(nonce);
    let t = Tag::from_slice(tag);
    let mut buf = Zeroizing::new(ciphertext.to_vec());
    match alg {
        Algorithm::Aes128Gcm => Aes128Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidKeyMaterial)?
            .decrypt_in_place_detached(n, b"", &mut buf, t),
        Algorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key)
            .map_err(|_| Error::InvalidKeyMaterial)?
            .decrypt_in_place_detached(n, b"", &mut buf, t),
    }
    .map_err(|_| Error::AuthFailure)?;

    Ok(core::mem::take(&mut *buf))
}

fn check_lengths(alg: Algorithm, key: &[u8], nonce: &[u8]) -> Result<()> {
    if key.len() != alg.key_len() || nonce.len() != NONCE_BYTES {
        return Err(Error::InvalidKeyMaterial);
    }
    Ok(())
}
