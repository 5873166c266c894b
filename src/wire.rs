//! Envelope wire format (v1)
//!
//! Format (v1), all integers big-endian:
//!   version[1] || suite[1] || compression[1] || wrapped_len[2] || wrapped_key[W]
//!   || nonce[12] || tag[16] || ct_len[4] || ciphertext[C]
//!
//! The version byte is checked before anything else is read.

use crate::aead::{self, NONCE_BYTES, TAG_BYTES};
use crate::error::{Error, Result};

/// Version byte for v1
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Suite identifiers (on-wire)
pub const SUITE_RSA_OAEP_SHA256_AES256GCM: u8 = 0xA1;
pub const SUITE_RSA_OAEP_SHA256_AES128GCM: u8 = 0xA2;

/// Compression identifiers (on-wire)
pub const COMPRESSION_ZSTD: u8 = 0x01;

/// Header size: version + suite + compression + wrapped_len(u16)
pub const HEADER_BYTES: usize = 1 + 1 + 1 + 2; // 5

/// Ciphertext length prefix (u32)
pub const CT_LEN_BYTES: usize = 4;

/// Bytes around the variable-length fields.
pub const FIXED_OVERHEAD_BYTES: usize = HEADER_BYTES + NONCE_BYTES + TAG_BYTES + CT_LEN_BYTES; // 37

/// Supported (symmetric, asymmetric) combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    RsaOaepSha256Aes256Gcm,
    RsaOaepSha256Aes128Gcm,
}

impl Suite {
    pub const fn id(self) -> u8 {
        match self {
            Suite::RsaOaepSha256Aes256Gcm => SUITE_RSA_OAEP_SHA256_AES256GCM,
            Suite::RsaOaepSha256Aes128Gcm => SUITE_RSA_OAEP_SHA256_AES128GCM,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            SUITE_RSA_OAEP_SHA256_AES256GCM => Ok(Suite::RsaOaepSha256Aes256Gcm),
            SUITE_RSA_OAEP_SHA256_AES128GCM => Ok(Suite::RsaOaepSha256Aes128Gcm),
            _ => Err(Error::UnsupportedVersion),
        }
    }

    pub const fn aead(self) -> aead::Algorithm {
        match self {
            Suite::RsaOaepSha256Aes256Gcm => aead::Algorithm::Aes256Gcm,
            Suite::RsaOaepSha256Aes128Gcm => aead::Algorithm::Aes128Gcm,
        }
    }

    pub fn for_aead(alg: aead::Algorithm) -> Self {
        match alg {
            aead::Algorithm::Aes256Gcm => Suite::RsaOaepSha256Aes256Gcm,
            aead::Algorithm::Aes128Gcm => Suite::RsaOaepSha256Aes128Gcm,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suite::RsaOaepSha256Aes256Gcm => "RSA-OAEP-SHA256 + AES-256-GCM",
            Suite::RsaOaepSha256Aes128Gcm => "RSA-OAEP-SHA256 + AES-128-GCM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    Zstd,
}

impl Compression {
    pub const fn id(self) -> u8 {
        match self {
            Compression::Zstd => COMPRESSION_ZSTD,
        }
    }

    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            COMPRESSION_ZSTD => Ok(Compression::Zstd),
            _ => Err(Error::UnsupportedVersion),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Compression::Zstd => "zstd",
        }
    }
}

/// Everything a recipient needs to decrypt, minus the private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub suite: Suite,
    pub compression: Compression,
    pub wrapped_key: Vec<u8>,
    pub nonce: [u8; NONCE_BYTES],
    pub tag: [u8; TAG_BYTES],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        FIXED_OVERHEAD_BYTES + self.wrapped_key.len() + self.ciphertext.len()
    }
}

pub fn encode_wire(env: &Envelope) -> Result<Vec<u8>> {
    if env.wrapped_key.is_empty() {
        return Err(Error::FormatError);
    }
    let wrapped_len = u16::try_from(env.wrapped_key.len()).map_err(|_| Error::FormatError)?;
    let ct_len = u32::try_from(env.ciphertext.len()).map_err(|_| Error::LimitExceeded)?;

    let mut out = Vec::with_capacity(env.encoded_len());

    out.push(PROTOCOL_VERSION);
    out.push(env.suite.id());
    out.push(env.compression.id());
    out.extend_from_slice(&wrapped_len.to_be_bytes());
    out.extend_from_slice(&env.wrapped_key);
    out.extend_from_slice(&env.nonce);
    out.extend_from_slice(&env.tag);
    out.extend_from_slice(&ct_len.to_be_bytes());
    out.extend_from_slice(&env.ciphertext);

    Ok(out)
}

pub fn decode_wire(data: &[u8]) -> Result<Envelope> {
    let mut r = Reader::new(data);

    // Version first: a future format must be rejected, not misparsed.
    let version = r.u8()?;
    if version != PROTOCOL_VERSION {
        return Err(Error::UnsupportedVersion);
    }
    let suite = Suite::from_id(r.u8()?)?;
    let compression = Compression::from_id(r.u8()?)?;

    let wrapped_len = usize::from(r.u16()?);
    if wrapped_len == 0 {
        return Err(Error::FormatError);
    }
    let wrapped_key = r.take(wrapped_len)?.to_vec();
    let nonce: [u8; NONCE_BYTES] = r.array()?;
    let tag: [u8; TAG_BYTES] = r.array()?;

    let ct_len = usize::try_from(r.u32()?).map_err(|_| Error::FormatError)?;
    if ct_len != r.remaining() {
        return Err(Error::FormatError);
    }
    let ciphertext = r.take(ct_len)?.to_vec();

    Ok(Envelope {
        suite,
        compression,
        wrapped_key,
        nonce,
        tag,
        ciphertext,
    })
}

/// Bounds-checked cursor over the input.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::FormatError);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.take(N)?.try_into().map_err(|_| Error::FormatError)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.array()?))
    }
}
