//! Pipeline configuration.
//!
//! Environment variables (all optional):
//!   QRENV_RSA_BITS             - RSA modulus size for key generation (default: 3072)
//!   QRENV_SESSION_KEY_BYTES    - Session key length, 16 or 32 (default: 32)
//!   QRENV_ZSTD_LEVEL           - zstd level 1..=22 (default: 3)
//!   QRENV_MAX_PLAINTEXT_BYTES  - Largest plaintext accepted or released (default: 1 MiB, max: 4 GiB - 1)
//!   QRENV_MAX_TEXT_CHARS       - Largest encoded text accepted for decryption (default: 4 MiB)

use serde::{Deserialize, Serialize};

use crate::aead;
use crate::compress;
use crate::error::{Error, Result};
use crate::keywrap;
use crate::wire::Suite;

pub const ENV_RSA_BITS: &str = "QRENV_RSA_BITS";
pub const ENV_SESSION_KEY_BYTES: &str = "QRENV_SESSION_KEY_BYTES";
pub const ENV_ZSTD_LEVEL: &str = "QRENV_ZSTD_LEVEL";
pub const ENV_MAX_PLAINTEXT_BYTES: &str = "QRENV_MAX_PLAINTEXT_BYTES";
pub const ENV_MAX_TEXT_CHARS: &str = "QRENV_MAX_TEXT_CHARS";

pub const DEFAULT_MAX_PLAINTEXT_BYTES: usize = 1 << 20;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 4 << 20;

/// Largest accepted `max_plaintext_bytes`; the envelope length field is 32-bit.
pub const MAX_PLAINTEXT_LIMIT: usize = u32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// RSA modulus size in bits.
    pub asymmetric_strength: usize,
    /// Session key length in bytes; selects AES-128-GCM or AES-256-GCM.
    pub symmetric_key_length: usize,
    pub compression_level: i32,
    pub max_plaintext_bytes: usize,
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asymmetric_strength: keywrap::DEFAULT_MODULUS_BITS,
            symmetric_key_length: 32,
            compression_level: compress::DEFAULT_LEVEL,
            max_plaintext_bytes: DEFAULT_MAX_PLAINTEXT_BYTES,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

impl Config {
    /// Defaults overlaid with any `QRENV_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`, then validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse(&lookup, ENV_RSA_BITS)? {
            cfg.asymmetric_strength = v;
        }
        if let Some(v) = parse(&lookup, ENV_SESSION_KEY_BYTES)? {
            cfg.symmetric_key_length = v;
        }
        if let Some(v) = parse(&lookup, ENV_ZSTD_LEVEL)? {
            cfg.compression_level = v;
        }
        if let Some(v) = parse(&lookup, ENV_MAX_PLAINTEXT_BYTES)? {
            cfg.max_plaintext_bytes = v;
        }
        if let Some(v) = parse(&lookup, ENV_MAX_TEXT_CHARS)? {
            cfg.max_text_chars = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        keywrap::check_strength(self.asymmetric_strength).map_err(|_| {
            Error::InvalidConfig(format!(
                "asymmetric_strength {} must be a multiple of 8 in {}..={}",
                self.asymmetric_strength,
                keywrap::MIN_MODULUS_BITS,
                keywrap::MAX_MODULUS_BITS
            ))
        })?;
        aead::Algorithm::for_key_len(self.symmetric_key_length).map_err(|_| {
            Error::InvalidConfig(format!(
                "symmetric_key_length {} must be 16 or 32",
                self.symmetric_key_length
            ))
        })?;
        if !compress::LEVELS.contains(&self.compression_level) {
            return Err(Error::InvalidConfig(format!(
                "compression_level {} must be in 1..=22",
                self.compression_level
            )));
        }
        if self.max_plaintext_bytes == 0 || self.max_text_chars == 0 {
            return Err(Error::InvalidConfig("size limits must be non-zero".into()));
        }
        if self.max_plaintext_bytes > MAX_PLAINTEXT_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_plaintext_bytes {} exceeds {}",
                self.max_plaintext_bytes, MAX_PLAINTEXT_LIMIT
            )));
        }
        Ok(())
    }

    /// Envelope suite implied by the session key length.
    pub fn suite(&self) -> Result<Suite> {
        aead::Algorithm::for_key_len(self.symmetric_key_length).map(Suite::for_aead)
    }
}

fn parse<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("{name}: cannot parse {raw:?}"))),
    }
}
