//! Encrypt / decrypt orchestrators.
//!
//! Encrypt: compress -> session key + nonce -> seal -> wrap -> envelope -> Base45.
//! Decrypt: the exact inverse. The first failing stage aborts the operation
//! and nothing produced by earlier stages is returned.

use core::fmt;

use rand_core::{CryptoRng, OsRng, RngCore};
use tracing::debug;

use crate::aead::{self, SessionKey};
use crate::base45;
use crate::compress;
use crate::config::Config;
use crate::error::{AtStage, Error, OpenError, PipelineError, Stage};
use crate::keywrap::{self, KeyPair, PrivateKey, PublicKey};
use crate::wire::{self, Compression, Envelope, Suite};

/// Hybrid encryption engine.
///
/// Holds configuration only; every call is independent and the type is
/// `Send + Sync`, so one instance can serve many threads.
///
/// # Example
///
/// ```no_run
/// use qr_envelope::{Config, Pipeline};
///
/// let pipeline = Pipeline::new(Config::default())?;
/// let pair = pipeline.generate_keypair()?;
///
/// let text = pipeline.encrypt(&pair.public, b"secret data")?;
/// let plaintext = pipeline.decrypt(&pair.private, &text)?;
///
/// assert_eq!(plaintext, b"secret data");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: Config::default(),
        }
    }
}

impl Pipeline {
    /// Create a pipeline after validating `config`.
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        config.validate().at(Stage::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a recipient key pair at the configured strength.
    pub fn generate_keypair(&self) -> Result<KeyPair, PipelineError> {
        self.generate_keypair_with_rng(&mut OsRng)
    }

    pub fn generate_keypair_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<KeyPair, PipelineError> {
        debug!(bits = self.config.asymmetric_strength, "generating key pair");
        keywrap::generate_keypair(rng, self.config.asymmetric_strength).at(Stage::KeyGeneration)
    }

    /// Encrypt `plaintext` to `public`, returning Base45 text.
    pub fn encrypt(&self, public: &PublicKey, plaintext: &[u8]) -> Result<String, PipelineError> {
        self.encrypt_with_rng(&mut OsRng, public, plaintext)
    }

    pub fn encrypt_str(&self, public: &PublicKey, text: &str) -> Result<String, PipelineError> {
        self.encrypt(public, text.as_bytes())
    }

    /// Encrypt drawing session key, nonce and OAEP seed from `rng`.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        public: &PublicKey,
        plaintext: &[u8],
    ) -> Result<String, PipelineError> {
        let cfg = &self.config;
        if plaintext.len() > cfg.max_plaintext_bytes {
            return Err(PipelineError::new(Stage::Compression, Error::LimitExceeded));
        }
        let suite = cfg.suite().at(Stage::Config)?;

        let compressed = compress::compress(plaintext, cfg.compression_level).at(Stage::Compression)?;
        debug!(plaintext = plaintext.len(), compressed = compressed.len(), "compressed");

        let alg = suite.aead();
        let key = SessionKey::generate(rng, alg).at(Stage::Symmetric)?;
        let nonce = aead::nonce(rng).at(Stage::Symmetric)?;
        let (ciphertext, tag) =
            aead::seal(alg, key.as_bytes(), &nonce, &compressed).at(Stage::Symmetric)?;
        debug!(algorithm = alg.name(), ciphertext = ciphertext.len(), "sealed");

        let wrapped_key = keywrap::wrap(rng, public, key.as_bytes()).at(Stage::KeyWrap)?;
        drop(key);
        debug!(wrapped = wrapped_key.len(), modulus_bits = public.bits(), "wrapped session key");

        let envelope = Envelope {
            suite,
            compression: Compression::Zstd,
            wrapped_key,
            nonce,
            tag,
            ciphertext,
        };
        let bytes = wire::encode_wire(&envelope).at(Stage::Envelope)?;
        let text = base45::encode(&bytes);
        debug!(envelope = bytes.len(), text = text.len(), "encoded");

        Ok(text)
    }

    /// Decrypt Base45 `text`. Every failure is the same opaque [`OpenError`].
    pub fn decrypt(&self, private: &PrivateKey, text: &str) -> Result<Vec<u8>, OpenError> {
        self.decrypt_detailed(private, text).map_err(|e| {
            debug!(stage = %e.stage, kind = %e.kind, "decryption failed");
            OpenError
        })
    }

    /// Decrypt and require the plaintext to be UTF-8.
    pub fn decrypt_to_string(&self, private: &PrivateKey, text: &str) -> Result<String, OpenError> {
        let bytes = self.decrypt(private, text)?;
        String::from_utf8(bytes).map_err(|_| OpenError)
    }

    /// Decrypt reporting which stage failed and why.
    ///
    /// The detailed error distinguishes a wrong key from a tampered envelope,
    /// so it must not be surfaced for attacker-supplied input. Use
    /// [`Pipeline::decrypt`] for that.
    pub fn decrypt_detailed(&self, private: &PrivateKey, text: &str) -> Result<Vec<u8>, PipelineError> {
        let cfg = &self.config;
        if text.len() > cfg.max_text_chars {
            return Err(PipelineError::new(Stage::Text, Error::LimitExceeded));
        }

        let bytes = base45::decode(text).at(Stage::Text)?;
        let envelope = wire::decode_wire(&bytes).at(Stage::Envelope)?;
        debug!(
            suite = envelope.suite.name(),
            wrapped = envelope.wrapped_key.len(),
            ciphertext = envelope.ciphertext.len(),
            "decoded envelope"
        );

        let alg = envelope.suite.aead();
        let raw = keywrap::unwrap(private, &envelope.wrapped_key).at(Stage::KeyWrap)?;
        if raw.len() != alg.key_len() {
            return Err(PipelineError::new(Stage::KeyWrap, Error::UnwrapFailure));
        }
        let key = SessionKey::from_bytes(raw);

        let compressed = aead::open(
            alg,
            key.as_bytes(),
            &envelope.nonce,
            &envelope.ciphertext,
            &envelope.tag,
        )
        .at(Stage::Symmetric)?;
        drop(key);

        let plaintext = match envelope.compression {
            Compression::Zstd => compress::decompress_bounded(&compressed, cfg.max_plaintext_bytes),
        }
        .at(Stage::Compression)?;
        debug!(plaintext = plaintext.len(), "decrypted");

        Ok(plaintext)
    }
}

// ---------------------------------------------------------------------------
// Inspection utilities (for ops/debugging)
// ---------------------------------------------------------------------------

/// Envelope metadata, extracted without any key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeInfo {
    pub version: u8,
    pub suite: Suite,
    pub compression: Compression,
    /// Wrapped key length; equals the recipient's modulus size in bytes.
    pub wrapped_key_bytes: usize,
    pub ciphertext_bytes: usize,
    pub envelope_bytes: usize,
    pub text_chars: usize,
}

impl EnvelopeInfo {
    pub fn modulus_bits(&self) -> usize {
        self.wrapped_key_bytes * 8
    }
}

impl fmt::Display for EnvelopeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "envelope v{} | {} (RSA-{}) | {} | {} bytes ciphertext, {} bytes envelope, {} chars",
            self.version,
            self.suite.name(),
            self.modulus_bits(),
            self.compression.name(),
            self.ciphertext_bytes,
            self.envelope_bytes,
            self.text_chars
        )
    }
}

/// Inspect Base45 envelope text without decrypting, under the default
/// text limit ([`crate::config::DEFAULT_MAX_TEXT_CHARS`]).
///
/// Reveals only what the envelope carries in clear.
pub fn inspect(text: &str) -> Result<EnvelopeInfo, PipelineError> {
    Pipeline::default().inspect(text)
}

impl Pipeline {
    /// Inspect envelope text, rejecting text longer than `max_text_chars`.
    pub fn inspect(&self, text: &str) -> Result<EnvelopeInfo, PipelineError> {
        if text.len() > self.config.max_text_chars {
            return Err(PipelineError::new(Stage::Text, Error::LimitExceeded));
        }
        inspect_unbounded(text)
    }
}

fn inspect_unbounded(text: &str) -> Result<EnvelopeInfo, PipelineError> {
    let bytes = base45::decode(text).at(Stage::Text)?;
    let envelope = wire::decode_wire(&bytes).at(Stage::Envelope)?;
    Ok(EnvelopeInfo {
        version: wire::PROTOCOL_VERSION,
        suite: envelope.suite,
        compression: envelope.compression,
        wrapped_key_bytes: envelope.wrapped_key.len(),
        ciphertext_bytes: envelope.ciphertext.len(),
        envelope_bytes: bytes.len(),
        text_chars: text.len(),
    })
}
