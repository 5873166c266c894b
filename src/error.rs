//! Error types for the envelope pipeline.
//!
//! Every component reports an [`Error`] kind. The orchestrators attach the
//! [`Stage`] that failed, producing a [`PipelineError`]. Decryption of
//! untrusted input collapses all of that into the opaque [`OpenError`].

use core::fmt;

/// Failure kinds shared by all pipeline components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed key, wrong-length key or nonce, or unsupported key strength.
    #[error("invalid key material")]
    InvalidKeyMaterial,

    /// The session key does not fit under the RSA-OAEP payload limit.
    #[error("payload too large for key wrapping")]
    PayloadTooLarge,

    /// AEAD tag verification failed.
    #[error("authentication failed")]
    AuthFailure,

    /// RSA-OAEP unwrap failed (padding or length check).
    #[error("key unwrap failed")]
    UnwrapFailure,

    /// The envelope is structurally invalid.
    #[error("malformed envelope")]
    FormatError,

    /// The envelope names a version, suite or compression we do not speak.
    #[error("unsupported envelope version or algorithm")]
    UnsupportedVersion,

    /// The text form is not valid Base45.
    #[error("invalid text encoding")]
    InvalidEncoding,

    /// Decompression failed.
    #[error("corrupt compressed data")]
    CorruptData,

    /// A configured size limit was exceeded.
    #[error("size limit exceeded")]
    LimitExceeded,

    /// The random source refused to produce bytes.
    #[error("random source failure")]
    RandomSource,

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Pipeline stage at which an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Config,
    KeyGeneration,
    Compression,
    Symmetric,
    KeyWrap,
    Envelope,
    Text,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Config => "config",
            Stage::KeyGeneration => "key generation",
            Stage::Compression => "compression",
            Stage::Symmetric => "symmetric cipher",
            Stage::KeyWrap => "key wrap",
            Stage::Envelope => "envelope",
            Stage::Text => "text encoding",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured pipeline failure: which stage, which kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {kind}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub kind: Error,
}

impl PipelineError {
    pub fn new(stage: Stage, kind: Error) -> Self {
        Self { stage, kind }
    }
}

/// Extension for tagging component results with the stage they belong to.
pub(crate) trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T> AtStage<T> for Result<T, Error> {
    fn at(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|kind| PipelineError::new(stage, kind))
    }
}

/// Opaque decryption failure.
///
/// Wrong key, tampered ciphertext, malformed text and oversized input all
/// produce this same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("decryption failed")]
pub struct OpenError;

/// Collapse detailed failures into the opaque error (oracle discipline).
impl From<PipelineError> for OpenError {
    fn from(_: PipelineError) -> Self {
        OpenError
    }
}

impl From<Error> for OpenError {
    fn from(_: Error) -> Self {
        OpenError
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
