//! # qr-envelope
//!
//! Hybrid encryption for small payloads that travel as printable text or QR codes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qr_envelope::{Config, Pipeline};
//!
//! let pipeline = Pipeline::new(Config::default())?;
//! let pair = pipeline.generate_keypair()?;
//!
//! let text = pipeline.encrypt(&pair.public, b"secret")?;
//! let plaintext = pipeline.decrypt(&pair.private, &text)?;
//!
//! assert_eq!(plaintext, b"secret");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Security Properties
//!
//! - **Hybrid**: fresh AES-GCM session key per message, wrapped with RSA-OAEP-SHA256
//! - **Uniform errors**: [`Pipeline::decrypt`] fails with one opaque [`OpenError`]
//! - **Bounded**: plaintext, text and decompressed sizes are capped by [`Config`]
//! - **Stable wire format**: versioned, self-describing, Base45 on the outside
//!
//! ## What's NOT Provided
//!
//! - Sender authentication (anyone holding the public key can encrypt)
//! - Key management or revocation
//! - QR image decoding
//! - Streaming encryption

#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/qr-envelope/0.1.0")]

pub mod aead;
pub mod barcode;
pub mod base45;
pub mod compress;
pub mod config;
pub mod keywrap;
pub mod wire;

mod error;
mod pipeline;

pub use config::Config;
pub use error::{Error, OpenError, PipelineError, Result, Stage};
pub use keywrap::{generate_keypair, KeyPair, PrivateKey, PublicKey};
pub use pipeline::{inspect, EnvelopeInfo, Pipeline};
pub use wire::{Compression, Suite, PROTOCOL_VERSION};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
