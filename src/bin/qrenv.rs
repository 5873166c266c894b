//! qrenv: encrypt small payloads into QR-friendly Base45 text.
//!
//! Usage:
//!   qrenv keygen  --name <NAME>
//!   qrenv encrypt --key <NAME>.pub (--in <FILE> | --text <TEXT>) [--out <FILE>] [--chunk <N>]
//!   qrenv decrypt --key <NAME>.key (--in <FILE> | --text <TEXT>) [--out <FILE>]
//!   qrenv inspect (--in <FILE> | --text <TEXT>)
//!
//! Environment:
//!   QRENV_LOG_FORMAT  - "json" for structured logging, "pretty" for dev
//!   QRENV_*           - pipeline settings, see `qr_envelope::config`

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use qr_envelope::barcode::{self, DEFAULT_CHUNK_CHARS};
use qr_envelope::{Config, Pipeline, PrivateKey, PublicKey};

#[derive(Parser)]
#[command(name = "qrenv", version, about = "Hybrid RSA-OAEP + AES-GCM encryption to Base45 text")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair: <NAME>.pub (SPKI PEM) and <NAME>.key (PKCS#8 PEM, mode 600)
    Keygen {
        #[arg(long)]
        name: PathBuf,
    },
    /// Encrypt to Base45 text
    Encrypt {
        /// Recipient public key (PEM)
        #[arg(long)]
        key: PathBuf,
        #[command(flatten)]
        input: Input,
        /// Write text here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Split output into barcode-sized chunks, one per line
        #[arg(long, value_name = "CHARS", num_args = 0..=1, default_missing_value = "2500")]
        chunk: Option<usize>,
        /// Write one SVG QR code per chunk into this directory (needs the `qr` feature)
        #[arg(long, value_name = "DIR")]
        qr_dir: Option<PathBuf>,
    },
    /// Decrypt Base45 text
    Decrypt {
        /// Recipient private key (PEM)
        #[arg(long)]
        key: PathBuf,
        #[command(flatten)]
        input: Input,
        /// Write plaintext here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show envelope metadata without decrypting
    Inspect {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args)]
#[group(multiple = false)]
struct Input {
    /// Read from file ("-" or absent for stdin)
    #[arg(long = "in", value_name = "FILE")]
    file: Option<PathBuf>,
    /// Take input from the command line
    #[arg(long)]
    text: Option<String>,
}

impl Input {
    fn read(&self) -> Result<Vec<u8>> {
        if let Some(text) = &self.text {
            return Ok(text.as_bytes().to_vec());
        }
        match &self.file {
            Some(path) if path != Path::new("-") => {
                fs::read(path).with_context(|| format!("read {}", path.display()))
            }
            _ => {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf).context("read stdin")?;
                Ok(buf)
            }
        }
    }

    /// Read encoded text, joining chunk lines and dropping line endings.
    fn read_encoded(&self) -> Result<String> {
        let raw = String::from_utf8(self.read()?).context("encoded input is not UTF-8")?;
        let lines: Vec<&str> = raw
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
            .collect();
        Ok(barcode::join_chunks(&lines)?)
    }
}

fn main() -> Result<()> {
    let log_format = std::env::var("QRENV_LOG_FORMAT").unwrap_or_else(|_| "pretty".into());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qrenv=info,qr_envelope=warn".into());
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid QRENV_* configuration")?;
    let pipeline = Pipeline::new(config)?;

    match cli.command {
        Command::Keygen { name } => cmd_keygen(&pipeline, &name),
        Command::Encrypt {
            key,
            input,
            out,
            chunk,
            qr_dir,
        } => cmd_encrypt(&pipeline, &key, &input, out.as_deref(), chunk, qr_dir.as_deref()),
        Command::Decrypt { key, input, out } => cmd_decrypt(&pipeline, &key, &input, out.as_deref()),
        Command::Inspect { input } => {
            let info = pipeline.inspect(&input.read_encoded()?)?;
            println!("{info}");
            Ok(())
        }
    }
}

fn cmd_keygen(pipeline: &Pipeline, name: &Path) -> Result<()> {
    let pair = pipeline.generate_keypair()?;

    let pub_path = name.with_extension("pub");
    let key_path = name.with_extension("key");

    fs::write(&pub_path, pair.public.to_pem()?).with_context(|| format!("write {}", pub_path.display()))?;
    fs::write(&key_path, pair.private.to_pem()?.as_bytes())
        .with_context(|| format!("write {}", key_path.display()))?;

    // Restrict private key permissions (Unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&key_path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&key_path, perms)?;
    }

    info!(bits = pair.public.bits(), "generated key pair");
    eprintln!("Generated RSA-{} key pair:", pair.public.bits());
    eprintln!("  Public key:   {}", pub_path.display());
    eprintln!("  Private key:  {} (mode 600)", key_path.display());
    eprintln!();
    eprintln!("Keep {} safe. Share {} freely.", key_path.display(), pub_path.display());
    Ok(())
}

fn cmd_encrypt(
    pipeline: &Pipeline,
    key: &Path,
    input: &Input,
    out: Option<&Path>,
    chunk: Option<usize>,
    qr_dir: Option<&Path>,
) -> Result<()> {
    let pem = fs::read_to_string(key).with_context(|| format!("read {}", key.display()))?;
    let public = PublicKey::from_pem(&pem).context("invalid public key file")?;
    let plaintext = input.read()?;

    let text = pipeline.encrypt(&public, &plaintext)?;
    info!(plaintext = plaintext.len(), text = text.len(), "encrypted");

    let chunks = match chunk {
        Some(n) => barcode::split_for_barcode(&text, n)?,
        None if qr_dir.is_some() => barcode::split_for_barcode(&text, DEFAULT_CHUNK_CHARS)?,
        None => vec![text.as_str()],
    };

    if let Some(dir) = qr_dir {
        write_qr_codes(dir, &chunks)?;
    }

    let mut body = chunks.join("\n");
    body.push('\n');
    write_output(out, body.as_bytes())
}

#[cfg(feature = "qr")]
fn write_qr_codes(dir: &Path, chunks: &[&str]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for (i, chunk) in chunks.iter().enumerate() {
        let path = dir.join(format!("part-{:03}.svg", i + 1));
        fs::write(&path, barcode::render_svg(chunk)?)
            .with_context(|| format!("write {}", path.display()))?;
    }
    info!(count = chunks.len(), dir = %dir.display(), "wrote QR codes");
    Ok(())
}

#[cfg(not(feature = "qr"))]
fn write_qr_codes(_dir: &Path, _chunks: &[&str]) -> Result<()> {
    bail!("QR rendering not available: rebuild with --features qr")
}

fn cmd_decrypt(pipeline: &Pipeline, key: &Path, input: &Input, out: Option<&Path>) -> Result<()> {
    let pem = fs::read_to_string(key).with_context(|| format!("read {}", key.display()))?;
    let private = PrivateKey::from_pem(&pem).context("invalid private key file")?;
    let text = input.read_encoded()?;

    let plaintext = match pipeline.decrypt(&private, &text) {
        Ok(pt) => pt,
        Err(e) => bail!("{e} (wrong key, corrupted or truncated text)"),
    };
    info!(plaintext = plaintext.len(), "decrypted");

    write_output(out, &plaintext)
}

fn write_output(out: Option<&Path>, data: &[u8]) -> Result<()> {
    match out {
        Some(path) => fs::write(path, data).with_context(|| format!("write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
