//! Encryption tool
//!
//! Encrypts a message point under a stored public key and writes the
//! ciphertext record to `ecc_ciphertext.txt` in the working directory.
//!
//! Usage: `encrypt <pub_key> <message>`
//!
//! - `<pub_key>` - path to the public-key record, which also names the curve
//! - `<message>` - path to a file holding the message point, or the point
//!   text itself, e.g. `(12 : 2 : 1)`
//!
//! Log output goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use ecc_elgamal::config::{CIPHERTEXT_FILE, DEFAULT_LOG_FILTER};
use ecc_elgamal::records::{self, CiphertextRecord, PublicKeyRecord};
use ecc_elgamal::{encrypt, Error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "encrypt <pub_key> <message>";

#[derive(Parser, Debug)]
#[command(name = "encrypt", version, about = "EC-ElGamal encryption of a curve point")]
struct Args {
    /// Public-key record (JSON)
    pub_key: PathBuf,
    /// Message point, as a file or as `(x : y : z)` text
    message: String,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(error) => {
            println!("Invalid Arguments!");
            println!("\nUsage: {}", USAGE);
            debug!(%error, "rejected command line");
            return Ok(ExitCode::from(1));
        }
    };

    run(&args)?;
    println!(
        "Encryption complete. Ciphertext saved to '{}'.",
        CIPHERTEXT_FILE
    );
    Ok(ExitCode::SUCCESS)
}

/// Help and version requests exit here; any other clap error is an
/// `Argument` error
fn parse_args<I, T>(argv: I) -> std::result::Result<Args, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Ok(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => Err(Error::Argument(format!("{:?}", e.kind()))),
    }
}

fn run(args: &Args) -> Result<()> {
    let record: PublicKeyRecord = records::load(&args.pub_key)
        .with_context(|| format!("Failed to read public key from {}", args.pub_key.display()))?;
    let public_key = record
        .to_public_key()
        .context("Public key record does not describe a valid key")?;

    let message_text = read_message(&args.message)?;
    let message = public_key
        .curve()
        .parse_point(&message_text)
        .context("Message is not a point on the curve")?;

    let mut rng = StdRng::from_os_rng();
    let ciphertext = encrypt(&public_key, &message, &mut rng).context("Encryption failed")?;
    info!(curve = %public_key.curve(), "message encrypted");

    records::save(
        &CiphertextRecord::from_ciphertext(&ciphertext),
        Path::new(CIPHERTEXT_FILE),
    )
    .context("Failed to write ciphertext")?;
    Ok(())
}

/// Point text given inline, or the trimmed contents of the named file
fn read_message(arg: &str) -> Result<String> {
    if arg.trim_start().starts_with('(') {
        return Ok(arg.trim().to_string());
    }
    let text = fs::read_to_string(arg)
        .with_context(|| format!("Failed to read message from {}", arg))?;
    Ok(text.trim().to_string())
}
