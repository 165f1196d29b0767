// Command line front end
// Parses options, builds key material and round-trips a text message

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::Parser;
use log::info;

use crate::rsa::{
    decrypt_to_string, encrypt_str, KeyGenConfig, KeyMaterial, KeyPairBuilder, RsaBigInt,
    SmallPrimeTable, DEFAULT_TRIALS,
};
use crate::util::load_or_create_prime_table;

/// CLI arguments parsed via clap.
#[derive(Parser, Debug, Clone)]
#[command(name = "rsa-keygen", about = "Generate an RSA key pair and round-trip a message")]
pub struct Args {
    /// Bit length of each generated prime (p, q and e).
    #[arg(short = 'b', long = "bits", default_value_t = 1024)]
    pub bits: u64,

    /// Miller-Rabin rounds per candidate.
    #[arg(long = "trials", default_value_t = DEFAULT_TRIALS)]
    pub trials: u32,

    /// Give up after this many candidates per prime.
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<u64>,

    /// Number of small primes used for trial division.
    #[arg(long = "table-size", default_value_t = 168)]
    pub table_size: usize,

    /// Load the small-prime table from this file, creating it if missing.
    #[arg(long = "prime-cache")]
    pub prime_cache: Option<PathBuf>,

    /// Message to encrypt and decrypt.
    #[arg(short = 'm', long = "message", default_value = "Hello RSA!")]
    pub message: String,

    /// Print key material in hex instead of decimal.
    #[arg(long = "hex")]
    pub hex: bool,
}

/// Run the demo, writing its report to stdout.
pub fn run(args: Args) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(&args, &mut out)
}

/// Run the demo, writing its report to `out`.
pub fn run_with_output<W: Write>(args: &Args, out: &mut W) -> anyhow::Result<()> {
    let table = match &args.prime_cache {
        Some(path) => load_or_create_prime_table(path, args.table_size)
            .with_context(|| format!("loading prime cache {}", path.display()))?,
        None => SmallPrimeTable::first(args.table_size).context("building small prime table")?,
    };

    let config = KeyGenConfig::default()
        .with_bit_length(args.bits)
        .with_trials(args.trials)
        .with_max_attempts(args.max_attempts);

    info!("generating key material with {}-bit primes", args.bits);
    let key = KeyPairBuilder::new(config, table)
        .build()
        .context("generating key material")?;

    write_key(out, &key, args.hex)?;

    let ciphertext =
        encrypt_str(&args.message, &key.public_key()).context("encrypting message")?;
    let cipher_text: Vec<String> = ciphertext.iter().map(|c| render(c, args.hex)).collect();
    writeln!(out, "ciphertext = [{}]", cipher_text.join(", "))?;

    let decrypted =
        decrypt_to_string(&ciphertext, &key.private_key()).context("decrypting message")?;
    writeln!(out, "decrypted  = {}", decrypted)?;
    ensure!(decrypted == args.message, "round trip produced a different message");

    Ok(())
}

fn write_key<W: Write>(out: &mut W, key: &KeyMaterial, as_hex: bool) -> io::Result<()> {
    writeln!(out, "p = {}", render(key.p(), as_hex))?;
    writeln!(out, "q = {}", render(key.q(), as_hex))?;
    writeln!(out, "n = {}", render(key.n(), as_hex))?;
    writeln!(out, "totient = {}", render(key.totient(), as_hex))?;
    writeln!(out, "e = {}", render(key.e(), as_hex))?;
    writeln!(out, "d = {}", render(key.d(), as_hex))
}

fn render(value: &RsaBigInt, as_hex: bool) -> String {
    if as_hex {
        format!("0x{}", hex::encode(value.to_bytes_be()))
    } else {
        value.to_string()
    }
}
