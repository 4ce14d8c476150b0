//! gfc: encrypt and decrypt files or stdin
//!
//! Commands:
//!   aes     - AES-256-GCM (default) or AES-256-CTR
//!   cc20    - XChaCha20-Poly1305 (default) or ChaCha20-Poly1305
//!   rsa     - RSA-OAEP with SHA-512
//!   keygen  - write a random 256-bit key (or an RSA keypair)
//!
//! Symmetric commands without `--key` prompt for a passphrase on the terminal.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use secrecy::SecretString;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use gfc_core::config::GfcConfig;
use gfc_core::{AlgoMode, Encoding, GfcError, GfcResult, Request};
use gfc_crypto::{PassphraseSource, Selected};
use gfc_pipeline::Pipeline;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "gfc",
    version,
    about = "File and stream encryption",
    long_about = "gfc: encrypt, decrypt, compress and encode files or stdin"
)]
struct Cli {
    /// Path to config.toml
    #[arg(long, env = "GFC_CONFIG", default_value = "~/.config/gfc/config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "GFC_LOG")]
    log: Option<String>,

    /// Log format
    #[arg(long, env = "GFC_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// AES-256 in GCM or CTR mode
    Aes(AesArgs),

    /// ChaCha20-Poly1305 family
    Cc20(ChaChaArgs),

    /// RSA-OAEP (SHA-512); input must fit in one RSA block
    Rsa(RsaArgs),

    /// Generate a random 32-byte key, or an RSA keypair with --rsa
    Keygen(KeygenArgs),
}

/// Flags shared by every encrypt/decrypt command
#[derive(Args, Debug, Clone, Default)]
struct CryptArgs {
    /// Decrypt instead of encrypt
    #[arg(short, long)]
    decrypt: bool,

    /// Input file (stdin when omitted)
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Read a single line of text from stdin
    #[arg(short, long)]
    text: bool,

    /// Text encoding of the ciphertext: base64 (b64) or hex (h)
    #[arg(short, long)]
    encoding: Option<Encoding>,

    /// zstd-compress before encrypting (decompress after decrypting)
    #[arg(short, long)]
    compress: bool,
}

#[derive(Args, Debug)]
struct AesArgs {
    /// AES mode: gcm or ctr
    #[arg(short, long)]
    mode: Option<String>,

    /// 256-bit key file (prompt for a passphrase when omitted)
    #[arg(short, long = "key", env = "GFC_KEY")]
    keyfile: Option<PathBuf>,

    #[command(flatten)]
    io: CryptArgs,
}

#[derive(Args, Debug)]
struct ChaChaArgs {
    /// Any value containing 'x' selects XChaCha20-Poly1305, anything else ChaCha20-Poly1305
    #[arg(short, long, default_value = "xcc20")]
    mode: String,

    /// 256-bit key file (prompt for a passphrase when omitted)
    #[arg(short, long = "key", env = "GFC_KEY")]
    keyfile: Option<PathBuf>,

    #[command(flatten)]
    io: CryptArgs,
}

#[derive(Args, Debug)]
struct RsaArgs {
    /// Public key PEM text, e.g. PUB="$(< id_rsa.pub)"
    #[arg(long = "pub", env = "PUB", hide_env_values = true)]
    public_pem: Option<String>,

    /// Private key PEM text, e.g. PRI="$(< id_rsa)"
    #[arg(long = "pri", env = "PRI", hide_env_values = true)]
    private_pem: Option<String>,

    /// Public key file (used for encryption)
    #[arg(short = 'p', long = "public-key")]
    public_key_file: Option<PathBuf>,

    /// Private key file (used for decryption)
    #[arg(short = 'P', long = "private-key")]
    private_key_file: Option<PathBuf>,

    #[command(flatten)]
    io: CryptArgs,
}

#[derive(Args, Debug)]
struct KeygenArgs {
    /// Output file (stdout when omitted); RSA public key goes to <FILE>.pub
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Generate an RSA keypair of this many bits instead of a symmetric key
    #[arg(long, value_name = "BITS")]
    rsa: Option<usize>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);
    let config = GfcConfig::load(&config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    let level = cli.log.as_deref().unwrap_or(&config.log.level);
    let format = match cli.log_format {
        Some(format) => format,
        None => LogFormat::from_str(&config.log.format, true)
            .map_err(|e| anyhow::anyhow!("invalid log format in config: {e}"))?,
    };
    init_logging(level, format);

    match cli.command {
        Commands::Keygen(args) => cmd_keygen(&args),
        command => {
            let (request, io) = build_request(&config, command)?;
            let prompt = TerminalPassphrase {
                confirm: !request.decrypt,
            };
            cmd_crypt(&config, &request, &io, &prompt)
        }
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries ciphertext; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

// ── Request assembly ──────────────────────────────────────────────────────────

/// Turn a subcommand into a pipeline request. The mode is resolved before any
/// key or input file is read.
fn build_request(config: &GfcConfig, command: Commands) -> Result<(Request, CryptArgs)> {
    let (mode, io, key_material) = match command {
        Commands::Aes(args) => {
            let mode = aes_mode(args.mode.as_deref(), config.crypto.default_aes_mode)?;
            let key = read_keyfile(args.keyfile.as_deref())?;
            (mode, args.io, key)
        }
        Commands::Cc20(args) => {
            let mode = chacha_mode(&args.mode);
            let key = read_keyfile(args.keyfile.as_deref())?;
            (mode, args.io, key)
        }
        Commands::Rsa(args) => {
            let key = rsa_key(&args)?;
            (AlgoMode::RsaOaep, args.io, Some(key))
        }
        Commands::Keygen(_) => bail!("keygen does not take a pipeline request"),
    };

    let mut request = Request::new(mode);
    request.decrypt = io.decrypt;
    request.key_material = key_material;
    request.compress = io.compress;
    request.encoding = io.encoding.unwrap_or(config.crypto.default_encoding);
    Ok((request, io))
}

fn aes_mode(name: Option<&str>, default: AlgoMode) -> GfcResult<AlgoMode> {
    let Some(name) = name else {
        return Ok(default);
    };
    let mode = match name.to_ascii_lowercase().as_str() {
        "gcm" => AlgoMode::AesGcm,
        "ctr" => AlgoMode::AesCtr,
        other => Selected::parse(other)?.mode(),
    };
    match mode {
        AlgoMode::AesGcm | AlgoMode::AesCtr => Ok(mode),
        _ => Err(GfcError::UnsupportedMode(format!("{name} is not an AES mode"))),
    }
}

fn chacha_mode(name: &str) -> AlgoMode {
    if name.to_ascii_lowercase().contains('x') {
        AlgoMode::XChaCha20Poly1305
    } else {
        AlgoMode::ChaCha20Poly1305
    }
}

fn read_keyfile(path: Option<&Path>) -> Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).with_context(|| format!("reading key file: {}", p.display())))
        .transpose()
}

/// Inline PEM text wins over key files. Encryption needs the public key,
/// decryption the private key.
fn rsa_key(args: &RsaArgs) -> Result<Vec<u8>> {
    let (inline, file, which) = if args.io.decrypt {
        (&args.private_pem, &args.private_key_file, "private")
    } else {
        (&args.public_pem, &args.public_key_file, "public")
    };

    if let Some(pem) = inline.as_deref().filter(|s| !s.is_empty()) {
        return Ok(pem.as_bytes().to_vec());
    }
    match file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("reading RSA {which} key: {}", path.display())),
        None => Err::<Vec<u8>, _>(GfcError::MissingKey {
            mode: AlgoMode::RsaOaep,
        })
        .with_context(|| format!("no RSA {which} key given")),
    }
}

// ── Passphrase prompt ─────────────────────────────────────────────────────────

struct TerminalPassphrase {
    /// Ask twice (when encrypting)
    confirm: bool,
}

impl PassphraseSource for TerminalPassphrase {
    fn passphrase(&self) -> GfcResult<SecretString> {
        let prompt = |label: &str| {
            rpassword::prompt_password(label)
                .map(Zeroizing::new)
                .map_err(|e| GfcError::Passphrase(format!("reading passphrase: {e}")))
        };

        let first = prompt("Passphrase: ")?;
        if first.is_empty() {
            return Err(GfcError::Passphrase("empty passphrase".into()));
        }
        if self.confirm {
            let second = prompt("Repeat passphrase: ")?;
            if *first != *second {
                return Err(GfcError::Passphrase("passphrases do not match".into()));
            }
        }
        Ok(SecretString::from(first.as_str().to_owned()))
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_crypt(
    config: &GfcConfig,
    request: &Request,
    io: &CryptArgs,
    passphrase: &dyn PassphraseSource,
) -> Result<()> {
    let pipeline = Pipeline::from_config(config, passphrase);

    // fail before blocking on stdin
    let prepared = pipeline
        .prepare(request)
        .with_context(|| format!("invalid {} request", request.mode))?;

    let input = read_input(io.infile.as_deref(), io.text)?;
    let output = prepared.run(&input).with_context(|| {
        let action = if request.decrypt { "decryption" } else { "encryption" };
        format!("{} {action} failed", request.mode)
    })?;

    write_output(io.outfile.as_deref(), &output)
}

fn cmd_keygen(args: &KeygenArgs) -> Result<()> {
    match args.rsa {
        None => {
            let key = gfc_crypto::generate_key();
            write_output(args.outfile.as_deref(), key.as_bytes())
        }
        Some(bits) => {
            let pair = gfc_crypto::rsa::generate_keypair(bits)
                .with_context(|| format!("generating {bits}-bit RSA keypair"))?;
            match &args.outfile {
                Some(path) => {
                    write_output(Some(path), pair.private.as_bytes())?;
                    let mut public_path = path.clone().into_os_string();
                    public_path.push(".pub");
                    write_output(Some(Path::new(&public_path)), pair.public.as_bytes())
                }
                None => {
                    let mut both = Zeroizing::new(pair.private.as_bytes().to_vec());
                    both.extend_from_slice(pair.public.as_bytes());
                    write_output(None, &both)
                }
            }
        }
    }
}

// ── Input / output ────────────────────────────────────────────────────────────

fn read_input(infile: Option<&Path>, text: bool) -> Result<Vec<u8>> {
    if text {
        return read_line(io::stdin().lock()).context("reading text from stdin");
    }
    match infile {
        Some(path) => {
            if path.is_dir() {
                bail!("input {} is a directory", path.display());
            }
            std::fs::read(path).with_context(|| format!("reading input: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// First line of `reader`, without its line terminator.
fn read_line<R: BufRead>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn write_output(outfile: Option<&Path>, data: &[u8]) -> Result<()> {
    match outfile {
        Some(path) => {
            let mut file = create_private(path)
                .with_context(|| format!("opening output: {}", path.display()))?;
            file.write_all(data)
                .with_context(|| format!("writing output: {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("writing stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}

/// Create (or truncate) `path`; new files are owner read/write only.
fn create_private(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
