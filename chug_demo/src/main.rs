use anyhow::{Context, Result, bail};
use chug_core::{Key, map, morph};
use clap::{Parser, Subcommand};
use env_logger::Env;
use hex::encode as hex_encode;
use log::{LevelFilter, debug};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "chug",
    author,
    version,
    about = "Chug byte-mapping CLI (demonstration only, not a secure cipher)"
)]
struct Cli {
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a key from a plaintext and a cover ciphertext.
    Map {
        #[arg(long, value_name = "TEXT")]
        message: Option<String>,
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        #[arg(long, value_name = "TEXT")]
        cover: Option<String>,
        #[arg(long, value_name = "FILE")]
        cover_file: Option<PathBuf>,
        #[arg(long, value_name = "N", default_value_t = 0)]
        start_index: usize,
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Recover the plaintext from a cover ciphertext and a key.
    Morph {
        #[arg(long, value_name = "TEXT")]
        cover: Option<String>,
        #[arg(long, value_name = "FILE")]
        cover_file: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        key: PathBuf,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Run the inline mapping/morphing walkthrough.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    match cli.command {
        Commands::Map {
            message,
            input,
            cover,
            cover_file,
            start_index,
            out,
        } => cmd_map(message, input, cover, cover_file, start_index, out),
        Commands::Morph {
            cover,
            cover_file,
            key,
            out,
        } => cmd_morph(cover, cover_file, key, out),
        Commands::Demo => cmd_demo(),
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default));
    builder.format_timestamp(None);
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn cmd_map(
    message: Option<String>,
    input: Option<PathBuf>,
    cover: Option<String>,
    cover_file: Option<PathBuf>,
    start_index: usize,
    out: PathBuf,
) -> Result<()> {
    let plaintext = resolve_bytes(message, input, "plaintext")?;
    let ciphertext = resolve_bytes(cover, cover_file, "cover ciphertext")?;
    let key = map(&plaintext, &ciphertext, start_index)?;
    debug!(
        "map cmd plaintext_len={} ciphertext_len={} start_index={} key_len={}",
        plaintext.len(),
        ciphertext.len(),
        start_index,
        key.as_bytes().len()
    );
    fs::write(&out, key.as_bytes())
        .with_context(|| format!("writing key to {}", out.display()))?;
    println!(
        "Wrote {}-byte key to {} (start index {})",
        key.as_bytes().len(),
        out.display(),
        key.start_index()
    );
    Ok(())
}

fn cmd_morph(
    cover: Option<String>,
    cover_file: Option<PathBuf>,
    key_path: PathBuf,
    out: Option<PathBuf>,
) -> Result<()> {
    let ciphertext = resolve_bytes(cover, cover_file, "cover ciphertext")?;
    let key_bytes = fs::read(&key_path)
        .with_context(|| format!("reading key from {}", key_path.display()))?;
    let key = Key::from_bytes(key_bytes)?;
    debug!(
        "morph cmd ciphertext_len={} start_index={} payload_len={}",
        ciphertext.len(),
        key.start_index(),
        key.payload_len()
    );
    let plaintext = morph(&ciphertext, &key)?;
    match out {
        Some(path) => {
            fs::write(&path, &plaintext)
                .with_context(|| format!("writing plaintext to {}", path.display()))?;
            println!(
                "Recovered {} bytes and wrote them to {}",
                plaintext.len(),
                path.display()
            );
        }
        None => {
            println!("Recovered plaintext ({} bytes):", plaintext.len());
            println!("{}", String::from_utf8_lossy(&plaintext));
        }
    }
    Ok(())
}

fn cmd_demo() -> Result<()> {
    let ciphertext = b"I really want some grilled cheese!";
    let plaintext = b"I secretly want steak";
    let key = map(plaintext, ciphertext, 0)?;
    let secret = morph(ciphertext, &key)?;

    println!("[mapping]");
    println!(
        "ciphertext : {} (\"{}\")",
        hex_encode(ciphertext),
        String::from_utf8_lossy(ciphertext)
    );
    println!(
        "plaintext  : {} (\"{}\")",
        hex_encode(plaintext),
        String::from_utf8_lossy(plaintext)
    );
    println!("key        : {}", hex_encode(key.as_bytes()));
    println!();
    println!("[morphing]");
    println!(
        "secret     : {} (\"{}\")",
        hex_encode(&secret),
        String::from_utf8_lossy(&secret)
    );
    Ok(())
}

fn resolve_bytes(text: Option<String>, file: Option<PathBuf>, label: &str) -> Result<Vec<u8>> {
    match (text, file) {
        (Some(text), None) => Ok(text.into_bytes()),
        (None, Some(path)) => {
            fs::read(&path).with_context(|| format!("reading {} from {}", label, path.display()))
        }
        (Some(_), Some(_)) => bail!("Provide the {label} as text or as a file, not both."),
        (None, None) => bail!("Provide the {label} as text or as a file."),
    }
}
