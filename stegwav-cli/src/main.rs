//! stegwav CLI - hide encrypted text in WAV files

mod wav;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, Subcommand};
use stegwav_core::{CipherKey, JsonFileLog, Watermarker};

#[derive(Parser)]
#[command(name = "stegwav", about = "Hide encrypted messages in WAV audio", version)]
struct Cli {
    /// Attempt log used to suggest bit depths
    #[arg(long, env = "STEGWAV_HISTORY", default_value = JsonFileLog::DEFAULT_PATH, global = true)]
    history: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt a message and embed it into a WAV file
    Embed {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Message to hide
        #[arg(short, long)]
        message: String,

        /// Playfair passphrase
        #[arg(short, long, env = "STEGWAV_KEY")]
        key: String,

        /// Rail fence rail count
        #[arg(short, long, default_value = "3")]
        rails: usize,

        /// Low bits used per sample; suggested from history when omitted
        #[arg(short, long)]
        bits: Option<u32>,
    },
    /// Extract and decrypt a message from a WAV file
    Extract {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Playfair passphrase
        #[arg(short, long, env = "STEGWAV_KEY")]
        key: String,

        /// Rail fence rail count
        #[arg(short, long, default_value = "3")]
        rails: usize,

        /// Low bits used per sample
        #[arg(short, long, default_value = "1")]
        bits: u32,
    },
    /// Report the signal-to-noise ratio between two WAV files
    Analyze {
        /// Unmodified WAV file
        #[arg(long)]
        original: PathBuf,

        /// Modified WAV file
        #[arg(long)]
        modified: PathBuf,
    },
    /// Print the suggested bit depth for a carrier size
    #[command(group(ArgGroup::new("carrier").required(true).args(["size", "input"])))]
    Suggest {
        /// Carrier size in bytes
        #[arg(long)]
        size: Option<u64>,

        /// WAV file whose size is used
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Embed {
            input,
            output,
            message,
            key,
            rails,
            bits,
        } => {
            let key = CipherKey::new(&key, rails).context("invalid key")?;
            let carrier = wav::read(&input)?;
            let size = wav::file_size(&input)?;
            let id = wav::carrier_id(&input);
            let watermarker = Watermarker::new(Arc::new(JsonFileLog::open(&cli.history)));

            let bit_depth = match bits {
                Some(bits) => bits,
                None => {
                    let suggested = watermarker.suggest_bit_depth(size);
                    eprintln!("Using suggested bit depth {suggested} for {size} bytes");
                    suggested
                }
            };

            eprintln!(
                "Embedding into {} ({} samples, {} channel(s), {}-bit)...",
                input.display(),
                carrier.len(),
                carrier.format().channels,
                carrier.format().bits_per_sample
            );
            let report = watermarker
                .embed(&id, size, &carrier, &key, &message, bit_depth)
                .with_context(|| format!("failed to embed into {}", input.display()))?;
            wav::write(&output, &report.carrier)?;

            eprintln!("Stego audio written to {}", output.display());
            println!("Ciphertext:    {}", report.ciphertext);
            println!("Bit depth:     {}", report.bit_depth);
            println!("Bits embedded: {}", report.bits_embedded);
            if report.quality.is_lossless() {
                println!("SNR:           inf (no samples changed)");
            } else {
                println!("SNR:           {:.2} dB", report.quality.snr_db);
            }
        }
        Command::Extract {
            input,
            key,
            rails,
            bits,
        } => {
            let key = CipherKey::new(&key, rails).context("invalid key")?;
            let carrier = wav::read(&input)?;
            let revealed = stegwav_core::extract(&carrier, &key, bits)
                .with_context(|| format!("failed to extract from {}", input.display()))?;
            println!("Ciphertext: {}", revealed.ciphertext);
            println!("Message:    {}", revealed.message);
        }
        Command::Analyze { original, modified } => {
            let a = wav::read(&original)?;
            let b = wav::read(&modified)?;
            if a.len() != b.len() {
                eprintln!(
                    "Warning: lengths differ ({} vs {} samples), comparing the first {}.",
                    a.len(),
                    b.len(),
                    a.len().min(b.len())
                );
            }
            let report = stegwav_core::analyze_with_diagnostics(&a, &b);
            if report.is_lossless() {
                println!("SNR:            inf");
            } else {
                println!("SNR:            {:.2} dB", report.snr_db);
            }
            println!("Compared:       {}", report.compared);
            println!("Changed:        {}", report.changed);
            println!("Peak diff:      {}", report.peak_diff);
            println!("Signal power:   {:.3e}", report.signal_power);
            println!("Noise power:    {:.3e}", report.noise_power);
        }
        Command::Suggest { size, input } => {
            let size = match (size, input) {
                (Some(size), _) => size,
                (None, Some(input)) => wav::file_size(&input)?,
                (None, None) => bail!("either --size or --input is required"),
            };
            let watermarker = Watermarker::new(Arc::new(JsonFileLog::open(&cli.history)));
            println!("{}", watermarker.suggest_bit_depth(size));
        }
    }

    Ok(())
}
