//! textpart: convert binary files to fingerprinted ASCII part files and back
//!
//! Commands:
//!   b2a --input <file>   - encode a file into `{stem}-{i}-{n}.part` files
//!   a2b --output <file>  - reassemble the series found under --dir
//!   config show          - display the effective configuration

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use textpart_core::config::TextpartConfig;
use textpart_parts::{decode_dir, encode_file, DecodeOptions, EncodeOptions, ProgressFn};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "textpart",
    version,
    about = "Split binary files into ASCII part files and reassemble them",
    long_about = "textpart: base64-encode a file into size-bounded, fingerprinted text parts \
                  (b2a) and rebuild the original bytes from a directory of parts (a2b)"
)]
struct Cli {
    /// Path to textpart.toml configuration file
    #[arg(long, short = 'c', env = "TEXTPART_CONFIG", default_value = "textpart.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TEXTPART_LOG", default_value = "warn")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "TEXTPART_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a binary file into a series of text part files
    B2a {
        /// The input file
        #[arg(long)]
        input: PathBuf,
        /// Output directory (default: [parts] dir from config, ".")
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Part filename stem (default: [parts] stem from config, "part")
        #[arg(long)]
        stem: Option<String>,
        /// Maximum number of characters per part file (default: 1024)
        #[arg(long)]
        max_char: Option<usize>,
    },

    /// Convert a series of text part files back into the binary file
    A2b {
        /// Directory searched recursively for parts (default: ".")
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Part filename stem (default: "part")
        #[arg(long)]
        stem: Option<String>,
        /// The output file
        #[arg(long)]
        output: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_logging(&cli.log, &cli.log_format);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    dispatch(cli.command, &config, &cli.config)
}

fn dispatch(command: Commands, config: &TextpartConfig, config_path: &Path) -> Result<()> {
    match command {
        Commands::B2a {
            input,
            dir,
            stem,
            max_char,
        } => {
            let opts = EncodeOptions {
                input,
                output_dir: dir.unwrap_or_else(|| config.parts.dir.clone()),
                stem: stem.unwrap_or_else(|| config.parts.stem.clone()),
                max_char: max_char.unwrap_or(config.parts.max_char),
            };
            cmd_b2a(config, &opts)
        }
        Commands::A2b { dir, stem, output } => {
            let opts = DecodeOptions {
                input_dir: dir.unwrap_or_else(|| config.parts.dir.clone()),
                stem: stem.unwrap_or_else(|| config.parts.stem.clone()),
                output,
            };
            cmd_a2b(config, &opts)
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(config, config_path),
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<TextpartConfig> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))?
    } else {
        tracing::debug!(
            "config file not found: {}  (using defaults)",
            path.display()
        );
        TextpartConfig::default()
    };
    config
        .validate()
        .with_context(|| format!("validating config: {}", path.display()))?;
    Ok(config)
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output; logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

// ── Progress bar helpers ──────────────────────────────────────────────────────

fn make_progress_bar(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_prefix(prefix.to_string());
    pb
}

// ── `textpart b2a` ────────────────────────────────────────────────────────────

fn cmd_b2a(config: &TextpartConfig, opts: &EncodeOptions) -> Result<()> {
    let pb = make_progress_bar("b2a");
    let bar = pb.clone();
    let progress: ProgressFn = Box::new(move |done, total, path| {
        bar.set_length(total);
        bar.set_position(done);
        if let Some(name) = path.file_name() {
            bar.set_message(name.to_string_lossy().into_owned());
        }
    });

    let result = encode_file(opts, &config.format, Some(&progress))
        .with_context(|| format!("encoding {}", opts.input.display()))?;
    pb.finish_and_clear();

    println!("Count: {}", result.parts);
    Ok(())
}

// ── `textpart a2b` ────────────────────────────────────────────────────────────

fn cmd_a2b(config: &TextpartConfig, opts: &DecodeOptions) -> Result<()> {
    let progress: ProgressFn = Box::new(|_done, _total, path| {
        println!("{}", path.display());
    });

    let result = decode_dir(opts, &config.format, Some(&progress)).with_context(|| {
        format!(
            "decoding series \"{}\" from {}",
            opts.stem,
            opts.input_dir.display()
        )
    })?;

    tracing::info!(
        parts = result.parts,
        bytes = result.bytes,
        output = %opts.output.display(),
        "restored"
    );
    Ok(())
}

// ── `textpart config show` ────────────────────────────────────────────────────

fn cmd_config_show(config: &TextpartConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config")?;
    print!("{rendered}");
    Ok(())
}
