//! Command-line interface for smsdict-rs
//!
//! Usage:
//!   smsdict build [INPUT] [OUTPUT]
//!   smsdict filter [INPUT] [OUTPUT] --mode outgoing
//!   smsdict pack [INPUT]
//!   smsdict unpack <ZIP> [OUTPUT]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
#[cfg(feature = "archive")]
use smsdict_rs::archive;
use smsdict_rs::{filter_file, BuildReport, DictionaryBuilder, DictionaryConfig, FilterMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "smsdict", version, about = "Build a GBoard personal dictionary from an SMS backup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a dictionary from outgoing messages
    Build(BuildArgs),
    /// Write a copy of a backup keeping only some messages
    Filter {
        #[arg(default_value = "data/sms.xml")]
        input: PathBuf,
        #[arg(default_value = "filtered_sms.xml")]
        output: PathBuf,
        /// contacts | outgoing
        #[arg(short, long, default_value = "contacts")]
        mode: FilterMode,
    },
    /// Zip a dictionary for import
    Pack {
        #[arg(default_value = "output/personal_dictionary.txt")]
        input: PathBuf,
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// Extract the dictionary from a zip archive
    Unpack {
        zip: PathBuf,
        #[arg(default_value = "output/extracted_dictionary.txt")]
        output: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct BuildArgs {
    /// SMS backup XML
    #[arg(default_value = "data/filtered_sms.xml")]
    input: PathBuf,
    /// Dictionary file (default: output/personal_dictionary_<timestamp>.txt)
    output: Option<PathBuf>,
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Minimum count for single words
    #[arg(long)]
    unigram_threshold: Option<u64>,
    /// Minimum count for word pairs
    #[arg(long)]
    bigram_threshold: Option<u64>,
    /// Minimum word length in characters
    #[arg(long)]
    min_word_length: Option<usize>,
    /// Leave out the trailing statistics block
    #[arg(long)]
    no_stats: bool,
    /// Print the run report as JSON
    #[arg(short, long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => build(args),
        Command::Filter { input, output, mode } => {
            let summary = filter_file(&input, &output, mode)
                .with_context(|| format!("failed to filter {}", input.display()))?;
            println!(
                "Filtered XML has been written to {} with {} SMS entries.",
                output.display(),
                summary.kept
            );
            Ok(())
        }
        Command::Pack { input, output_dir } => pack(&input, &output_dir),
        Command::Unpack { zip, output } => unpack(&zip, &output),
    }
}

#[cfg(feature = "archive")]
fn pack(input: &Path, output_dir: &Path) -> Result<()> {
    let stem = archive::archive_stem(chrono::Utc::now());
    let zip = archive::pack_dictionary(input, output_dir, &stem)
        .with_context(|| format!("failed to pack {}", input.display()))?;
    println!("Dictionary packaged successfully: {}", zip.display());
    Ok(())
}

#[cfg(feature = "archive")]
fn unpack(zip: &Path, output: &Path) -> Result<()> {
    println!("Extracting dictionary from: {}", zip.display());
    archive::unpack_dictionary(zip, output)
        .with_context(|| format!("failed to extract {}", zip.display()))?;
    println!("Dictionary extracted successfully: {}", output.display());
    Ok(())
}

#[cfg(not(feature = "archive"))]
fn pack(_input: &Path, _output_dir: &Path) -> Result<()> {
    anyhow::bail!("smsdict was built without the \"archive\" feature")
}

#[cfg(not(feature = "archive"))]
fn unpack(_zip: &Path, _output: &Path) -> Result<()> {
    anyhow::bail!("smsdict was built without the \"archive\" feature")
}

fn build(args: BuildArgs) -> Result<()> {
    let mut config = DictionaryConfig::load(args.config.as_deref())?;
    if let Some(value) = args.unigram_threshold {
        config.unigram_threshold = value;
    }
    if let Some(value) = args.bigram_threshold {
        config.bigram_threshold = value;
    }
    if let Some(value) = args.min_word_length {
        config.min_word_length = value;
    }
    if args.no_stats {
        config.include_statistics = false;
    }
    info!(
        unigram_threshold = config.unigram_threshold,
        bigram_threshold = config.bigram_threshold,
        min_word_length = config.min_word_length,
        "loaded smsdict config"
    );

    let output = args.output.unwrap_or_else(default_output_path);
    let builder = DictionaryBuilder::new(&config);
    let statistics = builder
        .build_file(&args.input, &output)
        .with_context(|| format!("failed to build dictionary from {}", args.input.display()))?;

    if args.json {
        let report = BuildReport {
            output: output.display().to_string(),
            statistics,
            thresholds: config.thresholds(),
            min_word_length: config.min_word_length,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Personal dictionary has been created: {}", output.display());
    }
    Ok(())
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S");
    PathBuf::from("output").join(format!("personal_dictionary_{}.txt", stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_is_timestamped() {
        let path = default_output_path();
        assert_eq!(path.parent(), Some(Path::new("output")));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("personal_dictionary_20"));
        assert!(name.ends_with(".txt"));
        assert_ne!(name, "personal_dictionary.txt");
    }
}
