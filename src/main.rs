//! cropdoc command-line front end.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cropdoc::config::{init_tracing, AppConfig};
use cropdoc::scaffold::write_scaffold;
use cropdoc::{DenseEngineFactory, DiagnosisService, DirAssets};

/// On-device crop disease identification
#[derive(Parser, Debug)]
#[command(name = "cropdoc")]
#[command(version)]
#[command(about = "Identify crop diseases from leaf photos and print treatment advice")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one image and print the diagnosis as JSON
    Classify {
        /// Asset directory (defaults to CROPDOC_ASSET_DIR or ./assets)
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Crop id: corn (or maize), potato, rice, tomato
        #[arg(long, default_value = "tomato")]
        crop: String,

        /// Advisory language: en, hi, te
        #[arg(long, default_value = "en")]
        lang: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Leaf photo (PNG, JPEG, BMP or GIF)
        image: PathBuf,
    },

    /// Write untrained models and label files for every crop
    Scaffold {
        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Hidden layer width
        #[arg(long, default_value_t = 8)]
        hidden: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_tracing(if cli.verbose { "debug" } else { config.log_filter.as_str() });

    match cli.command {
        Command::Classify { assets, crop, lang, pretty, image } => {
            let dir = assets.unwrap_or(config.asset_dir);
            classify(&dir, &crop, &lang, &image, pretty)
        }
        Command::Scaffold { out, hidden } => scaffold(&out, hidden),
    }
}

fn classify(dir: &Path, crop: &str, lang: &str, image: &Path, pretty: bool) -> Result<()> {
    let bytes = fs::read(image).with_context(|| format!("reading {}", image.display()))?;
    let service = DiagnosisService::from_assets(Arc::new(DirAssets::new(dir)), Arc::new(DenseEngineFactory));

    let response = service.diagnose(&bytes, crop, lang);
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);

    if !response.is_success() {
        std::process::exit(2);
    }
    Ok(())
}

fn scaffold(out: &Path, hidden: usize) -> Result<()> {
    write_scaffold(out, hidden).with_context(|| format!("writing scaffold to {}", out.display()))
}
