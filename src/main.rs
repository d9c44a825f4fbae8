use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use docstruct::{export::export, load_document, Config, ExportFormat};

#[derive(Parser)]
#[command(name = "docstruct")]
#[command(version)]
#[command(about = "Parse .docx documents into sections, tables and figures", long_about = None)]
struct Cli {
    /// Input .docx file
    #[arg(value_name = "FILE", required_unless_present = "init_config")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Normalize whitespace and punctuation before parsing
    #[arg(long)]
    clean: bool,

    /// Directory that image targets are resolved against
    #[arg(long, value_name = "DIR")]
    media_dir: Option<PathBuf>,

    /// Keep images whose target file is missing
    #[arg(long)]
    no_verify_images: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        Config::init_default().context("Failed to write default config")?;
        match Config::get_config_path() {
            Some(path) => println!("Wrote default config to {}", path.display()),
            None => bail!("No config directory available on this platform"),
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    init_logging(cli.verbose, config.log_level.as_deref());

    let mut options = config.parse_options();
    if cli.clean {
        options.clean = true;
    }
    if cli.media_dir.is_some() {
        options.media_dir = cli.media_dir.clone();
    }
    if cli.no_verify_images {
        options.verify_image_targets = false;
    }

    let Some(file) = &cli.file else {
        bail!("No input file given");
    };

    let document = load_document(file, &options)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    print!("{}", export(&document, &cli.format)?);
    Ok(())
}

/// `-v` wins over `RUST_LOG`, which wins over the config file
fn init_logging(verbose: u8, config_level: Option<&str>) {
    let mut builder = match verbose {
        0 => {
            let fallback = config_level.unwrap_or("warn");
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(fallback))
        }
        level => {
            let filter = match level {
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            };
            let mut builder = env_logger::Builder::new();
            builder.filter_level(filter);
            builder
        }
    };

    builder.target(env_logger::Target::Stderr).init();
}
