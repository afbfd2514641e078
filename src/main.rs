//! `marc2eprints` command line tool.
//!
//! Converts one MARCXML file into an EPrints import XML file, written next to
//! the input as `<stem>_eprints.xml` unless `--output` says otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use marc2eprints::{
    convert_file, default_output_path, AbstractJoin, ConversionConfig, DocumentProfile,
    KeywordShape,
};

#[derive(Parser, Debug)]
#[command(
    name = "marc2eprints",
    version,
    about = "Convert MARCXML records into EPrints import XML"
)]
struct Cli {
    /// MARCXML file to convert
    input: PathBuf,

    /// Output file [default: <input dir>/<input stem>_eprints.xml]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rule profile: article or thesis
    #[arg(long)]
    profile: Option<DocumentProfile>,

    /// JSON configuration file; command line options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// How repeated abstracts are joined: comma or sentence
    #[arg(long)]
    abstract_join: Option<AbstractJoin>,

    /// Write keywords as subject items instead of one keywords element
    #[arg(long, default_value_t = false)]
    subjects_as_items: bool,

    /// Subfield code of 787 holding the official URL
    #[arg(long)]
    url_code: Option<char>,

    /// Thesis type used when a thesis record names none
    #[arg(long)]
    default_thesis_type: Option<String>,

    /// Assemble records in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "conversion failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let report = convert_file(&cli.input, &output, &config)
        .with_context(|| format!("converting {}", cli.input.display()))?;

    if report.recovered > 0 {
        info!(
            recovered = report.recovered,
            "some malformed fields were omitted"
        );
    }
    println!("{}", output.display());
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut config = match &cli.config {
        Some(path) => ConversionConfig::from_json_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => ConversionConfig::default(),
    };

    if let Some(profile) = cli.profile {
        config.profile = profile;
    }
    if let Some(join) = cli.abstract_join {
        config.abstract_join = join;
    }
    if cli.subjects_as_items {
        config.keyword_shape = KeywordShape::SubjectItems;
    }
    if let Some(code) = cli.url_code {
        config.url_subfield = code;
    }
    if let Some(thesis_type) = &cli.default_thesis_type {
        config.default_thesis_type.clone_from(thesis_type);
    }
    if cli.parallel {
        config.parallel = true;
    }

    config.validate().context("invalid options")?;
    Ok(config)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
