use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use partx_core::TableRules;
use partx_embed::{EmbeddingCache, OpenAiProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
use partx_pipeline::{parse_table, write_csv, MatchConfig};

/// Match parts across two catalogues by semantic description similarity
#[derive(Parser, Debug)]
#[command(name = "partx")]
#[command(about = "Semantic part-catalogue matcher", long_about = None)]
struct Args {
    /// Left-side catalogue file (delimited text)
    #[arg(long)]
    catalogue: PathBuf,

    /// Right-side reference file (delimited text)
    #[arg(long)]
    reference: PathBuf,

    /// JSON match configuration; omit to use the stock column layout
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Similarity threshold override, in [0, 1]
    #[arg(long)]
    threshold: Option<f32>,

    /// Maximum matches per catalogue record override
    #[arg(long)]
    top_n: Option<usize>,

    /// Output file for the result CSV (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Embedding API key; falls back to the OPENAI_API_KEY environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// Embedding API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Embedding model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Column layout of the stock catalogue/adtrans exports: the catalogue sheet
/// buries its header in row 2 with data from row 4, the reference sheet is
/// plain, and bin locations join by part number
fn stock_config() -> MatchConfig {
    MatchConfig::new(
        TableRules::new("CPProductNumber", "CPDescription").with_offsets(2, 4),
        TableRules::new("Part #", "Description"),
    )
    .with_aux("Part #", "Location #")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting PartX v{}", env!("CARGO_PKG_VERSION"));

    let api_key = args
        .api_key
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .context("no API key: pass --api-key or set OPENAI_API_KEY")?;

    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => stock_config(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }

    let catalogue = parse_table(
        &fs::read_to_string(&args.catalogue)
            .with_context(|| format!("failed to read {}", args.catalogue.display()))?,
    )?;
    let reference = parse_table(
        &fs::read_to_string(&args.reference)
            .with_context(|| format!("failed to read {}", args.reference.display()))?,
    )?;
    info!(
        catalogue_rows = catalogue.row_count(),
        reference_rows = reference.row_count(),
        "input tables loaded"
    );

    let provider = OpenAiProvider::new(&api_key, &args.base_url, &args.model)?;
    let cache = EmbeddingCache::new();

    let rows = partx_pipeline::run(&provider, &cache, &catalogue, &reference, &config).await?;
    info!("Found {} matches", rows.len());

    let csv = write_csv(&rows);
    match &args.output {
        Some(path) => {
            fs::write(path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Results written to {}", path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}
