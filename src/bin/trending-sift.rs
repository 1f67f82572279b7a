use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use trending_sift::config::SiftConfig;
use trending_sift::constants::{DEFAULT_CONFIG_FILE, DEFAULT_INPUT_FILES};
use trending_sift::language::WhatlangClassifier;
use trending_sift::pipeline::run_pipeline;
use trending_sift::utils::{discover_csv_files, format_duration, setup_logging};
use trending_sift::youtube::YouTubeClient;

#[derive(Parser)]
#[command(name = "trending-sift")]
#[command(about = "📺 Trending Sift: deduplicate and enrich YouTube trending exports ✨")]
#[command(version)]
struct Args {
    #[arg(help = "Trending CSV files, read in the order given")]
    inputs: Vec<PathBuf>,

    #[arg(long, help = "Directory whose CSV files are added to the inputs")]
    input_dir: Option<PathBuf>,

    #[arg(short, long, help = "Output directory for the two deduplicated files")]
    output: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, help = "Configuration file")]
    config: PathBuf,

    #[arg(long, help = "Channel cache file")]
    cache: Option<PathBuf>,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let api_key = SiftConfig::api_key_from_env()?;

    let mut config = if args.config.exists() {
        SiftConfig::from_file(&args.config)?
    } else {
        println!("📄 Config file not found, creating default: {}", args.config.display());
        let default_config = SiftConfig::default();
        default_config.to_file(&args.config)?;
        default_config
    };

    if args.verbose {
        config.verbose = true;
    }
    if let Some(output) = args.output {
        config.output_directory = output;
    }
    if let Some(cache) = args.cache {
        config.cache_file = cache;
    }

    setup_logging(if config.verbose { "verbose" } else { "normal" })?;

    let mut input_files = args.inputs;
    if let Some(input_dir) = &args.input_dir {
        let discovered = discover_csv_files(input_dir)?;
        if discovered.is_empty() {
            return Err(anyhow::anyhow!("No CSV files found in: {}", input_dir.display()));
        }
        input_files.extend(discovered);
    }
    if input_files.is_empty() {
        input_files = DEFAULT_INPUT_FILES.iter().map(PathBuf::from).collect();
    }

    println!("📺 Trending Sift is tuning in...");
    for input in &input_files {
        println!("🔍 Input: {}", input.display());
    }
    println!("💾 Channel cache: {}", config.cache_file.display());
    println!("📝 Output directory: {}", config.output_directory.display());

    let client = YouTubeClient::new(config.api_base_url.clone(), api_key, config.request_timeout())?;
    let summary = run_pipeline(&config, &input_files, client, WhatlangClassifier).await?;

    let ingest = &summary.ingest;
    let resolver = &summary.resolver;

    println!("\n🎉 Processing completed successfully! 🎉");
    println!("=======================================");
    println!("📁 Files processed: {} ({} skipped)", ingest.files_processed, ingest.files_skipped);
    println!("📊 Rows processed: {}", ingest.rows_processed);
    if ingest.rows_discarded > 0 {
        println!("⚠️ Rows discarded with failed files: {}", ingest.rows_discarded);
    }
    if ingest.nul_bytes_stripped > 0 {
        println!("🧽 NUL bytes stripped: {}", ingest.nul_bytes_stripped);
    }
    println!("✨ Unique videos: {}", summary.rows_by_video_id);
    println!("📅 Unique video/date pairs: {}", summary.rows_by_video_and_date);
    println!(
        "📡 Channel lookups: {} network, {} cached ({} not found, {} errors)",
        resolver.network_calls, resolver.cache_hits, resolver.not_found, resolver.errors
    );
    if resolver.backoff_waits > 0 {
        println!(
            "⏳ Backoff: {} waits, {}",
            resolver.backoff_waits,
            format_duration(resolver.total_backoff.as_secs_f64())
        );
    }
    println!("💾 Channels cached: {}", summary.cached_channels);
    println!("⏱️ Total time: {}", format_duration(summary.elapsed_seconds));
    println!("📜 Output written to: {}", summary.output_by_video_id.display());
    println!("📜 Output written to: {}", summary.output_by_video_and_date.display());

    Ok(())
}
