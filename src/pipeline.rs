use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::cache::ChannelCache;
use crate::config::SiftConfig;
use crate::ingest::{ChunkedIngester, IngestStats};
use crate::language::LanguageClassifier;
use crate::output::{output_fieldnames, write_rows};
use crate::processor::RowProcessor;
use crate::resolver::{BackoffPolicy, ResolverStats, SubscriberResolver};
use crate::youtube::ChannelLookup;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ingest: IngestStats,
    pub resolver: ResolverStats,
    pub rows_by_video_id: usize,
    pub rows_by_video_and_date: usize,
    pub output_by_video_id: PathBuf,
    pub output_by_video_and_date: PathBuf,
    pub cached_channels: usize,
    pub elapsed_seconds: f64,
}

/// Runs one full enrichment pass over `input_files`.
///
/// The cache is loaded (or started empty), written back straight away so the
/// file exists, checkpointed by the ingester after every full chunk and saved
/// once more before the two outputs are written.
pub async fn run_pipeline<L, C>(
    config: &SiftConfig,
    input_files: &[PathBuf],
    lookup: L,
    classifier: C,
) -> Result<RunSummary>
where
    L: ChannelLookup,
    C: LanguageClassifier,
{
    let start_time = Instant::now();
    config.validate()?;

    let mut cache = ChannelCache::load(&config.cache_file);
    info!("Loaded {} cached channels from {}", cache.len(), cache.path().display());
    cache.save()?;

    let resolver = SubscriberResolver::new(lookup, BackoffPolicy::from_config(config));
    let mut processor = RowProcessor::new(resolver, classifier);
    let ingester = ChunkedIngester::from_config(config);

    let output = ingester.ingest(input_files, &mut processor, &mut cache).await?;
    cache.save()?;

    let fieldnames = output_fieldnames(&output.source_fields);
    let output_by_video_id = config.output_by_video_id_path();
    let output_by_video_and_date = config.output_by_video_and_date_path();
    let rows_by_video_id = write_rows(&output_by_video_id, &output.by_video_id, &fieldnames)?;
    let rows_by_video_and_date = write_rows(&output_by_video_and_date, &output.by_video_and_date, &fieldnames)?;

    Ok(RunSummary {
        ingest: output.stats,
        resolver: processor.resolver_stats().clone(),
        rows_by_video_id,
        rows_by_video_and_date,
        output_by_video_id,
        output_by_video_and_date,
        cached_channels: cache.len(),
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}
