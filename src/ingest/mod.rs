pub mod reader;


pub use reader::NulStrippingReader;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::cache::ChannelCache;
use crate::config::SiftConfig;
use crate::constants::{DEFAULT_CHUNK_SIZE, FIELD_COUNTRY, IO_BUFFER_SIZE_BYTES, UNKNOWN_COUNTRY};
use crate::language::LanguageClassifier;
use crate::processor::{ProcessedRow, RowProcessor, SeenKeys};
use crate::record::Row;
use crate::youtube::ChannelLookup;

#[derive(Debug, Default, Clone, Serialize)]
pub struct IngestStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub rows_read: usize,
    pub rows_processed: usize,
    pub rows_discarded: usize,
    pub chunks_processed: usize,
    pub nul_bytes_stripped: u64,
    pub unique_video_ids: usize,
    pub unique_video_dates: usize,
    pub processing_time_seconds: f64,
}

/// Both deduplicated result sequences plus the source columns they carry.
#[derive(Debug, Default, Clone)]
pub struct IngestOutput {
    pub by_video_id: Vec<Row>,
    pub by_video_and_date: Vec<Row>,
    /// Union of every source header, in first-seen order.
    pub source_fields: Vec<String>,
    pub stats: IngestStats,
}

impl IngestOutput {
    fn push(&mut self, processed: ProcessedRow) {
        if let Some(row) = processed.by_video_id {
            self.by_video_id.push(row);
        }
        if let Some(row) = processed.by_video_and_date {
            self.by_video_and_date.push(row);
        }
    }

    fn add_source_fields(&mut self, headers: &[String]) {
        for name in headers {
            if !self.source_fields.contains(name) {
                self.source_fields.push(name.clone());
            }
        }
    }
}

enum FileOutcome {
    Completed,
    Skipped,
}

/// Country whose prefix starts the file's base name, else `"unknown"`.
pub fn country_from_filename(path: &Path, countries: &[String]) -> String {
    let base_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    countries
        .iter()
        .find(|country| base_name.starts_with(country.as_str()))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}

/// Streams input files in order, batching rows into fixed-size chunks.
///
/// The channel cache is checkpointed after every full chunk so a killed run
/// loses at most one chunk of lookups.
pub struct ChunkedIngester {
    chunk_size: usize,
    countries: Vec<String>,
}

impl ChunkedIngester {
    pub fn new(chunk_size: usize, countries: Vec<String>) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            countries,
        }
    }

    pub fn from_config(config: &SiftConfig) -> Self {
        Self::new(config.chunk_size, config.countries.clone())
    }

    pub async fn ingest<L, C>(
        &self,
        input_files: &[PathBuf],
        processor: &mut RowProcessor<L, C>,
        cache: &mut ChannelCache,
    ) -> Result<IngestOutput>
    where
        L: ChannelLookup,
        C: LanguageClassifier,
    {
        let start_time = Instant::now();
        let mut output = IngestOutput::default();
        let mut seen = SeenKeys::new();

        for (file_index, file_path) in input_files.iter().enumerate() {
            info!("Processing file {}/{}: {}", file_index + 1, input_files.len(), file_path.display());

            match self.ingest_file(file_path, processor, cache, &mut seen, &mut output).await? {
                FileOutcome::Completed => output.stats.files_processed += 1,
                FileOutcome::Skipped => output.stats.files_skipped += 1,
            }
        }

        output.stats.unique_video_ids = seen.video_id_count();
        output.stats.unique_video_dates = seen.video_date_count();
        output.stats.processing_time_seconds = start_time.elapsed().as_secs_f64();
        Ok(output)
    }

    /// Local file problems skip the file; anything else is returned as an error.
    async fn ingest_file<L, C>(
        &self,
        file_path: &Path,
        processor: &mut RowProcessor<L, C>,
        cache: &mut ChannelCache,
        seen: &mut SeenKeys,
        output: &mut IngestOutput,
    ) -> Result<FileOutcome>
    where
        L: ChannelLookup,
        C: LanguageClassifier,
    {
        let country = country_from_filename(file_path, &self.countries);
        let source: Arc<str> = Arc::from(file_path.display().to_string());
        debug!("Tagging rows from {} with country {}", source, country);

        let file = match File::open(file_path) {
            Ok(file) => file,
            Err(e) => {
                error!("Error processing file {}. Error: {}", file_path.display(), e);
                return Ok(FileOutcome::Skipped);
            }
        };

        let reader = NulStrippingReader::new(BufReader::with_capacity(IO_BUFFER_SIZE_BYTES, file));
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers_result = csv_reader.headers().map(|headers| {
            headers
                .iter()
                .enumerate()
                .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
                .map(str::to_string)
                .collect::<Vec<String>>()
        });
        let headers = match headers_result {
            Ok(headers) => headers,
            Err(e) => {
                error!("Error processing file {}. Error: {}", file_path.display(), e);
                output.stats.nul_bytes_stripped += csv_reader.get_ref().stripped();
                return Ok(FileOutcome::Skipped);
            }
        };
        output.add_source_fields(&headers);

        let mut chunk: Vec<Row> = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));
        let mut record = csv::StringRecord::new();
        let mut line_number = 1;

        loop {
            match csv_reader.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    line_number = record.position().map(|p| p.line() as usize).unwrap_or(line_number + 1);

                    let mut row = Row::from_record(
                        headers.iter().map(String::as_str),
                        record.iter(),
                        source.clone(),
                        line_number,
                    );
                    row.set(FIELD_COUNTRY, country.as_str());
                    chunk.push(row);
                    output.stats.rows_read += 1;

                    if chunk.len() == self.chunk_size {
                        let chunk_start = Instant::now();
                        let processed = chunk.len();
                        self.process_chunk(&mut chunk, processor, cache, seen, output).await?;
                        output.stats.chunks_processed += 1;
                        cache.save()?;

                        info!(
                            "Processed {} rows ({}) in {:.2} seconds.",
                            processed,
                            output.stats.rows_processed,
                            chunk_start.elapsed().as_secs_f64()
                        );
                    }
                }
                Err(e) => {
                    error!("Error processing file {}. Error: {}", file_path.display(), e);
                    output.stats.rows_discarded += chunk.len();
                    output.stats.nul_bytes_stripped += csv_reader.get_ref().stripped();
                    return Ok(FileOutcome::Skipped);
                }
            }
        }

        self.process_chunk(&mut chunk, processor, cache, seen, output).await?;
        output.stats.nul_bytes_stripped += csv_reader.get_ref().stripped();

        Ok(FileOutcome::Completed)
    }

    async fn process_chunk<L, C>(
        &self,
        chunk: &mut Vec<Row>,
        processor: &mut RowProcessor<L, C>,
        cache: &mut ChannelCache,
        seen: &mut SeenKeys,
        output: &mut IngestOutput,
    ) -> Result<()>
    where
        L: ChannelLookup,
        C: LanguageClassifier,
    {
        for row in chunk.drain(..) {
            let processed = processor.process(row, seen, cache).await?;
            output.push(processed);
            output.stats.rows_processed += 1;
        }
        Ok(())
    }
}
