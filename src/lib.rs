// Channel subscriber cache and its stored values
pub mod cache;

// Runtime configuration and the constants behind its defaults
pub mod config;
pub mod constants;

pub mod error;

// Input side: chunked CSV reading and per-row enrichment
pub mod ingest;
pub mod processor;
pub mod record;

// Enrichment sources
pub mod language;
pub mod resolver;
pub mod title;
pub mod youtube;

pub mod output;
pub mod pipeline;
pub mod utils;

// Re-export main types for convenience
pub use cache::{ChannelCache, SubscriberCount};
pub use config::SiftConfig;
pub use error::{ClassifyError, LookupError, SiftError};
pub use ingest::{ChunkedIngester, IngestOutput, IngestStats};
pub use language::{LanguageClassifier, WhatlangClassifier};
pub use pipeline::{run_pipeline, RunSummary};
pub use processor::{ProcessedRow, RowProcessor, SeenKeys};
pub use record::Row;
pub use resolver::{BackoffPolicy, ResolverStats, SubscriberResolver};
pub use youtube::{ChannelLookup, YouTubeClient};
