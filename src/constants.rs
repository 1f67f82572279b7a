pub const DEFAULT_CHUNK_SIZE: usize = 40_000;
pub const MIN_CHUNK_SIZE: usize = 1;
pub const MAX_CHUNK_SIZE: usize = 10_000_000;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const MIN_MAX_ATTEMPTS: u32 = 1;
pub const MAX_MAX_ATTEMPTS: u32 = 20;
pub const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 5;
pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 320;
pub const DEFAULT_MAX_JITTER_MS: u64 = 1000;
pub const BACKOFF_MULTIPLIER: u32 = 2;

pub const HTTP_STATUS_QUOTA_EXCEEDED: u16 = 403;
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

pub const API_KEY_ENV_VAR: &str = "YOUTUBE_API_KEY";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("trending-sift/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_COUNTRIES: &[&str] = &["US", "CA"];
pub const UNKNOWN_COUNTRY: &str = "unknown";
pub const UNKNOWN_LANGUAGE: &str = "unknown";

pub const SENTINEL_CHANNEL_NOT_FOUND: &str = "Channel Not Found";
pub const SENTINEL_ERROR: &str = "Error";
pub const SENTINEL_ERROR_STATUS_PREFIX: &str = "Error: ";

pub const FIELD_VIDEO_ID: &str = "video_id";
pub const FIELD_TRENDING_DATE: &str = "trending_date";
pub const FIELD_CHANNEL_ID: &str = "channelId";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_SUBSCRIBERS: &str = "subscribers";
pub const FIELD_COUNTRY: &str = "country";
pub const FIELD_LANGUAGE: &str = "language";
pub const FIELD_CLEAN_TITLE: &str = "clean_title";

/// Columns appended to every output, in this order.
pub const ENRICHED_FIELDS: &[&str] = &[
    FIELD_SUBSCRIBERS,
    FIELD_COUNTRY,
    FIELD_LANGUAGE,
    FIELD_CLEAN_TITLE,
];

pub const COMPOSITE_KEY_SEPARATOR: char = '_';

pub const DEFAULT_CACHE_FILE: &str = "channel_data.json";
pub const DEFAULT_OUTPUT_DIRECTORY: &str = ".";
pub const DEFAULT_OUTPUT_BY_VIDEO_ID: &str = "combined_no_duplicate_video_id.csv";
pub const DEFAULT_OUTPUT_BY_VIDEO_AND_DATE: &str = "combined_no_duplicate_video_id_and_date.csv";
pub const DEFAULT_CONFIG_FILE: &str = "trending_sift_config.json";
pub const CACHE_TEMP_SUFFIX: &str = "tmp";

pub const CSV_EXTENSION: &str = "csv";
pub const IO_BUFFER_SIZE_BYTES: usize = 64 * 1024;

pub const DEFAULT_INPUT_FILES: &[&str] = &[
    "./Data/US_youtube_trending_data.csv",
    "./Data/CA_youtube_trending_data.csv",
];
