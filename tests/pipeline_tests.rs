use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use trending_sift::{
    run_pipeline, ChannelCache, ChannelLookup, ClassifyError, LanguageClassifier, LookupError,
    SiftConfig, SubscriberCount,
};

/// Lookup backed by a fixed map, with optional per-channel HTTP failures.
#[derive(Clone)]
struct MockLookup {
    counts: HashMap<String, u64>,
    failing: HashMap<String, u16>,
    calls: Arc<AtomicUsize>,
}

impl MockLookup {
    fn new(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: counts.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            failing: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing_with(mut self, channel_id: &str, status: u16) -> Self {
        self.failing.insert(channel_id.to_string(), status);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelLookup for MockLookup {
    async fn lookup_subscribers(&self, channel_id: &str) -> Result<Option<u64>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.failing.get(channel_id) {
            return Err(LookupError::Http {
                status: *status,
                message: "mock failure".to_string(),
            });
        }
        Ok(self.counts.get(channel_id).copied())
    }
}

/// Tags any non-blank title as English.
struct NonBlankIsEnglish;

impl LanguageClassifier for NonBlankIsEnglish {
    fn detect(&self, text: &str) -> Result<String, ClassifyError> {
        if text.trim().is_empty() {
            return Err(ClassifyError::Undetermined);
        }
        Ok("en".to_string())
    }
}

/// Helper function to create the country input files
fn create_test_data(temp_dir: &TempDir) -> Result<Vec<PathBuf>> {
    let data_dir = temp_dir.path().join("Data");
    fs::create_dir_all(&data_dir)?;

    let us = data_dir.join("US_youtube_trending_data.csv");
    fs::write(
        &us,
        "video_id,title,trending_date,channelId,view_count\n\
         a1,Cooking show https://example.com/x,2024-01-01,UC_cook,100\n\
         a2,\"Music, live\",2024-01-01,UC_music,200\n\
         a1,Cooking show https://example.com/x,2024-01-02,UC_cook,150\n",
    )?;

    let ca = data_dir.join("CA_youtube_trending_data.csv");
    fs::write(
        &ca,
        "video_id,title,trending_date,channelId,view_count\n\
         a2,\"Music, live\",2024-01-01,UC_music,210\n\
         b1,Hockey 🏒,2024-01-01,UC_gone,5\n",
    )?;

    Ok(vec![us, ca])
}

fn create_test_config(temp_dir: &TempDir) -> SiftConfig {
    SiftConfig {
        cache_file: temp_dir.path().join("channel_data.json"),
        output_directory: temp_dir.path().join("out"),
        chunk_size: 2,
        ..SiftConfig::default()
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_end_to_end_enrichment() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let inputs = create_test_data(&temp_dir)?;
    let config = create_test_config(&temp_dir);
    let lookup = MockLookup::new(&[("UC_cook", 1500), ("UC_music", 99)]);

    let summary = run_pipeline(&config, &inputs, lookup.clone(), NonBlankIsEnglish).await?;

    assert_eq!(summary.ingest.files_processed, 2);
    assert_eq!(summary.ingest.rows_processed, 5);
    assert_eq!(summary.ingest.chunks_processed, 2);
    assert_eq!(lookup.calls(), 3);

    let by_id = read_lines(&summary.output_by_video_id);
    assert_eq!(
        by_id,
        vec![
            "video_id,title,trending_date,channelId,view_count,subscribers,country,language,clean_title",
            "a1,Cooking show https://example.com/x,2024-01-01,UC_cook,100,1500,US,en,Cooking show ",
            "a2,\"Music, live\",2024-01-01,UC_music,200,99,US,en,\"Music, live\"",
            "b1,Hockey 🏒,2024-01-01,UC_gone,5,Channel Not Found,CA,en,Hockey ",
        ]
    );

    let by_date = read_lines(&summary.output_by_video_and_date);
    assert_eq!(by_date.len(), 5);
    assert!(by_date[3].starts_with("a1,Cooking show https://example.com/x,2024-01-02,"));
    // The CA copy of a2 shares a video id and date with the US copy.
    assert!(!by_date.iter().any(|line| line.contains(",210,")));

    let cache = ChannelCache::load(&config.cache_file);
    assert_eq!(cache.get("UC_cook"), Some(&SubscriberCount::Count(1500)));
    assert_eq!(cache.get("UC_gone"), Some(&SubscriberCount::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_warm_cache_rerun_is_offline_and_identical() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let inputs = create_test_data(&temp_dir)?;
    let config = create_test_config(&temp_dir);

    let first = run_pipeline(&config, &inputs, MockLookup::new(&[("UC_cook", 1), ("UC_music", 2)]), NonBlankIsEnglish).await?;
    let first_by_id = fs::read_to_string(&first.output_by_video_id)?;
    let first_by_date = fs::read_to_string(&first.output_by_video_and_date)?;

    let offline = MockLookup::new(&[]);
    let second = run_pipeline(&config, &inputs, offline.clone(), NonBlankIsEnglish).await?;

    assert_eq!(offline.calls(), 0);
    assert_eq!(second.resolver.cache_hits, 5);
    assert_eq!(fs::read_to_string(&second.output_by_video_id)?, first_by_id);
    assert_eq!(fs::read_to_string(&second.output_by_video_and_date)?, first_by_date);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_quota_errors_exhaust_and_stay_cached() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("US_quota.csv");
    fs::write(
        &input,
        "video_id,trending_date,channelId,title\nq1,d1,UC_quota,One\nq2,d1,UC_bad,Two\n",
    )?;
    let config = create_test_config(&temp_dir);

    let lookup = MockLookup::new(&[])
        .failing_with("UC_quota", 403)
        .failing_with("UC_bad", 400);
    let summary = run_pipeline(&config, &[input.clone()], lookup.clone(), NonBlankIsEnglish).await?;

    assert_eq!(lookup.calls(), 4);
    assert_eq!(summary.resolver.backoff_waits, 3);
    assert_eq!(summary.resolver.errors, 2);

    let lines = read_lines(&summary.output_by_video_id);
    assert_eq!(lines[1], "q1,d1,UC_quota,One,Error,US,en,One");
    assert_eq!(lines[2], "q2,d1,UC_bad,Two,Error: 400,US,en,Two");

    let rerun_lookup = MockLookup::new(&[("UC_quota", 10)]);
    let rerun = run_pipeline(&config, &[input], rerun_lookup.clone(), NonBlankIsEnglish).await?;
    assert_eq!(rerun_lookup.calls(), 0);
    assert_eq!(read_lines(&rerun.output_by_video_id), lines);

    Ok(())
}

#[tokio::test]
async fn test_bad_files_are_skipped() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut inputs = create_test_data(&temp_dir)?;
    inputs.insert(0, temp_dir.path().join("Data").join("US_missing.csv"));
    let config = create_test_config(&temp_dir);

    let summary = run_pipeline(&config, &inputs, MockLookup::new(&[]), NonBlankIsEnglish).await?;

    assert_eq!(summary.ingest.files_skipped, 1);
    assert_eq!(summary.ingest.files_processed, 2);
    assert_eq!(summary.rows_by_video_id, 3);

    Ok(())
}

#[tokio::test]
async fn test_config_file_round_trip_drives_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let inputs = create_test_data(&temp_dir)?;
    let config_path = temp_dir.path().join("trending_sift_config.json");

    let mut config = create_test_config(&temp_dir);
    config.output_by_video_id = "unique_videos.csv".to_string();
    config.to_file(&config_path)?;

    let loaded = SiftConfig::from_file(&config_path)?;
    let summary = run_pipeline(&loaded, &inputs, MockLookup::new(&[]), NonBlankIsEnglish).await?;

    assert_eq!(summary.output_by_video_id, temp_dir.path().join("out").join("unique_videos.csv"));
    assert!(summary.output_by_video_id.exists());

    Ok(())
}
