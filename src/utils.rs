use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::constants::CSV_EXTENSION;

pub fn setup_logging(verbosity: &str) -> Result<()> {
    let level = match verbosity {
        "silent" => Level::ERROR,
        "normal" => Level::INFO,
        "verbose" => Level::DEBUG,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("trending_sift={}", level).parse()?);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// `*.csv` files directly inside `directory`, sorted by name so country
/// files are read in a stable order.
pub fn discover_csv_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>> {
    let directory = directory.as_ref();
    let mut csv_files = Vec::new();

    let entries = std::fs::read_dir(directory)
        .with_context(|| format!("Failed to read input directory {}", directory.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() {
            if let Some(extension) = path.extension() {
                if extension.to_string_lossy().to_lowercase() == CSV_EXTENSION {
                    csv_files.push(path);
                }
            }
        }
    }

    csv_files.sort();

    Ok(csv_files)
}

pub fn format_duration(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{:.1}s", seconds)
    } else if seconds < 3600.0 {
        format!("{:.1}m", seconds / 60.0)
    } else {
        format!("{:.1}h", seconds / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30.0s");
        assert_eq!(format_duration(90.0), "1.5m");
        assert_eq!(format_duration(3660.0), "1.0h");
    }

    #[test]
    fn test_discover_csv_files_sorted_and_filtered() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("US_youtube_trending_data.csv"), "a").unwrap();
        std::fs::write(temp_dir.path().join("CA_youtube_trending_data.CSV"), "a").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "a").unwrap();
        std::fs::create_dir(temp_dir.path().join("nested.csv")).unwrap();

        let files = discover_csv_files(temp_dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["CA_youtube_trending_data.CSV", "US_youtube_trending_data.csv"]);
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        assert!(discover_csv_files(temp_dir.path().join("absent")).is_err());
    }
}
