pub mod entry;


pub use entry::SubscriberCount;

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::CACHE_TEMP_SUFFIX;

/// Durable channel id -> subscriber count memo.
///
/// Entries are never evicted or refreshed, including error outcomes. The
/// whole map is rewritten on every `save`.
#[derive(Debug, Clone)]
pub struct ChannelCache {
    path: PathBuf,
    entries: HashMap<String, SubscriberCount>,
}

impl ChannelCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: HashMap::new(),
        }
    }

    /// Read the persisted mapping. A missing or unreadable file gives an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, SubscriberCount>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring malformed channel cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No channel cache at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                warn!("Could not read channel cache {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        debug!("Loaded {} cached channels from {}", entries.len(), path.display());
        Self { path, entries }
    }

    /// Overwrite the persisted mapping with the current contents.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }

        let content = serde_json::to_string(&self.entries)?;
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write channel cache {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace channel cache {}", self.path.display()))?;

        debug!("Saved {} cached channels to {}", self.entries.len(), self.path.display());
        Ok(())
    }

    pub fn get(&self, channel_id: &str) -> Option<&SubscriberCount> {
        self.entries.get(channel_id)
    }

    pub fn put(&mut self, channel_id: impl Into<String>, value: SubscriberCount) {
        self.entries.insert(channel_id.into(), value);
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.entries.contains_key(channel_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(CACHE_TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}
