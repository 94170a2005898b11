//! Durable last-activity timestamps, one per dog.
//!
//! Backed by `activity.json` under the configured state path so the
//! engagement scheduler sees idle time across restarts.  Writes are
//! monotonic wall-clock updates keyed per dog, safe to repeat.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use pt_domain::error::Result;

pub struct ActivityStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl ActivityStore {
    /// Load or create the store at `state_path/activity.json`.
    pub fn new(state_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_path)?;
        let path = state_path.join("activity.json");

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::debug!(path = %path.display(), "activity store loaded");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// The last time a send completed (or a proactive question was
    /// answered) for this dog.
    pub fn last_activity(&self, dog_id: i64) -> Option<DateTime<Utc>> {
        self.entries.read().get(&dog_id.to_string()).copied()
    }

    /// Record activity now and write through to disk.
    pub fn touch(&self, dog_id: i64) -> Result<()> {
        {
            let mut entries = self.entries.write();
            entries.insert(dog_id.to_string(), Utc::now());
        }
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let entries = self.entries.read();
        let json = serde_json::to_string_pretty(&*entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_survives_reload() {
        let dir = tempfile::tempdir().unwrap();

        let store = ActivityStore::new(dir.path()).unwrap();
        assert!(store.last_activity(7).is_none());
        store.touch(7).unwrap();
        let written = store.last_activity(7).unwrap();

        let reloaded = ActivityStore::new(dir.path()).unwrap();
        assert_eq!(reloaded.last_activity(7), Some(written));
        assert!(reloaded.last_activity(8).is_none());
    }

    #[test]
    fn touch_is_idempotent_per_dog() {
        let dir = tempfile::tempdir().unwrap();
        let store = ActivityStore::new(dir.path()).unwrap();

        store.touch(1).unwrap();
        let first = store.last_activity(1).unwrap();
        store.touch(1).unwrap();
        let second = store.last_activity(1).unwrap();

        assert!(second >= first);
    }
}
