//! Reading progress and read-count persistence.
//!
//! Small TOML files under `.cache/<sha256(book id)>/` remember where the
//! reader left off and how many times a book was finished. Saves are
//! fire-and-forget: write errors are logged and swallowed so persistence can
//! never stall or crash narration.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct ProgressEntry {
    page: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReadCountEntry {
    count: u64,
}

pub struct ProgressStore {
    root: PathBuf,
}

impl ProgressStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: cache_dir.into(),
        }
    }

    /// Last page the reader was on, if any.
    pub fn load_progress(&self, book_id: &str) -> Option<usize> {
        let data = fs::read_to_string(self.progress_path(book_id)).ok()?;
        let entry: ProgressEntry = toml::from_str(&data).ok()?;
        Some(entry.page)
    }

    pub fn save_progress(&self, book_id: &str, page: usize) {
        debug!(book_id, page = page + 1, "Saving reading progress");
        self.write_toml(self.progress_path(book_id), &ProgressEntry { page });
    }

    pub fn read_count(&self, book_id: &str) -> u64 {
        fs::read_to_string(self.read_count_path(book_id))
            .ok()
            .and_then(|data| toml::from_str::<ReadCountEntry>(&data).ok())
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Called once per completed traversal to the closing page.
    pub fn increment_read_count(&self, book_id: &str) {
        let count = self.read_count(book_id) + 1;
        debug!(book_id, count, "Recording completed read");
        self.write_toml(self.read_count_path(book_id), &ReadCountEntry { count });
    }

    fn write_toml<T: Serialize>(&self, path: PathBuf, entry: &T) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match toml::to_string(entry) {
            Ok(contents) => {
                if let Err(err) = fs::write(&path, contents) {
                    warn!(path = %path.display(), "Failed to persist reader state: {err}");
                }
            }
            Err(err) => warn!("Failed to serialize reader state: {err}"),
        }
    }

    fn book_dir(&self, book_id: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(book_id.as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        self.root.join(hash)
    }

    fn progress_path(&self, book_id: &str) -> PathBuf {
        self.book_dir(book_id).join("progress.toml")
    }

    fn read_count_path(&self, book_id: &str) -> PathBuf {
        self.book_dir(book_id).join("reads.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_store() -> (ProgressStore, PathBuf) {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();
        let root = std::env::temp_dir().join(format!("story-narrator-progress-{nonce}"));
        (ProgressStore::new(root.clone()), root)
    }

    #[test]
    fn round_trips_progress() {
        let (store, root) = scratch_store();
        assert_eq!(store.load_progress("bk-1"), None);
        store.save_progress("bk-1", 4);
        assert_eq!(store.load_progress("bk-1"), Some(4));
        store.save_progress("bk-1", 2);
        assert_eq!(store.load_progress("bk-1"), Some(2));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn counts_completed_reads_per_book() {
        let (store, root) = scratch_store();
        assert_eq!(store.read_count("bk-1"), 0);
        store.increment_read_count("bk-1");
        store.increment_read_count("bk-1");
        store.increment_read_count("bk-2");
        assert_eq!(store.read_count("bk-1"), 2);
        assert_eq!(store.read_count("bk-2"), 1);
        let _ = fs::remove_dir_all(root);
    }
}
