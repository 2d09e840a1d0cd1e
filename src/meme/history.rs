//! Bounded record of memes that have already been shown.
//!
//! Ids are kept in insertion order for FIFO eviction, with a set alongside
//! for constant-time membership checks. The file on disk looks like
//! `{"shown_memes": ["https://i.redd.it/...", ...]}`, oldest first.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::StorageError;

#[derive(Serialize)]
struct HistoryFile<'a> {
    shown_memes: Vec<&'a str>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Object { shown_memes: Vec<String> },
    Bare(Vec<String>),
}

impl StoredHistory {
    fn into_ids(self) -> Vec<String> {
        match self {
            StoredHistory::Object { shown_memes } => shown_memes,
            StoredHistory::Bare(ids) => ids,
        }
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl HistoryStore {
    /// An empty history bound to `path`. `capacity` is clamped to at least one.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity: capacity.max(1),
            order: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Read the history file. A missing file is an empty history.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, StorageError> {
        let mut store = Self::new(path, capacity);
        if !store.path.exists() {
            return Ok(store);
        }

        let contents = fs::read_to_string(&store.path).map_err(|source| StorageError::Io {
            path: store.path.clone(),
            source,
        })?;
        let stored: StoredHistory =
            serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                path: store.path.clone(),
                source,
            })?;

        // Collapse repeats to their first occurrence, then keep the newest
        let mut first_seen = HashSet::new();
        let ids: Vec<String> = stored
            .into_ids()
            .into_iter()
            .filter(|id| first_seen.insert(id.clone()))
            .collect();
        let skip = ids.len().saturating_sub(store.capacity);
        for id in ids.into_iter().skip(skip) {
            store.record(id);
        }
        Ok(store)
    }

    /// Load the history, starting over with an empty one if the file is unusable
    pub fn load_or_empty(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        match Self::load(path.clone(), capacity) {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(error = %err, "starting with an empty meme history");
                Self::new(path, capacity)
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Remember `id`, evicting the oldest entries past capacity.
    /// Returns false if the id was already known.
    pub fn record(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.seen.contains(&id) {
            return false;
        }

        self.seen.insert(id.clone());
        self.order.push_back(id);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        true
    }

    /// Write the history through a temp file in the same directory, then
    /// rename it into place.
    pub fn save(&self) -> Result<(), StorageError> {
        let io_err = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let file = HistoryFile {
            shown_memes: self.order.iter().map(String::as_str).collect(),
        };
        let json = serde_json::to_vec_pretty(&file).map_err(|source| StorageError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        tracing::debug!(path = %self.path.display(), entries = self.order.len(), "saved meme history");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }

    /// Ids oldest first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
