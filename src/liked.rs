//! The user's liked movies, kept in one durable key-value slot.
//!
//! The slot holds a JSON array of movie ids. An empty set is represented by
//! an absent slot, so the persisted form is canonical: the same membership
//! always produces the same bytes (sorted, no duplicates).
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::MovieId;

/// Key of the liked-list slot.
pub const LIKED_MOVIES_KEY: &str = "likedMovies";

/// A single durable slot of text.
pub trait SlotStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, contents: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process slot; lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-filled slot, handy for simulating what an earlier session left behind.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }

    /// Current slot contents; `None` when empty or unusable.
    pub fn contents(&self) -> Option<String> {
        self.lock().ok().and_then(|s| s.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<String>>, StoreError> {
        self.slot.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl SlotStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, contents: &str) -> Result<(), StoreError> {
        *self.lock()? = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Slot backed by `<dir>/<key>.json`. Writes go through a temp file and a
/// rename, so readers see either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SlotStore for FileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_err(e)),
        }
    }

    fn save(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(|e| self.io_err(e))?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}

/// Liked movie ids, mirrored to a [`SlotStore`] after every change.
#[derive(Debug)]
pub struct LikedSet<S: SlotStore> {
    store: S,
    ids: BTreeSet<MovieId>,
}

impl<S: SlotStore> LikedSet<S> {
    /// Reads the slot. Missing, unreadable or malformed contents give an empty set.
    pub fn load(store: S) -> Self {
        let ids = read_ids(&store);
        info!("Loaded {} liked movies", ids.len());
        Self { store, ids }
    }

    /// Re-reads the slot, discarding in-memory state.
    pub fn reload(&mut self) {
        self.ids = read_ids(&self.store);
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds `id` if absent, removes it otherwise. Returns whether it is now liked.
    /// On a storage error nothing changes.
    pub fn toggle(&mut self, id: MovieId) -> Result<bool, StoreError> {
        let mut next = self.ids.clone();
        let liked = if next.remove(&id) {
            false
        } else {
            next.insert(id);
            true
        };
        self.commit(next)?;
        debug!(movie_id = id, liked, "Toggled liked movie");
        Ok(liked)
    }

    /// Removes `id`; a no-op when it is not liked.
    pub fn remove(&mut self, id: MovieId) -> Result<(), StoreError> {
        if !self.ids.contains(&id) {
            return Ok(());
        }
        let mut next = self.ids.clone();
        next.remove(&id);
        self.commit(next)?;
        debug!(movie_id = id, "Removed liked movie");
        Ok(())
    }

    /// Empties the set and erases the slot.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.ids.clear();
        info!("Cleared liked movies");
        Ok(())
    }

    fn commit(&mut self, next: BTreeSet<MovieId>) -> Result<(), StoreError> {
        if next.is_empty() {
            self.store.clear()?;
        } else {
            let encoded = serde_json::to_string(&next)?;
            self.store.save(&encoded)?;
        }
        self.ids = next;
        Ok(())
    }
}

fn read_ids(store: &impl SlotStore) -> BTreeSet<MovieId> {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeSet::new(),
        Err(e) => {
            warn!("Failed to read liked movies, starting empty: {}", e);
            return BTreeSet::new();
        }
    };
    match serde_json::from_str::<Vec<MovieId>>(&raw) {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            warn!("Ignoring malformed liked movies slot: {}", e);
            BTreeSet::new()
        }
    }
}
