//! Persisted repository visibility cache.
//!
//! This module defines [`StatusCache`], a flat JSON object mapping absolute
//! repository paths to `isPrivate` booleans. It is the only record of
//! visibility that survives a restart.
//!
//! # Cache Strategy
//! - **Fail soft on read**: a missing or corrupt file loads as an empty cache
//! - **Whole-file writes**: every mutation rewrites the file; no locking, last
//!   writer wins
//! - **Fail open on query**: a repository whose visibility cannot be queried is
//!   recorded as public so the listing always has a marker to show
//! - **Tombstones**: entries for vanished paths stay until a full rebuild

use crate::core::error::{RepoDeckError, Result};
use crate::core::hosting::VisibilitySource;
use crate::core::scan::list_repositories;
use crate::core::state::Visibility;
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCache {
    file: PathBuf,
    entries: BTreeMap<String, bool>,
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl StatusCache {
    /// Read the cache file; never fails
    pub fn load(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let entries = match std::fs::read_to_string(&file) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt status cache {}: {e}", file.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No status cache at {} yet", file.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Cannot read status cache {}: {e}", file.display());
                BTreeMap::new()
            }
        };
        log::debug!("Loaded {} cached repositories", entries.len());
        Self { file, entries }
    }

    /// Overwrite the cache file with the current entries
    pub fn save(&self) -> Result<()> {
        if let Some(dir) = self.file.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| RepoDeckError::directory_creation_failed(dir, e))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.file, json)
            .map_err(|e| RepoDeckError::cache_write_failed(&self.file, e))?;
        Ok(())
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn entries(&self) -> &BTreeMap<String, bool> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<bool> {
        self.entries.get(&key(path)).copied()
    }

    /// Cached visibility; absent entries show as public
    pub fn visibility(&self, path: &Path) -> Visibility {
        Visibility::from_private(self.get(path).unwrap_or(false))
    }

    pub fn upsert(&mut self, path: &Path, is_private: bool) -> Result<()> {
        self.entries.insert(key(path), is_private);
        self.save()
    }

    /// Returns whether an entry was present
    pub fn remove(&mut self, path: &Path) -> Result<bool> {
        let removed = self.entries.remove(&key(path)).is_some();
        self.save()?;
        Ok(removed)
    }

    /// Move an entry to a new key, keeping its value. A missing old entry
    /// moves as public.
    pub fn rename(&mut self, from: &Path, to: &Path) -> Result<bool> {
        let is_private = self.entries.remove(&key(from)).unwrap_or(false);
        self.entries.insert(key(to), is_private);
        self.save()?;
        Ok(is_private)
    }

    /// Query visibility for every repository under `base` that has no entry.
    /// Returns how many entries were added.
    pub fn refresh_missing<V>(&mut self, base: &Path, source: &V) -> Result<usize>
    where
        V: VisibilitySource + ?Sized,
    {
        let mut added = 0;
        for (_, path) in list_repositories(base)? {
            let path_key = key(&path);
            if self.entries.contains_key(&path_key) {
                continue;
            }
            let is_private = source.is_private(&path);
            self.entries.insert(path_key, is_private);
            added += 1;
        }

        self.save()?;
        log::debug!("refresh_missing added {added} entries");
        Ok(added)
    }

    /// Drop every entry and queue all repositories under `base` for querying
    pub fn begin_rebuild(&mut self, base: &Path) -> Result<RebuildScan> {
        let pending = list_repositories(base)?
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        self.entries.clear();
        Ok(RebuildScan { pending, done: 0 })
    }

    /// Rebuild in one go, calling `on_each` after every repository
    pub fn rebuild_all<V, F>(&mut self, base: &Path, source: &V, mut on_each: F) -> Result<usize>
    where
        V: VisibilitySource + ?Sized,
        F: FnMut(&Path, bool),
    {
        let mut scan = self.begin_rebuild(base)?;
        while let Some((path, is_private)) = scan.step(self, source) {
            on_each(&path, is_private);
        }
        scan.finish(self)
    }
}

/// A rebuild in progress, advanced one repository per [`RebuildScan::step`]
#[derive(Debug)]
pub struct RebuildScan {
    pending: VecDeque<PathBuf>,
    done: usize,
}

impl RebuildScan {
    /// Query the next repository and record it in memory
    pub fn step<V>(&mut self, cache: &mut StatusCache, source: &V) -> Option<(PathBuf, bool)>
    where
        V: VisibilitySource + ?Sized,
    {
        let path = self.pending.pop_front()?;
        let is_private = source.is_private(&path);
        cache.entries.insert(key(&path), is_private);
        self.done += 1;
        Some((path, is_private))
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Persist the rebuilt cache; returns how many repositories were queried
    pub fn finish(self, cache: &StatusCache) -> Result<usize> {
        cache.save()?;
        Ok(self.done)
    }
}
