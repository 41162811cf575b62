//! Process-wide cache of loaded profiles.
//!
//! Each source is loaded at most once. The map only guards the creation of a
//! per-source cell; the load itself runs inside that cell, so loads of
//! different sources proceed in parallel while racing loads of one source are
//! collapsed into a single call.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::Result;
use crate::profile::LanguageProfile;

/// Ordered profiles read from one source.
pub type ProfileList = Arc<[LanguageProfile]>;

static GLOBAL_CACHE: OnceLock<Arc<ProfileCache>> = OnceLock::new();

/// Thread-safe profile cache keyed by source path.
#[derive(Debug, Default)]
pub struct ProfileCache {
    entries: DashMap<PathBuf, Arc<OnceCell<ProfileList>>>,
}

impl ProfileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cache shared by the whole process.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(Self::new())))
    }

    /// Returns the profiles of `source`, calling `loader` if they are not cached yet.
    ///
    /// Concurrent callers asking for the same uncached source block until the
    /// first caller's `loader` finishes; `loader` is never called twice for one
    /// source unless it failed. A failed load does not leave an entry behind.
    ///
    /// `loader` must not request the same source from this cache.
    ///
    /// # Errors
    ///
    /// An error returned by `loader` is returned as is.
    pub fn get_or_load<F>(&self, source: &Path, loader: F) -> Result<ProfileList>
    where
        F: FnOnce() -> Result<Vec<LanguageProfile>>,
    {
        let cell = match self.entries.get(source) {
            Some(cell) => Arc::clone(&cell),
            None => Arc::clone(&self.entries.entry(source.to_path_buf()).or_default()),
        };

        let mut loaded = false;
        let profiles = match cell.get_or_try_init(|| {
            loaded = true;
            loader().map(ProfileList::from)
        }) {
            Ok(profiles) => profiles,
            Err(e) => {
                self.entries
                    .remove_if(source, |_, cell| cell.get().is_none());
                return Err(e);
            }
        };

        if loaded {
            // A racing caller whose load failed may have removed the cell meanwhile.
            self.entries
                .entry(source.to_path_buf())
                .or_insert_with(|| Arc::clone(&cell));
            info!(source = %source.display(), n_profiles = profiles.len(), "cached profiles");
        } else {
            debug!(source = %source.display(), "profile cache hit");
        }
        Ok(Arc::clone(profiles))
    }

    /// Checks whether the profiles of `source` are cached.
    pub fn contains(&self, source: &Path) -> bool {
        self.entries
            .get(source)
            .map_or(false, |cell| cell.get().is_some())
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|cell| cell.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
