use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cached raster size decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    pub source: u32,
    pub effective: u32,
    pub path: String,
}

/// What a size decision depends on
///
/// Two resolvers only share a size entry when they build the same style
/// root and select from the same ladder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeKey {
    pub style_root: String,
    pub ladder: Vec<u32>,
    /// Effective size before clamping to the ladder
    pub requested: u32,
}

impl SizeKey {
    pub fn new(style_root: impl Into<String>, ladder: &[u32], requested: u32) -> Self {
        Self {
            style_root: style_root.into(),
            ladder: ladder.to_vec(),
            requested,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    sizes: HashMap<SizeKey, SizeEntry>,
    // resolved directory -> probe succeeded
    availability: HashMap<String, bool>,
}

/// Size and availability decisions of a [`Resolver`](crate::Resolver)
///
/// Clones share the same maps. Entries live until [`clear`](Self::clear) or
/// until a forced re-check replaces them.
#[derive(Clone, Debug, Default)]
pub struct ResolverCache {
    state: Arc<Mutex<CacheState>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self, key: &SizeKey) -> Option<SizeEntry> {
        self.lock().sizes.get(key).cloned()
    }

    pub fn store_size(&self, key: SizeKey, entry: SizeEntry) {
        self.lock().sizes.insert(key, entry);
    }

    pub fn availability(&self, path: &str) -> Option<bool> {
        self.lock().availability.get(path).copied()
    }

    pub fn store_availability(&self, path: &str, available: bool) {
        self.lock().availability.insert(path.to_string(), available);
    }

    /// Number of (size, availability) entries
    pub fn len(&self) -> (usize, usize) {
        let state = self.lock();
        (state.sizes.len(), state.availability.len())
    }

    pub fn is_empty(&self) -> bool {
        let state = self.lock();
        state.sizes.is_empty() && state.availability.is_empty()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.sizes.clear();
        state.availability.clear();
    }
}
