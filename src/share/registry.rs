use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::path::{Path, PathBuf};

/// Concurrent map from transfer code to the file it serves.
///
/// Single source of truth for "is this code currently servable". An entry
/// exists exactly while a transfer worker is alive for its code; the worker
/// removes it on every exit path.
pub struct TransferRegistry {
    entries: DashMap<u16, PathBuf>,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Insert the code only if it is absent. Exactly one of any set of
    /// concurrent callers racing the same code sees `true`.
    pub fn try_reserve(&self, code: u16, path: &Path) -> bool {
        match self.entries.entry(code) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(path.to_path_buf());
                true
            }
        }
    }

    pub fn lookup(&self, code: u16) -> Option<PathBuf> {
        self.entries.get(&code).map(|entry| entry.value().clone())
    }

    /// Remove the entry. Releasing an absent code is a no-op.
    pub fn release(&self, code: u16) {
        self.entries.remove(&code);
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for TransferRegistry {
    fn default() -> Self {
        Self::new()
    }
}
