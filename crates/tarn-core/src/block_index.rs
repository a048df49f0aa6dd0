//! In-memory block index arena.
//!
//! The index is the graph of all known block headers' metadata, linked by
//! parent references. Entries live in an arena and are addressed by stable
//! [`IndexHandle`]s rather than pointers, so the structure is trivially
//! shareable across threads (behind the caller's lock) and reconstructible
//! from storage.
//!
//! The index itself performs no validation beyond structural sanity (unique
//! hashes, heights consistent with the parent link). Consensus checks belong
//! to the chain-selection layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::types::Hash256;

/// Stable handle to an entry in a [`BlockIndex`] arena.
///
/// Handles are only produced by [`BlockIndex::insert`] and remain valid for
/// the lifetime of the index (entries are never removed).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexHandle(usize);

/// A single block-index entry: height, header hash, and parent link.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Block height (genesis is 0).
    pub height: u64,
    /// Block header hash.
    pub hash: Hash256,
    /// Handle of the parent entry, `None` only for genesis.
    pub parent: Option<IndexHandle>,
}

/// Arena of block-index entries with hash lookup and best-tip tracking.
///
/// Not thread-safe — callers should wrap in a `Mutex` or `RwLock` if
/// concurrent access is needed.
#[derive(Clone, Debug, Default)]
pub struct BlockIndex {
    entries: Vec<IndexEntry>,
    by_hash: HashMap<Hash256, IndexHandle>,
    best_tip: Option<IndexHandle>,
}

impl BlockIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry and return its handle.
    ///
    /// A parentless entry must be at height 0; any other entry's height must
    /// be exactly one more than its parent's.
    ///
    /// # Errors
    ///
    /// - [`IndexError::DuplicateBlock`] if `hash` is already indexed
    /// - [`IndexError::OrphanWithHeight`] if `parent` is `None` and `height != 0`
    /// - [`IndexError::HeightMismatch`] if `height != parent.height + 1`
    pub fn insert(
        &mut self,
        hash: Hash256,
        height: u64,
        parent: Option<IndexHandle>,
    ) -> Result<IndexHandle, IndexError> {
        if self.by_hash.contains_key(&hash) {
            return Err(IndexError::DuplicateBlock(hash.to_string()));
        }
        match parent {
            None if height != 0 => return Err(IndexError::OrphanWithHeight(height)),
            Some(p) => {
                let expected = self.entry(p).height + 1;
                if height != expected {
                    return Err(IndexError::HeightMismatch { got: height, expected });
                }
            }
            None => {}
        }

        let handle = IndexHandle(self.entries.len());
        self.entries.push(IndexEntry { height, hash, parent });
        self.by_hash.insert(hash, handle);
        Ok(handle)
    }

    /// Look up the entry behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `handle` did not come from this index.
    pub fn entry(&self, handle: IndexHandle) -> &IndexEntry {
        &self.entries[handle.0]
    }

    /// Look up a handle by block hash.
    pub fn get(&self, hash: &Hash256) -> Option<IndexHandle> {
        self.by_hash.get(hash).copied()
    }

    /// Check whether a block hash is present in the index.
    pub fn contains(&self, hash: &Hash256) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Mark an entry as the best known chain tip.
    pub fn set_best_tip(&mut self, handle: IndexHandle) {
        self.best_tip = Some(handle);
    }

    /// Handle of the best known chain tip, if one has been set.
    pub fn best_tip(&self) -> Option<IndexHandle> {
        self.best_tip
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
