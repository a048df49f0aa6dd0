//! Checkpoint registry: hardened checkpoints and the rolling sync checkpoint.
//!
//! Two independent mechanisms guard chain selection here:
//!
//! - **Hardened checkpoints** pin a sparse set of (height, hash) pairs known
//!   out-of-band to be canonical. A candidate block at a checkpointed height
//!   with a different hash is rejected unconditionally, regardless of
//!   proof-of-work or chain length.
//!
//! - **Sync checkpoint**: a rolling, height-distance-based checkpoint
//!   [`SYNC_CHECKPOINT_SPAN`] blocks behind the best tip. Reorgs that would
//!   rewrite blocks at or below it are rejected.
//!
//! # Attack vectors
//!
//! - **Long-range rewrite:** Without checkpoints an attacker with sufficient
//!   hash power could rewrite arbitrarily deep history. Hardened checkpoints
//!   pin historical blocks outright; the sync checkpoint bounds rewrite depth
//!   near the tip even where no hardened checkpoint exists yet.
//!
//! - **Checkpoint spoofing:** The checkpoint tables are compiled into the
//!   binary. An attacker would need to distribute a modified binary to
//!   exploit this, which is outside our threat model.
//!
//! # Usage
//!
//! The node layer should call [`CheckpointRegistry::check_hardened`] before
//! accepting a candidate block into the best chain, and
//! [`CheckpointRegistry::check_sync`] before accepting a reorg at a given
//! height. Both checks must pass; either rejection is final for that block.
//! The registry never retains the index or tip it is handed — any locking
//! around index mutation is the caller's concern.

use std::sync::LazyLock;

use tracing::{debug, warn};

use tarn_core::block_index::{BlockIndex, IndexHandle};
use tarn_core::constants::{MAINNET_GENESIS_HASH, NetworkType, SYNC_CHECKPOINT_SPAN};
use tarn_core::error::CheckpointError;
use tarn_core::types::Hash256;

/// Hardened mainnet checkpoints as (height, block hash hex) pairs.
///
/// What makes a good checkpoint block?
/// - Is surrounded by blocks with reasonable timestamps (no blocks before
///   with a timestamp after, none after with a timestamp before)
/// - Contains no strange transactions
const MAINNET_ENTRIES: &[(u64, &str)] = &[
    (0, MAINNET_GENESIS_HASH),
    (1000, "d5b682aaad7ade4a1fee56a7a72e579b16c1127949d56db0baf928e3afc4ddd2"),
    (100_000, "931f1616be286af9d086ba63ce92627a5aecd45547be14e79c031663fe8ade46"),
    (200_000, "3c6a49f7d8345be9f0c1f4023509a8bbffc9f4478e79dca1299be8dc1a27aeae"),
    (300_000, "521fb5df867b886f73ba639dea6d0df683abfb2bcb9bd6e92c92001b1f5f302f"),
    (400_000, "90d76c5c2515c70b50d822fffecd530846a964d911d036f24c32a25657368031"),
    (500_000, "aeb1b164b4f81f96b519bd1c6a8303d9dcb42cdac70ac84580c3c7448ff497c5"),
    (600_000, "8117b096cc809a5de52689d8aa806d532b70d4a1bf858a56fad1840538268993"),
    (700_000, "c4de40c3f3c52ec21c52b931ab21ba5f04211e01931e0a655251f5c7c773fae3"),
    (800_000, "ad7b3ad35c97c60f616bf7869eb19c0263efea708ad18fd167256c0e1c12f472"),
    (900_000, "b8847045e5e594d806f4b4c18f7304e978f6f8f786b7b53406bdc9f32da62d7d"),
    (1_000_000, "cbbe551dde93c20bff6ccb682f89c1aefcffc613e35773a6b1ca3eb52d6c5a04"),
    (1_001_729, "5a42bdb92de371cbc2b4ce54afbe69a8994ba637d8c0f29a40a4d4e528530901"),
    (1_018_195, "048b08afc3067508a690ebc5646aa8808bbd8909afd6e847f105f642d201b976"),
];

/// Mainnet checkpoint table, built once on first access.
pub static MAINNET_CHECKPOINTS: LazyLock<CheckpointTable> = LazyLock::new(|| {
    let entries = MAINNET_ENTRIES
        .iter()
        .map(|&(height, hex)| {
            let hash = Hash256::from_hex(hex).expect("hardcoded checkpoint hash is valid hex");
            (height, hash)
        })
        .collect();
    CheckpointTable::from_entries(entries).expect("hardcoded checkpoint heights are sorted")
});

/// Testnet has no hardened checkpoints.
pub static TESTNET_CHECKPOINTS: LazyLock<CheckpointTable> = LazyLock::new(CheckpointTable::empty);

/// An immutable, ordered (height → block hash) checkpoint table.
///
/// Heights are strictly increasing; lookups use binary search. There is no
/// mutation API — tables are built once and live for the process lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckpointTable {
    entries: Vec<(u64, Hash256)>,
}

impl CheckpointTable {
    /// Create an empty table (a network with no hardened checkpoints).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from (height, hash) pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::UnsortedTable`] if heights are not
    /// strictly increasing.
    pub fn from_entries(entries: Vec<(u64, Hash256)>) -> Result<Self, CheckpointError> {
        for pair in entries.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(CheckpointError::UnsortedTable { height: pair[1].0 });
            }
        }
        Ok(Self { entries })
    }

    /// The hardened checkpoint table for the given network.
    pub fn for_network(network: NetworkType) -> &'static Self {
        match network {
            NetworkType::Mainnet => &MAINNET_CHECKPOINTS,
            NetworkType::Testnet => &TESTNET_CHECKPOINTS,
        }
    }

    /// The checkpointed hash at `height`, if any.
    pub fn hash_at(&self, height: u64) -> Option<&Hash256> {
        self.entries
            .binary_search_by_key(&height, |&(h, _)| h)
            .ok()
            .map(|pos| &self.entries[pos].1)
    }

    /// Height of the greatest checkpoint, or 0 for an empty table.
    pub fn highest_height(&self) -> u64 {
        self.entries.last().map(|&(h, _)| h).unwrap_or(0)
    }

    /// Iterate entries in ascending height order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(u64, Hash256)> {
        self.entries.iter()
    }

    /// Number of checkpoints in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no checkpoints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only checkpoint queries against one network's table.
///
/// Every operation is a pure read: nothing blocks, nothing is retained, and
/// the registry holds no mutable state, so it is freely shareable across
/// threads.
#[derive(Clone, Copy, Debug)]
pub struct CheckpointRegistry<'a> {
    table: &'a CheckpointTable,
}

impl CheckpointRegistry<'static> {
    /// Registry over the compiled-in table for `network`.
    pub fn new(network: NetworkType) -> Self {
        Self { table: CheckpointTable::for_network(network) }
    }
}

impl<'a> CheckpointRegistry<'a> {
    /// Registry over an explicit table. This is the testable core:
    /// production code uses [`CheckpointRegistry::new`], while tests can
    /// supply their own table.
    pub fn with_table(table: &'a CheckpointTable) -> Self {
        Self { table }
    }

    /// Verify that a block at `height` has the expected checkpoint hash.
    ///
    /// If `height` is not checkpointed the check passes unconditionally (no
    /// constraint applies). Must be evaluated before a candidate block is
    /// accepted into the best chain; a mismatch is a fatal rejection of that
    /// block, not a retryable condition.
    ///
    /// # Errors
    ///
    /// Returns [`CheckpointError::Mismatch`] when the hash does not match
    /// the checkpoint at the given height.
    pub fn check_hardened(&self, height: u64, hash: &Hash256) -> Result<(), CheckpointError> {
        match self.table.hash_at(height) {
            None => Ok(()),
            Some(expected) if expected == hash => Ok(()),
            Some(expected) => {
                warn!(height, %expected, got = %hash, "hardened checkpoint mismatch");
                Err(CheckpointError::Mismatch {
                    height,
                    expected: expected.to_string(),
                    got: hash.to_string(),
                })
            }
        }
    }

    /// Boolean form of [`check_hardened`](Self::check_hardened).
    pub fn is_hardened(&self, height: u64, hash: &Hash256) -> bool {
        self.check_hardened(height, hash).is_ok()
    }

    /// Height of the most recent checkpoint, or 0 if there are none.
    ///
    /// Advisory only (progress estimation for sync UIs); never used for
    /// consensus decisions.
    pub fn estimated_total_height(&self) -> u64 {
        self.table.highest_height()
    }

    /// The highest-height checkpoint whose block is present in `index`.
    ///
    /// Scans the table from the highest height downward so the *most recent*
    /// locally-known checkpoint is returned, not merely any. Returns `None`
    /// when no checkpoint block has been indexed yet (e.g. very early sync).
    pub fn find_last_known_checkpoint(&self, index: &BlockIndex) -> Option<IndexHandle> {
        self.table
            .iter()
            .rev()
            .find_map(|(_, hash)| index.get(hash))
    }

    /// Select the rolling sync checkpoint: the first ancestor of `tip`
    /// (walking parent links) whose height is at least
    /// [`SYNC_CHECKPOINT_SPAN`] below the tip, or genesis if the chain is
    /// shorter than the span.
    ///
    /// Pure height-distance walk over the index graph; the hardened table is
    /// not consulted.
    pub fn auto_select_sync_checkpoint(
        &self,
        index: &BlockIndex,
        tip: IndexHandle,
    ) -> IndexHandle {
        let tip_height = index.entry(tip).height;
        let mut current = tip;
        while let Some(parent) = index.entry(current).parent {
            if index.entry(current).height + SYNC_CHECKPOINT_SPAN <= tip_height {
                break;
            }
            current = parent;
        }
        debug!(height = index.entry(current).height, "selected sync checkpoint");
        current
    }

    /// Check a candidate height against the sync checkpoint.
    ///
    /// Returns `true` iff `height` is strictly above the sync checkpoint
    /// selected from the index's best tip. Heights at or below it would
    /// rewrite history older than the maturity window and are rejected.
    /// With no best tip set (early sync) no constraint applies and the
    /// check passes.
    pub fn check_sync(&self, index: &BlockIndex, height: u64) -> bool {
        let Some(tip) = index.best_tip() else {
            return true;
        };
        let sync = self.auto_select_sync_checkpoint(index, tip);
        height > index.entry(sync).height
    }
}
