//! End-to-end scenarios for the checkpoint registry: hardened checkpoint
//! enforcement against a populated block index, and the rolling sync
//! checkpoint over long chains.

use proptest::prelude::*;

use tarn_consensus::{CheckpointRegistry, CheckpointTable};
use tarn_core::block_index::{BlockIndex, IndexHandle};
use tarn_core::constants::SYNC_CHECKPOINT_SPAN;
use tarn_core::types::Hash256;

/// Deterministic per-height block hash.
fn block_hash(height: u64) -> Hash256 {
    let mut bytes = [0x11u8; 32];
    bytes[..8].copy_from_slice(&height.to_le_bytes());
    Hash256(bytes)
}

/// Build a linear chain from genesis up to `tip_height` inclusive and mark
/// the tip as best. Returns the index and the tip handle.
fn linear_chain(tip_height: u64) -> (BlockIndex, IndexHandle) {
    let mut index = BlockIndex::new();
    let mut handle = index.insert(block_hash(0), 0, None).unwrap();
    for height in 1..=tip_height {
        handle = index.insert(block_hash(height), height, Some(handle)).unwrap();
    }
    index.set_best_tip(handle);
    (index, handle)
}

#[test]
fn hardened_checkpoints_against_indexed_chain() {
    // Table {0: G, 1000: H1} where both hashes are real chain blocks.
    let table = CheckpointTable::from_entries(vec![
        (0, block_hash(0)),
        (1000, block_hash(1000)),
    ])
    .unwrap();
    let registry = CheckpointRegistry::with_table(&table);
    let (index, tip) = linear_chain(1000);

    assert!(registry.is_hardened(1000, &block_hash(1000)));
    assert!(!registry.is_hardened(1000, &Hash256([0xEE; 32])));
    assert_eq!(registry.estimated_total_height(), 1000);

    let found = registry.find_last_known_checkpoint(&index).unwrap();
    assert_eq!(found, tip);
    assert_eq!(index.entry(found).height, 1000);
}

#[test]
fn sync_checkpoint_on_long_chain() {
    // Tip at height 6000: the sync checkpoint is the first ancestor with
    // height + span <= 6000, i.e. height 1000.
    let table = CheckpointTable::empty();
    let registry = CheckpointRegistry::with_table(&table);
    let (index, tip) = linear_chain(6000);

    let sync = registry.auto_select_sync_checkpoint(&index, tip);
    assert_eq!(index.entry(sync).height, 6000 - SYNC_CHECKPOINT_SPAN);

    // No ancestor closer to the tip also qualifies.
    let mut current = tip;
    while current != sync {
        assert!(index.entry(current).height + SYNC_CHECKPOINT_SPAN > 6000);
        current = index.entry(current).parent.unwrap();
    }

    assert!(!registry.check_sync(&index, 999));
    assert!(!registry.check_sync(&index, 1000));
    assert!(registry.check_sync(&index, 1001));
}

#[test]
fn sync_checkpoint_short_chain_is_genesis() {
    let table = CheckpointTable::empty();
    let registry = CheckpointRegistry::with_table(&table);

    // Chain shorter than the span: the walk ends at genesis.
    let (index, tip) = linear_chain(42);
    let sync = registry.auto_select_sync_checkpoint(&index, tip);
    assert_eq!(index.entry(sync).height, 0);
    assert!(index.entry(sync).parent.is_none());

    // Genesis-only graph: terminates immediately.
    let (lone, genesis) = linear_chain(0);
    assert_eq!(registry.auto_select_sync_checkpoint(&lone, genesis), genesis);
    assert!(!registry.check_sync(&lone, 0));
    assert!(registry.check_sync(&lone, 1));
}

#[test]
fn sync_check_permissive_without_tip() {
    let table = CheckpointTable::empty();
    let registry = CheckpointRegistry::with_table(&table);
    let index = BlockIndex::new();
    assert!(registry.check_sync(&index, 0));
    assert!(registry.check_sync(&index, u64::MAX));
}

proptest! {
    /// Heights absent from the table pass the hardened check with any hash.
    #[test]
    fn unknown_heights_always_pass(height in any::<u64>(), hash in any::<[u8; 32]>()) {
        let table = CheckpointTable::from_entries(vec![
            (7, Hash256([0x07; 32])),
            (70, Hash256([0x70; 32])),
        ]).unwrap();
        let registry = CheckpointRegistry::with_table(&table);
        prop_assume!(height != 7 && height != 70);
        prop_assert!(registry.is_hardened(height, &Hash256(hash)));
    }

    /// At a checkpointed height, only the exact stored hash passes.
    #[test]
    fn checkpointed_heights_reject_other_hashes(hash in any::<[u8; 32]>()) {
        let pinned = Hash256([0x07; 32]);
        let table = CheckpointTable::from_entries(vec![(7, pinned)]).unwrap();
        let registry = CheckpointRegistry::with_table(&table);
        let candidate = Hash256(hash);
        prop_assert_eq!(registry.is_hardened(7, &candidate), candidate == pinned);
    }

    /// On chains shorter than the span the sync checkpoint is genesis, so
    /// exactly the heights above 0 pass the sync check.
    #[test]
    fn short_chain_sync_threshold(tip_height in 0u64..64, height in 0u64..10_000) {
        let table = CheckpointTable::empty();
        let registry = CheckpointRegistry::with_table(&table);
        let (index, tip) = linear_chain(tip_height);
        let sync = registry.auto_select_sync_checkpoint(&index, tip);
        prop_assert_eq!(index.entry(sync).height, 0);
        prop_assert_eq!(registry.check_sync(&index, height), height > 0);
    }
}
