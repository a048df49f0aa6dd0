//! # tarn-consensus — Checkpoint-guarded chain selection.
//!
//! Provides the [`CheckpointRegistry`], which pins known-good blocks via
//! compiled-in hardened checkpoints and bounds reorganization depth via a
//! rolling sync checkpoint derived from the block index.

pub mod checkpoint;

pub use checkpoint::{CheckpointRegistry, CheckpointTable};
