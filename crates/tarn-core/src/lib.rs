//! # tarn-core
//! Foundation types for the Tarn protocol: block hashes, network selection,
//! and the block-index arena consumed by chain selection.

pub mod block_index;
pub mod constants;
pub mod error;
pub mod types;
