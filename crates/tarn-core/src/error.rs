//! Error types for the Tarn protocol.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashParseError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid length: {0} characters, expected 64")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("duplicate block: {0}")] DuplicateBlock(String),
    #[error("height mismatch: got {got}, expected {expected}")] HeightMismatch { got: u64, expected: u64 },
    #[error("parentless entry at non-zero height {0}")] OrphanWithHeight(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("checkpoint mismatch at height {height}: expected {expected}, got {got}")]
    Mismatch { height: u64, expected: String, got: String },
    #[error("checkpoint heights not strictly increasing at {height}")]
    UnsortedTable { height: u64 },
}
