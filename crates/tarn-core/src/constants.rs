//! Protocol constants and network selection.

/// Number of blocks behind the best tip beyond which reorganization is
/// disallowed by the sync-checkpoint rule (the maturity window).
pub const SYNC_CHECKPOINT_SPAN: u64 = 5000;

/// Mainnet genesis block hash. The height-0 entry of the mainnet checkpoint
/// table must equal this value.
pub const MAINNET_GENESIS_HASH: &str =
    "00000a4c6356f1e4e8a2e67878deb0b3b74a2b80370ded06f0c5a1a6a1b2dd36";

/// Network type: Mainnet or Testnet.
///
/// Controls which hardened checkpoint table applies. Passed explicitly at
/// registry construction rather than read from process-wide state, so both
/// variants can coexist in one process (and in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NetworkType {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network. Carries no hardened checkpoints.
    Testnet,
}

impl NetworkType {
    /// Human-readable network name.
    ///
    /// # Examples
    ///
    /// ```
    /// use tarn_core::constants::NetworkType;
    /// assert_eq!(NetworkType::Mainnet.name(), "mainnet");
    /// assert_eq!(NetworkType::Testnet.name(), "testnet");
    /// ```
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}
