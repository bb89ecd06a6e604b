//! Error types for chain parameter operations
//!
//! Two classes of failure exist. Configuration errors ([`ConfigError`],
//! [`GenesisMismatch`]) are detected once at startup and are fatal: a node must
//! not run with a misconfigured network profile. Protocol rejections
//! ([`CheckpointMismatch`]) are reported per block and only invalidate the
//! candidate chain.

use crate::hash::{Hash256, PowHash};
use crate::network::NetworkId;

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid network profile, detected while constructing [`crate::ChainParameters`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A vote window of zero blocks
    #[error("Majority window for {rule} rule must be positive")]
    ZeroWindow {
        /// Which rule was misconfigured
        rule: &'static str,
    },

    /// Thresholds violate `0 < enforce <= reject <= window`
    #[error(
        "Invalid {rule} thresholds: enforce={enforce}, reject={reject}, window={window} \
         (need 0 < enforce <= reject <= window)"
    )]
    ThresholdOrder {
        /// Which rule was misconfigured
        rule: &'static str,
        /// Enforce threshold
        enforce: u32,
        /// Reject threshold
        reject: u32,
        /// Window size
        window: u32,
    },

    /// Address and P2SH headers must differ
    #[error("Address header and P2SH header are both {0}")]
    AddressHeaderCollision(u8),

    /// Retarget interval or timespan is zero
    #[error("Invalid retarget parameters: {0}")]
    InvalidRetarget(String),

    /// Difficulty target cannot be decoded or exceeds the maximum
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// A hash literal could not be parsed
    #[error("Invalid hash for {field}: {reason}")]
    InvalidHash {
        /// Field holding the bad literal
        field: String,
        /// Parse failure
        reason: String,
    },

    /// A hex byte string could not be parsed
    #[error("Invalid hex for {field}: {reason}")]
    InvalidHex {
        /// Field holding the bad literal
        field: &'static str,
        /// Parse failure
        reason: String,
    },

    /// Checkpoint heights not strictly increasing
    #[error("Checkpoint height {height} does not follow {previous}")]
    CheckpointOrder {
        /// Height of the preceding entry
        previous: u32,
        /// Offending height
        height: u32,
    },

    /// Same checkpoint height asserted with two different hashes
    #[error("Conflicting checkpoints at height {height}: {first} vs {second}")]
    CheckpointConflict {
        /// Duplicated height
        height: u32,
        /// First hash listed
        first: Hash256,
        /// Conflicting hash
        second: Hash256,
    },

    /// Checkpoint at height 0 disagrees with the genesis hash
    #[error("Checkpoint at height 0 ({checkpoint}) does not match genesis hash {genesis}")]
    GenesisCheckpointConflict {
        /// Genesis expected hash
        genesis: Hash256,
        /// Hash listed at height 0
        checkpoint: Hash256,
    },

    /// Registry already holds parameters for this network
    #[error("Duplicate parameters for network {0}")]
    DuplicateNetwork(NetworkId),

    /// No header hasher was supplied for the network's proof-of-work hash
    #[error("No {algorithm} header hasher available to verify {network}")]
    MissingHasher {
        /// Network being registered
        network: NetworkId,
        /// Hash the network's headers use
        algorithm: PowHash,
    },
}

/// Recomputed genesis hash differs from the compiled-in constant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Genesis mismatch on {network}: expected {expected}, computed {computed}")]
pub struct GenesisMismatch {
    /// Network being validated
    pub network: NetworkId,
    /// Hash baked into the profile
    pub expected: Hash256,
    /// Hash recomputed from the header fields
    pub computed: Hash256,
}

/// Candidate block hash contradicts a checkpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Checkpoint mismatch at height {height}: expected {expected}, got {actual}")]
pub struct CheckpointMismatch {
    /// Checkpointed height
    pub height: u32,
    /// Stored hash
    pub expected: Hash256,
    /// Candidate hash
    pub actual: Hash256,
}

/// Chain parameter errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network profile
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Genesis block does not hash to the expected value
    #[error(transparent)]
    Genesis(#[from] GenesisMismatch),

    /// Candidate chain contradicts a checkpoint
    #[error(transparent)]
    Checkpoint(#[from] CheckpointMismatch),

    /// Profile (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if error must stop the process (vs rejecting a single chain)
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Checkpoint(_))
    }
}
