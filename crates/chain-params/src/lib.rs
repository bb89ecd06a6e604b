//! Consensus parameters for a proof-of-work network
//!
//! This crate holds the constants that define one network profile, verifies
//! the profile's genesis block and checkpoints, and tracks rolling-window
//! block version votes that decide soft-fork activation.
//!
//! Parameters are built once at startup, validated, and passed by shared
//! reference. Nothing here performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkpoints;
pub mod error;
pub mod genesis;
pub mod hash;
pub mod header;
pub mod majority;
pub mod network;
pub mod params;
pub mod profile;
pub mod registry;
pub mod target;

pub use checkpoints::{Checkpoint, CheckpointStore};
pub use error::{CheckpointMismatch, ConfigError, Error, GenesisMismatch, Result};
pub use genesis::GenesisValidator;
pub use hash::{Hash256, HasherSet, HeaderHasher, PowHash, Sha256d};
pub use header::{BlockHeader, GenesisCoinbase};
pub use majority::{MajoritySnapshot, MajorityStatus, MajorityVersionTracker};
pub use network::NetworkId;
pub use params::{ChainParameters, FeatureRule, GenesisDescriptor, MajorityRule};
pub use profile::NetworkProfile;
pub use registry::ParamsRegistry;
pub use target::Target;
