//! Consensus parameters for one network profile
//!
//! [`ChainParameters`] is built once at startup from a [`NetworkProfile`],
//! validated, and then shared read-only (typically behind an `Arc`) with
//! every component that needs it. There is no global instance.

use crate::checkpoints::CheckpointStore;
use crate::error::ConfigError;
use crate::hash::{Hash256, PowHash};
use crate::header::{BlockHeader, GenesisCoinbase};
use crate::majority::MajorityVersionTracker;
use crate::network::NetworkId;
use crate::profile::{GenesisProfile, NetworkProfile};
use crate::target::Target;
use chrono::{DateTime, Utc};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Window and thresholds of a rolling version vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorityRule {
    window: u32,
    enforce_threshold: u32,
    reject_threshold: u32,
}

impl MajorityRule {
    /// Generic rule with separate enforce and reject thresholds.
    ///
    /// Requires `0 < enforce_threshold <= reject_threshold <= window`.
    pub fn new(
        window: u32,
        enforce_threshold: u32,
        reject_threshold: u32,
    ) -> Result<Self, ConfigError> {
        Self::checked("majority", window, enforce_threshold, reject_threshold)
    }

    /// Rule with a single activation threshold
    pub fn single(window: u32, threshold: u32) -> Result<Self, ConfigError> {
        Self::checked("feature", window, threshold, threshold)
    }

    fn checked(
        rule: &'static str,
        window: u32,
        enforce_threshold: u32,
        reject_threshold: u32,
    ) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow { rule });
        }
        if enforce_threshold == 0
            || enforce_threshold > reject_threshold
            || reject_threshold > window
        {
            return Err(ConfigError::ThresholdOrder {
                rule,
                enforce: enforce_threshold,
                reject: reject_threshold,
                window,
            });
        }
        Ok(Self {
            window,
            enforce_threshold,
            reject_threshold,
        })
    }

    /// Number of recent blocks examined
    pub fn window(&self) -> u32 {
        self.window
    }

    /// Qualifying blocks needed before new blocks must upgrade
    pub fn enforce_threshold(&self) -> u32 {
        self.enforce_threshold
    }

    /// Qualifying blocks needed before outdated blocks are rejected
    pub fn reject_threshold(&self) -> u32 {
        self.reject_threshold
    }
}

/// Feature-specific vote and its activation height hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRule {
    rule: MajorityRule,
    activation_height_hint: u32,
}

impl FeatureRule {
    /// Window and threshold (enforce and reject coincide)
    pub fn rule(&self) -> MajorityRule {
        self.rule
    }

    /// Number of recent blocks examined
    pub fn window(&self) -> u32 {
        self.rule.window
    }

    /// Qualifying blocks needed to activate
    pub fn threshold(&self) -> u32 {
        self.rule.enforce_threshold
    }

    /// Height by which the feature is known to be active
    pub fn activation_height_hint(&self) -> u32 {
        self.activation_height_hint
    }
}

/// Header fields needed to rebuild and verify the genesis block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisDescriptor {
    /// Hash the block id is computed with
    pub pow_hash: PowHash,
    /// Header version
    pub version: i32,
    /// Unix timestamp
    pub timestamp: u32,
    /// Proof-of-work nonce
    pub nonce: u32,
    /// Compact difficulty target
    pub difficulty_bits: u32,
    /// Hash the genesis block must have
    pub expected_hash: Hash256,
    /// The block's only transaction
    pub coinbase: GenesisCoinbase,
}

impl GenesisDescriptor {
    fn from_profile(profile: &GenesisProfile) -> Result<Self, ConfigError> {
        let expected_hash = profile
            .expected_hash
            .parse::<Hash256>()
            .map_err(|e| ConfigError::InvalidHash {
                field: "genesis".to_string(),
                reason: e.to_string(),
            })?;
        let input_script = decode_hex("coinbase_input_script", &profile.coinbase_input_script)?;
        let output_script = decode_hex("coinbase_output_script", &profile.coinbase_output_script)?;

        Ok(Self {
            pow_hash: profile.pow_hash,
            version: profile.version,
            timestamp: profile.timestamp,
            nonce: profile.nonce,
            difficulty_bits: profile.difficulty_bits,
            expected_hash,
            coinbase: GenesisCoinbase {
                tx_version: 1,
                input_script,
                output_value: profile.coinbase_value,
                output_script,
            },
        })
    }

    /// Genesis header for a given merkle root
    pub fn header(&self, merkle_root: Hash256) -> BlockHeader {
        BlockHeader {
            version: self.version,
            prev_hash: Hash256::ZERO,
            merkle_root,
            time: self.timestamp,
            bits: self.difficulty_bits,
            nonce: self.nonce,
        }
    }

    /// Genesis timestamp as a UTC date
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.timestamp), 0)
    }
}

fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, ConfigError> {
    hex::decode(value).map_err(|e| ConfigError::InvalidHex {
        field,
        reason: e.to_string(),
    })
}

/// Validated, immutable consensus constants for one network
#[derive(Debug, Clone)]
pub struct ChainParameters {
    network: NetworkId,
    payment_protocol_id: String,
    interval: u32,
    target_timespan: u32,
    max_target_bits: u32,
    max_target: Target,
    address_header: u8,
    p2sh_header: u8,
    private_key_header: u8,
    extended_pub_header: u32,
    extended_priv_header: u32,
    port: u16,
    magic_bytes: [u8; 4],
    genesis: GenesisDescriptor,
    majority: MajorityRule,
    feature: FeatureRule,
    checkpoints: CheckpointStore,
    dns_seeds: Vec<String>,
    fixed_peers: Vec<Ipv4Addr>,
    spork_address: String,
    budget_start_height: u32,
    subsidy_decrease_block_count: u32,
    spendable_coinbase_depth: u32,
}

impl ChainParameters {
    /// Validate a profile and build parameters from it
    pub fn new(profile: NetworkProfile) -> Result<Self, ConfigError> {
        if profile.interval == 0 {
            return Err(ConfigError::InvalidRetarget("interval must be positive".to_string()));
        }
        if profile.target_timespan == 0 {
            return Err(ConfigError::InvalidRetarget(
                "target timespan must be positive".to_string(),
            ));
        }
        if profile.address_header == profile.p2sh_header {
            return Err(ConfigError::AddressHeaderCollision(profile.address_header));
        }

        let majority = MajorityRule::new(
            profile.majority.window,
            profile.majority.enforce_threshold,
            profile.majority.reject_threshold,
        )?;
        let feature = FeatureRule {
            rule: MajorityRule::single(profile.feature.window, profile.feature.threshold)?,
            activation_height_hint: profile.feature.activation_height_hint,
        };

        let max_target = Target::from_compact(profile.max_target_bits).ok_or_else(|| {
            ConfigError::InvalidTarget(format!(
                "max target bits {:#010x} do not decode",
                profile.max_target_bits
            ))
        })?;
        let genesis = GenesisDescriptor::from_profile(&profile.genesis)?;
        match Target::from_compact(genesis.difficulty_bits) {
            Some(t) if t <= max_target => {}
            _ => {
                return Err(ConfigError::InvalidTarget(format!(
                    "genesis bits {:#010x} exceed max target {:#010x}",
                    genesis.difficulty_bits, profile.max_target_bits
                )))
            }
        }

        let checkpoints = CheckpointStore::from_entries(&profile.checkpoints)?;
        if let Some(at_zero) = checkpoints.get(0) {
            if *at_zero != genesis.expected_hash {
                return Err(ConfigError::GenesisCheckpointConflict {
                    genesis: genesis.expected_hash,
                    checkpoint: *at_zero,
                });
            }
        }

        let fixed_peers = profile
            .fixed_peer_seeds
            .iter()
            .map(|seed| Ipv4Addr::from(seed.swap_bytes()))
            .collect();

        tracing::debug!(
            network = %profile.network,
            checkpoints = checkpoints.len(),
            majority_window = majority.window(),
            feature_window = feature.window(),
            "Constructed chain parameters"
        );

        Ok(Self {
            network: profile.network,
            payment_protocol_id: profile.payment_protocol_id,
            interval: profile.interval,
            target_timespan: profile.target_timespan,
            max_target_bits: profile.max_target_bits,
            max_target,
            address_header: profile.address_header,
            p2sh_header: profile.p2sh_header,
            private_key_header: profile.private_key_header,
            extended_pub_header: profile.extended_pub_header,
            extended_priv_header: profile.extended_priv_header,
            port: profile.port,
            magic_bytes: profile.magic_bytes,
            genesis,
            majority,
            feature,
            checkpoints,
            dns_seeds: profile.dns_seeds,
            fixed_peers,
            spork_address: profile.spork_address,
            budget_start_height: profile.budget_start_height,
            subsidy_decrease_block_count: profile.subsidy_decrease_block_count,
            spendable_coinbase_depth: profile.spendable_coinbase_depth,
        })
    }

    /// Create params for mainnet
    pub fn mainnet() -> Result<Self, ConfigError> {
        Self::new(NetworkProfile::mainnet())
    }

    /// Create params for testnet
    pub fn testnet() -> Result<Self, ConfigError> {
        Self::new(NetworkProfile::testnet())
    }

    /// Create params for regtest
    pub fn regtest() -> Result<Self, ConfigError> {
        Self::new(NetworkProfile::regtest())
    }

    /// Get built-in params by network id
    pub fn for_network(network: NetworkId) -> Result<Self, ConfigError> {
        Self::new(NetworkProfile::for_network(network))
    }

    /// Network identifier
    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Payment protocol network name
    pub fn payment_protocol_id(&self) -> &str {
        &self.payment_protocol_id
    }

    /// Blocks between difficulty retargets
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Expected seconds per retarget interval
    pub fn target_timespan(&self) -> u32 {
        self.target_timespan
    }

    /// Easiest permitted target in compact form
    pub fn max_target_bits(&self) -> u32 {
        self.max_target_bits
    }

    /// Easiest permitted target
    pub fn max_target(&self) -> Target {
        self.max_target
    }

    /// Check that compact `bits` decode to a target no easier than the maximum
    pub fn is_within_max_target(&self, bits: u32) -> bool {
        Target::from_compact(bits).is_some_and(|t| t <= self.max_target)
    }

    /// Check if the block at `height` is the last of a retarget interval
    pub fn is_difficulty_transition_point(&self, height: u32) -> bool {
        (u64::from(height) + 1) % u64::from(self.interval) == 0
    }

    /// Pay-to-pubkey-hash address version byte
    pub fn address_header(&self) -> u8 {
        self.address_header
    }

    /// Pay-to-script-hash address version byte
    pub fn p2sh_header(&self) -> u8 {
        self.p2sh_header
    }

    /// Address version bytes accepted on this network
    pub fn acceptable_address_codes(&self) -> [u8; 2] {
        [self.address_header, self.p2sh_header]
    }

    /// Check if an address version byte belongs to this network
    pub fn is_acceptable_address_code(&self, code: u8) -> bool {
        self.acceptable_address_codes().contains(&code)
    }

    /// Dumped private key version byte
    pub fn private_key_header(&self) -> u8 {
        self.private_key_header
    }

    /// Extended public key version
    pub fn extended_pub_header(&self) -> u32 {
        self.extended_pub_header
    }

    /// Extended private key version
    pub fn extended_priv_header(&self) -> u32 {
        self.extended_priv_header
    }

    /// Default P2P port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Message start bytes
    pub fn magic_bytes(&self) -> [u8; 4] {
        self.magic_bytes
    }

    /// Genesis block description
    pub fn genesis(&self) -> &GenesisDescriptor {
        &self.genesis
    }

    /// Hash the genesis block must have
    pub fn genesis_hash(&self) -> &Hash256 {
        &self.genesis.expected_hash
    }

    /// Generic upgrade vote
    pub fn majority_rule(&self) -> MajorityRule {
        self.majority
    }

    /// Feature-specific vote
    pub fn feature_rule(&self) -> FeatureRule {
        self.feature
    }

    /// Check if `height` is at or past the feature activation hint
    pub fn is_feature_height_reached(&self, height: u32) -> bool {
        height >= self.feature.activation_height_hint
    }

    /// Tracker for the generic vote on blocks with version >= `version_floor`
    pub fn majority_tracker(&self, version_floor: i32) -> MajorityVersionTracker {
        MajorityVersionTracker::new(self.majority, version_floor)
    }

    /// Tracker for the feature vote on blocks with version >= `version_floor`
    pub fn feature_tracker(&self, version_floor: i32) -> MajorityVersionTracker {
        MajorityVersionTracker::new(self.feature.rule, version_floor)
    }

    /// Checkpoint table
    pub fn checkpoints(&self) -> &CheckpointStore {
        &self.checkpoints
    }

    /// DNS seed hostnames
    pub fn dns_seeds(&self) -> &[String] {
        &self.dns_seeds
    }

    /// Fallback peer addresses
    pub fn fixed_peers(&self) -> &[Ipv4Addr] {
        &self.fixed_peers
    }

    /// Fallback peers on the default port
    pub fn fixed_peer_addrs(&self) -> impl Iterator<Item = SocketAddr> + '_ {
        self.fixed_peers
            .iter()
            .map(move |ip| SocketAddr::V4(SocketAddrV4::new(*ip, self.port)))
    }

    /// Spork signing address
    pub fn spork_address(&self) -> &str {
        &self.spork_address
    }

    /// First height paying budget proposals
    pub fn budget_start_height(&self) -> u32 {
        self.budget_start_height
    }

    /// Blocks between subsidy reductions
    pub fn subsidy_decrease_block_count(&self) -> u32 {
        self.subsidy_decrease_block_count
    }

    /// Confirmations before a coinbase output can be spent
    pub fn spendable_coinbase_depth(&self) -> u32 {
        self.spendable_coinbase_depth
    }
}
