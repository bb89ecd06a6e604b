//! Raw network profiles
//!
//! A [`NetworkProfile`] is the unvalidated, serializable description of one
//! network. Hashes and scripts are kept as hex strings so profiles read the
//! same way the constants are published. Turn a profile into usable
//! parameters with [`crate::ChainParameters::new`], which validates it.
//!
//! The built-in profiles are compiled in; nothing here reads from disk.

use crate::hash::PowHash;
use crate::network::NetworkId;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Mainnet genesis coinbase input script
/// ("Wired 09/Jan/2014 The Grand Experiment Goes Live: Overstock.com Is Now Accepting Bitcoins").
pub const MAINNET_COINBASE_INPUT_HEX: &str = "04ffff001d01044c5957697265642030392f4a616e2f3230313420546865204772616e64204578706572696d656e7420476f6573204c6976653a204f76657273746f636b2e636f6d204973204e6f7720416363657074696e6720426974636f696e73";

/// Mainnet genesis coinbase output script (pay-to-pubkey)
pub const MAINNET_COINBASE_OUTPUT_HEX: &str = "41040184710fa689ad5023690c80f3a49c8f13f8d45b8c857fbcbc8bc4a8e4d3eb4b10f4d4604fa08dce601aaf0f470216fe1b51850b4acf21b179c45070ac7b03a9ac";

/// Mainnet genesis block hash
pub const MAINNET_GENESIS_HASH: &str =
    "000002dd36edb71433159b1de4553b4a81a9812ced68202c80a490cbeb9489a7";

/// Coinbase input script of the double SHA-256 test networks
/// ("The Times 03/Jan/2009 Chancellor on brink of second bailout for banks").
pub const TEST_COINBASE_INPUT_HEX: &str = "04ffff001d0104455468652054696d65732030332f4a616e2f32303039204368616e63656c6c6f72206f6e206272696e6b206f66207365636f6e64206261696c6f757420666f722062616e6b73";

/// Coinbase output script of the double SHA-256 test networks (pay-to-pubkey)
pub const TEST_COINBASE_OUTPUT_HEX: &str = "4104678afdb0fe5548271967f1a67130b7105cd6a828e03909a67962e0ea1f61deb649f6bc3f4cef38c4f35504e51ec112de5c384df7ba0b8d578a4c702b6bf11d5fac";

/// Genesis coinbase reward in base units
pub const GENESIS_COINBASE_VALUE: u64 = 50 * 100_000_000;

/// Generic upgrade vote: mainnet window
pub const MAINNET_MAJORITY_WINDOW: u32 = 1000;
/// Generic upgrade vote: mainnet reject-outdated threshold
pub const MAINNET_MAJORITY_REJECT_BLOCK_OUTDATED: u32 = 950;
/// Generic upgrade vote: mainnet enforce-upgrade threshold
pub const MAINNET_MAJORITY_ENFORCE_BLOCK_UPGRADE: u32 = 750;

/// Feature vote: mainnet window
pub const MAINNET_FEATURE_WINDOW: u32 = 4032;
/// Feature vote: mainnet threshold (80%)
pub const MAINNET_FEATURE_THRESHOLD: u32 = 3226;

/// Generic upgrade vote: testnet window
pub const TESTNET_MAJORITY_WINDOW: u32 = 100;
/// Generic upgrade vote: testnet reject-outdated threshold
pub const TESTNET_MAJORITY_REJECT_BLOCK_OUTDATED: u32 = 75;
/// Generic upgrade vote: testnet enforce-upgrade threshold
pub const TESTNET_MAJORITY_ENFORCE_BLOCK_UPGRADE: u32 = 51;

/// Raw genesis block description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisProfile {
    /// Hash the block id is computed with
    #[serde(default)]
    pub pow_hash: PowHash,
    /// Header version
    pub version: i32,
    /// Unix timestamp
    pub timestamp: u32,
    /// Proof-of-work nonce
    pub nonce: u32,
    /// Compact difficulty target
    pub difficulty_bits: u32,
    /// Expected block hash (big-endian hex)
    pub expected_hash: String,
    /// Coinbase input script (hex)
    pub coinbase_input_script: String,
    /// Coinbase output value
    pub coinbase_value: u64,
    /// Coinbase output script (hex)
    pub coinbase_output_script: String,
}

impl GenesisProfile {
    fn sha256d(timestamp: u32, nonce: u32, difficulty_bits: u32, expected_hash: &str) -> Self {
        Self {
            pow_hash: PowHash::Sha256d,
            version: 1,
            timestamp,
            nonce,
            difficulty_bits,
            expected_hash: expected_hash.to_string(),
            coinbase_input_script: TEST_COINBASE_INPUT_HEX.to_string(),
            coinbase_value: GENESIS_COINBASE_VALUE,
            coinbase_output_script: TEST_COINBASE_OUTPUT_HEX.to_string(),
        }
    }
}

/// Generic majority vote settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityProfile {
    /// Blocks examined
    pub window: u32,
    /// Count at which new blocks must upgrade
    pub enforce_threshold: u32,
    /// Count at which outdated blocks are rejected
    pub reject_threshold: u32,
}

/// Feature-specific threshold vote settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureProfile {
    /// Blocks examined
    pub window: u32,
    /// Count at which the feature activates
    pub threshold: u32,
    /// Height by which the feature is known to be active
    pub activation_height_hint: u32,
}

/// One checkpoint literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointEntry {
    /// Block height
    pub height: u32,
    /// Block hash (big-endian hex)
    pub hash: String,
}

impl CheckpointEntry {
    fn new(height: u32, hash: &str) -> Self {
        Self {
            height,
            hash: hash.to_string(),
        }
    }
}

/// Unvalidated network profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    /// Network identifier
    pub network: NetworkId,
    /// Payment protocol network name
    pub payment_protocol_id: String,
    /// Blocks between difficulty retargets
    pub interval: u32,
    /// Expected duration of one retarget interval, in seconds
    pub target_timespan: u32,
    /// Easiest permitted target, in compact form
    pub max_target_bits: u32,
    /// Pay-to-pubkey-hash address version byte
    pub address_header: u8,
    /// Pay-to-script-hash address version byte
    pub p2sh_header: u8,
    /// Dumped private key version byte
    pub private_key_header: u8,
    /// Extended public key version
    pub extended_pub_header: u32,
    /// Extended private key version
    pub extended_priv_header: u32,
    /// Default P2P port
    pub port: u16,
    /// Message start bytes
    pub magic_bytes: [u8; 4],
    /// Genesis block
    pub genesis: GenesisProfile,
    /// Generic upgrade vote
    pub majority: MajorityProfile,
    /// Feature-specific vote
    pub feature: FeatureProfile,
    /// Checkpoints in increasing height order
    pub checkpoints: Vec<CheckpointEntry>,
    /// DNS seed hostnames
    pub dns_seeds: Vec<String>,
    /// Fallback peers as little-endian IPv4 integers
    pub fixed_peer_seeds: Vec<u32>,
    /// Spork signing address
    pub spork_address: String,
    /// First height paying budget proposals
    pub budget_start_height: u32,
    /// Blocks between subsidy reductions
    pub subsidy_decrease_block_count: u32,
    /// Confirmations before a coinbase output can be spent
    pub spendable_coinbase_depth: u32,
}

impl NetworkProfile {
    /// Mainnet profile.
    ///
    /// Block ids are X11 hashes, so verifying this genesis needs an X11
    /// [`crate::HeaderHasher`] from the embedding node.
    pub fn mainnet() -> Self {
        Self {
            network: NetworkId::Mainnet,
            payment_protocol_id: "main".to_string(),
            interval: 576,
            target_timespan: 24 * 60 * 60, // one day
            max_target_bits: 0x1e0f_ffff,
            address_header: 76,
            p2sh_header: 16,
            private_key_header: 204,
            extended_pub_header: 0x0488_b21e, // "xpub"
            extended_priv_header: 0x0488_ade4, // "xprv"
            port: 9999,
            magic_bytes: [0xbf, 0x0c, 0x6b, 0xbd],
            genesis: GenesisProfile {
                pow_hash: PowHash::X11,
                version: 1,
                timestamp: 1_390_095_618,
                nonce: 28_917_698,
                difficulty_bits: 0x1e0f_fff0,
                expected_hash: MAINNET_GENESIS_HASH.to_string(),
                coinbase_input_script: MAINNET_COINBASE_INPUT_HEX.to_string(),
                coinbase_value: GENESIS_COINBASE_VALUE,
                coinbase_output_script: MAINNET_COINBASE_OUTPUT_HEX.to_string(),
            },
            majority: MajorityProfile {
                window: MAINNET_MAJORITY_WINDOW,
                enforce_threshold: MAINNET_MAJORITY_ENFORCE_BLOCK_UPGRADE,
                reject_threshold: MAINNET_MAJORITY_REJECT_BLOCK_OUTDATED,
            },
            feature: FeatureProfile {
                window: MAINNET_FEATURE_WINDOW,
                threshold: MAINNET_FEATURE_THRESHOLD,
                activation_height_hint: 1000,
            },
            checkpoints: vec![
                CheckpointEntry::new(0, MAINNET_GENESIS_HASH),
                CheckpointEntry::new(
                    1,
                    "000006e68b5209b41117de33d2684e66a6f8fd8e42c6d19dd7102791b1b7c09a",
                ),
                CheckpointEntry::new(
                    10,
                    "0000057fad521679782324526939783d5576929674132ef868d1d84a61ef976f",
                ),
                CheckpointEntry::new(
                    50,
                    "000002335d41ff326c2af6c826fbdad224bc164e3a639725921e7ea5325ab9dc",
                ),
                CheckpointEntry::new(
                    100,
                    "00000a0537a66b85402f4bc26018da95bd6a9a64e1c87238cf332c8a185459f0",
                ),
                CheckpointEntry::new(
                    101,
                    "0000076f9c61b6c7528c612a4811f1047e48327d32653b56626ad3f65e9dbadc",
                ),
            ],
            dns_seeds: vec![
                "dnsseed.dash.org".to_string(),
                "dnsseed.dashdot.io".to_string(),
                "dnsseed.masternode.io".to_string(),
            ],
            fixed_peer_seeds: vec![0x5dba_fee5, 0x50d3_01c7, 0x592e_41fa, 0x50d3_0731],
            spork_address: "XviLeSquSH6gyEp2m8y9ABt9Y8Hv1jPoe2".to_string(),
            budget_start_height: 1,
            subsidy_decrease_block_count: 210_240,
            spendable_coinbase_depth: 100,
        }
    }

    /// Public double SHA-256 test network (testnet3 genesis and identity)
    pub fn testnet() -> Self {
        Self {
            network: NetworkId::Testnet,
            payment_protocol_id: "test".to_string(),
            interval: 2016,
            target_timespan: 14 * 24 * 60 * 60, // two weeks
            max_target_bits: 0x1d00_ffff,
            address_header: 111,
            p2sh_header: 196,
            private_key_header: 239,
            extended_pub_header: 0x0435_87cf, // "tpub"
            extended_priv_header: 0x0435_8394, // "tprv"
            port: 18333,
            magic_bytes: [0x0b, 0x11, 0x09, 0x07],
            genesis: GenesisProfile::sha256d(
                1_296_688_602,
                414_098_458,
                0x1d00_ffff,
                "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943",
            ),
            majority: MajorityProfile {
                window: TESTNET_MAJORITY_WINDOW,
                enforce_threshold: TESTNET_MAJORITY_ENFORCE_BLOCK_UPGRADE,
                reject_threshold: TESTNET_MAJORITY_REJECT_BLOCK_OUTDATED,
            },
            feature: FeatureProfile {
                window: 100,
                threshold: 50,
                activation_height_hint: 5500,
            },
            checkpoints: vec![
                CheckpointEntry::new(
                    0,
                    "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943",
                ),
                CheckpointEntry::new(
                    546,
                    "000000002a936ca763904c3c35fce2f3556c559c0214345d31b1bcebf76acb70",
                ),
            ],
            dns_seeds: vec![
                "testnet-seed.bitcoin.jonasschnelli.ch".to_string(),
                "seed.tbtc.petertodd.org".to_string(),
            ],
            fixed_peer_seeds: Vec::new(),
            // No spork signer on the test networks
            spork_address: String::new(),
            budget_start_height: 51,
            subsidy_decrease_block_count: 210_000,
            spendable_coinbase_depth: 100,
        }
    }

    /// Local double SHA-256 regression network
    pub fn regtest() -> Self {
        Self {
            network: NetworkId::Regtest,
            payment_protocol_id: "regtest".to_string(),
            interval: 2016,
            target_timespan: 14 * 24 * 60 * 60,
            max_target_bits: 0x207f_ffff,
            address_header: 111,
            p2sh_header: 196,
            private_key_header: 239,
            extended_pub_header: 0x0435_87cf,
            extended_priv_header: 0x0435_8394,
            port: 18444,
            magic_bytes: [0xfa, 0xbf, 0xb5, 0xda],
            genesis: GenesisProfile::sha256d(
                1_296_688_602,
                2,
                0x207f_ffff,
                "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
            ),
            majority: MajorityProfile {
                window: MAINNET_MAJORITY_WINDOW,
                enforce_threshold: MAINNET_MAJORITY_ENFORCE_BLOCK_UPGRADE,
                reject_threshold: MAINNET_MAJORITY_REJECT_BLOCK_OUTDATED,
            },
            feature: FeatureProfile {
                window: 100,
                threshold: 50,
                activation_height_hint: 2000,
            },
            checkpoints: vec![CheckpointEntry::new(
                0,
                "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
            )],
            dns_seeds: Vec::new(),
            fixed_peer_seeds: Vec::new(),
            spork_address: String::new(),
            budget_start_height: 1000,
            subsidy_decrease_block_count: 150,
            spendable_coinbase_depth: 100,
        }
    }

    /// Built-in profile for a network
    pub fn for_network(network: NetworkId) -> Self {
        match network {
            NetworkId::Mainnet => Self::mainnet(),
            NetworkId::Testnet => Self::testnet(),
            NetworkId::Regtest => Self::regtest(),
        }
    }

    /// Parse a profile from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the profile to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
