//! Lookup table of network parameters
//!
//! Built eagerly at startup and then shared. Each entry is an
//! `Arc<ChainParameters>` that consumers clone and hold.

use crate::error::ConfigError;
use crate::genesis::GenesisValidator;
use crate::hash::HasherSet;
use crate::network::NetworkId;
use crate::params::ChainParameters;
use crate::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parameters for every known network, keyed by id
#[derive(Debug, Clone, Default)]
pub struct ParamsRegistry {
    networks: BTreeMap<NetworkId, Arc<ChainParameters>>,
}

impl ParamsRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in networks, each genesis-verified with the hasher its
    /// profile names.
    ///
    /// Fails if `hashers` lacks an algorithm a built-in network uses.
    pub fn builtin_with(hashers: &HasherSet) -> Result<Self> {
        let mut registry = Self::new();
        for id in NetworkId::ALL {
            registry.insert_verified(ChainParameters::for_network(id)?, hashers)?;
        }
        Ok(registry)
    }

    /// Verify the genesis block of `params`, then add them
    pub fn insert_verified(
        &mut self,
        params: ChainParameters,
        hashers: &HasherSet,
    ) -> Result<Arc<ChainParameters>> {
        let algorithm = params.genesis().pow_hash;
        let hasher = hashers.get(algorithm).ok_or(ConfigError::MissingHasher {
            network: params.network(),
            algorithm,
        })?;
        GenesisValidator::new(hasher).validate(&params)?;
        Ok(self.insert(params)?)
    }

    /// Add parameters for a network not yet present
    pub fn insert(
        &mut self,
        params: ChainParameters,
    ) -> std::result::Result<Arc<ChainParameters>, ConfigError> {
        let id = params.network();
        if self.networks.contains_key(&id) {
            return Err(ConfigError::DuplicateNetwork(id));
        }
        let params = Arc::new(params);
        self.networks.insert(id, Arc::clone(&params));
        Ok(params)
    }

    /// Parameters for a network
    pub fn get(&self, id: NetworkId) -> Option<&Arc<ChainParameters>> {
        self.networks.get(&id)
    }

    /// Look up by network name (e.g. "mainnet", "test")
    pub fn by_name(&self, name: &str) -> Option<&Arc<ChainParameters>> {
        let id = name.parse::<NetworkId>().ok()?;
        self.get(id)
    }

    /// Look up by payment protocol network name
    pub fn by_payment_protocol_id(&self, id: &str) -> Option<&Arc<ChainParameters>> {
        self.networks
            .values()
            .find(|params| params.payment_protocol_id() == id)
    }

    /// Registered network ids
    pub fn networks(&self) -> impl Iterator<Item = NetworkId> + '_ {
        self.networks.keys().copied()
    }

    /// Get registered network count
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
