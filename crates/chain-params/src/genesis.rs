//! Genesis block verification
//!
//! Rebuilds the genesis header from a profile's descriptor and checks that it
//! hashes to the compiled-in constant. A mismatch means the profile itself is
//! wrong and cannot be retried away.
//!
//! Transaction ids are always double SHA-256; only the header goes through
//! the validator's hasher.

use crate::error::GenesisMismatch;
use crate::hash::{Hash256, HeaderHasher, Sha256d};
use crate::header::BlockHeader;
use crate::params::ChainParameters;

/// Verifies genesis blocks with a given header hasher
#[derive(Debug, Clone, Default)]
pub struct GenesisValidator<H> {
    hasher: H,
}

impl GenesisValidator<Sha256d> {
    /// Validator using double SHA-256
    pub fn sha256d() -> Self {
        Self { hasher: Sha256d }
    }
}

impl<H: HeaderHasher> GenesisValidator<H> {
    /// Validator using the given hasher
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Canonical genesis header for these parameters
    pub fn genesis_header(&self, params: &ChainParameters) -> BlockHeader {
        let genesis = params.genesis();
        let merkle_root = genesis.coinbase.merkle_root(&Sha256d);
        genesis.header(merkle_root)
    }

    /// Recompute the genesis hash
    pub fn compute_hash(&self, params: &ChainParameters) -> Hash256 {
        self.genesis_header(params).hash_with(&self.hasher)
    }

    /// Check the recomputed genesis hash against the expected constant
    pub fn validate(&self, params: &ChainParameters) -> Result<(), GenesisMismatch> {
        let expected = *params.genesis_hash();
        let computed = self.compute_hash(params);

        if computed != expected {
            tracing::error!(
                network = %params.network(),
                expected = %expected,
                computed = %computed,
                "Genesis block hash mismatch"
            );
            return Err(GenesisMismatch {
                network: params.network(),
                expected,
                computed,
            });
        }

        tracing::info!(
            network = %params.network(),
            hash = %computed,
            time = ?params.genesis().datetime(),
            "Genesis block verified"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::PowHash;
    use crate::network::NetworkId;
    use crate::profile::NetworkProfile;

    /// Answers with a fixed hash for one exact header, double SHA-256 otherwise
    struct KnownAnswer {
        header: [u8; 80],
        answer: Hash256,
    }

    impl HeaderHasher for KnownAnswer {
        fn double_hash(&self, bytes: &[u8]) -> Hash256 {
            if bytes == self.header.as_slice() {
                self.answer
            } else {
                Sha256d.double_hash(bytes)
            }
        }
    }

    #[test]
    fn test_sha256d_genesis_blocks_verify() {
        let validator = GenesisValidator::sha256d();
        for id in NetworkId::ALL {
            let params = ChainParameters::for_network(id).unwrap();
            if params.genesis().pow_hash == PowHash::Sha256d {
                validator.validate(&params).unwrap();
            }
        }
    }

    #[test]
    fn test_mainnet_needs_its_own_hasher() {
        let params = ChainParameters::mainnet().unwrap();
        let err = GenesisValidator::sha256d().validate(&params).unwrap_err();
        assert_eq!(err.network, NetworkId::Mainnet);
        assert_eq!(
            err.expected.to_hex(),
            "000002dd36edb71433159b1de4553b4a81a9812ced68202c80a490cbeb9489a7"
        );

        let header = GenesisValidator::sha256d().genesis_header(&params).serialize();
        let validator = GenesisValidator::new(KnownAnswer {
            header,
            answer: *params.genesis_hash(),
        });
        validator.validate(&params).unwrap();
    }

    #[test]
    fn test_genesis_merkle_root() {
        let params = ChainParameters::testnet().unwrap();
        let header = GenesisValidator::sha256d().genesis_header(&params);
        assert_eq!(
            header.merkle_root.to_hex(),
            "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b"
        );
        assert_eq!(header.prev_hash, Hash256::ZERO);
    }

    #[test]
    fn test_merkle_root_ignores_header_hasher() {
        let params = ChainParameters::mainnet().unwrap();
        let sha = GenesisValidator::sha256d().genesis_header(&params);
        let zero = GenesisValidator::new(ZeroHasher).genesis_header(&params);
        assert_eq!(sha.merkle_root, zero.merkle_root);
    }

    #[test]
    fn test_nonce_change_is_detected() {
        let mut profile = NetworkProfile::testnet();
        profile.genesis.nonce += 1;
        // The checkpoint at height 0 still names the real hash, so drop it
        profile.checkpoints.remove(0);
        let params = ChainParameters::new(profile).unwrap();

        let err = GenesisValidator::sha256d().validate(&params).unwrap_err();
        assert_eq!(err.network, NetworkId::Testnet);
        assert_eq!(
            err.expected.to_hex(),
            "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943"
        );
        assert_ne!(err.computed, err.expected);
    }

    #[test]
    fn test_each_header_field_matters() {
        let mutations: [fn(&mut NetworkProfile); 4] = [
            |p| p.genesis.timestamp += 1,
            |p| p.genesis.version = 2,
            |p| p.genesis.coinbase_value -= 1,
            |p| p.genesis.difficulty_bits = 0x207f_fffe,
        ];
        for mutate in mutations {
            let mut profile = NetworkProfile::regtest();
            mutate(&mut profile);
            profile.checkpoints.clear();
            let params = ChainParameters::new(profile).unwrap();
            assert!(GenesisValidator::sha256d().validate(&params).is_err());
        }
    }

    struct ZeroHasher;

    impl HeaderHasher for ZeroHasher {
        fn double_hash(&self, _bytes: &[u8]) -> Hash256 {
            Hash256::ZERO
        }
    }

    #[test]
    fn test_custom_hasher_is_used() {
        let params = ChainParameters::regtest().unwrap();
        let validator = GenesisValidator::new(ZeroHasher);
        assert_eq!(validator.compute_hash(&params), Hash256::ZERO);
        assert!(validator.validate(&params).is_err());
    }
}
