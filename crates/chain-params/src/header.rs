//! Canonical header and coinbase serialization
//!
//! Only what is needed to rebuild a genesis block: the 80-byte header and the
//! single coinbase transaction whose hash is the genesis merkle root.

use crate::hash::{Hash256, HeaderHasher};

/// Serialized header length in bytes
pub const HEADER_LEN: usize = 80;

/// Block header fields in serialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block version
    pub version: i32,
    /// Hash of the previous block
    pub prev_hash: Hash256,
    /// Merkle root of the block's transactions
    pub merkle_root: Hash256,
    /// Unix timestamp
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// Proof-of-work nonce
    pub nonce: u32,
}

impl BlockHeader {
    /// Little-endian wire serialization
    pub fn serialize(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(self.prev_hash.as_bytes());
        out[36..68].copy_from_slice(self.merkle_root.as_bytes());
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Block hash under the given hasher
    pub fn hash_with<H: HeaderHasher + ?Sized>(&self, hasher: &H) -> Hash256 {
        hasher.double_hash(&self.serialize())
    }
}

/// The sole transaction of a genesis block.
///
/// Spends the null outpoint with `input_script` and pays `output_value` to
/// `output_script`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisCoinbase {
    /// Transaction version
    pub tx_version: i32,
    /// Coinbase input script (usually a timestamped headline)
    pub input_script: Vec<u8>,
    /// Output value in base units
    pub output_value: u64,
    /// Output locking script
    pub output_script: Vec<u8>,
}

impl GenesisCoinbase {
    /// Wire serialization of the transaction
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            4 + 1 + 36 + 9 + self.input_script.len() + 4 + 1 + 8 + 9 + self.output_script.len() + 4,
        );
        out.extend_from_slice(&self.tx_version.to_le_bytes());

        // One input spending the null outpoint
        write_compact_size(&mut out, 1);
        out.extend_from_slice(Hash256::ZERO.as_bytes());
        out.extend_from_slice(&u32::MAX.to_le_bytes());
        write_compact_size(&mut out, self.input_script.len() as u64);
        out.extend_from_slice(&self.input_script);
        out.extend_from_slice(&u32::MAX.to_le_bytes());

        write_compact_size(&mut out, 1);
        out.extend_from_slice(&self.output_value.to_le_bytes());
        write_compact_size(&mut out, self.output_script.len() as u64);
        out.extend_from_slice(&self.output_script);

        // Lock time
        out.extend_from_slice(&0u32.to_le_bytes());
        out
    }

    /// Merkle root of a block containing only this transaction (its txid)
    pub fn merkle_root<H: HeaderHasher + ?Sized>(&self, hasher: &H) -> Hash256 {
        hasher.double_hash(&self.serialize())
    }
}

/// Append a variable-length integer in compact-size encoding
pub fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256d;

    #[test]
    fn test_compact_size_boundaries() {
        let cases: [(u64, &[u8]); 5] = [
            (0, &[0x00]),
            (0xfc, &[0xfc]),
            (0xfd, &[0xfd, 0xfd, 0x00]),
            (0x1_0000, &[0xfe, 0x00, 0x00, 0x01, 0x00]),
            (0x1_0000_0000, &[0xff, 0, 0, 0, 0, 1, 0, 0, 0]),
        ];
        for (n, expected) in cases {
            let mut out = Vec::new();
            write_compact_size(&mut out, n);
            assert_eq!(out, expected, "encoding {}", n);
        }
    }

    #[test]
    fn test_header_layout() {
        let header = BlockHeader {
            version: 2,
            prev_hash: Hash256::ZERO,
            merkle_root: Hash256::from_bytes([0x11; 32]),
            time: 0x0102_0304,
            bits: 0x1d00_ffff,
            nonce: 7,
        };
        let bytes = header.serialize();
        assert_eq!(&bytes[0..4], &[2, 0, 0, 0]);
        assert_eq!(&bytes[36..68], &[0x11; 32]);
        assert_eq!(&bytes[68..72], &[4, 3, 2, 1]);
        assert_eq!(&bytes[72..76], &[0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&bytes[76..80], &[7, 0, 0, 0]);
    }

    #[test]
    fn test_nonce_changes_hash() {
        let header = BlockHeader {
            version: 1,
            prev_hash: Hash256::ZERO,
            merkle_root: Hash256::ZERO,
            time: 1,
            bits: 0x207f_ffff,
            nonce: 0,
        };
        let bumped = BlockHeader { nonce: 1, ..header };
        assert_ne!(header.hash_with(&Sha256d), bumped.hash_with(&Sha256d));
    }
}
