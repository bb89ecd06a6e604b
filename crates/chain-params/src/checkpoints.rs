//! Blockchain checkpoints
//!
//! A checkpoint binds a height to the one hash the chain is allowed to have
//! there. Any candidate chain disagreeing with a checkpoint is invalid.

use crate::error::{CheckpointMismatch, ConfigError};
use crate::hash::Hash256;
use crate::profile::CheckpointEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A blockchain checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Block height
    pub height: u32,
    /// Block hash
    pub hash: Hash256,
}

/// Immutable height-to-hash table
#[derive(Debug, Clone, Default)]
pub struct CheckpointStore {
    checkpoints: Vec<Checkpoint>,
    by_height: HashMap<u32, Hash256>,
}

impl CheckpointStore {
    /// Build a store from a canonical listing.
    ///
    /// Heights must be strictly increasing. A height repeated with a different
    /// hash is reported as a conflict; any other non-increasing entry as an
    /// ordering error.
    pub fn new(checkpoints: Vec<Checkpoint>) -> Result<Self, ConfigError> {
        let mut by_height = HashMap::with_capacity(checkpoints.len());
        let mut previous: Option<&Checkpoint> = None;

        for cp in &checkpoints {
            if let Some(prev) = previous {
                if let Some(existing) = by_height.get(&cp.height) {
                    if *existing != cp.hash {
                        return Err(ConfigError::CheckpointConflict {
                            height: cp.height,
                            first: *existing,
                            second: cp.hash,
                        });
                    }
                }
                if cp.height <= prev.height {
                    return Err(ConfigError::CheckpointOrder {
                        previous: prev.height,
                        height: cp.height,
                    });
                }
            }
            by_height.insert(cp.height, cp.hash);
            previous = Some(cp);
        }

        Ok(Self {
            checkpoints,
            by_height,
        })
    }

    /// Parse hex literals, then build the store
    pub fn from_entries(entries: &[CheckpointEntry]) -> Result<Self, ConfigError> {
        let checkpoints = entries
            .iter()
            .map(|entry| {
                let hash = entry
                    .hash
                    .parse::<Hash256>()
                    .map_err(|e| ConfigError::InvalidHash {
                        field: format!("checkpoint {}", entry.height),
                        reason: e.to_string(),
                    })?;
                Ok(Checkpoint {
                    height: entry.height,
                    hash,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Self::new(checkpoints)
    }

    /// Check a candidate block hash against the table.
    ///
    /// Heights without a checkpoint always pass.
    pub fn verify(&self, height: u32, candidate: &Hash256) -> Result<(), CheckpointMismatch> {
        match self.by_height.get(&height) {
            Some(expected) if expected != candidate => {
                tracing::warn!(
                    height,
                    expected = %expected,
                    actual = %candidate,
                    "Block contradicts checkpoint"
                );
                Err(CheckpointMismatch {
                    height,
                    expected: *expected,
                    actual: *candidate,
                })
            }
            _ => Ok(()),
        }
    }

    /// Check if a checkpoint exists at this height
    pub fn is_checkpoint(&self, height: u32) -> bool {
        self.by_height.contains_key(&height)
    }

    /// Hash checkpointed at this height
    pub fn get(&self, height: u32) -> Option<&Hash256> {
        self.by_height.get(&height)
    }

    /// Get checkpoint at or before given height
    pub fn last_at_or_below(&self, height: u32) -> Option<&Checkpoint> {
        let idx = self.checkpoints.partition_point(|cp| cp.height <= height);
        idx.checked_sub(1).map(|i| &self.checkpoints[i])
    }

    /// Checkpoints in height order
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }

    /// Get latest checkpoint
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    /// Get checkpoint count
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(byte: u8) -> Hash256 {
        Hash256::from_bytes([byte; 32])
    }

    fn store() -> CheckpointStore {
        CheckpointStore::new(vec![
            Checkpoint { height: 0, hash: hash(1) },
            Checkpoint { height: 100, hash: hash(2) },
            Checkpoint { height: 5000, hash: hash(3) },
        ])
        .unwrap()
    }

    #[test]
    fn test_verify_checkpointed_height() {
        let store = store();
        assert!(store.verify(0, &hash(1)).is_ok());

        let err = store.verify(0, &hash(9)).unwrap_err();
        assert_eq!(err.height, 0);
        assert_eq!(err.expected, hash(1));
        assert_eq!(err.actual, hash(9));
    }

    #[test]
    fn test_verify_unlisted_height_passes() {
        let store = store();
        for h in [1, 99, 101, 4999, u32::MAX] {
            assert!(store.verify(h, &hash(9)).is_ok());
        }
    }

    #[test]
    fn test_last_at_or_below() {
        let store = store();
        assert_eq!(store.last_at_or_below(0).unwrap().height, 0);
        assert_eq!(store.last_at_or_below(99).unwrap().height, 0);
        assert_eq!(store.last_at_or_below(100).unwrap().height, 100);
        assert_eq!(store.last_at_or_below(1_000_000).unwrap().height, 5000);

        let sparse = CheckpointStore::new(vec![Checkpoint { height: 10, hash: hash(1) }]).unwrap();
        assert!(sparse.last_at_or_below(9).is_none());
    }

    #[test]
    fn test_rejects_decreasing_heights() {
        let err = CheckpointStore::new(vec![
            Checkpoint { height: 100, hash: hash(1) },
            Checkpoint { height: 50, hash: hash(2) },
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::CheckpointOrder { previous: 100, height: 50 });
    }

    #[test]
    fn test_rejects_conflicting_duplicate() {
        let err = CheckpointStore::new(vec![
            Checkpoint { height: 7, hash: hash(1) },
            Checkpoint { height: 7, hash: hash(2) },
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::CheckpointConflict { height: 7, .. }));
    }

    #[test]
    fn test_non_adjacent_duplicate_is_conflict() {
        let err = CheckpointStore::new(vec![
            Checkpoint { height: 7, hash: hash(1) },
            Checkpoint { height: 8, hash: hash(2) },
            Checkpoint { height: 7, hash: hash(3) },
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::CheckpointConflict { height: 7, first: hash(1), second: hash(3) }
        );
    }

    #[test]
    fn test_rejects_repeated_identical_entry() {
        let err = CheckpointStore::new(vec![
            Checkpoint { height: 7, hash: hash(1) },
            Checkpoint { height: 7, hash: hash(1) },
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::CheckpointOrder { .. }));
    }

    #[test]
    fn test_from_entries_bad_hex() {
        let entries = vec![CheckpointEntry {
            height: 3,
            hash: "not a hash".to_string(),
        }];
        let err = CheckpointStore::from_entries(&entries).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHash { .. }));
    }

    #[test]
    fn test_accessors() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
        assert!(store.is_checkpoint(100));
        assert!(!store.is_checkpoint(101));
        assert_eq!(store.get(5000), Some(&hash(3)));
        assert_eq!(store.latest().unwrap().height, 5000);
        assert!(CheckpointStore::default().is_empty());
    }
}
