//! Rolling-window block version vote
//!
//! A [`MajorityVersionTracker`] remembers the versions of the last `W`
//! connected blocks and counts how many of them are at or above a version
//! floor. Reject and enforce conditions are recomputed from that count on
//! every query, so activation reverts if support falls away.
//!
//! The tracker has one writer (the block connection path). Other threads
//! read through a [`MajorityStatus`] handle, which loads an atomic snapshot
//! and never blocks the writer.

use crate::params::MajorityRule;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Upper bound on entries reserved when a tracker is created; the window
/// grows past this as blocks arrive.
const INITIAL_WINDOW_CAPACITY: usize = 4096;

/// Point-in-time view of a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajoritySnapshot {
    /// Versions currently in the window
    pub observed: u32,
    /// Entries in the window at or above the floor
    pub qualifying: u32,
}

impl MajoritySnapshot {
    fn pack(self) -> u64 {
        (u64::from(self.observed) << 32) | u64::from(self.qualifying)
    }

    fn unpack(word: u64) -> Self {
        Self {
            observed: (word >> 32) as u32,
            qualifying: word as u32,
        }
    }
}

/// Sliding-window counter of blocks at or above a version floor
#[derive(Debug)]
pub struct MajorityVersionTracker {
    rule: MajorityRule,
    version_floor: i32,
    window: VecDeque<i32>,
    qualifying: u32,
    shared: Arc<AtomicU64>,
}

impl MajorityVersionTracker {
    /// Empty tracker for `rule`, counting versions >= `version_floor`
    pub fn new(rule: MajorityRule, version_floor: i32) -> Self {
        Self {
            rule,
            version_floor,
            window: VecDeque::with_capacity((rule.window() as usize).min(INITIAL_WINDOW_CAPACITY)),
            qualifying: 0,
            shared: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Tracker seeded with historical versions, oldest first.
    ///
    /// Used to rebuild the window after a reorganization.
    pub fn from_history<I>(rule: MajorityRule, version_floor: i32, versions: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let mut tracker = Self::new(rule, version_floor);
        for version in versions {
            tracker.push(version);
        }
        tracker.publish();
        tracker
    }

    /// Record the version of a newly connected block
    pub fn observe(&mut self, version: i32) {
        let was_reject = self.is_reject_active();
        let was_enforce = self.is_enforce_active();

        self.push(version);
        self.publish();
        self.log_transitions(was_enforce, was_reject);
    }

    fn push(&mut self, version: i32) {
        self.window.push_back(version);
        if version >= self.version_floor {
            self.qualifying += 1;
        }
        if self.window.len() > self.rule.window() as usize {
            if let Some(evicted) = self.window.pop_front() {
                if evicted >= self.version_floor {
                    self.qualifying -= 1;
                }
            }
        }
    }

    fn publish(&self) {
        self.shared.store(self.snapshot().pack(), Ordering::Release);
    }

    fn log_transitions(&self, was_enforce: bool, was_reject: bool) {
        let enforce = self.is_enforce_active();
        if enforce != was_enforce {
            tracing::info!(
                version_floor = self.version_floor,
                qualifying = self.qualifying,
                window = self.rule.window(),
                active = enforce,
                "Upgrade enforcement changed"
            );
        }
        let reject = self.is_reject_active();
        if reject != was_reject {
            tracing::info!(
                version_floor = self.version_floor,
                qualifying = self.qualifying,
                window = self.rule.window(),
                active = reject,
                "Outdated block rejection changed"
            );
        }
    }

    /// Outdated blocks (version below the floor) must be rejected
    pub fn is_reject_active(&self) -> bool {
        self.qualifying >= self.rule.reject_threshold()
    }

    /// Newly produced blocks must carry at least the floor version
    pub fn is_enforce_active(&self) -> bool {
        self.qualifying >= self.rule.enforce_threshold()
    }

    /// Check if a block of this version is outdated under the current vote
    pub fn should_reject(&self, version: i32) -> bool {
        version < self.version_floor && self.is_reject_active()
    }

    /// Entries in the window at or above the floor
    pub fn qualifying(&self) -> u32 {
        self.qualifying
    }

    /// Versions currently in the window
    pub fn observed(&self) -> u32 {
        self.window.len() as u32
    }

    /// Version floor being voted on
    pub fn version_floor(&self) -> i32 {
        self.version_floor
    }

    /// Window and thresholds
    pub fn rule(&self) -> MajorityRule {
        self.rule
    }

    /// Current counts
    pub fn snapshot(&self) -> MajoritySnapshot {
        MajoritySnapshot {
            observed: self.observed(),
            qualifying: self.qualifying,
        }
    }

    /// Read-only handle for other threads
    pub fn status(&self) -> MajorityStatus {
        MajorityStatus {
            rule: self.rule,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Extend<i32> for MajorityVersionTracker {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, versions: T) {
        for version in versions {
            self.observe(version);
        }
    }
}

/// Cloneable, lock-free view of a tracker's latest published state
#[derive(Debug, Clone)]
pub struct MajorityStatus {
    rule: MajorityRule,
    shared: Arc<AtomicU64>,
}

impl MajorityStatus {
    /// Latest published counts
    pub fn snapshot(&self) -> MajoritySnapshot {
        MajoritySnapshot::unpack(self.shared.load(Ordering::Acquire))
    }

    /// Reject condition as of the latest snapshot
    pub fn is_reject_active(&self) -> bool {
        self.snapshot().qualifying >= self.rule.reject_threshold()
    }

    /// Enforce condition as of the latest snapshot
    pub fn is_enforce_active(&self) -> bool {
        self.snapshot().qualifying >= self.rule.enforce_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(window: u32, enforce: u32, reject: u32) -> MajorityVersionTracker {
        MajorityVersionTracker::new(MajorityRule::new(window, enforce, reject).unwrap(), 4)
    }

    #[test]
    fn test_counts_and_eviction() {
        let mut t = tracker(3, 2, 3);
        t.extend([4, 3, 5]);
        assert_eq!(t.snapshot(), MajoritySnapshot { observed: 3, qualifying: 2 });
        assert!(t.is_enforce_active());
        assert!(!t.is_reject_active());

        // Evicts the leading 4
        t.observe(3);
        assert_eq!(t.snapshot(), MajoritySnapshot { observed: 3, qualifying: 1 });
        assert!(!t.is_enforce_active());
    }

    #[test]
    fn test_reject_threshold_non_sticky() {
        let mut t = tracker(1000, 750, 950);
        for _ in 0..949 {
            t.observe(4);
        }
        t.observe(3);
        assert!(!t.is_reject_active());
        assert!(t.is_enforce_active());

        t.observe(4);
        assert_eq!(t.qualifying(), 950);
        assert!(t.is_reject_active());
        assert!(t.should_reject(3));
        assert!(!t.should_reject(4));

        // Fill the window, then push outdated versions until the count slips
        // under the reject threshold.
        for _ in 0..49 {
            t.observe(4);
        }
        assert_eq!(t.observed(), 1000);
        assert_eq!(t.qualifying(), 999);
        for _ in 0..49 {
            t.observe(2);
        }
        assert_eq!(t.qualifying(), 950);
        assert!(t.is_reject_active());
        t.observe(2);
        assert_eq!(t.qualifying(), 949);
        assert!(!t.is_reject_active());
        assert!(!t.should_reject(3));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let mut t = tracker(10, 5, 8);
        t.extend([4, 4, 4, 4, 4, 1]);
        let first = (t.is_enforce_active(), t.is_reject_active());
        for _ in 0..5 {
            assert_eq!((t.is_enforce_active(), t.is_reject_active()), first);
        }
        assert_eq!(t.qualifying(), 5);
    }

    #[test]
    fn test_status_tracks_writer() {
        let mut t = tracker(4, 2, 4);
        let status = t.status();
        assert_eq!(status.snapshot(), MajoritySnapshot { observed: 0, qualifying: 0 });
        assert!(!status.is_enforce_active());

        t.extend([4, 5]);
        assert_eq!(status.snapshot(), t.snapshot());
        assert!(status.is_enforce_active());
        assert!(!status.is_reject_active());
    }

    #[test]
    fn test_from_history() {
        let rule = MajorityRule::single(5, 3).unwrap();
        let t = MajorityVersionTracker::from_history(rule, 2, vec![1, 2, 3, 1, 1, 2, 2]);
        // Window holds [3, 1, 1, 2, 2]
        assert_eq!(t.observed(), 5);
        assert_eq!(t.qualifying(), 3);
        assert!(t.is_enforce_active());
        assert!(t.is_reject_active());
    }

    #[test]
    fn test_from_history_publishes_final_state() {
        let rule = MajorityRule::new(4, 2, 3).unwrap();
        let t = MajorityVersionTracker::from_history(rule, 4, vec![4, 4, 4, 1, 1]);
        assert_eq!(t.status().snapshot(), MajoritySnapshot { observed: 4, qualifying: 2 });
        assert!(t.status().is_enforce_active());
        assert!(!t.status().is_reject_active());
    }

    #[test]
    fn test_huge_window_allocates_lazily() {
        let rule = MajorityRule::new(u32::MAX, 1, 1).unwrap();
        let mut t = MajorityVersionTracker::new(rule, 4);
        assert!(t.window.capacity() < 1 << 20);
        t.extend([3, 4, 5]);
        assert_eq!(t.observed(), 3);
        assert!(t.is_enforce_active());
        assert!(t.is_reject_active());
    }

    #[test]
    fn test_snapshot_pack_roundtrip() {
        let snap = MajoritySnapshot { observed: 4032, qualifying: 3226 };
        assert_eq!(MajoritySnapshot::unpack(snap.pack()), snap);
    }
}
