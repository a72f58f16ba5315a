use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};

/// Minimum fingerprint-set capacity. Below this, a burst of traffic across a
/// handful of origins could evict a fingerprint before its duplicate from a
/// slower origin arrives.
pub const MIN_CAPACITY: usize = 10_000;

/// Fingerprint over `feedID || observationsTimestamp || fullReport`, used to
/// recognize the same report delivered redundantly by multiple origins.
pub type Fingerprint = [u8; 32];

/// Computes the fingerprint for a report's identity fields.
pub fn fingerprint(feed_id: &[u8], observations_timestamp: u32, full_report: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(feed_id);
    hasher.update(observations_timestamp.to_be_bytes());
    hasher.update(full_report);
    hasher.finalize().into()
}

/// Bounded FIFO set of seen fingerprints used to drop duplicate reports
/// received from redundant origins in HA mode.
///
/// Single-writer: callers are expected to serialize access to `observe`
/// (e.g. from one aggregation task), matching the connection manager's
/// single fan-in point for messages from every connection.
pub struct Deduplicator {
    capacity: usize,
    seen: HashSet<Fingerprint>,
    order: VecDeque<Fingerprint>,
    total_received: u64,
    accepted: u64,
    deduplicated: u64,
}

impl Deduplicator {
    /// Creates a deduplicator with at least [`MIN_CAPACITY`] fingerprint
    /// slots, regardless of the requested `capacity`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);

        Self {
            capacity,
            seen: HashSet::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            total_received: 0,
            accepted: 0,
            deduplicated: 0,
        }
    }

    /// Records a fingerprint, returning `true` if this is the first time it
    /// has been seen (the caller should forward the report) or `false` if
    /// it is a duplicate (the caller should drop it).
    pub fn observe(&mut self, fp: Fingerprint) -> bool {
        self.total_received += 1;

        if !self.seen.insert(fp) {
            self.deduplicated += 1;
            return false;
        }

        self.order.push_back(fp);
        self.accepted += 1;

        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }

        true
    }

    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn deduplicated(&self) -> u64 {
        self.deduplicated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_first_occurrence_and_dedups_repeat() {
        let mut dedup = Deduplicator::new(MIN_CAPACITY);
        let fp = fingerprint(b"feed", 1, b"report");

        assert!(dedup.observe(fp));
        assert!(!dedup.observe(fp));

        assert_eq!(dedup.total_received(), 2);
        assert_eq!(dedup.accepted(), 1);
        assert_eq!(dedup.deduplicated(), 1);
    }

    #[test]
    fn distinguishes_by_feed_timestamp_and_blob() {
        let a = fingerprint(b"feed-a", 1, b"report");
        let b = fingerprint(b"feed-b", 1, b"report");
        let c = fingerprint(b"feed-a", 2, b"report");

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn capacity_is_floored_at_min_capacity() {
        let dedup = Deduplicator::new(10);
        assert_eq!(dedup.capacity, MIN_CAPACITY);
    }

    #[test]
    fn evicts_oldest_once_over_capacity() {
        let mut dedup = Deduplicator::new(2);
        dedup.capacity = 2;
        dedup.order.reserve(0);

        let fps: Vec<Fingerprint> = (0u32..3)
            .map(|i| fingerprint(b"feed", i, b"report"))
            .collect();

        for fp in &fps {
            dedup.observe(*fp);
        }

        assert!(!dedup.seen.contains(&fps[0]));
        assert!(dedup.seen.contains(&fps[1]));
        assert!(dedup.seen.contains(&fps[2]));
    }
}
