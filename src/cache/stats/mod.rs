use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

const TOTAL_STATS: usize = 6;

/// Defines various stats that are measured in the cache.
#[repr(usize)]
#[non_exhaustive]
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StatsType {
    /// Defines the number of physical file reads started
    PhysicalReads = 0,
    /// Defines the number of physical file writes started
    PhysicalWrites = 1,
    /// Defines the number of reads that found no entry in the current working directory
    ReadMisses = 2,
    /// Defines the number of requests that attached to an already running operation
    AttachedRequests = 3,
    /// Defines the number of requests re-issued after attaching to an operation of the other kind
    Retries = 4,
    /// Defines the number of working directory rotations
    Rotations = 5,
}

impl StatsType {
    const VALUES: [Self; TOTAL_STATS] = [
        Self::PhysicalReads,
        Self::PhysicalWrites,
        Self::ReadMisses,
        Self::AttachedRequests,
        Self::Retries,
        Self::Rotations,
    ];
}

/// StatsSummary is view representation of various stats represented by [`StatsType`].
#[derive(Debug, PartialEq)]
pub struct StatsSummary {
    pub stats_by_type: HashMap<StatsType, u64>,
}

impl StatsSummary {
    pub(crate) fn new(stats_by_type: HashMap<StatsType, u64>) -> Self {
        StatsSummary {
            stats_by_type,
        }
    }

    /// Returns an Option&lt;u64&gt; counter corresponding to the [`StatsType`].
    pub fn get(&self, stats_type: &StatsType) -> Option<u64> {
        self.stats_by_type.get(stats_type).copied()
    }
}

#[repr(transparent)]
#[derive(Debug)]
struct Counter(CachePadded<AtomicU64>);

/// ConcurrentStatsCounter measures various stats defined by [`StatsType`].
/// Each entry is a [`crossbeam_utils::CachePadded`] AtomicU64, to avoid false sharing between
/// the worker threads and the callers that update the counters.
pub(crate) struct ConcurrentStatsCounter {
    entries: [Counter; TOTAL_STATS],
}

impl ConcurrentStatsCounter {
    pub(crate) fn new() -> Self {
        ConcurrentStatsCounter {
            entries: std::array::from_fn(|_index| Counter(CachePadded::new(AtomicU64::new(0))))
        }
    }

    pub(crate) fn started_a_read(&self) { self.add(StatsType::PhysicalReads, 1); }

    pub(crate) fn started_a_write(&self) { self.add(StatsType::PhysicalWrites, 1); }

    pub(crate) fn found_a_miss(&self) { self.add(StatsType::ReadMisses, 1); }

    pub(crate) fn attached_a_request(&self) { self.add(StatsType::AttachedRequests, 1); }

    pub(crate) fn retried_a_request(&self) { self.add(StatsType::Retries, 1); }

    pub(crate) fn rotated_directory(&self) { self.add(StatsType::Rotations, 1); }

    #[cfg(test)]
    pub(crate) fn physical_reads(&self) -> u64 { self.get(&StatsType::PhysicalReads) }

    #[cfg(test)]
    pub(crate) fn physical_writes(&self) -> u64 { self.get(&StatsType::PhysicalWrites) }

    #[cfg(test)]
    pub(crate) fn misses(&self) -> u64 { self.get(&StatsType::ReadMisses) }

    #[cfg(test)]
    pub(crate) fn attached_requests(&self) -> u64 { self.get(&StatsType::AttachedRequests) }

    #[cfg(test)]
    pub(crate) fn retries(&self) -> u64 { self.get(&StatsType::Retries) }

    #[cfg(test)]
    pub(crate) fn rotations(&self) -> u64 { self.get(&StatsType::Rotations) }

    pub(crate) fn summary(&self) -> StatsSummary {
        let mut stats_by_type = HashMap::new();
        for stats_type in StatsType::VALUES.iter().copied() {
            stats_by_type.insert(stats_type, self.get(&stats_type));
        }
        StatsSummary::new(stats_by_type)
    }

    fn add(&self, stats_type: StatsType, count: u64) {
        self.entries[stats_type as usize].0.fetch_add(count, Ordering::AcqRel);
    }

    fn get(&self, stats_type: &StatsType) -> u64 {
        self.entries[*stats_type as usize].0.load(Ordering::Acquire)
    }
}
