// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-base histogram of the trust levels held by linked aliases.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::TrustLevel;

/// Number of linked aliases currently holding each trust level.
///
/// Every alias contributes exactly one count, in the bucket of its current trust level. Buckets
/// which drop to zero are removed so the persisted representation stays sparse.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLevelCounters(BTreeMap<TrustLevel, u64>);

impl TrustLevelCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more alias at `level`, returns the new count.
    pub fn increment(&mut self, level: TrustLevel) -> u64 {
        let count = self.0.entry(level).or_default();
        *count += 1;
        *count
    }

    /// Retract one alias from `level`, returns the remaining count.
    ///
    /// Counts saturate at zero. An empty bucket is removed instead of being kept as zero.
    pub fn decrement(&mut self, level: TrustLevel) -> u64 {
        let Some(count) = self.0.get_mut(&level) else {
            return 0;
        };

        *count = count.saturating_sub(1);
        let remaining = *count;
        if remaining == 0 {
            self.0.remove(&level);
        }
        remaining
    }

    pub fn count(&self, level: TrustLevel) -> u64 {
        self.0.get(&level).copied().unwrap_or_default()
    }

    /// Highest level held by at least one alias.
    pub fn highest(&self) -> Option<TrustLevel> {
        self.0.keys().next_back().copied()
    }

    /// Highest level held by at least one alias, `NewUser` when no alias contributes.
    pub fn max_level(&self) -> TrustLevel {
        self.highest().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrustLevel, u64)> + '_ {
        self.0.iter().map(|(level, count)| (*level, *count))
    }

    /// Insert a count read from storage, zero counts are skipped.
    pub(crate) fn set(&mut self, level: TrustLevel, count: u64) {
        if count == 0 {
            self.0.remove(&level);
        } else {
            self.0.insert(level, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::TrustLevel;

    use super::TrustLevelCounters;

    #[test]
    fn increment_and_decrement() {
        let mut counters = TrustLevelCounters::new();
        assert_eq!(counters.increment(TrustLevel::Regular), 1);
        assert_eq!(counters.increment(TrustLevel::Regular), 2);
        assert_eq!(counters.increment(TrustLevel::Basic), 1);

        assert_eq!(counters.decrement(TrustLevel::Regular), 1);
        assert_eq!(counters.count(TrustLevel::Regular), 1);
        assert_eq!(counters.count(TrustLevel::Basic), 1);

        assert_eq!(counters.decrement(TrustLevel::Regular), 0);
        assert_eq!(
            counters.iter().collect::<Vec<_>>(),
            vec![(TrustLevel::Basic, 1)]
        );
    }

    #[test]
    fn decrement_saturates_at_zero() {
        let mut counters = TrustLevelCounters::new();
        assert_eq!(counters.decrement(TrustLevel::Member), 0);
        assert_eq!(counters.count(TrustLevel::Member), 0);
        assert!(counters.is_empty());

        counters.increment(TrustLevel::Member);
        counters.decrement(TrustLevel::Member);
        counters.decrement(TrustLevel::Member);
        assert!(counters.is_empty());
    }

    #[test]
    fn max_level_over_remaining_buckets() {
        let mut counters = TrustLevelCounters::new();
        assert_eq!(counters.highest(), None);
        assert_eq!(counters.max_level(), TrustLevel::NewUser);

        counters.increment(TrustLevel::Regular);
        counters.increment(TrustLevel::Basic);
        assert_eq!(counters.max_level(), TrustLevel::Regular);

        // Removing the lower alias first must not affect the higher bucket.
        counters.decrement(TrustLevel::Basic);
        assert_eq!(counters.max_level(), TrustLevel::Regular);

        counters.decrement(TrustLevel::Regular);
        assert_eq!(counters.max_level(), TrustLevel::NewUser);
    }
}
